//! Shared fakes for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;

use crate::client::ApiClient;
use crate::config::{MessageSource, PortalConfig};
use crate::store::MemoryStore;
use crate::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::types::{Application, ApplicationStatus, Category, Farm, Farmer};

pub const BASE_URL: &str = "http://api.test";

/// Replays queued responses in order and records every request it sees.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse, TransportError>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: Value) -> Self {
        self.push(Ok(HttpResponse::new(status, body.to_string())));
        self
    }

    pub fn reply_raw(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(TransportError(message.to_owned())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn push(&self, response: Result<HttpResponse, TransportError>) {
        self.responses.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_owned())))
    }
}

pub fn config(messages: MessageSource) -> PortalConfig {
    PortalConfig::default().with_base_url(BASE_URL).with_messages(messages)
}

pub fn client(transport: &ScriptedTransport, store: &MemoryStore) -> ApiClient<ScriptedTransport> {
    ApiClient::new(&config(MessageSource::Fixed), transport.clone(), Arc::new(store.clone()))
}

pub fn application(id: u64, status: ApplicationStatus) -> Application {
    Application {
        id,
        status,
        farm: Farm {
            name: format!("Farm {id}"),
            address: "1 Field Rd".to_owned(),
            crop_types: Value::String("wheat".to_owned()),
            size: Value::from(10),
            is_verified: false,
            farmer: Farmer { first_name: "Ana".to_owned(), last_name: "Lopez".to_owned() },
        },
    }
}

pub fn application_json(id: u64, status: ApplicationStatus) -> Value {
    serde_json::to_value(application(id, status)).unwrap_or(Value::Null)
}

pub fn category(id: u64, name: &str) -> Category {
    Category { id, name: name.to_owned(), description: format!("{name} goods") }
}
