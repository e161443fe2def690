//! `gloo-net` (fetch) implementation of the portal transport.

use portal::{HttpRequest, HttpResponse, Transport, TransportError};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl Transport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            fetch(request).await
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError(format!("{} {}: fetch requires the csr build", request.method, request.url)))
        }
    }
}

#[cfg(feature = "csr")]
async fn fetch(request: HttpRequest) -> Result<HttpResponse, TransportError> {
    use gloo_net::http::Request;
    use portal::Method;

    fn failed(e: gloo_net::Error) -> TransportError {
        TransportError(e.to_string())
    }

    let mut builder = match request.method {
        Method::Get => Request::get(&request.url),
        Method::Post => Request::post(&request.url),
        Method::Put => Request::put(&request.url),
        Method::Delete => Request::delete(&request.url),
    };
    if let Some(value) = request.authorization() {
        builder = builder.header("Authorization", &value);
    }
    let response = match &request.body {
        Some(body) => builder.json(body).map_err(failed)?.send().await,
        None => builder.send().await,
    }
    .map_err(failed)?;

    let status = response.status();
    let body = response.text().await.map_err(failed)?;
    if status == 401 {
        log::info!("{} {} unauthorized", request.method, request.url);
    }
    Ok(HttpResponse::new(status, body))
}
