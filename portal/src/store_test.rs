use super::*;

fn tokens() -> TokenPair {
    TokenPair { access: "acc-1".to_owned(), refresh: "ref-1".to_owned() }
}

#[test]
fn get_returns_none_for_missing_key() {
    let store = MemoryStore::new();
    assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    assert!(store.is_empty());
}

#[test]
fn set_overwrites_previous_value() {
    let store = MemoryStore::new();
    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();
    assert_eq!(store.get("k").as_deref(), Some("two"));
}

#[test]
fn save_tokens_writes_both_keys() {
    let store = MemoryStore::new();
    store.save_tokens(&tokens()).unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("acc-1"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("ref-1"));
}

#[test]
fn access_token_treats_empty_string_as_absent() {
    let store = MemoryStore::new();
    store.set(ACCESS_TOKEN_KEY, "").unwrap();
    assert_eq!(store.access_token(), None);
}

#[test]
fn invalidate_clears_both_tokens() {
    let store = MemoryStore::new();
    store.save_tokens(&tokens()).unwrap();
    store.invalidate().unwrap();
    assert_eq!(store.access_token(), None);
    assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
    assert!(store.is_empty());
}

#[test]
fn clones_share_entries() {
    let store = MemoryStore::new();
    let other = store.clone();
    store.save_tokens(&tokens()).unwrap();
    assert_eq!(other.access_token().as_deref(), Some("acc-1"));
}

#[test]
fn with_access_token_seeds_only_access_key() {
    let store = MemoryStore::with_access_token("seed");
    assert_eq!(store.access_token().as_deref(), Some("seed"));
    assert_eq!(store.get(REFRESH_TOKEN_KEY), None);
}
