use super::*;

#[test]
fn prefers_href() {
    let location = LocationLike {
        href: Some("https://example.com/full".into()),
        origin: Some("https://other.example".into()),
        pathname: Some("/ignored".into()),
        ..LocationLike::default()
    };
    assert_eq!(resolve_url_from_location(Some(&location)).as_deref(), Some("https://example.com/full"));
}

#[test]
fn builds_from_parts_when_href_missing() {
    let location = LocationLike {
        origin: Some("https://example.com".into()),
        pathname: Some("/path".into()),
        search: Some("?q=1".into()),
        hash: Some("#top".into()),
        ..LocationLike::default()
    };
    assert_eq!(resolve_url_from_location(Some(&location)).as_deref(), Some("https://example.com/path?q=1#top"));
}

#[test]
fn empty_href_falls_back_to_parts() {
    let location = LocationLike {
        href: Some(String::new()),
        origin: Some("https://example.com".into()),
        pathname: Some("/p".into()),
        ..LocationLike::default()
    };
    assert_eq!(resolve_url_from_location(Some(&location)).as_deref(), Some("https://example.com/p"));
}

#[test]
fn origin_without_pathname_is_none() {
    let location = LocationLike { origin: Some("https://example.com".into()), ..LocationLike::default() };
    assert!(resolve_url_from_location(Some(&location)).is_none());
    assert!(resolve_url_from_location(None).is_none());
}

#[test]
fn default_resolver_uses_global_location_then_none() {
    let _guard = GLOBAL_LOCATION_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

    set_global_location(None);
    assert!(default_url_resolver().is_none());

    set_global_location(Some(LocationLike {
        origin: Some("https://fallback.example".into()),
        pathname: Some("/path".into()),
        ..LocationLike::default()
    }));
    assert_eq!(default_url_resolver().as_deref(), Some("https://fallback.example/path"));

    set_global_location(None);
}
