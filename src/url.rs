//! Current-page URL resolution.
//!
//! The default resolver asks, in order: the browser's `window.location`
//! (wasm32 builds with the `web` feature), then a process-wide location the
//! host registered with [`set_global_location`]. With neither present it
//! returns `None`; it never fails, so server-side callers are safe.

use std::sync::{PoisonError, RwLock};

/// The parts of a location object the resolver reads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationLike {
    pub href: Option<String>,
    pub origin: Option<String>,
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
}

impl LocationLike {
    pub fn from_href(href: impl Into<String>) -> Self {
        Self { href: Some(href.into()), ..Self::default() }
    }
}

static GLOBAL_LOCATION: RwLock<Option<LocationLike>> = RwLock::new(None);

/// Register (or clear) the process-wide fallback location.
pub fn set_global_location(location: Option<LocationLike>) {
    *GLOBAL_LOCATION.write().unwrap_or_else(PoisonError::into_inner) = location;
}

/// Prefer a non-empty `href`; otherwise join origin, path, query and fragment.
#[must_use]
pub fn resolve_url_from_location(location: Option<&LocationLike>) -> Option<String> {
    let location = location?;
    if let Some(href) = location.href.as_deref().filter(|h| !h.is_empty()) {
        return Some(href.to_string());
    }
    let (Some(origin), Some(pathname)) = (&location.origin, &location.pathname) else {
        return None;
    };
    Some(format!(
        "{origin}{pathname}{}{}",
        location.search.as_deref().unwrap_or(""),
        location.hash.as_deref().unwrap_or("")
    ))
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
fn window_location() -> Option<LocationLike> {
    let location = web_sys::window()?.location();
    Some(LocationLike {
        href: location.href().ok(),
        origin: location.origin().ok(),
        pathname: location.pathname().ok(),
        search: location.search().ok(),
        hash: location.hash().ok(),
    })
}

#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
fn window_location() -> Option<LocationLike> {
    None
}

/// Best-effort URL of the current page.
#[must_use]
pub fn default_url_resolver() -> Option<String> {
    if let Some(location) = window_location() {
        return resolve_url_from_location(Some(&location));
    }
    let global = GLOBAL_LOCATION.read().unwrap_or_else(PoisonError::into_inner);
    resolve_url_from_location(global.as_ref())
}

/// Serializes tests that read or write the global location.
#[cfg(test)]
pub(crate) static GLOBAL_LOCATION_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
#[path = "url_test.rs"]
mod tests;
