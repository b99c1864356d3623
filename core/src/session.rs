//! Cookie session shared by every request of a transport.
//!
//! # Design
//! The server authenticates with a session cookie and guards unsafe methods
//! with a CSRF token stored in another cookie. Cookie storage, expiry and
//! path/domain matching are delegated to `cookie_store`; `Session` only
//! decides which cookies go out and echoes the CSRF token as a header. It is
//! the only mutable state on the client side, so the store sits behind a
//! `Mutex` and can be shared across threads.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cookie_store::{CookieStore, RawCookie};
use tracing::debug;
use url::Url;

use crate::config::TransportConfig;
use crate::http::{HttpRequest, HttpResponse};

pub struct Session {
    config: TransportConfig,
    store: Mutex<CookieStore>,
}

impl Session {
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            store: Mutex::new(CookieStore::default()),
        }
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Value of an unexpired cookie, whatever its domain or path.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.store()
            .iter_unexpired()
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_string())
    }

    /// Add the cookie and CSRF headers to an outgoing request.
    pub fn apply(&self, request: &mut HttpRequest) {
        if !self.config.with_credentials {
            return;
        }
        let Ok(url) = Url::parse(&request.path) else {
            return;
        };
        let store = self.store();
        let mut pairs = Vec::new();
        let mut token = None;
        for (name, value) in store.get_request_values(&url) {
            if name == self.config.csrf_cookie_name {
                token = Some(value.to_string());
            }
            pairs.push(format!("{name}={value}"));
        }
        if pairs.is_empty() {
            return;
        }
        request.headers.push(("cookie".to_string(), pairs.join("; ")));
        if let Some(token) = token {
            request
                .headers
                .push((self.config.csrf_header_name.clone(), token));
        }
    }

    /// Store the cookies a response to `request_url` sets. Expired cookies
    /// replace and remove any stored cookie of the same name.
    pub fn record(&self, request_url: &str, response: &HttpResponse) {
        let Ok(url) = Url::parse(request_url) else {
            return;
        };
        let cookies: Vec<RawCookie<'static>> = response
            .header_values("set-cookie")
            .filter_map(|header| match RawCookie::parse(header.to_string()) {
                Ok(cookie) => Some(cookie),
                Err(err) => {
                    debug!(error = %err, "ignoring malformed set-cookie");
                    None
                }
            })
            .collect();
        if !cookies.is_empty() {
            self.store().store_response_cookies(cookies.into_iter(), &url);
        }
    }

    fn store(&self) -> MutexGuard<'_, CookieStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TransportConfig::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
