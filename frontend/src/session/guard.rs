use super::{
    context::SessionContext,
    store::SessionRecord,
    token::is_token_expired,
};

/// Moves the application to another location.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

/// Full-page navigation through `window.location`. Does nothing when the
/// browser is already on `path`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationNavigator;

impl Navigator for LocationNavigator {
    #[cfg(not(target_arch = "wasm32"))]
    fn navigate(&self, path: &str) {
        log::debug!("no browser location, skipping navigation to {}", path);
    }

    #[cfg(target_arch = "wasm32")]
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        if let Ok(pathname) = location.pathname() {
            if pathname == path {
                return;
            }
        }
        if let Err(err) = location.set_href(path) {
            log::warn!("navigation to {} failed: {:?}", path, err);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Authorized(SessionRecord),
    Unauthorized,
}

impl GuardDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, GuardDecision::Authorized(_))
    }
}

/// Gate evaluated before any protected view is built.
pub struct SessionGuard<'a> {
    session: &'a SessionContext,
}

impl<'a> SessionGuard<'a> {
    pub fn new(session: &'a SessionContext) -> Self {
        Self { session }
    }

    /// Reads the stored session and judges its token against the clock.
    /// On rejection the pair is cleared and the login view requested before
    /// returning, so callers only have to decide what to render.
    pub fn check(&self) -> GuardDecision {
        let record = match self.session.store().get() {
            Ok(record) => record,
            Err(err) => {
                log::warn!("session storage read failed: {}", err);
                None
            }
        };
        match record {
            Some(record)
                if !is_token_expired(Some(&record.token), self.session.clock().as_ref()) =>
            {
                GuardDecision::Authorized(record)
            }
            Some(_) => {
                self.session.expire("stored token is expired or malformed");
                GuardDecision::Unauthorized
            }
            None => {
                self.session.expire("no session token stored");
                GuardDecision::Unauthorized
            }
        }
    }
}
