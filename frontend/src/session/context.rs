use std::{cell::RefCell, rc::Rc, time::Duration};

use leptos::*;

use super::{
    clock::{Clock, SystemClock},
    guard::{LocationNavigator, Navigator, SessionGuard},
    store::{MemoryStorage, SessionKeys, SessionRecord, SessionStore, StorageError},
    token::is_token_expired,
};
use crate::config::RuntimeConfig;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub keys: SessionKeys,
    pub login_path: &'static str,
    pub check_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keys: SessionKeys::default(),
            login_path: "/login",
            check_interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn from_runtime(config: &RuntimeConfig) -> Self {
        let check_interval = config
            .session_check_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CHECK_INTERVAL);
        Self {
            check_interval,
            ..Self::default()
        }
    }
}

/// Everything the guard, the watchdog and the login/logout flows need to
/// read or end a session. Cheap to clone; clones share the same collaborators.
#[derive(Clone)]
pub struct SessionContext {
    store: SessionStore,
    clock: Rc<dyn Clock>,
    navigator: Rc<dyn Navigator>,
    config: SessionConfig,
    expiry_listeners: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl SessionContext {
    pub fn new(
        store: SessionStore,
        clock: Rc<dyn Clock>,
        navigator: Rc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        Self {
            store,
            clock,
            navigator,
            config,
            expiry_listeners: Rc::default(),
        }
    }

    /// `localStorage`, the system clock and `window.location`. Falls back to
    /// an in-memory store when `localStorage` is unavailable.
    pub fn browser(config: SessionConfig) -> Self {
        let store = SessionStore::local(config.keys).unwrap_or_else(|err| {
            log::warn!("{}; session will not survive a reload", err);
            SessionStore::new(Rc::new(MemoryStorage::new()), config.keys)
        });
        Self::new(
            store,
            Rc::new(SystemClock),
            Rc::new(LocationNavigator),
            config,
        )
    }

    pub fn in_memory(config: SessionConfig) -> Self {
        Self::new(
            SessionStore::new(Rc::new(MemoryStorage::new()), config.keys),
            Rc::new(SystemClock),
            Rc::new(LocationNavigator),
            config,
        )
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    pub fn navigator(&self) -> &Rc<dyn Navigator> {
        &self.navigator
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn guard(&self) -> SessionGuard<'_> {
        SessionGuard::new(self)
    }

    /// Stored token, with storage failures read as "no token".
    pub fn current_token(&self) -> Option<String> {
        self.store.token().unwrap_or_else(|err| {
            log::warn!("session storage read failed: {}", err);
            None
        })
    }

    /// Side-effect free variant of the guard check.
    pub fn is_authenticated(&self) -> bool {
        !is_token_expired(self.current_token().as_deref(), self.clock.as_ref())
    }

    pub fn begin(&self, record: &SessionRecord) -> Result<(), StorageError> {
        self.store.set(record)?;
        log::info!("session started for role {}", record.role);
        Ok(())
    }

    /// Explicit logout.
    pub fn end(&self) {
        if let Err(err) = self.store.clear() {
            log::warn!("failed to clear session on logout: {}", err);
        }
        log::info!("session ended by logout");
        self.navigator.navigate(self.config.login_path);
    }

    /// Registers `listener` to run whenever the guard or the watchdog rejects
    /// the stored session, after storage is cleared and before navigation.
    pub fn on_expire(&self, listener: impl Fn() + 'static) {
        self.expiry_listeners.borrow_mut().push(Rc::new(listener));
    }

    pub(crate) fn expire(&self, reason: &str) {
        if let Err(err) = self.store.clear() {
            log::warn!("failed to clear expired session: {}", err);
        }
        log::info!("session rejected: {}", reason);
        let listeners = self.expiry_listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
        self.navigator.navigate(self.config.login_path);
    }
}

pub fn provide_session(session: SessionContext) {
    provide_context(session);
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(|| {
        let config = SessionConfig::default();
        if cfg!(target_arch = "wasm32") {
            SessionContext::browser(config)
        } else {
            SessionContext::in_memory(config)
        }
    })
}
