//! Periodic re-check of the stored session so an idle tab is logged out
//! without waiting for the next navigation.

use std::{cell::RefCell, rc::Rc, time::Duration};

use super::{context::SessionContext, token::is_token_expired};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("failed to start interval: {0}")]
    Start(String),
}

/// A running interval. Cancelled on [`IntervalHandle::cancel`] or drop.
pub struct IntervalHandle {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl IntervalHandle {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

pub trait IntervalScheduler {
    fn schedule(
        &self,
        period: Duration,
        tick: Rc<dyn Fn()>,
    ) -> Result<IntervalHandle, SchedulerError>;
}

/// `setInterval` through Leptos. Clearing by id is safe from inside the
/// callback itself, which the watchdog relies on.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl IntervalScheduler for BrowserScheduler {
    #[cfg(target_arch = "wasm32")]
    fn schedule(
        &self,
        period: Duration,
        tick: Rc<dyn Fn()>,
    ) -> Result<IntervalHandle, SchedulerError> {
        let handle = leptos::set_interval_with_handle(move || tick(), period)
            .map_err(|err| SchedulerError::Start(format!("{:?}", err)))?;
        Ok(IntervalHandle::new(move || handle.clear()))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn schedule(
        &self,
        _period: Duration,
        _tick: Rc<dyn Fn()>,
    ) -> Result<IntervalHandle, SchedulerError> {
        Err(SchedulerError::Start("no browser timers on this target".into()))
    }
}

pub struct SessionWatchdog {
    interval: Rc<RefCell<Option<IntervalHandle>>>,
}

impl SessionWatchdog {
    /// Arms the watchdog if a token is stored. A storage read failure or a
    /// scheduler failure leaves it unarmed.
    pub fn start(session: &SessionContext, scheduler: &dyn IntervalScheduler) -> Option<Self> {
        match session.store().token() {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::debug!("no session token, watchdog not armed");
                return None;
            }
            Err(err) => {
                log::warn!("session storage read failed, watchdog not armed: {}", err);
                return None;
            }
        }

        let interval: Rc<RefCell<Option<IntervalHandle>>> = Rc::new(RefCell::new(None));
        let tick: Rc<dyn Fn()> = {
            let session = session.clone();
            let interval = Rc::downgrade(&interval);
            Rc::new(move || {
                let token = session.current_token();
                if !is_token_expired(token.as_deref(), session.clock().as_ref()) {
                    return;
                }
                // Stop ticking before handing control to the navigator.
                if let Some(interval) = interval.upgrade() {
                    let handle = interval.borrow_mut().take();
                    drop(handle);
                }
                session.expire("session expired while idle");
            })
        };

        let period = session.config().check_interval;
        match scheduler.schedule(period, tick) {
            Ok(handle) => {
                *interval.borrow_mut() = Some(handle);
                log::debug!("session watchdog armed, period {:?}", period);
                Some(Self { interval })
            }
            Err(err) => {
                log::warn!("session watchdog not armed: {}", err);
                None
            }
        }
    }

    /// `false` once the watchdog has fired on an expired session.
    pub fn is_running(&self) -> bool {
        self.interval.borrow().is_some()
    }

    pub fn stop(self) {}
}

impl Drop for SessionWatchdog {
    fn drop(&mut self) {
        let handle = self.interval.borrow_mut().take();
        drop(handle);
    }
}

/// The app shell's single watchdog, keyed by the token it was armed for.
#[derive(Default)]
pub struct WatchdogSlot {
    current: Option<(String, SessionWatchdog)>,
}

impl WatchdogSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the running watchdog when `token` is unchanged; otherwise the
    /// old one is cancelled before a replacement is armed.
    pub fn rearm(
        &mut self,
        token: Option<&str>,
        session: &SessionContext,
        scheduler: &dyn IntervalScheduler,
    ) {
        if let (Some(token), Some((armed_for, _))) = (token, &self.current) {
            if armed_for == token {
                return;
            }
        }
        self.disarm();
        let Some(token) = token else {
            return;
        };
        self.current =
            SessionWatchdog::start(session, scheduler).map(|watchdog| (token.to_string(), watchdog));
    }

    pub fn disarm(&mut self) {
        if let Some((_, watchdog)) = self.current.take() {
            watchdog.stop();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.current.is_some()
    }
}
