use std::{cell::RefCell, rc::Rc};

use crate::{
    session::{use_session, BrowserScheduler, IntervalScheduler, SessionContext, WatchdogSlot},
    state::auth::use_auth,
};
use leptos::*;

/// The shell's watchdog lifecycle, independent of the reactive graph:
/// [`ShellWatchdog::track`] is fed every auth token change and
/// [`ShellWatchdog::teardown`] runs when the shell goes away.
#[derive(Clone)]
pub struct ShellWatchdog {
    slot: Rc<RefCell<WatchdogSlot>>,
    session: SessionContext,
    scheduler: Rc<dyn IntervalScheduler>,
}

impl ShellWatchdog {
    pub fn new(session: SessionContext, scheduler: Rc<dyn IntervalScheduler>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(WatchdogSlot::new())),
            session,
            scheduler,
        }
    }

    pub fn track(&self, token: Option<&str>) {
        self.slot
            .borrow_mut()
            .rearm(token, &self.session, self.scheduler.as_ref());
    }

    pub fn teardown(&self) {
        self.slot.borrow_mut().disarm();
    }

    pub fn is_armed(&self) -> bool {
        self.slot.borrow().is_armed()
    }
}

/// Top-level wrapper that owns the session watchdog. The watchdog is re-armed
/// whenever the auth token changes and cancelled when it goes away or the
/// shell is torn down.
#[component]
pub fn AppShell(
    #[prop(optional)] scheduler: Option<Rc<dyn IntervalScheduler>>,
    children: Children,
) -> impl IntoView {
    let (auth, _) = use_auth();
    let scheduler: Rc<dyn IntervalScheduler> =
        scheduler.unwrap_or_else(|| Rc::new(BrowserScheduler));
    let watchdog = ShellWatchdog::new(use_session(), scheduler);
    let token = create_memo(move |_| auth.with(|state| state.token.clone()));

    {
        let watchdog = watchdog.clone();
        create_effect(move |_| watchdog.track(token.get().as_deref()));
    }
    on_cleanup(move || watchdog.teardown());

    view! { <div class="min-h-screen bg-surface">{children()}</div> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionRecord;
    use crate::test_support::helpers::token_with_exp;
    use crate::test_support::session::{test_session, ManualScheduler, TestSession};
    use std::time::Duration;

    fn shell_for(session: &SessionContext, scheduler: &Rc<ManualScheduler>) -> ShellWatchdog {
        let scheduler: Rc<dyn IntervalScheduler> = scheduler.clone();
        ShellWatchdog::new(session.clone(), scheduler)
    }

    #[test]
    fn valid_token_on_mount_expires_on_first_tick_after_exp() {
        let TestSession {
            session,
            memory,
            navigator,
            clock,
        } = test_session();
        let token = token_with_exp(clock.now().timestamp() + 30);
        session
            .begin(&SessionRecord::new(token.clone(), "ADMIN"))
            .unwrap();
        let scheduler = Rc::new(ManualScheduler::new(clock));
        let shell = shell_for(&session, &scheduler);

        shell.track(Some(&token));
        assert!(shell.is_armed());
        assert_eq!(scheduler.active(), 1);
        assert!(navigator.visits().is_empty());

        scheduler.advance(Duration::from_secs(60));
        assert!(memory.is_empty());
        assert_eq!(navigator.visits(), vec!["/login".to_string()]);
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn teardown_before_first_tick_fires_nothing() {
        let TestSession {
            session,
            navigator,
            clock,
            ..
        } = test_session();
        let token = token_with_exp(clock.now().timestamp() + 30);
        session
            .begin(&SessionRecord::new(token.clone(), "STUDENT"))
            .unwrap();
        let scheduler = Rc::new(ManualScheduler::new(clock));
        let shell = shell_for(&session, &scheduler);

        shell.track(Some(&token));
        shell.teardown();
        assert!(!shell.is_armed());
        assert_eq!(scheduler.active(), 0);

        scheduler.advance(Duration::from_secs(120));
        assert_eq!(scheduler.fired(), 0);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn token_changes_rearm_and_logout_disarms() {
        let TestSession { session, clock, .. } = test_session();
        let first = token_with_exp(clock.now().timestamp() + 600);
        session
            .begin(&SessionRecord::new(first.clone(), "STUDENT"))
            .unwrap();
        let scheduler = Rc::new(ManualScheduler::new(clock.clone()));
        let shell = shell_for(&session, &scheduler);

        shell.track(Some(&first));
        shell.track(Some(&first));
        assert_eq!(scheduler.scheduled(), 1);

        let second = token_with_exp(clock.now().timestamp() + 1200);
        session
            .begin(&SessionRecord::new(second.clone(), "STUDENT"))
            .unwrap();
        shell.track(Some(&second));
        assert_eq!(scheduler.scheduled(), 2);
        assert_eq!(scheduler.active(), 1);

        shell.track(None);
        assert!(!shell.is_armed());
        assert_eq!(scheduler.active(), 0);
    }

    #[test]
    fn expiry_listener_can_disarm_from_inside_a_tick() {
        let TestSession {
            session,
            navigator,
            clock,
            ..
        } = test_session();
        let token = token_with_exp(clock.now().timestamp() + 30);
        session
            .begin(&SessionRecord::new(token.clone(), "ADMIN"))
            .unwrap();
        let scheduler = Rc::new(ManualScheduler::new(clock));
        let shell = shell_for(&session, &scheduler);
        {
            let shell = shell.clone();
            session.on_expire(move || shell.track(None));
        }

        shell.track(Some(&token));
        scheduler.advance(Duration::from_secs(180));
        assert!(!shell.is_armed());
        assert_eq!(scheduler.fired(), 1);
        assert_eq!(navigator.visits().len(), 1);
    }
}
