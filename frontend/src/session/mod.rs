//! Client-side session gating: token expiry checks, the per-render guard and
//! the idle watchdog, all going through one [`SessionStore`].

pub mod clock;
pub mod context;
pub mod guard;
pub mod store;
pub mod token;
pub mod watchdog;

pub use clock::{Clock, SystemClock};
pub use context::{provide_session, use_session, SessionConfig, SessionContext};
pub use guard::{GuardDecision, LocationNavigator, Navigator, SessionGuard};
pub use store::{KeyValueStorage, MemoryStorage, SessionKeys, SessionRecord, SessionStore, StorageError};
pub use token::{decode_claims, is_token_expired, is_token_expired_at, SessionClaims, TokenError};
pub use watchdog::{
    BrowserScheduler, IntervalHandle, IntervalScheduler, SchedulerError, SessionWatchdog,
    WatchdogSlot,
};
