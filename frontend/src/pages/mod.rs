pub mod home;
pub mod login;
pub mod role_home;

pub use home::*;
pub use login::*;
pub use role_home::*;
