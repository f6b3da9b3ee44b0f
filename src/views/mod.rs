//! Web interface components for the bonus points client
//!
//! Each page owns its signals, fetches what it needs when mounted, and goes
//! back to idle after every request. The shared pieces (spinner, modal,
//! API constructor) live here.

/// Login page
mod login;
pub use login::Login;

/// Account creation page
mod register;
pub use register::Register;

/// Balance, transfer and messages page
mod balance;
pub use balance::Balance;

/// Profile page
mod about;
pub use about::About;

/// Admin dashboard
mod master;
pub use master::Master;

mod widgets;
pub use widgets::NotFound;

use crate::api::{BonusApi, HttpTransport};
use crate::config::ClientConfig;

/// Client for the backend this build was configured with.
fn api() -> BonusApi<HttpTransport> {
    BonusApi::http(ClientConfig::from_build_env())
}
