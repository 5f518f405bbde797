mod app_state;
mod auth_services;
mod dashboard;
mod session;

pub use app_state::*;
pub use auth_services::*;
pub use dashboard::*;
pub use session::*;
