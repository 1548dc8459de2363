pub mod auth;

pub use auth::*;
pub use rk_shared::ErrorResponse;
