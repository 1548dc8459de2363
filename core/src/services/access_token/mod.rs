//! Short-lived JWT access tokens minted after a refresh token checks out

mod config;
mod service;


pub use config::AccessTokenConfig;
pub use service::AccessTokenService;
