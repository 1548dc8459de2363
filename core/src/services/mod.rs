//! Business services containing domain logic and use cases.

pub mod access_token;
pub mod refresh_token;

// Re-export commonly used types
pub use access_token::{AccessTokenConfig, AccessTokenService};
pub use refresh_token::{RefreshTokenStore, RefreshTokenStoreConfig, UserLocks};
