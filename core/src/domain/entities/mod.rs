//! Domain entities representing core business objects.

pub mod client;
pub mod token;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::ClientRecord;
pub use token::{
    AccessToken, Claims, RefreshToken, REFRESH_TOKEN_RANDOM_BYTES, REFRESH_TOKEN_SECRET_LEN,
    REFRESH_TOKEN_SEPARATOR,
};
