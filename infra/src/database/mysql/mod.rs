//! MySQL repository implementations

mod client_repository_impl;

pub use client_repository_impl::MySqlClientRepository;
