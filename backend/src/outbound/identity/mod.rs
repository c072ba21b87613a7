//! Identity provider outbound adapters.
//!
//! A thin reqwest implementation of the `IdentityProvider` port that
//! verifies session tokens against the hosted provider.

mod dto;
mod http_provider;

pub use http_provider::{HttpIdentityProvider, IdentityProviderConfig, IdentityProviderConfigError};
