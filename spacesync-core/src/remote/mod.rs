//! Remote space API.
//!
//! The reconciliation engine talks to spaces through the [`SpaceApi`] trait
//! so it can run against the management API ([`ManagementClient`]) or an
//! in-memory fake in tests. [`Space`] layers typed, space-scoped resource
//! calls on top of the raw trait.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;
mod region;
mod space;

use async_trait::async_trait;
use serde_json::Value;

pub use client::{ManagementClient, RetryConfig};
pub use error::ApiError;
pub use region::{Region, UnknownRegion};
pub use space::Space;

/// Raw JSON access to space-scoped resource paths such as
/// `spaces/{id}/components`.
#[async_trait]
pub trait SpaceApi: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError>;
}
