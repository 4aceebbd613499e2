//! Bootstrap an AWS session and read JSON secrets from Secrets Manager.
//!
//! This crate wraps the AWS SDK in a single bootstrap call that:
//!
//! - Resolves the session configuration (region, retry policy, transport)
//! - Optionally assumes a role and caches the exchanged credentials
//! - Verifies the resulting identity before returning
//! - Builds the STS and Secrets Manager clients on the final configuration
//!
//! The returned [`AwsClient`] is read-only and can be cloned and shared
//! across tasks.
//!
//! # Example
//!
//! ```ignore
//! use aws_secrets_bootstrap::{AwsClient, AwsError, ClientOptions, RetryMode};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ApiKeys {
//!     stripe: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AwsError> {
//!     let options = ClientOptions::new("eu-central-1")
//!         .with_retry_max_attempts(5)
//!         .with_retry_mode(RetryMode::Adaptive);
//!     let client = AwsClient::new(options).await?;
//!
//!     let keys: ApiKeys = client.secret_json("prod/api-keys").await?;
//!     let identity = client.caller_identity().await?;
//!     println!("running as {identity}");
//!     Ok(())
//! }
//! ```
//!
//! # Credential lifetime
//!
//! When a role is assumed the exchange happens once, during bootstrap. The
//! exchanged credentials are never refreshed: after they expire, calls made
//! through the client fail with an authorization error until a new client
//! is bootstrapped.

mod client;
mod config;
mod credentials;
mod error;
mod identity;
mod logger;
mod retry;
mod secrets;

pub use client::AwsClient;
pub use config::{resolve, ClientOptions, DEFAULT_ROLE_SESSION_NAME};
pub use credentials::{provision, AssumedRoleCredentials};
pub use error::{AwsError, BoxError, Result};
pub use identity::{verify, CallerIdentity};
pub use logger::{Fields, Logger, NoopLogger, TracingLogger};
pub use retry::RetryMode;
pub use secrets::SecretPayload;
