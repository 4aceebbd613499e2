//! Error types for bootstrap and secret operations.

use std::error::Error as StdError;

use aws_credential_types::provider::error::CredentialsError;
use aws_smithy_types::error::display::DisplayErrorContext;
use thiserror::Error;

/// Boxed cause kept behind every SDK failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T, E = AwsError> = std::result::Result<T, E>;

/// Errors that can occur while bootstrapping the client or reading secrets.
#[derive(Debug, Error)]
pub enum AwsError {
    /// Options were rejected before any network call.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The credential chain could not produce credentials.
    #[error("failed to load AWS config: {}", DisplayErrorContext(.0))]
    LoadCredentials(#[source] CredentialsError),

    /// The role-assumption exchange was rejected.
    #[error("failed to assume role {role_arn}: {message}")]
    AssumeRole {
        role_arn: String,
        message: String,
        #[source]
        source: BoxError,
    },

    /// The exchange succeeded but returned unusable credentials.
    #[error("assume role {role_arn} returned no usable credentials: {reason}")]
    AssumeRoleResponse { role_arn: String, reason: String },

    /// Credentials resolved but the identity call failed.
    #[error("failed to get caller identity: {message}")]
    CallerIdentity {
        message: String,
        #[source]
        source: BoxError,
    },

    /// Secret retrieval failed for a reason other than a missing secret.
    #[error("failed to get secret value for {secret_id}: {message}")]
    GetSecret {
        secret_id: String,
        message: String,
        #[source]
        source: BoxError,
    },

    /// The secret store has no secret with this identifier.
    #[error("secret not found: {secret_id}")]
    SecretNotFound {
        secret_id: String,
        #[source]
        source: BoxError,
    },

    /// The secret exists but carries neither a text nor a binary value.
    #[error("secret found but value is empty: {0}")]
    SecretEmpty(String),

    /// The payload does not match the requested shape.
    #[error("failed to unmarshal byte value of {secret_id}: {source}")]
    Decode {
        secret_id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Render an SDK error with its full cause chain and box it as the source.
pub(crate) fn sdk_failure<E>(err: E) -> (String, BoxError)
where
    E: StdError + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    (message, Box::new(err))
}
