//! Client handle produced by the bootstrap sequence.

use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_secretsmanager::Client as SecretsManagerClient;
use aws_sdk_sts::Client as StsClient;

use crate::config::{self, ClientOptions};
use crate::credentials;
use crate::error::Result;
use crate::identity::{self, CallerIdentity};
use crate::logger::Logger;

/// Ready-to-use bundle of session configuration, identity client and
/// secret-store client.
///
/// The handle is read-only after construction. Cloning is cheap and clones
/// share the underlying connection pools, so one handle can serve every
/// caller in the process.
///
/// # Example
///
/// ```ignore
/// use aws_secrets_bootstrap::{AwsClient, AwsError, ClientOptions};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Database {
///     host: String,
///     password: String,
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), AwsError> {
///     let options = ClientOptions::new("us-east-1")
///         .with_assume_role_arn("arn:aws:iam::123456789012:role/app");
///     let client = AwsClient::new(options).await?;
///     let db: Database = client.secret_json("prod/database").await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AwsClient {
    config: SdkConfig,
    sts: StsClient,
    secrets: SecretsManagerClient,
    pub(crate) logger: Arc<dyn Logger>,
}

impl AwsClient {
    /// Bootstrap a client: resolve the configuration, assume the role if one
    /// is set, verify the identity, then build the secret-store client.
    ///
    /// Steps run strictly in that order and the first failure aborts the
    /// sequence; nothing built along the way is returned. Dropping the future
    /// cancels the in-flight call.
    ///
    /// # Errors
    ///
    /// - `AwsError::Config` or `AwsError::LoadCredentials` if resolution fails
    /// - `AwsError::AssumeRole` or `AwsError::AssumeRoleResponse` if the exchange fails
    /// - `AwsError::CallerIdentity` if the credentials resolved but are unusable
    pub async fn new(options: ClientOptions) -> Result<Self> {
        let logger = options.logger.clone();

        let config = config::resolve(&options).await?;
        let (config, sts) = credentials::provision(
            config,
            options.assume_role_arn(),
            &options.role_session_name,
            options.assume_role_duration,
            logger.clone(),
        )
        .await?;
        identity::verify(&sts, logger.as_ref()).await?;

        let secrets = SecretsManagerClient::new(&config);

        Ok(Self {
            config,
            sts,
            secrets,
            logger,
        })
    }

    /// Look up the principal behind the client's credentials.
    pub async fn caller_identity(&self) -> Result<CallerIdentity> {
        identity::caller_identity(&self.sts).await
    }

    /// Resolved session configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Identity service client.
    pub fn sts_client(&self) -> &StsClient {
        &self.sts
    }

    /// Secret store client.
    pub fn secrets_client(&self) -> &SecretsManagerClient {
        &self.secrets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn test_client_is_shareable() {
        assert_send_sync::<AwsClient>();
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_empty_region() {
        let result = AwsClient::new(ClientOptions::new("")).await;
        assert!(matches!(result, Err(crate::AwsError::Config(_))));
    }
}
