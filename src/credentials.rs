//! Role assumption and the cached credential source it produces.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use aws_config::SdkConfig;
use aws_credential_types::provider::{future, ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sdk_sts::Client as StsClient;

use crate::error::{sdk_failure, AwsError, Result};
use crate::logger::Logger;

/// Provider name attached to credentials produced by role assumption.
const PROVIDER_NAME: &str = "AssumedRole";

/// Credentials obtained from a single role-assumption exchange.
///
/// Every request returns the same credential set. Once it expires it is still
/// handed out and calls signed with it are rejected by the service; the
/// exchange is not repeated. Processes that outlive the credential lifetime
/// must bootstrap a new client.
#[derive(Debug, Clone)]
pub struct AssumedRoleCredentials {
    role_arn: String,
    credentials: Credentials,
    logger: Arc<dyn Logger>,
}

impl AssumedRoleCredentials {
    /// Wrap an already exchanged credential set.
    pub fn new(
        role_arn: impl Into<String>,
        credentials: Credentials,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            role_arn: role_arn.into(),
            credentials,
            logger,
        }
    }

    fn from_sts(
        role_arn: &str,
        sts: &aws_sdk_sts::types::Credentials,
        logger: Arc<dyn Logger>,
    ) -> Result<Self> {
        let expiry = SystemTime::try_from(*sts.expiration()).map_err(|err| {
            AwsError::AssumeRoleResponse {
                role_arn: role_arn.to_string(),
                reason: format!("invalid expiration: {err}"),
            }
        })?;
        let credentials = Credentials::new(
            sts.access_key_id(),
            sts.secret_access_key(),
            Some(sts.session_token().to_string()),
            Some(expiry),
            PROVIDER_NAME,
        );
        Ok(Self::new(role_arn, credentials, logger))
    }

    /// Role these credentials were issued for.
    pub fn role_arn(&self) -> &str {
        &self.role_arn
    }

    /// Expiration reported by the exchange.
    pub fn expiry(&self) -> Option<SystemTime> {
        self.credentials.expiry()
    }

    /// Whether the expiration timestamp has been reached.
    pub fn is_expired(&self) -> bool {
        self.expiry().is_some_and(|expiry| SystemTime::now() >= expiry)
    }
}

impl ProvideCredentials for AssumedRoleCredentials {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        if self.is_expired() {
            self.logger.debug(
                "assumed role credentials have expired; role assumption is not repeated",
                &[("roleArn", &self.role_arn)],
            );
        }
        future::ProvideCredentials::ready(Ok(self.credentials.clone()))
    }
}

/// Produce the effective session configuration and identity client.
///
/// Without a role the configuration is returned as resolved. With a role a
/// temporary identity client performs exactly one exchange, the configuration's
/// credential source is replaced with the exchanged credentials, and the
/// identity client is rebuilt against it.
pub async fn provision(
    config: SdkConfig,
    role_arn: Option<&str>,
    session_name: &str,
    duration: Option<Duration>,
    logger: Arc<dyn Logger>,
) -> Result<(SdkConfig, StsClient)> {
    let Some(role_arn) = role_arn else {
        let sts = StsClient::new(&config);
        return Ok((config, sts));
    };

    logger.debug(
        "AssumeRoleArn is set; assuming role",
        &[("roleArn", &role_arn)],
    );

    let output = {
        let sts = StsClient::new(&config);
        sts.assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .set_duration_seconds(duration.map(|d| d.as_secs().min(i32::MAX as u64) as i32))
            .send()
            .await
            .map_err(|err| {
                let (message, source) = sdk_failure(err);
                AwsError::AssumeRole {
                    role_arn: role_arn.to_string(),
                    message,
                    source,
                }
            })?
    };

    let sts_credentials = output
        .credentials()
        .ok_or_else(|| AwsError::AssumeRoleResponse {
            role_arn: role_arn.to_string(),
            reason: "response carried no credentials".to_string(),
        })?;
    let provider = AssumedRoleCredentials::from_sts(role_arn, sts_credentials, logger.clone())?;
    logger.debug("assume role successful", &[("roleArn", &role_arn)]);

    let config = config
        .to_builder()
        .credentials_provider(SharedCredentialsProvider::new(provider))
        .build();
    let sts = StsClient::new(&config);
    Ok((config, sts))
}
