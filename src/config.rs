//! Bootstrap options and session configuration resolution.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_smithy_runtime_api::client::http::SharedHttpClient;
use aws_smithy_types::retry::RetryConfig;
use aws_smithy_types::timeout::TimeoutConfig;
use aws_types::region::Region;

use crate::error::{AwsError, Result};
use crate::logger::{Logger, TracingLogger};
use crate::retry::RetryMode;

/// Session name used for role assumption when none is given.
pub const DEFAULT_ROLE_SESSION_NAME: &str = "aws-secrets-bootstrap";

/// Options accepted by [`AwsClient::new`](crate::AwsClient::new).
///
/// Only `region` is required. Every other option falls back to the provider
/// default when left unset.
#[derive(Clone)]
pub struct ClientOptions {
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) region: String,
    pub(crate) assume_role_arn: Option<String>,
    pub(crate) role_session_name: String,
    pub(crate) assume_role_duration: Option<Duration>,
    pub(crate) retry_max_attempts: u32,
    pub(crate) retry_mode: RetryMode,
    pub(crate) http_client: Option<SharedHttpClient>,
    pub(crate) endpoint_url: Option<String>,
    pub(crate) credentials_provider: Option<SharedCredentialsProvider>,
    pub(crate) operation_timeout: Option<Duration>,
}

impl ClientOptions {
    /// Create options for the given region with provider defaults everywhere else.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            logger: Arc::new(TracingLogger),
            region: region.into(),
            assume_role_arn: None,
            role_session_name: DEFAULT_ROLE_SESSION_NAME.to_string(),
            assume_role_duration: None,
            retry_max_attempts: 0,
            retry_mode: RetryMode::Unspecified,
            http_client: None,
            endpoint_url: None,
            credentials_provider: None,
            operation_timeout: None,
        }
    }

    /// Route diagnostics to a custom logger.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Assume this role after loading the ambient credentials.
    ///
    /// An empty string disables role assumption.
    pub fn with_assume_role_arn(mut self, role_arn: impl Into<String>) -> Self {
        let role_arn = role_arn.into();
        self.assume_role_arn = (!role_arn.is_empty()).then_some(role_arn);
        self
    }

    /// Session name recorded by the identity service for the assumed role.
    pub fn with_role_session_name(mut self, name: impl Into<String>) -> Self {
        self.role_session_name = name.into();
        self
    }

    /// Requested lifetime of the assumed-role credentials.
    pub fn with_assume_role_duration(mut self, duration: Duration) -> Self {
        self.assume_role_duration = Some(duration);
        self
    }

    /// Cap the number of attempts per call. `0` keeps the provider default.
    pub fn with_retry_max_attempts(mut self, attempts: u32) -> Self {
        self.retry_max_attempts = attempts;
        self
    }

    /// Select the retry strategy.
    pub fn with_retry_mode(mut self, mode: RetryMode) -> Self {
        self.retry_mode = mode;
        self
    }

    /// Replace the default network transport for every call.
    pub fn with_http_client(mut self, http_client: SharedHttpClient) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Send every service call to this endpoint instead of the regional default.
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Use an explicit credentials source instead of the ambient default chain.
    pub fn with_credentials_provider(
        mut self,
        provider: impl ProvideCredentials + 'static,
    ) -> Self {
        self.credentials_provider = Some(SharedCredentialsProvider::new(provider));
        self
    }

    /// Deadline applied to every service operation, retries included.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Configured region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Role to assume, if any.
    pub fn assume_role_arn(&self) -> Option<&str> {
        self.assume_role_arn.as_deref()
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("region", &self.region)
            .field("assume_role_arn", &self.assume_role_arn)
            .field("role_session_name", &self.role_session_name)
            .field("assume_role_duration", &self.assume_role_duration)
            .field("retry_max_attempts", &self.retry_max_attempts)
            .field("retry_mode", &self.retry_mode)
            .field("http_client", &self.http_client.is_some())
            .field("endpoint_url", &self.endpoint_url)
            .field("credentials_provider", &self.credentials_provider.is_some())
            .field("operation_timeout", &self.operation_timeout)
            .finish()
    }
}

/// Resolve options into a session configuration.
///
/// Loads the default credential chain (environment, shared config files,
/// container and instance metadata) unless an explicit provider was given,
/// and resolves it once so that a missing or malformed source fails here.
pub async fn resolve(options: &ClientOptions) -> Result<SdkConfig> {
    let logger = options.logger.as_ref();

    if options.region.is_empty() {
        return Err(AwsError::Config("region is required".to_string()));
    }

    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(options.region.clone()));

    if options.retry_max_attempts > 0 || options.retry_mode.is_specified() {
        let provider_retry = aws_config::default_provider::retry_config::default_provider()
            .retry_config()
            .await;
        let retry = overlay_retry(
            provider_retry,
            options.retry_max_attempts,
            options.retry_mode,
        );
        if options.retry_max_attempts > 0 {
            logger.debug(
                "configured retry max attempts",
                &[("maxAttempts", &options.retry_max_attempts)],
            );
        }
        if options.retry_mode.is_specified() {
            logger.debug("configured retry mode", &[("mode", &options.retry_mode)]);
        }
        if options.retry_mode == RetryMode::Legacy {
            logger.debug("legacy retry mode is served by the standard strategy", &[]);
        }
        loader = loader.retry_config(retry);
    }

    if let Some(http_client) = &options.http_client {
        loader = loader.http_client(http_client.clone());
        logger.debug("using custom HTTP client", &[]);
    }

    if let Some(endpoint_url) = &options.endpoint_url {
        loader = loader.endpoint_url(endpoint_url.clone());
        logger.debug("using custom endpoint", &[("endpointUrl", endpoint_url)]);
    }

    if let Some(timeout) = options.operation_timeout {
        let timeouts = TimeoutConfig::builder().operation_timeout(timeout).build();
        loader = loader.timeout_config(timeouts);
        logger.debug(
            "configured operation timeout",
            &[("timeoutMs", &timeout.as_millis())],
        );
    }

    if let Some(provider) = &options.credentials_provider {
        loader = loader.credentials_provider(provider.clone());
        logger.debug("using explicit credentials provider", &[]);
    }

    let config = loader.load().await;

    let provider = config.credentials_provider().ok_or_else(|| {
        AwsError::Config("no credentials provider could be configured".to_string())
    })?;
    provider
        .provide_credentials()
        .await
        .map_err(AwsError::LoadCredentials)?;
    logger.debug("loaded AWS config from default credentials chain", &[]);

    Ok(config)
}

/// Override only the retry fields the caller set, keeping the rest of `base`.
///
/// `base` is the provider's retry configuration (environment, shared profile,
/// then SDK defaults), so an unset field keeps whatever the provider chose.
fn overlay_retry(base: RetryConfig, max_attempts: u32, mode: RetryMode) -> RetryConfig {
    let mut retry = base;
    if max_attempts > 0 {
        retry = retry.with_max_attempts(max_attempts);
    }
    if let Some(sdk_mode) = mode.sdk_mode() {
        retry = retry.with_retry_mode(sdk_mode);
    }
    retry
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_credential_types::provider::{error::CredentialsError, future};
    use aws_credential_types::Credentials;
    use aws_smithy_types::retry::RetryMode as SdkRetryMode;

    #[derive(Debug)]
    struct MissingCredentials;

    impl ProvideCredentials for MissingCredentials {
        fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
        where
            Self: 'a,
        {
            future::ProvideCredentials::ready(Err(CredentialsError::not_loaded(
                "no credentials in this environment",
            )))
        }
    }

    fn provider_retry() -> RetryConfig {
        RetryConfig::adaptive().with_max_attempts(7)
    }

    #[test]
    fn test_defaults() {
        let options = ClientOptions::new("eu-west-1");
        assert_eq!(options.region(), "eu-west-1");
        assert_eq!(options.assume_role_arn(), None);
        assert_eq!(options.retry_max_attempts, 0);
        assert_eq!(options.retry_mode, RetryMode::Unspecified);
        assert_eq!(options.role_session_name, DEFAULT_ROLE_SESSION_NAME);
        assert!(options.http_client.is_none());
        assert!(options.endpoint_url.is_none());
    }

    #[test]
    fn test_empty_role_arn_disables_assumption() {
        let options = ClientOptions::new("eu-west-1").with_assume_role_arn("");
        assert_eq!(options.assume_role_arn(), None);

        let options = options.with_assume_role_arn("arn:aws:iam::123456789012:role/deploy");
        assert_eq!(
            options.assume_role_arn(),
            Some("arn:aws:iam::123456789012:role/deploy")
        );
    }

    #[test]
    fn test_debug_hides_handles() {
        let options = ClientOptions::new("eu-west-1")
            .with_credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"));
        let rendered = format!("{options:?}");
        assert!(rendered.contains("credentials_provider: true"));
        assert!(!rendered.contains("SECRET"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_region() {
        let result = resolve(&ClientOptions::new("")).await;
        assert!(matches!(result, Err(AwsError::Config(_))));
    }

    #[tokio::test]
    async fn test_resolve_with_explicit_credentials() {
        let options = ClientOptions::new("ap-southeast-2")
            .with_credentials_provider(Credentials::new("AKID", "SECRET", None, None, "test"));
        let config = resolve(&options).await.unwrap();
        assert_eq!(config.region().unwrap().as_ref(), "ap-southeast-2");
    }

    #[test]
    fn test_overlay_attempts_keeps_provider_mode() {
        let retry = overlay_retry(provider_retry(), 5, RetryMode::Unspecified);
        assert_eq!(retry.mode(), SdkRetryMode::Adaptive);
        assert_eq!(retry.max_attempts(), 5);
    }

    #[test]
    fn test_overlay_mode_keeps_provider_attempts() {
        let retry = overlay_retry(provider_retry(), 0, RetryMode::Standard);
        assert_eq!(retry.mode(), SdkRetryMode::Standard);
        assert_eq!(retry.max_attempts(), 7);

        let retry = overlay_retry(provider_retry(), 0, RetryMode::Legacy);
        assert_eq!(retry.mode(), SdkRetryMode::Standard);
        assert_eq!(retry.max_attempts(), 7);
    }

    #[test]
    fn test_overlay_nothing_set_keeps_provider_config() {
        let retry = overlay_retry(provider_retry(), 0, RetryMode::Unspecified);
        assert_eq!(retry, provider_retry());
    }

    #[tokio::test]
    async fn test_resolve_reports_unresolvable_credentials() {
        let options = ClientOptions::new("eu-west-1").with_credentials_provider(MissingCredentials);
        match resolve(&options).await {
            Err(AwsError::LoadCredentials(err)) => {
                assert!(matches!(err, CredentialsError::CredentialsNotLoaded(_)));
            }
            other => panic!("expected credential load failure, got {other:?}"),
        }
    }
}
