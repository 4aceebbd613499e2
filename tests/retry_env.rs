//! Retry settings from the environment survive partial overrides.
//!
//! Kept in its own test binary because it mutates process environment.

use aws_credential_types::Credentials;
use aws_smithy_types::retry::RetryMode as SdkRetryMode;

use aws_secrets_bootstrap::{resolve, ClientOptions, RetryMode};

fn options() -> ClientOptions {
    ClientOptions::new("us-east-1").with_credentials_provider(Credentials::new(
        "AKIDENVEXAMPLE",
        "envSecretExample",
        None,
        None,
        "test",
    ))
}

async fn retry_for(options: ClientOptions) -> (SdkRetryMode, u32) {
    let config = resolve(&options).await.unwrap();
    let retry = config.retry_config().unwrap();
    (retry.mode(), retry.max_attempts())
}

#[tokio::test]
async fn test_environment_retry_settings_survive_partial_overrides() {
    std::env::set_var("AWS_RETRY_MODE", "adaptive");
    std::env::set_var("AWS_MAX_ATTEMPTS", "7");

    assert_eq!(retry_for(options()).await, (SdkRetryMode::Adaptive, 7));
    assert_eq!(
        retry_for(options().with_retry_max_attempts(5)).await,
        (SdkRetryMode::Adaptive, 5)
    );
    assert_eq!(
        retry_for(options().with_retry_mode(RetryMode::Standard)).await,
        (SdkRetryMode::Standard, 7)
    );
    assert_eq!(
        retry_for(
            options()
                .with_retry_max_attempts(2)
                .with_retry_mode(RetryMode::Legacy)
        )
        .await,
        (SdkRetryMode::Standard, 2)
    );

    std::env::remove_var("AWS_RETRY_MODE");
    std::env::remove_var("AWS_MAX_ATTEMPTS");
}
