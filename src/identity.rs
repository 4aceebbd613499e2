//! Caller identity verification.

use std::fmt;

use aws_sdk_sts::operation::get_caller_identity::GetCallerIdentityOutput;
use aws_sdk_sts::Client as StsClient;

use crate::error::{sdk_failure, AwsError, Result};
use crate::logger::Logger;

/// Principal behind the credentials in use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerIdentity {
    /// Account that owns the principal.
    pub account: Option<String>,
    /// ARN of the principal.
    pub arn: Option<String>,
    /// Unique identifier of the principal.
    pub user_id: Option<String>,
}

impl From<GetCallerIdentityOutput> for CallerIdentity {
    fn from(output: GetCallerIdentityOutput) -> Self {
        Self {
            account: output.account().map(str::to_string),
            arn: output.arn().map(str::to_string),
            user_id: output.user_id().map(str::to_string),
        }
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "account={} arn={} userId={}",
            self.account.as_deref().unwrap_or("-"),
            self.arn.as_deref().unwrap_or("-"),
            self.user_id.as_deref().unwrap_or("-"),
        )
    }
}

/// Ask the identity service who the current credentials belong to.
pub(crate) async fn caller_identity(sts: &StsClient) -> Result<CallerIdentity> {
    let output = sts.get_caller_identity().send().await.map_err(|err| {
        let (message, source) = sdk_failure(err);
        AwsError::CallerIdentity { message, source }
    })?;
    Ok(output.into())
}

/// Confirm the credentials are usable before the client is handed out.
pub async fn verify(sts: &StsClient, logger: &dyn Logger) -> Result<CallerIdentity> {
    let identity = caller_identity(sts).await?;
    logger.debug("caller identity", &[("identity", &identity)]);
    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_output() {
        let output = GetCallerIdentityOutput::builder()
            .account("123456789012")
            .arn("arn:aws:iam::123456789012:user/alice")
            .user_id("AIDAEXAMPLE")
            .build();

        let identity = CallerIdentity::from(output);

        assert_eq!(identity.account.as_deref(), Some("123456789012"));
        assert_eq!(
            identity.arn.as_deref(),
            Some("arn:aws:iam::123456789012:user/alice")
        );
        assert_eq!(identity.user_id.as_deref(), Some("AIDAEXAMPLE"));
    }

    #[test]
    fn test_display_marks_missing_fields() {
        let identity = CallerIdentity {
            account: Some("123456789012".into()),
            ..Default::default()
        };
        assert_eq!(identity.to_string(), "account=123456789012 arn=- userId=-");
    }
}
