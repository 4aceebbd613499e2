//! CLI binary for the aws-secrets-bootstrap crate.

use std::io::{self, Write};
use std::process::ExitCode;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aws_secrets_bootstrap::{AwsClient, AwsError, ClientOptions, RetryMode, SecretPayload};

/// Environment variable consulted when `--region` is absent.
const REGION_ENV: &str = "AWS_REGION";

#[derive(Parser)]
#[command(name = "aws-secrets")]
#[command(
    author,
    version,
    about = "Bootstrap an AWS session and read secrets from Secrets Manager"
)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SessionArgs {
    /// AWS region (falls back to AWS_REGION)
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Role to assume after loading the default credentials
    #[arg(long, global = true)]
    assume_role_arn: Option<String>,

    /// Maximum attempts per call (0 keeps the SDK default)
    #[arg(long, global = true, default_value_t = 0)]
    retry_max_attempts: u32,

    /// Retry mode: standard, adaptive, or legacy
    #[arg(long, global = true)]
    retry_mode: Option<RetryMode>,

    /// Override the service endpoint (e.g. LocalStack)
    #[arg(long, global = true)]
    endpoint_url: Option<String>,

    /// Per-operation timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identity behind the resolved credentials
    Whoami,

    /// Fetch the latest value of a secret
    Get {
        /// Secret name or ARN
        secret_id: String,

        /// Output format: text, base64, json, or raw
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// How `get` writes a secret to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Text payloads as-is; binary payloads are refused.
    #[default]
    Text,
    /// Base64 of the payload bytes, text or binary.
    Base64,
    /// Payload decoded as JSON and pretty-printed.
    Json,
    /// Payload bytes unchanged, no trailing newline.
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "base64" | "b64" => Ok(OutputFormat::Base64),
            "json" => Ok(OutputFormat::Json),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!(
                "unknown format: {} (expected text, base64, json, or raw)",
                s
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Aws(#[from] AwsError),

    #[error("secret {0} holds a binary value; use --format base64 or --format raw")]
    BinaryAsText(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

impl SessionArgs {
    fn into_options(self) -> ClientOptions {
        let region = self
            .region
            .or_else(|| std::env::var(REGION_ENV).ok())
            .unwrap_or_default();
        let mut options = ClientOptions::new(region)
            .with_retry_max_attempts(self.retry_max_attempts)
            .with_retry_mode(self.retry_mode.unwrap_or_default());
        if let Some(role_arn) = self.assume_role_arn {
            options = options.with_assume_role_arn(role_arn);
        }
        if let Some(url) = self.endpoint_url {
            options = options.with_endpoint_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            options = options.with_operation_timeout(Duration::from_secs(secs));
        }
        options
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = AwsClient::new(cli.session.into_options()).await?;

    match cli.command {
        Commands::Whoami => {
            let identity = client.caller_identity().await?;
            println!("account: {}", identity.account.as_deref().unwrap_or("-"));
            println!("arn:     {}", identity.arn.as_deref().unwrap_or("-"));
            println!("user id: {}", identity.user_id.as_deref().unwrap_or("-"));
            Ok(())
        }

        Commands::Get { secret_id, format } => {
            let payload = client.secret_payload(&secret_id).await?;
            let rendered = render(&secret_id, &payload, format)?;
            io::stdout().write_all(&rendered)?;
            Ok(())
        }
    }
}

/// Render a fetched payload in the requested format.
fn render(
    secret_id: &str,
    payload: &SecretPayload,
    format: OutputFormat,
) -> Result<Vec<u8>, CliError> {
    let line = |s: String| format!("{s}\n").into_bytes();
    match (format, payload) {
        (OutputFormat::Text, SecretPayload::Text(text)) => Ok(line(text.clone())),
        (OutputFormat::Text, SecretPayload::Binary(_)) => {
            Err(CliError::BinaryAsText(secret_id.to_string()))
        }
        (OutputFormat::Base64, payload) => Ok(line(STANDARD.encode(payload.as_bytes()))),
        (OutputFormat::Json, payload) => {
            let value: serde_json::Value = payload.decode_json(secret_id)?;
            Ok(line(serde_json::to_string_pretty(&value)?))
        }
        (OutputFormat::Raw, payload) => Ok(payload.as_bytes().to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("TEXT".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("b64".parse::<OutputFormat>(), Ok(OutputFormat::Base64));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_text_refuses_binary_payload() {
        let payload = SecretPayload::Binary(vec![0xde, 0xad]);
        let err = render("app/blob", &payload, OutputFormat::Text).unwrap_err();
        assert!(matches!(err, CliError::BinaryAsText(ref id) if id == "app/blob"));

        let encoded = render("app/blob", &payload, OutputFormat::Base64).unwrap();
        assert_eq!(encoded, b"3q0=\n");
        let raw = render("app/blob", &payload, OutputFormat::Raw).unwrap();
        assert_eq!(raw, vec![0xde, 0xad]);
    }

    #[test]
    fn test_text_and_json_output() {
        let payload = SecretPayload::Text("{\"k\":1}".to_string());
        let text = render("app/config", &payload, OutputFormat::Text).unwrap();
        assert_eq!(text, b"{\"k\":1}\n");

        let json = render("app/config", &payload, OutputFormat::Json).unwrap();
        assert_eq!(String::from_utf8(json).unwrap(), "{\n  \"k\": 1\n}\n");
    }

    #[test]
    fn test_json_reports_decode_failure() {
        let payload = SecretPayload::Text("not json".to_string());
        let err = render("app/config", &payload, OutputFormat::Json).unwrap_err();
        assert!(matches!(err, CliError::Aws(AwsError::Decode { .. })));
    }
}
