//! Latest-version secret retrieval and decoding.

use serde::de::DeserializeOwned;

use crate::client::AwsClient;
use crate::error::{sdk_failure, AwsError, Result};

/// Secret value as stored, tagged by its encoding at the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    /// Value stored as `SecretString`.
    Text(String),
    /// Value stored as `SecretBinary`.
    Binary(Vec<u8>),
}

impl SecretPayload {
    /// Pick the payload from the two store fields.
    ///
    /// Text wins whenever it is present, even when empty. A record with
    /// neither field set is a store-side anomaly and yields
    /// `AwsError::SecretEmpty`.
    pub fn select(secret_id: &str, text: Option<&str>, binary: Option<&[u8]>) -> Result<Self> {
        match (text, binary) {
            (Some(text), _) => Ok(SecretPayload::Text(text.to_string())),
            (None, Some(bytes)) => Ok(SecretPayload::Binary(bytes.to_vec())),
            (None, None) => Err(AwsError::SecretEmpty(secret_id.to_string())),
        }
    }

    /// Raw bytes of the payload.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SecretPayload::Text(text) => text.as_bytes(),
            SecretPayload::Binary(bytes) => bytes,
        }
    }

    /// Whether the value was stored as text.
    pub fn is_text(&self) -> bool {
        matches!(self, SecretPayload::Text(_))
    }

    /// Decode the payload as a JSON document.
    pub fn decode_json<T: DeserializeOwned>(&self, secret_id: &str) -> Result<T> {
        serde_json::from_slice(self.as_bytes()).map_err(|source| AwsError::Decode {
            secret_id: secret_id.to_string(),
            source,
        })
    }
}

impl AwsClient {
    /// Fetch the latest version of a secret without decoding it.
    ///
    /// `secret_id` may be a name or a full ARN.
    ///
    /// # Errors
    ///
    /// - `AwsError::SecretNotFound` if the store has no such secret
    /// - `AwsError::GetSecret` for any other retrieval failure
    /// - `AwsError::SecretEmpty` if the secret has neither a text nor a binary value
    pub async fn secret_payload(&self, secret_id: &str) -> Result<SecretPayload> {
        let output = self
            .secrets_client()
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .map_err(|err| {
                let not_found = err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception());
                let (message, source) = sdk_failure(err);
                if not_found {
                    AwsError::SecretNotFound {
                        secret_id: secret_id.to_string(),
                        source,
                    }
                } else {
                    AwsError::GetSecret {
                        secret_id: secret_id.to_string(),
                        message,
                        source,
                    }
                }
            })?;

        let payload = SecretPayload::select(
            secret_id,
            output.secret_string(),
            output.secret_binary().map(|blob| blob.as_ref()),
        )?;
        self.logger.debug(
            "fetched secret value",
            &[
                ("secretId", &secret_id),
                ("versionId", &output.version_id().unwrap_or("-")),
                ("encoding", &if payload.is_text() { "text" } else { "binary" }),
            ],
        );
        Ok(payload)
    }

    /// Fetch the latest version of a secret and decode it from JSON.
    ///
    /// # Errors
    ///
    /// Everything [`secret_payload`](Self::secret_payload) returns, plus
    /// `AwsError::Decode` if the payload does not match `T`.
    pub async fn secret_json<T: DeserializeOwned>(&self, secret_id: &str) -> Result<T> {
        self.secret_payload(secret_id).await?.decode_json(secret_id)
    }

    /// Decode the latest version of a secret into `dest`.
    ///
    /// `dest` is only written when fetching and decoding both succeed.
    pub async fn secret_json_into<T: DeserializeOwned>(
        &self,
        secret_id: &str,
        dest: &mut T,
    ) -> Result<()> {
        *dest = self.secret_json(secret_id).await?;
        Ok(())
    }
}
