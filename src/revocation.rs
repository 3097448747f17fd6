use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::prelude::*;
use http::{Request, Response};
use serde::Deserialize;
use serde_json::Value as Json;
use url::Url;

use crate::core::presentation::Presentation;

/// At least one credential in the presentation is revoked.
///
/// Fatal to the verification attempt; the submission is not retried.
#[derive(Debug, thiserror::Error)]
#[error("one or more credentials in the presentation have been revoked")]
pub struct RevokedCredentialsError;

/// Revocation-status lookup collaborator.
///
/// The lookup may be a remote call (e.g. fetching a status list credential)
/// or a local registry check; either way it is outside this crate's matching
/// core.
#[async_trait]
pub trait RevocationChecker {
    /// Returns whether `credential` has been revoked by its issuer.
    async fn is_revoked(&self, credential: &Json) -> Result<bool>;
}

/// Pre-filters a presentation's credentials, aborting the submission if any
/// is revoked.
///
/// Fails closed: a status lookup that itself errors counts as revoked. The
/// gate is a trust decision, and an unverifiable status must not admit a
/// credential.
#[derive(Clone)]
pub struct RevocationGate {
    checker: Arc<dyn RevocationChecker + Send + Sync>,
}

impl RevocationGate {
    /// Create a new gate over the given status checker.
    pub fn new(checker: Arc<dyn RevocationChecker + Send + Sync>) -> Self {
        Self { checker }
    }

    /// Check every credential in the presentation, in submission order,
    /// short-circuiting on the first revoked one.
    pub async fn check(&self, presentation: &Presentation) -> Result<(), RevokedCredentialsError> {
        for credential in presentation.verifiable_credentials() {
            let revoked = match self.checker.is_revoked(credential).await {
                Ok(revoked) => revoked,
                Err(error) => {
                    tracing::warn!(%error, "revocation status lookup failed, failing closed");
                    true
                }
            };

            if revoked {
                return Err(RevokedCredentialsError);
            }
        }

        Ok(())
    }
}

/// Generic HTTP client.
///
/// A trait is used here so to facilitate native HTTP/TLS when compiled for
/// mobile applications.
#[async_trait]
pub trait AsyncHttpClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>>;
}

#[derive(Debug)]
pub struct ReqwestClient(reqwest::Client);

impl AsRef<reqwest::Client> for ReqwestClient {
    fn as_ref(&self) -> &reqwest::Client {
        &self.0
    }
}

impl ReqwestClient {
    pub fn new() -> Result<Self> {
        reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("unable to build http_client")
            .map(Self)
    }
}

#[async_trait]
impl AsyncHttpClient for ReqwestClient {
    async fn execute(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let response = self
            .0
            .execute(request.try_into().context("unable to convert request")?)
            .await
            .context("http request failed")?;

        let mut builder = Response::builder()
            .status(response.status())
            .version(response.version());

        builder
            .extensions_mut()
            .context("unable to set extensions")?
            .extend(response.extensions().clone());

        builder
            .headers_mut()
            .context("unable to set headers")?
            .extend(response.headers().clone());

        builder
            .body(
                response
                    .bytes()
                    .await
                    .context("failed to extract response body")?
                    .to_vec(),
            )
            .context("unable to construct response")
    }
}

/// The `credentialStatus` entry of a status-list credential, naming the list
/// that carries this credential's revocation bit.
///
/// See: <https://w3c-ccg.github.io/vc-status-list-2021/#statuslist2021entry>
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusListEntry {
    status_list_credential: Url,
    status_list_index: StatusListIndex,
}

/// Integer identifying a bit position in a status list.
///
/// Issuers serialize the index as either a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Json")]
struct StatusListIndex(usize);

impl TryFrom<Json> for StatusListIndex {
    type Error = anyhow::Error;

    fn try_from(value: Json) -> Result<Self> {
        match value {
            Json::Number(n) => n
                .as_u64()
                .map(|n| Self(n as usize))
                .ok_or_else(|| anyhow!("status list index is not a non-negative integer")),
            Json::String(s) => s
                .parse()
                .map(Self)
                .context("status list index string is not a non-negative integer"),
            other => bail!("status list index has unexpected type: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusListCredential {
    credential_subject: StatusListSubject,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusListSubject {
    encoded_list: EncodedList,
}

/// A base64url-encoded bitstring; bit N is the revocation status of the
/// credential with status list index N (least significant bit first within
/// each byte).
#[derive(Debug, Clone, Deserialize)]
struct EncodedList(String);

impl EncodedList {
    fn bit(&self, index: usize) -> Result<bool> {
        let bytes = BASE64_URL_SAFE_NO_PAD
            .decode(&self.0)
            .context("status list is not valid base64url")?;

        let byte = bytes
            .get(index / 8)
            .ok_or_else(|| anyhow!("status list index {index} is out of range"))?;

        Ok(byte >> (index % 8) & 1 == 1)
    }
}

/// Status-list revocation checker.
///
/// Reads the credential's `credentialStatus` entry, fetches the named status
/// list credential over HTTP, and tests the bit at the entry's index. A
/// credential without a `credentialStatus` entry is not revocable and is
/// reported as not revoked.
pub struct StatusListChecker {
    http_client: Arc<dyn AsyncHttpClient + Send + Sync>,
}

impl StatusListChecker {
    /// Create a new checker over the given HTTP client.
    pub fn new(http_client: Arc<dyn AsyncHttpClient + Send + Sync>) -> Self {
        Self { http_client }
    }

    async fn fetch_status_list(&self, url: &Url) -> Result<StatusListCredential> {
        let request = Request::builder()
            .method("GET")
            .uri(url.as_str())
            .header("Accept", "application/json")
            .body(Vec::new())
            .context("unable to build status list request")?;

        let response = self.http_client.execute(request).await?;

        if !response.status().is_success() {
            bail!(
                "status list request to {url} failed with status {}",
                response.status()
            )
        }

        serde_json::from_slice(response.body())
            .context("status list response is not a valid status list credential")
    }
}

#[async_trait]
impl RevocationChecker for StatusListChecker {
    async fn is_revoked(&self, credential: &Json) -> Result<bool> {
        let Some(status) = credential.get("credentialStatus") else {
            return Ok(false);
        };

        let entry: StatusListEntry = serde_json::from_value(status.clone())
            .context("credential carries a malformed credentialStatus entry")?;

        let status_list = self.fetch_status_list(&entry.status_list_credential).await?;

        status_list
            .credential_subject
            .encoded_list
            .bit(entry.status_list_index.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticHttpClient {
        body: Json,
    }

    #[async_trait]
    impl AsyncHttpClient for StaticHttpClient {
        async fn execute(&self, _request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
            Response::builder()
                .status(200)
                .body(serde_json::to_vec(&self.body)?)
                .context("unable to construct response")
        }
    }

    fn status_list_checker(bytes: &[u8]) -> StatusListChecker {
        let body = json!({
            "credentialSubject": {
                "type": "StatusList2021",
                "encodedList": BASE64_URL_SAFE_NO_PAD.encode(bytes),
            }
        });
        StatusListChecker::new(Arc::new(StaticHttpClient { body }))
    }

    fn credential_with_index(index: usize) -> Json {
        json!({
            "credentialSubject": { "id": "did:example:subject" },
            "credentialStatus": {
                "type": "StatusList2021Entry",
                "statusListCredential": "https://issuer.example.com/status/1",
                "statusListIndex": index.to_string(),
            }
        })
    }

    #[tokio::test]
    async fn set_bit_means_revoked() {
        // Bit 9 set: second byte, second-least-significant position.
        let checker = status_list_checker(&[0b0000_0000, 0b0000_0010]);
        assert!(checker.is_revoked(&credential_with_index(9)).await.unwrap());
        assert!(!checker.is_revoked(&credential_with_index(8)).await.unwrap());
    }

    #[tokio::test]
    async fn out_of_range_index_is_an_error() {
        let checker = status_list_checker(&[0x00]);
        assert!(checker.is_revoked(&credential_with_index(64)).await.is_err());
    }

    #[tokio::test]
    async fn credential_without_status_is_not_revocable() {
        let checker = status_list_checker(&[0xFF]);
        let credential = json!({ "credentialSubject": { "id": "did:example:subject" } });
        assert!(!checker.is_revoked(&credential).await.unwrap());
    }

    struct StaticChecker(Vec<Result<bool, ()>>);

    #[async_trait]
    impl RevocationChecker for StaticChecker {
        async fn is_revoked(&self, credential: &Json) -> Result<bool> {
            let index = credential["index"].as_u64().unwrap() as usize;
            match self.0[index] {
                Ok(revoked) => Ok(revoked),
                Err(()) => bail!("status endpoint unreachable"),
            }
        }
    }

    fn presentation(count: usize) -> Presentation {
        Presentation::new((0..count).map(|index| json!({ "index": index })).collect())
    }

    #[tokio::test]
    async fn gate_passes_when_nothing_is_revoked() {
        let gate = RevocationGate::new(Arc::new(StaticChecker(vec![Ok(false), Ok(false)])));
        assert!(gate.check(&presentation(2)).await.is_ok());
    }

    #[tokio::test]
    async fn gate_rejects_on_any_revoked_credential() {
        let gate =
            RevocationGate::new(Arc::new(StaticChecker(vec![Ok(false), Ok(true), Ok(false)])));
        assert!(gate.check(&presentation(3)).await.is_err());
    }

    #[tokio::test]
    async fn gate_fails_closed_on_lookup_error() {
        let gate = RevocationGate::new(Arc::new(StaticChecker(vec![Err(())])));
        assert!(gate.check(&presentation(1)).await.is_err());
    }
}
