use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

/// A decoded verifiable presentation.
///
/// The wire envelope (JWT, JSON-LD proof, ...) has already been opened and
/// verified by the [PresentationDecoder] collaborator; what remains is the
/// holder's claim data: the ordered list of embedded credentials plus any
/// other envelope members, retained verbatim for the audit record.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    holder: Option<String>,
    #[serde(default, rename = "verifiableCredential")]
    verifiable_credential: Vec<Json>,
    #[serde(flatten)]
    additional_properties: Map<String, Json>,
}

impl Presentation {
    /// Create a new presentation from its embedded credentials.
    pub fn new(verifiable_credential: Vec<Json>) -> Self {
        Self {
            holder: None,
            verifiable_credential,
            additional_properties: Map::new(),
        }
    }

    /// Return the holder of the presentation, if any.
    pub fn holder(&self) -> Option<&String> {
        self.holder.as_ref()
    }

    /// Return the embedded credentials, in submission order.
    pub fn verifiable_credentials(&self) -> &[Json] {
        &self.verifiable_credential
    }
}

/// Presentation decoding collaborator.
///
/// Parsing and verifying the wire-level presentation envelope is not this
/// crate's concern; different applications support different envelope
/// formats, so this trait abstracts the decoding capability. Decoding
/// failures propagate to the caller as decode errors and are not retried.
#[async_trait]
pub trait PresentationDecoder {
    /// Decode the `presentation` section of a verification submission.
    async fn decode(&self, value: &Json) -> Result<Presentation>;
}

/// Decoder for submissions whose presentation section is already a plain
/// JSON presentation object.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPresentationDecoder;

#[async_trait]
impl PresentationDecoder for JsonPresentationDecoder {
    async fn decode(&self, value: &Json) -> Result<Presentation> {
        serde_json::from_value(value.clone()).context("presentation section is not a valid presentation object")
    }
}

/// Decoder for submissions carrying the presentation as a compact JWS
/// (`header.payload.signature`).
///
/// Only the claim data is extracted here: the payload is base64url-decoded
/// and the `vp` claim (or, absent one, the payload itself) is read as the
/// presentation. Signature verification is the responsibility of the
/// surrounding service and MUST have happened before processing.
#[derive(Debug, Default, Clone, Copy)]
pub struct JwtPresentationDecoder;

#[async_trait]
impl PresentationDecoder for JwtPresentationDecoder {
    async fn decode(&self, value: &Json) -> Result<Presentation> {
        let Some(compact) = value.as_str() else {
            bail!("expected the presentation section to be a compact JWS string")
        };

        let mut segments = compact.split('.');
        let (Some(_headers), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            bail!("presentation JWS does not have exactly three segments")
        };

        let payload_bytes = BASE64_URL_SAFE_NO_PAD
            .decode(payload)
            .context("presentation JWS payload was not valid base64url")?;

        let claims: Json = serde_json::from_slice(&payload_bytes)
            .context("presentation JWS payload was not valid JSON")?;

        let presentation = claims.get("vp").unwrap_or(&claims);

        serde_json::from_value(presentation.clone())
            .context("presentation JWS claims did not contain a valid presentation")
    }
}
