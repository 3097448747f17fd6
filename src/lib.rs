//! This library implements the verifier-side core of a [Presentation
//! Exchange] credential verification flow: given an encoded verification
//! submission and the presentation definition it was produced against, it
//! decides which submitted credentials satisfy which policy slots and
//! produces a structured, auditable evaluation report.
//!
//! [Presentation Exchange]: <https://identity.foundation/presentation-exchange/spec/v1.0.0/>
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use pex_verify::core::presentation::JsonPresentationDecoder;
//! use pex_verify::processor::SubmissionProcessor;
//! use pex_verify::revocation::{ReqwestClient, StatusListChecker};
//!
//! let processor = SubmissionProcessor::builder()
//!     .with_decoder(Arc::new(JsonPresentationDecoder))
//!     .with_revocation_checker(Arc::new(StatusListChecker::new(Arc::new(
//!         ReqwestClient::new()?,
//!     ))))
//!     .build()?;
//!
//! let processed = processor
//!     .process(&encoded_submission, Some(&presentation_definition))
//!     .await?;
//!
//! for check in processed.evaluations() {
//!     if !check.is_satisfied() {
//!         println!("descriptor {} was not satisfied", check.descriptor_id());
//!     }
//! }
//! ```
//!
//! # Processing pipeline
//!
//! Here is an overview of one verification call, referencing the types and
//! methods implementing each step.
//!
//! 1. *Shape validation*: the encoded submission must carry both a
//!    `presentation_submission` section and a `presentation` section;
//!    anything else fails with a typed
//!    [`ProcessError`](processor::ProcessError) before any work happens.
//! 2. *Decoding*: the `presentation` section is opened by a
//!    [`PresentationDecoder`](core::presentation::PresentationDecoder)
//!    collaborator. Envelope parsing and signature verification live behind
//!    that trait, outside this crate.
//! 3. *Revocation gate*: every credential in the decoded presentation is
//!    checked through a
//!    [`RevocationChecker`](revocation::RevocationChecker); one revoked
//!    credential aborts the submission (fail closed, see
//!    [`RevocationGate`](revocation::RevocationGate)).
//! 4. *Mapping*: the submission's descriptor map is resolved by the
//!    [`SubmissionMapper`](core::mapper::SubmissionMapper), bucketing the
//!    submitted credentials by the schema URI of the input descriptor each
//!    entry names.
//! 5. *Matching*: the
//!    [`InputDescriptorMatcher`](core::matcher::InputDescriptorMatcher)
//!    evaluates every input descriptor against its candidate credentials.
//!    Field constraints are evaluated path-alternative by path-alternative,
//!    first success wins, with an all-or-nothing short-circuit per
//!    candidate; every outcome is recorded as evaluation data rather than
//!    an error.
//! 6. *Assembly*: the decoded presentation, the ordered
//!    [`ValidationCheck`](core::evaluation::ValidationCheck) list, and the
//!    submission's descriptor map become the returned
//!    [`ProcessedVerificationSubmission`](core::evaluation::ProcessedVerificationSubmission),
//!    the durable audit artifact of the call.
//!
//! # Pluggable capabilities
//!
//! The structured-query engine
//! ([`PathQuery`](core::path::PathQuery), default: `serde_json_path`) and
//! the filter validator
//! ([`FilterValidator`](core::filter::FilterValidator), default:
//! `jsonschema`) are narrow traits, swappable without touching the matching
//! logic. Per-path and per-filter failures are absorbed into the evaluation
//! trail and logged, never surfaced as errors.

pub mod core;
pub mod processor;
pub mod revocation;
pub mod utils;

pub use crate::core::evaluation::ProcessedVerificationSubmission;
pub use crate::core::presentation_definition::PresentationDefinition;
pub use crate::core::presentation_submission::PresentationSubmission;
pub use crate::processor::{ProcessError, SubmissionProcessor};
pub use serde_json_path::JsonPath;
