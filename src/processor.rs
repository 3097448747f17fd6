use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::Value as Json;

use crate::core::evaluation::ProcessedVerificationSubmission;
use crate::core::filter::{FilterValidator, SchemaFilter};
use crate::core::mapper::SubmissionMapper;
use crate::core::matcher::{
    DescriptorEvaluator, FieldConstraintEvaluator, InputDescriptorMatcher,
};
use crate::core::path::{JsonPathQuery, PathQuery};
use crate::core::presentation::PresentationDecoder;
use crate::core::presentation_definition::PresentationDefinition;
use crate::core::presentation_submission::PresentationSubmission;
use crate::revocation::{RevocationChecker, RevocationGate, RevokedCredentialsError};

/// A verification submission could not be processed.
///
/// Only these variants cross the processing boundary; per-path and
/// per-filter failures are absorbed into the evaluation trail so a caller
/// can distinguish "credential doesn't satisfy policy" (a normal,
/// fully-described result) from "the request itself was invalid" (one of
/// these errors).
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// No presentation definition is registered for the submission's
    /// declared policy. Fatal; not retried.
    #[error("no presentation definition was supplied for this submission")]
    MissingPolicy,

    /// The submission lacks a required top-level section or carries a
    /// malformed one. Fatal; the caller must resubmit corrected input.
    #[error("submission is malformed: {0}")]
    MalformedSubmission(String),

    /// At least one supplied credential is revoked.
    #[error(transparent)]
    RevokedCredentials(#[from] RevokedCredentialsError),

    /// The presentation decoding collaborator failed; not retried here.
    #[error("presentation decoding failed: {0}")]
    Decoding(#[source] anyhow::Error),
}

impl ProcessError {
    /// Short, user-facing title for the error; [`std::fmt::Display`] carries
    /// the full explanation.
    pub fn title(&self) -> &'static str {
        match self {
            ProcessError::MissingPolicy => "Missing presentation definition",
            ProcessError::MalformedSubmission(_) => "Malformed submission",
            ProcessError::RevokedCredentials(_) => "Revoked credentials",
            ProcessError::Decoding(_) => "Presentation decoding failed",
        }
    }
}

/// Top-level orchestration of one verification submission.
///
/// Validates the submission's shape, decodes the embedded presentation,
/// gates on revocation status, buckets the submitted credentials by schema
/// URI, evaluates every input descriptor, and assembles the audit artifact.
/// Steps execute strictly in that order; failure at any step aborts the
/// remaining pipeline and no step is retried.
#[derive(Clone)]
pub struct SubmissionProcessor {
    decoder: Arc<dyn PresentationDecoder + Send + Sync>,
    revocation: RevocationGate,
    mapper: SubmissionMapper,
    matcher: InputDescriptorMatcher,
}

impl SubmissionProcessor {
    /// Build a new submission processor.
    pub fn builder() -> SubmissionProcessorBuilder {
        SubmissionProcessorBuilder::default()
    }

    /// Process `encoded_submission` against `definition`.
    pub async fn process(
        &self,
        encoded_submission: &Json,
        definition: Option<&PresentationDefinition>,
    ) -> Result<ProcessedVerificationSubmission, ProcessError> {
        let definition = definition.ok_or(ProcessError::MissingPolicy)?;

        let submission_section =
            encoded_submission
                .get("presentation_submission")
                .ok_or_else(|| {
                    ProcessError::MalformedSubmission(
                        "missing required `presentation_submission` section".to_string(),
                    )
                })?;

        let presentation_section = encoded_submission.get("presentation").ok_or_else(|| {
            ProcessError::MalformedSubmission(
                "missing required `presentation` section".to_string(),
            )
        })?;

        let submission: PresentationSubmission =
            serde_json::from_value(submission_section.clone())
                .map_err(|e| ProcessError::MalformedSubmission(e.to_string()))?;

        let presentation = self
            .decoder
            .decode(presentation_section)
            .await
            .map_err(ProcessError::Decoding)?;

        self.revocation.check(&presentation).await?;

        let credentials_by_schema =
            self.mapper
                .map(encoded_submission, &submission, Some(definition));

        let evaluations = self
            .matcher
            .match_credentials(&credentials_by_schema, definition.input_descriptors());

        Ok(ProcessedVerificationSubmission::new(
            presentation,
            evaluations,
            submission.descriptor_map().to_vec(),
        ))
    }
}

/// Builder for [SubmissionProcessor].
///
/// A presentation decoder and a revocation checker are required; the query
/// engine and filter validator default to the shipped JSONPath and JSON
/// Schema implementations.
#[derive(Default)]
pub struct SubmissionProcessorBuilder {
    decoder: Option<Arc<dyn PresentationDecoder + Send + Sync>>,
    revocation: Option<Arc<dyn RevocationChecker + Send + Sync>>,
    query: Option<Arc<dyn PathQuery>>,
    filter: Option<Arc<dyn FilterValidator>>,
}

impl SubmissionProcessorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the presentation decoding collaborator.
    pub fn with_decoder(mut self, decoder: Arc<dyn PresentationDecoder + Send + Sync>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Set the revocation-status lookup collaborator.
    pub fn with_revocation_checker(
        mut self,
        checker: Arc<dyn RevocationChecker + Send + Sync>,
    ) -> Self {
        self.revocation = Some(checker);
        self
    }

    /// Override the structured-query engine.
    pub fn with_query_engine(mut self, query: Arc<dyn PathQuery>) -> Self {
        self.query = Some(query);
        self
    }

    /// Override the filter validator.
    pub fn with_filter_validator(mut self, filter: Arc<dyn FilterValidator>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn build(self) -> Result<SubmissionProcessor> {
        let Some(decoder) = self.decoder else {
            bail!("a presentation decoder is required, see `with_decoder`")
        };

        let Some(revocation) = self.revocation else {
            bail!("a revocation checker is required, see `with_revocation_checker`")
        };

        let query = self.query.unwrap_or_else(|| Arc::new(JsonPathQuery));
        let filter = self.filter.unwrap_or_else(|| Arc::new(SchemaFilter));

        Ok(SubmissionProcessor {
            decoder,
            revocation: RevocationGate::new(revocation),
            mapper: SubmissionMapper,
            matcher: InputDescriptorMatcher::new(DescriptorEvaluator::new(
                FieldConstraintEvaluator::new(query, filter),
            )),
        })
    }
}
