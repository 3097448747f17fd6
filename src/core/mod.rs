pub mod evaluation;
pub mod filter;
pub mod input_descriptor;
pub mod mapper;
pub mod matcher;
pub mod path;
pub mod presentation;
pub mod presentation_definition;
pub mod presentation_submission;
