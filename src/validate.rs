//! Resume validation against the embedded JSON Resume schema.
//!
//! Validation is a collaborator of the renderer, not part of it: themes
//! receive the document untouched whether or not it validates. The CLI runs
//! this for the `validate` command only.

use crate::{Error, Result, Resume, ValidationIssue};

/// JSON Resume schema embedded at compile time
const SCHEMA: &str = include_str!("../resources/resume.schema.json");

/// Validate a resume against the schema.
///
/// Returns `Ok(())` on success, or [`Error::Validation`] carrying one
/// [`ValidationIssue`] per violation, each with a human-readable message and
/// the JSON Pointer of the offending field.
pub fn validate(resume: &Resume) -> Result<()> {
    let schema: serde_json::Value = serde_json::from_str(SCHEMA)
        .map_err(|e| schema_issue(format!("embedded schema is not valid JSON: {}", e)))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| schema_issue(format!("embedded schema did not compile: {}", e)))?;

    let issues: Vec<ValidationIssue> = validator
        .iter_errors(resume)
        .map(|e| ValidationIssue {
            message: e.to_string(),
            path: e.instance_path.to_string(),
        })
        .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(issues))
    }
}

fn schema_issue(message: String) -> Error {
    Error::Validation(vec![ValidationIssue {
        message,
        path: String::new(),
    }])
}
