//! Field validation for band creation.
//!
//! Each rule is an explicit function returning a per-field error; the
//! aggregate step collects every failure so the caller sees all problems
//! at once rather than the first one.

use serde::Serialize;
use thiserror::Error;

use crate::models::CreateBand;

/// A single failed field with a human-readable message.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// The aggregate of every failed field in one payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed for {} field(s)", fields.len())]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn validate_name(name: &str) -> Result<(), FieldError> {
    if name.trim().is_empty() {
        return Err(FieldError {
            field: "name",
            message: "name must be a non-empty string".to_string(),
        });
    }
    Ok(())
}

fn validate_members(members: &[String]) -> Result<(), FieldError> {
    if members.is_empty() {
        return Err(FieldError {
            field: "members",
            message: "members must contain at least one entry".to_string(),
        });
    }
    if members.iter().any(|member| member.trim().is_empty()) {
        return Err(FieldError {
            field: "members",
            message: "members must not contain empty entries".to_string(),
        });
    }
    Ok(())
}

fn validate_albums(albums: i64) -> Result<(), FieldError> {
    if albums <= 0 {
        return Err(FieldError {
            field: "albums",
            message: "albums must be a positive integer".to_string(),
        });
    }
    Ok(())
}

/// Runs every field rule against the payload.
pub fn validate(band: &CreateBand) -> Result<(), ValidationError> {
    let fields: Vec<FieldError> = [
        validate_name(&band.name),
        validate_members(&band.members),
        validate_albums(band.albums),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect();

    if fields.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { fields })
    }
}
