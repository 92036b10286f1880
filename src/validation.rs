//! Logical path validation
//!
//! Callers address collections and records with logical paths like
//! `posts` or `posts/<id>`. Every segment is validated before touching
//! the filesystem so a crafted path can never escape the store root.

use thiserror::Error;

/// Validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid path segment '{0}': {1}")]
    InvalidSegment(String, &'static str),

    #[error("Path cannot be empty")]
    Empty,

    #[error("Reserved name: '{0}'")]
    Reserved(String),
}

/// Maximum length for a single path segment
pub const MAX_SEGMENT_LENGTH: usize = 255;

/// Reserved names that cannot be used as segments
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul",
    "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8", "com9",
    "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validate a logical store path (`posts`, `posts/<id>`, `meta/site`)
///
/// Rules per segment:
/// - 1-255 characters
/// - Only alphanumeric, underscore, and hyphen allowed
/// - Cannot start with a hyphen or underscore
/// - Cannot be a reserved name (case-insensitive)
pub fn validate_logical_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::Empty);
    }

    if path.starts_with('/') || path.ends_with('/') {
        return Err(ValidationError::InvalidSegment(
            path.to_string(),
            "cannot start or end with a separator",
        ));
    }

    for segment in path.split('/') {
        validate_segment(segment)?;
    }

    Ok(())
}

/// Validate a single path segment
pub fn validate_segment(segment: &str) -> Result<(), ValidationError> {
    if segment.is_empty() {
        return Err(ValidationError::Empty);
    }

    if segment.len() > MAX_SEGMENT_LENGTH {
        return Err(ValidationError::InvalidSegment(
            segment.to_string(),
            "exceeds maximum length",
        ));
    }

    for (i, c) in segment.chars().enumerate() {
        if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
            return Err(ValidationError::InvalidSegment(
                segment.to_string(),
                "contains invalid characters (only alphanumeric, underscore, and hyphen allowed)",
            ));
        }
        if i == 0 && (c == '-' || c == '_') {
            return Err(ValidationError::InvalidSegment(
                segment.to_string(),
                "cannot start with hyphen or underscore",
            ));
        }
    }

    if RESERVED_NAMES.contains(&segment.to_lowercase().as_str()) {
        return Err(ValidationError::Reserved(segment.to_string()));
    }

    Ok(())
}
