//! Data validation utilities.
//!
//! Validates motion profile RON files beyond what parsing alone catches:
//! duplicate class ids, non-finite or negative tuning values, and powered
//! classes with no way to move.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use drift_core::profiles::{MotionModel, ProfileData};

/// Error type for data validation.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Directory or file missing.
    #[error("Path not found: {0}")]
    NotFound(String),
    /// Failed to read a file.
    #[error("Failed to read '{path}': {message}")]
    Read {
        /// Offending path.
        path: String,
        /// Error message.
        message: String,
    },
    /// Failed to parse RON.
    #[error("Failed to parse '{path}': {message}")]
    Parse {
        /// Offending path.
        path: String,
        /// Error message.
        message: String,
    },
    /// A profile definition is unusable.
    #[error("Invalid profile '{id}' in '{path}': {message}")]
    InvalidProfile {
        /// Class id.
        id: String,
        /// Offending path.
        path: String,
        /// What is wrong with it.
        message: String,
    },
}

/// Validate a single profile definition.
fn check_profile(profile: &ProfileData, path: &str) -> Result<(), ValidateError> {
    let fail = |message: String| ValidateError::InvalidProfile {
        id: profile.id.clone(),
        path: path.to_string(),
        message,
    };

    if profile.id.trim().is_empty() {
        return Err(fail("empty class id".to_string()));
    }

    for (name, value) in [
        ("max_speed", profile.max_speed),
        ("thrust_accel", profile.thrust_accel),
        ("rotation_speed", profile.rotation_speed),
    ] {
        if !value.is_finite() {
            return Err(fail(format!("{name} is not finite")));
        }
        if value < 0.0 {
            return Err(fail(format!("{name} is negative ({value})")));
        }
    }

    if profile.max_speed == 0.0 {
        return Err(fail("max_speed must be positive".to_string()));
    }

    if profile.motion == MotionModel::Powered && profile.thrust_accel == 0.0 {
        return Err(fail(
            "powered class has zero thrust_accel and can never accelerate".to_string(),
        ));
    }

    Ok(())
}

/// Validate one profile RON file.
///
/// # Errors
///
/// Returns the first problem found: unreadable file, parse failure,
/// duplicate ids, or an unusable profile definition.
pub fn validate_profiles_file(path: &Path) -> Result<usize, ValidateError> {
    let display = path.display().to_string();

    if !path.exists() {
        return Err(ValidateError::NotFound(display));
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ValidateError::Read {
        path: display.clone(),
        message: e.to_string(),
    })?;

    let profiles: Vec<ProfileData> =
        ron::from_str(&contents).map_err(|e| ValidateError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    for profile in &profiles {
        if !seen.insert(profile.id.clone()) {
            return Err(ValidateError::InvalidProfile {
                id: profile.id.clone(),
                path: display.clone(),
                message: "duplicate class id".to_string(),
            });
        }
        check_profile(profile, &display)?;
    }

    Ok(profiles.len())
}

/// Validate all `.ron` profile files in a directory.
///
/// Returns the number of profiles validated across all files.
///
/// # Errors
///
/// Returns an error if the directory is missing, unreadable, or any file
/// in it fails validation.
pub fn validate_data_directory(dir: &Path) -> Result<usize, ValidateError> {
    if !dir.exists() {
        return Err(ValidateError::NotFound(dir.display().to_string()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| ValidateError::Read {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut total = 0;
    for entry in entries {
        let entry = entry.map_err(|e| ValidateError::Read {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = entry.path();

        if path.extension().map(|e| e == "ron").unwrap_or(false) {
            let count = validate_profiles_file(&path)?;
            tracing::debug!(path = %path.display(), profiles = count, "validated");
            total += count;
        }
    }

    Ok(total)
}
