//! Verification helpers for testing VRF resolution
//!
//! Compare resolved mappings against expected `(name, id)` pairs and report
//! the first difference.

use thiserror::Error;

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Expected {expected} mappings, found {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Mapping {index}: expected '{expected_name} {expected_id}', got '{actual_name} {actual_id}'")]
    MappingMismatch {
        index: usize,
        expected_name: String,
        expected_id: u32,
        actual_name: String,
        actual_id: u32,
    },

    #[error("Expected name '{name}' not found")]
    NameNotFound { name: String },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Verify that `actual` holds exactly the `expected` mappings, in order
pub fn verify_mappings<I, S>(expected: &[(&str, u32)], actual: I) -> VerifyResult<()>
where
    I: IntoIterator<Item = (S, u32)>,
    S: AsRef<str>,
{
    let actual: Vec<(S, u32)> = actual.into_iter().collect();
    if actual.len() != expected.len() {
        return Err(VerificationError::CountMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    for (index, ((expected_name, expected_id), (actual_name, actual_id))) in
        expected.iter().zip(actual.iter()).enumerate()
    {
        if *expected_name != actual_name.as_ref() || expected_id != actual_id {
            return Err(VerificationError::MappingMismatch {
                index,
                expected_name: expected_name.to_string(),
                expected_id: *expected_id,
                actual_name: actual_name.as_ref().to_string(),
                actual_id: *actual_id,
            });
        }
    }

    Ok(())
}

/// Verify that every name in `expected` appears in `actual`
pub fn verify_names_present<I, S>(expected: &[&str], actual: I) -> VerifyResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let actual: Vec<S> = actual.into_iter().collect();
    for name in expected {
        if !actual.iter().any(|a| a.as_ref() == *name) {
            return Err(VerificationError::NameNotFound {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_mappings_ok() {
        let actual = vec![("red".to_string(), 9), ("blue".to_string(), 10)];
        assert!(verify_mappings(&[("red", 9), ("blue", 10)], actual).is_ok());
    }

    #[test]
    fn test_verify_mappings_count() {
        let actual = vec![("red", 9)];
        assert_eq!(
            verify_mappings(&[("red", 9), ("blue", 10)], actual),
            Err(VerificationError::CountMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_verify_mappings_mismatch() {
        let actual = vec![("red", 9), ("blue", 11)];
        let err = verify_mappings(&[("red", 9), ("blue", 10)], actual).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mapping 1: expected 'blue 10', got 'blue 11'"
        );
    }

    #[test]
    fn test_verify_names_present() {
        assert!(verify_names_present(&["red"], ["red", "blue"]).is_ok());
        assert_eq!(
            verify_names_present(&["green"], ["red"]),
            Err(VerificationError::NameNotFound {
                name: "green".to_string()
            })
        );
    }
}
