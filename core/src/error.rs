use thiserror::Error;

use crate::models::CategoryId;
use crate::validator::Violation;

/// A dive plan that failed validation. Carries every violation found.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("dive plan rejected with {} violation(s)", .violations.len())]
pub struct PlanRejected {
    pub violations: Vec<Violation>,
}

/// Error type for logbook entries rejected on input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("depth must be between 0 and 40 m, got {0}")]
    DepthOutOfRange(f64),

    #[error("duration must be between 0 and 180 min, got {0}")]
    DurationOutOfRange(f64),
}

/// Error type for checklist edits rejected on input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChecklistError {
    #[error("category name is required")]
    EmptyName,

    #[error("item text is required")]
    EmptyText,

    #[error("unknown category: {0}")]
    UnknownCategory(CategoryId),
}

/// Error type for checklist imports. The existing collection is never touched
/// when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    #[error("nothing to import")]
    Empty,

    #[error("malformed checklist data at line {line}, column {column}: {message}")]
    Malformed {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("checklist data is missing the `{0}` array")]
    MissingArray(&'static str),

    /// Valid JSON whose records do not have the checklist shape.
    #[error("checklist data has an invalid record: {0}")]
    InvalidRecord(String),
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Malformed {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Error type for the key-value store seam.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("failed to encode `{key}`: {message}")]
    Encode { key: String, message: String },

    #[error("failed to decode `{key}`: {message}")]
    Decode { key: String, message: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Field;

    #[test]
    fn test_error_display() {
        let err = EntryError::MissingField("site");
        assert_eq!(err.to_string(), "missing required field: site");

        let err = EntryError::DepthOutOfRange(45.0);
        assert_eq!(err.to_string(), "depth must be between 0 and 40 m, got 45");

        let err = ChecklistError::UnknownCategory(CategoryId(9));
        assert_eq!(err.to_string(), "unknown category: 9");

        let err = ImportError::MissingArray("items");
        assert_eq!(err.to_string(), "checklist data is missing the `items` array");

        let err = StoreError::Decode {
            key: "divePlans".to_string(),
            message: "expected value".to_string(),
        };
        assert_eq!(err.to_string(), "failed to decode `divePlans`: expected value");
    }

    #[test]
    fn test_plan_rejected_counts_violations() {
        let err = PlanRejected {
            violations: vec![
                Violation::new(Field::Site, "Dive site is required"),
                Violation::new(Field::Date, "Date is required"),
            ],
        };
        assert_eq!(err.to_string(), "dive plan rejected with 2 violation(s)");
    }

    #[test]
    fn test_import_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"categories\": [").unwrap_err();
        match ImportError::from(err) {
            ImportError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("Expected malformed error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_record_has_no_location() {
        let err = ImportError::InvalidRecord("invalid type: string \"x\", expected u64".to_string());
        assert_eq!(
            err.to_string(),
            "checklist data has an invalid record: invalid type: string \"x\", expected u64"
        );
    }
}
