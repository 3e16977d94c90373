use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IrisError {
    #[error("malformed dataset at line {line}: {reason}")]
    Dataset { line: usize, reason: String },

    #[error("shape mismatch: expected {expected}, found {found}")]
    Shape { expected: String, found: String },

    #[error("feature index {index} out of range for {available} features")]
    FeatureIndex { index: usize, available: usize },

    #[error("training data must contain at least two classes")]
    SingleClass,

    #[error("classifier has not been fitted")]
    NotFitted,

    #[error("matrix is not positive definite")]
    NotPositiveDefinite,

    #[error("decision plane is parallel to the z axis")]
    DegeneratePlane,
}

impl IrisError {
    pub fn shape(expected: impl ToString, found: impl ToString) -> Self {
        Self::Shape {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
