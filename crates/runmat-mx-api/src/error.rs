use thiserror::Error;

use crate::class::ClassId;

/// Validation and assignment failures raised by the view layer.
///
/// Every failure is terminal for the current entry-point invocation. Absence of a field or
/// argument is not an error and never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MxError {
    /// A value was required but the handle is absent.
    #[error("{what}: expected a value but got none")]
    NullInput { what: String },

    /// The element class does not match the requested native type.
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch { expected: String, found: ClassId },

    /// Dimensionality or extents do not match the requested container shape.
    #[error("shape mismatch: expected {expected}, got a {} array", dims_string(.dims))]
    ShapeMismatch { expected: String, dims: Vec<usize> },

    /// A position or field index outside `[0, len)`.
    #[error("index {index} out of range for {len} element(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A write to a key the container cannot accept.
    #[error("cannot assign '{key}': {reason}")]
    Assignment { key: String, reason: String },

    /// The host refused to allocate a new array.
    #[error("cannot allocate {class} array of size {}: {reason}", dims_string(.dims))]
    Allocation {
        class: ClassId,
        dims: Vec<usize>,
        reason: String,
    },
}

pub type MxResult<T> = Result<T, MxError>;

impl MxError {
    pub fn null_input(what: impl Into<String>) -> Self {
        MxError::NullInput { what: what.into() }
    }

    pub fn type_mismatch(expected: impl Into<String>, found: ClassId) -> Self {
        MxError::TypeMismatch {
            expected: expected.into(),
            found,
        }
    }

    pub fn shape_mismatch(expected: impl Into<String>, dims: &[usize]) -> Self {
        MxError::ShapeMismatch {
            expected: expected.into(),
            dims: dims.to_vec(),
        }
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        MxError::IndexOutOfRange { index, len }
    }

    pub fn assignment(key: impl Into<String>, reason: impl Into<String>) -> Self {
        MxError::Assignment {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn allocation(class: ClassId, dims: &[usize], reason: impl Into<String>) -> Self {
        MxError::Allocation {
            class,
            dims: dims.to_vec(),
            reason: reason.into(),
        }
    }

    /// Stable message identifier reported to the host alongside the message text.
    pub fn identifier(&self) -> &'static str {
        match self {
            MxError::NullInput { .. } => "RunMat:mx:nullInput",
            MxError::TypeMismatch { .. } => "RunMat:mx:typeMismatch",
            MxError::ShapeMismatch { .. } => "RunMat:mx:shapeMismatch",
            MxError::IndexOutOfRange { .. } => "RunMat:mx:indexOutOfRange",
            MxError::Assignment { .. } => "RunMat:mx:assignment",
            MxError::Allocation { .. } => "RunMat:mx:allocation",
        }
    }
}

/// Format extents the way the host prints sizes, e.g. `3x1x2`.
pub fn dims_string(dims: &[usize]) -> String {
    if dims.is_empty() {
        return "0x0".to_string();
    }
    dims.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("x")
}
