use crate::array::{ArrayHandle, DynArray};
use crate::class::ClassId;
use crate::error::MxResult;

/// The host's array creation facility.
///
/// This is the only shared resource the view layer touches. Each call either returns a fresh,
/// zero-initialised array owned by the caller or fails with [`crate::MxError::Allocation`];
/// there is no partial allocation.
pub trait Host {
    type Array: DynArray + ArrayHandle<Array = Self::Array>;

    /// A numeric or logical array of the given class and extents.
    fn create_numeric(&self, class: ClassId, dims: &[usize]) -> MxResult<Self::Array>;

    /// A `1xN` char array holding `text`.
    fn create_char(&self, text: &str) -> MxResult<Self::Array>;

    /// A struct array with the given fields, every field unset.
    fn create_struct(&self, dims: &[usize], fields: &[&str]) -> MxResult<Self::Array>;

    /// A cell array with every element unset.
    fn create_cell(&self, dims: &[usize]) -> MxResult<Self::Array>;
}
