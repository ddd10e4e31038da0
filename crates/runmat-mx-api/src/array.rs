//! The surface a host array exposes to the view layer.

use crate::class::ClassId;
use crate::data::{ArrayData, ArrayDataMut};
use crate::error::MxResult;

/// A host-owned, dynamically-typed array.
///
/// Implementations wrap whatever object model the host uses. The view layer only queries it:
/// it never frees an array and never keeps a borrow past the entry-point invocation that
/// produced it. Mutation goes through `&mut self`, which the layer only holds for arrays it
/// created through [`crate::Host`].
pub trait DynArray {
    fn class_id(&self) -> ClassId;

    /// Extents per dimension, column-major. Hosts in the MATLAB tradition report at least two.
    fn dims(&self) -> &[usize];

    fn ndims(&self) -> usize {
        self.dims().len()
    }

    fn numel(&self) -> usize {
        self.dims().iter().product()
    }

    fn is_empty(&self) -> bool {
        self.numel() == 0
    }

    fn is_number_like(&self) -> bool {
        self.class_id().is_number_like()
    }

    /// The contiguous element buffer; [`ArrayData::None`] for struct and cell arrays.
    fn data(&self) -> ArrayData<'_>;

    fn data_mut(&mut self) -> ArrayDataMut<'_>;

    /// Field names of a struct array in declaration order; empty for other classes.
    fn field_names(&self) -> Vec<&str>;

    /// Field `name` of struct element `index`, or `None` when unset or absent.
    fn field(&self, index: usize, name: &str) -> Option<&Self>;

    /// Element `index` of a cell array, or `None` when unset or out of range.
    fn cell(&self, index: usize) -> Option<&Self>;

    /// Store `value` as field `name` of struct element `index`, adding the field if needed.
    fn set_field(&mut self, index: usize, name: &str, value: Self) -> MxResult<()>
    where
        Self: Sized;

    /// Store `value` as element `index` of a cell array.
    fn set_cell(&mut self, index: usize, value: Self) -> MxResult<()>
    where
        Self: Sized;
}

/// Anything that refers to a host array: a borrowed input or an owned, natively created array.
pub trait ArrayHandle {
    type Array: DynArray + ?Sized;

    fn array(&self) -> &Self::Array;
}

impl<'a, A: DynArray + ?Sized> ArrayHandle for &'a A {
    type Array = A;

    fn array(&self) -> &A {
        self
    }
}
