//! In-process host for RunMat typed array views.
//!
//! Provides owned, column-major [`MxArray`] values and an [`InProcessHost`] allocator that
//! implement the `runmat-mx-api` traits. Native routines can run against it without a real
//! host, and every test in the workspace uses it as its host.

use std::cell::Cell;

use log::debug;
use runmat_mx_api::{dims_string, ClassId, DynArray, Host, MxError, MxResult};

mod array;

pub use array::{MxArray, Storage};

/// Allocator handing out owned [`MxArray`] values.
///
/// An optional element budget makes allocation fail deterministically once the total number
/// of elements requested exceeds it.
#[derive(Debug, Default)]
pub struct InProcessHost {
    element_limit: Option<usize>,
    allocated: Cell<usize>,
    allocations: Cell<usize>,
}

impl InProcessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse any allocation that would push the running element total past `limit`.
    pub fn with_element_limit(limit: usize) -> Self {
        Self {
            element_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Number of successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Total elements handed out so far.
    pub fn allocated_elements(&self) -> usize {
        self.allocated.get()
    }

    /// Element total after an allocation of `dims`, or the refusal. Nothing is recorded.
    fn budget(&self, class: ClassId, dims: &[usize]) -> MxResult<usize> {
        let count = dims
            .iter()
            .try_fold(1usize, |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| MxError::allocation(class, dims, "element count overflows"))?;
        let total = self
            .allocated
            .get()
            .checked_add(count)
            .ok_or_else(|| MxError::allocation(class, dims, "element count overflows"))?;
        if let Some(limit) = self.element_limit {
            if total > limit {
                debug!(
                    "refusing {class} allocation of {}: budget {limit}, in use {}",
                    dims_string(dims),
                    self.allocated.get()
                );
                return Err(MxError::allocation(
                    class,
                    dims,
                    format!("element budget of {limit} exhausted"),
                ));
            }
        }
        Ok(total)
    }

    fn commit(&self, total: usize, array: MxArray) -> MxArray {
        self.allocated.set(total);
        self.allocations.set(self.allocations.get() + 1);
        debug!("allocated {} array {}", array.class_id(), dims_string(array.dims()));
        array
    }
}

impl Host for InProcessHost {
    type Array = MxArray;

    fn create_numeric(&self, class: ClassId, dims: &[usize]) -> MxResult<MxArray> {
        if !class.is_number_like() {
            return Err(MxError::allocation(class, dims, "not a numeric or logical class"));
        }
        let total = self.budget(class, dims)?;
        Ok(self.commit(total, MxArray::zeros(class, dims)?))
    }

    fn create_char(&self, text: &str) -> MxResult<MxArray> {
        let len = text.encode_utf16().count();
        let total = self.budget(ClassId::Char, &[1, len])?;
        Ok(self.commit(total, MxArray::char_row(text)))
    }

    fn create_struct(&self, dims: &[usize], fields: &[&str]) -> MxResult<MxArray> {
        let total = self.budget(ClassId::Struct, dims)?;
        let array = MxArray::struct_array(dims, fields)
            .map_err(|e| MxError::allocation(ClassId::Struct, dims, e.to_string()))?;
        Ok(self.commit(total, array))
    }

    fn create_cell(&self, dims: &[usize]) -> MxResult<MxArray> {
        let total = self.budget(ClassId::Cell, dims)?;
        Ok(self.commit(total, MxArray::cell_array(dims)))
    }
}
