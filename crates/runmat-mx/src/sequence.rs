//! Cell-like containers: fixed-length, positionally indexed slots.

use log::trace;
use runmat_mx_api::{ArrayHandle, DynArray, Host, MxError, MxResult};

/// Ordered slots, each either holding a handle or unset.
///
/// The length is fixed when the sequence is built; valid positions are exactly `0..len()`.
/// Host cells may contain unset elements, and an output list is unset until assigned.
#[derive(Debug, Clone)]
pub struct Sequence<H> {
    items: Vec<Option<H>>,
}

impl<H> Sequence<H> {
    /// `len` unset slots.
    pub fn with_len(len: usize) -> Self {
        Sequence {
            items: std::iter::repeat_with(|| None).take(len).collect(),
        }
    }

    pub fn from_handles(handles: impl IntoIterator<Item = H>) -> Self {
        Sequence {
            items: handles.into_iter().map(Some).collect(),
        }
    }

    pub fn from_slots(items: Vec<Option<H>>) -> Self {
        Sequence { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&H> {
        self.items.get(index)?.as_ref()
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    /// Store `handle` at `index`, replacing any previous value.
    pub fn assign(&mut self, index: usize, handle: H) -> MxResult<&H> {
        let len = self.items.len();
        let slot = self.items.get_mut(index).ok_or_else(|| {
            MxError::assignment(
                index.to_string(),
                format!("position out of range for {len} slot(s)"),
            )
        })?;
        Ok(&*slot.insert(handle))
    }

    /// Move the value out of `index`, leaving the slot unset.
    pub fn take(&mut self, index: usize) -> Option<H> {
        self.items.get_mut(index)?.take()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&H>> {
        self.items.iter().map(Option::as_ref)
    }

    pub fn into_slots(self) -> Vec<Option<H>> {
        self.items
    }
}

impl<'a, A: DynArray + ?Sized> Sequence<&'a A> {
    /// Borrow every element of a cell array, in storage order.
    pub fn from_cell(cell: &'a A) -> Self {
        let items: Vec<_> = (0..cell.numel()).map(|i| cell.cell(i)).collect();
        trace!("cell sequence of {} slot(s)", items.len());
        Sequence { items }
    }

    /// Wrap the inputs of an entry point; absent arguments stay unset.
    pub fn from_args(args: &[Option<&'a A>]) -> Self {
        Sequence {
            items: args.to_vec(),
        }
    }

    /// The borrowed array at `index`, with the lifetime of the host array.
    pub fn handle(&self, index: usize) -> Option<&'a A> {
        self.items.get(index).copied().flatten()
    }
}

impl<A: DynArray + ArrayHandle<Array = A>> Sequence<A> {
    /// Build a 1xN host cell from the slots; unset slots stay unset.
    pub fn into_cell<H: Host<Array = A>>(self, host: &H) -> MxResult<A> {
        let mut out = host.create_cell(&[1, self.items.len()])?;
        for (i, item) in self.items.into_iter().enumerate() {
            if let Some(value) = item {
                out.set_cell(i, value)?;
            }
        }
        Ok(out)
    }
}
