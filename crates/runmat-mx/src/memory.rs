//! Non-owning typed memory views.
//!
//! The access mode is part of the type: [`ReadOnlyMemory`] wraps `&[T]` and has no mutable
//! accessor at all, [`ReadWriteMemory`] wraps `&mut [T]`. Read-write memory can only be
//! obtained from `&mut` access to an array, which native code only has for arrays it created
//! through the host; input arrays are shared borrows and stay untouched.

use runmat_mx_api::{MxError, MxResult};

/// Contiguous element storage a view can read.
pub trait Storage {
    type Elem;

    fn as_slice(&self) -> &[Self::Elem];
}

/// Contiguous element storage a view can also write.
pub trait StorageMut: Storage {
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];
}

impl<'a, T> Storage for &'a [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T> Storage for &'a mut [T] {
    type Elem = T;

    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T> StorageMut for &'a mut [T] {
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

/// A bounds-checked view over a contiguous buffer.
#[derive(Debug)]
pub struct Memory<S> {
    buf: S,
}

pub type ReadOnlyMemory<'a, T> = Memory<&'a [T]>;
pub type ReadWriteMemory<'a, T> = Memory<&'a mut [T]>;

impl<'a, T> Clone for Memory<&'a [T]> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Memory<&'a [T]> {}

impl<S: Storage> Memory<S> {
    pub fn new(buf: S) -> Self {
        Memory { buf }
    }

    pub fn len(&self) -> usize {
        self.buf.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> &[S::Elem] {
        self.buf.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S::Elem> {
        self.as_slice().iter()
    }

    pub fn get(&self, index: usize) -> MxResult<&S::Elem> {
        let len = self.len();
        self.as_slice()
            .get(index)
            .ok_or_else(|| MxError::index_out_of_range(index, len))
    }

    /// Copy of the element at `index`.
    pub fn at(&self, index: usize) -> MxResult<S::Elem>
    where
        S::Elem: Copy,
    {
        self.get(index).copied()
    }
}

impl<S: StorageMut> Memory<S> {
    pub fn as_mut_slice(&mut self) -> &mut [S::Elem] {
        self.buf.as_mut_slice()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S::Elem> {
        self.as_mut_slice().iter_mut()
    }

    pub fn get_mut(&mut self, index: usize) -> MxResult<&mut S::Elem> {
        let len = self.len();
        self.as_mut_slice()
            .get_mut(index)
            .ok_or_else(|| MxError::index_out_of_range(index, len))
    }

    pub fn set(&mut self, index: usize, value: S::Elem) -> MxResult<()> {
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.as_mut_slice().fill(value);
    }

    /// Overwrite every element from `src`, which must have exactly [`Memory::len`] elements.
    pub fn copy_from_slice(&mut self, src: &[S::Elem]) -> MxResult<()>
    where
        S::Elem: Copy,
    {
        if src.len() != self.len() {
            return Err(MxError::shape_mismatch(
                format!("{} element(s)", self.len()),
                &[src.len()],
            ));
        }
        self.as_mut_slice().copy_from_slice(src);
        Ok(())
    }
}

impl<'a, T> Memory<&'a [T]> {
    /// The underlying slice with the lifetime of the host array.
    pub fn into_slice(self) -> &'a [T] {
        self.buf
    }
}

impl<'a, T> Memory<&'a mut [T]> {
    pub fn into_mut_slice(self) -> &'a mut [T] {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_only_access_is_bounds_checked() {
        let data = [1.0, 2.0, 3.0];
        let mem = ReadOnlyMemory::new(&data[..]);
        assert_eq!(mem.len(), 3);
        assert_eq!(mem.at(2), Ok(3.0));
        assert_eq!(mem.get(3), Err(MxError::index_out_of_range(3, 3)));
        let copy = mem;
        assert_eq!(copy.into_slice(), &data[..]);
    }

    #[test]
    fn read_write_access_mutates_the_buffer() {
        let mut data = [0i32; 4];
        {
            let mut mem = ReadWriteMemory::new(&mut data[..]);
            mem.set(1, 7).unwrap();
            *mem.get_mut(3).unwrap() = 9;
            assert!(mem.set(4, 1).is_err());
        }
        assert_eq!(data, [0, 7, 0, 9]);
    }

    #[test]
    fn copy_from_slice_requires_matching_length() {
        let mut data = [0u8; 3];
        let mut mem = ReadWriteMemory::new(&mut data[..]);
        assert!(mem.copy_from_slice(&[1, 2]).is_err());
        mem.copy_from_slice(&[1, 2, 3]).unwrap();
        mem.iter_mut().for_each(|v| *v *= 2);
        assert_eq!(mem.as_slice(), &[2, 4, 6]);
        mem.fill(5);
        assert_eq!(data, [5, 5, 5]);
    }
}
