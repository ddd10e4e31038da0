//! Vector, matrix and volume views.
//!
//! Each view decorates a [`Memory`] with fixed dimensionality and column-major addressing,
//! matching the host's storage order: element `(r, c)` of a matrix lives at `r + c * nrows`,
//! element `(r, c, s)` of a volume at `r + nrows * (c + ncols * s)`. Shapes are validated once,
//! when the view is built.

use runmat_mx_api::{MxError, MxResult};

use crate::memory::{Memory, Storage, StorageMut};

pub(crate) fn check_len(expected: usize, actual: usize, dims: &[usize]) -> MxResult<()> {
    if expected != actual {
        return Err(MxError::shape_mismatch(
            format!("{expected} element(s) but the buffer holds {actual}"),
            dims,
        ));
    }
    Ok(())
}

fn check_index(index: usize, len: usize) -> MxResult<()> {
    if index >= len {
        return Err(MxError::index_out_of_range(index, len));
    }
    Ok(())
}

/// One-dimensional view.
#[derive(Debug)]
pub struct Vector<S> {
    mem: Memory<S>,
}

pub type VectorRef<'a, T> = Vector<&'a [T]>;
pub type VectorMut<'a, T> = Vector<&'a mut [T]>;

impl<S: Storage> Vector<S> {
    pub fn new(buf: S) -> Self {
        Vector {
            mem: Memory::new(buf),
        }
    }

    pub fn len(&self) -> usize {
        self.mem.len()
    }

    pub fn numel(&self) -> usize {
        self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    pub fn get(&self, index: usize) -> MxResult<&S::Elem> {
        self.mem.get(index)
    }

    pub fn at(&self, index: usize) -> MxResult<S::Elem>
    where
        S::Elem: Copy,
    {
        self.mem.at(index)
    }

    pub fn as_slice(&self) -> &[S::Elem] {
        self.mem.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S::Elem> {
        self.mem.iter()
    }

    pub fn memory(&self) -> &Memory<S> {
        &self.mem
    }
}

impl<S: StorageMut> Vector<S> {
    pub fn get_mut(&mut self, index: usize) -> MxResult<&mut S::Elem> {
        self.mem.get_mut(index)
    }

    pub fn set(&mut self, index: usize, value: S::Elem) -> MxResult<()> {
        self.mem.set(index, value)
    }

    pub fn as_mut_slice(&mut self) -> &mut [S::Elem] {
        self.mem.as_mut_slice()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S::Elem> {
        self.mem.iter_mut()
    }

    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.mem.fill(value);
    }

    pub fn copy_from_slice(&mut self, src: &[S::Elem]) -> MxResult<()>
    where
        S::Elem: Copy,
    {
        self.mem.copy_from_slice(src)
    }
}

impl<'a, T> VectorRef<'a, T> {
    pub fn into_slice(self) -> &'a [T] {
        self.mem.into_slice()
    }
}

impl<'a, T> Clone for VectorRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for VectorRef<'a, T> {}

/// Two-dimensional, column-major view.
#[derive(Debug)]
pub struct Matrix<S> {
    mem: Memory<S>,
    nrows: usize,
    ncols: usize,
}

pub type MatrixRef<'a, T> = Matrix<&'a [T]>;
pub type MatrixMut<'a, T> = Matrix<&'a mut [T]>;

impl<S: Storage> Matrix<S> {
    /// Wrap `buf` as an `nrows x ncols` matrix; the buffer must hold exactly that many elements.
    pub fn new(buf: S, nrows: usize, ncols: usize) -> MxResult<Self> {
        let mem = Memory::new(buf);
        check_len(nrows * ncols, mem.len(), &[nrows, ncols])?;
        Ok(Matrix { mem, nrows, ncols })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn dims(&self) -> [usize; 2] {
        [self.nrows, self.ncols]
    }

    pub fn numel(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    /// Linear offset of `(row, col)`.
    pub fn offset(&self, row: usize, col: usize) -> MxResult<usize> {
        check_index(row, self.nrows)?;
        check_index(col, self.ncols)?;
        Ok(row + col * self.nrows)
    }

    pub fn get(&self, row: usize, col: usize) -> MxResult<&S::Elem> {
        let offset = self.offset(row, col)?;
        self.mem.get(offset)
    }

    pub fn at(&self, row: usize, col: usize) -> MxResult<S::Elem>
    where
        S::Elem: Copy,
    {
        self.get(row, col).copied()
    }

    /// Column `col` as a contiguous slice.
    pub fn column(&self, col: usize) -> MxResult<&[S::Elem]> {
        check_index(col, self.ncols)?;
        let start = col * self.nrows;
        Ok(&self.mem.as_slice()[start..start + self.nrows])
    }

    pub fn as_slice(&self) -> &[S::Elem] {
        self.mem.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S::Elem> {
        self.mem.iter()
    }

    pub fn memory(&self) -> &Memory<S> {
        &self.mem
    }
}

impl<S: StorageMut> Matrix<S> {
    pub fn get_mut(&mut self, row: usize, col: usize) -> MxResult<&mut S::Elem> {
        let offset = self.offset(row, col)?;
        self.mem.get_mut(offset)
    }

    pub fn set(&mut self, row: usize, col: usize, value: S::Elem) -> MxResult<()> {
        *self.get_mut(row, col)? = value;
        Ok(())
    }

    pub fn column_mut(&mut self, col: usize) -> MxResult<&mut [S::Elem]> {
        check_index(col, self.ncols)?;
        let start = col * self.nrows;
        let nrows = self.nrows;
        Ok(&mut self.mem.as_mut_slice()[start..start + nrows])
    }

    pub fn as_mut_slice(&mut self) -> &mut [S::Elem] {
        self.mem.as_mut_slice()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S::Elem> {
        self.mem.iter_mut()
    }

    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.mem.fill(value);
    }

    pub fn copy_from_slice(&mut self, src: &[S::Elem]) -> MxResult<()>
    where
        S::Elem: Copy,
    {
        self.mem.copy_from_slice(src)
    }
}

impl<'a, T> MatrixRef<'a, T> {
    pub fn into_slice(self) -> &'a [T] {
        self.mem.into_slice()
    }
}

impl<'a, T> Clone for MatrixRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for MatrixRef<'a, T> {}

/// Three-dimensional, column-major view.
#[derive(Debug)]
pub struct Volume<S> {
    mem: Memory<S>,
    nrows: usize,
    ncols: usize,
    nslices: usize,
}

pub type VolumeRef<'a, T> = Volume<&'a [T]>;
pub type VolumeMut<'a, T> = Volume<&'a mut [T]>;

impl<S: Storage> Volume<S> {
    pub fn new(buf: S, nrows: usize, ncols: usize, nslices: usize) -> MxResult<Self> {
        let mem = Memory::new(buf);
        check_len(nrows * ncols * nslices, mem.len(), &[nrows, ncols, nslices])?;
        Ok(Volume {
            mem,
            nrows,
            ncols,
            nslices,
        })
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn nslices(&self) -> usize {
        self.nslices
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.nrows, self.ncols, self.nslices]
    }

    pub fn numel(&self) -> usize {
        self.mem.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mem.is_empty()
    }

    pub fn offset(&self, row: usize, col: usize, slice: usize) -> MxResult<usize> {
        check_index(row, self.nrows)?;
        check_index(col, self.ncols)?;
        check_index(slice, self.nslices)?;
        Ok(row + self.nrows * (col + self.ncols * slice))
    }

    pub fn get(&self, row: usize, col: usize, slice: usize) -> MxResult<&S::Elem> {
        let offset = self.offset(row, col, slice)?;
        self.mem.get(offset)
    }

    pub fn at(&self, row: usize, col: usize, slice: usize) -> MxResult<S::Elem>
    where
        S::Elem: Copy,
    {
        self.get(row, col, slice).copied()
    }

    /// Slice `slice` (all rows and columns at one depth) as a contiguous, column-major buffer.
    pub fn slice(&self, slice: usize) -> MxResult<&[S::Elem]> {
        check_index(slice, self.nslices)?;
        let plane = self.nrows * self.ncols;
        let start = slice * plane;
        Ok(&self.mem.as_slice()[start..start + plane])
    }

    /// Slice `slice` viewed as a matrix.
    pub fn slice_matrix(&self, slice: usize) -> MxResult<Matrix<&[S::Elem]>> {
        let plane = self.slice(slice)?;
        Matrix::new(plane, self.nrows, self.ncols)
    }

    pub fn as_slice(&self) -> &[S::Elem] {
        self.mem.as_slice()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S::Elem> {
        self.mem.iter()
    }

    pub fn memory(&self) -> &Memory<S> {
        &self.mem
    }
}

impl<S: StorageMut> Volume<S> {
    pub fn get_mut(&mut self, row: usize, col: usize, slice: usize) -> MxResult<&mut S::Elem> {
        let offset = self.offset(row, col, slice)?;
        self.mem.get_mut(offset)
    }

    pub fn set(&mut self, row: usize, col: usize, slice: usize, value: S::Elem) -> MxResult<()> {
        *self.get_mut(row, col, slice)? = value;
        Ok(())
    }

    pub fn as_mut_slice(&mut self) -> &mut [S::Elem] {
        self.mem.as_mut_slice()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, S::Elem> {
        self.mem.iter_mut()
    }

    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.mem.fill(value);
    }
}

impl<'a, T> VolumeRef<'a, T> {
    pub fn into_slice(self) -> &'a [T] {
        self.mem.into_slice()
    }
}

impl<'a, T> Clone for VolumeRef<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for VolumeRef<'a, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_addressing_is_column_major() {
        // [1 3 5; 2 4 6]
        let data = [1, 2, 3, 4, 5, 6];
        let m = MatrixRef::new(&data[..], 2, 3).unwrap();
        assert_eq!(m.at(0, 0), Ok(1));
        assert_eq!(m.at(1, 0), Ok(2));
        assert_eq!(m.at(0, 2), Ok(5));
        assert_eq!(m.column(1).unwrap(), &[3, 4]);
        assert_eq!(m.get(2, 0), Err(MxError::index_out_of_range(2, 2)));
        assert_eq!(m.get(0, 3), Err(MxError::index_out_of_range(3, 3)));
    }

    #[test]
    fn matrix_requires_matching_buffer() {
        let data = [0.0; 5];
        let err = MatrixRef::new(&data[..], 2, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape mismatch: expected 6 element(s) but the buffer holds 5, got a 2x3 array"
        );
    }

    #[test]
    fn volume_addressing_is_column_major() {
        let data: Vec<u32> = (0..24).collect();
        let v = VolumeRef::new(&data[..], 2, 3, 4).unwrap();
        assert_eq!(v.dims(), [2, 3, 4]);
        assert_eq!(v.at(1, 2, 3), Ok(1 + 2 * (2 + 3 * 3)));
        assert_eq!(v.slice(1).unwrap(), &data[6..12]);
        let plane = v.slice_matrix(2).unwrap();
        assert_eq!(plane.at(1, 1), Ok(15));
        assert!(v.get(0, 0, 4).is_err());
    }

    #[test]
    fn mutable_views_write_through() {
        let mut data = [0.0f64; 6];
        {
            let mut m = MatrixMut::new(&mut data[..], 3, 2).unwrap();
            m.set(2, 1, 8.0).unwrap();
            m.column_mut(0).unwrap().copy_from_slice(&[1.0, 2.0, 3.0]);
            assert!(m.set(3, 0, 1.0).is_err());
        }
        assert_eq!(data, [1.0, 2.0, 3.0, 0.0, 0.0, 8.0]);

        let mut buf = [0i16; 3];
        let mut v = VectorMut::new(&mut buf[..]);
        v.copy_from_slice(&[4, 5, 6]).unwrap();
        v.iter_mut().for_each(|x| *x -= 1);
        assert_eq!(v.as_slice(), &[3, 4, 5]);
    }
}
