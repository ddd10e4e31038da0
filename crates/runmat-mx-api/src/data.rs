//! Typed access to the contiguous buffer behind a host array.

use crate::class::ClassId;

/// Shared borrow of a host array's buffer, tagged with its element type.
///
/// Data is stored column-major: the first dimension varies fastest.
#[derive(Debug, Clone, Copy)]
pub enum ArrayData<'a> {
    Double(&'a [f64]),
    Single(&'a [f32]),
    Int8(&'a [i8]),
    UInt8(&'a [u8]),
    Int16(&'a [i16]),
    UInt16(&'a [u16]),
    Int32(&'a [i32]),
    UInt32(&'a [u32]),
    Int64(&'a [i64]),
    UInt64(&'a [u64]),
    Logical(&'a [bool]),
    /// UTF-16 code units, as the host stores characters.
    Char(&'a [u16]),
    /// Struct, cell and opaque classes have no flat buffer.
    None,
}

/// Exclusive borrow of a host array's buffer.
#[derive(Debug)]
pub enum ArrayDataMut<'a> {
    Double(&'a mut [f64]),
    Single(&'a mut [f32]),
    Int8(&'a mut [i8]),
    UInt8(&'a mut [u8]),
    Int16(&'a mut [i16]),
    UInt16(&'a mut [u16]),
    Int32(&'a mut [i32]),
    UInt32(&'a mut [u32]),
    Int64(&'a mut [i64]),
    UInt64(&'a mut [u64]),
    Logical(&'a mut [bool]),
    Char(&'a mut [u16]),
    None,
}

impl<'a> ArrayData<'a> {
    pub fn class_id(&self) -> ClassId {
        match self {
            ArrayData::Double(_) => ClassId::Double,
            ArrayData::Single(_) => ClassId::Single,
            ArrayData::Int8(_) => ClassId::Int8,
            ArrayData::UInt8(_) => ClassId::UInt8,
            ArrayData::Int16(_) => ClassId::Int16,
            ArrayData::UInt16(_) => ClassId::UInt16,
            ArrayData::Int32(_) => ClassId::Int32,
            ArrayData::UInt32(_) => ClassId::UInt32,
            ArrayData::Int64(_) => ClassId::Int64,
            ArrayData::UInt64(_) => ClassId::UInt64,
            ArrayData::Logical(_) => ClassId::Logical,
            ArrayData::Char(_) => ClassId::Char,
            ArrayData::None => ClassId::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ArrayData::Double(d) => d.len(),
            ArrayData::Single(d) => d.len(),
            ArrayData::Int8(d) => d.len(),
            ArrayData::UInt8(d) => d.len(),
            ArrayData::Int16(d) => d.len(),
            ArrayData::UInt16(d) => d.len(),
            ArrayData::Int32(d) => d.len(),
            ArrayData::UInt32(d) => d.len(),
            ArrayData::Int64(d) => d.len(),
            ArrayData::UInt64(d) => d.len(),
            ArrayData::Logical(d) => d.len(),
            ArrayData::Char(d) => d.len(),
            ArrayData::None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `index` widened to `f64`, the way the host's scalar getter does.
    ///
    /// Returns `None` for out-of-range indices and for buffers without numeric content.
    pub fn get_f64(&self, index: usize) -> Option<f64> {
        match self {
            ArrayData::Double(d) => d.get(index).copied(),
            ArrayData::Single(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::Int8(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::UInt8(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::Int16(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::UInt16(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::Int32(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::UInt32(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::Int64(d) => d.get(index).map(|&v| v as f64),
            ArrayData::UInt64(d) => d.get(index).map(|&v| v as f64),
            ArrayData::Logical(d) => d.get(index).map(|&v| if v { 1.0 } else { 0.0 }),
            ArrayData::Char(d) => d.get(index).map(|&v| f64::from(v)),
            ArrayData::None => None,
        }
    }
}

impl<'a> ArrayDataMut<'a> {
    pub fn class_id(&self) -> ClassId {
        match self {
            ArrayDataMut::Double(_) => ClassId::Double,
            ArrayDataMut::Single(_) => ClassId::Single,
            ArrayDataMut::Int8(_) => ClassId::Int8,
            ArrayDataMut::UInt8(_) => ClassId::UInt8,
            ArrayDataMut::Int16(_) => ClassId::Int16,
            ArrayDataMut::UInt16(_) => ClassId::UInt16,
            ArrayDataMut::Int32(_) => ClassId::Int32,
            ArrayDataMut::UInt32(_) => ClassId::UInt32,
            ArrayDataMut::Int64(_) => ClassId::Int64,
            ArrayDataMut::UInt64(_) => ClassId::UInt64,
            ArrayDataMut::Logical(_) => ClassId::Logical,
            ArrayDataMut::Char(_) => ClassId::Char,
            ArrayDataMut::None => ClassId::Unknown,
        }
    }
}
