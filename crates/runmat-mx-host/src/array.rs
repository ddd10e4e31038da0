//! Owned, column-major host arrays.

use runmat_mx_api::{ArrayData, ArrayDataMut, ArrayHandle, ClassId, DynArray, MxError, MxResult};

/// Backing store of an [`MxArray`].
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Double(Vec<f64>),
    Single(Vec<f32>),
    Int8(Vec<i8>),
    UInt8(Vec<u8>),
    Int16(Vec<i16>),
    UInt16(Vec<u16>),
    Int32(Vec<i32>),
    UInt32(Vec<u32>),
    Int64(Vec<i64>),
    UInt64(Vec<u64>),
    Logical(Vec<bool>),
    Char(Vec<u16>),
    /// One row of field slots per struct element, in field order.
    Struct {
        names: Vec<String>,
        elements: Vec<Vec<Option<MxArray>>>,
    },
    Cell(Vec<Option<MxArray>>),
    FunctionHandle(String),
}

macro_rules! storage_from_vec {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$ty>> for Storage {
                fn from(data: Vec<$ty>) -> Self {
                    Storage::$variant(data)
                }
            }
        )*
    };
}

storage_from_vec!(
    f64 => Double,
    f32 => Single,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    bool => Logical,
);

// `u16` is ambiguous between uint16 and char; numeric construction picks uint16.
impl From<Vec<u16>> for Storage {
    fn from(data: Vec<u16>) -> Self {
        Storage::UInt16(data)
    }
}

impl Storage {
    fn len(&self) -> usize {
        match self {
            Storage::Double(d) => d.len(),
            Storage::Single(d) => d.len(),
            Storage::Int8(d) => d.len(),
            Storage::UInt8(d) => d.len(),
            Storage::Int16(d) => d.len(),
            Storage::UInt16(d) => d.len(),
            Storage::Int32(d) => d.len(),
            Storage::UInt32(d) => d.len(),
            Storage::Int64(d) => d.len(),
            Storage::UInt64(d) => d.len(),
            Storage::Logical(d) => d.len(),
            Storage::Char(d) => d.len(),
            Storage::Struct { elements, .. } => elements.len(),
            Storage::Cell(d) => d.len(),
            Storage::FunctionHandle(_) => 1,
        }
    }

    fn zeros(class: ClassId, count: usize) -> Option<Self> {
        let storage = match class {
            ClassId::Double => Storage::Double(vec![0.0; count]),
            ClassId::Single => Storage::Single(vec![0.0; count]),
            ClassId::Int8 => Storage::Int8(vec![0; count]),
            ClassId::UInt8 => Storage::UInt8(vec![0; count]),
            ClassId::Int16 => Storage::Int16(vec![0; count]),
            ClassId::UInt16 => Storage::UInt16(vec![0; count]),
            ClassId::Int32 => Storage::Int32(vec![0; count]),
            ClassId::UInt32 => Storage::UInt32(vec![0; count]),
            ClassId::Int64 => Storage::Int64(vec![0; count]),
            ClassId::UInt64 => Storage::UInt64(vec![0; count]),
            ClassId::Logical => Storage::Logical(vec![false; count]),
            ClassId::Char => Storage::Char(vec![0; count]),
            ClassId::Struct | ClassId::Cell | ClassId::FunctionHandle | ClassId::Unknown => {
                return None
            }
        };
        Some(storage)
    }
}

/// An owned host array: class, extents and column-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct MxArray {
    dims: Vec<usize>,
    storage: Storage,
}

/// Normalize extents the way the host does: at least two dimensions, trailing singleton
/// dimensions beyond the second dropped.
fn normalize_dims(dims: &[usize]) -> Vec<usize> {
    let mut out = match dims.len() {
        0 => vec![1, 1],
        1 => vec![1, dims[0]],
        _ => dims.to_vec(),
    };
    while out.len() > 2 && out.last() == Some(&1) {
        out.pop();
    }
    out
}

fn element_count(dims: &[usize]) -> usize {
    dims.iter().product()
}

impl MxArray {
    /// Build an array from extents and a matching storage buffer.
    pub fn new(dims: &[usize], storage: Storage) -> MxResult<Self> {
        let dims = normalize_dims(dims);
        let expected = element_count(&dims);
        if storage.len() != expected {
            return Err(MxError::shape_mismatch(
                format!("{} element(s) of data", storage.len()),
                &dims,
            ));
        }
        Ok(MxArray { dims, storage })
    }

    /// A zero-filled numeric, logical or char array.
    pub fn zeros(class: ClassId, dims: &[usize]) -> MxResult<Self> {
        let dims = normalize_dims(dims);
        let storage = Storage::zeros(class, element_count(&dims))
            .ok_or_else(|| MxError::type_mismatch("a class with a flat buffer", class))?;
        Ok(MxArray { dims, storage })
    }

    /// A numeric array whose class follows the element type of `data`.
    pub fn numeric<T>(dims: &[usize], data: Vec<T>) -> MxResult<Self>
    where
        Vec<T>: Into<Storage>,
    {
        Self::new(dims, data.into())
    }

    pub fn double(dims: &[usize], data: Vec<f64>) -> MxResult<Self> {
        Self::new(dims, Storage::Double(data))
    }

    /// A `1x1` double.
    pub fn scalar(value: f64) -> Self {
        MxArray {
            dims: vec![1, 1],
            storage: Storage::Double(vec![value]),
        }
    }

    /// A `1xN` double row vector.
    pub fn row(data: &[f64]) -> Self {
        MxArray {
            dims: vec![1, data.len()],
            storage: Storage::Double(data.to_vec()),
        }
    }

    /// An `Nx1` double column vector.
    pub fn column(data: &[f64]) -> Self {
        MxArray {
            dims: vec![data.len(), 1],
            storage: Storage::Double(data.to_vec()),
        }
    }

    pub fn logical(dims: &[usize], data: Vec<bool>) -> MxResult<Self> {
        Self::new(dims, Storage::Logical(data))
    }

    /// A `1xN` char row holding `text` as UTF-16 code units.
    pub fn char_row(text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().collect();
        MxArray {
            dims: vec![1, units.len()],
            storage: Storage::Char(units),
        }
    }

    /// A char array from column-major UTF-16 code units.
    pub fn char_array(dims: &[usize], units: Vec<u16>) -> MxResult<Self> {
        Self::new(dims, Storage::Char(units))
    }

    /// A struct array with the given fields and every field slot unset.
    pub fn struct_array(dims: &[usize], names: &[&str]) -> MxResult<Self> {
        let dims = normalize_dims(dims);
        let mut unique: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if unique.iter().any(|n| n == name) {
                return Err(MxError::assignment(*name, "duplicate field name"));
            }
            unique.push((*name).to_string());
        }
        let elements = vec![vec![None; unique.len()]; element_count(&dims)];
        Ok(MxArray {
            dims,
            storage: Storage::Struct {
                names: unique,
                elements,
            },
        })
    }

    /// A `1x1` struct with the given fields, in order.
    pub fn struct_from(pairs: Vec<(&str, MxArray)>) -> MxResult<Self> {
        let names: Vec<&str> = pairs.iter().map(|(n, _)| *n).collect();
        let mut out = Self::struct_array(&[1, 1], &names)?;
        for (name, value) in pairs {
            out.set_field(0, name, value)?;
        }
        Ok(out)
    }

    /// A cell array with every element unset.
    pub fn cell_array(dims: &[usize]) -> Self {
        let dims = normalize_dims(dims);
        let count = element_count(&dims);
        MxArray {
            dims,
            storage: Storage::Cell(vec![None; count]),
        }
    }

    /// A cell array from column-major elements; `None` marks an unset element.
    pub fn cell_from(dims: &[usize], items: Vec<Option<MxArray>>) -> MxResult<Self> {
        Self::new(dims, Storage::Cell(items))
    }

    /// A `1xN` cell row with every element set.
    pub fn cell_row(items: Vec<MxArray>) -> Self {
        MxArray {
            dims: vec![1, items.len()],
            storage: Storage::Cell(items.into_iter().map(Some).collect()),
        }
    }

    /// An opaque function handle, useful as a non-numeric input.
    pub fn function_handle(name: &str) -> Self {
        MxArray {
            dims: vec![1, 1],
            storage: Storage::FunctionHandle(name.to_string()),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn into_storage(self) -> Storage {
        self.storage
    }
}

impl DynArray for MxArray {
    fn class_id(&self) -> ClassId {
        match &self.storage {
            Storage::Double(_) => ClassId::Double,
            Storage::Single(_) => ClassId::Single,
            Storage::Int8(_) => ClassId::Int8,
            Storage::UInt8(_) => ClassId::UInt8,
            Storage::Int16(_) => ClassId::Int16,
            Storage::UInt16(_) => ClassId::UInt16,
            Storage::Int32(_) => ClassId::Int32,
            Storage::UInt32(_) => ClassId::UInt32,
            Storage::Int64(_) => ClassId::Int64,
            Storage::UInt64(_) => ClassId::UInt64,
            Storage::Logical(_) => ClassId::Logical,
            Storage::Char(_) => ClassId::Char,
            Storage::Struct { .. } => ClassId::Struct,
            Storage::Cell(_) => ClassId::Cell,
            Storage::FunctionHandle(_) => ClassId::FunctionHandle,
        }
    }

    fn dims(&self) -> &[usize] {
        &self.dims
    }

    fn data(&self) -> ArrayData<'_> {
        match &self.storage {
            Storage::Double(d) => ArrayData::Double(d),
            Storage::Single(d) => ArrayData::Single(d),
            Storage::Int8(d) => ArrayData::Int8(d),
            Storage::UInt8(d) => ArrayData::UInt8(d),
            Storage::Int16(d) => ArrayData::Int16(d),
            Storage::UInt16(d) => ArrayData::UInt16(d),
            Storage::Int32(d) => ArrayData::Int32(d),
            Storage::UInt32(d) => ArrayData::UInt32(d),
            Storage::Int64(d) => ArrayData::Int64(d),
            Storage::UInt64(d) => ArrayData::UInt64(d),
            Storage::Logical(d) => ArrayData::Logical(d),
            Storage::Char(d) => ArrayData::Char(d),
            Storage::Struct { .. } | Storage::Cell(_) | Storage::FunctionHandle(_) => {
                ArrayData::None
            }
        }
    }

    fn data_mut(&mut self) -> ArrayDataMut<'_> {
        match &mut self.storage {
            Storage::Double(d) => ArrayDataMut::Double(d),
            Storage::Single(d) => ArrayDataMut::Single(d),
            Storage::Int8(d) => ArrayDataMut::Int8(d),
            Storage::UInt8(d) => ArrayDataMut::UInt8(d),
            Storage::Int16(d) => ArrayDataMut::Int16(d),
            Storage::UInt16(d) => ArrayDataMut::UInt16(d),
            Storage::Int32(d) => ArrayDataMut::Int32(d),
            Storage::UInt32(d) => ArrayDataMut::UInt32(d),
            Storage::Int64(d) => ArrayDataMut::Int64(d),
            Storage::UInt64(d) => ArrayDataMut::UInt64(d),
            Storage::Logical(d) => ArrayDataMut::Logical(d),
            Storage::Char(d) => ArrayDataMut::Char(d),
            Storage::Struct { .. } | Storage::Cell(_) | Storage::FunctionHandle(_) => {
                ArrayDataMut::None
            }
        }
    }

    fn field_names(&self) -> Vec<&str> {
        match &self.storage {
            Storage::Struct { names, .. } => names.iter().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    fn field(&self, index: usize, name: &str) -> Option<&Self> {
        let Storage::Struct { names, elements } = &self.storage else {
            return None;
        };
        let slot = names.iter().position(|n| n == name)?;
        elements.get(index)?.get(slot)?.as_ref()
    }

    fn cell(&self, index: usize) -> Option<&Self> {
        match &self.storage {
            Storage::Cell(items) => items.get(index)?.as_ref(),
            _ => None,
        }
    }

    fn set_field(&mut self, index: usize, name: &str, value: Self) -> MxResult<()> {
        let class = self.class_id();
        let Storage::Struct { names, elements } = &mut self.storage else {
            return Err(MxError::type_mismatch("struct", class));
        };
        if index >= elements.len() {
            return Err(MxError::index_out_of_range(index, elements.len()));
        }
        let slot = match names.iter().position(|n| n == name) {
            Some(slot) => slot,
            None => {
                names.push(name.to_string());
                for element in elements.iter_mut() {
                    element.push(None);
                }
                names.len() - 1
            }
        };
        elements[index][slot] = Some(value);
        Ok(())
    }

    fn set_cell(&mut self, index: usize, value: Self) -> MxResult<()> {
        let class = self.class_id();
        let Storage::Cell(items) = &mut self.storage else {
            return Err(MxError::type_mismatch("cell", class));
        };
        let len = items.len();
        let slot = items
            .get_mut(index)
            .ok_or_else(|| MxError::index_out_of_range(index, len))?;
        *slot = Some(value);
        Ok(())
    }
}

impl ArrayHandle for MxArray {
    type Array = MxArray;

    fn array(&self) -> &MxArray {
        self
    }
}
