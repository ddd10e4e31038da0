//! Typed extraction from host handles.
//!
//! Every getter validates in the same order: the handle is present, its class is number-like,
//! its class is exactly the requested element's class, and finally its dimensionality. The
//! first failing check decides the error.

use log::{debug, trace};
use runmat_mx_api::{dims_string, ArrayData, ClassId, DynArray, MxError, MxResult};

use crate::element::{is_compatible, MxElement};
use crate::mapping::Struct;
use crate::sequence::Sequence;
use crate::shaped::{check_len, MatrixMut, MatrixRef, VectorMut, VectorRef, VolumeMut, VolumeRef};

fn require<'a, A: DynArray + ?Sized>(handle: Option<&'a A>, what: &str) -> MxResult<&'a A> {
    handle.ok_or_else(|| {
        debug!("{what}: missing input");
        MxError::null_input(what)
    })
}

fn check_element<T: MxElement, A: DynArray + ?Sized>(array: &A) -> MxResult<()> {
    let class = array.class_id();
    if !class.is_number_like() {
        return Err(MxError::type_mismatch("a numeric or logical array", class));
    }
    if !is_compatible::<T>(class) {
        return Err(MxError::type_mismatch(T::CLASS.name(), class));
    }
    Ok(())
}

/// Length of a vector-shaped array, or the reason it is not one.
///
/// Empty arrays are zero-length vectors whatever their extents. Otherwise exactly one extent
/// may exceed 1, so a 1x1 array is a scalar and not a vector.
pub fn vector_len(dims: &[usize]) -> MxResult<usize> {
    let not_a_vector = || MxError::shape_mismatch("a vector", dims);
    match dims {
        [n] if *n != 1 => Ok(*n),
        [r, c] if r * c == 0 => Ok(0),
        [1, n] | [n, 1] if *n > 1 => Ok(*n),
        _ => Err(not_a_vector()),
    }
}

fn matrix_dims(dims: &[usize]) -> MxResult<(usize, usize)> {
    match dims {
        [r, c] => Ok((*r, *c)),
        _ => Err(MxError::shape_mismatch("a matrix", dims)),
    }
}

fn volume_dims(dims: &[usize]) -> MxResult<(usize, usize, usize)> {
    match dims {
        [r, c, s] => Ok((*r, *c, *s)),
        _ => Err(MxError::shape_mismatch("a volume", dims)),
    }
}

fn buffer<'a, T: MxElement, A: DynArray + ?Sized>(array: &'a A) -> MxResult<&'a [T]> {
    T::slice(array.data()).ok_or_else(|| MxError::type_mismatch(T::CLASS.name(), array.class_id()))
}

fn buffer_mut<'a, T: MxElement, A: DynArray + ?Sized>(array: &'a mut A) -> MxResult<&'a mut [T]> {
    let class = array.class_id();
    T::slice_mut(array.data_mut()).ok_or_else(|| MxError::type_mismatch(T::CLASS.name(), class))
}

/// Read-only vector view of a row, column or empty array.
pub fn get_vector<'a, T: MxElement, A: DynArray + ?Sized>(
    handle: Option<&'a A>,
) -> MxResult<VectorRef<'a, T>> {
    let array = require(handle, "vector")?;
    check_element::<T, _>(array)?;
    let len = vector_len(array.dims())?;
    let data = buffer::<T, _>(array)?;
    check_len(len, data.len(), array.dims())?;
    trace!("vector<{}> of length {len}", T::CLASS);
    Ok(VectorRef::new(data))
}

/// Read-only view of a two-dimensional array.
pub fn get_matrix<'a, T: MxElement, A: DynArray + ?Sized>(
    handle: Option<&'a A>,
) -> MxResult<MatrixRef<'a, T>> {
    let array = require(handle, "matrix")?;
    check_element::<T, _>(array)?;
    let (nrows, ncols) = matrix_dims(array.dims())?;
    let view = MatrixRef::new(buffer::<T, _>(array)?, nrows, ncols)?;
    trace!("matrix<{}> {nrows}x{ncols}", T::CLASS);
    Ok(view)
}

/// Read-only view of a three-dimensional array.
pub fn get_volume<'a, T: MxElement, A: DynArray + ?Sized>(
    handle: Option<&'a A>,
) -> MxResult<VolumeRef<'a, T>> {
    let array = require(handle, "volume")?;
    check_element::<T, _>(array)?;
    let (nrows, ncols, nslices) = volume_dims(array.dims())?;
    let view = VolumeRef::new(buffer::<T, _>(array)?, nrows, ncols, nslices)?;
    trace!("volume<{}> {nrows}x{ncols}x{nslices}", T::CLASS);
    Ok(view)
}

/// Read-write vector view. Only arrays owned by native code can be borrowed mutably.
pub fn get_vector_mut<'a, T: MxElement, A: DynArray + ?Sized>(
    array: &'a mut A,
) -> MxResult<VectorMut<'a, T>> {
    check_element::<T, _>(&*array)?;
    let dims = array.dims().to_vec();
    let len = vector_len(&dims)?;
    let data = buffer_mut::<T, _>(array)?;
    check_len(len, data.len(), &dims)?;
    Ok(VectorMut::new(data))
}

pub fn get_matrix_mut<'a, T: MxElement, A: DynArray + ?Sized>(
    array: &'a mut A,
) -> MxResult<MatrixMut<'a, T>> {
    check_element::<T, _>(&*array)?;
    let (nrows, ncols) = matrix_dims(array.dims())?;
    MatrixMut::new(buffer_mut::<T, _>(array)?, nrows, ncols)
}

pub fn get_volume_mut<'a, T: MxElement, A: DynArray + ?Sized>(
    array: &'a mut A,
) -> MxResult<VolumeMut<'a, T>> {
    check_element::<T, _>(&*array)?;
    let (nrows, ncols, nslices) = volume_dims(array.dims())?;
    VolumeMut::new(buffer_mut::<T, _>(array)?, nrows, ncols, nslices)
}

/// The single element of a numeric or logical array, converted to `T` with `as` semantics.
pub fn get_scalar<T: MxElement, A: DynArray + ?Sized>(handle: Option<&A>) -> MxResult<T> {
    let array = require(handle, "scalar")?;
    let class = array.class_id();
    if !class.is_number_like() {
        return Err(MxError::type_mismatch("a numeric scalar", class));
    }
    if array.numel() != 1 {
        return Err(MxError::shape_mismatch("a scalar", array.dims()));
    }
    let value = array
        .data()
        .get_f64(0)
        .ok_or_else(|| MxError::type_mismatch("a numeric scalar", class))?;
    Ok(T::from_f64(value))
}

/// Like [`get_scalar`], but an absent handle yields `default` without any validation.
pub fn get_scalar_or<T: MxElement, A: DynArray + ?Sized>(
    handle: Option<&A>,
    default: T,
) -> MxResult<T> {
    match handle {
        Some(_) => get_scalar(handle),
        None => Ok(default),
    }
}

/// Text of a char array, read in storage order.
pub fn get_string<A: DynArray + ?Sized>(handle: Option<&A>) -> MxResult<String> {
    let array = require(handle, "string")?;
    let class = array.class_id();
    let units = match array.data() {
        ArrayData::Char(units) => units,
        _ => return Err(MxError::type_mismatch("a char array", class)),
    };
    String::from_utf16(units).map_err(|_| MxError::type_mismatch("valid UTF-16 text", class))
}

pub fn get_string_or<A: DynArray + ?Sized>(handle: Option<&A>, default: &str) -> MxResult<String> {
    match handle {
        Some(_) => get_string(handle),
        None => Ok(default.to_string()),
    }
}

/// The elements of a cell array as a sequence of borrowed handles.
pub fn get_cell<'a, A: DynArray + ?Sized>(handle: Option<&'a A>) -> MxResult<Sequence<&'a A>> {
    let array = require(handle, "cell")?;
    if array.class_id() != ClassId::Cell {
        return Err(MxError::type_mismatch("a cell array", array.class_id()));
    }
    let seq = Sequence::from_cell(array);
    trace!("cell of {} element(s) ({})", seq.len(), dims_string(array.dims()));
    Ok(seq)
}

/// Element `index` of a struct array. Check [`crate::Mapping::valid`] before relying on it.
pub fn get_struct<'a, A: DynArray + ?Sized>(handle: Option<&'a A>, index: usize) -> Struct<'a, A> {
    Struct::wrap(handle, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use runmat_mx_api::ArrayDataMut;
    use runmat_mx_host::MxArray;

    /// A host array whose reported extents disagree with its buffer.
    struct Skewed {
        dims: Vec<usize>,
        data: Vec<f64>,
    }

    impl DynArray for Skewed {
        fn class_id(&self) -> ClassId {
            ClassId::Double
        }

        fn dims(&self) -> &[usize] {
            &self.dims
        }

        fn data(&self) -> ArrayData<'_> {
            ArrayData::Double(&self.data)
        }

        fn data_mut(&mut self) -> ArrayDataMut<'_> {
            ArrayDataMut::Double(&mut self.data)
        }

        fn field_names(&self) -> Vec<&str> {
            Vec::new()
        }

        fn field(&self, _index: usize, _name: &str) -> Option<&Self> {
            None
        }

        fn cell(&self, _index: usize) -> Option<&Self> {
            None
        }

        fn set_field(&mut self, _index: usize, name: &str, _value: Self) -> MxResult<()> {
            Err(MxError::assignment(name, "not a struct"))
        }

        fn set_cell(&mut self, index: usize, _value: Self) -> MxResult<()> {
            Err(MxError::index_out_of_range(index, 0))
        }
    }

    #[test]
    fn vector_shapes() {
        assert_eq!(vector_len(&[1, 5]), Ok(5));
        assert_eq!(vector_len(&[4, 1]), Ok(4));
        assert_eq!(vector_len(&[0, 3]), Ok(0));
        assert_eq!(vector_len(&[7]), Ok(7));
        assert!(vector_len(&[1, 1]).is_err());
        assert!(vector_len(&[1]).is_err());
        assert!(vector_len(&[3, 3]).is_err());
        assert!(vector_len(&[1, 3, 2]).is_err());
        assert!(vector_len(&[]).is_err());
    }

    #[test]
    fn validation_order_is_null_class_then_shape() {
        let none: Option<&MxArray> = None;
        assert!(matches!(
            get_vector::<f64, _>(none),
            Err(MxError::NullInput { .. })
        ));

        let text = MxArray::char_row("abc");
        assert!(matches!(
            get_vector::<f64, _>(Some(&text)),
            Err(MxError::TypeMismatch { .. })
        ));

        let square = MxArray::double(&[3, 3], vec![0.0; 9]).unwrap();
        assert!(matches!(
            get_vector::<f32, _>(Some(&square)),
            Err(MxError::TypeMismatch { .. })
        ));
        assert!(matches!(
            get_vector::<f64, _>(Some(&square)),
            Err(MxError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn scalar_rejects_many_elements() {
        let row = MxArray::row(&[1.0, 2.0]);
        let err = get_scalar::<f64, _>(Some(&row)).unwrap_err();
        assert_eq!(err, MxError::shape_mismatch("a scalar", &[1, 2]));
    }

    #[test]
    fn string_decodes_utf16() {
        let text = MxArray::char_row("héllo");
        assert_eq!(get_string(Some(&text)).unwrap(), "héllo");
        let bad = MxArray::char_array(&[1, 1], vec![0xD800]).unwrap();
        assert!(matches!(
            get_string(Some(&bad)),
            Err(MxError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn vector_buffer_must_match_extents() {
        let short = Skewed {
            dims: vec![1, 5],
            data: vec![1.0, 2.0],
        };
        assert!(matches!(
            get_vector::<f64, _>(Some(&short)),
            Err(MxError::ShapeMismatch { .. })
        ));

        let mut long = Skewed {
            dims: vec![1, 2],
            data: vec![1.0, 2.0, 3.0],
        };
        assert!(matches!(
            get_vector::<f64, _>(Some(&long)),
            Err(MxError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            get_vector_mut::<f64, _>(&mut long),
            Err(MxError::ShapeMismatch { .. })
        ));

        let square = Skewed {
            dims: vec![2, 2],
            data: vec![1.0, 2.0],
        };
        assert!(matches!(
            get_matrix::<f64, _>(Some(&square)),
            Err(MxError::ShapeMismatch { .. })
        ));
    }
}
