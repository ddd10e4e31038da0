//! Typed creation of new host arrays.
//!
//! Everything here allocates through [`Host`] and hands back an owned, zero-initialised array.
//! Fill it through the `_mut` getters before assigning it into an output container.

use log::debug;
use runmat_mx_api::{DynArray, Host, MxError, MxResult};

use crate::element::MxElement;

/// A numeric or logical array of element type `T` with the given extents.
pub fn create_numeric<T: MxElement, H: Host>(host: &H, dims: &[usize]) -> MxResult<H::Array> {
    host.create_numeric(T::CLASS, dims).map_err(|err| {
        debug!("create_numeric<{}>: {err}", T::CLASS);
        err
    })
}

fn create_filled<T: MxElement, H: Host>(
    host: &H,
    dims: &[usize],
    values: &[T],
) -> MxResult<H::Array> {
    let mut array = create_numeric::<T, H>(host, dims)?;
    let class = array.class_id();
    let data = T::slice_mut(array.data_mut())
        .ok_or_else(|| MxError::type_mismatch(T::CLASS.name(), class))?;
    if data.len() != values.len() {
        return Err(MxError::shape_mismatch(
            format!("{} element(s)", values.len()),
            dims,
        ));
    }
    data.copy_from_slice(values);
    Ok(array)
}

/// A 1x1 array holding `value`.
pub fn create_scalar<T: MxElement, H: Host>(host: &H, value: T) -> MxResult<H::Array> {
    create_filled(host, &[1, 1], &[value])
}

/// A zeroed column vector of `n` elements.
pub fn create_vector<T: MxElement, H: Host>(host: &H, n: usize) -> MxResult<H::Array> {
    create_numeric::<T, H>(host, &[n, 1])
}

/// A column vector holding a copy of `values`.
pub fn create_vector_from<T: MxElement, H: Host>(host: &H, values: &[T]) -> MxResult<H::Array> {
    create_filled(host, &[values.len(), 1], values)
}

pub fn create_matrix<T: MxElement, H: Host>(
    host: &H,
    nrows: usize,
    ncols: usize,
) -> MxResult<H::Array> {
    create_numeric::<T, H>(host, &[nrows, ncols])
}

pub fn create_volume<T: MxElement, H: Host>(
    host: &H,
    nrows: usize,
    ncols: usize,
    nslices: usize,
) -> MxResult<H::Array> {
    create_numeric::<T, H>(host, &[nrows, ncols, nslices])
}

/// A 1xN char array.
pub fn create_string<H: Host>(host: &H, text: &str) -> MxResult<H::Array> {
    host.create_char(text)
}

/// A 1xN cell array with every element unset.
pub fn create_cell<H: Host>(host: &H, n: usize) -> MxResult<H::Array> {
    host.create_cell(&[1, n])
}

/// A 1x1 struct with the given fields, all unset.
pub fn create_struct<H: Host>(host: &H, fields: &[&str]) -> MxResult<H::Array> {
    host.create_struct(&[1, 1], fields)
}
