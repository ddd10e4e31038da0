//! The extraction and creation protocol.
//!
//! Containers expose what they hold through [`Extractor`] and accept new values through
//! [`Creator`], keyed by field name for mappings and by position for sequences. The routines
//! at the bottom of this module are written once against those traits; [`FromArray`] and
//! [`IntoArray`] describe how individual native values travel in each direction.

use std::fmt::Display;

use log::debug;
use runmat_mx_api::{ArrayHandle, DynArray, Host, MxError, MxResult};

use crate::creators;
use crate::element::MxElement;
use crate::getters;
use crate::mapping::{Mapping, Struct};
use crate::sequence::Sequence;
use crate::shaped::{MatrixRef, VectorRef, VolumeRef};

/// Read access to handles stored under keys of type `K`.
pub trait Extractor<K> {
    type Handle: ArrayHandle;

    fn get(&self, key: K) -> Option<&Self::Handle>;

    fn valid_key(&self, key: K) -> bool;
}

/// Write access to handles stored under keys of type `K`.
pub trait Creator<K> {
    type Handle;

    /// Store `handle` under `key` and return the stored handle.
    fn assign(&mut self, key: K, handle: Self::Handle) -> MxResult<&Self::Handle>;
}

impl<'k, M> Extractor<&'k str> for M
where
    M: Mapping,
    M::Handle: ArrayHandle,
{
    type Handle = M::Handle;

    fn get(&self, key: &'k str) -> Option<&M::Handle> {
        self.get_value(key)
    }

    fn valid_key(&self, key: &'k str) -> bool {
        self.has_field(key)
    }
}

impl<'k, M: Mapping> Creator<&'k str> for M {
    type Handle = M::Handle;

    fn assign(&mut self, key: &'k str, handle: M::Handle) -> MxResult<&M::Handle> {
        self.set_value(key, handle)
    }
}

impl<H: ArrayHandle> Extractor<usize> for Sequence<H> {
    type Handle = H;

    fn get(&self, key: usize) -> Option<&H> {
        Sequence::get(self, key)
    }

    fn valid_key(&self, key: usize) -> bool {
        key < self.len()
    }
}

impl<H> Creator<usize> for Sequence<H> {
    type Handle = H;

    fn assign(&mut self, key: usize, handle: H) -> MxResult<&H> {
        Sequence::assign(self, key, handle)
    }
}

/// A native value that can be read out of a host array.
pub trait FromArray<'a, A: DynArray + ?Sized>: Sized {
    fn from_array(array: &'a A) -> MxResult<Self>;
}

/// A native value that can be written into a new host array.
pub trait IntoArray<H: Host> {
    fn into_array(self, host: &H) -> MxResult<H::Array>;
}

macro_rules! scalar_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'a, A: DynArray + ?Sized + 'a> FromArray<'a, A> for $ty {
                fn from_array(array: &'a A) -> MxResult<Self> {
                    getters::get_scalar(Some(array))
                }
            }

            impl<H: Host> IntoArray<H> for $ty {
                fn into_array(self, host: &H) -> MxResult<H::Array> {
                    creators::create_scalar(host, self)
                }
            }
        )*
    };
}

scalar_conversions!(f64, f32, i8, u8, i16, u16, i32, u32, i64, u64, bool);

impl<'a, A: DynArray + ?Sized + 'a> FromArray<'a, A> for String {
    fn from_array(array: &'a A) -> MxResult<Self> {
        getters::get_string(Some(array))
    }
}

impl<'a, A: DynArray + ?Sized + 'a, T: MxElement> FromArray<'a, A> for VectorRef<'a, T> {
    fn from_array(array: &'a A) -> MxResult<Self> {
        getters::get_vector(Some(array))
    }
}

impl<'a, A: DynArray + ?Sized + 'a, T: MxElement> FromArray<'a, A> for MatrixRef<'a, T> {
    fn from_array(array: &'a A) -> MxResult<Self> {
        getters::get_matrix(Some(array))
    }
}

impl<'a, A: DynArray + ?Sized + 'a, T: MxElement> FromArray<'a, A> for VolumeRef<'a, T> {
    fn from_array(array: &'a A) -> MxResult<Self> {
        getters::get_volume(Some(array))
    }
}

impl<'a, A: DynArray + ?Sized + 'a> FromArray<'a, A> for Sequence<&'a A> {
    fn from_array(array: &'a A) -> MxResult<Self> {
        getters::get_cell(Some(array))
    }
}

impl<'a, A: DynArray + ?Sized + 'a> FromArray<'a, A> for Struct<'a, A> {
    fn from_array(array: &'a A) -> MxResult<Self> {
        let view = getters::get_struct(Some(array), 0);
        if !view.valid() {
            return Err(MxError::type_mismatch("a struct", array.class_id()));
        }
        Ok(view)
    }
}

impl<H: Host> IntoArray<H> for &str {
    fn into_array(self, host: &H) -> MxResult<H::Array> {
        creators::create_string(host, self)
    }
}

impl<H: Host> IntoArray<H> for String {
    fn into_array(self, host: &H) -> MxResult<H::Array> {
        creators::create_string(host, &self)
    }
}

impl<H: Host, T: MxElement> IntoArray<H> for &[T] {
    fn into_array(self, host: &H) -> MxResult<H::Array> {
        creators::create_vector_from(host, self)
    }
}

impl<H: Host, T: MxElement> IntoArray<H> for Vec<T> {
    fn into_array(self, host: &H) -> MxResult<H::Array> {
        creators::create_vector_from(host, &self)
    }
}

/// Read the value stored under `key`. An absent key is a [`MxError::NullInput`] naming it.
pub fn extract<'s, T, E, K>(source: &'s E, key: K) -> MxResult<T>
where
    E: Extractor<K>,
    K: Copy + Display,
    T: FromArray<'s, <E::Handle as ArrayHandle>::Array>,
    E::Handle: 's,
    <E::Handle as ArrayHandle>::Array: 's,
{
    match source.get(key) {
        Some(handle) => T::from_array(handle.array()),
        None => {
            debug!("required key '{key}' is missing");
            Err(MxError::null_input(key.to_string()))
        }
    }
}

/// Like [`extract`], but an absent key is `Ok(None)`.
pub fn extract_opt<'s, T, E, K>(source: &'s E, key: K) -> MxResult<Option<T>>
where
    E: Extractor<K>,
    T: FromArray<'s, <E::Handle as ArrayHandle>::Array>,
    E::Handle: 's,
    <E::Handle as ArrayHandle>::Array: 's,
{
    source
        .get(key)
        .map(|handle| T::from_array(handle.array()))
        .transpose()
}

/// Like [`extract`], but an absent key yields `default`.
pub fn extract_or<'s, T, E, K>(source: &'s E, key: K, default: T) -> MxResult<T>
where
    E: Extractor<K>,
    T: FromArray<'s, <E::Handle as ArrayHandle>::Array>,
    E::Handle: 's,
    <E::Handle as ArrayHandle>::Array: 's,
{
    Ok(extract_opt(source, key)?.unwrap_or(default))
}

/// Create a host array from `value` and store it under `key`.
pub fn insert<'d, H, C, K, V>(host: &H, dest: &'d mut C, key: K, value: V) -> MxResult<&'d H::Array>
where
    H: Host,
    C: Creator<K, Handle = H::Array>,
    V: IntoArray<H>,
{
    let array = value.into_array(host)?;
    dest.assign(key, array)
}
