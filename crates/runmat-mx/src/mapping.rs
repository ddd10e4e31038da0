//! Struct-like containers: ordered, uniquely named fields.
//!
//! [`FieldMap`] is built natively (outputs, name/value arguments); [`Struct`] views one element
//! of a host struct array. Both implement [`Mapping`], and through it the extraction and
//! creation protocol keyed by field name.

use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;
use runmat_mx_api::{ArrayHandle, ClassId, DynArray, Host, MxError, MxResult};

use crate::config;

/// Check `name` against the host's identifier rules: an ASCII letter followed by letters,
/// digits or underscores, no longer than the configured maximum.
pub fn validate_field_name(name: &str) -> MxResult<()> {
    if name.is_empty() {
        return Err(MxError::assignment(name, "field names cannot be empty"));
    }
    let naming = &config::current().naming;
    if !naming.validate {
        return Ok(());
    }
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(MxError::assignment(name, "not a valid field name"));
    }
    if name.len() > naming.max_length {
        return Err(MxError::assignment(
            name,
            format!("field names are limited to {} characters", naming.max_length),
        ));
    }
    Ok(())
}

/// Ordered name to handle associations.
pub trait Mapping {
    type Handle;

    /// False for a view that does not refer to a usable struct element.
    fn valid(&self) -> bool;

    fn nfields(&self) -> usize;

    /// Name of the `n`-th field in insertion order.
    fn get_name(&self, n: usize) -> MxResult<&str>;

    /// The value stored under `name`; absence is not an error.
    fn get_value(&self, name: &str) -> Option<&Self::Handle>;

    /// Insert or overwrite `name`. New names are appended; on error the map is unchanged.
    fn set_value(&mut self, name: &str, value: Self::Handle) -> MxResult<&Self::Handle>;

    fn clear(&mut self);

    fn empty(&self) -> bool {
        self.nfields() == 0
    }

    fn size(&self) -> usize {
        self.nfields()
    }

    fn has_field(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.has_field(name))
    }

    fn has_fields(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_field(name))
    }

    fn get_value_at(&self, n: usize) -> MxResult<&Self::Handle> {
        let name = self.get_name(n)?;
        self.get_value(name)
            .ok_or_else(|| MxError::index_out_of_range(n, self.nfields()))
    }

    fn names(&self) -> Vec<&str> {
        (0..self.nfields())
            .filter_map(|n| self.get_name(n).ok())
            .collect()
    }
}

fn name_at<V>(fields: &IndexMap<String, V>, n: usize) -> MxResult<&str> {
    fields
        .get_index(n)
        .map(|(name, _)| name.as_str())
        .ok_or_else(|| MxError::index_out_of_range(n, fields.len()))
}

fn store<'m, V>(fields: &'m mut IndexMap<String, V>, name: &str, value: V) -> MxResult<&'m V> {
    validate_field_name(name)?;
    let stored = match fields.entry(name.to_string()) {
        Entry::Occupied(mut slot) => {
            slot.insert(value);
            slot.into_mut()
        }
        Entry::Vacant(slot) => slot.insert(value),
    };
    Ok(&*stored)
}

/// A natively built field map, e.g. a set of named outputs or parsed options.
#[derive(Debug, Clone)]
pub struct FieldMap<H> {
    fields: IndexMap<String, H>,
}

impl<H> Default for FieldMap<H> {
    fn default() -> Self {
        FieldMap {
            fields: IndexMap::new(),
        }
    }
}

impl<H> FieldMap<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &H)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Remove `name`, keeping the order of the remaining fields.
    pub fn remove(&mut self, name: &str) -> Option<H> {
        self.fields.shift_remove(name)
    }

    pub fn into_pairs(self) -> impl Iterator<Item = (String, H)> {
        self.fields.into_iter()
    }
}

impl<H> Mapping for FieldMap<H> {
    type Handle = H;

    fn valid(&self) -> bool {
        true
    }

    fn nfields(&self) -> usize {
        self.fields.len()
    }

    fn get_name(&self, n: usize) -> MxResult<&str> {
        name_at(&self.fields, n)
    }

    fn get_value(&self, name: &str) -> Option<&H> {
        self.fields.get(name)
    }

    fn set_value(&mut self, name: &str, value: H) -> MxResult<&H> {
        store(&mut self.fields, name, value)
    }

    fn clear(&mut self) {
        self.fields.clear();
    }
}

impl<A: DynArray + ArrayHandle<Array = A>> FieldMap<A> {
    /// Build a 1x1 host struct holding every field in order.
    pub fn into_struct<H: Host<Array = A>>(self, host: &H) -> MxResult<A> {
        let mut out = {
            let names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
            host.create_struct(&[1, 1], &names)?
        };
        for (name, value) in self.fields {
            out.set_field(0, &name, value)?;
        }
        Ok(out)
    }
}

/// One element of a host struct array.
///
/// The fields are read when the view is built; unset host fields are left out. Values set
/// afterwards live in the view only and are not written back to the host array.
#[derive(Debug)]
pub struct Struct<'a, A: ?Sized> {
    source: Option<&'a A>,
    index: usize,
    valid: bool,
    fields: IndexMap<String, &'a A>,
}

impl<'a, A: DynArray + ?Sized> Struct<'a, A> {
    pub fn wrap(source: Option<&'a A>, index: usize) -> Self {
        let mut fields = IndexMap::new();
        let valid = match source {
            Some(array) if array.class_id() == ClassId::Struct && index < array.numel() => {
                for name in array.field_names() {
                    if let Some(value) = array.field(index, name) {
                        fields.insert(name.to_string(), value);
                    }
                }
                true
            }
            Some(array) => {
                debug!(
                    "struct view of {} element {index} is invalid",
                    array.class_id()
                );
                false
            }
            None => false,
        };
        Struct {
            source,
            index,
            valid,
            fields,
        }
    }

    pub fn source(&self) -> Option<&'a A> {
        self.source
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Field `name` with the lifetime of the host array.
    pub fn get(&self, name: &str) -> Option<&'a A> {
        self.fields.get(name).copied()
    }
}

impl<'a, A: DynArray + ?Sized> Mapping for Struct<'a, A> {
    type Handle = &'a A;

    fn valid(&self) -> bool {
        self.valid
    }

    fn nfields(&self) -> usize {
        self.fields.len()
    }

    fn get_name(&self, n: usize) -> MxResult<&str> {
        name_at(&self.fields, n)
    }

    fn get_value(&self, name: &str) -> Option<&&'a A> {
        self.fields.get(name)
    }

    fn set_value(&mut self, name: &str, value: &'a A) -> MxResult<&&'a A> {
        store(&mut self.fields, name, value)
    }

    fn clear(&mut self) {
        self.fields.clear();
    }
}
