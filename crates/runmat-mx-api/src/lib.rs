//! Host array interface for RunMat typed array views.
//!
//! This crate is the seam between native code and the host that owns the arrays. It defines
//! what the view layer consumes from a host ([`DynArray`], [`Host`]), the element class tags
//! ([`ClassId`]), typed buffer access ([`ArrayData`]) and the error kinds ([`MxError`]).
//! Hosts implement these traits; `runmat-mx` builds views and containers on top of them.

pub mod array;
pub mod class;
pub mod data;
pub mod error;
pub mod host;

pub use array::{ArrayHandle, DynArray};
pub use class::ClassId;
pub use data::{ArrayData, ArrayDataMut};
pub use error::{dims_string, MxError, MxResult};
pub use host::Host;
