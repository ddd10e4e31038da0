//! Typed views over MATLAB-style host arrays.
//!
//! Native code receives dynamically typed arrays from the host. This crate turns them into
//! statically typed, bounds-checked views without copying ([`get_vector`], [`get_matrix`],
//! [`get_volume`], [`get_scalar`], [`get_string`]), wraps structs and cells as containers
//! ([`Struct`], [`FieldMap`], [`Sequence`]) and creates new arrays through the host
//! ([`creators`]). The [`Extractor`]/[`Creator`] protocol lets the same routines read from and
//! write to any container, keyed by field name or position.
//!
//! ```ignore
//! use runmat_mx::{invoke, get_vector, Mapping};
//!
//! let outputs = invoke(&host, "scale", 1, &inputs, |call| {
//!     let x: runmat_mx::VectorRef<f64> = call.arg(0)?;
//!     let opts = call.options(1)?;
//!     let gain = runmat_mx::extract_or(&opts, "gain", 1.0f64)?;
//!     let scaled: Vec<f64> = x.iter().map(|v| v * gain).collect();
//!     call.set_output(0, scaled)
//! })?;
//! ```

pub mod args;
pub mod config;
pub mod creators;
pub mod element;
pub mod entry;
pub mod getters;
pub mod mapping;
pub mod memory;
pub mod protocol;
pub mod sequence;
pub mod shaped;

pub use args::split_options;
pub use config::MxConfig;
pub use element::{is_compatible, MxElement};
pub use entry::{invoke, EntryError, Invocation};
pub use getters::{
    get_cell, get_matrix, get_matrix_mut, get_scalar, get_scalar_or, get_string, get_string_or,
    get_struct, get_vector, get_vector_mut, get_volume, get_volume_mut,
};
pub use mapping::{validate_field_name, FieldMap, Mapping, Struct};
pub use memory::{Memory, ReadOnlyMemory, ReadWriteMemory};
pub use protocol::{
    extract, extract_opt, extract_or, insert, Creator, Extractor, FromArray, IntoArray,
};
pub use sequence::Sequence;
pub use shaped::{
    Matrix, MatrixMut, MatrixRef, Vector, VectorMut, VectorRef, Volume, VolumeMut, VolumeRef,
};

pub use runmat_mx_api::{ArrayHandle, ClassId, DynArray, Host, MxError, MxResult};
pub use runmat_mx_logging::LoggingGuard;

use log::debug;
use runmat_mx_logging::{init_logging, LoggingOptions};

/// Install `config` process-wide and start logging as it describes.
///
/// Keep the returned guard alive for as long as the host keeps the module loaded.
pub fn init(config: MxConfig) -> LoggingGuard {
    let guard = init_logging(LoggingOptions {
        filter: config.logging.level.clone(),
        enable_traces: config.logging.traces,
        ..LoggingOptions::default()
    });
    if !config::install(config) {
        debug!("mx configuration already installed, keeping the first one");
    }
    guard
}
