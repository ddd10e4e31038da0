//! Element class tags reported by host arrays.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime descriptor of what a host array's buffer holds.
///
/// Mirrors the host's class names (`class(x)` in MATLAB terms). Numeric classes map one to one
/// onto a Rust element type; container classes (`Struct`, `Cell`) have no flat data buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassId {
    Double,
    Single,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Logical,
    Char,
    Struct,
    Cell,
    FunctionHandle,
    Unknown,
}

impl ClassId {
    /// All classes that carry a numeric buffer.
    pub const NUMERIC: [ClassId; 10] = [
        ClassId::Double,
        ClassId::Single,
        ClassId::Int8,
        ClassId::UInt8,
        ClassId::Int16,
        ClassId::UInt16,
        ClassId::Int32,
        ClassId::UInt32,
        ClassId::Int64,
        ClassId::UInt64,
    ];

    pub fn is_numeric(self) -> bool {
        Self::NUMERIC.contains(&self)
    }

    /// Numeric or logical: the classes accepted by numeric views and scalar extraction.
    pub fn is_number_like(self) -> bool {
        self.is_numeric() || self == ClassId::Logical
    }

    pub fn is_container(self) -> bool {
        matches!(self, ClassId::Struct | ClassId::Cell)
    }

    /// Size in bytes of one element, for classes with a flat buffer.
    pub fn element_size(self) -> Option<usize> {
        match self {
            ClassId::Double | ClassId::Int64 | ClassId::UInt64 => Some(8),
            ClassId::Single | ClassId::Int32 | ClassId::UInt32 => Some(4),
            ClassId::Int16 | ClassId::UInt16 | ClassId::Char => Some(2),
            ClassId::Int8 | ClassId::UInt8 | ClassId::Logical => Some(1),
            ClassId::Struct | ClassId::Cell | ClassId::FunctionHandle | ClassId::Unknown => None,
        }
    }

    /// The host's name for this class.
    pub fn name(self) -> &'static str {
        match self {
            ClassId::Double => "double",
            ClassId::Single => "single",
            ClassId::Int8 => "int8",
            ClassId::UInt8 => "uint8",
            ClassId::Int16 => "int16",
            ClassId::UInt16 => "uint16",
            ClassId::Int32 => "int32",
            ClassId::UInt32 => "uint32",
            ClassId::Int64 => "int64",
            ClassId::UInt64 => "uint64",
            ClassId::Logical => "logical",
            ClassId::Char => "char",
            ClassId::Struct => "struct",
            ClassId::Cell => "cell",
            ClassId::FunctionHandle => "function_handle",
            ClassId::Unknown => "unknown",
        }
    }

    /// Parse a host class name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "double" => Some(ClassId::Double),
            "single" => Some(ClassId::Single),
            "int8" => Some(ClassId::Int8),
            "uint8" => Some(ClassId::UInt8),
            "int16" => Some(ClassId::Int16),
            "uint16" => Some(ClassId::UInt16),
            "int32" => Some(ClassId::Int32),
            "uint32" => Some(ClassId::UInt32),
            "int64" => Some(ClassId::Int64),
            "uint64" => Some(ClassId::UInt64),
            "logical" => Some(ClassId::Logical),
            "char" => Some(ClassId::Char),
            "struct" => Some(ClassId::Struct),
            "cell" => Some(ClassId::Cell),
            "function_handle" => Some(ClassId::FunctionHandle),
            _ => None,
        }
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
