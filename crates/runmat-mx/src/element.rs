//! Compiled-in registry mapping native element types to host classes.

use std::fmt;

use runmat_mx_api::{ArrayData, ArrayDataMut, ClassId};

/// A native type that can view the buffer of a host array.
///
/// Compatibility is a pure function of `(Self::CLASS, class of the array)`: the classes must
/// be identical, so a `double` array never views as `f32` and an `int32` array never views as
/// `u32`.
pub trait MxElement: Copy + Default + PartialEq + fmt::Debug + 'static {
    const CLASS: ClassId;

    fn slice(data: ArrayData<'_>) -> Option<&[Self]>;

    fn slice_mut(data: ArrayDataMut<'_>) -> Option<&mut [Self]>;

    /// Narrowing cast from the host's scalar representation. Overflow and precision loss
    /// follow `as` semantics.
    fn from_f64(value: f64) -> Self;
}

macro_rules! numeric_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl MxElement for $ty {
                const CLASS: ClassId = ClassId::$variant;

                fn slice(data: ArrayData<'_>) -> Option<&[Self]> {
                    match data {
                        ArrayData::$variant(d) => Some(d),
                        _ => None,
                    }
                }

                fn slice_mut(data: ArrayDataMut<'_>) -> Option<&mut [Self]> {
                    match data {
                        ArrayDataMut::$variant(d) => Some(d),
                        _ => None,
                    }
                }

                #[allow(clippy::unnecessary_cast)]
                fn from_f64(value: f64) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

numeric_element!(
    f64 => Double,
    f32 => Single,
    i8 => Int8,
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
);

impl MxElement for bool {
    const CLASS: ClassId = ClassId::Logical;

    fn slice(data: ArrayData<'_>) -> Option<&[Self]> {
        match data {
            ArrayData::Logical(d) => Some(d),
            _ => None,
        }
    }

    fn slice_mut(data: ArrayDataMut<'_>) -> Option<&mut [Self]> {
        match data {
            ArrayDataMut::Logical(d) => Some(d),
            _ => None,
        }
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0
    }
}

/// True when an array of `class` can be viewed as `T`.
pub fn is_compatible<T: MxElement>(class: ClassId) -> bool {
    class == T::CLASS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compatibility_is_exact() {
        assert!(is_compatible::<f64>(ClassId::Double));
        assert!(!is_compatible::<f32>(ClassId::Double));
        assert!(!is_compatible::<u32>(ClassId::Int32));
        assert!(is_compatible::<bool>(ClassId::Logical));
        assert!(!is_compatible::<u16>(ClassId::Char));
    }

    #[test]
    fn from_f64_narrows_like_a_cast() {
        assert_eq!(i8::from_f64(300.0), 127);
        assert_eq!(u8::from_f64(-4.0), 0);
        assert_eq!(i32::from_f64(2.9), 2);
        assert_eq!(f32::from_f64(0.5), 0.5);
        assert!(bool::from_f64(-1.0));
        assert!(!bool::from_f64(0.0));
    }

    #[test]
    fn slice_only_matches_own_variant() {
        let d = [1.0f64, 2.0];
        assert_eq!(f64::slice(ArrayData::Double(&d)), Some(&d[..]));
        assert_eq!(f32::slice(ArrayData::Double(&d)), None);
        assert_eq!(f64::slice(ArrayData::None), None);
    }
}
