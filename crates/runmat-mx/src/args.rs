//! Name/value argument lists, e.g. `f(x, 'tol', 1e-6, 'mode', 'fast')`.

use log::debug;
use runmat_mx_api::{ClassId, DynArray, MxError, MxResult};

use crate::getters::get_string;
use crate::mapping::{FieldMap, Mapping};
use crate::sequence::Sequence;

impl<'a, A: DynArray + ?Sized> FieldMap<&'a A> {
    /// Pair up `args` as alternating names and values.
    ///
    /// Names must be char arrays and valid field names. A repeated name overwrites the earlier
    /// value but keeps its first position.
    pub fn from_pairs(args: &[&'a A]) -> MxResult<Self> {
        if args.len() % 2 != 0 {
            return Err(MxError::shape_mismatch("name/value pairs", &[1, args.len()]));
        }
        let mut map = FieldMap::new();
        for pair in args.chunks_exact(2) {
            let (name, value) = (pair[0], pair[1]);
            if name.class_id() != ClassId::Char {
                return Err(MxError::type_mismatch("an option name", name.class_id()));
            }
            let name = get_string(Some(name))?;
            map.set_value(&name, value)?;
        }
        Ok(map)
    }
}

/// Split entry-point inputs into `n_positional` leading arguments and trailing options.
///
/// Missing positional arguments stay unset; an absent handle among the options is a
/// [`MxError::NullInput`].
pub fn split_options<'a, A: DynArray + ?Sized>(
    args: &[Option<&'a A>],
    n_positional: usize,
) -> MxResult<(Sequence<&'a A>, FieldMap<&'a A>)> {
    let split = n_positional.min(args.len());
    let (head, tail) = args.split_at(split);
    let mut slots = head.to_vec();
    slots.resize(n_positional, None);
    let options = tail
        .iter()
        .enumerate()
        .map(|(i, arg)| {
            arg.ok_or_else(|| MxError::null_input(format!("argument {}", split + i + 1)))
        })
        .collect::<MxResult<Vec<_>>>()?;
    let options = FieldMap::from_pairs(&options)?;
    debug!(
        "split {} argument(s) into {n_positional} positional and {} option(s)",
        args.len(),
        options.nfields()
    );
    Ok((Sequence::from_slots(slots), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runmat_mx_host::MxArray;

    #[test]
    fn pairs_require_char_names() {
        let name = MxArray::scalar(1.0);
        let value = MxArray::scalar(2.0);
        let err = FieldMap::from_pairs(&[&name, &value]).unwrap_err();
        assert!(matches!(err, MxError::TypeMismatch { .. }));
    }

    #[test]
    fn odd_argument_count_is_rejected() {
        let name = MxArray::char_row("tol");
        let err = FieldMap::from_pairs(&[&name]).unwrap_err();
        assert!(matches!(err, MxError::ShapeMismatch { .. }));
    }

    #[test]
    fn repeated_names_keep_first_position() {
        let (a, b) = (MxArray::char_row("a"), MxArray::char_row("b"));
        let (one, two, three) = (MxArray::scalar(1.0), MxArray::scalar(2.0), MxArray::scalar(3.0));
        let map = FieldMap::from_pairs(&[&a, &one, &b, &two, &a, &three]).unwrap();
        assert_eq!(map.names(), vec!["a", "b"]);
        assert!(std::ptr::eq(*map.get_value("a").unwrap(), &three));
    }

    #[test]
    fn split_pads_missing_positionals() {
        let x = MxArray::scalar(1.0);
        let args: Vec<Option<&MxArray>> = vec![Some(&x)];
        let (positional, options) = split_options(&args, 3).unwrap();
        assert_eq!(positional.len(), 3);
        assert!(positional.handle(0).is_some());
        assert!(positional.handle(2).is_none());
        assert!(options.empty());
    }
}
