use runmat_mx::{
    get_matrix, get_matrix_mut, get_scalar, get_scalar_or, get_string, get_string_or, get_vector,
    get_vector_mut, get_volume, get_volume_mut, ClassId, DynArray, MxError,
};
use runmat_mx_host::MxArray;

fn iota(dims: &[usize]) -> MxArray {
    let n: usize = dims.iter().product();
    MxArray::double(dims, (0..n).map(|v| v as f64).collect()).unwrap()
}

#[test]
fn matrix_views_cover_every_element() {
    for r in 0..4 {
        for c in 0..4 {
            let a = iota(&[r, c]);
            let m = get_matrix::<f64, _>(Some(&a)).unwrap();
            assert_eq!(m.numel(), a.numel());
            assert_eq!(m.dims(), [r, c]);
            for j in 0..c {
                for i in 0..r {
                    assert_eq!(m.at(i, j), Ok((i + j * r) as f64));
                }
            }
        }
    }
}

#[test]
fn vector_views_accept_rows_columns_and_empties_only() {
    for r in 0..4 {
        for c in 0..4 {
            let a = iota(&[r, c]);
            let expected_ok = r * c == 0 || (r == 1 && c > 1) || (c == 1 && r > 1);
            match get_vector::<f64, _>(Some(&a)) {
                Ok(v) => {
                    assert!(expected_ok, "{r}x{c} should not be a vector");
                    assert_eq!(v.len(), a.numel());
                }
                Err(err) => {
                    assert!(!expected_ok, "{r}x{c} should be a vector");
                    assert!(matches!(err, MxError::ShapeMismatch { .. }));
                }
            }
        }
    }
}

#[test]
fn row_vector_reads_the_buffer_in_order() {
    let a = MxArray::double(&[1, 5], vec![9.0, 8.0, 7.0, 6.0, 5.0]).unwrap();
    let v = get_vector::<f64, _>(Some(&a)).unwrap();
    assert_eq!(v.len(), 5);
    assert_eq!(v.at(0), Ok(9.0));
    assert_eq!(v.into_slice(), &[9.0, 8.0, 7.0, 6.0, 5.0]);
}

#[test]
fn square_matrix_is_not_a_vector() {
    let a = iota(&[3, 3]);
    assert!(matches!(
        get_vector::<f64, _>(Some(&a)),
        Err(MxError::ShapeMismatch { .. })
    ));
    let m = get_matrix::<f64, _>(Some(&a)).unwrap();
    assert_eq!((m.nrows(), m.ncols()), (3, 3));
}

#[test]
fn volumes_need_three_dimensions() {
    for s in 2..4 {
        let a = iota(&[2, 3, s]);
        let v = get_volume::<f64, _>(Some(&a)).unwrap();
        assert_eq!(v.numel(), a.numel());
        assert_eq!(v.at(1, 2, s - 1), Ok((1 + 2 * (2 + 3 * (s - 1))) as f64));
        assert!(get_matrix::<f64, _>(Some(&a)).is_err());
    }
    let flat = iota(&[2, 3]);
    assert!(matches!(
        get_volume::<f64, _>(Some(&flat)),
        Err(MxError::ShapeMismatch { .. })
    ));
}

#[test]
fn element_types_must_match_exactly() {
    let ints = MxArray::numeric(&[2, 2], vec![1i32, 2, 3, 4]).unwrap();
    assert!(get_matrix::<i32, _>(Some(&ints)).is_ok());
    for err in [
        get_matrix::<u32, _>(Some(&ints)).unwrap_err(),
        get_matrix::<f64, _>(Some(&ints)).unwrap_err(),
    ] {
        assert!(matches!(
            err,
            MxError::TypeMismatch {
                found: ClassId::Int32,
                ..
            }
        ));
    }

    let flags = MxArray::logical(&[1, 3], vec![true, false, true]).unwrap();
    let v = get_vector::<bool, _>(Some(&flags)).unwrap();
    assert_eq!(v.as_slice(), &[true, false, true]);

    let cell = MxArray::cell_row(vec![MxArray::scalar(1.0)]);
    assert!(matches!(
        get_matrix::<f64, _>(Some(&cell)),
        Err(MxError::TypeMismatch { .. })
    ));
}

#[test]
fn absent_handles_are_null_input() {
    let none: Option<&MxArray> = None;
    assert!(matches!(get_matrix::<f64, _>(none), Err(MxError::NullInput { .. })));
    assert!(matches!(get_volume::<f64, _>(none), Err(MxError::NullInput { .. })));
    assert!(matches!(get_scalar::<f64, _>(none), Err(MxError::NullInput { .. })));
    assert!(matches!(get_string(none), Err(MxError::NullInput { .. })));
}

#[test]
fn scalars_convert_like_a_cast() {
    let x = MxArray::scalar(3.75);
    assert_eq!(get_scalar::<f64, _>(Some(&x)), Ok(3.75));
    assert_eq!(get_scalar::<i32, _>(Some(&x)), Ok(3));
    assert_eq!(get_scalar::<u8, _>(Some(&MxArray::scalar(-2.0))), Ok(0));
    assert_eq!(get_scalar::<bool, _>(Some(&x)), Ok(true));

    let small = MxArray::numeric(&[1, 1], vec![7u16]).unwrap();
    assert_eq!(get_scalar::<f64, _>(Some(&small)), Ok(7.0));
    let flag = MxArray::logical(&[1, 1], vec![true]).unwrap();
    assert_eq!(get_scalar::<f64, _>(Some(&flag)), Ok(1.0));
}

#[test]
fn scalar_defaults_apply_only_when_absent() {
    let none: Option<&MxArray> = None;
    assert_eq!(get_scalar_or(none, 0.5f64), Ok(0.5));
    let text = MxArray::char_row("x");
    assert!(matches!(
        get_scalar_or(Some(&text), 0.5f64),
        Err(MxError::TypeMismatch { .. })
    ));
    assert_eq!(get_string_or(none, "fast").unwrap(), "fast");
    assert_eq!(get_string_or(Some(&text), "fast").unwrap(), "x");
    assert!(get_string_or(Some(&MxArray::scalar(1.0)), "fast").is_err());
}

#[test]
fn multi_row_char_arrays_read_column_major() {
    // ['ab'; 'cd'] is stored as a, c, b, d
    let units: Vec<u16> = "acbd".encode_utf16().collect();
    let a = MxArray::char_array(&[2, 2], units).unwrap();
    assert_eq!(get_string(Some(&a)).unwrap(), "acbd");
}

#[test]
fn read_write_views_write_through_to_owned_arrays() {
    let mut col = MxArray::zeros(ClassId::Single, &[3, 1]).unwrap();
    {
        let mut v = get_vector_mut::<f32, _>(&mut col).unwrap();
        v.copy_from_slice(&[1.0, 2.0, 3.0]).unwrap();
        v.set(0, 10.0).unwrap();
        assert!(v.set(3, 0.0).is_err());
    }
    let v = get_vector::<f32, _>(Some(&col)).unwrap();
    assert_eq!(v.as_slice(), &[10.0, 2.0, 3.0]);

    let mut m = iota(&[2, 2]);
    get_matrix_mut::<f64, _>(&mut m).unwrap().fill(1.0);
    assert!(get_matrix::<f64, _>(Some(&m)).unwrap().iter().all(|&x| x == 1.0));

    let mut vol = iota(&[2, 2, 2]);
    get_volume_mut::<f64, _>(&mut vol)
        .unwrap()
        .set(1, 1, 1, -1.0)
        .unwrap();
    assert_eq!(get_volume::<f64, _>(Some(&vol)).unwrap().at(1, 1, 1), Ok(-1.0));

    assert!(matches!(
        get_matrix_mut::<i64, _>(&mut m),
        Err(MxError::TypeMismatch { .. })
    ));
}
