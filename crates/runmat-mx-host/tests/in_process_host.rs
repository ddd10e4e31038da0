use runmat_mx_api::{ArrayData, ClassId, DynArray, Host, MxError};
use runmat_mx_host::{InProcessHost, MxArray};

#[test]
fn creates_zeroed_numeric_arrays() {
    let host = InProcessHost::new();
    let a = host.create_numeric(ClassId::Int16, &[2, 3]).unwrap();
    assert_eq!(a.class_id(), ClassId::Int16);
    assert_eq!(a.dims(), &[2, 3]);
    match a.data() {
        ArrayData::Int16(d) => assert!(d.iter().all(|&v| v == 0)),
        other => panic!("unexpected buffer {other:?}"),
    }
    assert_eq!(host.allocations(), 1);
    assert_eq!(host.allocated_elements(), 6);
}

#[test]
fn refuses_non_numeric_classes_on_the_numeric_path() {
    let host = InProcessHost::new();
    let err = host.create_numeric(ClassId::Cell, &[1, 1]).unwrap_err();
    assert!(matches!(err, MxError::Allocation { class: ClassId::Cell, .. }));
    assert_eq!(host.allocations(), 0);
}

#[test]
fn element_budget_makes_allocation_fail() {
    let host = InProcessHost::with_element_limit(10);
    host.create_numeric(ClassId::Double, &[2, 4]).unwrap();
    let err = host.create_numeric(ClassId::Double, &[3, 1]).unwrap_err();
    assert_eq!(err.identifier(), "RunMat:mx:allocation");
    assert_eq!(host.allocated_elements(), 8);
    host.create_char("ab").unwrap();
    assert_eq!(host.allocated_elements(), 10);
}

#[test]
fn struct_and_cell_creation() {
    let host = InProcessHost::new();
    let s = host.create_struct(&[1, 1], &["alpha", "beta"]).unwrap();
    assert_eq!(s.class_id(), ClassId::Struct);
    assert_eq!(s.field_names(), vec!["alpha", "beta"]);
    assert!(s.field(0, "alpha").is_none());

    let dup = host.create_struct(&[1, 1], &["a", "a"]).unwrap_err();
    assert!(matches!(dup, MxError::Allocation { .. }));

    let c = host.create_cell(&[1, 4]).unwrap();
    assert_eq!(c.class_id(), ClassId::Cell);
    assert_eq!(c.numel(), 4);
}

#[test]
fn struct_from_keeps_field_order() {
    let s = MxArray::struct_from(vec![
        ("zeta", MxArray::scalar(1.0)),
        ("alpha", MxArray::char_row("x")),
    ])
    .unwrap();
    assert_eq!(s.field_names(), vec!["zeta", "alpha"]);
    assert_eq!(s.field(0, "alpha").unwrap().class_id(), ClassId::Char);
}

#[test]
fn refused_struct_leaves_the_budget_untouched() {
    let host = InProcessHost::with_element_limit(1);
    let err = host.create_struct(&[1, 1], &["a", "a"]).unwrap_err();
    assert!(matches!(err, MxError::Allocation { class: ClassId::Struct, .. }));
    assert_eq!(host.allocations(), 0);
    assert_eq!(host.allocated_elements(), 0);

    let a = host.create_numeric(ClassId::Double, &[1, 1]).unwrap();
    assert_eq!(a.numel(), 1);
    assert_eq!(host.allocations(), 1);
    assert_eq!(host.allocated_elements(), 1);
}
