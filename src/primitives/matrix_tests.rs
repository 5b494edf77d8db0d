use super::*;

#[test]
fn test_from_vec_valid() {
    let m = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(m.shape(), (2, 2));
    assert_eq!(m.get(1, 0), 3.0);
}

#[test]
fn test_from_vec_wrong_length() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0]);
    assert!(result.is_err());
}

#[test]
fn test_set_get() {
    let mut m = Matrix::zeros(2, 3);
    m.set(1, 2, 7.5);
    assert_eq!(m.get(1, 2), 7.5);
    assert_eq!(m.get(0, 0), 0.0);
}

#[test]
fn test_row_slice() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.row(0).as_slice(), &[1.0, 2.0, 3.0]);
}

#[test]
fn test_transpose() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let t = m.transpose();
    assert_eq!(t.shape(), (3, 2));
    assert_eq!(t.get(0, 1), 4.0);
    assert_eq!(t.get(2, 0), 3.0);
}

#[test]
fn test_matmul() {
    // [1 2] [5 6]   [19 22]
    // [3 4] [7 8] = [43 50]
    let a = Matrix::from_vec(2, 2, vec![1.0_f32, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_vec(2, 2, vec![5.0_f32, 6.0, 7.0, 8.0]).unwrap();
    let c = a.matmul(&b).unwrap();
    assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn test_matmul_dimension_mismatch() {
    let a = Matrix::zeros(2, 3);
    let b = Matrix::zeros(2, 3);
    assert!(a.matmul(&b).is_err());
}

#[test]
fn test_select_rows() {
    let m = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
    let s = m.select_rows(&[2, 0]);
    assert_eq!(s.shape(), (2, 2));
    assert_eq!(s.row_slice(0), &[5.0, 6.0]);
    assert_eq!(s.row_slice(1), &[1.0, 2.0]);
}
