//! Factorization and solve scenarios for `Luf`.

mod common;

use common::{assert_allclose, random_basis, random_rhs, Dense};
use ftlu::{FactorError, Inv, Luf, WorkArea};

#[test]
fn singleton_chain() {
    // diag(2, 3, 5) is eliminated through column singletons alone
    let mut a = Dense::zeros(3);
    a.set(1, 1, 2.0);
    a.set(2, 2, 3.0);
    a.set(3, 3, 5.0);

    let mut luf = Luf::new(3, 0);
    let mut wa = WorkArea::new(3);
    luf.decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
    assert!(luf.valid());
    assert_eq!(luf.rank(), 3);
    // the diagonal goes straight to the pivots, nothing is left sparse
    assert_eq!(luf.nnz_v(), 0);
    assert_eq!(luf.nnz_f(), 0);

    let mut x = vec![0.0, 2.0, 3.0, 5.0];
    luf.solve(false, &mut x);
    assert_eq!(&x[1..], &[1.0, 1.0, 1.0]);
}

#[test]
fn round_trip_random() {
    let n = 20;
    let a = random_basis(n, 7);
    let mut luf = Luf::new(n, 0);
    let mut wa = WorkArea::new(n);
    luf.decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    // A * solve(A, b) == b
    let b = random_rhs(n, 8);
    let mut x = b.clone();
    luf.solve(false, &mut x);
    assert_allclose(&a.mul(&x), &b, 1e-10, "A*x = b");

    // A' * solve(A', c) == c
    let c = random_rhs(n, 9);
    let mut y = c.clone();
    luf.solve(true, &mut y);
    assert_allclose(&a.mul_t(&y), &c, 1e-10, "A'*y = c");
}

#[test]
fn permutations_stay_bijective() {
    let n = 15;
    let a = random_basis(n, 21);
    let mut luf = Luf::new(n, 0);
    let mut wa = WorkArea::new(n);
    luf.decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
    for k in 1..=n {
        assert_eq!(luf.pp_row(luf.pp_col(k)), k);
        assert_eq!(luf.pp_col(luf.pp_row(k)), k);
        assert_eq!(luf.qq_row(luf.qq_col(k)), k);
        assert_eq!(luf.qq_col(luf.qq_row(k)), k);
    }
}

#[test]
fn zero_column_is_singular_and_repairable() {
    // 2x2 with an all-zero second column
    let mut a = Dense::zeros(2);
    a.set(1, 1, 1.0);

    let mut luf = Luf::new(2, 0);
    let mut wa = WorkArea::new(2);
    let err = luf
        .decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj))
        .unwrap_err();
    assert_eq!(err, FactorError::Singular { rank: 1 });
    assert!(!luf.valid());
    assert_eq!(luf.rank(), 1);
    // the dependent column and its unit replacement
    assert_eq!(luf.qq_col(2), 2);
    assert_eq!(luf.pp_row(2), 2);

    // repairing as documented makes the matrix factorizable
    a.set(luf.pp_row(2), luf.qq_col(2), 1.0);
    luf.decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
    assert_eq!(luf.rank(), 2);
}

#[test]
fn growth_trip_reports_unstable() {
    // eliminating either pivot of [[1, 1], [1, -1]] doubles an element, so
    // a growth ceiling of 1 must trip
    let mut a = Dense::zeros(2);
    a.set(1, 1, 1.0);
    a.set(2, 1, 1.0);
    a.set(1, 2, 1.0);
    a.set(2, 2, -1.0);

    let mut luf = Luf::new(2, 0);
    luf.max_gro = 1.0;
    let mut wa = WorkArea::new(2);
    let err = luf
        .decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj))
        .unwrap_err();
    assert_eq!(err, FactorError::Unstable);
    assert!(!luf.valid());
}

#[test]
#[should_panic(expected = "not valid")]
fn ftran_faults_after_failed_decomp() {
    let mut a = Dense::zeros(2);
    a.set(1, 1, 1.0);
    a.set(2, 1, 1.0);
    a.set(1, 2, 1.0);
    a.set(2, 2, -1.0);

    let mut inv = Inv::new(2, 0);
    inv.luf.max_gro = 1.0;
    assert!(inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).is_err());

    let mut x = vec![0.0, 1.0, 0.0];
    inv.ftran(&mut x, false); // must fault
}

#[test]
fn tiny_sva_grows_transparently() {
    // a one-location area forces reallocation and restart inside decomp
    let n = 10;
    let a = random_basis(n, 33);
    let mut luf = Luf::new(n, 1);
    let mut wa = WorkArea::new(n);
    luf.decomp(&mut wa, &mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    let b = random_rhs(n, 34);
    let mut x = b.clone();
    luf.solve(false, &mut x);
    assert_allclose(&a.mul(&x), &b, 1e-10, "A*x = b after regrowth");
}
