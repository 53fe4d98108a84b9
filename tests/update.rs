//! Forrest-Tomlin update scenarios for `Inv`.

mod common;

use common::{assert_allclose, random_basis, random_col, random_rhs, Dense};
use ftlu::{Inv, UpdateError};

// Replace column j of the basis mirrored in `a` by `col`, through an
// FTRAN(save) of the entering column followed by the update.
fn replace_column(inv: &mut Inv, a: &mut Dense, j: usize, col: &[(usize, f64)]) {
    let n = a.n;
    let mut x = vec![0.0; n + 1];
    for &(i, v) in col {
        x[i] = v;
    }
    inv.ftran(&mut x, true);
    inv.update(j).unwrap();
    a.set_col(j, col);
}

#[test]
fn update_matches_refactorization() {
    let n = 5;
    let mut a = random_basis(n, 101);
    let mut inv = Inv::new(n, 0);
    inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    replace_column(&mut inv, &mut a, 3, &random_col(n, 3, 102));
    assert_eq!(inv.nfs(), 1);

    // a fresh factorization of the new basis must transform alike
    let mut fresh = Inv::new(n, 0);
    fresh.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    let b = random_rhs(n, 103);
    let mut x_upd = b.clone();
    inv.ftran(&mut x_upd, false);
    let mut x_ref = b.clone();
    fresh.ftran(&mut x_ref, false);
    assert_allclose(&x_upd, &x_ref, 1e-9, "ftran after update");
    assert_allclose(&a.mul(&x_upd), &b, 1e-9, "B*x = b after update");

    let c = random_rhs(n, 104);
    let mut y_upd = c.clone();
    inv.btran(&mut y_upd);
    let mut y_ref = c.clone();
    fresh.btran(&mut y_ref);
    assert_allclose(&y_upd, &y_ref, 1e-9, "btran after update");
}

#[test]
fn update_sequence_matches_refactorization() {
    let n = 8;
    let mut a = random_basis(n, 201);
    let mut inv = Inv::new(n, 0);
    inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    for (step, &j) in [3usize, 6, 1, 3, 8].iter().enumerate() {
        replace_column(&mut inv, &mut a, j, &random_col(n, j, 300 + step as u64));

        let mut fresh = Inv::new(n, 0);
        fresh.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
        let b = random_rhs(n, 400 + step as u64);
        let mut x_upd = b.clone();
        inv.ftran(&mut x_upd, false);
        let mut x_ref = b.clone();
        fresh.ftran(&mut x_ref, false);
        assert_allclose(&x_upd, &x_ref, 1e-8, "ftran within update sequence");
    }
    assert_eq!(inv.nfs(), 5);

    // the permutations remain bijective after updating
    for k in 1..=n {
        assert_eq!(inv.luf.pp_row(inv.luf.pp_col(k)), k);
        assert_eq!(inv.luf.qq_row(inv.luf.qq_col(k)), k);
    }
}

#[test]
fn structurally_singular_update_is_rejected() {
    // on the unity basis, replacing column 3 by the first unit column
    // leaves no element on or below diagonal position 3
    let mut inv = Inv::new(3, 0);
    let mut x = vec![0.0, 1.0, 0.0, 0.0];
    inv.ftran(&mut x, true);
    assert_eq!(inv.update(3), Err(UpdateError::Singular));
    assert!(!inv.valid());
}

#[test]
fn eta_file_limit_demands_refactorization() {
    let n = 3;
    let mut a = random_basis(n, 501);
    let mut inv = Inv::new(n, 0);
    inv.hh_max = 2;
    inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    replace_column(&mut inv, &mut a, 1, &random_col(n, 1, 502));
    replace_column(&mut inv, &mut a, 2, &random_col(n, 2, 503));
    assert_eq!(inv.nfs(), 2);

    // the third update must demand refactorization
    let col = random_col(n, 3, 504);
    let mut x = vec![0.0; n + 1];
    for &(i, v) in &col {
        x[i] = v;
    }
    inv.ftran(&mut x, true);
    assert_eq!(inv.update(3), Err(UpdateError::UpdateLimitReached));
    assert!(!inv.valid());

    // a decomp of the current basis recovers the instance
    a.set_col(3, &col);
    inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
    assert!(inv.valid());
    assert_eq!(inv.nfs(), 0);

    let b = random_rhs(n, 505);
    let mut x = b.clone();
    inv.ftran(&mut x, false);
    assert_allclose(&a.mul(&x), &b, 1e-9, "B*x = b after recovery");
}

#[test]
fn updated_instance_solves_shared_rhs_like_refactorized_one() {
    // build a 5x5 basis, replace column 3, and let both the updated and
    // the refactorized instance solve one shared right-hand side
    let n = 5;
    let mut a = random_basis(n, 601);
    let mut inv = Inv::new(n, 0);
    inv.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();
    replace_column(&mut inv, &mut a, 3, &random_col(n, 3, 602));

    let mut refac = Inv::new(n, 0);
    refac.decomp(&mut |j, rn, aj| a.col(j, rn, aj)).unwrap();

    let b = random_rhs(n, 603);
    let mut x1 = b.clone();
    inv.ftran(&mut x1, false);
    let mut x2 = b.clone();
    refac.ftran(&mut x2, false);
    assert_allclose(&a.mul(&x1), &b, 1e-9, "updated instance");
    assert_allclose(&a.mul(&x2), &b, 1e-9, "refactorized instance");
    assert_allclose(&x1, &x2, 1e-9, "solutions agree");
}

#[test]
#[should_panic(expected = "new column has not been prepared")]
fn update_without_prepared_column_faults() {
    let mut inv = Inv::new(3, 0);
    let _ = inv.update(1);
}
