//! Shared helpers for the integration tests.
#![allow(dead_code)]

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Dense column-major mirror of a test matrix, 1-based like the crate API
/// (row/column 0 unused).
pub struct Dense {
    pub n: usize,
    cols: Vec<Vec<f64>>,
}

impl Dense {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            cols: vec![vec![0.0; n + 1]; n + 1],
        }
    }

    pub fn set(&mut self, i: usize, j: usize, v: f64) {
        self.cols[j][i] = v;
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.cols[j][i]
    }

    pub fn set_col(&mut self, j: usize, col: &[(usize, f64)]) {
        for i in 1..=self.n {
            self.cols[j][i] = 0.0;
        }
        for &(i, v) in col {
            self.cols[j][i] = v;
        }
    }

    /// Column callback in the form `Luf::decomp`/`Inv::decomp` expect.
    pub fn col(&self, j: usize, rn: &mut [usize], aj: &mut [f64]) -> usize {
        let mut len = 0;
        for i in 1..=self.n {
            let v = self.cols[j][i];
            if v != 0.0 {
                len += 1;
                rn[len] = i;
                aj[len] = v;
            }
        }
        len
    }

    /// `y = A*x`, 1-based.
    pub fn mul(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.n + 1];
        for j in 1..=self.n {
            for i in 1..=self.n {
                y[i] += self.cols[j][i] * x[j];
            }
        }
        y
    }

    /// `y = A'*x`, 1-based.
    pub fn mul_t(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.n + 1];
        for j in 1..=self.n {
            for i in 1..=self.n {
                y[j] += self.cols[j][i] * x[i];
            }
        }
        y
    }
}

/// Compare slots `1..=n` of two 1-based vectors.
pub fn assert_allclose(a: &[f64], b: &[f64], tol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for k in 1..a.len() {
        let diff = (a[k] - b[k]).abs();
        let bound = tol * (1.0 + b[k].abs());
        assert!(
            diff <= bound,
            "{}: slot {} differs: {} vs {} (diff = {:e})",
            msg,
            k,
            a[k],
            b[k],
            diff
        );
    }
}

fn small_entry(rng: &mut ChaCha8Rng) -> f64 {
    let v: f64 = rng.gen_range(0.05..0.2);
    if rng.gen::<bool>() {
        v
    } else {
        -v
    }
}

/// A strictly diagonally dominant sparse matrix: large diagonal plus a few
/// small off-diagonal entries per column. Always nonsingular.
pub fn random_basis(n: usize, seed: u64) -> Dense {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut a = Dense::zeros(n);
    for j in 1..=n {
        a.set(j, j, 10.0 + rng.gen_range(0.0..1.0));
        for _ in 0..3 {
            let i = rng.gen_range(1..=n);
            if i != j && a.get(i, j) == 0.0 {
                let v = small_entry(&mut rng);
                a.set(i, j, v);
            }
        }
    }
    a
}

/// A replacement column in the same diagonally dominant style: a large
/// entry on the diagonal position plus a few small ones elsewhere.
pub fn random_col(n: usize, j: usize, seed: u64) -> Vec<(usize, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut col = vec![(j, 10.0 + rng.gen_range(0.0..1.0))];
    for _ in 0..3 {
        let i = rng.gen_range(1..=n);
        if i != j && !col.iter().any(|&(k, _)| k == i) {
            let v = small_entry(&mut rng);
            col.push((i, v));
        }
    }
    col
}

/// A 1-based right-hand side with entries in (-1, 1).
pub fn random_rhs(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut b = vec![0.0; n + 1];
    for k in 1..=n {
        b[k] = rng.gen_range(-1.0..1.0);
    }
    b
}
