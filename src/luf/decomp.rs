// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use log::debug;

use crate::luf::sva::defrag_sva;
use crate::luf::{build_f_rows, build_v_cols, eliminate, find_pivot, initialize};
use crate::luf::{Luf, WorkArea};
use crate::FactorError;

impl Luf {
    /// Compute the factorization `A = F*V` of the matrix given by the
    /// column callback.
    ///
    /// For each `j = 1..=n` the callback is invoked as `col(j, rn, aj)` and
    /// must store the row indices and values of the nonzero elements of the
    /// j-th column of `A` into `rn[1..=len]`, `aj[1..=len]`, returning
    /// `len`. Neither zero nor duplicate elements are allowed.
    ///
    /// `wa` is a working area pre-allocated for matrices of the order `n`
    /// with [`WorkArea::new`]; it carries no state between calls.
    ///
    /// When the sparse vector area turns out to be too small, it is
    /// reallocated with doubled size and the factorization is restarted
    /// from scratch; this never surfaces as an error.
    ///
    /// # Errors
    ///
    /// [`FactorError::Singular`] when the active submatrix becomes zero
    /// before `n` elimination steps; the rank estimate and the repair
    /// surface ([`rank`], [`pp_row`], [`qq_col`]) are left in place.
    /// [`FactorError::Unstable`] when the element growth exceeds
    /// [`max_gro`]. Either error leaves the factorization invalid.
    ///
    /// [`rank`]: Luf::rank
    /// [`pp_row`]: Luf::pp_row
    /// [`qq_col`]: Luf::qq_col
    /// [`max_gro`]: Luf::max_gro
    pub fn decomp<F>(&mut self, wa: &mut WorkArea, col: &mut F) -> Result<(), FactorError>
    where
        F: FnMut(usize, &mut [usize], &mut [f64]) -> usize,
    {
        let n = self.n;
        assert_eq!(wa.n, n, "luf_decomp: working area of wrong order");
        assert!(
            0.0 < self.piv_tol && self.piv_tol < 1.0,
            "luf_decomp: piv_tol = {}; invalid parameter",
            self.piv_tol
        );
        assert!(
            self.piv_lim > 0,
            "luf_decomp: piv_lim = {}; invalid parameter",
            self.piv_lim
        );
        assert!(
            0.0 <= self.eps_tol && self.eps_tol <= 1.0,
            "luf_decomp: eps_tol = {}; invalid parameter",
            self.eps_tol
        );
        assert!(
            self.max_gro >= 1.0,
            "luf_decomp: max_gro = {}; invalid parameter",
            self.max_gro
        );

        // the factorization is not valid until it is complete
        self.valid = false;

        'more: loop {
            // reallocate the sparse vector area if required
            if self.new_sva > 0 {
                debug!("growing sparse vector area to {} locations", self.new_sva);
                self.sv_size = self.new_sva;
                self.sv_ndx = vec![0; self.sv_size + 1];
                self.sv_val = vec![0.0; self.sv_size + 1];
                self.new_sva = 0;
            }

            if initialize(self, wa, col).is_err() {
                self.new_sva = 2 * self.sv_size;
                continue 'more;
            }

            // main elimination loop
            for k in 1..=n {
                // choose a pivot element v[p,q]
                let (p, q) = match find_pivot(self, wa) {
                    Some(pq) => pq,
                    None => {
                        // the active submatrix is zero
                        self.rank = k - 1;
                        return Err(FactorError::Singular { rank: self.rank });
                    }
                };
                // v[p,q] corresponds to u[i,j]; bring it to the position
                // u[k,k] by permuting rows k,i and columns k,j of U
                let i = self.pp.pos(p);
                let j = self.qq.pos(q);
                assert!(k <= i && i <= n && k <= j && j <= n);
                self.pp.swap_pos(k, i);
                self.qq.swap_pos(k, j);
                // eliminate the subdiagonal elements of the k-th column of
                // U using the pivot u[k,k] = v[p,q]
                if eliminate(self, wa, p, q).is_err() {
                    self.new_sva = 2 * self.sv_size;
                    continue 'more;
                }
                // too intensive growth means the matrix is most probably
                // ill-conditioned
                if self.big_v > self.max_gro * self.max_a {
                    self.rank = k - 1;
                    return Err(FactorError::Unstable);
                }
            }

            // U = P*V*Q is upper triangular now, V is complete row-wise and
            // F column-wise; merge the free locations and build the
            // remaining representations
            defrag_sva(self);
            if build_v_cols(self).is_err() {
                self.new_sva = 2 * self.sv_size;
                continue 'more;
            }
            if build_f_rows(self).is_err() {
                self.new_sva = 2 * self.sv_size;
                continue 'more;
            }

            self.valid = true;
            self.rank = n;

            // with little headroom left, arrange for a larger area next
            // time rather than risking repeated defragmentation
            let want = 3 * (n + self.nnz_v) + 2 * self.nnz_f;
            if self.sv_size < want {
                self.new_sva = self.sv_size;
                while self.new_sva < want {
                    self.new_sva += self.new_sva;
                }
            }

            if cfg!(feature = "debug") {
                assert_eq!(crate::luf::sva::v_file_diff(self), 0);
            }
            debug!(
                "factorized: n = {} nnz(A) = {} nnz(F) = {} nnz(V) = {}",
                n, self.nnz_a, self.nnz_f, self.nnz_v
            );
            return Ok(());
        }
    }
}
