// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use log::debug;

use crate::inv::Inv;
use crate::luf::sva::{defrag_sva, enlarge_col, enlarge_row};
use crate::UpdateError;

impl Inv {
    /// Replace column `j` of the basis matrix by the column prepared with
    /// [`ftran`](Inv::ftran)`(x, true)` and fold the change into the eta
    /// file by the Forrest-Tomlin technique.
    ///
    /// The new column is spliced into `V`; the implicit `U = P*V*Q` then
    /// has a spike at column position `k1` reaching down to row position
    /// `k2`. Rows and columns `k1..=k2` of `U` are rotated by one position
    /// (a pure permutation change), which leaves a single disturbed row;
    /// that row is restored to triangular form by eliminating it against
    /// the pivot rows in between, and the multipliers become a new eta row
    /// of `H`. The work is proportional to the fill-in of the disturbed
    /// row, not to a refactorization.
    ///
    /// Faults when the factorization is not valid or when no column has
    /// been prepared.
    ///
    /// # Errors
    ///
    /// [`UpdateError::UpdateLimitReached`] when the eta file already holds
    /// [`hh_max`](Inv::hh_max) factors; [`UpdateError::Singular`] when the
    /// replacement makes the basis structurally singular (`k1 > k2`);
    /// [`UpdateError::Inaccurate`] when the new pivot falls below
    /// [`upd_tol`](Inv::upd_tol); [`UpdateError::Overflow`] when the sparse
    /// vector area is exhausted. Every error invalidates the instance;
    /// recover with [`decomp`](Inv::decomp).
    pub fn update(&mut self, j: usize) -> Result<(), UpdateError> {
        assert!(self.valid, "inv_update: the factorization is not valid");
        let n = self.luf.n;
        assert!(1 <= j && j <= n, "inv_update: j = {}; invalid column", j);
        let cc_len = self
            .cc_len
            .take()
            .expect("inv_update: new column has not been prepared");

        // the eta file capacity is checked up front: the stored factors
        // are intact, but the caller must refactorize before updating
        if self.hh_ndx.len() == self.hh_max {
            self.valid = false;
            return Err(UpdateError::UpdateLimitReached);
        }

        let luf = &mut self.luf;
        let eps_tol = luf.eps_tol;

        // remove the elements of the j-th column from the matrix V
        let j_beg = luf.vc_ptr[j];
        let j_len = luf.vc_len[j];
        for j_ptr in j_beg..j_beg + j_len {
            let i = luf.sv_ndx[j_ptr];
            // remove v[i,j] from the i-th row
            let i_end = luf.vr_ptr[i] + luf.vr_len[i] - 1;
            let mut i_ptr = luf.vr_ptr[i];
            while luf.sv_ndx[i_ptr] != j {
                i_ptr += 1;
            }
            assert!(i_ptr <= i_end);
            luf.sv_ndx[i_ptr] = luf.sv_ndx[i_end];
            luf.sv_val[i_ptr] = luf.sv_val[i_end];
            luf.vr_len[i] -= 1;
        }
        luf.nnz_v -= j_len;
        luf.vc_len[j] = 0;

        // splice the new elements into the rows of V; k1 is the column
        // position of j in U and k2 the lowest row position it reaches
        let k1 = luf.qq.pos(j);
        let mut k2 = 0;
        for ptr in 1..=cc_len {
            let i = self.cc_ndx[ptr];
            if luf.vr_len[i] + 1 > luf.vr_cap[i] {
                let cap = luf.vr_len[i] + 10;
                if enlarge_row(luf, i, cap).is_err() {
                    self.valid = false;
                    luf.new_sva = 2 * luf.sv_size;
                    return Err(UpdateError::Overflow {
                        new_sva: luf.new_sva,
                    });
                }
            }
            let i_ptr = luf.vr_ptr[i] + luf.vr_len[i];
            luf.sv_ndx[i_ptr] = j;
            luf.sv_val[i_ptr] = self.cc_val[ptr];
            luf.vr_len[i] += 1;
            k2 = k2.max(luf.pp.pos(i));
        }
        // and into the (currently empty) j-th column
        if luf.vc_cap[j] < cc_len && enlarge_col(luf, j, cc_len).is_err() {
            self.valid = false;
            luf.new_sva = 2 * luf.sv_size;
            return Err(UpdateError::Overflow {
                new_sva: luf.new_sva,
            });
        }
        let j_ptr = luf.vc_ptr[j];
        for ptr in 1..=cc_len {
            luf.sv_ndx[j_ptr + ptr - 1] = self.cc_ndx[ptr];
            luf.sv_val[j_ptr + ptr - 1] = self.cc_val[ptr];
        }
        luf.nnz_v += cc_len;
        luf.vc_len[j] = cc_len;

        // with k1 > k2 the diagonal element u[k2,k2] would be zero, so the
        // adjacent basis matrix is structurally singular
        if k1 > k2 {
            self.valid = false;
            return Err(UpdateError::Singular);
        }

        // rotate rows and columns k1..=k2 of U by one position; only the
        // permutations change, no data moves. The disturbed row i lands at
        // position k2, as does the column j.
        let i = luf.pp.at(k1);
        luf.pp.rotate_left(k1, k2);
        luf.qq.rotate_left(k1, k2);
        assert_eq!(luf.pp.at(k2), i);
        assert_eq!(luf.qq.at(k2), j);

        // the i-th row is rebuilt: gather it into the working array and
        // empty it in both representations of V
        self.wk_ndx.clear();
        let i_beg = luf.vr_ptr[i];
        let i_len = luf.vr_len[i];
        for i_ptr in i_beg..i_beg + i_len {
            let jj = luf.sv_ndx[i_ptr];
            luf.flag[jj] = true;
            luf.work[jj] = luf.sv_val[i_ptr];
            self.wk_ndx.push(jj);
            // remove v[i,jj] from the jj-th column
            let jj_end = luf.vc_ptr[jj] + luf.vc_len[jj] - 1;
            let mut jj_ptr = luf.vc_ptr[jj];
            while luf.sv_ndx[jj_ptr] != i {
                jj_ptr += 1;
            }
            assert!(jj_ptr <= jj_end);
            luf.sv_ndx[jj_ptr] = luf.sv_ndx[jj_end];
            luf.sv_val[jj_ptr] = luf.sv_val[jj_end];
            luf.vc_len[jj] -= 1;
        }
        luf.nnz_v -= i_len;
        luf.vr_len[i] = 0;

        // eliminate the row entries at positions k1..k2-1 of U against the
        // pivot rows in between; each multiplier becomes an element of the
        // new eta row, stored back to front in the right part of the area
        let mut hh_len = 0;
        for k in k1..k2 {
            let jj = luf.qq.at(k);
            if !luf.flag[jj] {
                continue;
            }
            let p = luf.pp.at(k);
            let f = luf.work[jj] / luf.vr_piv[p];
            // the element at position k is annihilated exactly
            luf.flag[jj] = false;
            luf.work[jj] = 0.0;
            // work := work - f * (p-th row of V)
            for p_ptr in luf.vr_ptr[p]..luf.vr_ptr[p] + luf.vr_len[p] {
                let c = luf.sv_ndx[p_ptr];
                let val = luf.sv_val[p_ptr];
                if luf.flag[c] {
                    luf.work[c] -= f * val;
                } else {
                    luf.flag[c] = true;
                    luf.work[c] = -f * val;
                    self.wk_ndx.push(c);
                }
            }
            // store the multiplier in the eta row
            if luf.sv_end - luf.sv_beg < 1 {
                defrag_sva(luf);
                if luf.sv_end - luf.sv_beg < 1 {
                    self.valid = false;
                    luf.new_sva = 2 * luf.sv_size;
                    return Err(UpdateError::Overflow {
                        new_sva: luf.new_sva,
                    });
                }
            }
            luf.sv_end -= 1;
            luf.sv_ndx[luf.sv_end] = p;
            luf.sv_val[luf.sv_end] = f;
            hh_len += 1;
        }

        // the element at position k2 is the new pivot of the i-th row
        let piv = if luf.flag[j] {
            luf.flag[j] = false;
            let t = luf.work[j];
            luf.work[j] = 0.0;
            t
        } else {
            0.0
        };
        if piv.abs() < self.upd_tol {
            self.valid = false;
            return Err(UpdateError::Inaccurate);
        }
        luf.vr_piv[i] = piv;

        // write the surviving tail back as the new i-th row of V, in both
        // representations
        let mut new_len = 0;
        for t in 0..self.wk_ndx.len() {
            let c = self.wk_ndx[t];
            if !luf.flag[c] {
                continue;
            }
            luf.flag[c] = false;
            let val = luf.work[c];
            luf.work[c] = 0.0;
            assert!(luf.qq.pos(c) > k2);
            if val == 0.0 || val.abs() < eps_tol {
                // close to zero; drop it
                continue;
            }
            if luf.vr_len[i] + 1 > luf.vr_cap[i] {
                let cap = luf.vr_len[i] + 10;
                if enlarge_row(luf, i, cap).is_err() {
                    self.valid = false;
                    luf.new_sva = 2 * luf.sv_size;
                    return Err(UpdateError::Overflow {
                        new_sva: luf.new_sva,
                    });
                }
            }
            let i_ptr = luf.vr_ptr[i] + luf.vr_len[i];
            luf.sv_ndx[i_ptr] = c;
            luf.sv_val[i_ptr] = val;
            luf.vr_len[i] += 1;
            if luf.vc_len[c] + 1 > luf.vc_cap[c] {
                let cap = luf.vc_len[c] + 10;
                if enlarge_col(luf, c, cap).is_err() {
                    self.valid = false;
                    luf.new_sva = 2 * luf.sv_size;
                    return Err(UpdateError::Overflow {
                        new_sva: luf.new_sva,
                    });
                }
            }
            let c_ptr = luf.vc_ptr[c] + luf.vc_len[c];
            luf.sv_ndx[c_ptr] = i;
            luf.sv_val[c_ptr] = val;
            luf.vc_len[c] += 1;
            new_len += 1;
        }
        luf.nnz_v += new_len;

        // append the eta factor; its elements were stored above ending at
        // the current sv_end
        self.hh_ndx.push(i);
        self.hh_ptr.push(self.luf.sv_end);
        self.hh_len.push(hh_len);
        self.nnz_h += hh_len;

        if cfg!(feature = "debug") {
            assert_eq!(crate::luf::sva::v_file_diff(&self.luf), 0);
        }
        debug!(
            "updated column {}: spike {}..{}, eta of {} elements",
            j, k1, k2, hh_len
        );
        Ok(())
    }
}
