// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::inv::Inv;

impl Inv {
    /// Forward transformation: solve `B*x = b` in place, where on entry
    /// `x[1..=n]` holds `b` and on exit the solution.
    ///
    /// With `save` set, the partially transformed column (the intermediate
    /// after the `F` and `H` solves, before the `V` solve) is kept as the
    /// prepared column for a following [`update`](Inv::update). In the
    /// simplex method `b` is then the entering column of the basis matrix.
    ///
    /// Faults when the factorization is not valid.
    pub fn ftran(&mut self, x: &mut [f64], save: bool) {
        assert!(self.valid, "inv_ftran: the factorization is not valid");
        let n = self.luf.n();
        // B = F*H*V, hence inv(B) = inv(V)*inv(H)*inv(F); F is solved
        // under the permutation snapshot of the last refactorization
        self.luf.f_solve_perm(false, x, &self.p0);
        self.h_solve(false, x);
        if save {
            let mut len = 0;
            for i in 1..=n {
                if x[i] != 0.0 {
                    len += 1;
                    self.cc_ndx[len] = i;
                    self.cc_val[len] = x[i];
                }
            }
            self.cc_len = Some(len);
        }
        self.luf.v_solve(false, x);
    }

    /// Backward transformation: solve `B'*x = b` in place, where on entry
    /// `x[1..=n]` holds `b` and on exit the solution.
    ///
    /// Faults when the factorization is not valid.
    pub fn btran(&mut self, x: &mut [f64]) {
        assert!(self.valid, "inv_btran: the factorization is not valid");
        // B' = V'*H'*F', hence inv(B') = inv(F')*inv(H')*inv(V')
        self.luf.v_solve(true, x);
        self.h_solve(true, x);
        self.luf.f_solve_perm(true, x, &self.p0);
    }

    // Solve H*x = b (tr false) or H'*x = b (tr true) in place. Each factor
    // differs from the unity matrix in one row, so the direct system is a
    // forward pass of sparse dot products and the transposed one a
    // backward pass of sparse axpys.
    pub(crate) fn h_solve(&self, tr: bool, x: &mut [f64]) {
        let nfs = self.hh_ndx.len();
        if !tr {
            for k in 0..nfs {
                let i = self.hh_ndx[k];
                let mut temp = x[i];
                for ptr in self.hh_ptr[k]..self.hh_ptr[k] + self.hh_len[k] {
                    temp -= self.luf.sv_val[ptr] * x[self.luf.sv_ndx[ptr]];
                }
                x[i] = temp;
            }
        } else {
            for k in (0..nfs).rev() {
                let i = self.hh_ndx[k];
                let temp = x[i];
                if temp != 0.0 {
                    for ptr in self.hh_ptr[k]..self.hh_ptr[k] + self.hh_len[k] {
                        x[self.luf.sv_ndx[ptr]] -= self.luf.sv_val[ptr] * temp;
                    }
                }
            }
        }
    }
}
