// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::Luf;
use crate::perm::Perm;

impl Luf {
    /// Solve the system `F*x = b` (`tr` false) or `F'*x = b` (`tr` true) in
    /// place: on entry `x[1..=n]` holds `b`, on exit the solution.
    ///
    /// Since `P*F*inv(P)` is unit lower triangular, this is one sweep of
    /// substitution in the order given by `P`, in `O(nnz(F))` operations.
    ///
    /// Faults when the factorization is not valid.
    pub fn f_solve(&self, tr: bool, x: &mut [f64]) {
        self.f_solve_perm(tr, x, &self.pp);
    }

    // As f_solve, but under an explicit row permutation. The basis
    // maintenance layer substitutes here the snapshot taken at the last
    // refactorization, because updates move P while F stays put.
    pub(crate) fn f_solve_perm(&self, tr: bool, x: &mut [f64], pp: &Perm) {
        assert!(self.valid, "luf_f_solve: the factorization is not valid");
        let n = self.n;
        if !tr {
            // F*x = b
            for k in 1..=n {
                let i = pp.at(k);
                let xk = x[i];
                if xk != 0.0 {
                    for ptr in self.fc_ptr[i]..self.fc_ptr[i] + self.fc_len[i] {
                        x[self.sv_ndx[ptr]] -= self.sv_val[ptr] * xk;
                    }
                }
            }
        } else {
            // F'*x = b
            for k in (1..=n).rev() {
                let i = pp.at(k);
                let xk = x[i];
                if xk != 0.0 {
                    for ptr in self.fr_ptr[i]..self.fr_ptr[i] + self.fr_len[i] {
                        x[self.sv_ndx[ptr]] -= self.sv_val[ptr] * xk;
                    }
                }
            }
        }
    }

    /// Solve the system `V*x = b` (`tr` false) or `V'*x = b` (`tr` true) in
    /// place: on entry `x[1..=n]` holds `b`, on exit the solution.
    ///
    /// This is back substitution through the triangular `U = P*V*Q` using
    /// the stored pivot elements, walking the rows and columns of `U` in
    /// reverse order for the direct system and in forward order for the
    /// transposed one.
    ///
    /// Faults when the factorization is not valid.
    pub fn v_solve(&mut self, tr: bool, x: &mut [f64]) {
        assert!(self.valid, "luf_v_solve: the factorization is not valid");
        let n = self.n;
        // move the right-hand side into the working array; the solution is
        // scattered back into x
        for k in 1..=n {
            self.work[k] = x[k];
            x[k] = 0.0;
        }
        if !tr {
            // V*x = b
            for k in (1..=n).rev() {
                let i = self.pp.at(k);
                let j = self.qq.at(k);
                let temp = self.work[i];
                if temp != 0.0 {
                    let xj = temp / self.vr_piv[i];
                    x[j] = xj;
                    for ptr in self.vc_ptr[j]..self.vc_ptr[j] + self.vc_len[j] {
                        self.work[self.sv_ndx[ptr]] -= self.sv_val[ptr] * xj;
                    }
                }
            }
        } else {
            // V'*x = b
            for k in 1..=n {
                let i = self.pp.at(k);
                let j = self.qq.at(k);
                let temp = self.work[j];
                if temp != 0.0 {
                    let xi = temp / self.vr_piv[i];
                    x[i] = xi;
                    for ptr in self.vr_ptr[i]..self.vr_ptr[i] + self.vr_len[i] {
                        self.work[self.sv_ndx[ptr]] -= self.sv_val[ptr] * xi;
                    }
                }
            }
        }
    }

    /// Solve the system `A*x = b` (`tr` false) or `A'*x = b` (`tr` true) in
    /// place: on entry `x[1..=n]` holds `b`, on exit the solution.
    ///
    /// Faults when the factorization is not valid.
    pub fn solve(&mut self, tr: bool, x: &mut [f64]) {
        assert!(self.valid, "luf_solve: the factorization is not valid");
        if !tr {
            // A = F*V, hence inv(A) = inv(V)*inv(F)
            self.f_solve(false, x);
            self.v_solve(false, x);
        } else {
            // A' = V'*F', hence inv(A') = inv(F')*inv(V')
            self.v_solve(true, x);
            self.f_solve(true, x);
        }
    }
}
