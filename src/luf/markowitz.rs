// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::{Luf, WorkArea};

// Choose a pivot element in the active submatrix of U = P*V*Q.
//
// An eligible pivot must satisfy the threshold stability condition
//
//     |v[i,j]| >= piv_tol * max|v[i,*]|
//
// proposed by J. Reid, with the row maxima cached lazily in wa.rs_max. From
// all eligible pivots the search prefers one with small Markowitz cost
//
//     mc := (nnz[pivot row] - 1) * (nnz[pivot column] - 1),
//
// walking the sets R[len] and C[len] of active rows and columns in
// increasing order of nonzero count as proposed by I. Duff. Singletons are
// taken immediately and need no stability check. The search stops early
// when a candidate in a row or column not longer than the set being scanned
// is found, or after piv_lim candidates have been considered.
//
// A column none of whose elements satisfies the stability condition is
// excluded from the active sets until it becomes a column singleton, as
// suggested by U. Suhl. An excluded column is recognizable by its
// self-linked list node; eliminate() relies on this marking.
//
// Returns the pivot (p, q), or None when the active submatrix is zero and
// the matrix is therefore singular.
pub(crate) fn find_pivot(luf: &Luf, wa: &mut WorkArea) -> Option<(usize, usize)> {
    let n = luf.n;
    let piv_tol = luf.piv_tol;
    let piv_lim = luf.piv_lim;
    let suhl = luf.suhl;

    let mut p = 0;
    let mut q = 0;
    let mut best = f64::INFINITY;
    let mut ncand = 0;

    // a column singleton is taken immediately
    let j = wa.cs_head[1];
    if j != 0 {
        assert_eq!(luf.vc_len[j], 1);
        return Some((luf.sv_ndx[luf.vc_ptr[j]], j));
    }
    // as is a row singleton
    let i = wa.rs_head[1];
    if i != 0 {
        assert_eq!(luf.vr_len[i], 1);
        return Some((i, luf.sv_ndx[luf.vr_ptr[i]]));
    }

    // no singletons; walk the non-empty rows and columns
    for len in 2..=n {
        // active columns with len nonzeros
        let mut j = wa.cs_head[len];
        while j != 0 {
            // the scan may remove column j from the set, so keep its link
            let next_j = wa.cs_next[j];
            let j_beg = luf.vc_ptr[j];
            let j_end = j_beg + luf.vc_len[j] - 1;
            // find an eligible element of the j-th column placed in a row
            // with minimal nonzero count (it may not exist)
            let mut min_p = 0;
            let mut min_q = 0;
            let mut min_len = usize::MAX;
            for j_ptr in j_beg..=j_end {
                let i = luf.sv_ndx[j_ptr];
                if luf.vr_len[i] >= min_len {
                    continue;
                }
                // largest magnitude in the i-th row, computed on demand
                let mut big = wa.rs_max[i];
                if big < 0.0 {
                    big = 0.0;
                    for i_ptr in luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i] {
                        big = big.max(luf.sv_val[i_ptr].abs());
                    }
                    wa.rs_max[i] = big;
                }
                // find v[i,j] in the i-th row
                let i_end = luf.vr_ptr[i] + luf.vr_len[i] - 1;
                let mut i_ptr = luf.vr_ptr[i];
                while luf.sv_ndx[i_ptr] != j {
                    i_ptr += 1;
                }
                assert!(i_ptr <= i_end);
                if luf.sv_val[i_ptr].abs() < piv_tol * big {
                    continue;
                }
                min_p = i;
                min_q = j;
                min_len = luf.vr_len[i];
                // a Markowitz cost of at most (len-1)^2 cannot be beaten by
                // much; take the element right away
                if min_len <= len {
                    return Some((min_p, min_q));
                }
            }
            if min_p != 0 {
                ncand += 1;
                let cost = (min_len - 1) as f64 * (len - 1) as f64;
                if cost < best {
                    p = min_p;
                    q = min_q;
                    best = cost;
                }
                if ncand == piv_lim {
                    return Some((p, q));
                }
            } else if suhl {
                // exclude the column until it becomes a singleton
                if wa.cs_prev[j] == 0 {
                    wa.cs_head[len] = wa.cs_next[j];
                } else {
                    wa.cs_next[wa.cs_prev[j]] = wa.cs_next[j];
                }
                if wa.cs_next[j] != 0 {
                    wa.cs_prev[wa.cs_next[j]] = wa.cs_prev[j];
                }
                // self-link the node so that eliminate() can pass it
                // through its removal code unharmed
                wa.cs_prev[j] = j;
                wa.cs_next[j] = j;
            }
            j = next_j;
        }

        // active rows with len nonzeros
        let mut i = wa.rs_head[len];
        while i != 0 {
            let i_beg = luf.vr_ptr[i];
            let i_end = i_beg + luf.vr_len[i] - 1;
            let mut big = wa.rs_max[i];
            if big < 0.0 {
                big = 0.0;
                for i_ptr in i_beg..=i_end {
                    big = big.max(luf.sv_val[i_ptr].abs());
                }
                wa.rs_max[i] = big;
            }
            // find an eligible element of the i-th row placed in a column
            // with minimal nonzero count (it always exists: the largest
            // element of the row is eligible)
            let mut min_p = 0;
            let mut min_q = 0;
            let mut min_len = usize::MAX;
            for i_ptr in i_beg..=i_end {
                let j = luf.sv_ndx[i_ptr];
                if luf.vc_len[j] >= min_len {
                    continue;
                }
                if luf.sv_val[i_ptr].abs() < piv_tol * big {
                    continue;
                }
                min_p = i;
                min_q = j;
                min_len = luf.vc_len[j];
                if min_len <= len {
                    return Some((min_p, min_q));
                }
            }
            assert!(min_p != 0);
            ncand += 1;
            let cost = (len - 1) as f64 * (min_len - 1) as f64;
            if cost < best {
                p = min_p;
                q = min_q;
                best = cost;
            }
            if ncand == piv_lim {
                return Some((p, q));
            }
            i = wa.rs_next[i];
        }
    }

    if p == 0 {
        // the active submatrix is zero
        None
    } else {
        Some((p, q))
    }
}
