// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::sva::SvaOverflow;
use crate::luf::{Luf, WorkArea};

// Initialize the factorization data structures for a matrix A given by the
// column callback. On exit V = A and F = P = Q = I; the row-wise
// representation of F is not built because it is not used at the
// factorization stage. The active submatrix is the entire matrix V: every
// row is in the set R[len] and every column in the set C[len] of its
// nonzero count, and the cached row maxima are marked unknown.
//
// The callback contract is checked here: for each j it must fill
// rn[1..=len], aj[1..=len] with the row indices and values of column j and
// return len, with no duplicate and no explicitly zero elements. Violations
// are programming errors and fault.
pub(crate) fn initialize<F>(luf: &mut Luf, wa: &mut WorkArea, col: &mut F) -> Result<(), SvaOverflow>
where
    F: FnMut(usize, &mut [usize], &mut [f64]) -> usize,
{
    let n = luf.n;
    let mut sv_beg = 1;
    let sv_end = luf.sv_size + 1;

    // the matrix F has no elements yet
    for j in 1..=n {
        luf.fc_ptr[j] = sv_end;
        luf.fc_len[j] = 0;
    }
    // clear rows of the matrix V and the flag array
    for i in 1..=n {
        luf.vr_len[i] = 0;
        luf.vr_cap[i] = 0;
        luf.flag[i] = false;
    }

    // build the matrix V in column-wise format (V = A); count nonzeros in
    // its rows and in total; find the largest magnitude
    let mut rn = vec![0usize; n + 1];
    let mut aj = vec![0.0f64; n + 1];
    let mut nnz = 0;
    let mut big: f64 = 0.0;
    for j in 1..=n {
        let len = col(j, &mut rn[..], &mut aj[..]);
        assert!(
            len <= n,
            "luf_decomp: j = {}; len = {}; invalid column length",
            j,
            len
        );
        if sv_end - sv_beg < len {
            return Err(SvaOverflow);
        }
        luf.vc_ptr[j] = sv_beg;
        luf.vc_len[j] = len;
        luf.vc_cap[j] = len;
        nnz += len;
        for ptr in 1..=len {
            let i = rn[ptr];
            let val = aj[ptr];
            assert!(
                1 <= i && i <= n,
                "luf_decomp: i = {}; j = {}; invalid row index",
                i,
                j
            );
            assert!(
                !luf.flag[i],
                "luf_decomp: i = {}; j = {}; duplicate element not allowed",
                i,
                j
            );
            assert!(
                val != 0.0,
                "luf_decomp: i = {}; j = {}; zero element not allowed",
                i,
                j
            );
            luf.sv_ndx[sv_beg] = i;
            luf.sv_val[sv_beg] = val;
            sv_beg += 1;
            big = big.max(val.abs());
            luf.flag[i] = true;
            luf.vr_cap[i] += 1;
        }
        for ptr in 1..=len {
            luf.flag[rn[ptr]] = false;
        }
    }

    // allocate rows of the matrix V
    for i in 1..=n {
        let len = luf.vr_cap[i];
        if sv_end - sv_beg < len {
            return Err(SvaOverflow);
        }
        luf.vr_ptr[i] = sv_beg;
        sv_beg += len;
    }
    // build the matrix V in row-wise format from its column-wise format
    for j in 1..=n {
        for ptr in luf.vc_ptr[j]..luf.vc_ptr[j] + luf.vc_len[j] {
            let i = luf.sv_ndx[ptr];
            let i_ptr = luf.vr_ptr[i] + luf.vr_len[i];
            luf.sv_ndx[i_ptr] = j;
            luf.sv_val[i_ptr] = luf.sv_val[ptr];
            luf.vr_len[i] += 1;
        }
    }

    // P = Q = I
    luf.pp.reset();
    luf.qq.reset();

    luf.sv_beg = sv_beg;
    luf.sv_end = sv_end;
    // the physical order of rows and columns of the matrix V is now
    // n+1..n+n, 1..n (first the columns, then the rows)
    luf.sv_head = n + 1;
    luf.sv_tail = n;
    for i in 1..=n {
        luf.sv_prev[i] = i - 1;
        luf.sv_next[i] = i + 1;
    }
    luf.sv_prev[1] = n + n;
    luf.sv_next[n] = 0;
    for j in 1..=n {
        luf.sv_prev[n + j] = n + j - 1;
        luf.sv_next[n + j] = n + j + 1;
    }
    luf.sv_prev[n + 1] = 0;
    luf.sv_next[n + n] = 1;

    // the working arrays must be clean for the elimination
    for k in 1..=n {
        luf.flag[k] = false;
        luf.work[k] = 0.0;
    }

    luf.nnz_a = nnz;
    luf.nnz_f = 0;
    luf.nnz_v = nnz;
    luf.max_a = big;
    luf.big_v = big;
    luf.rank = 0;

    // the largest magnitude in each active row is not known yet
    for i in 1..=n {
        wa.rs_max[i] = -1.0;
    }
    // build the linked lists of active rows
    for len in 0..=n {
        wa.rs_head[len] = 0;
    }
    for i in 1..=n {
        let len = luf.vr_len[i];
        wa.rs_prev[i] = 0;
        wa.rs_next[i] = wa.rs_head[len];
        if wa.rs_next[i] != 0 {
            wa.rs_prev[wa.rs_next[i]] = i;
        }
        wa.rs_head[len] = i;
    }
    // and of active columns
    for len in 0..=n {
        wa.cs_head[len] = 0;
    }
    for j in 1..=n {
        let len = luf.vc_len[j];
        wa.cs_prev[j] = 0;
        wa.cs_next[j] = wa.cs_head[len];
        if wa.cs_next[j] != 0 {
            wa.cs_prev[wa.cs_next[j]] = j;
        }
        wa.cs_head[len] = j;
    }
    Ok(())
}
