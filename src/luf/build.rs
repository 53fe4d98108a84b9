// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::sva::SvaOverflow;
use crate::luf::Luf;

// Build the column-wise representation of the matrix V from its row-wise
// representation. On entry all columns must be empty, with their nodes
// removed from the addressing list; eliminate() leaves them in exactly this
// state.
pub(crate) fn build_v_cols(luf: &mut Luf) -> Result<(), SvaOverflow> {
    let n = luf.n;
    // count nonzeros in the columns and in total
    let mut nnz = 0;
    for i in 1..=n {
        for i_ptr in luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i] {
            luf.vc_cap[luf.sv_ndx[i_ptr]] += 1;
        }
        nnz += luf.vr_len[i];
    }
    luf.nnz_v = nnz;
    if luf.sv_end - luf.sv_beg < nnz {
        return Err(SvaOverflow);
    }
    // allocate the columns
    for j in 1..=n {
        luf.vc_ptr[j] = luf.sv_beg;
        luf.sv_beg += luf.vc_cap[j];
        luf.vc_len[j] = 0;
    }
    // scatter the rows into the columns
    for i in 1..=n {
        for i_ptr in luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i] {
            let j = luf.sv_ndx[i_ptr];
            let j_ptr = luf.vc_ptr[j] + luf.vc_len[j];
            luf.sv_ndx[j_ptr] = i;
            luf.sv_val[j_ptr] = luf.sv_val[i_ptr];
            luf.vc_len[j] += 1;
        }
    }
    // the columns now sit behind the rows in the area; re-insert their
    // nodes at the tail of the addressing list in the order n+1..n+n
    for k in n + 1..=n + n {
        luf.sv_prev[k] = k - 1;
        luf.sv_next[k] = k + 1;
    }
    luf.sv_prev[n + 1] = luf.sv_tail;
    luf.sv_next[luf.sv_tail] = n + 1;
    luf.sv_next[n + n] = 0;
    luf.sv_tail = n + n;
    Ok(())
}

// Build the row-wise representation of the matrix F from its column-wise
// representation, in the right part of the sparse vector area.
pub(crate) fn build_f_rows(luf: &mut Luf) -> Result<(), SvaOverflow> {
    let n = luf.n;
    for i in 1..=n {
        luf.fr_len[i] = 0;
    }
    // count nonzeros in the rows and in total
    let mut nnz = 0;
    for j in 1..=n {
        for j_ptr in luf.fc_ptr[j]..luf.fc_ptr[j] + luf.fc_len[j] {
            luf.fr_len[luf.sv_ndx[j_ptr]] += 1;
        }
        nnz += luf.fc_len[j];
    }
    luf.nnz_f = nnz;
    if luf.sv_end - luf.sv_beg < nnz {
        return Err(SvaOverflow);
    }
    // allocate the rows back to front; fr_ptr starts at one past the row
    // end and is walked down to the row beginning while filling
    for i in 1..=n {
        luf.fr_ptr[i] = luf.sv_end;
        luf.sv_end -= luf.fr_len[i];
    }
    for j in 1..=n {
        for j_ptr in luf.fc_ptr[j]..luf.fc_ptr[j] + luf.fc_len[j] {
            let i = luf.sv_ndx[j_ptr];
            luf.fr_ptr[i] -= 1;
            let ptr = luf.fr_ptr[i];
            luf.sv_ndx[ptr] = j;
            luf.sv_val[ptr] = luf.sv_val[j_ptr];
        }
    }
    Ok(())
}
