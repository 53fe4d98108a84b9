// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::sva::{defrag_sva, enlarge_col, enlarge_row, SvaOverflow};
use crate::luf::{Luf, WorkArea};

// Perform one Gaussian elimination step with the pivot v[p,q] = u[k,k].
//
// For every other element v[i,q] of the pivot column the multiplier
//
//     f[i,p] = v[i,q] / v[p,q]
//
// is stored as a new element of column p of the matrix F, and the
// transformation
//
//     (i-th row of V) := (i-th row of V) - f[i,p] * (p-th row of V)
//
// is applied, which keeps the main equality A = F*V. Elements whose
// magnitude drops below eps_tol are replaced by exact zero; fill-in is
// appended to both representations of V, growing capacities through the
// sparse vector area as needed.
//
// The row-wise representation covers the whole matrix V, the column-wise
// representation only the active submatrix. The pivot row and column leave
// the active sets here; other touched rows and columns return to the sets
// with their new lengths. On entry the working arrays flag and work must be
// clean; this state is restored on exit.
//
// An SVA overflow aborts the whole factorization; the caller restarts it
// with a doubled area.
pub(crate) fn eliminate(
    luf: &mut Luf,
    wa: &mut WorkArea,
    p: usize,
    q: usize,
) -> Result<(), SvaOverflow> {
    let n = luf.n;
    let eps_tol = luf.eps_tol;
    assert!(1 <= p && p <= n);
    assert!(1 <= q && q <= n);

    // remove the pivot row from the active set; it never returns
    let len = luf.vr_len[p];
    if wa.rs_prev[p] == 0 {
        wa.rs_head[len] = wa.rs_next[p];
    } else {
        wa.rs_next[wa.rs_prev[p]] = wa.rs_next[p];
    }
    if wa.rs_next[p] != 0 {
        wa.rs_prev[wa.rs_next[p]] = wa.rs_prev[p];
    }
    // remove the pivot column from the active set; it never returns
    let len = luf.vc_len[q];
    if wa.cs_prev[q] == 0 {
        wa.cs_head[len] = wa.cs_next[q];
    } else {
        wa.cs_next[wa.cs_prev[q]] = wa.cs_next[q];
    }
    if wa.cs_next[q] != 0 {
        wa.cs_prev[wa.cs_next[q]] = wa.cs_prev[q];
    }

    // find the pivot v[p,q] = u[k,k] in the p-th row and remove it
    let p_beg = luf.vr_ptr[p];
    let mut p_end = p_beg + luf.vr_len[p] - 1;
    let mut p_ptr = p_beg;
    while luf.sv_ndx[p_ptr] != q {
        p_ptr += 1;
    }
    assert!(p_ptr <= p_end);
    let vpq = luf.sv_val[p_ptr];
    luf.vr_piv[p] = vpq;
    luf.sv_ndx[p_ptr] = luf.sv_ndx[p_end];
    luf.sv_val[p_ptr] = luf.sv_val[p_end];
    luf.vr_len[p] -= 1;
    p_end -= 1;

    // find the pivot in the q-th column and remove it
    let q_beg = luf.vc_ptr[q];
    let q_end = q_beg + luf.vc_len[q] - 1;
    let mut q_ptr = q_beg;
    while luf.sv_ndx[q_ptr] != p {
        q_ptr += 1;
    }
    assert!(q_ptr <= q_end);
    luf.sv_ndx[q_ptr] = luf.sv_ndx[q_end];
    luf.vc_len[q] -= 1;

    // stage the pivot row in the working array; its elements leave the
    // active column sets (the columns return later with new lengths) and
    // the columns themselves are detached from the active set
    for p_ptr in p_beg..=p_end {
        let j = luf.sv_ndx[p_ptr];
        luf.flag[j] = true;
        luf.work[j] = luf.sv_val[p_ptr];
        // remove column j from the active set; a column self-linked by the
        // Suhl rule passes through this unharmed
        let len = luf.vc_len[j];
        if wa.cs_prev[j] == 0 {
            wa.cs_head[len] = wa.cs_next[j];
        } else {
            wa.cs_next[wa.cs_prev[j]] = wa.cs_next[j];
        }
        if wa.cs_next[j] != 0 {
            wa.cs_prev[wa.cs_next[j]] = wa.cs_prev[j];
        }
        // v[p,j] leaves the active submatrix but stays in the p-th row
        let j_end = luf.vc_ptr[j] + luf.vc_len[j] - 1;
        let mut j_ptr = luf.vc_ptr[j];
        while luf.sv_ndx[j_ptr] != p {
            j_ptr += 1;
        }
        assert!(j_ptr <= j_end);
        luf.sv_ndx[j_ptr] = luf.sv_ndx[j_end];
        luf.vc_len[j] -= 1;
    }

    // eliminate the elements of the q-th (pivot) column one at a time
    while luf.vc_len[q] > 0 {
        // v[i,q] is to be eliminated
        let i = luf.sv_ndx[luf.vc_ptr[q]];
        // remove the i-th row from the active set; it returns below with
        // its new length
        let len = luf.vr_len[i];
        if wa.rs_prev[i] == 0 {
            wa.rs_head[len] = wa.rs_next[i];
        } else {
            wa.rs_next[wa.rs_prev[i]] = wa.rs_next[i];
        }
        if wa.rs_next[i] != 0 {
            wa.rs_prev[wa.rs_next[i]] = wa.rs_prev[i];
        }
        // find v[i,q] in the i-th row
        let i_beg = luf.vr_ptr[i];
        let mut i_end = i_beg + luf.vr_len[i] - 1;
        let mut i_ptr = i_beg;
        while luf.sv_ndx[i_ptr] != q {
            i_ptr += 1;
        }
        assert!(i_ptr <= i_end);
        // the gaussian multiplier f[i,p] = v[i,q] / v[p,q]
        let fip = luf.sv_val[i_ptr] / vpq;
        // v[i,q] is eliminated: remove it from the i-th row
        luf.sv_ndx[i_ptr] = luf.sv_ndx[i_end];
        luf.sv_val[i_ptr] = luf.sv_val[i_end];
        luf.vr_len[i] -= 1;
        i_end -= 1;
        // and from the q-th column
        let q_end = luf.vc_ptr[q] + luf.vc_len[q] - 1;
        let q_beg = luf.vc_ptr[q];
        luf.sv_ndx[q_beg] = luf.sv_ndx[q_end];
        luf.vc_len[q] -= 1;

        // transform the existing elements of the i-th row; the staged
        // pivot row no longer contains the pivot, and the i-th row no
        // longer contains the eliminated element
        let mut fill = luf.vr_len[p];
        let mut i_ptr = i_beg;
        while i_ptr <= i_end {
            let j = luf.sv_ndx[i_ptr];
            if luf.flag[j] {
                // v[i,j] := v[i,j] - f[i,p] * v[p,j]
                luf.sv_val[i_ptr] -= fip * luf.work[j];
                let temp = luf.sv_val[i_ptr].abs();
                luf.flag[j] = false;
                fill -= 1; // both v[i,j] and v[p,j] exist
                if temp == 0.0 || temp < eps_tol {
                    // the new v[i,j] is close to zero; remove it from the
                    // i-th row
                    luf.sv_ndx[i_ptr] = luf.sv_ndx[i_end];
                    luf.sv_val[i_ptr] = luf.sv_val[i_end];
                    luf.vr_len[i] -= 1;
                    i_end -= 1;
                    // and from the j-th column
                    let j_end = luf.vc_ptr[j] + luf.vc_len[j] - 1;
                    let mut j_ptr = luf.vc_ptr[j];
                    while luf.sv_ndx[j_ptr] != i {
                        j_ptr += 1;
                    }
                    assert!(j_ptr <= j_end);
                    luf.sv_ndx[j_ptr] = luf.sv_ndx[j_end];
                    luf.vc_len[j] -= 1;
                    // i_ptr now holds a different element
                    continue;
                }
                luf.big_v = luf.big_v.max(temp);
            }
            i_ptr += 1;
        }

        // flag is now the pattern of v[p,*] \ v[i,*] and fill is the
        // number of elements in it, so up to fill new nonzeros may appear
        // in the i-th row
        if luf.vr_len[i] + fill > luf.vr_cap[i] {
            let cap = luf.vr_len[i] + fill;
            enlarge_row(luf, i, cap)?;
        }
        // walk the staged pivot row and create the fill-in; remember the
        // new column indices in fr_len, which is unused at this stage
        let p_beg = luf.vr_ptr[p];
        let p_end = p_beg + luf.vr_len[p] - 1;
        let mut len = 0;
        for p_ptr in p_beg..=p_end {
            let j = luf.sv_ndx[p_ptr];
            if luf.flag[j] {
                // the new nonzero v[i,j] = 0 - f[i,p] * v[p,j]
                let val = -fip * luf.work[j];
                let temp = val.abs();
                if temp == 0.0 || temp < eps_tol {
                    // close to zero; ignore it
                } else {
                    let i_ptr = luf.vr_ptr[i] + luf.vr_len[i];
                    luf.sv_ndx[i_ptr] = j;
                    luf.sv_val[i_ptr] = val;
                    luf.vr_len[i] += 1;
                    len += 1;
                    luf.fr_len[len] = j;
                    luf.big_v = luf.big_v.max(temp);
                }
            } else {
                // no fill-in: v[i,j] already exists; restore the flag
                luf.flag[j] = true;
            }
        }
        // add the new nonzeros to the corresponding columns
        for t in 1..=len {
            let j = luf.fr_len[t];
            if luf.vc_len[j] + 1 > luf.vc_cap[j] {
                let cap = luf.vc_len[j] + 10;
                enlarge_col(luf, j, cap)?;
            }
            // only the pattern is maintained column-wise during the
            // elimination; values are rebuilt by build_v_cols()
            let j_ptr = luf.vc_ptr[j] + luf.vc_len[j];
            luf.sv_ndx[j_ptr] = i;
            luf.vc_len[j] += 1;
        }

        // the i-th row returns to the active set with its new length; its
        // largest magnitude is no longer known
        let len_i = luf.vr_len[i];
        wa.rs_prev[i] = 0;
        wa.rs_next[i] = wa.rs_head[len_i];
        if wa.rs_next[i] != 0 {
            wa.rs_prev[wa.rs_next[i]] = i;
        }
        wa.rs_head[len_i] = i;
        wa.rs_max[i] = -1.0;

        // store the multiplier f[i,p] in the matrix F
        if luf.sv_end - luf.sv_beg < 1 {
            defrag_sva(luf);
            if luf.sv_end - luf.sv_beg < 1 {
                return Err(SvaOverflow);
            }
        }
        luf.sv_end -= 1;
        luf.sv_ndx[luf.sv_end] = i;
        luf.sv_val[luf.sv_end] = fip;
        luf.fc_len[p] += 1;
    }

    // the q-th (pivot) column is empty now; its node leaves the
    // addressing list
    assert_eq!(luf.vc_len[q], 0);
    luf.vc_cap[q] = 0;
    let k = n + q;
    if luf.sv_prev[k] == 0 {
        luf.sv_head = luf.sv_next[k];
    } else {
        luf.sv_next[luf.sv_prev[k]] = luf.sv_next[k];
    }
    if luf.sv_next[k] == 0 {
        luf.sv_tail = luf.sv_prev[k];
    } else {
        luf.sv_prev[luf.sv_next[k]] = luf.sv_prev[k];
    }
    // the p-th column of the matrix F is complete
    luf.fc_ptr[p] = luf.sv_end;

    // unstage the pivot row; its columns return to the active set, except
    // that a column excluded by the Suhl rule may only return as a
    // singleton
    for p_ptr in luf.vr_ptr[p]..luf.vr_ptr[p] + luf.vr_len[p] {
        let j = luf.sv_ndx[p_ptr];
        luf.flag[j] = false;
        luf.work[j] = 0.0;
        let len_j = luf.vc_len[j];
        if !(len_j != 1 && wa.cs_prev[j] == j && wa.cs_next[j] == j) {
            wa.cs_prev[j] = 0;
            wa.cs_next[j] = wa.cs_head[len_j];
            if wa.cs_next[j] != 0 {
                wa.cs_prev[wa.cs_next[j]] = j;
            }
            wa.cs_head[len_j] = j;
        }
    }
    Ok(())
}
