// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::luf::Luf;

// Sparse vector area management
//
// The SVA is one pair of parallel arrays (sv_ndx, sv_val) of sv_size
// locations. Rows and columns of the matrix V occupy the left part in the
// order given by the addressing list (sv_head/sv_tail/sv_prev/sv_next);
// locations sv_beg..sv_end-1 are free; the right part is filled back to
// front with columns and rows of the matrix F and with eta rows.
//
// Each left-part line is a contiguous run of cap locations of which the
// first len hold entries. Growing a line relocates it to the end of the
// occupied left part and moves its list node to the tail, so repeated
// growth of the same line is cheap.

/// The free part of the sparse vector area is exhausted even after
/// defragmentation. The factorization must be redone with a larger area.
#[derive(Debug)]
pub(crate) struct SvaOverflow;

/// Defragment the sparse vector area: gather all unused left-part locations
/// in one continuous extent by relocating rows and columns of the matrix V
/// toward the beginning of the area. Row and column pointers of the matrix V
/// change; capacities collapse to lengths.
pub(crate) fn defrag_sva(luf: &mut Luf) {
    let n = luf.n;
    let mut sv_beg = 1;
    let mut k = luf.sv_head;
    // skip rows and columns which need not be relocated
    while k != 0 {
        if k <= n {
            let i = k;
            if luf.vr_ptr[i] != sv_beg {
                break;
            }
            luf.vr_cap[i] = luf.vr_len[i];
            sv_beg += luf.vr_cap[i];
        } else {
            let j = k - n;
            if luf.vc_ptr[j] != sv_beg {
                break;
            }
            luf.vc_cap[j] = luf.vc_len[j];
            sv_beg += luf.vc_cap[j];
        }
        k = luf.sv_next[k];
    }
    // relocate the remaining rows and columns
    while k != 0 {
        if k <= n {
            let i = k;
            let (ptr, len) = (luf.vr_ptr[i], luf.vr_len[i]);
            luf.sv_ndx.copy_within(ptr..ptr + len, sv_beg);
            luf.sv_val.copy_within(ptr..ptr + len, sv_beg);
            luf.vr_ptr[i] = sv_beg;
            luf.vr_cap[i] = len;
            sv_beg += len;
        } else {
            let j = k - n;
            let (ptr, len) = (luf.vc_ptr[j], luf.vc_len[j]);
            luf.sv_ndx.copy_within(ptr..ptr + len, sv_beg);
            luf.sv_val.copy_within(ptr..ptr + len, sv_beg);
            luf.vc_ptr[j] = sv_beg;
            luf.vc_cap[j] = len;
            sv_beg += len;
        }
        k = luf.sv_next[k];
    }
    luf.sv_beg = sv_beg;
}

// Move node k to the tail of the addressing list. The vacated cur locations
// of the line are donated to the capacity of its predecessor, which keeps
// every left-part location accounted to exactly one line.
fn relink_to_tail(luf: &mut Luf, k: usize, cur: usize) {
    let n = luf.n;
    if luf.sv_prev[k] == 0 {
        luf.sv_head = luf.sv_next[k];
    } else {
        let kk = luf.sv_prev[k];
        if kk <= n {
            luf.vr_cap[kk] += cur;
        } else {
            luf.vc_cap[kk - n] += cur;
        }
        luf.sv_next[kk] = luf.sv_next[k];
    }
    if luf.sv_next[k] == 0 {
        luf.sv_tail = luf.sv_prev[k];
    } else {
        luf.sv_prev[luf.sv_next[k]] = luf.sv_prev[k];
    }
    luf.sv_prev[k] = luf.sv_tail;
    luf.sv_next[k] = 0;
    if luf.sv_prev[k] == 0 {
        luf.sv_head = k;
    } else {
        luf.sv_next[luf.sv_prev[k]] = k;
    }
    luf.sv_tail = k;
}

/// Enlarge the capacity of the i-th row of the matrix V to `cap` locations
/// by relocating it to the end of the occupied left part. Defragments first
/// when the free part is too short; reports overflow when it still is.
/// Either completes fully or leaves the area consistent for a retry after
/// resize.
pub(crate) fn enlarge_row(luf: &mut Luf, i: usize, cap: usize) -> Result<(), SvaOverflow> {
    assert!(1 <= i && i <= luf.n);
    assert!(luf.vr_cap[i] < cap);
    if luf.sv_end - luf.sv_beg < cap {
        defrag_sva(luf);
        if luf.sv_end - luf.sv_beg < cap {
            return Err(SvaOverflow);
        }
    }
    let cur = luf.vr_cap[i];
    let (ptr, len) = (luf.vr_ptr[i], luf.vr_len[i]);
    luf.sv_ndx.copy_within(ptr..ptr + len, luf.sv_beg);
    luf.sv_val.copy_within(ptr..ptr + len, luf.sv_beg);
    luf.vr_ptr[i] = luf.sv_beg;
    luf.vr_cap[i] = cap;
    luf.sv_beg += cap;
    relink_to_tail(luf, i, cur);
    Ok(())
}

/// Enlarge the capacity of the j-th column of the matrix V to `cap`
/// locations. See [`enlarge_row`].
pub(crate) fn enlarge_col(luf: &mut Luf, j: usize, cap: usize) -> Result<(), SvaOverflow> {
    let n = luf.n;
    assert!(1 <= j && j <= n);
    assert!(luf.vc_cap[j] < cap);
    if luf.sv_end - luf.sv_beg < cap {
        defrag_sva(luf);
        if luf.sv_end - luf.sv_beg < cap {
            return Err(SvaOverflow);
        }
    }
    let cur = luf.vc_cap[j];
    let (ptr, len) = (luf.vc_ptr[j], luf.vc_len[j]);
    luf.sv_ndx.copy_within(ptr..ptr + len, luf.sv_beg);
    luf.sv_val.copy_within(ptr..ptr + len, luf.sv_beg);
    luf.vc_ptr[j] = luf.sv_beg;
    luf.vc_cap[j] = cap;
    luf.sv_beg += cap;
    relink_to_tail(luf, n + j, cur);
    Ok(())
}

// Count row file entries of the matrix V that are missing from the column
// file or carry a different value there, plus the converse. Both counts must
// be zero while the factorization is in the decomposed state.
#[allow(dead_code)]
pub(crate) fn v_file_diff(luf: &Luf) -> usize {
    let mut ndiff = 0;
    for i in 1..=luf.n {
        for pos in luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i] {
            let j = luf.sv_ndx[pos];
            let found = (luf.vc_ptr[j]..luf.vc_ptr[j] + luf.vc_len[j])
                .any(|p| luf.sv_ndx[p] == i && luf.sv_val[p] == luf.sv_val[pos]);
            if !found {
                ndiff += 1;
            }
        }
    }
    for j in 1..=luf.n {
        for pos in luf.vc_ptr[j]..luf.vc_ptr[j] + luf.vc_len[j] {
            let i = luf.sv_ndx[pos];
            let found = (luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i])
                .any(|p| luf.sv_ndx[p] == j && luf.sv_val[p] == luf.sv_val[pos]);
            if !found {
                ndiff += 1;
            }
        }
    }
    ndiff
}

#[cfg(test)]
mod tests {
    use super::{defrag_sva, enlarge_row};
    use crate::luf::{Luf, WorkArea};

    // 3x3 matrix with some fill-in so the left part of the area has live
    // rows and columns with gaps after factorization
    fn factorized() -> Luf {
        let cols = [
            vec![],
            vec![(1, 4.0), (2, 1.0)],
            vec![(1, 1.0), (2, 3.0), (3, 1.0)],
            vec![(2, 1.0), (3, 2.0)],
        ];
        let mut luf = Luf::new(3, 0);
        let mut wa = WorkArea::new(3);
        luf.decomp(&mut wa, &mut |j: usize, rn: &mut [usize], aj: &mut [f64]| {
            let mut len = 0;
            for &(i, v) in &cols[j] {
                len += 1;
                rn[len] = i;
                aj[len] = v;
            }
            len
        })
        .unwrap();
        luf
    }

    fn left_part_snapshot(luf: &Luf) -> Vec<(usize, Vec<(usize, f64)>)> {
        let mut lines = Vec::new();
        for i in 1..=luf.n {
            let row = (luf.vr_ptr[i]..luf.vr_ptr[i] + luf.vr_len[i])
                .map(|p| (luf.sv_ndx[p], luf.sv_val[p]))
                .collect();
            lines.push((i, row));
        }
        for j in 1..=luf.n {
            let col = (luf.vc_ptr[j]..luf.vc_ptr[j] + luf.vc_len[j])
                .map(|p| (luf.sv_ndx[p], luf.sv_val[p]))
                .collect();
            lines.push((luf.n + j, col));
        }
        lines
    }

    #[test]
    fn defrag_is_idempotent() {
        let mut luf = factorized();
        defrag_sva(&mut luf);
        let content = left_part_snapshot(&luf);
        let beg = luf.sv_beg;
        let ptrs: Vec<usize> = (1..=3).map(|i| luf.vr_ptr[i]).collect();
        let caps: Vec<usize> = (1..=3).map(|i| luf.vr_cap[i]).collect();

        // a second pass must not move anything
        defrag_sva(&mut luf);
        assert_eq!(left_part_snapshot(&luf), content);
        assert_eq!(luf.sv_beg, beg);
        assert_eq!(ptrs, (1..=3).map(|i| luf.vr_ptr[i]).collect::<Vec<_>>());
        assert_eq!(caps, (1..=3).map(|i| luf.vr_cap[i]).collect::<Vec<_>>());
    }

    #[test]
    fn enlarge_moves_line_to_tail_and_donates_capacity() {
        let mut luf = factorized();
        defrag_sva(&mut luf);
        let content = left_part_snapshot(&luf);

        // pick the second line so that a predecessor exists; after a
        // successful decomp the list starts with the rows of V
        let pred = luf.sv_head;
        let i = luf.sv_next[pred];
        assert!(pred >= 1 && pred <= luf.n && i >= 1 && i <= luf.n);
        let cur = luf.vr_cap[i];
        let pred_cap = luf.vr_cap[pred];

        enlarge_row(&mut luf, i, cur + 8).unwrap();
        assert_eq!(luf.sv_tail, i);
        assert_eq!(luf.sv_next[i], 0);
        assert_eq!(luf.vr_cap[i], cur + 8);
        // the predecessor inherited the vacated locations
        assert_eq!(luf.vr_cap[pred], pred_cap + cur);
        // entries are unchanged
        assert_eq!(left_part_snapshot(&luf), content);
    }
}
