// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use crate::perm::Perm;

/// LU factorization `A = F*V` of a square sparse matrix.
///
/// Permutation matrices `P` and `Q` exist such that `P*F*inv(P)` is unit
/// lower triangular and `P*V*Q = U` is upper triangular. `F` is stored twice
/// (row-wise and column-wise) with its unit diagonal implicit; `V` is stored
/// twice with the diagonal of `U` kept in a separate dense array of pivot
/// values. All sparse vectors live in one sparse vector area (SVA): rows and
/// columns of `V` in the left part, free locations in the middle, rows and
/// columns of `F` (and eta rows, see [`crate::Inv`]) in the right part.
///
/// A freshly created instance represents the unity matrix. [`decomp`] makes
/// it represent the matrix supplied by the column callback.
///
/// [`decomp`]: Luf::decomp
pub struct Luf {
    /// order of the matrices A, F, V, P, Q
    pub(crate) n: usize,
    /// the factorization is valid and can be used in solves
    pub(crate) valid: bool,

    // matrix F in row-wise format //
    pub(crate) fr_ptr: Vec<usize>,
    pub(crate) fr_len: Vec<usize>,

    // matrix F in column-wise format //
    pub(crate) fc_ptr: Vec<usize>,
    pub(crate) fc_len: Vec<usize>,

    // matrix V in row-wise format //
    pub(crate) vr_ptr: Vec<usize>,
    pub(crate) vr_len: Vec<usize>,
    pub(crate) vr_cap: Vec<usize>,
    /// pivot elements (diagonal of U), by row index
    pub(crate) vr_piv: Vec<f64>,

    // matrix V in column-wise format //
    pub(crate) vc_ptr: Vec<usize>,
    pub(crate) vc_len: Vec<usize>,
    pub(crate) vc_cap: Vec<usize>,

    /// row permutation P: `pp.at(k)` is the row of V placed at row k of U
    pub(crate) pp: Perm,
    /// column permutation Q: `qq.at(k)` is the column of V placed at column
    /// k of U
    pub(crate) qq: Perm,

    // sparse vector area //
    pub(crate) sv_size: usize,
    /// first free location
    pub(crate) sv_beg: usize,
    /// first location after the free part
    pub(crate) sv_end: usize,
    pub(crate) sv_ndx: Vec<usize>,
    pub(crate) sv_val: Vec<f64>,

    // The left part of the SVA is addressed by a doubly linked list that
    // holds rows (node i) and columns (node n+j) of the matrix V in the
    // order of ascending start location. 0 terminates the list.
    pub(crate) sv_head: usize,
    pub(crate) sv_tail: usize,
    pub(crate) sv_prev: Vec<usize>,
    pub(crate) sv_next: Vec<usize>,

    // working arrays of size 1+n; all-false respectively all-zero between
    // factorization passes
    pub(crate) flag: Vec<bool>,
    pub(crate) work: Vec<f64>,

    // control parameters //
    /// When nonzero, the sparse vector area is reallocated to this number of
    /// locations at the beginning of the next [`decomp`](Luf::decomp).
    /// Maintained automatically; settable for tuning. Default: 0
    pub new_sva: usize,
    /// Threshold pivoting tolerance, `0 < piv_tol < 1`. A candidate pivot
    /// must satisfy `|v[i,j]| >= piv_tol * max|v[i,*]|`. Default: 0.1
    pub piv_tol: f64,
    /// The Markowitz search stops after `piv_lim` rows or columns with
    /// eligible pivots have been searched. Default: 4
    pub piv_lim: usize,
    /// Whether a column with no eligible elements is excluded from the
    /// search until it becomes a column singleton, as suggested by Uwe Suhl.
    /// Default: true
    pub suhl: bool,
    /// Elements which magnitude drops below `eps_tol` during elimination are
    /// replaced by exact zero, `0 <= eps_tol <= 1`. Default: 1e-15
    pub eps_tol: f64,
    /// Ceiling on the growth ratio `big_v / max_a`, `>= 1`. Exceeding it
    /// aborts the factorization with [`FactorError::Unstable`]. Default: 1e12
    ///
    /// [`FactorError::Unstable`]: crate::FactorError::Unstable
    pub max_gro: f64,

    // statistics //
    pub(crate) nnz_a: usize,
    pub(crate) nnz_f: usize,
    pub(crate) nnz_v: usize,
    pub(crate) max_a: f64,
    pub(crate) big_v: f64,
    pub(crate) rank: usize,
}

impl Luf {
    /// Create a factorization of the order `n`, initially representing the
    /// unity matrix (`F = V = P = Q = I`).
    ///
    /// `sv_size` is the initial size of the sparse vector area in locations;
    /// 0 selects the default `5 * (n + 10)`.
    pub fn new(n: usize, sv_size: usize) -> Self {
        assert!(n >= 1, "luf_create: n = {}; invalid parameter", n);
        let sv_size = if sv_size == 0 { 5 * (n + 10) } else { sv_size };
        let mut luf = Self {
            n,
            valid: true,

            fr_ptr: vec![sv_size + 1; n + 1],
            fr_len: vec![0; n + 1],
            fc_ptr: vec![sv_size + 1; n + 1],
            fc_len: vec![0; n + 1],

            vr_ptr: vec![1; n + 1],
            vr_len: vec![0; n + 1],
            vr_cap: vec![0; n + 1],
            vr_piv: vec![1.0; n + 1],
            vc_ptr: vec![1; n + 1],
            vc_len: vec![0; n + 1],
            vc_cap: vec![0; n + 1],

            pp: Perm::identity(n),
            qq: Perm::identity(n),

            sv_size,
            sv_beg: 1,
            sv_end: sv_size + 1,
            sv_ndx: vec![0; sv_size + 1],
            sv_val: vec![0.0; sv_size + 1],
            sv_head: 1,
            sv_tail: n + n,
            sv_prev: vec![0; n + n + 1],
            sv_next: vec![0; n + n + 1],

            flag: vec![false; n + 1],
            work: vec![0.0; n + 1],

            new_sva: 0,
            piv_tol: 0.1,
            piv_lim: 4,
            suhl: true,
            eps_tol: 1e-15,
            max_gro: 1e12,

            nnz_a: n,
            nnz_f: 0,
            nnz_v: 0,
            max_a: 1.0,
            big_v: 1.0,
            rank: n,
        };
        // all rows and columns of V are empty, so the order 1..n, n+1..n+n
        // will do
        for k in 1..=n + n {
            luf.sv_prev[k] = k - 1;
            luf.sv_next[k] = k + 1;
        }
        luf.sv_next[n + n] = 0;
        luf
    }

    /// Matrix dimension (constant).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Whether the factorization is valid. Flips false when [`decomp`]
    /// fails; solves fault on an invalid factorization.
    ///
    /// [`decomp`]: Luf::decomp
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Number of elimination steps completed by the last [`decomp`]; equals
    /// `n` on success, the estimated rank of the matrix on
    /// [`FactorError::Singular`].
    ///
    /// [`decomp`]: Luf::decomp
    /// [`FactorError::Singular`]: crate::FactorError::Singular
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Row of V (and of A) placed at row `k` of `U = P*V*Q`.
    ///
    /// After a singular [`decomp`](Luf::decomp), each linearly dependent
    /// column `qq_col(k)`, `k = rank+1..=n`, should be replaced by the unit
    /// column `pp_row(k)`.
    pub fn pp_row(&self, k: usize) -> usize {
        self.pp.at(k)
    }

    /// Row of `U = P*V*Q` holding row `i` of V.
    pub fn pp_col(&self, i: usize) -> usize {
        self.pp.pos(i)
    }

    /// Column of `U = P*V*Q` holding column `j` of V.
    pub fn qq_row(&self, j: usize) -> usize {
        self.qq.pos(j)
    }

    /// Column of V (and of A) placed at column `k` of `U = P*V*Q`.
    pub fn qq_col(&self, k: usize) -> usize {
        self.qq.at(k)
    }

    /// Number of nonzeros in the matrix as supplied to [`decomp`](Luf::decomp).
    pub fn nnz_a(&self) -> usize {
        self.nnz_a
    }

    /// Number of nonzeros in F (excluding the unit diagonal).
    pub fn nnz_f(&self) -> usize {
        self.nnz_f
    }

    /// Number of nonzeros in V (excluding pivot elements).
    pub fn nnz_v(&self) -> usize {
        self.nnz_v
    }

    /// Largest magnitude of elements of the matrix as supplied.
    pub fn max_a(&self) -> f64 {
        self.max_a
    }

    /// Largest magnitude of elements of V seen during elimination; the
    /// growth ratio `big_v / max_a` is the stability measure checked
    /// against [`max_gro`](Luf::max_gro).
    pub fn big_v(&self) -> f64 {
        self.big_v
    }
}

/// Working area for [`Luf::decomp`].
///
/// Holds the per-factorization scratch that is not part of the factors: the
/// cached row maxima for threshold pivoting and the doubly linked lists of
/// active rows and columns bucketed by nonzero count. Pre-allocate once and
/// reuse across factorizations of the same order; no initialization between
/// calls is needed.
pub struct WorkArea {
    pub(crate) n: usize,
    /// largest magnitude in each active row; negative when not yet computed
    pub(crate) rs_max: Vec<f64>,
    /// heads of the active row sets `R[len]`, `len = 0..n`
    pub(crate) rs_head: Vec<usize>,
    pub(crate) rs_prev: Vec<usize>,
    pub(crate) rs_next: Vec<usize>,
    /// heads of the active column sets `C[len]`, `len = 0..n`
    pub(crate) cs_head: Vec<usize>,
    pub(crate) cs_prev: Vec<usize>,
    pub(crate) cs_next: Vec<usize>,
}

impl WorkArea {
    /// Pre-allocate a working area for matrices of the order `n`.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            rs_max: vec![0.0; n + 1],
            rs_head: vec![0; n + 1],
            rs_prev: vec![0; n + 1],
            rs_next: vec![0; n + 1],
            cs_head: vec![0; n + 1],
            cs_prev: vec![0; n + 1],
            cs_next: vec![0; n + 1],
        }
    }
}
