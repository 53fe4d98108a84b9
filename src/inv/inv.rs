// Copyright (C) 2016-2018 ERGO-Code
// Copyright (C) 2022-2023 Richard Lincoln

use log::debug;

use crate::luf::{Luf, WorkArea};
use crate::perm::Perm;
use crate::FactorError;

/// Maintained factorization `B = F*H*V` of a basis matrix that changes one
/// column at a time.
///
/// `F` and `V` come from the wrapped [`Luf`]; `H` is an eta file of row-like
/// factors `H = H[1]*H[2]*...*H[nfs]`, each differing from the unity matrix
/// in exactly one row, built up by [`update`]. Because updates move the row
/// permutation `P` while `F` stays put, solves with `F` use the snapshot
/// `P0` of `P` taken at the last [`decomp`].
///
/// The intended cycle per simplex iteration: [`ftran`] with `save` set on
/// the entering column, the driver chooses the leaving column `j`, then
/// [`update`]`(j)` folds the replacement into `H`. When an operation fails
/// or the eta file fills up, the instance is invalid and every
/// transformation faults until a fresh [`decomp`] succeeds.
///
/// [`decomp`]: Inv::decomp
/// [`ftran`]: Inv::ftran
/// [`update`]: Inv::update
pub struct Inv {
    /// The underlying factorization. Control parameters of the elimination
    /// (`piv_tol`, `eps_tol`, `max_gro`, ...) are set on this field.
    pub luf: Luf,
    pub(crate) valid: bool,

    /// row permutation snapshot taken at the last decomp
    pub(crate) p0: Perm,

    // eta file: factor k differs from the unity matrix in row hh_ndx[k],
    // whose off-diagonal entries sit in the right part of the sparse
    // vector area at hh_ptr[k] .. hh_ptr[k]+hh_len[k]-1
    pub(crate) hh_ndx: Vec<usize>,
    pub(crate) hh_ptr: Vec<usize>,
    pub(crate) hh_len: Vec<usize>,

    /// Maximum number of eta factors before [`update`](Inv::update) demands
    /// refactorization. Default: 50
    pub hh_max: usize,
    /// Update accuracy floor: a new pivot element of smaller magnitude
    /// fails the update with [`UpdateError::Inaccurate`]. Default: 1e-6
    ///
    /// [`UpdateError::Inaccurate`]: crate::UpdateError::Inaccurate
    pub upd_tol: f64,

    // partially transformed column saved by ftran for the next update;
    // None when no column has been prepared
    pub(crate) cc_ndx: Vec<usize>,
    pub(crate) cc_val: Vec<f64>,
    pub(crate) cc_len: Option<usize>,

    // scratch list of column indices touched while rebuilding a row
    pub(crate) wk_ndx: Vec<usize>,

    pub(crate) nnz_h: usize,

    wa: WorkArea,
}

impl Inv {
    /// Create a maintained factorization of the order `n`, initially
    /// representing the unity basis matrix.
    ///
    /// `sv_size` is the initial size of the sparse vector area; 0 selects
    /// the default.
    pub fn new(n: usize, sv_size: usize) -> Self {
        Self {
            luf: Luf::new(n, sv_size),
            valid: true,
            p0: Perm::identity(n),
            hh_ndx: Vec::new(),
            hh_ptr: Vec::new(),
            hh_len: Vec::new(),
            hh_max: 50,
            upd_tol: 1e-6,
            cc_ndx: vec![0; n + 1],
            cc_val: vec![0.0; n + 1],
            cc_len: None,
            wk_ndx: Vec::new(),
            nnz_h: 0,
            wa: WorkArea::new(n),
        }
    }

    /// Refactorize the basis matrix given by the column callback (see
    /// [`Luf::decomp`] for the callback contract). On success `H` becomes
    /// the unity matrix, the snapshot `P0` is retaken and any saved column
    /// is discarded.
    ///
    /// # Errors
    ///
    /// Passed through from [`Luf::decomp`]; the instance stays invalid.
    pub fn decomp<F>(&mut self, col: &mut F) -> Result<(), FactorError>
    where
        F: FnMut(usize, &mut [usize], &mut [f64]) -> usize,
    {
        self.valid = false;
        self.luf.decomp(&mut self.wa, col)?;
        self.p0.copy_from(&self.luf.pp);
        self.hh_ndx.clear();
        self.hh_ptr.clear();
        self.hh_len.clear();
        self.nnz_h = 0;
        self.cc_len = None;
        self.valid = true;
        debug!(
            "basis refactorized: n = {} nnz(F) = {} nnz(V) = {}",
            self.luf.n(),
            self.luf.nnz_f(),
            self.luf.nnz_v()
        );
        Ok(())
    }

    /// Whether the factorization is valid. Flips false on any failed
    /// operation; FTRAN/BTRAN/update fault on an invalid instance.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Matrix dimension (constant).
    pub fn n(&self) -> usize {
        self.luf.n()
    }

    /// Number of eta factors in `H` (zero right after a decomp).
    pub fn nfs(&self) -> usize {
        self.hh_ndx.len()
    }

    /// Number of nonzeros in the eta file, excluding unity diagonals.
    pub fn nnz_h(&self) -> usize {
        self.nnz_h
    }
}
