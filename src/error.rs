use thiserror::Error;

/// Errors reported by a full factorization ([`crate::Luf::decomp`],
/// [`crate::Inv::decomp`]).
///
/// Either error leaves the factorization invalid. It must not be used in
/// solves or updates until the cause has been eliminated and a new
/// factorization has been computed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FactorError {
    /// The matrix is singular: on some elimination step the active submatrix
    /// was zero, so no pivot could be chosen.
    ///
    /// On return the factorization provides everything needed to repair the
    /// matrix by replacing its linearly dependent columns with columns of
    /// the unity matrix: for `k = rank+1..=n`, replace column
    /// [`qq_col(k)`](crate::Luf::qq_col) of the matrix by the unit column
    /// [`pp_row(k)`](crate::Luf::pp_row).
    #[error("matrix is singular (rank {rank})")]
    Singular {
        /// Number of elimination steps completed before the active submatrix
        /// became zero.
        rank: usize,
    },

    /// The matrix is probably ill-conditioned: the magnitude of elements of
    /// `V` grew by more than `max_gro` relative to the largest element of
    /// the input matrix. On a well scaled matrix this can also mean that the
    /// threshold pivoting tolerance `piv_tol` should be increased.
    #[error("matrix is probably ill-conditioned (element growth exceeded max_gro)")]
    Unstable,
}

/// Errors reported by the Forrest-Tomlin update ([`crate::Inv::update`]).
///
/// Every error invalidates the factorization; a successful
/// [`decomp`](crate::Inv::decomp) is required before further transformations.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UpdateError {
    /// The adjacent basis matrix is structurally singular: the new column
    /// has no element on or below the diagonal position it replaces.
    #[error("adjacent basis matrix is structurally singular")]
    Singular,

    /// The magnitude of the new diagonal element is below `upd_tol`, so the
    /// updated factorization would be inaccurate.
    #[error("updated factorization is inaccurate (pivot magnitude below upd_tol)")]
    Inaccurate,

    /// The eta file already holds `hh_max` transformations. The stored
    /// factors are not corrupt, but the basis matrix must be refactorized
    /// before it can be updated again.
    #[error("eta file is full; the basis matrix must be refactorized")]
    UpdateLimitReached,

    /// The sparse vector area overflowed while splicing in the new column.
    /// The next refactorization will allocate `new_sva` locations.
    #[error("sparse vector area overflowed (next factorization uses {new_sva} locations)")]
    Overflow {
        /// Size of the sparse vector area at the next refactorization.
        new_sva: usize,
    },
}
