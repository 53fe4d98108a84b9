//! Sparse LU factorization for simplex basis matrices.
//!
//! [`Luf`] computes and stores a factorization `A = F*V` of a square sparse
//! matrix, where permutation matrices `P` and `Q` exist such that
//! `P*F*inv(P)` is unit lower triangular and `P*V*Q` is upper triangular.
//! Pivots are chosen by a Markowitz criterion subject to rowwise threshold
//! pivoting; all sparse row and column data lives in a single sparse vector
//! area that is defragmented and grown on demand.
//!
//! [`Inv`] maintains the factorization of a basis matrix `B = F*H*V` that
//! changes one column at a time, the way the simplex method changes it. It
//! provides the forward and backward transformations (FTRAN/BTRAN) and folds
//! a column replacement into the eta file `H` by the Forrest-Tomlin update,
//! in work proportional to fill-in rather than by refactorizing.
//!
//! ## Indexing
//!
//! All row and column indices and all vector slots are 1-based: arrays have
//! `n + 1` elements and slot 0 is unused. This keeps the value 0 free as the
//! null link of the internal linked lists.
//!
//! ## Example
//!
//! ```
//! use ftlu::Inv;
//!
//! // B = diag(2, 3, 5), supplied column by column
//! let cols = [vec![], vec![(1, 2.0)], vec![(2, 3.0)], vec![(3, 5.0)]];
//!
//! let mut inv = Inv::new(3, 0);
//! inv.decomp(&mut |j, rn, aj| {
//!     let mut len = 0;
//!     for &(i, v) in &cols[j] {
//!         len += 1;
//!         rn[len] = i;
//!         aj[len] = v;
//!     }
//!     len
//! })
//! .unwrap();
//!
//! // solve B*x = [2, 3, 5]
//! let mut x = vec![0.0, 2.0, 3.0, 5.0]; // x[0] is unused
//! inv.ftran(&mut x, false);
//! assert_eq!(&x[1..], &[1.0, 1.0, 1.0]);
//! ```

mod error;
mod inv;
mod luf;
mod perm;

pub use crate::error::{FactorError, UpdateError};
pub use crate::inv::Inv;
pub use crate::luf::{Luf, WorkArea};
