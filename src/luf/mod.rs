pub(crate) mod luf;
pub(crate) mod sva;

mod build;
mod decomp;
mod eliminate;
mod initialize;
mod markowitz;
mod solve;

pub use luf::{Luf, WorkArea};

pub(crate) use build::{build_f_rows, build_v_cols};
pub(crate) use eliminate::eliminate;
pub(crate) use initialize::initialize;
pub(crate) use markowitz::find_pivot;
