//! The statistical kernel: pure functions, no I/O, no global state.
//!
//! Every function here operates on plain slices and returns plain numbers;
//! the metric calculators in `abtest-analytics` are the only callers.

mod bootstrap;
mod fisher;
mod mann_whitney;
mod normal;
mod welch;
mod wilson;

pub use bootstrap::{bootstrap_relative_diff_ci, percentile_ci};
pub use fisher::fisher_exact_p;
pub use mann_whitney::mann_whitney_u_p;
pub use normal::{standard_normal_cdf, two_sided_p_from_z};
pub use welch::welch_t_test_p;
pub use wilson::wilson_relative_diff_ci;
