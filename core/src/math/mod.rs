pub mod interp;
pub mod stats;

pub use interp::interp_sorted;
pub use stats::StatsHelper;
