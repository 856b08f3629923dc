//! Response generator adapters
//!
//! Live generation is out of scope; [`ReplayResponseGenerator`] feeds a
//! campaign from response sets that were generated earlier.

mod replay;

pub use replay::ReplayResponseGenerator;
