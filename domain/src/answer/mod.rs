//! Answer values and comparison
//!
//! ```text
//! RawAnswer ──normalize()──▶ NormalizedAnswer ──AnswerComparator::same()──▶ bool
//! ```

pub mod comparator;
pub mod normalize;
pub mod raw;

pub use comparator::{
    AnswerComparator, ComparatorKind, ContainmentComparator, MultiSelectPolicy, StrictComparator,
    overlap_ratio,
};
pub use normalize::{MULTI_SEPARATOR, NormalizedAnswer, normalize};
pub use raw::RawAnswer;
