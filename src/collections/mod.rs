//! Typed-index collections used as append-only arenas by the enumeration.

#[macro_use]
pub mod generic_vec;

pub use generic_vec::{GenericVec, IndexIter, IndexNewtype, IndexOutOfRange, IndexOverflow};
pub use tinyset::Fits64;
