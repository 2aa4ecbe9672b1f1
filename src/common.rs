//! Index types, list aliases, and errors shared across the enumeration.

use thiserror::Error;

use crate::collections::{GenericVec, IndexOverflow};

idx_struct! {
    /// ID of a group generator (a mirror of the Coxeter diagram).
    pub struct GeneratorId(pub u8);
    /// ID of a coset discovered by the enumeration.
    pub struct CosetId(pub u32);
}

impl CosetId {
    /// The base coset, representing the (sub)group whose cosets are
    /// enumerated.
    pub const BASE: CosetId = CosetId(0);
}

/// List containing a value per group generator.
pub type PerGenerator<T> = GenericVec<GeneratorId, T>;
/// List containing a value per coset.
pub type PerCoset<T> = GenericVec<CosetId, T>;

/// Error that can occur while constructing a presentation or enumerating its
/// cosets.
#[allow(missing_docs)]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("overflow ({0})")]
    Overflow(IndexOverflow),

    #[error("generator index {index} is out of range for rank {rank}")]
    InvalidGenerator { index: usize, rank: usize },
    #[error("generator {0} cannot be paired with itself")]
    SelfPaired(usize),
    #[error("invalid pair multiplicity {0}; multiplicities must be at least 2")]
    BadMultiplicity(u16),
    #[error("generator index {0} appears more than once")]
    DuplicateGenerator(usize),
    #[error("invalid Coxeter matrix")]
    BadMatrix,
}
impl From<IndexOverflow> for GroupError {
    fn from(value: IndexOverflow) -> Self {
        GroupError::Overflow(value)
    }
}

/// Result type returned by presentation and enumeration operations.
pub type GroupResult<T> = Result<T, GroupError>;
