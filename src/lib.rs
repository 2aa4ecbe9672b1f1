//! Todd-Coxeter coset enumeration for finitely presented Coxeter groups.
//!
//! A Coxeter group is described by a [`Presentation`]: a set of generators,
//! each an involution, and a symmetric matrix of pair multiplicities `m`
//! encoding the relations `(sᵢ sⱼ)^m = e`. Given a presentation and an
//! optional set of generators to stabilize, [`solve`] enumerates the cosets of
//! the corresponding (sub)group and returns the complete action table of every
//! generator on every coset, along with the spanning tree recording how each
//! coset was first discovered.
//!
//! ```
//! use coxeter::{solve, Presentation};
//!
//! // H3, the icosahedral symmetry group.
//! let h3 = Presentation::linear(&[5, 3]).unwrap();
//! let enumeration = solve(&h3, &[], None).unwrap();
//! assert_eq!(enumeration.order(), 120);
//!
//! // Cosets of the subgroup generated by the first mirror.
//! let vertices = solve(&h3, &[0], None).unwrap();
//! assert_eq!(vertices.order(), 60);
//! ```
//!
//! Only Coxeter-type presentations are supported: every relation is the
//! alternating product of a generator pair. The enumeration never merges two
//! already-defined cosets, which is sound for such presentations; feeding the
//! engine anything else is rejected at presentation-construction time.

#[macro_use]
pub mod collections;

mod common;
mod enumerate;
mod presentation;
mod relations;
mod table;

pub use common::{CosetId, GeneratorId, GroupError, GroupResult, PerCoset, PerGenerator};
pub use enumerate::{solve, Action, CosetEnumeration, DiscoveryPath};
pub use presentation::{KnownGroup, Mult, Presentation};
pub use table::CosetTable;

/// Structs, traits, and functions.
pub mod prelude {
    pub use crate::collections::{IndexNewtype, IndexOutOfRange, IndexOverflow};
    pub use crate::{
        solve, Action, CosetEnumeration, CosetId, CosetTable, DiscoveryPath, GeneratorId,
        GroupError, GroupResult, KnownGroup, Mult, PerCoset, PerGenerator, Presentation,
    };
}
