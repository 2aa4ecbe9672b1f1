//! The coset table: the growable, symmetric partial action of every generator
//! on every coset.

use crate::collections::IndexNewtype;
use crate::common::{CosetId, GeneratorId, GroupResult};

/// Coset-generator action table.
///
/// Flattened 2D array with one entry per (coset, generator) pair. Entries
/// start out unset and are defined exactly once; the table is append-only and
/// no entry is ever retracted or reassigned. Because every generator is an
/// involution, entries are always defined in symmetric pairs:
/// `table[c][g] == Some(t)` implies `table[t][g] == Some(c)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CosetTable {
    /// Number of cosets.
    coset_count: usize,
    /// Number of generators.
    rank: usize,
    /// Flattened 2D array, indexed by a pair of coset ID and generator ID.
    contents: Vec<Option<CosetId>>,
}

impl CosetTable {
    /// Constructs a table with one coset (the base coset) and every entry
    /// unset.
    pub fn new(rank: usize) -> Self {
        CosetTable {
            coset_count: 1,
            rank,
            contents: vec![None; rank],
        }
    }

    /// Returns the number of cosets in the table.
    pub fn order(&self) -> usize {
        self.coset_count
    }
    /// Returns the number of generators.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Appends a new coset with every entry unset and returns its ID.
    pub fn add_row(&mut self) -> GroupResult<CosetId> {
        let new_coset = CosetId::try_from_usize(self.coset_count)?;
        self.coset_count += 1;
        self.contents.extend(std::iter::repeat(None).take(self.rank));
        Ok(new_coset)
    }

    /// Returns the action of `gen` on `coset`, or `None` if it is not yet
    /// defined.
    #[inline]
    #[track_caller]
    pub fn get(&self, coset: CosetId, gen: GeneratorId) -> Option<CosetId> {
        self.contents[self.index(coset, gen)]
    }
    /// Returns whether the action of `gen` on `coset` is defined.
    #[inline]
    #[track_caller]
    pub fn is_set(&self, coset: CosetId, gen: GeneratorId) -> bool {
        self.get(coset, gen).is_some()
    }

    /// Defines the action of `gen` symmetrically: `coset * gen = target` and
    /// `target * gen = coset`.
    ///
    /// # Panics
    ///
    /// Panics if either entry is already defined to a different value. The
    /// enumeration never produces such a write for a Coxeter presentation, so
    /// one indicates an internal-consistency fault whose damage cannot be
    /// locally repaired.
    #[track_caller]
    pub fn put(&mut self, coset: CosetId, gen: GeneratorId, target: CosetId) {
        let forward = self.index(coset, gen);
        let backward = self.index(target, gen);
        for (index, value) in [(forward, target), (backward, coset)] {
            let entry = &mut self.contents[index];
            match *entry {
                None => *entry = Some(value),
                Some(existing) => assert_eq!(
                    existing, value,
                    "conflicting entry for {coset} * {gen}; \
                     coincidence found, which this enumeration does not support",
                ),
            }
        }
    }

    /// Returns whether every entry of the table is defined.
    pub fn is_complete(&self) -> bool {
        self.contents.iter().all(Option::is_some)
    }

    /// Returns the first unset cell at or after `cursor` in row-major order,
    /// advancing `cursor` past all defined cells it skips.
    pub(crate) fn first_unset_from(
        &self,
        cursor: &mut usize,
    ) -> Option<(CosetId, GeneratorId)> {
        while *cursor < self.contents.len() {
            if self.contents[*cursor].is_none() {
                let coset = CosetId((*cursor / self.rank) as u32);
                let gen = GeneratorId((*cursor % self.rank) as u8);
                return Some((coset, gen));
            }
            *cursor += 1;
        }
        None
    }

    /// Returns an integer index into `contents`.
    #[inline]
    #[track_caller]
    fn index(&self, coset: CosetId, gen: GeneratorId) -> usize {
        assert!(
            (gen.0 as usize) < self.rank,
            "generator {gen} out of range (rank {rank})",
            rank = self.rank,
        );
        coset.to_usize() * self.rank + gen.0 as usize
    }
}
