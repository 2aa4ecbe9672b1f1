//! The enumeration engine: discovers cosets on demand and drains the
//! deductions each definition forces.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::collections::IndexNewtype;
use crate::common::{CosetId, GeneratorId, GroupError, GroupResult, PerCoset, PerGenerator};
use crate::presentation::Presentation;
use crate::relations::{Fact, RelationTracker};
use crate::table::CosetTable;

/// Record of how a coset was first reached: the (coset, generator) cell whose
/// definition produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Action {
    /// Coset the new one was discovered from.
    pub from: CosetId,
    /// Generator whose action on `from` produced the new coset.
    pub gen: GeneratorId,
}

/// Spanning tree recording how each coset was first discovered.
///
/// The tree is rooted at the base coset, which is the only coset with no
/// [`Action`]. A coset can only be discovered from a coset with a smaller ID,
/// so ID order is a valid topological order of the tree; this is what makes
/// [`DiscoveryPath::walk()`] a single forward pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPath {
    actions: PerCoset<Option<Action>>,
}

impl DiscoveryPath {
    /// Constructs a discovery path containing only the base coset.
    fn new() -> Self {
        let actions: PerCoset<Option<Action>> = std::iter::once(None).collect();
        DiscoveryPath { actions }
    }

    /// Returns the number of cosets in the tree.
    pub fn len(&self) -> usize {
        self.actions.len()
    }
    /// Returns whether the tree is empty. It never is; even the trivial
    /// enumeration contains the base coset.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the action that first produced `coset`, or `None` for the base
    /// coset.
    pub fn action(&self, coset: CosetId) -> Option<Action> {
        self.actions.get(coset).ok().and_then(|action| *action)
    }

    /// Records the discovery of a new coset and returns its ID.
    pub(crate) fn record(&mut self, from: CosetId, gen: GeneratorId) -> GroupResult<CosetId> {
        Ok(self.actions.push(Some(Action { from, gen }))?)
    }

    /// Derives a value for every coset by replaying the discovery tree in a
    /// single forward pass: the base coset gets `start`, and every other
    /// coset gets `combine(parent_value, generator_values[gen])` for the
    /// action that first produced it.
    ///
    /// With an associative `combine` this reconstructs a group element (or
    /// any payload, e.g. a geometric position) per coset.
    pub fn walk<T, G>(
        &self,
        start: T,
        generator_values: &PerGenerator<G>,
        mut combine: impl FnMut(&T, &G) -> T,
    ) -> PerCoset<T> {
        let mut start = Some(start);
        let mut values = PerCoset::new();
        for (_coset, action) in self.actions.iter() {
            let value = match action {
                Some(action) => combine(&values[action.from], &generator_values[action.gen]),
                None => start.take().expect("multiple roots in discovery path"),
            };
            values.push(value).expect("impossible overflow!");
        }
        values
    }
}

/// Result of a coset enumeration: the complete action table, the discovery
/// tree, and whether the enumeration ran to completion or hit its bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CosetEnumeration {
    table: CosetTable,
    discovery: DiscoveryPath,
    complete: bool,
}

impl CosetEnumeration {
    /// Returns the coset action table.
    pub fn table(&self) -> &CosetTable {
        &self.table
    }
    /// Returns the discovery tree.
    pub fn discovery(&self) -> &DiscoveryPath {
        &self.discovery
    }
    /// Returns the number of cosets enumerated. For a complete enumeration
    /// with no stabilized generators, this is the order of the group.
    pub fn order(&self) -> usize {
        self.table.order()
    }
    /// Returns whether every table entry is defined. `false` means the coset
    /// bound was reached first.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
    /// Returns the action of `gen` on `coset`. Only an incomplete enumeration
    /// has undefined entries.
    pub fn get(&self, coset: CosetId, gen: GeneratorId) -> Option<CosetId> {
        self.table.get(coset, gen)
    }

    /// Returns a generator word per coset: the path from the base coset down
    /// the discovery tree. Applying the word to the base coset, one generator
    /// at a time through the table, lands on the coset.
    pub fn words(&self) -> PerCoset<SmallVec<[GeneratorId; 16]>> {
        let generators: PerGenerator<GeneratorId> =
            GeneratorId::iter(self.table.rank()).collect();
        self.discovery
            .walk(SmallVec::new(), &generators, |word, &gen| {
                let mut word = word.clone();
                word.push(gen);
                word
            })
    }

    /// Splits the enumeration into its parts.
    pub fn into_parts(self) -> (CosetTable, DiscoveryPath, bool) {
        (self.table, self.discovery, self.complete)
    }
}

/// Applies queued facts to the table until none remain, letting the relation
/// tracker enqueue every further fact each application forces.
fn apply_facts(
    table: &mut CosetTable,
    tracker: &mut RelationTracker,
    facts: &mut VecDeque<Fact>,
) {
    while let Some(fact) = facts.pop_front() {
        if let Some(existing) = table.get(fact.coset, fact.gen) {
            // Already implied by another deduction path; definitions are
            // never contradictory for a Coxeter presentation.
            assert_eq!(
                existing, fact.target,
                "conflicting deduction for {} * {}; \
                 coincidence found, which this enumeration does not support",
                fact.coset, fact.gen,
            );
            continue;
        }
        table.put(fact.coset, fact.gen, fact.target);
        tracker.process(fact, table, |f| facts.push_back(f));
    }
}

/// Enumerates the cosets of the subgroup of `presentation` generated by the
/// `stabilized` generators, using the Todd-Coxeter algorithm.
///
/// With no stabilized generators this enumerates the elements of the group
/// itself. `bound` is an optional ceiling on the number of cosets: when it is
/// reached the partial table built so far is returned with
/// `is_complete() == false`, which is the supported way to sample infinite
/// (e.g. Euclidean) groups. Reaching the bound is not an error.
///
/// The result is deterministic: a fixed presentation and stabilizer set
/// always produce the same table and discovery tree.
pub fn solve(
    presentation: &Presentation,
    stabilized: &[usize],
    bound: Option<usize>,
) -> GroupResult<CosetEnumeration> {
    let rank = presentation.rank();
    for &index in stabilized {
        if index >= rank {
            return Err(GroupError::InvalidGenerator { index, rank });
        }
    }

    log::trace!("enumerating cosets of {presentation}, stabilizing {stabilized:?}");

    let mut table = CosetTable::new(rank);
    let mut tracker = RelationTracker::new(presentation)?;
    let mut discovery = DiscoveryPath::new();

    let mut cursor = 0;
    let mut facts: VecDeque<Fact> = VecDeque::new();

    // The base coset is fixed by every stabilized generator.
    for &index in stabilized {
        table.put(CosetId::BASE, GeneratorId(index as u8), CosetId::BASE);
    }
    tracker.finalize_coset(CosetId::BASE, &table, |f| facts.push_back(f))?;
    apply_facts(&mut table, &mut tracker, &mut facts);

    let complete = loop {
        // Scan for the next undefined cell, resuming where the last scan left
        // off.
        let Some((coset, gen)) = table.first_unset_from(&mut cursor) else {
            break true;
        };
        if bound.is_some_and(|b| table.order() >= b) {
            log::debug!("coset bound {} reached; stopping enumeration", table.order());
            break false;
        }

        // We've discovered a new coset!
        let target = table.add_row()?;
        tracker.add_coset();
        let recorded = discovery.record(coset, gen)?;
        debug_assert_eq!(recorded, target);

        // Drain every deduction the definition forces, then give the new
        // coset a loop window for each relation the drain did not reach.
        facts.push_back(Fact { coset, gen, target });
        apply_facts(&mut table, &mut tracker, &mut facts);
        tracker.finalize_coset(target, &table, |f| facts.push_back(f))?;
        apply_facts(&mut table, &mut tracker, &mut facts);
    };

    log::debug!(
        "enumerated {} cosets of {presentation} (complete: {complete})",
        table.order(),
    );

    Ok(CosetEnumeration {
        table,
        discovery,
        complete,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::presentation::KnownGroup;

    #[track_caller]
    fn assert_group_order(group: KnownGroup, expected_order: usize) {
        let p = group.presentation().unwrap();
        let e = solve(&p, &[], None).unwrap();
        assert!(e.is_complete());
        assert_eq!(e.order(), expected_order, "wrong order for {group:?}");
    }

    #[test]
    fn test_known_group_orders() {
        assert_group_order(KnownGroup::A(1), 2);
        assert_group_order(KnownGroup::A(2), 6);
        assert_group_order(KnownGroup::A(3), 24);
        assert_group_order(KnownGroup::A(4), 120);
        assert_group_order(KnownGroup::A(5), 720);

        assert_group_order(KnownGroup::B(2), 8);
        assert_group_order(KnownGroup::B(3), 48);
        assert_group_order(KnownGroup::B(4), 384);

        assert_group_order(KnownGroup::D(4), 192);
        assert_group_order(KnownGroup::D(5), 1920);

        assert_group_order(KnownGroup::E6, 51840);

        assert_group_order(KnownGroup::F4, 1152);

        assert_group_order(KnownGroup::G2, 12);

        assert_group_order(KnownGroup::H2, 10);
        assert_group_order(KnownGroup::H3, 120);

        assert_group_order(KnownGroup::I(7), 14);
        assert_group_order(KnownGroup::I(100), 200);
    }

    #[test]
    fn test_h4_order() {
        assert_group_order(KnownGroup::H4, 14400); // 120-cell
    }

    #[test]
    fn test_stabilized_generators() {
        let h3 = Presentation::linear(&[5, 3]).unwrap();
        assert_eq!(solve(&h3, &[0], None).unwrap().order(), 60);
        assert_eq!(solve(&h3, &[1, 2], None).unwrap().order(), 20);
        assert_eq!(solve(&h3, &[0, 1, 2], None).unwrap().order(), 1);

        let a4 = Presentation::linear(&[3, 3, 3]).unwrap();
        assert_eq!(solve(&a4, &[], None).unwrap().order(), 120);
        assert_eq!(solve(&a4, &[0], None).unwrap().order(), 60);

        let err = solve(&h3, &[3], None).unwrap_err();
        assert_eq!(err, GroupError::InvalidGenerator { index: 3, rank: 3 });
    }

    #[test]
    fn test_mixed_multiplicity_diagrams() {
        // Diagrams whose relation loops grow unevenly from both ends of
        // their base cosets; the closing deduction must pair the two
        // opposite ends of each loop.
        let p = Presentation::linear(&[2, 4]).unwrap();
        assert_eq!(solve(&p, &[], None).unwrap().order(), 16);

        let b3 = Presentation::linear(&[4, 3]).unwrap();
        assert_eq!(solve(&b3, &[], None).unwrap().order(), 48);

        // The mirror-image diagram enumerates in a different order but must
        // reach the same group.
        let b3_reversed = Presentation::linear(&[3, 4]).unwrap();
        assert_eq!(solve(&b3_reversed, &[], None).unwrap().order(), 48);
    }

    #[test]
    fn test_trivial_presentation() {
        let p = Presentation::new(0).unwrap();
        let e = solve(&p, &[], None).unwrap();
        assert!(e.is_complete());
        assert_eq!(e.order(), 1);
        assert_eq!(e.discovery().len(), 1);
        assert_eq!(e.discovery().action(CosetId::BASE), None);
    }

    #[test]
    fn test_rank_one_presentation() {
        let p = Presentation::new(1).unwrap();
        let e = solve(&p, &[], None).unwrap();
        assert_eq!(e.order(), 2);
        assert_eq!(
            e.get(CosetId::BASE, GeneratorId(0)),
            Some(CosetId(1)),
        );
    }

    #[test]
    fn test_table_invariants() {
        let p = KnownGroup::B(3).presentation().unwrap();
        let e = solve(&p, &[], None).unwrap();
        let table = e.table();

        for coset in CosetId::iter(table.order()) {
            for gen in GeneratorId::iter(table.rank()) {
                // Every entry is defined and symmetric: applying a generator
                // twice returns to the original coset.
                let target = table.get(coset, gen).expect("incomplete table");
                assert_eq!(table.get(target, gen), Some(coset));
            }
            // The discovery tree is topologically ordered by coset ID.
            if let Some(action) = e.discovery().action(coset) {
                assert!(action.from < coset);
            } else {
                assert_eq!(coset, CosetId::BASE);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let p = KnownGroup::H3.presentation().unwrap();
        let first = solve(&p, &[1], None).unwrap();
        let second = solve(&p, &[1], None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bound_on_infinite_group() {
        // Infinite dihedral group: a single free link.
        let mut p = Presentation::new(2).unwrap();
        p.set(0, 1, None).unwrap();
        let e = solve(&p, &[], Some(50)).unwrap();
        assert!(!e.is_complete());
        assert_eq!(e.order(), 50);

        // Euclidean diagram with a free link.
        let mut p = Presentation::linear(&[3, 3]).unwrap();
        p.set(1, 2, None).unwrap();
        let e = solve(&p, &[], Some(500)).unwrap();
        assert!(!e.is_complete());
        assert_eq!(e.order(), 500);
    }

    #[test]
    fn test_bound_above_group_order() {
        let p = KnownGroup::H3.presentation().unwrap();
        let e = solve(&p, &[], Some(10_000)).unwrap();
        assert!(e.is_complete());
        assert_eq!(e.order(), 120);
    }

    #[test]
    fn test_subgroup_projection_round_trip() {
        // The index of a parabolic subgroup times the subgroup's own order is
        // the order of the whole group.
        let h3 = Presentation::linear(&[5, 3]).unwrap();
        let whole = solve(&h3, &[], None).unwrap().order();
        for stabilized in [vec![0], vec![2], vec![0, 1], vec![1, 2]] {
            let index = solve(&h3, &stabilized, None).unwrap().order();
            let sub = h3.sub(&stabilized).unwrap();
            let subgroup_order = solve(&sub, &[], None).unwrap().order();
            assert_eq!(index * subgroup_order, whole, "stabilizing {stabilized:?}");
        }
    }

    #[test]
    fn test_product_and_power_orders_multiply() {
        let square = Presentation::linear(&[4]).unwrap(); // order 8
        let triangle = Presentation::linear(&[3]).unwrap(); // order 6

        let composite = square.product(&triangle).unwrap();
        assert_eq!(solve(&composite, &[], None).unwrap().order(), 48);

        let doubled = triangle.power(2).unwrap();
        assert_eq!(solve(&doubled, &[], None).unwrap().order(), 36);
    }

    #[test]
    fn test_words_replay_to_their_coset() {
        let p = KnownGroup::A(3).presentation().unwrap();
        let e = solve(&p, &[], None).unwrap();
        let words = e.words();
        assert_eq!(words.len(), e.order());
        assert!(words[CosetId::BASE].is_empty());

        for (coset, word) in words.iter() {
            let mut current = CosetId::BASE;
            for &gen in word {
                current = e.get(current, gen).expect("incomplete table");
            }
            assert_eq!(current, coset);
        }
    }

    #[test]
    fn test_walk_accumulates_from_parents() {
        let p = KnownGroup::A(2).presentation().unwrap();
        let e = solve(&p, &[], None).unwrap();

        // Count word length via `walk`; it must match the discovery depth.
        let ones: PerGenerator<usize> = GeneratorId::iter(p.rank()).map(|_| 1).collect();
        let depths = e.discovery().walk(0_usize, &ones, |depth, step| depth + step);
        let words = e.words();
        for (coset, &depth) in depths.iter() {
            assert_eq!(depth, words[coset].len());
        }
    }
}
