//! Per-relation loop tracking.
//!
//! Each Coxeter relation `(sᵢ sⱼ)^m = e` forces every coset to lie on a cyclic
//! sequence of length `2m` traced by alternately applying the two generators.
//! The tracker keeps one [`LoopWindow`] per loop instance: the cosets on
//! either side of the stretch of the cycle whose edges are not yet in the
//! table. A window's ends advance toward each other over edges as they are
//! defined, from both directions independently; the moment a single undefined
//! edge remains, that edge is forced and the tracker emits it. Every edge of a
//! loop is traversed a bounded number of times, so the cost is O(1) amortized
//! per table entry.

use smallvec::SmallVec;

use crate::collections::GenericVec;
use crate::common::{CosetId, GeneratorId, GroupResult};
use crate::presentation::Presentation;
use crate::table::CosetTable;

idx_struct! {
    /// ID of a tracked relation.
    pub(crate) struct RelationId(u16);
    /// ID of a loop window in the shared pool.
    pub(crate) struct SlotId(u32);
}

/// List containing a value per loop window.
type PerSlot<T> = GenericVec<SlotId, T>;

/// Fact that `coset * gen = target`, forced either by a scan definition or by
/// a relation loop closing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Fact {
    pub coset: CosetId,
    pub gen: GeneratorId,
    pub target: CosetId,
}

/// Tracked relation `(a b)^mult = e` between two generators.
#[derive(Debug, Copy, Clone)]
struct Relation {
    gens: [GeneratorId; 2],
    mult: u16,
}
impl Relation {
    /// Length of the alternating word `abab…` implied by the relation.
    fn word_len(self) -> u32 {
        self.mult as u32 * 2
    }
    /// Generator at a position along the alternating word.
    fn gen_at(self, index: u32) -> GeneratorId {
        self.gens[(index & 1) as usize]
    }
}

/// One tracked traversal of a relation loop.
///
/// `left` and `right` sit on either side of the gap of not-yet-defined edges;
/// the indices are their positions along the alternating word. Both ends
/// start at the loop's base coset (indices `0` and `2m - 1`, so the two ends
/// leave the base by different generators) and move toward each other over
/// edges already present in the table. When the indices meet, exactly one
/// edge of the loop is missing and its endpoints are `left` and `right`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct LoopWindow {
    relation: RelationId,
    left: CosetId,
    right: CosetId,
    left_index: u32,
    right_index: u32,
}
impl LoopWindow {
    /// Returns whether the window has narrowed to a single edge and emitted
    /// it; a complete window never advances again.
    fn is_complete(self) -> bool {
        self.left_index == self.right_index
    }
}

/// Loop windows for every tracked relation, plus the per-(coset, relation)
/// rows that route table entries to the windows they can advance.
#[derive(Debug, Clone)]
pub(crate) struct RelationTracker {
    /// Tracked relations: every generator pair with a finite multiplicity.
    relations: GenericVec<RelationId, Relation>,
    /// Relations touching each generator.
    by_gen: Vec<SmallVec<[RelationId; 4]>>,
    /// Flattened 2D array indexed by a pair of coset ID and relation ID,
    /// holding the window that first reached each coset. Grows in lockstep
    /// with the coset table. Sharing window identity through an index (never
    /// through a reference) keeps the pool append-only and free of aliasing
    /// hazards.
    rows: Vec<Option<SlotId>>,
    /// The window pool.
    windows: PerSlot<LoopWindow>,
}

impl RelationTracker {
    /// Constructs a tracker for every finite pair relation of `presentation`,
    /// with rows for the base coset only.
    pub fn new(presentation: &Presentation) -> GroupResult<Self> {
        let mut relations = GenericVec::new();
        let mut by_gen = vec![SmallVec::new(); presentation.rank()];
        for (i, j, m) in presentation.pairs() {
            let Some(mult) = m else {
                continue; // free link; no relation to track
            };
            let id = relations.push(Relation {
                gens: [GeneratorId(i as u8), GeneratorId(j as u8)],
                mult,
            })?;
            by_gen[i].push(id);
            by_gen[j].push(id);
        }
        let rows = vec![None; relations.len()];
        Ok(RelationTracker {
            relations,
            by_gen,
            rows,
            windows: PerSlot::new(),
        })
    }

    /// Appends a row per relation for a newly-defined coset.
    pub fn add_coset(&mut self) {
        self.rows
            .extend(std::iter::repeat(None).take(self.relations.len()));
    }

    /// Propagates a newly-defined table entry through every relation touching
    /// its generator, calling `emit` for each table entry that is forced in
    /// turn. The entry must already be in `table`.
    ///
    /// Windows read the table directly, so the deductions reached do not
    /// depend on the order facts are handed to this method.
    pub fn process(&mut self, fact: Fact, table: &CosetTable, mut emit: impl FnMut(Fact)) {
        let Fact { coset, gen, target } = fact;
        let touched = self.by_gen[gen.0 as usize].clone();
        for id in touched {
            // The windows holding either endpoint can now advance over the
            // new edge.
            let first = self.row(coset, id);
            let second = self.row(target, id).filter(|&slot| Some(slot) != first);
            for slot in [first, second].into_iter().flatten() {
                self.advance(slot, table, &mut emit);
            }
        }
    }

    /// Starts a window for every relation that has not yet reached a
    /// newly-created coset, then advances it over whatever table entries
    /// already exist. Stabilized generators give the base coset self-loops
    /// before any window exists, and a loop closure can define a self-loop on
    /// a coset mid-drain; this pass picks both up.
    pub fn finalize_coset(
        &mut self,
        coset: CosetId,
        table: &CosetTable,
        mut emit: impl FnMut(Fact),
    ) -> GroupResult<()> {
        for id in self.relations.iter_keys() {
            if self.row(coset, id).is_some() {
                continue;
            }
            let relation = self.relations[id];
            let slot = self.windows.push(LoopWindow {
                relation: id,
                left: coset,
                right: coset,
                left_index: 0,
                right_index: relation.word_len() - 1,
            })?;
            *self.row_mut(coset, id) = Some(slot);
            self.advance(slot, table, &mut emit);
        }
        Ok(())
    }

    /// Advances both ends of a window over every edge present in the table,
    /// attaching each coset reached to the window. Emits the closing edge if
    /// the window narrows to one.
    fn advance(&mut self, slot: SlotId, table: &CosetTable, emit: &mut impl FnMut(Fact)) {
        let mut w = self.windows[slot];
        if w.is_complete() {
            return;
        }
        let relation = self.relations[w.relation];

        while w.left_index < w.right_index {
            let Some(next) = table.get(w.left, relation.gen_at(w.left_index)) else {
                break;
            };
            w.left_index += 1;
            w.left = next;
            self.claim(next, w.relation, slot);
        }
        // Generators are involutions, so stepping backward along the word
        // uses the same table.
        while w.left_index < w.right_index {
            let Some(prev) = table.get(w.right, relation.gen_at(w.right_index)) else {
                break;
            };
            w.right_index -= 1;
            w.right = prev;
            self.claim(prev, w.relation, slot);
        }

        self.windows[slot] = w;
        if w.is_complete() {
            emit(Fact {
                coset: w.left,
                gen: relation.gen_at(w.left_index),
                target: w.right,
            });
        }
    }

    /// Attaches a coset to the window that reached it, unless another window
    /// of the same relation got there first.
    fn claim(&mut self, coset: CosetId, relation: RelationId, slot: SlotId) {
        let row = self.row_mut(coset, relation);
        if row.is_none() {
            *row = Some(slot);
        }
    }

    fn row(&self, coset: CosetId, relation: RelationId) -> Option<SlotId> {
        self.rows[self.row_index(coset, relation)]
    }
    fn row_mut(&mut self, coset: CosetId, relation: RelationId) -> &mut Option<SlotId> {
        let index = self.row_index(coset, relation);
        &mut self.rows[index]
    }
    fn row_index(&self, coset: CosetId, relation: RelationId) -> usize {
        coset.0 as usize * self.relations.len() + relation.0 as usize
    }
}
