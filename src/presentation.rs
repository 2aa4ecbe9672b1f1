//! Coxeter group presentations, stored as symmetric multiplicity matrices.

use std::fmt;

use itertools::Itertools;

use crate::collections::IndexNewtype;
use crate::common::{GeneratorId, GroupError, GroupResult};
use crate::enumerate::{solve, CosetEnumeration};

/// Multiplicity of a generator pair: the order of the product of the two
/// generators. `None` is a free (unconstrained) link, i.e. the relation is
/// omitted and the product has infinite order.
pub type Mult = Option<u16>;

/// Presentation of a Coxeter group: a generator count and a symmetric matrix
/// of pair multiplicities.
///
/// Every generator is an involution (`mult[i][i] == 1`) and unlinked pairs
/// commute (`mult[i][j] == 2` by default). A presentation is immutable during
/// enumeration; [`Presentation::sub()`], [`Presentation::product()`], and
/// [`Presentation::power()`] build new presentations rather than mutating an
/// existing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Presentation {
    /// Number of generators.
    rank: usize,
    /// Flattened symmetric `rank × rank` matrix of pair multiplicities.
    mult: Vec<Mult>,
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(indices) = self.linear_indices() {
            let contents = indices
                .iter()
                .map(|m| match m {
                    Some(m) => m.to_string(),
                    None => "-".to_string(),
                })
                .join(", ");
            write!(f, "{{{contents}}}")
        } else {
            write!(f, "{:?}", self.mult)
        }
    }
}

impl Presentation {
    /// Constructs the default presentation of the given rank: every generator
    /// is an involution and every pair commutes.
    pub fn new(rank: usize) -> GroupResult<Self> {
        Self::from_fn(rank, |i, j| if i == j { Some(1) } else { Some(2) })
    }

    /// Constructs a presentation from a linear Coxeter diagram: `indices[i]`
    /// links generator `i` to generator `i + 1`, and all other pairs commute.
    ///
    /// This is the presentation of a linear Schläfli symbol; for example,
    /// `linear(&[4, 3])` is the symmetry group of the cube.
    pub fn linear(indices: &[u16]) -> GroupResult<Self> {
        let mut ret = Self::new(indices.len() + 1)?;
        for (i, &m) in indices.iter().enumerate() {
            ret.set(i, i + 1, Some(m))?;
        }
        Ok(ret)
    }

    /// Constructs and validates a presentation from a function that returns
    /// each entry of the multiplicity matrix.
    pub fn from_fn(rank: usize, mut f: impl FnMut(usize, usize) -> Mult) -> GroupResult<Self> {
        // Check that there aren't too many generators.
        if rank > 0 {
            GeneratorId::try_from_usize(rank - 1)?;
        }

        let mut mult = Vec::with_capacity(rank * rank);
        for i in 0..rank {
            for j in 0..rank {
                mult.push(f(i, j));
            }
        }
        let ret = Presentation { rank, mult };
        ret.validate()?;
        Ok(ret)
    }

    /// Checks the matrix invariants: ones exactly on the diagonal, symmetry,
    /// and no off-diagonal multiplicity below 2.
    fn validate(&self) -> GroupResult<()> {
        for i in 0..self.rank {
            for j in 0..=i {
                let m = self.mult[i * self.rank + j];
                if (i == j) != (m == Some(1)) {
                    return Err(GroupError::BadMatrix);
                }
                if m == Some(0) {
                    return Err(GroupError::BadMatrix);
                }
                if m != self.mult[j * self.rank + i] {
                    return Err(GroupError::BadMatrix);
                }
            }
        }
        Ok(())
    }

    /// Returns the number of generators.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Returns the multiplicity of a generator pair.
    #[track_caller]
    pub fn get(&self, i: usize, j: usize) -> Mult {
        assert!(i < self.rank && j < self.rank, "generator index out of range");
        self.mult[i * self.rank + j]
    }

    /// Sets the multiplicity of a generator pair, symmetrically.
    ///
    /// `i == j` is rejected (the diagonal is fixed at 1), as is any finite
    /// multiplicity below 2. Setting `None` makes the link free.
    pub fn set(&mut self, i: usize, j: usize, m: Mult) -> GroupResult<()> {
        if i == j {
            return Err(GroupError::SelfPaired(i));
        }
        for index in [i, j] {
            if index >= self.rank {
                return Err(GroupError::InvalidGenerator {
                    index,
                    rank: self.rank,
                });
            }
        }
        if let Some(m) = m {
            if m < 2 {
                return Err(GroupError::BadMultiplicity(m));
            }
        }
        self.mult[i * self.rank + j] = m;
        self.mult[j * self.rank + i] = m;
        Ok(())
    }

    /// Returns a new presentation restricted to the given generator indices,
    /// re-indexed `0..indices.len()`.
    ///
    /// Generator `p` of the result corresponds to `indices[p]`; callers must
    /// track the mapping if they later need to translate coset tables back to
    /// the parent numbering. Duplicate indices are rejected.
    pub fn sub(&self, indices: &[usize]) -> GroupResult<Presentation> {
        for (p, &index) in indices.iter().enumerate() {
            if index >= self.rank {
                return Err(GroupError::InvalidGenerator {
                    index,
                    rank: self.rank,
                });
            }
            if indices[..p].contains(&index) {
                return Err(GroupError::DuplicateGenerator(index));
            }
        }
        Self::from_fn(indices.len(), |p, q| self.get(indices[p], indices[q]))
    }

    /// Returns the block-diagonal composite of two presentations: the disjoint
    /// union of their generator sets, with no cross relations. The generators
    /// of `other` are re-indexed with an offset of `self.rank()`.
    pub fn product(&self, other: &Presentation) -> GroupResult<Presentation> {
        let r = self.rank;
        Self::from_fn(r + other.rank, |i, j| match (i < r, j < r) {
            (true, true) => self.get(i, j),
            (false, false) => other.get(i - r, j - r),
            _ => Some(2),
        })
    }

    /// Returns the block-diagonal composite of `n` disjoint copies of this
    /// presentation. `power(0)` is the trivial (rank-0) presentation.
    pub fn power(&self, n: usize) -> GroupResult<Presentation> {
        let r = self.rank;
        Self::from_fn(r * n, |i, j| {
            if i / r == j / r {
                self.get(i % r, j % r)
            } else {
                Some(2)
            }
        })
    }

    /// Returns an iterator over the generator pairs `(i, j, mult)` with
    /// `i < j`.
    pub fn pairs(&self) -> impl '_ + Iterator<Item = (usize, usize, Mult)> {
        (0..self.rank)
            .flat_map(|j| (0..j).map(move |i| (i, j)))
            .map(|(i, j)| (i, j, self.get(i, j)))
    }

    /// Returns the multiplicities of the linear diagram `0 - 1 - … - (n-1)`,
    /// or `None` if this presentation is not linear.
    pub fn linear_indices(&self) -> Option<Vec<Mult>> {
        for (i, j, m) in self.pairs() {
            if i + 1 != j && m != Some(2) {
                return None;
            }
        }
        Some((1..self.rank).map(|j| self.get(j - 1, j)).collect())
    }

    /// Enumerates the cosets of this presentation. See [`solve`].
    pub fn solve(
        &self,
        stabilized: &[usize],
        bound: Option<usize>,
    ) -> GroupResult<CosetEnumeration> {
        solve(self, stabilized, bound)
    }
}

/// Well-known finite Coxeter group, named by its [Coxeter-Dynkin
/// diagram](https://w.wiki/7PLe).
#[allow(missing_docs)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum KnownGroup {
    A(u8),
    B(u8),
    D(u8),
    E6,
    E7,
    E8,
    F4,
    G2,
    H2,
    H3,
    H4,
    I(u16),
}

impl KnownGroup {
    /// Returns the number of generators for the group.
    pub fn rank(self) -> u8 {
        match self {
            KnownGroup::A(n) => n,
            KnownGroup::B(n) => n,
            KnownGroup::D(n) => n,
            KnownGroup::E6 => 6,
            KnownGroup::E7 => 7,
            KnownGroup::E8 => 8,
            KnownGroup::F4 => 4,
            KnownGroup::G2 => 2,
            KnownGroup::H2 => 2,
            KnownGroup::H3 => 3,
            KnownGroup::H4 => 4,
            KnownGroup::I(_) => 2,
        }
    }

    /// Returns an entry of the group's Coxeter matrix.
    fn mult(self, mut i: u8, mut j: u8) -> u16 {
        // Ensure i<j
        if j < i {
            std::mem::swap(&mut i, &mut j);
        }

        let n = self.rank();

        // The diagonal of the matrix is always 1.
        if i == j {
            return 1;
        }

        match self {
            KnownGroup::A(_) if i + 1 == j => 3,

            KnownGroup::B(n) if i + 1 == j => 3 + (j + 1 == n) as u16,

            KnownGroup::D(n) if i + 1 == j && j + 1 < n => 3,
            KnownGroup::D(n) if i + 3 == n => 3,

            KnownGroup::E6 | KnownGroup::E7 | KnownGroup::E8 if i == 2 && j + 1 == n => 3,
            KnownGroup::E6 | KnownGroup::E7 | KnownGroup::E8 if i + 1 == j && j + 1 < n => 3,

            KnownGroup::F4 if i == 1 && j == 2 => 4,
            KnownGroup::F4 if i + 1 == j => 3,

            KnownGroup::G2 => 6,

            KnownGroup::H2 => 5,

            KnownGroup::H3 if j == 1 => 5, // (i, j) = (0, 1)
            KnownGroup::H3 if i == 1 => 3, // (i, j) = (1, 2)

            KnownGroup::H4 if j == 1 => 5, // (i, j) = (0, 1)
            KnownGroup::H4 if i + 1 == j => 3,

            KnownGroup::I(m) => m,

            _ => 2, // no edge
        }
    }

    /// Returns the group's presentation.
    pub fn presentation(self) -> GroupResult<Presentation> {
        Presentation::from_fn(self.rank() as usize, |i, j| {
            Some(self.mult(i as u8, j as u8))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matrix() {
        let p = Presentation::new(3).unwrap();
        assert_eq!(p.get(0, 0), Some(1));
        assert_eq!(p.get(1, 1), Some(1));
        assert_eq!(p.get(0, 2), Some(2));
        assert_eq!(p.get(2, 0), Some(2));
    }

    #[test]
    fn test_set_is_symmetric() {
        let mut p = Presentation::new(3).unwrap();
        p.set(2, 0, Some(5)).unwrap();
        assert_eq!(p.get(0, 2), Some(5));
        assert_eq!(p.get(2, 0), Some(5));

        p.set(0, 1, None).unwrap();
        assert_eq!(p.get(1, 0), None);
    }

    #[test]
    fn test_construction_errors() {
        let mut p = Presentation::new(3).unwrap();
        assert_eq!(p.set(1, 1, Some(4)), Err(GroupError::SelfPaired(1)));
        assert_eq!(
            p.set(0, 3, Some(4)),
            Err(GroupError::InvalidGenerator { index: 3, rank: 3 }),
        );
        assert_eq!(p.set(0, 1, Some(1)), Err(GroupError::BadMultiplicity(1)));
        assert_eq!(p.set(0, 1, Some(0)), Err(GroupError::BadMultiplicity(0)));

        assert_eq!(
            p.sub(&[0, 0]),
            Err(GroupError::DuplicateGenerator(0)),
        );
        assert_eq!(
            p.sub(&[0, 5]),
            Err(GroupError::InvalidGenerator { index: 5, rank: 3 }),
        );

        // Matrices with a bad diagonal or asymmetric entries are rejected.
        assert_eq!(
            Presentation::from_fn(2, |_, _| Some(3)),
            Err(GroupError::BadMatrix),
        );
        assert_eq!(
            Presentation::from_fn(2, |i, j| Some(if i == j { 1 } else { 2 + i as u16 })),
            Err(GroupError::BadMatrix),
        );
    }

    #[test]
    fn test_linear() {
        let p = Presentation::linear(&[5, 3]).unwrap();
        assert_eq!(p.rank(), 3);
        assert_eq!(p.get(0, 1), Some(5));
        assert_eq!(p.get(1, 2), Some(3));
        assert_eq!(p.get(0, 2), Some(2));
        assert_eq!(p.linear_indices(), Some(vec![Some(5), Some(3)]));
        assert_eq!(p.to_string(), "{5, 3}");
    }

    #[test]
    fn test_sub_restriction() {
        let p = Presentation::linear(&[5, 3]).unwrap();
        let q = p.sub(&[1, 2]).unwrap();
        assert_eq!(q.rank(), 2);
        assert_eq!(q.get(0, 1), Some(3));

        // `sub` re-indexes by position, not by value.
        let r = p.sub(&[2, 0]).unwrap();
        assert_eq!(r.get(0, 1), Some(2));
    }

    #[test]
    fn test_product_and_power() {
        let p = Presentation::linear(&[4]).unwrap();
        let q = Presentation::linear(&[3]).unwrap();
        let pq = p.product(&q).unwrap();
        assert_eq!(pq.rank(), 4);
        assert_eq!(pq.get(0, 1), Some(4));
        assert_eq!(pq.get(2, 3), Some(3));
        assert_eq!(pq.get(1, 2), Some(2)); // no cross relation

        let ppp = p.power(3).unwrap();
        assert_eq!(ppp.rank(), 6);
        assert_eq!(ppp.get(4, 5), Some(4));
        assert_eq!(ppp.get(0, 5), Some(2));

        assert_eq!(p.power(0).unwrap().rank(), 0);
    }

    #[test]
    fn test_known_group_matrices() {
        let f4 = KnownGroup::F4.presentation().unwrap();
        assert_eq!(f4.linear_indices(), Some(vec![Some(3), Some(4), Some(3)]));

        let d4 = KnownGroup::D(4).presentation().unwrap();
        assert_eq!(d4.get(0, 1), Some(3));
        assert_eq!(d4.get(1, 2), Some(3));
        assert_eq!(d4.get(1, 3), Some(3));
        assert_eq!(d4.get(2, 3), Some(2));

        let i7 = KnownGroup::I(7).presentation().unwrap();
        assert_eq!(i7.get(0, 1), Some(7));
    }
}
