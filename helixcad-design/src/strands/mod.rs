/*
HelixCAD, a lattice-based design core for DNA nanostructures.
    Copyright (C) 2026  The HelixCAD authors

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU General Public License as published by
    the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU General Public License for more details.

    You should have received a copy of the GNU General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};

use ahash::RandomState;

use super::design_operations::ErrOperation;

// used to serialize `Oligo.cyclic`
fn is_false(x: &bool) -> bool {
    !*x
}

/// Colours given to freshly created oligos, in rotation.
const OLIGO_PALETTE: [u32; 10] = [
    0xCC0000, 0xF74308, 0xF7931E, 0xAAAA00, 0x57BB00, 0x007200, 0x03B6A2, 0x1700DE, 0x7300DE,
    0xB8056C,
];

/// The strand network of a design.
///
/// It contains all the information about the topology of the design: which base
/// intervals are covered by strands, how strands chain into oligos via
/// crossovers, and which strands are base-paired.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct StrandNetwork {
    strands: BTreeMap<usize, Strand>,
    oligos: BTreeMap<usize, Oligo>,
}

/// A strand: a contiguous interval of bases on one direction of one helix.
///
/// The interval is `start..end` with `start < end`. On a forward strand the 5'
/// end is at `start`; on a reverse strand it is at `end - 1`. The optional
/// sequence is stored in 5' to 3' order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Strand {
    /// Identifier of the helix this strand lies on.
    pub helix: usize,
    /// If true, the 5' to 3' direction of this strand runs in the direction of
    /// increasing base indices along the helix.
    pub forward: bool,
    /// Position of the leftmost base of this strand along the helix.
    pub start: isize,
    /// Position of the first base after the rightmost base of this strand.
    /// Strands must always be such that `start < end`.
    pub end: isize,
    /// The sequence of this strand, if any, in 5' to 3' order. Unassigned
    /// positions within a partially paired strand hold a space character.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sequence: Option<Cow<'static, str>>,
    /// The oligo this strand belongs to.
    pub oligo: usize,
    /// The strand whose 3' end is connected to our 5' end, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prime5: Option<usize>,
    /// The strand whose 5' end is connected to our 3' end, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prime3: Option<usize>,
}

impl Strand {
    pub fn length(&self) -> usize {
        (self.end - self.start).max(0) as usize
    }

    /// Base position of the 5' end of this strand.
    pub fn prime5_position(&self) -> isize {
        if self.forward {
            self.start
        } else {
            self.end - 1
        }
    }

    /// Base position of the 3' end of this strand.
    pub fn prime3_position(&self) -> isize {
        if self.forward {
            self.end - 1
        } else {
            self.start
        }
    }

    /// True iff the two strands cover a common base position on the same helix
    /// and direction.
    pub fn intersect(&self, other: &Strand) -> bool {
        self.helix == other.helix
            && self.forward == other.forward
            && self.start < other.end
            && other.start < self.end
    }

    /// The base positions covered by both strands, regardless of direction.
    ///
    /// Base indices are helix-local and shared by both directions, so the
    /// returned interval is valid in the coordinate system of either strand.
    pub fn overlap(&self, other: &Strand) -> Option<(isize, isize)> {
        if self.helix != other.helix {
            return None;
        }
        let low = self.start.max(other.start);
        let high = self.end.min(other.end);
        if low < high {
            Some((low, high))
        } else {
            None
        }
    }

    /// Index, in 5' to 3' order, of the base at helix position `position`.
    pub fn index_of_position(&self, position: isize) -> usize {
        if self.forward {
            (position - self.start) as usize
        } else {
            (self.end - 1 - position) as usize
        }
    }

    /// True iff this strand covers the helix position `position`.
    pub fn contains_position(&self, position: isize) -> bool {
        position >= self.start && position < self.end
    }
}

/// An oligo: a chain of strands connected 5' to 3' via crossovers, representing
/// one physical DNA strand of the design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Oligo {
    /// The 5'-most strand of the chain. For a cyclic oligo this is the entry
    /// point of traversals.
    pub strand5p: usize,
    /// Is this oligo circular? Can be skipped (and defaults to `false`) in the
    /// serialization.
    #[serde(skip_serializing_if = "is_false", default)]
    pub cyclic: bool,
    /// The nominal sequence applied to this oligo, if any.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sequence: Option<Cow<'static, str>>,
    /// Colour of this oligo.
    #[serde(default)]
    pub color: u32,
    /// A name of the oligo, used for export.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<Cow<'static, str>>,
}

/// An ordered view of the strands of one direction of one helix.
///
/// The strand identifiers are sorted by interval start; intervals never
/// overlap.
#[derive(Debug, Clone)]
pub struct StrandSet {
    pub helix: usize,
    pub forward: bool,
    pub strands: Vec<usize>,
}

impl StrandNetwork {
    // Collection methods
    //============================================================================================
    pub fn strand(&self, id: &usize) -> Option<&Strand> {
        self.strands.get(id)
    }

    pub fn oligo(&self, id: &usize) -> Option<&Oligo> {
        self.oligos.get(id)
    }

    pub fn strands(&self) -> impl Iterator<Item = (&usize, &Strand)> {
        self.strands.iter()
    }

    pub fn oligos(&self) -> impl Iterator<Item = (&usize, &Oligo)> {
        self.oligos.iter()
    }

    pub fn nb_strands(&self) -> usize {
        self.strands.len()
    }

    pub fn nb_oligos(&self) -> usize {
        self.oligos.len()
    }

    pub(crate) fn strand_mut(&mut self, id: &usize) -> Option<&mut Strand> {
        self.strands.get_mut(id)
    }

    pub(crate) fn oligo_mut(&mut self, id: &usize) -> Option<&mut Oligo> {
        self.oligos.get_mut(id)
    }

    fn next_strand_id(&self) -> usize {
        self.strands.keys().max().map(|m| m + 1).unwrap_or(0)
    }

    fn next_oligo_id(&self) -> usize {
        self.oligos.keys().max().map(|m| m + 1).unwrap_or(0)
    }
    //============================================================================================

    /// The ordered strand set of one direction of one helix.
    pub fn strand_set(&self, helix: usize, forward: bool) -> StrandSet {
        let mut ids: Vec<usize> = self
            .strands
            .iter()
            .filter(|(_, s)| s.helix == helix && s.forward == forward)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_by_key(|id| self.strands[id].start);
        StrandSet {
            helix,
            forward,
            strands: ids,
        }
    }

    /// True if at least one strand lies on helix `h_id`.
    pub fn uses_helix(&self, h_id: usize) -> bool {
        self.strands.values().any(|s| s.helix == h_id)
    }

    /// Identifiers of the oligos having at least one strand on helix `h_id`.
    pub fn oligos_on_helix(&self, h_id: usize) -> Vec<usize> {
        let mut seen = HashSet::with_hasher(RandomState::default());
        let mut ret = Vec::new();
        for strand in self.strands.values() {
            if strand.helix == h_id && seen.insert(strand.oligo) {
                ret.push(strand.oligo);
            }
        }
        ret.sort_unstable();
        ret
    }

    /// The strand covering `position` on the given helix direction, if any.
    pub fn strand_at(&self, helix: usize, forward: bool, position: isize) -> Option<usize> {
        self.strands
            .iter()
            .find(|(_, s)| s.helix == helix && s.forward == forward && s.contains_position(position))
            .map(|(id, _)| *id)
    }

    /// Create a strand covering `start..end` on one direction of a helix,
    /// together with the singleton oligo owning it.
    ///
    /// `helix_length` is the number of addressable bases of the helix; the
    /// interval must fit in `0..helix_length` and must not overlap any strand
    /// of the same strand set.
    pub fn create_strand(
        &mut self,
        helix: usize,
        forward: bool,
        start: isize,
        end: isize,
        helix_length: usize,
    ) -> Result<usize, ErrOperation> {
        if start < 0 || end > helix_length as isize || start >= end {
            return Err(ErrOperation::OutOfBounds { helix, start, end });
        }
        let candidate = Strand {
            helix,
            forward,
            start,
            end,
            sequence: None,
            oligo: 0,
            prime5: None,
            prime3: None,
        };
        for (id, strand) in self.strands.iter() {
            if strand.intersect(&candidate) {
                return Err(ErrOperation::StrandOverlap { strand: *id });
            }
        }
        let s_id = self.next_strand_id();
        let o_id = self.next_oligo_id();
        self.strands.insert(
            s_id,
            Strand {
                oligo: o_id,
                ..candidate
            },
        );
        self.oligos.insert(
            o_id,
            Oligo {
                strand5p: s_id,
                cyclic: false,
                sequence: None,
                color: OLIGO_PALETTE[o_id % OLIGO_PALETTE.len()],
                name: None,
            },
        );
        Ok(s_id)
    }

    /// Install a crossover connecting the 3' end of `upstream` to the 5' end of
    /// `downstream`.
    ///
    /// The two oligos are merged; connecting the tail of a chain back to its
    /// own head makes the oligo cyclic.
    pub fn connect_3p(&mut self, upstream: usize, downstream: usize) -> Result<(), ErrOperation> {
        let up = self
            .strands
            .get(&upstream)
            .ok_or(ErrOperation::StrandDoesNotExist(upstream))?;
        let down = self
            .strands
            .get(&downstream)
            .ok_or(ErrOperation::StrandDoesNotExist(downstream))?;
        if up.prime3.is_some() {
            return Err(ErrOperation::AlreadyConnected { strand: upstream });
        }
        if down.prime5.is_some() {
            return Err(ErrOperation::AlreadyConnected { strand: downstream });
        }
        let up_oligo = up.oligo;
        let down_oligo = down.oligo;

        self.strands.get_mut(&upstream).unwrap().prime3 = Some(downstream);
        self.strands.get_mut(&downstream).unwrap().prime5 = Some(upstream);

        if up_oligo == down_oligo {
            // tail connected back to head
            self.oligos.get_mut(&up_oligo).unwrap().cyclic = true;
        } else {
            for strand in self.strands.values_mut() {
                if strand.oligo == down_oligo {
                    strand.oligo = up_oligo;
                }
            }
            self.oligos.remove(&down_oligo);
        }
        Ok(())
    }

    /// Remove an oligo and every strand of its chain. Returns the removed
    /// oligo and strands, in identifier order.
    pub fn remove_oligo(
        &mut self,
        o_id: usize,
    ) -> Result<(Oligo, Vec<(usize, Strand)>), ErrOperation> {
        let oligo = self
            .oligos
            .remove(&o_id)
            .ok_or(ErrOperation::OligoDoesNotExist(o_id))?;
        let strand_ids: Vec<usize> = self
            .strands
            .iter()
            .filter(|(_, s)| s.oligo == o_id)
            .map(|(id, _)| *id)
            .collect();
        let mut removed = Vec::with_capacity(strand_ids.len());
        for s_id in strand_ids {
            let strand = self.strands.remove(&s_id).unwrap();
            removed.push((s_id, strand));
        }
        // sever the crossovers that pointed into the removed chain
        let gone: HashSet<usize, RandomState> = removed.iter().map(|(id, _)| *id).collect();
        for strand in self.strands.values_mut() {
            if strand.prime3.map_or(false, |id| gone.contains(&id)) {
                strand.prime3 = None;
            }
            if strand.prime5.map_or(false, |id| gone.contains(&id)) {
                strand.prime5 = None;
            }
        }
        Ok((oligo, removed))
    }

    /// Put back an oligo removed by [`remove_oligo`](Self::remove_oligo). The
    /// identifiers must still be free.
    pub fn restore_oligo(
        &mut self,
        o_id: usize,
        oligo: Oligo,
        strands: Vec<(usize, Strand)>,
    ) -> Result<(), ErrOperation> {
        if self.oligos.contains_key(&o_id) {
            return Err(ErrOperation::IdAlreadyUsed(o_id));
        }
        for (s_id, _) in strands.iter() {
            if self.strands.contains_key(s_id) {
                return Err(ErrOperation::IdAlreadyUsed(*s_id));
            }
        }
        for (s_id, strand) in strands {
            self.strands.insert(s_id, strand);
        }
        self.oligos.insert(o_id, oligo);
        Ok(())
    }

    /// Walk an oligo's chain in 5' to 3' order, starting from `start`.
    ///
    /// The traversal is finite by construction: a cyclic oligo is capped at
    /// exactly one full loop, and an expected-linear chain that comes back to
    /// its start yields `Err(CircularTraversalDetected)`.
    pub fn traverse_3p(&self, start: usize) -> Result<Traverse3p<'_>, ErrOperation> {
        let strand = self
            .strands
            .get(&start)
            .ok_or(ErrOperation::StrandDoesNotExist(start))?;
        let expect_cyclic = self
            .oligos
            .get(&strand.oligo)
            .map(|o| o.cyclic)
            .unwrap_or(false);
        Ok(Traverse3p {
            network: self,
            start,
            next: Some(start),
            visited: HashSet::with_hasher(RandomState::default()),
            expect_cyclic,
            poisoned: false,
        })
    }

    /// The strand identifiers of an oligo, from its 5'-most strand to its
    /// 3'-most one (one full loop for a cyclic oligo).
    pub fn oligo_strands_5p_to_3p(&self, o_id: usize) -> Result<Vec<usize>, ErrOperation> {
        let oligo = self
            .oligos
            .get(&o_id)
            .ok_or(ErrOperation::OligoDoesNotExist(o_id))?;
        self.traverse_3p(oligo.strand5p)?.collect()
    }

    /// Every strand on the same helix as `s_id`, on the opposite direction,
    /// whose base interval overlaps it.
    ///
    /// The opposite direction may be split into several strands by its own
    /// crossovers, so the result can hold more than one strand. Identifiers
    /// are sorted by interval start.
    pub fn complement_strands(&self, s_id: usize) -> Result<Vec<usize>, ErrOperation> {
        let strand = self
            .strands
            .get(&s_id)
            .ok_or(ErrOperation::StrandDoesNotExist(s_id))?;
        let opposite = self.strand_set(strand.helix, !strand.forward);
        Ok(opposite
            .strands
            .into_iter()
            .filter(|id| strand.overlap(&self.strands[id]).is_some())
            .collect())
    }
}

/// Iterator over the strands of an oligo, in 5' to 3' order.
pub struct Traverse3p<'a> {
    network: &'a StrandNetwork,
    start: usize,
    next: Option<usize>,
    visited: HashSet<usize, RandomState>,
    expect_cyclic: bool,
    poisoned: bool,
}

impl<'a> Iterator for Traverse3p<'a> {
    type Item = Result<usize, ErrOperation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.poisoned {
            return None;
        }
        let current = self.next.take()?;
        if self.visited.contains(&current) {
            self.poisoned = true;
            if current == self.start && self.expect_cyclic {
                // one full loop of a cyclic oligo
                return None;
            }
            log::warn!("strand chain came back to strand {}", current);
            return Some(Err(ErrOperation::CircularTraversalDetected));
        }
        self.visited.insert(current);
        match self.network.strand(&current) {
            Some(strand) => {
                self.next = strand.prime3;
                Some(Ok(current))
            }
            None => {
                self.poisoned = true;
                Some(Err(ErrOperation::StrandDoesNotExist(current)))
            }
        }
    }
}
