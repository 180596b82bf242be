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

//! Assignment of base sequences to oligos.
//!
//! Applying a sequence to an oligo walks its chain 5' to 3', hands each strand
//! its share of the input string, and mirrors the Watson-Crick complement onto
//! every base-paired strand. Undoing an application is the exact same walk,
//! driven by the previously applied string, so there is no separate undo
//! algorithm to keep in sync.

use std::borrow::Cow;
use std::collections::HashSet;

use ahash::RandomState;

use super::design_operations::ErrOperation;
use super::{Strand, StrandNetwork};

/// The character stored at positions of a partially paired strand that have no
/// assigned base.
pub const SEQ_GAP: char = ' ';

/// Watson-Crick complement of a base character. Characters without a
/// complement (gaps, wildcards) pass through unchanged.
pub fn compl(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'G' => 'C',
        'C' => 'G',
        'a' => 't',
        't' => 'a',
        'g' => 'c',
        'c' => 'g',
        _ => base,
    }
}

/// Reverse complement of a sequence, 5' to 3'.
pub fn reverse_compl(sequence: &str) -> String {
    sequence.chars().rev().map(compl).collect()
}

impl StrandNetwork {
    /// Drive a sequence through an oligo.
    ///
    /// With `Some(sequence)`, each strand of the chain consumes up to its
    /// length off the front of the remaining string, and the walk stops once
    /// the string is exhausted. With `None`, every strand of the chain is
    /// cleared. In both cases the strands base-paired with a visited strand
    /// receive the complement of what the visited strand received, over the
    /// interval the two strands share.
    ///
    /// Returns the identifiers of every oligo that received at least one
    /// assignment, the driven oligo first. Callers are expected to emit a
    /// sequence notification for each of them.
    pub fn propagate_sequence(
        &mut self,
        o_id: usize,
        driving: Option<&str>,
    ) -> Result<Vec<usize>, ErrOperation> {
        let chain = self.oligo_strands_5p_to_3p(o_id)?;

        let input: Option<Vec<char>> = driving.map(|s| s.chars().collect());
        let mut cursor = 0usize;

        let mut touched = vec![o_id];
        let mut seen: HashSet<usize, RandomState> = HashSet::with_hasher(RandomState::default());
        seen.insert(o_id);

        for s_id in chain {
            if let Some(ref chars) = input {
                if cursor >= chars.len() {
                    break;
                }
            }
            let consumed: Option<Vec<char>> = match input {
                None => None,
                Some(ref chars) => {
                    let length = self.strand(&s_id).map(Strand::length).unwrap_or(0);
                    let take = length.min(chars.len() - cursor);
                    let head = chars[cursor..cursor + take].to_vec();
                    cursor += take;
                    Some(head)
                }
            };
            self.assign_and_pair(s_id, &consumed, &mut touched, &mut seen)?;
        }

        if let Some(oligo) = self.oligo_mut(&o_id) {
            oligo.sequence = driving.map(|s| Cow::Owned(s.to_string()));
        }
        Ok(touched)
    }

    /// Store `consumed` on strand `s_id` and mirror its complement onto every
    /// base-paired strand.
    fn assign_and_pair(
        &mut self,
        s_id: usize,
        consumed: &Option<Vec<char>>,
        touched: &mut Vec<usize>,
        seen: &mut HashSet<usize, RandomState>,
    ) -> Result<(), ErrOperation> {
        let complements = self.complement_strands(s_id)?;
        let source = self
            .strand(&s_id)
            .cloned()
            .ok_or(ErrOperation::StrandDoesNotExist(s_id))?;

        {
            let strand = self.strand_mut(&s_id).unwrap();
            strand.sequence = consumed
                .as_ref()
                .map(|chars| Cow::Owned(chars.iter().collect::<String>()));
        }

        for c_id in complements {
            let comp = self.strand_mut(&c_id).unwrap();
            let (low, high) = match source.overlap(comp) {
                Some(interval) => interval,
                None => continue,
            };
            let comp_length = comp.length();
            let mut chars: Vec<char> = match comp.sequence.as_ref() {
                Some(seq) => {
                    let mut v: Vec<char> = seq.chars().collect();
                    v.resize(comp_length, SEQ_GAP);
                    v
                }
                None => vec![SEQ_GAP; comp_length],
            };
            for position in low..high {
                let base = match consumed {
                    None => SEQ_GAP,
                    Some(src_chars) => src_chars
                        .get(source.index_of_position(position))
                        .map(|c| compl(*c))
                        .unwrap_or(SEQ_GAP),
                };
                chars[comp.index_of_position(position)] = base;
            }
            if chars.iter().all(|c| *c == SEQ_GAP) {
                comp.sequence = None;
            } else {
                comp.sequence = Some(Cow::Owned(chars.into_iter().collect()));
            }
            let comp_oligo = comp.oligo;
            if seen.insert(comp_oligo) {
                touched.push(comp_oligo);
            }
        }
        Ok(())
    }
}
