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

use super::design_operations::*;
use super::lattice::*;
use super::*;
use ultraviolet::Vec2;

fn honeycomb_design() -> Design {
    Design::new(LatticeKind::Honeycomb)
}

/// Place a helix on a cell given by its lattice coordinates, through the
/// continuous-position entry point.
fn create_at(design: &mut Design, row: isize, column: isize) -> Result<usize, ErrOperation> {
    let coord = LatticeCoord::new(row, column);
    let position = design.position_of_cell(coord);
    let parity = design.parity_of_cell(coord);
    create_helix(design, position, parity)
}

#[test]
fn helix_creation_occupies_its_cell() {
    let mut design = honeycomb_design();
    let id = create_at(&mut design, 0, 0).unwrap();
    assert_eq!(id, 0);
    assert_eq!(design.helices.occupant(LatticeCoord::new(0, 0)), Some(0));
    let err = create_at(&mut design, 0, 0);
    assert_eq!(
        err,
        Err(ErrOperation::CellAlreadyOccupied {
            coord: LatticeCoord::new(0, 0),
            occupant: 0
        })
    );
    assert_eq!(design.helices.len(), 1);
}

#[test]
fn helix_ids_are_allocated_on_two_parity_tracks() {
    let mut design = honeycomb_design();
    // (0, 0) and (0, 2) are even cells, (0, 1) and (0, 3) odd ones
    let a = create_at(&mut design, 0, 0).unwrap();
    let b = create_at(&mut design, 0, 1).unwrap();
    let c = create_at(&mut design, 0, 2).unwrap();
    let d = create_at(&mut design, 0, 3).unwrap();
    assert_eq!((a, b, c, d), (0, 1, 2, 3));
    remove_helix(&mut design, 2).unwrap();
    let e = create_at(&mut design, 2, 0).unwrap();
    assert_eq!(e, 2);
}

#[test]
fn neighbors_are_linked_both_ways() {
    let mut design = honeycomb_design();
    let a = create_at(&mut design, 0, 0).unwrap();
    let b = create_at(&mut design, 0, 1).unwrap();
    assert_eq!(design.helices.get(&b).unwrap().neighbors, vec![a]);
    assert_eq!(design.helices.get(&a).unwrap().neighbors, vec![b]);
    let affected = remove_helix(&mut design, b).unwrap();
    assert_eq!(affected, vec![a]);
    assert!(design.helices.get(&a).unwrap().neighbors.is_empty());
}

#[test]
fn batch_creation_is_all_or_nothing() {
    let mut design = honeycomb_design();
    create_at(&mut design, 1, 2).unwrap();
    let cells: Vec<LatticeCoord> = (0..5).map(|c| LatticeCoord::new(1, c)).collect();
    let positions: Vec<Vec2> = cells.iter().map(|c| design.position_of_cell(*c)).collect();
    let parities: Vec<Parity> = cells.iter().map(|c| design.parity_of_cell(*c)).collect();
    // the 3rd of the 5 cells is occupied
    let err = batch_create_helices(&mut design, &positions, &parities);
    assert_eq!(
        err,
        Err(ErrOperation::BatchConflict {
            conflicting: vec![LatticeCoord::new(1, 2)]
        })
    );
    assert_eq!(design.helices.len(), 1);
    for cell in cells.iter().filter(|c| c.column != 2) {
        assert_eq!(design.helices.occupant(*cell), None);
    }
}

#[test]
fn batch_creation_numbers_consecutive_cells_on_alternating_tracks() {
    let mut design = honeycomb_design();
    let cells: Vec<LatticeCoord> = (0..4).map(|c| LatticeCoord::new(0, c)).collect();
    let positions: Vec<Vec2> = cells.iter().map(|c| design.position_of_cell(*c)).collect();
    let parities: Vec<Parity> = cells.iter().map(|c| design.parity_of_cell(*c)).collect();
    let ids = batch_create_helices(&mut design, &positions, &parities).unwrap();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    for (cell, id) in cells.iter().zip(ids.iter()) {
        assert_eq!(design.helices.occupant(*cell), Some(*id));
    }
}

#[test]
fn strand_intervals_may_not_overlap_within_a_set() {
    let mut design = honeycomb_design();
    let helix = create_at(&mut design, 0, 0).unwrap();
    let first = create_strand(&mut design, helix, true, 0, 10).unwrap();
    let err = create_strand(&mut design, helix, true, 9, 12);
    assert_eq!(err, Err(ErrOperation::StrandOverlap { strand: first }));
    // same interval on the other direction is fine
    create_strand(&mut design, helix, false, 9, 12).unwrap();
    // and so is a disjoint interval on the same direction
    create_strand(&mut design, helix, true, 10, 12).unwrap();
}

#[test]
fn strand_intervals_must_fit_on_the_helix() {
    let mut design = honeycomb_design();
    let helix = create_at(&mut design, 0, 0).unwrap();
    let length = design.helices.get(&helix).unwrap().length as isize;
    assert!(create_strand(&mut design, helix, true, -1, 3).is_err());
    assert!(create_strand(&mut design, helix, true, 0, length + 1).is_err());
    assert!(create_strand(&mut design, helix, true, 5, 5).is_err());
}

#[test]
fn crossovers_merge_oligos() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    assert_eq!(design.strands.nb_oligos(), 2);
    connect_strands_3p(&mut design, s1, s2).unwrap();
    assert_eq!(design.strands.nb_oligos(), 1);
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    assert_eq!(design.strands.strand(&s2).unwrap().oligo, o_id);
    assert_eq!(design.strands.oligo(&o_id).unwrap().strand5p, s1);
    assert_eq!(
        design.strands.oligo_strands_5p_to_3p(o_id).unwrap(),
        vec![s1, s2]
    );
    // the 3' end of s1 is taken now
    assert_eq!(
        connect_strands_3p(&mut design, s1, s2),
        Err(ErrOperation::AlreadyConnected { strand: s1 })
    );
}

#[test]
fn closing_a_chain_makes_the_oligo_cyclic() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 5).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    connect_strands_3p(&mut design, s2, s1).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    assert!(design.strands.oligo(&o_id).unwrap().cyclic);
    // traversal is capped at exactly one full loop
    assert_eq!(
        design.strands.oligo_strands_5p_to_3p(o_id).unwrap(),
        vec![s1, s2]
    );
}

#[test]
fn unexpected_cycle_is_reported() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 5).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    connect_strands_3p(&mut design, s2, s1).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    // forge an inconsistent record: the chain is closed but not marked cyclic
    design.strands.oligo_mut(&o_id).unwrap().cyclic = false;
    assert_eq!(
        design.strands.oligo_strands_5p_to_3p(o_id),
        Err(ErrOperation::CircularTraversalDetected)
    );
}

#[test]
fn complement_strands_share_base_indices() {
    let mut design = honeycomb_design();
    let helix = create_at(&mut design, 0, 0).unwrap();
    let source = create_strand(&mut design, helix, true, 5, 20).unwrap();
    // the opposite direction is split in three, two of which overlap the source
    let left = create_strand(&mut design, helix, false, 0, 10).unwrap();
    let right = create_strand(&mut design, helix, false, 12, 18).unwrap();
    let far = create_strand(&mut design, helix, false, 25, 30).unwrap();
    assert_eq!(
        design.strands.complement_strands(source).unwrap(),
        vec![left, right]
    );
    // the reverse strand set is ordered by interval start
    assert_eq!(
        design.strands.strand_set(helix, false).strands,
        vec![left, right, far]
    );
    assert_eq!(design.strands.strand_at(helix, true, 7), Some(source));
    assert_eq!(design.strands.strand_at(helix, true, 3), None);
    let source_strand = design.strands.strand(&source).unwrap();
    let left_strand = design.strands.strand(&left).unwrap();
    assert_eq!(source_strand.overlap(left_strand), Some((5, 10)));
    assert_eq!(left_strand.overlap(source_strand), Some((5, 10)));
    assert_eq!(source_strand.prime5_position(), 5);
    assert_eq!(source_strand.prime3_position(), 19);
    assert_eq!(left_strand.prime5_position(), 9);
    assert_eq!(left_strand.prime3_position(), 0);
}

#[test]
fn sequence_splits_across_the_chain_and_complements() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    let comp = create_strand(&mut design, h0, false, 0, 5).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;

    let touched = apply_sequence(&mut design, o_id, Some("ACGTACG")).unwrap();

    assert_eq!(
        design.strands.strand(&s1).unwrap().sequence.as_deref(),
        Some("ACGTA")
    );
    assert_eq!(
        design.strands.strand(&s2).unwrap().sequence.as_deref(),
        Some("CG")
    );
    assert_eq!(
        design.strands.strand(&comp).unwrap().sequence.as_deref(),
        Some("TACGT")
    );
    let comp_oligo = design.strands.strand(&comp).unwrap().oligo;
    assert_eq!(touched, vec![o_id, comp_oligo]);
    assert_eq!(
        design.strands.oligo(&o_id).unwrap().sequence.as_deref(),
        Some("ACGTACG")
    );
}

#[test]
fn short_sequences_stop_at_the_exhausted_strand() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    apply_sequence(&mut design, o_id, Some("ACG")).unwrap();
    assert_eq!(
        design.strands.strand(&s1).unwrap().sequence.as_deref(),
        Some("ACG")
    );
    assert_eq!(design.strands.strand(&s2).unwrap().sequence, None);
}

#[test]
fn clearing_walks_the_whole_chain() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    apply_sequence(&mut design, o_id, Some("ACGTACGT")).unwrap();
    apply_sequence(&mut design, o_id, None).unwrap();
    assert_eq!(design.strands.strand(&s1).unwrap().sequence, None);
    assert_eq!(design.strands.strand(&s2).unwrap().sequence, None);
    assert_eq!(design.strands.oligo(&o_id).unwrap().sequence, None);
}

#[test]
fn reapplying_the_captured_sequence_is_an_exact_undo() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    let comp = create_strand(&mut design, h0, false, 0, 5).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;

    let read = |design: &Design, ids: &[usize]| -> Vec<Option<String>> {
        ids.iter()
            .map(|id| {
                design
                    .strands
                    .strand(id)
                    .unwrap()
                    .sequence
                    .as_ref()
                    .map(|s| s.to_string())
            })
            .collect()
    };

    for old in [None, Some("TTTTTGGG")].iter() {
        apply_sequence(&mut design, o_id, *old).unwrap();
        let before = read(&design, &[s1, s2, comp]);

        apply_sequence(&mut design, o_id, Some("ACGTACG")).unwrap();
        apply_sequence(&mut design, o_id, *old).unwrap();

        let after = read(&design, &[s1, s2, comp]);
        assert_eq!(before, after, "old sequence {:?}", old);
        assert_eq!(
            design.strands.oligo(&o_id).unwrap().sequence.as_deref(),
            *old
        );
    }
}

#[test]
fn complement_accumulates_from_several_sources() {
    let mut design = honeycomb_design();
    let helix = create_at(&mut design, 0, 0).unwrap();
    // two forward strands chained by a crossover, facing one long reverse strand
    let s1 = create_strand(&mut design, helix, true, 0, 4).unwrap();
    let s2 = create_strand(&mut design, helix, true, 4, 8).unwrap();
    let comp = create_strand(&mut design, helix, false, 0, 8).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    apply_sequence(&mut design, o_id, Some("AACCGGTT")).unwrap();
    // the complement reads 5' to 3' from position 7 down to 0
    assert_eq!(
        design.strands.strand(&comp).unwrap().sequence.as_deref(),
        Some(reverse_compl("AACCGGTT").as_str())
    );
}

#[test]
fn removing_a_helix_removes_the_oligos_crossing_it() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    let lone = create_strand(&mut design, h1, true, 10, 15).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    assert!(design.strands.uses_helix(h0));

    remove_helix(&mut design, h0).unwrap();
    assert!(!design.strands.uses_helix(h0));

    assert!(design.strands.strand(&s1).is_none());
    // the whole oligo goes, including the part on the surviving helix
    assert!(design.strands.strand(&s2).is_none());
    assert!(design.strands.strand(&lone).is_some());
    assert_eq!(design.strands.nb_oligos(), 1);
    assert_eq!(
        remove_helix(&mut design, h0),
        Err(ErrOperation::HelixDoesNotExist(h0))
    );
}

#[test]
fn helix_removal_can_be_reverted_from_its_capture() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;

    let capture = capture_helix_removal(&design, h0).unwrap();
    remove_helix(&mut design, h0).unwrap();
    restore_helix(&mut design, capture).unwrap();

    assert_eq!(design.helices.occupant(LatticeCoord::new(0, 0)), Some(h0));
    assert_eq!(design.helices.get(&h1).unwrap().neighbors, vec![h0]);
    assert_eq!(
        design.strands.oligo_strands_5p_to_3p(o_id).unwrap(),
        vec![s1, s2]
    );
}

#[test]
fn shrinking_a_helix_under_its_strands_is_rejected() {
    let mut design = honeycomb_design();
    let helix = create_at(&mut design, 0, 0).unwrap();
    create_strand(&mut design, helix, true, 0, 30).unwrap();
    assert!(set_helix_property(&mut design, helix, HelixProperty::Length(20)).is_err());
    let old = set_helix_property(&mut design, helix, HelixProperty::Length(64)).unwrap();
    assert_eq!(old, HelixProperty::Length(42));
}

#[test]
fn design_round_trips_through_json() {
    let mut design = honeycomb_design();
    let h0 = create_at(&mut design, 0, 0).unwrap();
    let h1 = create_at(&mut design, 0, 1).unwrap();
    let s1 = create_strand(&mut design, h0, true, 0, 5).unwrap();
    let s2 = create_strand(&mut design, h1, false, 0, 3).unwrap();
    connect_strands_3p(&mut design, s1, s2).unwrap();
    let o_id = design.strands.strand(&s1).unwrap().oligo;
    apply_sequence(&mut design, o_id, Some("ACGTACG")).unwrap();

    let json = serde_json::to_string(&design).expect("serialization failed");
    let mut back: Design = serde_json::from_str(&json).expect("deserialization failed");
    back.reindex();

    assert_eq!(back.helices.len(), design.helices.len());
    assert_eq!(back.helices.occupant(LatticeCoord::new(0, 0)), Some(h0));
    assert_eq!(back.helices.occupant(LatticeCoord::new(0, 1)), Some(h1));
    assert_eq!(
        back.strands.strand(&s1).unwrap().sequence.as_deref(),
        Some("ACGTA")
    );
    assert_eq!(
        back.strands.oligo_strands_5p_to_3p(o_id).unwrap(),
        vec![s1, s2]
    );
}
