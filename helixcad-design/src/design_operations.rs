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

//! This module defines the operations that can be performed on a design to
//! modify it. The functions that apply these operations take a mutable
//! reference to the design that they are modifying and return an
//! `ErrOperation` if the operation could not be applied.
//!
//! Feasibility is validated before any state change: an operation that returns
//! an error leaves the design exactly as it was.

use ultraviolet::Vec2;

use super::lattice::{LatticeCoord, LatticeDivision, Parity};
use super::{Design, Helix, Oligo, Strand};

/// An error that occured when trying to apply an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrOperation {
    /// The targeted lattice cell already holds a helix. Recoverable: the
    /// caller may retry elsewhere.
    CellAlreadyOccupied {
        coord: LatticeCoord,
        occupant: usize,
    },
    /// One or more cells of a batch placement are occupied or duplicated. The
    /// whole batch was aborted and the design is unchanged.
    BatchConflict { conflicting: Vec<LatticeCoord> },
    /// The two input lists of a batch placement have different lengths.
    MismatchedBatchInput { positions: usize, parities: usize },
    HelixDoesNotExist(usize),
    StrandDoesNotExist(usize),
    OligoDoesNotExist(usize),
    /// The new strand would overlap an existing strand of the same strand set.
    StrandOverlap { strand: usize },
    /// A base interval does not fit on its helix.
    OutOfBounds { helix: usize, start: isize, end: isize },
    /// The strand end targeted by a crossover already has one.
    AlreadyConnected { strand: usize },
    /// An expected-linear strand chain came back to its starting strand.
    CircularTraversalDetected,
    /// An identifier that should have been free is in use.
    IdAlreadyUsed(usize),
}

impl std::fmt::Display for ErrOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrOperation::CellAlreadyOccupied { coord, occupant } => write!(
                f,
                "cell ({}, {}) is already occupied by helix {}",
                coord.row, coord.column, occupant
            ),
            ErrOperation::BatchConflict { conflicting } => {
                write!(f, "batch placement conflicts on {} cell(s)", conflicting.len())
            }
            ErrOperation::MismatchedBatchInput { positions, parities } => write!(
                f,
                "batch placement got {} positions but {} parities",
                positions, parities
            ),
            ErrOperation::HelixDoesNotExist(id) => write!(f, "helix {} does not exist", id),
            ErrOperation::StrandDoesNotExist(id) => write!(f, "strand {} does not exist", id),
            ErrOperation::OligoDoesNotExist(id) => write!(f, "oligo {} does not exist", id),
            ErrOperation::StrandOverlap { strand } => {
                write!(f, "interval overlaps strand {}", strand)
            }
            ErrOperation::OutOfBounds { helix, start, end } => {
                write!(f, "interval {}..{} does not fit on helix {}", start, end, helix)
            }
            ErrOperation::AlreadyConnected { strand } => {
                write!(f, "strand {} already has a crossover at this end", strand)
            }
            ErrOperation::CircularTraversalDetected => {
                write!(f, "non-cyclic strand chain came back to its start")
            }
            ErrOperation::IdAlreadyUsed(id) => write!(f, "identifier {} is already in use", id),
        }
    }
}

impl std::error::Error for ErrOperation {}

/// A typed view on one editable property of a helix.
///
/// Setting a property reports the previous value of the same kind, which is
/// all a reversible edit needs to capture.
#[derive(Debug, Clone, PartialEq)]
pub enum HelixProperty {
    Z(f32),
    Visible(bool),
    Name(Option<String>),
    Color(u32),
    Length(usize),
    EulerZ(f32),
    MinorGrooveAngle(f32),
}

/// Resolve a single placement without touching the design: the cell closest
/// to `position` and the identifier the new helix would get.
///
/// The `parity` argument comes from the caller's hovered coordinate; the
/// parity computed from the resolved cell is authoritative and decides the
/// identifier track.
pub fn resolve_helix_placement(
    design: &Design,
    position: Vec2,
    parity: Parity,
) -> Result<(LatticeCoord, usize), ErrOperation> {
    let coord = design.cell_at_position(position);
    if let Some(occupant) = design.helices.occupant(coord) {
        return Err(ErrOperation::CellAlreadyOccupied { coord, occupant });
    }
    let id = allocate_id(design, coord, parity);
    Ok((coord, id))
}

/// Create a helix on the lattice cell closest to `position`.
pub fn create_helix(
    design: &mut Design,
    position: Vec2,
    parity: Parity,
) -> Result<usize, ErrOperation> {
    let (coord, id) = resolve_helix_placement(design, position, parity)?;
    create_helix_at(design, coord, id)
}

/// Create a helix with a known identifier on a known cell. Used to replay a
/// placement deterministically.
pub fn create_helix_at(
    design: &mut Design,
    coord: LatticeCoord,
    id: usize,
) -> Result<usize, ErrOperation> {
    if let Some(occupant) = design.helices.occupant(coord) {
        return Err(ErrOperation::CellAlreadyOccupied { coord, occupant });
    }
    if design.helices.contains_key(&id) {
        return Err(ErrOperation::IdAlreadyUsed(id));
    }
    let mut helix = Helix::new_on_lattice(design.lattice, &design.parameters, coord, design.scale);
    let neighbors: Vec<usize> = design
        .lattice
        .neighbors(coord)
        .into_iter()
        .filter_map(|cell| design.helices.occupant(cell))
        .collect();
    helix.neighbors = neighbors.clone();
    for n_id in neighbors {
        if let Some(neighbor) = design.helices.get_mut(&n_id) {
            neighbor.neighbors.push(id);
            neighbor.neighbors.sort_unstable();
        }
    }
    design.helices.insert(id, helix);
    Ok(id)
}

fn allocate_id(design: &Design, coord: LatticeCoord, requested_parity: Parity) -> usize {
    let parity = design.parity_of_cell(coord);
    if parity != requested_parity {
        log::warn!(
            "requested parity {:?} disagrees with cell ({}, {}), using the cell's",
            requested_parity,
            coord.row,
            coord.column
        );
    }
    design.helices.lowest_unused_id(parity)
}

/// Resolve the cells and identifiers of a batch placement without touching the
/// design. Successive cells of the same parity get successive identifiers of
/// their track.
pub fn resolve_batch(
    design: &Design,
    positions: &[Vec2],
    parities: &[Parity],
) -> Result<(Vec<LatticeCoord>, Vec<usize>), ErrOperation> {
    if positions.len() != parities.len() {
        return Err(ErrOperation::MismatchedBatchInput {
            positions: positions.len(),
            parities: parities.len(),
        });
    }
    let cells: Vec<LatticeCoord> = positions
        .iter()
        .map(|p| design.cell_at_position(*p))
        .collect();
    let mut ids = Vec::with_capacity(cells.len());
    for (cell, requested) in cells.iter().zip(parities.iter()) {
        let mut candidate = allocate_id(design, *cell, *requested);
        while ids.contains(&candidate) {
            candidate += 2;
        }
        ids.push(candidate);
    }
    Ok((cells, ids))
}

/// Atomically create one helix per cell. If any cell is occupied or appears
/// twice, no helix at all is created.
pub fn batch_create_helices_at(
    design: &mut Design,
    cells: &[LatticeCoord],
    ids: &[usize],
) -> Result<Vec<usize>, ErrOperation> {
    let mut conflicting = Vec::new();
    for (rank, cell) in cells.iter().enumerate() {
        if design.helices.occupant(*cell).is_some() || cells[..rank].contains(cell) {
            conflicting.push(*cell);
        }
    }
    if !conflicting.is_empty() {
        return Err(ErrOperation::BatchConflict { conflicting });
    }
    for (rank, id) in ids.iter().enumerate() {
        if design.helices.contains_key(id) || ids[..rank].contains(id) {
            return Err(ErrOperation::IdAlreadyUsed(*id));
        }
    }
    let mut created = Vec::with_capacity(cells.len());
    for (cell, id) in cells.iter().zip(ids.iter()) {
        create_helix_at(design, *cell, *id)?;
        created.push(*id);
    }
    Ok(created)
}

/// Atomic multi-placement at continuous positions, as produced by a
/// shortest-path gesture.
pub fn batch_create_helices(
    design: &mut Design,
    positions: &[Vec2],
    parities: &[Parity],
) -> Result<Vec<usize>, ErrOperation> {
    let (cells, ids) = resolve_batch(design, positions, parities)?;
    batch_create_helices_at(design, &cells, &ids)
}

/// Everything that a helix removal destroys, captured so that the removal can
/// be reverted exactly.
#[derive(Debug, Clone)]
pub struct HelixRemovalCapture {
    pub id: usize,
    pub helix: Helix,
    pub oligos: Vec<(usize, Oligo, Vec<(usize, Strand)>)>,
}

/// Record the state a removal of helix `id` would destroy.
pub fn capture_helix_removal(
    design: &Design,
    id: usize,
) -> Result<HelixRemovalCapture, ErrOperation> {
    let helix = design
        .helices
        .get(&id)
        .cloned()
        .ok_or(ErrOperation::HelixDoesNotExist(id))?;
    let mut oligos = Vec::new();
    for o_id in design.strands.oligos_on_helix(id) {
        let oligo = design
            .strands
            .oligo(&o_id)
            .cloned()
            .ok_or(ErrOperation::OligoDoesNotExist(o_id))?;
        let strands: Vec<(usize, Strand)> = design
            .strands
            .strands()
            .filter(|(_, s)| s.oligo == o_id)
            .map(|(s_id, s)| (*s_id, s.clone()))
            .collect();
        oligos.push((o_id, oligo, strands));
    }
    Ok(HelixRemovalCapture { id, helix, oligos })
}

/// Remove a helix, every oligo that has a strand on it, and its occupancy
/// entry. Returns the identifiers of the former neighbors.
pub fn remove_helix(design: &mut Design, id: usize) -> Result<Vec<usize>, ErrOperation> {
    if !design.helices.contains_key(&id) {
        return Err(ErrOperation::HelixDoesNotExist(id));
    }
    for o_id in design.strands.oligos_on_helix(id) {
        design.strands.remove_oligo(o_id)?;
    }
    let helix = design.helices.remove(&id).unwrap();
    for n_id in helix.neighbors.iter() {
        if let Some(neighbor) = design.helices.get_mut(n_id) {
            neighbor.neighbors.retain(|other| *other != id);
        }
    }
    Ok(helix.neighbors)
}

/// Put back a helix removed by [`remove_helix`], together with the oligos that
/// were destroyed with it.
pub fn restore_helix(
    design: &mut Design,
    capture: HelixRemovalCapture,
) -> Result<Vec<usize>, ErrOperation> {
    let HelixRemovalCapture { id, helix, oligos } = capture;
    if design.helices.contains_key(&id) {
        return Err(ErrOperation::IdAlreadyUsed(id));
    }
    if let Some(occupant) = design.helices.occupant(helix.lattice_coord) {
        return Err(ErrOperation::CellAlreadyOccupied {
            coord: helix.lattice_coord,
            occupant,
        });
    }
    let neighbors = helix.neighbors.clone();
    for n_id in neighbors.iter() {
        if let Some(neighbor) = design.helices.get_mut(n_id) {
            neighbor.neighbors.push(id);
            neighbor.neighbors.sort_unstable();
        }
    }
    design.helices.insert(id, helix);
    for (o_id, oligo, strands) in oligos {
        design.strands.restore_oligo(o_id, oligo, strands)?;
    }
    Ok(neighbors)
}

/// Current value of the property of the same kind as `like`.
pub fn peek_helix_property(
    design: &Design,
    id: usize,
    like: &HelixProperty,
) -> Result<HelixProperty, ErrOperation> {
    let helix = design
        .helices
        .get(&id)
        .ok_or(ErrOperation::HelixDoesNotExist(id))?;
    let value = match like {
        HelixProperty::Z(_) => HelixProperty::Z(helix.z),
        HelixProperty::Visible(_) => HelixProperty::Visible(helix.visible),
        HelixProperty::Name(_) => {
            HelixProperty::Name(helix.name.as_ref().map(|name| name.to_string()))
        }
        HelixProperty::Color(_) => HelixProperty::Color(helix.color),
        HelixProperty::Length(_) => HelixProperty::Length(helix.length),
        HelixProperty::EulerZ(_) => HelixProperty::EulerZ(helix.euler_z),
        HelixProperty::MinorGrooveAngle(_) => {
            HelixProperty::MinorGrooveAngle(helix.minor_groove_angle)
        }
    };
    Ok(value)
}

/// Set one property of a helix. Returns the previous value of the same kind.
pub fn set_helix_property(
    design: &mut Design,
    id: usize,
    property: HelixProperty,
) -> Result<HelixProperty, ErrOperation> {
    let old = peek_helix_property(design, id, &property)?;
    if let HelixProperty::Length(new_length) = property {
        let shortest_fit = design
            .strands
            .strands()
            .filter(|(_, s)| s.helix == id)
            .map(|(_, s)| s.end)
            .max()
            .unwrap_or(0);
        if (new_length as isize) < shortest_fit {
            return Err(ErrOperation::OutOfBounds {
                helix: id,
                start: 0,
                end: shortest_fit,
            });
        }
    }
    let helix = design.helices.get_mut(&id).unwrap();
    match property {
        HelixProperty::Z(z) => helix.z = z,
        HelixProperty::Visible(visible) => helix.visible = visible,
        HelixProperty::Name(name) => helix.name = name.map(std::borrow::Cow::Owned),
        HelixProperty::Color(color) => helix.color = color,
        HelixProperty::Length(length) => helix.length = length,
        HelixProperty::EulerZ(euler_z) => helix.euler_z = euler_z,
        HelixProperty::MinorGrooveAngle(angle) => helix.minor_groove_angle = angle,
    }
    Ok(old)
}

/// Create a strand on one direction of a helix. See
/// [`StrandNetwork::create_strand`](super::StrandNetwork::create_strand).
pub fn create_strand(
    design: &mut Design,
    helix: usize,
    forward: bool,
    start: isize,
    end: isize,
) -> Result<usize, ErrOperation> {
    let helix_length = design
        .helices
        .get(&helix)
        .map(|h| h.length)
        .ok_or(ErrOperation::HelixDoesNotExist(helix))?;
    design
        .strands
        .create_strand(helix, forward, start, end, helix_length)
}

/// Install a crossover between two strand ends. See
/// [`StrandNetwork::connect_3p`](super::StrandNetwork::connect_3p).
pub fn connect_strands_3p(
    design: &mut Design,
    upstream: usize,
    downstream: usize,
) -> Result<(), ErrOperation> {
    design.strands.connect_3p(upstream, downstream)
}

/// Drive a sequence (or a clearing) through an oligo and its base-paired
/// strands. Returns the oligos that received an assignment.
pub fn apply_sequence(
    design: &mut Design,
    o_id: usize,
    sequence: Option<&str>,
) -> Result<Vec<usize>, ErrOperation> {
    design.strands.propagate_sequence(o_id, sequence)
}
