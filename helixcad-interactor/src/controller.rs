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

use ultraviolet::Vec2;

use helixcad_design::design_operations::{self as ops, ErrOperation, HelixProperty};
use helixcad_design::lattice::{LatticeKind, Parity};
use helixcad_design::Design;

use super::events::{Event, EventKind, EventRegistry};
use super::operation::{Command, CommandStack};
use super::pathfinder::{self, PathStep};

/// The entry point of the view layer into a design.
///
/// The controller owns the design, its edit history and the observer
/// registry. Every mutating intent is validated against the current state,
/// executed as a reversible command, and reported to the subscribed listeners
/// once the mutation has completed. Execution is single threaded and
/// synchronous: an operation runs to completion before the next one is
/// accepted, and commands are undone in the exact reverse of the order they
/// were pushed.
pub struct DesignController {
    design: Design,
    stack: CommandStack,
    events: EventRegistry,
}

impl DesignController {
    pub fn new(lattice: LatticeKind) -> Self {
        Self {
            design: Design::new(lattice),
            stack: CommandStack::default(),
            events: EventRegistry::default(),
        }
    }

    pub fn with_design(design: Design) -> Self {
        Self {
            design,
            stack: CommandStack::default(),
            events: EventRegistry::default(),
        }
    }

    /// Read access to the current design, for views and path computations.
    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Register a callback for one kind of change notification.
    pub fn subscribe<F: FnMut(&Event) + 'static>(&mut self, kind: EventKind, callback: F) {
        self.events.subscribe(kind, callback);
    }

    fn execute(&mut self, command: Command) -> Result<Vec<Event>, ErrOperation> {
        let events = command.apply(&mut self.design)?;
        self.stack.push(command);
        self.events.emit_all(&events);
        Ok(events)
    }

    /// Place a single helix at a continuous position.
    pub fn create_virtual_helix(
        &mut self,
        x: f32,
        y: f32,
        parity: Parity,
    ) -> Result<usize, ErrOperation> {
        let (coord, id) = ops::resolve_helix_placement(&self.design, Vec2::new(x, y), parity)?;
        self.execute(Command::CreateHelix { coord, id })?;
        Ok(id)
    }

    /// Atomic multi-placement. Either every position gets its helix or, if any
    /// resolved cell is occupied or duplicated, none does.
    pub fn batch_create_virtual_helices(
        &mut self,
        positions: &[Vec2],
        parities: &[Parity],
    ) -> Result<Vec<usize>, ErrOperation> {
        let (cells, ids) = ops::resolve_batch(&self.design, positions, parities)?;
        self.execute(Command::CreateHelixBatch {
            cells,
            ids: ids.clone(),
        })?;
        Ok(ids)
    }

    /// Commit a route computed by the path finder: one helix per step.
    pub fn create_helices_along_path(
        &mut self,
        path: &[PathStep],
    ) -> Result<Vec<usize>, ErrOperation> {
        let positions: Vec<Vec2> = path
            .iter()
            .map(|step| self.design.position_of_cell(step.coord))
            .collect();
        let parities: Vec<Parity> = path.iter().map(|step| step.parity).collect();
        self.batch_create_virtual_helices(&positions, &parities)
    }

    /// Remove a helix, its strands and their oligos. Returns the identifiers
    /// of the helices that were its neighbors.
    pub fn remove_virtual_helix(&mut self, id: usize) -> Result<Vec<usize>, ErrOperation> {
        let capture = ops::capture_helix_removal(&self.design, id)?;
        let neighbors = capture.helix.neighbors.clone();
        self.execute(Command::RemoveHelix { capture })?;
        Ok(neighbors)
    }

    /// Apply a sequence to an oligo, or clear it with `None`. The sequence is
    /// propagated onto every base-paired strand.
    pub fn apply_sequence(
        &mut self,
        oligo: usize,
        sequence: Option<String>,
    ) -> Result<(), ErrOperation> {
        let old_sequence = self
            .design
            .strands
            .oligo(&oligo)
            .ok_or(ErrOperation::OligoDoesNotExist(oligo))?
            .sequence
            .as_ref()
            .map(|s| s.to_string());
        self.execute(Command::ApplySequence {
            oligo,
            new_sequence: sequence,
            old_sequence,
        })?;
        Ok(())
    }

    /// Change one property of a helix.
    pub fn set_helix_property(
        &mut self,
        id: usize,
        property: HelixProperty,
    ) -> Result<(), ErrOperation> {
        let old = ops::peek_helix_property(&self.design, id, &property)?;
        self.execute(Command::SetHelixProperty {
            id,
            new: property,
            old,
        })?;
        Ok(())
    }

    // Routing builders. These shape the strand network that the undoable
    // operations above act upon; the routing gestures themselves are driven
    // by the view layer.
    //============================================================================================
    pub fn create_strand(
        &mut self,
        helix: usize,
        forward: bool,
        start: isize,
        end: isize,
    ) -> Result<usize, ErrOperation> {
        ops::create_strand(&mut self.design, helix, forward, start, end)
    }

    pub fn connect_strands_3p(
        &mut self,
        upstream: usize,
        downstream: usize,
    ) -> Result<(), ErrOperation> {
        ops::connect_strands_3p(&mut self.design, upstream, downstream)
    }
    //============================================================================================

    /// Revert the most recent command. `Ok(false)` when the history is empty.
    pub fn undo(&mut self) -> Result<bool, ErrOperation> {
        match self.stack.undo(&mut self.design)? {
            Some(events) => {
                self.events.emit_all(&events);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Replay the most recently undone command. `Ok(false)` when there is
    /// nothing to redo.
    pub fn redo(&mut self) -> Result<bool, ErrOperation> {
        match self.stack.redo(&mut self.design)? {
            Some(events) => {
                self.events.emit_all(&events);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.stack.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.stack.can_redo()
    }

    /// Rasterize a straight route between two continuous positions. Read
    /// only; see [`pathfinder::shortest_path_direct`].
    pub fn shortest_path_direct(&self, start: Vec2, end: Vec2) -> Vec<PathStep> {
        pathfinder::shortest_path_direct_in(&self.design, start, end)
    }

    /// Search an obstacle-avoiding route between two continuous positions.
    /// Read only; see [`pathfinder::shortest_path_astar`].
    pub fn shortest_path_astar(&self, start: Vec2, end: Vec2) -> Vec<PathStep> {
        pathfinder::shortest_path_astar_in(&self.design, start, end)
    }
}
