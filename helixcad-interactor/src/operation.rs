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

//! Reversible edits of a design.
//!
//! Every undoable mutation is one variant of [`Command`]. A command carries,
//! from construction time, everything needed to replay it deterministically
//! and to revert it exactly: the resolved cell and identifier of a placement,
//! the removed helix and oligos of a removal, the previous value of a
//! property edit, the previously applied sequence of a sequence edit.
//!
//! [`CommandStack`] keeps the edit history: strict LIFO for undo, strict
//! replay-forward for redo, and pushing a new command after an undo discards
//! the redo tail.

use helixcad_design::design_operations::{
    self as ops, ErrOperation, HelixProperty, HelixRemovalCapture,
};
use helixcad_design::lattice::LatticeCoord;
use helixcad_design::Design;

use super::events::Event;

/// One reversible edit. `apply` performs it, `invert` restores the state it
/// replaced; both report the notifications to send to the view layer.
#[derive(Debug, Clone)]
pub enum Command {
    CreateHelix {
        coord: LatticeCoord,
        id: usize,
    },
    CreateHelixBatch {
        cells: Vec<LatticeCoord>,
        ids: Vec<usize>,
    },
    RemoveHelix {
        capture: HelixRemovalCapture,
    },
    SetHelixProperty {
        id: usize,
        new: HelixProperty,
        old: HelixProperty,
    },
    ApplySequence {
        oligo: usize,
        new_sequence: Option<String>,
        old_sequence: Option<String>,
    },
}

impl Command {
    pub fn apply(&self, design: &mut Design) -> Result<Vec<Event>, ErrOperation> {
        match self {
            Command::CreateHelix { coord, id } => {
                ops::create_helix_at(design, *coord, *id)?;
                let neighbors = design.helices.get(id).unwrap().neighbors.clone();
                Ok(vec![Event::HelixAdded { id: *id, neighbors }])
            }
            Command::CreateHelixBatch { cells, ids } => {
                ops::batch_create_helices_at(design, cells, ids)?;
                Ok(ids
                    .iter()
                    .map(|id| Event::HelixAdded {
                        id: *id,
                        neighbors: design.helices.get(id).unwrap().neighbors.clone(),
                    })
                    .collect())
            }
            Command::RemoveHelix { capture } => {
                let neighbors = ops::remove_helix(design, capture.id)?;
                Ok(vec![Event::HelixRemoved {
                    id: capture.id,
                    neighbors,
                }])
            }
            Command::SetHelixProperty { id, new, .. } => {
                ops::set_helix_property(design, *id, new.clone())?;
                Ok(vec![Event::HelixPropertyChanged {
                    id: *id,
                    property: new.clone(),
                }])
            }
            Command::ApplySequence {
                oligo,
                new_sequence,
                ..
            } => {
                let touched = ops::apply_sequence(design, *oligo, new_sequence.as_deref())?;
                Ok(touched
                    .into_iter()
                    .map(|oligo| Event::OligoSequenceChanged { oligo })
                    .collect())
            }
        }
    }

    pub fn invert(&self, design: &mut Design) -> Result<Vec<Event>, ErrOperation> {
        match self {
            Command::CreateHelix { id, .. } => {
                let neighbors = ops::remove_helix(design, *id)?;
                Ok(vec![Event::HelixRemoved { id: *id, neighbors }])
            }
            Command::CreateHelixBatch { ids, .. } => {
                let mut events = Vec::with_capacity(ids.len());
                for id in ids.iter().rev() {
                    let neighbors = ops::remove_helix(design, *id)?;
                    events.push(Event::HelixRemoved { id: *id, neighbors });
                }
                Ok(events)
            }
            Command::RemoveHelix { capture } => {
                let neighbors = ops::restore_helix(design, capture.clone())?;
                Ok(vec![Event::HelixAdded {
                    id: capture.id,
                    neighbors,
                }])
            }
            Command::SetHelixProperty { id, old, .. } => {
                ops::set_helix_property(design, *id, old.clone())?;
                Ok(vec![Event::HelixPropertyChanged {
                    id: *id,
                    property: old.clone(),
                }])
            }
            Command::ApplySequence {
                oligo,
                old_sequence,
                ..
            } => {
                let touched = ops::apply_sequence(design, *oligo, old_sequence.as_deref())?;
                Ok(touched
                    .into_iter()
                    .map(|oligo| Event::OligoSequenceChanged { oligo })
                    .collect())
            }
        }
    }
}

/// The edit history of a design.
#[derive(Default)]
pub struct CommandStack {
    done: Vec<Command>,
    undone: Vec<Command>,
}

impl CommandStack {
    /// Record a freshly applied command. Any redo tail is discarded.
    pub fn push(&mut self, command: Command) {
        self.undone.clear();
        self.done.push(command);
    }

    /// Revert the most recent command. `Ok(None)` when there is nothing to
    /// undo. On error the command stays on the stack and the design is
    /// untouched.
    pub fn undo(&mut self, design: &mut Design) -> Result<Option<Vec<Event>>, ErrOperation> {
        let command = match self.done.pop() {
            Some(command) => command,
            None => return Ok(None),
        };
        match command.invert(design) {
            Ok(events) => {
                self.undone.push(command);
                Ok(Some(events))
            }
            Err(err) => {
                self.done.push(command);
                Err(err)
            }
        }
    }

    /// Replay the most recently undone command. `Ok(None)` when there is
    /// nothing to redo.
    pub fn redo(&mut self, design: &mut Design) -> Result<Option<Vec<Event>>, ErrOperation> {
        let command = match self.undone.pop() {
            Some(command) => command,
            None => return Ok(None),
        };
        match command.apply(design) {
            Ok(events) => {
                self.done.push(command);
                Ok(Some(events))
            }
            Err(err) => {
                self.undone.push(command);
                Err(err)
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }
}
