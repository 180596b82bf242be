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

//! Change notifications sent to the view layer.
//!
//! Views register callbacks for the event kinds they care about. Emission is
//! synchronous: callbacks run on the caller's thread, after the corresponding
//! state mutation has fully completed, in emission order.

use helixcad_design::design_operations::HelixProperty;

/// A change that happened to the design.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    HelixAdded { id: usize, neighbors: Vec<usize> },
    HelixRemoved { id: usize, neighbors: Vec<usize> },
    HelixPropertyChanged { id: usize, property: HelixProperty },
    OligoSequenceChanged { oligo: usize },
}

/// The subscription key of an [`Event`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    HelixAdded,
    HelixRemoved,
    HelixPropertyChanged,
    OligoSequenceChanged,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::HelixAdded { .. } => EventKind::HelixAdded,
            Event::HelixRemoved { .. } => EventKind::HelixRemoved,
            Event::HelixPropertyChanged { .. } => EventKind::HelixPropertyChanged,
            Event::OligoSequenceChanged { .. } => EventKind::OligoSequenceChanged,
        }
    }
}

struct Listener {
    kind: EventKind,
    callback: Box<dyn FnMut(&Event)>,
}

/// The observer registry of a design controller.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Listener>,
}

impl EventRegistry {
    /// Register a callback for one kind of event. Callbacks fire in
    /// subscription order.
    pub fn subscribe<F: FnMut(&Event) + 'static>(&mut self, kind: EventKind, callback: F) {
        self.listeners.push(Listener {
            kind,
            callback: Box::new(callback),
        });
    }

    pub(crate) fn emit_all(&mut self, events: &[Event]) {
        for event in events {
            for listener in self.listeners.iter_mut() {
                if listener.kind == event.kind() {
                    (listener.callback)(event);
                }
            }
        }
    }
}
