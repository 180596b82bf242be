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

//! This crate defines the operations used by the graphical components of
//! HelixCAD to interact with a design.
//!
//! The view layer talks to a [`DesignController`]: it sends placement,
//! removal and sequence intents, receives change notifications through the
//! controller's observer registry, and can walk the edit history back and
//! forth. Path computations over the lattice are read-only and never touch
//! the design; a computed path only takes effect when it is committed through
//! a batch placement.

pub use helixcad_design as design;

pub mod events;
pub mod operation;
pub mod pathfinder;

mod controller;
pub use controller::*;
