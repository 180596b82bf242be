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

//! This crate defines the HelixCAD design model.
//!
//! A design is a set of virtual helices placed on a discrete lattice (square or
//! honeycomb), together with the strand network routed through them. All run-time
//! manipulations of a design are performed on a [`Design`] structure, through the
//! fallible operations of the [`design_operations`] module.

#[macro_use]
extern crate serde_derive;
extern crate serde;

/// Re-export ultraviolet for linear algebra
pub use ultraviolet;
use ultraviolet::Vec2;

pub mod lattice;
use lattice::{LatticeCoord, LatticeDivision, LatticeKind, Parity, RoundMode};

mod helices;
pub use helices::*;

mod strands;
pub use strands::*;

mod sequence;
pub use sequence::*;

pub mod design_operations;

mod parameters;
pub use parameters::*;

#[cfg(test)]
mod tests;

fn default_scale() -> f32 {
    1.0
}

/// The HelixCAD `Design` structure.
#[derive(Serialize, Deserialize, Clone)]
pub struct Design {
    /// The kind of lattice on which the helices of this design are placed.
    pub lattice: LatticeKind,
    /// Parameters of DNA geometry. They determine the lattice pitch.
    #[serde(default)]
    pub parameters: Parameters,
    /// Scale factor between lattice units and design-space units.
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// The collection of all virtual helices of this design, indexed by identifier.
    pub helices: Helices,
    /// The strand network: strands, oligos and their crossovers.
    #[serde(default)]
    pub strands: StrandNetwork,
}

impl Design {
    pub fn new(lattice: LatticeKind) -> Self {
        Self {
            lattice,
            parameters: Parameters::DEFAULT,
            scale: 1.0,
            helices: Helices::default(),
            strands: StrandNetwork::default(),
        }
    }

    /// The radius of a lattice cell: half the distance between the axes of two
    /// neighbouring helices.
    pub fn lattice_radius(&self) -> f32 {
        self.parameters.lattice_radius()
    }

    /// Design-space position of a lattice cell.
    pub fn position_of_cell(&self, coord: LatticeCoord) -> Vec2 {
        self.lattice
            .origin(self.lattice_radius(), coord, self.scale)
    }

    /// The lattice cell whose position is the closest to `position`.
    pub fn cell_at_position(&self, position: Vec2) -> LatticeCoord {
        self.lattice.coord(
            self.lattice_radius(),
            position,
            self.scale,
            RoundMode::Nearest,
        )
    }

    /// Parity of a lattice cell.
    pub fn parity_of_cell(&self, coord: LatticeCoord) -> Parity {
        self.lattice.parity(coord)
    }

    /// Rebuild the derived indices that are skipped by serialization.
    ///
    /// Must be called on a design obtained by deserialization before it is used.
    pub fn reindex(&mut self) {
        self.helices.rebuild_occupancy();
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new(LatticeKind::Honeycomb)
    }
}
