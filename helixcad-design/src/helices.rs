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
use std::collections::{BTreeMap, HashMap};

use ahash::RandomState;
use ultraviolet::Vec2;

use super::lattice::{LatticeCoord, LatticeDivision, LatticeKind, Parity};
use super::Parameters;

/// A structure mapping helix identifiers to `Helix` objects.
///
/// It also maintains the occupancy of the lattice: the mapping from occupied
/// cells to helix identifiers is a bijection, a cell holds at most one helix.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct Helices {
    map: BTreeMap<usize, Helix>,
    #[serde(skip)]
    occupancy: HashMap<LatticeCoord, usize, RandomState>,
}

impl Helices {
    // Collection methods
    //============================================================================================
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, id: &usize) -> Option<&Helix> {
        self.map.get(id)
    }

    pub fn contains_key(&self, id: &usize) -> bool {
        self.map.contains_key(id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &usize> {
        self.map.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &Helix)> {
        self.map.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &Helix> {
        self.map.values()
    }

    pub(crate) fn get_mut(&mut self, id: &usize) -> Option<&mut Helix> {
        self.map.get_mut(id)
    }
    //============================================================================================

    /// The helix occupying a lattice cell, if any.
    pub fn occupant(&self, coord: LatticeCoord) -> Option<usize> {
        self.occupancy.get(&coord).copied()
    }

    /// The lowest helix identifier of the given parity track that is not in use.
    pub fn lowest_unused_id(&self, parity: Parity) -> usize {
        let mut candidate = if parity.is_even() { 0 } else { 1 };
        while self.map.contains_key(&candidate) {
            candidate += 2;
        }
        candidate
    }

    /// Insert a helix under a given identifier. The caller is responsible for
    /// having checked that neither the identifier nor the cell is in use.
    pub(crate) fn insert(&mut self, id: usize, helix: Helix) {
        let previous = self.occupancy.insert(helix.lattice_coord, id);
        debug_assert!(previous.is_none(), "cell occupied twice");
        self.map.insert(id, helix);
    }

    pub(crate) fn remove(&mut self, id: &usize) -> Option<Helix> {
        let helix = self.map.remove(id)?;
        self.occupancy.remove(&helix.lattice_coord);
        Some(helix)
    }

    /// Rebuild the occupancy index from the helix table, e.g. after
    /// deserialization.
    pub fn rebuild_occupancy(&mut self) {
        self.occupancy.clear();
        for (id, helix) in self.map.iter() {
            if let Some(other) = self.occupancy.insert(helix.lattice_coord, *id) {
                log::error!(
                    "helices {} and {} both occupy {:?}",
                    other,
                    id,
                    helix.lattice_coord
                );
            }
        }
    }
}

/// A virtual helix: a modeled double-helix position on the design lattice.
///
/// Helices are owned by [`Helices`]; every other part of the design refers to
/// them by identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Helix {
    /// The lattice cell this helix occupies.
    pub lattice_coord: LatticeCoord,

    /// Parity of the cell, cached at creation time. It decided the identifier
    /// track of this helix.
    pub parity: Parity,

    /// Position of the helix axis in the design plane.
    pub position: Vec2,

    /// Height of the 5' end of the forward strand along the helix axis.
    #[serde(default)]
    pub z: f32,

    /// Number of bases addressable on this helix. Strand intervals live in
    /// `0..length`.
    pub length: usize,

    /// Indicate whether the helix should be displayed.
    #[serde(default = "default_visibility", skip_serializing_if = "bool::clone")]
    pub visible: bool,

    /// A name used for display and export. When `None`, views derive one from
    /// the identifier.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<Cow<'static, str>>,

    /// Colour of this helix.
    #[serde(default = "default_helix_color")]
    pub color: u32,

    /// Number of bases in one repeat of the helical pattern.
    pub bases_per_repeat: usize,

    /// Number of full turns in one repeat of the helical pattern.
    pub turns_per_repeat: usize,

    /// Rotation of base 0 of the forward strand around the helix axis, in
    /// degrees.
    #[serde(default)]
    pub euler_z: f32,

    /// Angle between two paired nucleotides, in degrees.
    pub minor_groove_angle: f32,

    /// Identifiers of the helices on touching lattice cells.
    #[serde(default)]
    pub neighbors: Vec<usize>,
}

fn default_visibility() -> bool {
    true
}

fn default_helix_color() -> u32 {
    Helix::DEFAULT_COLOR
}

impl Helix {
    pub const DEFAULT_COLOR: u32 = 0x0066CC;

    pub fn new_on_lattice(
        kind: LatticeKind,
        parameters: &Parameters,
        coord: LatticeCoord,
        scale: f32,
    ) -> Self {
        let parity = kind.parity(coord);
        let position = kind.origin(parameters.lattice_radius(), coord, scale);
        let (bases_per_repeat, turns_per_repeat) = match kind {
            LatticeKind::Honeycomb => (21, 2),
            LatticeKind::Square => (32, 3),
        };
        let twist_per_base = turns_per_repeat as f32 * 360. / bases_per_repeat as f32;
        Self {
            lattice_coord: coord,
            parity,
            position,
            z: 0.,
            length: kind.default_helix_length(),
            visible: true,
            name: None,
            color: Self::DEFAULT_COLOR,
            bases_per_repeat,
            turns_per_repeat,
            euler_z: twist_per_base / 2.,
            minor_groove_angle: 171.,
            neighbors: Vec::new(),
        }
    }

    /// Helical twist between two consecutive bases of this helix, in degrees.
    pub fn twist_per_base(&self) -> f32 {
        self.turns_per_repeat as f32 * 360. / self.bases_per_repeat as f32
    }
}
