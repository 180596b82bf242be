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

//! Coordinate math for the design lattices.
//!
//! Helices are placed on the vertices of a discrete lattice, either square or
//! honeycomb. The honeycomb lattice uses the doubled-row convention: a cell is
//! addressed by `(row, column)` and its vertical offset alternates with the
//! parity of `row + column`.

use ultraviolet::Vec2;

/// A cell of the design lattice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct LatticeCoord {
    pub row: isize,
    pub column: isize,
}

impl LatticeCoord {
    pub fn new(row: isize, column: isize) -> Self {
        Self { row, column }
    }
}

/// The even/odd classification of a lattice cell.
///
/// Parity selects the identifier track of a helix created on the cell: helices on
/// even cells get even identifiers, helices on odd cells get odd identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    pub fn is_even(&self) -> bool {
        matches!(self, Parity::Even)
    }

    pub fn of(row: isize, column: isize) -> Self {
        if (row + column).rem_euclid(2) == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// How a fractional lattice coordinate is turned into a whole one.
///
/// `Floor` and `Ceil` are used to compute inclusive bounding ranges of cells,
/// `Nearest` for point queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundMode {
    Floor,
    Ceil,
    Nearest,
}

impl RoundMode {
    fn round(&self, x: f32) -> isize {
        match self {
            RoundMode::Floor => x.floor() as isize,
            RoundMode::Ceil => x.ceil() as isize,
            RoundMode::Nearest => x.round() as isize,
        }
    }
}

/// Mapping between lattice cells and design-space positions.
pub trait LatticeDivision {
    /// Maps a cell of the lattice to a position in the design plane.
    fn origin(&self, radius: f32, coord: LatticeCoord, scale: f32) -> Vec2;

    /// Maps a position in the design plane to a cell of the lattice.
    ///
    /// With `RoundMode::Nearest` this is an exact left inverse of [`origin`](Self::origin)
    /// for lattice-exact inputs.
    fn coord(&self, radius: f32, position: Vec2, scale: f32, mode: RoundMode) -> LatticeCoord;

    /// Parity of a cell.
    fn parity(&self, coord: LatticeCoord) -> Parity;

    /// The cells whose helices touch the helix placed on `coord`.
    ///
    /// Consecutive cells of any lattice path alternate parity.
    fn neighbors(&self, coord: LatticeCoord) -> Vec<LatticeCoord>;

    /// True iff `point` falls within the footprint of the cell `coord`.
    fn is_in_lattice_coord(
        &self,
        radius: f32,
        point: Vec2,
        coord: LatticeCoord,
        scale: f32,
    ) -> bool {
        (self.origin(radius, coord, scale) - point).mag() <= radius * scale
    }
}

/// The kind of lattice a design is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatticeKind {
    Square,
    Honeycomb,
}

impl LatticeKind {
    /// Default number of bases of a freshly created helix: two repeats of the
    /// lattice's step size.
    pub fn default_helix_length(&self) -> usize {
        match self {
            LatticeKind::Square => 64,
            LatticeKind::Honeycomb => 42,
        }
    }
}

impl LatticeDivision for LatticeKind {
    fn origin(&self, radius: f32, coord: LatticeCoord, scale: f32) -> Vec2 {
        match self {
            LatticeKind::Square => SquareLattice.origin(radius, coord, scale),
            LatticeKind::Honeycomb => HoneycombLattice.origin(radius, coord, scale),
        }
    }

    fn coord(&self, radius: f32, position: Vec2, scale: f32, mode: RoundMode) -> LatticeCoord {
        match self {
            LatticeKind::Square => SquareLattice.coord(radius, position, scale, mode),
            LatticeKind::Honeycomb => HoneycombLattice.coord(radius, position, scale, mode),
        }
    }

    fn parity(&self, coord: LatticeCoord) -> Parity {
        match self {
            LatticeKind::Square => SquareLattice.parity(coord),
            LatticeKind::Honeycomb => HoneycombLattice.parity(coord),
        }
    }

    fn neighbors(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        match self {
            LatticeKind::Square => SquareLattice.neighbors(coord),
            LatticeKind::Honeycomb => HoneycombLattice.neighbors(coord),
        }
    }

    fn is_in_lattice_coord(
        &self,
        radius: f32,
        point: Vec2,
        coord: LatticeCoord,
        scale: f32,
    ) -> bool {
        match self {
            LatticeKind::Square => SquareLattice.is_in_lattice_coord(radius, point, coord, scale),
            LatticeKind::Honeycomb => {
                HoneycombLattice.is_in_lattice_coord(radius, point, coord, scale)
            }
        }
    }
}

/// A uniform rectangular grid with a pitch of one helix diameter.
#[derive(Debug, Clone, Copy)]
pub struct SquareLattice;

impl LatticeDivision for SquareLattice {
    fn origin(&self, radius: f32, coord: LatticeCoord, scale: f32) -> Vec2 {
        Vec2::new(
            coord.column as f32 * 2. * radius * scale,
            coord.row as f32 * 2. * radius * scale,
        )
    }

    fn coord(&self, radius: f32, position: Vec2, scale: f32, mode: RoundMode) -> LatticeCoord {
        LatticeCoord {
            row: mode.round(position.y / (2. * radius * scale)),
            column: mode.round(position.x / (2. * radius * scale)),
        }
    }

    fn parity(&self, coord: LatticeCoord) -> Parity {
        Parity::of(coord.row, coord.column)
    }

    fn neighbors(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        vec![
            LatticeCoord::new(coord.row, coord.column - 1),
            LatticeCoord::new(coord.row, coord.column + 1),
            LatticeCoord::new(coord.row - 1, coord.column),
            LatticeCoord::new(coord.row + 1, coord.column),
        ]
    }
}

/// The honeycomb lattice, in the doubled-row convention.
///
/// Columns are spaced by `radius * sqrt(3)`, rows by `3 * radius`, and odd-parity
/// cells are shifted down by one radius. Every cell has exactly three touching
/// neighbours: its two horizontal ones and one vertical one whose row depends on
/// the cell's parity.
#[derive(Debug, Clone, Copy)]
pub struct HoneycombLattice;

impl LatticeDivision for HoneycombLattice {
    fn origin(&self, radius: f32, coord: LatticeCoord, scale: f32) -> Vec2 {
        let x = coord.column as f32 * radius * 3f32.sqrt();
        let y = coord.row as f32 * radius * 3.
            + if self.parity(coord).is_even() {
                0.
            } else {
                radius
            };
        Vec2::new(x * scale, y * scale)
    }

    fn coord(&self, radius: f32, position: Vec2, scale: f32, mode: RoundMode) -> LatticeCoord {
        let fract_column = position.x / (radius * 3f32.sqrt() * scale);
        let fract_row = position.y / (radius * 3. * scale);
        match mode {
            RoundMode::Floor | RoundMode::Ceil => LatticeCoord {
                row: mode.round(fract_row),
                column: mode.round(fract_column),
            },
            RoundMode::Nearest => {
                // The vertical offset depends on the parity of the cell, so the
                // naive rounding can be off by one. Scan the neighbourhood of the
                // first guess for the actual closest cell.
                let first_guess =
                    LatticeCoord::new(fract_row.round() as isize, fract_column.round() as isize);
                let mut ret = first_guess;
                let mut best_dist = (self.origin(radius, first_guess, scale) - position).mag_sq();
                for delta_row in [-2, -1, 0, 1, 2].iter() {
                    for delta_column in [-2, -1, 0, 1, 2].iter() {
                        let guess = LatticeCoord::new(
                            first_guess.row + delta_row,
                            first_guess.column + delta_column,
                        );
                        let dist = (self.origin(radius, guess, scale) - position).mag_sq();
                        if dist < best_dist {
                            ret = guess;
                            best_dist = dist;
                        }
                    }
                }
                ret
            }
        }
    }

    fn parity(&self, coord: LatticeCoord) -> Parity {
        Parity::of(coord.row, coord.column)
    }

    fn neighbors(&self, coord: LatticeCoord) -> Vec<LatticeCoord> {
        let vertical = if self.parity(coord).is_even() {
            LatticeCoord::new(coord.row - 1, coord.column)
        } else {
            LatticeCoord::new(coord.row + 1, coord.column)
        };
        vec![
            LatticeCoord::new(coord.row, coord.column - 1),
            LatticeCoord::new(coord.row, coord.column + 1),
            vertical,
        ]
    }
}
