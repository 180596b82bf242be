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

//! Routes over the design lattice.
//!
//! Both entry points take two continuous positions and compute an ordered
//! sequence of lattice cells between them. They only ever read the occupancy;
//! a computed route takes effect when the caller commits it through a batch
//! placement, and is simply dropped otherwise.
//!
//! An exhausted search is a normal outcome, reported as an empty route.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ahash::RandomState;
use ordered_float::OrderedFloat;
use ultraviolet::Vec2;

use helixcad_design::lattice::{LatticeCoord, LatticeDivision, LatticeKind, Parity, RoundMode};
use helixcad_design::{Design, Helices};

/// One cell of a computed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub coord: LatticeCoord,
    pub parity: Parity,
}

/// Read-only view of which lattice cells hold a helix.
pub trait LatticeOccupancy {
    fn is_occupied(&self, coord: LatticeCoord) -> bool;
}

impl LatticeOccupancy for Helices {
    fn is_occupied(&self, coord: LatticeCoord) -> bool {
        self.occupant(coord).is_some()
    }
}

impl<S: std::hash::BuildHasher> LatticeOccupancy for std::collections::HashSet<LatticeCoord, S> {
    fn is_occupied(&self, coord: LatticeCoord) -> bool {
        self.contains(&coord)
    }
}

/// Rasterize the straight segment between the cells closest to `start` and
/// `end`, stepping cell by cell.
///
/// Occupied cells along the segment are dropped from the route and the
/// rasterization continues past them. Returns an empty route when both
/// positions resolve to the same occupied cell, or when no adjacent step makes
/// progress towards the destination.
pub fn shortest_path_direct<O: LatticeOccupancy>(
    lattice: LatticeKind,
    radius: f32,
    scale: f32,
    occupancy: &O,
    start: Vec2,
    end: Vec2,
) -> Vec<PathStep> {
    let start_cell = lattice.coord(radius, start, scale, RoundMode::Nearest);
    let end_cell = lattice.coord(radius, end, scale, RoundMode::Nearest);
    let step = |coord: LatticeCoord| PathStep {
        coord,
        parity: lattice.parity(coord),
    };
    if start_cell == end_cell {
        return if occupancy.is_occupied(start_cell) {
            Vec::new()
        } else {
            vec![step(start_cell)]
        };
    }
    let end_position = lattice.origin(radius, end_cell, scale);
    let distance_to_end =
        |coord: LatticeCoord| (lattice.origin(radius, coord, scale) - end_position).mag();

    let mut route = Vec::new();
    let mut current = start_cell;
    if !occupancy.is_occupied(current) {
        route.push(step(current));
    }
    let budget = 4
        * ((start_cell.row - end_cell.row).abs() + (start_cell.column - end_cell.column).abs())
            as usize
        + 8;
    for _ in 0..budget {
        if current == end_cell {
            return route;
        }
        let next = lattice
            .neighbors(current)
            .into_iter()
            .min_by_key(|coord| OrderedFloat(distance_to_end(*coord)))
            .unwrap();
        if distance_to_end(next) >= distance_to_end(current) {
            // no adjacent step makes progress
            return Vec::new();
        }
        current = next;
        if !occupancy.is_occupied(current) {
            route.push(step(current));
        }
    }
    log::warn!("rasterization exceeded its step budget");
    Vec::new()
}

/// Search an obstacle-avoiding route between the cells closest to `start` and
/// `end`.
///
/// The search runs over lattice cells with uniform edge cost and the
/// straight-line distance as heuristic. Occupied cells are excluded from the
/// search graph and never appear in the route. Two special cases anchor the
/// gesture on existing helices: an occupied start cell seeds the search but is
/// left out of the route, and an occupied end cell retargets the goal to any
/// free cell adjacent to it. Ties between equal-cost frontier nodes break by
/// insertion order, so the result is deterministic.
pub fn shortest_path_astar<O: LatticeOccupancy>(
    lattice: LatticeKind,
    radius: f32,
    scale: f32,
    occupancy: &O,
    start: Vec2,
    end: Vec2,
) -> Vec<PathStep> {
    let start_cell = lattice.coord(radius, start, scale, RoundMode::Nearest);
    let end_cell = lattice.coord(radius, end, scale, RoundMode::Nearest);
    let step = |coord: LatticeCoord| PathStep {
        coord,
        parity: lattice.parity(coord),
    };
    if start_cell == end_cell {
        return if occupancy.is_occupied(start_cell) {
            Vec::new()
        } else {
            vec![step(start_cell)]
        };
    }
    let start_occupied = occupancy.is_occupied(start_cell);
    let end_occupied = occupancy.is_occupied(end_cell);
    let end_position = lattice.origin(radius, end_cell, scale);
    // every lattice edge has the same length, so the heuristic counts edges
    let edge_length = 2. * radius * scale;
    let heuristic = |coord: LatticeCoord| {
        (lattice.origin(radius, coord, scale) - end_position).mag() / edge_length
    };
    let reaches_goal = |coord: LatticeCoord| {
        if end_occupied {
            lattice.neighbors(coord).contains(&end_cell)
        } else {
            coord == end_cell
        }
    };

    let mut frontier: BinaryHeap<Reverse<(OrderedFloat<f32>, usize, LatticeCoord)>> =
        BinaryHeap::new();
    let mut insertion = 0usize;
    let mut cost: HashMap<LatticeCoord, usize, RandomState> = HashMap::default();
    let mut came_from: HashMap<LatticeCoord, LatticeCoord, RandomState> = HashMap::default();
    cost.insert(start_cell, 0);
    frontier.push(Reverse((
        OrderedFloat(heuristic(start_cell)),
        insertion,
        start_cell,
    )));

    let mut goal = None;
    while let Some(Reverse((_, _, current))) = frontier.pop() {
        if reaches_goal(current) {
            goal = Some(current);
            break;
        }
        let current_cost = cost[&current];
        for neighbor in lattice.neighbors(current) {
            if occupancy.is_occupied(neighbor) {
                continue;
            }
            let tentative = current_cost + 1;
            if cost.get(&neighbor).map_or(true, |c| tentative < *c) {
                cost.insert(neighbor, tentative);
                came_from.insert(neighbor, current);
                insertion += 1;
                frontier.push(Reverse((
                    OrderedFloat(tentative as f32 + heuristic(neighbor)),
                    insertion,
                    neighbor,
                )));
            }
        }
    }

    let goal = match goal {
        Some(goal) => goal,
        None => {
            log::debug!("destination {:?} is boxed in", end_cell);
            return Vec::new();
        }
    };
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start_cell {
        current = came_from[&current];
        cells.push(current);
    }
    cells.reverse();
    if start_occupied {
        cells.remove(0);
    }
    cells.into_iter().map(step).collect()
}

/// [`shortest_path_direct`] with the lattice, pitch and occupancy of a design.
pub fn shortest_path_direct_in(design: &Design, start: Vec2, end: Vec2) -> Vec<PathStep> {
    shortest_path_direct(
        design.lattice,
        design.lattice_radius(),
        design.scale,
        &design.helices,
        start,
        end,
    )
}

/// [`shortest_path_astar`] with the lattice, pitch and occupancy of a design.
pub fn shortest_path_astar_in(design: &Design, start: Vec2, end: Vec2) -> Vec<PathStep> {
    shortest_path_astar(
        design.lattice,
        design.lattice_radius(),
        design.scale,
        &design.helices,
        start,
        end,
    )
}
