//! Grid addressing — integer positions and the bounds they are checked against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid address. Value semantics: equal iff all three coordinates match.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for Position {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Grid bounds `(max_x, max_y, max_z)`; valid coordinates are `0..max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridDimensions {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// True when no axis is zero.
    pub fn is_positive(&self) -> bool {
        self.x > 0 && self.y > 0 && self.z > 0
    }

    /// True when every coordinate fits an `i32` and the cell count fits a `usize`.
    pub fn is_addressable(&self) -> bool {
        let axis_max = i32::MAX as u32;
        self.x <= axis_max
            && self.y <= axis_max
            && self.z <= axis_max
            && self.checked_cell_count().is_some()
    }

    /// Number of addressable positions, or `None` on overflow.
    pub fn checked_cell_count(&self) -> Option<usize> {
        (self.x as usize)
            .checked_mul(self.y as usize)?
            .checked_mul(self.z as usize)
    }

    /// Number of addressable positions, saturating at `usize::MAX`.
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    /// `0 <= x < max_x && 0 <= y < max_y && 0 <= z < max_z`.
    pub fn contains(&self, position: Position) -> bool {
        in_axis(position.x, self.x) && in_axis(position.y, self.y) && in_axis(position.z, self.z)
    }

    /// Flat index `x*max_y*max_z + y*max_z + z`, or `None` when out of bounds.
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let (y_len, z_len) = (self.y as usize, self.z as usize);
        Some(position.x as usize * y_len * z_len + position.y as usize * z_len + position.z as usize)
    }

    /// Inverse of [`index_of`](Self::index_of).
    pub fn position_at(&self, index: usize) -> Option<Position> {
        if index >= self.cell_count() {
            return None;
        }
        let (y_len, z_len) = (self.y as usize, self.z as usize);
        let x = index / (y_len * z_len);
        let y = (index / z_len) % y_len;
        let z = index % z_len;
        Some(Position::new(x as i32, y as i32, z as i32))
    }

    /// Every valid position, x-major then y then z.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).filter_map(move |i| self.position_at(i))
    }
}

impl fmt::Display for GridDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

fn in_axis(coordinate: i32, bound: u32) -> bool {
    coordinate >= 0 && (coordinate as u32) < bound
}
