//! Battlefield grid: cells, areas, distance and line of sight.
//!
//! The grid is a static rectangle of cells. Fighter occupancy is not part of
//! it; [`crate::battle::Battle`] layers occupancy on top of the static
//! [`GridOracle`] queries.
mod area;

use core::fmt;

use bitflags::bitflags;

pub use area::{Area, AreaShape, Direction};

/// Index of a cell in row-major order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellId(pub u16);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell:{}", self.0)
    }
}

bitflags! {
    /// Static properties of a cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        /// Fighters may stand on and walk through the cell.
        const WALKABLE = 1;
        /// The cell interrupts line of sight.
        const BLOCKS_SIGHT = 1 << 1;
    }
}

/// Read-only geometric queries over a battlefield.
pub trait GridOracle {
    /// Cells covered by `area` around `center`, clipped to the grid.
    fn cells_in_area(&self, center: CellId, area: Area, direction: Direction) -> Vec<CellId>;

    /// True when no sight-blocking cell lies strictly between `from` and `to`.
    fn line_of_sight(&self, from: CellId, to: CellId) -> bool;

    /// Manhattan distance between two cells.
    fn distance(&self, from: CellId, to: CellId) -> u32;

    fn is_walkable(&self, cell: CellId) -> bool;
}

/// Rectangular battlefield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Battlefield {
    width: u16,
    height: u16,
    cells: Vec<CellFlags>,
}

impl Battlefield {
    /// Fully walkable battlefield of `width` x `height` cells.
    pub fn open(width: u16, height: u16) -> Self {
        let len = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![CellFlags::WALKABLE; len],
        }
    }

    /// Marks `cell` as an obstacle: not walkable, blocks sight.
    pub fn with_obstacle(mut self, cell: CellId) -> Self {
        if let Some(flags) = self.cells.get_mut(usize::from(cell.0)) {
            *flags = CellFlags::BLOCKS_SIGHT;
        }
        self
    }

    /// Marks `cell` as a hole: not walkable, does not block sight.
    pub fn with_hole(mut self, cell: CellId) -> Self {
        if let Some(flags) = self.cells.get_mut(usize::from(cell.0)) {
            *flags = CellFlags::empty();
        }
        self
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: CellId) -> bool {
        usize::from(cell.0) < self.cells.len()
    }

    pub fn flags(&self, cell: CellId) -> CellFlags {
        self.cells
            .get(usize::from(cell.0))
            .copied()
            .unwrap_or_else(CellFlags::empty)
    }

    /// Grid coordinates (x, y) of a cell.
    pub fn coordinates(&self, cell: CellId) -> Option<(i32, i32)> {
        if !self.contains(cell) || self.width == 0 {
            return None;
        }
        let width = i32::from(self.width);
        let index = i32::from(cell.0);
        Some((index % width, index / width))
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<CellId> {
        if x < 0 || y < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return None;
        }
        u16::try_from(y * i32::from(self.width) + x)
            .ok()
            .map(CellId)
    }

    /// Cell reached from `cell` by one step toward `direction`.
    pub fn step(&self, cell: CellId, direction: Direction) -> Option<CellId> {
        let (x, y) = self.coordinates(cell)?;
        let (dx, dy) = direction.delta();
        self.cell_at(x + dx, y + dy)
    }

    /// Orthogonal neighbours inside the grid.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ]
        .into_iter()
        .filter_map(move |direction| self.step(cell, direction))
    }

    pub fn cells(&self) -> impl Iterator<Item = CellId> + '_ {
        (0..self.cells.len()).filter_map(|index| u16::try_from(index).ok().map(CellId))
    }

    /// Orientation of the vector `from -> to`.
    pub fn direction(&self, from: CellId, to: CellId) -> Direction {
        match (self.coordinates(from), self.coordinates(to)) {
            (Some(a), Some(b)) => Direction::between(a, b),
            _ => Direction::default(),
        }
    }

    /// Cells strictly between `from` and `to` on a Bresenham line.
    pub fn cells_between(&self, from: CellId, to: CellId) -> Vec<CellId> {
        let (Some((x0, y0)), Some((x1, y1))) = (self.coordinates(from), self.coordinates(to))
        else {
            return Vec::new();
        };

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        let mut between = Vec::new();

        while (x, y) != (x1, y1) {
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += sx;
            }
            if doubled <= dx {
                err += dx;
                y += sy;
            }
            if (x, y) != (x1, y1)
                && let Some(cell) = self.cell_at(x, y)
            {
                between.push(cell);
            }
        }

        between
    }
}

impl GridOracle for Battlefield {
    fn cells_in_area(&self, center: CellId, area: Area, direction: Direction) -> Vec<CellId> {
        let Some((x, y)) = self.coordinates(center) else {
            return Vec::new();
        };
        area.offsets(direction)
            .into_iter()
            .filter_map(|(dx, dy)| self.cell_at(x + dx, y + dy))
            .collect()
    }

    fn line_of_sight(&self, from: CellId, to: CellId) -> bool {
        self.cells_between(from, to)
            .into_iter()
            .all(|cell| !self.flags(cell).contains(CellFlags::BLOCKS_SIGHT))
    }

    fn distance(&self, from: CellId, to: CellId) -> u32 {
        match (self.coordinates(from), self.coordinates(to)) {
            (Some((x0, y0)), Some((x1, y1))) => (x1 - x0).unsigned_abs() + (y1 - y0).unsigned_abs(),
            _ => u32::MAX,
        }
    }

    fn is_walkable(&self, cell: CellId) -> bool {
        self.flags(cell).contains(CellFlags::WALKABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Battlefield {
        Battlefield::open(10, 10)
    }

    #[test]
    fn coordinates_roundtrip_row_major() {
        let grid = grid();
        assert_eq!(grid.coordinates(CellId(23)), Some((3, 2)));
        assert_eq!(grid.cell_at(3, 2), Some(CellId(23)));
        assert_eq!(grid.cell_at(10, 0), None);
        assert_eq!(grid.coordinates(CellId(100)), None);
    }

    #[test]
    fn distance_is_manhattan() {
        let grid = grid();
        assert_eq!(grid.distance(CellId(0), CellId(23)), 5);
        assert_eq!(grid.distance(CellId(23), CellId(23)), 0);
    }

    #[test]
    fn circle_is_clipped_to_bounds() {
        let grid = grid();
        let cells = grid.cells_in_area(CellId(0), Area::circle(1), Direction::East);
        assert_eq!(cells, vec![CellId(0), CellId(1), CellId(10)]);

        let center = grid.cell_at(5, 5).unwrap();
        assert_eq!(
            grid.cells_in_area(center, Area::circle(2), Direction::East).len(),
            13
        );
    }

    #[test]
    fn line_follows_direction() {
        let grid = grid();
        let center = grid.cell_at(2, 2).unwrap();
        let cells = grid.cells_in_area(center, Area::line(2), Direction::South);
        assert_eq!(
            cells,
            vec![center, grid.cell_at(2, 3).unwrap(), grid.cell_at(2, 4).unwrap()]
        );
    }

    #[test]
    fn ring_excludes_center() {
        let grid = grid();
        let center = grid.cell_at(5, 5).unwrap();
        let cells = grid.cells_in_area(center, Area::new(AreaShape::Ring, 1), Direction::East);
        assert_eq!(cells.len(), 4);
        assert!(!cells.contains(&center));
    }

    #[test]
    fn obstacle_blocks_line_of_sight() {
        let grid = grid().with_obstacle(CellId(2));
        assert!(!grid.line_of_sight(CellId(0), CellId(4)));
        assert!(grid.line_of_sight(CellId(0), CellId(2)));
        assert!(grid.line_of_sight(CellId(10), CellId(14)));
        assert!(!grid.is_walkable(CellId(2)));
    }

    #[test]
    fn hole_is_not_walkable_but_transparent() {
        let grid = grid().with_hole(CellId(2));
        assert!(!grid.is_walkable(CellId(2)));
        assert!(grid.line_of_sight(CellId(0), CellId(4)));
    }

    #[test]
    fn direction_uses_dominant_axis() {
        assert_eq!(Direction::between((0, 0), (3, 1)), Direction::East);
        assert_eq!(Direction::between((0, 0), (-1, -4)), Direction::North);
        assert_eq!(Direction::between((2, 2), (2, 2)), Direction::East);
    }
}
