//! Area shapes and orientation.

use strum::{Display, EnumIter};

/// Cardinal orientation of a fighter or of an oriented area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    #[default]
    East,
    South,
    West,
}

impl Direction {
    /// Unit step on the grid (x grows eastward, y grows southward).
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    pub const fn perpendicular(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Dominant direction of the vector `from -> to`. Equal points face east.
    pub fn between(from: (i32, i32), to: (i32, i32)) -> Self {
        let dx = to.0 - from.0;
        let dy = to.1 - from.1;
        if dx == 0 && dy == 0 {
            return Self::default();
        }
        if dx.abs() >= dy.abs() {
            if dx >= 0 { Self::East } else { Self::West }
        } else if dy > 0 {
            Self::South
        } else {
            Self::North
        }
    }
}

/// Shape of the set of cells an effect covers around its target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaShape {
    /// Only the target cell.
    #[default]
    Cell,
    /// Cells within `size` steps (Manhattan).
    Circle,
    /// Cells exactly `size` steps away (Manhattan).
    Ring,
    /// Cells within `size` on both axes (Chebyshev).
    Square,
    /// Target cell plus `size` cells in each cardinal direction.
    Cross,
    /// `size` cells behind the target cell, oriented from the caster.
    Line,
    /// `size` cells on each side of the target cell, across the cast direction.
    PerpendicularLine,
}

/// An area: shape plus size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Area {
    pub shape: AreaShape,
    #[cfg_attr(feature = "serde", serde(default))]
    pub size: u8,
}

impl Area {
    pub const CELL: Self = Self::new(AreaShape::Cell, 0);

    pub const fn new(shape: AreaShape, size: u8) -> Self {
        Self { shape, size }
    }

    pub const fn circle(size: u8) -> Self {
        Self::new(AreaShape::Circle, size)
    }

    pub const fn line(size: u8) -> Self {
        Self::new(AreaShape::Line, size)
    }

    /// True when the area covers exactly the target cell.
    pub const fn is_single_cell(&self) -> bool {
        matches!(self.shape, AreaShape::Cell) || self.size == 0
    }

    /// Offsets (dx, dy) covered by this area, before clipping to the grid.
    pub fn offsets(&self, direction: Direction) -> Vec<(i32, i32)> {
        let size = i32::from(self.size);
        match self.shape {
            AreaShape::Cell => vec![(0, 0)],
            AreaShape::Circle | AreaShape::Ring | AreaShape::Square | AreaShape::Cross => {
                let mut offsets = Vec::new();
                for dy in -size..=size {
                    for dx in -size..=size {
                        let distance = dx.abs() + dy.abs();
                        let covered = match self.shape {
                            AreaShape::Circle => distance <= size,
                            AreaShape::Ring => distance == size,
                            AreaShape::Square => true,
                            _ => dx == 0 || dy == 0,
                        };
                        if covered {
                            offsets.push((dx, dy));
                        }
                    }
                }
                offsets
            }
            AreaShape::Line => {
                let (sx, sy) = direction.delta();
                (0..=size).map(|step| (sx * step, sy * step)).collect()
            }
            AreaShape::PerpendicularLine => {
                let (sx, sy) = direction.perpendicular().delta();
                (-size..=size).map(|step| (sx * step, sy * step)).collect()
            }
        }
    }
}
