use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Smallest accepted extent along any grid axis.
pub const MIN_GRID_AXIS: u32 = 4;
/// Largest accepted extent along any grid axis.
pub const MAX_GRID_AXIS: u32 = 16;

/// Errors from grid construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("grid axis {axis} = {value} is outside {MIN_GRID_AXIS}..={MAX_GRID_AXIS}")]
    OutOfRange { axis: char, value: u32 },
}

/// A cell coordinate inside the voxel grid. Z is the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridCoord {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    pub fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// One of the six faces of a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Index into a `[T; 6]` face table, in `ALL` order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::PosX => Face::NegX,
            Face::NegX => Face::PosX,
            Face::PosY => Face::NegY,
            Face::NegY => Face::PosY,
            Face::PosZ => Face::NegZ,
            Face::NegZ => Face::PosZ,
        }
    }
}

/// Validated grid extents.
///
/// Serialized as a `[x, y, z]` array; deserialization re-runs validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u32; 3]", into = "[u32; 3]")]
pub struct GridDims {
    x: u32,
    y: u32,
    z: u32,
}

impl GridDims {
    /// Create grid extents, rejecting any axis outside 4..=16.
    pub fn new(x: u32, y: u32, z: u32) -> Result<Self, GridError> {
        for (axis, value) in [('x', x), ('y', y), ('z', z)] {
            if !(MIN_GRID_AXIS..=MAX_GRID_AXIS).contains(&value) {
                return Err(GridError::OutOfRange { axis, value });
            }
        }
        Ok(Self { x, y, z })
    }

    /// Create grid extents, clamping each axis into 4..=16.
    pub fn clamped(x: u32, y: u32, z: u32) -> Self {
        let c = |v: u32| v.clamp(MIN_GRID_AXIS, MAX_GRID_AXIS);
        Self {
            x: c(x),
            y: c(y),
            z: c(z),
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        (self.x * self.y * self.z) as usize
    }

    pub fn contains(&self, c: GridCoord) -> bool {
        c.x < self.x && c.y < self.y && c.z < self.z
    }

    /// Linear index of a coordinate. X varies fastest, then Y, then Z.
    pub fn index(&self, c: GridCoord) -> usize {
        debug_assert!(self.contains(c), "{c:?} outside {self:?}");
        ((c.z * self.y + c.y) * self.x + c.x) as usize
    }

    /// Coordinate of a linear index (inverse of `index`).
    pub fn coord(&self, index: usize) -> GridCoord {
        let i = index as u32;
        GridCoord {
            x: i % self.x,
            y: (i / self.x) % self.y,
            z: i / (self.x * self.y),
        }
    }

    /// All coordinates in linear-index order.
    pub fn iter(&self) -> impl Iterator<Item = GridCoord> + '_ {
        (0..self.cell_count()).map(|i| self.coord(i))
    }

    /// Whether the cell sits on the outer shell that boundary tiles occupy:
    /// the X/Y sides (unless edges wrap) and the top layer.
    pub fn is_boundary(&self, c: GridCoord, wrap_edges: bool) -> bool {
        let side = c.x == 0 || c.y == 0 || c.x == self.x - 1 || c.y == self.y - 1;
        (side && !wrap_edges) || c.z == self.z - 1
    }

    /// Neighbouring cell across `face`. X and Y wrap when `wrap_edges` is set;
    /// Z never wraps.
    pub fn neighbor(&self, c: GridCoord, face: Face, wrap_edges: bool) -> Option<GridCoord> {
        let step = |v: u32, len: u32, forward: bool, wraps: bool| -> Option<u32> {
            match (forward, wraps) {
                (true, _) if v + 1 < len => Some(v + 1),
                (true, true) => Some(0),
                (false, _) if v > 0 => Some(v - 1),
                (false, true) => Some(len - 1),
                _ => None,
            }
        };
        let mut n = c;
        match face {
            Face::PosX => n.x = step(c.x, self.x, true, wrap_edges)?,
            Face::NegX => n.x = step(c.x, self.x, false, wrap_edges)?,
            Face::PosY => n.y = step(c.y, self.y, true, wrap_edges)?,
            Face::NegY => n.y = step(c.y, self.y, false, wrap_edges)?,
            Face::PosZ => n.z = step(c.z, self.z, true, false)?,
            Face::NegZ => n.z = step(c.z, self.z, false, false)?,
        }
        Some(n)
    }
}

impl Default for GridDims {
    fn default() -> Self {
        Self { x: 8, y: 8, z: 4 }
    }
}

impl TryFrom<[u32; 3]> for GridDims {
    type Error = GridError;

    fn try_from([x, y, z]: [u32; 3]) -> Result<Self, Self::Error> {
        Self::new(x, y, z)
    }
}

impl From<GridDims> for [u32; 3] {
    fn from(d: GridDims) -> Self {
        [d.x, d.y, d.z]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_axes() {
        assert!(GridDims::new(4, 16, 8).is_ok());
        assert_eq!(
            GridDims::new(3, 8, 8),
            Err(GridError::OutOfRange { axis: 'x', value: 3 })
        );
        assert_eq!(
            GridDims::new(8, 8, 17),
            Err(GridError::OutOfRange { axis: 'z', value: 17 })
        );
    }

    #[test]
    fn clamped_stays_in_bounds() {
        let d = GridDims::clamped(0, 100, 9);
        assert_eq!((d.x(), d.y(), d.z()), (4, 16, 9));
    }

    #[test]
    fn index_and_coord_are_inverse() {
        let d = GridDims::new(5, 6, 7).unwrap();
        for (i, c) in d.iter().enumerate() {
            assert!(d.contains(c));
            assert_eq!(d.index(c), i);
        }
        assert_eq!(d.iter().count(), 5 * 6 * 7);
    }

    #[test]
    fn neighbor_respects_wrapping() {
        let d = GridDims::new(4, 4, 4).unwrap();
        let corner = GridCoord::new(0, 0, 0);
        assert_eq!(d.neighbor(corner, Face::NegX, false), None);
        assert_eq!(
            d.neighbor(corner, Face::NegX, true),
            Some(GridCoord::new(3, 0, 0))
        );
        assert_eq!(d.neighbor(corner, Face::NegZ, true), None);
        assert_eq!(
            d.neighbor(corner, Face::PosZ, false),
            Some(GridCoord::new(0, 0, 1))
        );
    }

    #[test]
    fn boundary_shell() {
        let d = GridDims::new(4, 4, 4).unwrap();
        assert!(d.is_boundary(GridCoord::new(0, 2, 1), false));
        assert!(!d.is_boundary(GridCoord::new(0, 2, 1), true));
        assert!(d.is_boundary(GridCoord::new(2, 2, 3), true));
        assert!(!d.is_boundary(GridCoord::new(1, 2, 1), false));
    }

    #[test]
    fn face_opposites() {
        for f in Face::ALL {
            assert_eq!(f.opposite().opposite(), f);
            assert_ne!(f.opposite(), f);
        }
    }

    #[test]
    fn serde_validates_dims() {
        let d: GridDims = serde_json::from_str("[8, 8, 4]").unwrap();
        assert_eq!(d, GridDims::default());
        assert!(serde_json::from_str::<GridDims>("[2, 8, 4]").is_err());
    }
}
