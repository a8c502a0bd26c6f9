use std::fmt;

// set up enums and structs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    X,
    Y,
    Z,
}

impl Direction {
    pub const ALL: [Direction; 3] = [Direction::X, Direction::Y, Direction::Z];

    /// Column label used in the csv header.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::X => "X",
            Direction::Y => "Y",
            Direction::Z => "Z",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position of a voxel in the image grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelIndex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl VoxelIndex {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Direction) -> usize {
        match axis {
            Direction::X => self.x,
            Direction::Y => self.y,
            Direction::Z => self.z,
        }
    }
}

impl fmt::Display for VoxelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Iterates a grid of `dims` (x, y, z) with X varying fastest, then Y, then Z.
pub fn scan_order(dims: [usize; 3]) -> impl Iterator<Item = VoxelIndex> {
    let [nx, ny, nz] = dims;
    (0..nz).flat_map(move |z| {
        (0..ny).flat_map(move |y| (0..nx).map(move |x| VoxelIndex::new(x, y, z)))
    })
}
