//! The voxel height map.
//!
//! A [`VoxelMap`] is an `N×N` grid of column heights. Each unit of height is one
//! block; a column of height 0 is open floor. Every edit that changes a height
//! sets the dirty flag so the batched geometry can be rebuilt lazily.

/// Default for the tallest column a cell may hold.
pub const MAX_HEIGHT: u32 = 5;

/// Side length of the reference world.
pub const DEFAULT_GRID_SIZE: usize = 32;

/// The layout coordinates below are authored for a 32-wide grid.
const LAYOUT_REFERENCE_SIZE: usize = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelMap {
    size: usize,
    max_height: u32,
    heights: Vec<u32>,
    dirty: bool,
}

impl VoxelMap {
    /// An open `size×size` floor. New maps start dirty so the first frame builds geometry.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            max_height: MAX_HEIGHT,
            heights: vec![0; size * size],
            dirty: true,
        }
    }

    /// Builds a map from a height function; heights above [`MAX_HEIGHT`] are clamped.
    pub fn from_fn(size: usize, mut height: impl FnMut(usize, usize) -> u32) -> Self {
        let mut map = Self::new(size);
        for x in 0..size {
            for z in 0..size {
                map.heights[x * size + z] = height(x, z).min(map.max_height);
            }
        }
        map
    }

    /// Caps columns at `max_height`. Taller existing columns are cut down.
    pub fn with_max_height(mut self, max_height: u32) -> Self {
        self.max_height = max_height;
        for h in self.heights.iter_mut().filter(|h| **h > max_height) {
            *h = max_height;
        }
        self.dirty = true;
        self
    }

    /// An open arena enclosed by a wall of `wall_height` on every edge cell.
    pub fn bordered(size: usize, wall_height: u32) -> Self {
        let last = size.saturating_sub(1);
        Self::from_fn(size, |x, z| {
            if x == 0 || z == 0 || x == last || z == last {
                wall_height
            } else {
                0
            }
        })
    }

    /**
     * The walled maze explored in the world flow.
     *
     * Border walls of height 4, two long walls of height 3 along z = 10 and z = 20
     * with a gap at x = 15..=16, two cross walls of height 2 along x = 8 and x = 23
     * with gaps where they meet the long walls, a few scattered blocks and four
     * corner towers. Coordinates are scaled for grids that are not 32 wide.
     */
    pub fn maze(size: usize) -> Self {
        let mut map = Self::bordered(size, 4);
        let s = |c: usize| c * size / LAYOUT_REFERENCE_SIZE;

        for i in s(5)..s(27) {
            if i != s(15) && i != s(16) {
                map.set(i as i32, s(10) as i32, 3);
                map.set(i as i32, s(20) as i32, 3);
            }
        }
        for i in s(5)..s(27) {
            if i != s(10) && i != s(20) {
                map.set(s(8) as i32, i as i32, 2);
                map.set(s(23) as i32, i as i32, 2);
            }
        }

        let scattered = [
            (12, 5, 2),
            (13, 5, 2),
            (19, 5, 1),
            (20, 5, 2),
            (12, 26, 2),
            (19, 26, 1),
            (5, 5, 4),
            (5, 26, 4),
            (26, 5, 4),
            (26, 26, 4),
        ];
        for (x, z, h) in scattered {
            map.set(s(x) as i32, s(z) as i32, h);
        }
        map
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Offset between grid indices and world coordinates (`N/2`).
    pub fn half(&self) -> i32 {
        (self.size / 2) as i32
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        if x < 0 || z < 0 || x as usize >= self.size || z as usize >= self.size {
            return None;
        }
        Some(x as usize * self.size + z as usize)
    }

    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        self.index(x, z).is_some()
    }

    /// Column height, or `None` outside the grid.
    pub fn height(&self, x: i32, z: i32) -> Option<u32> {
        self.index(x, z).map(|i| self.heights[i])
    }

    /// True only for an in-bounds column of height 0.
    pub fn is_open(&self, x: i32, z: i32) -> bool {
        self.height(x, z) == Some(0)
    }

    /// Adds one block on top of `(x, z)`. Returns whether the map changed.
    pub fn raise(&mut self, x: i32, z: i32) -> bool {
        match self.index(x, z) {
            Some(i) if self.heights[i] < self.max_height => {
                self.heights[i] += 1;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Removes the top block of `(x, z)`. Returns whether the map changed.
    pub fn lower(&mut self, x: i32, z: i32) -> bool {
        match self.index(x, z) {
            Some(i) if self.heights[i] > 0 => {
                self.heights[i] -= 1;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    /// Overwrites a column height (clamped). Returns whether the map changed.
    pub fn set(&mut self, x: i32, z: i32, height: u32) -> bool {
        let height = height.min(self.max_height);
        match self.index(x, z) {
            Some(i) if self.heights[i] != height => {
                self.heights[i] = height;
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forces the next batch rebuild even though no height changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Number of unit blocks in the whole map (`Σ heights`).
    pub fn block_count(&self) -> u32 {
        self.heights.iter().sum()
    }

    /// Maps world coordinates to the grid cell that contains them.
    ///
    /// Non-finite or far-away coordinates are simply off the grid.
    pub fn world_to_cell(&self, x: f32, z: f32) -> Option<(i32, i32)> {
        let cell = |c: f32| {
            let c = c.floor();
            if !c.is_finite() || c.abs() > i32::MAX as f32 / 2.0 {
                return None;
            }
            (c as i32).checked_add(self.half())
        };
        let (gx, gz) = (cell(x)?, cell(z)?);
        self.in_bounds(gx, gz).then_some((gx, gz))
    }

    /// World-space X/Z offset of a grid cell.
    pub fn cell_to_world(&self, x: i32, z: i32) -> (f32, f32) {
        ((x - self.half()) as f32, (z - self.half()) as f32)
    }

    /// Every `(x, z, height)` in row-major order over `x`, then `z`.
    pub fn columns(&self) -> impl Iterator<Item = (i32, i32, u32)> + '_ {
        self.heights.iter().enumerate().map(move |(i, &h)| {
            ((i / self.size) as i32, (i % self.size) as i32, h)
        })
    }
}

impl Default for VoxelMap {
    fn default() -> Self {
        Self::maze(DEFAULT_GRID_SIZE)
    }
}
