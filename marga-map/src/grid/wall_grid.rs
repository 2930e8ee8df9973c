//! Wall grid storage and adjacency rules.

use serde::{Deserialize, Serialize};

use crate::core::{GridCoord, Heading};

/// State of a single cell edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallState {
    /// Nothing is known about this edge.
    #[default]
    Unknown,
    /// Edge is passable.
    Open,
    /// Edge is blocked by a wall.
    Wall,
}

impl WallState {
    /// Only explicitly open edges may be crossed.
    #[inline]
    pub fn is_open(self) -> bool {
        self == WallState::Open
    }

    /// Check if a wall is present.
    #[inline]
    pub fn is_wall(self) -> bool {
        self == WallState::Wall
    }
}

/// Which of the two edge arrays an edge belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeLayer {
    /// `(H + 1) × W` edges above/below cells
    Horizontal,
    /// `H × (W + 1)` edges left/right of cells
    Vertical,
}

/// Wall observations around one cell, keyed by absolute side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWalls {
    /// North edge
    pub top: bool,
    /// East edge
    pub right: bool,
    /// South edge
    pub bottom: bool,
    /// West edge
    pub left: bool,
}

impl CellWalls {
    /// Mark the side facing `heading`.
    pub fn set(&mut self, heading: Heading, present: bool) {
        match heading {
            Heading::North => self.top = present,
            Heading::East => self.right = present,
            Heading::South => self.bottom = present,
            Heading::West => self.left = present,
        }
    }

    /// Side facing `heading`.
    pub fn get(&self, heading: Heading) -> bool {
        match heading {
            Heading::North => self.top,
            Heading::East => self.right,
            Heading::South => self.bottom,
            Heading::West => self.left,
        }
    }

    /// Number of sides marked.
    pub fn count(&self) -> usize {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .filter(|&&w| w)
            .count()
    }
}

/// Maze walls stored as two edge grids.
///
/// Dimensions are fixed at construction; nothing resizes a grid afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WallGrid {
    width: usize,
    height: usize,
    /// Row-major, `(height + 1) * width`
    horizontal: Vec<WallState>,
    /// Row-major, `height * (width + 1)`
    vertical: Vec<WallState>,
}

impl WallGrid {
    /// Create a grid with every edge in `fill` state.
    pub fn filled(width: usize, height: usize, fill: WallState) -> Self {
        Self {
            width,
            height,
            horizontal: vec![fill; (height + 1) * width],
            vertical: vec![fill; height * (width + 1)],
        }
    }

    /// Create a grid where nothing is known yet (fresh mapper state).
    pub fn unknown(width: usize, height: usize) -> Self {
        Self::filled(width, height, WallState::Unknown)
    }

    /// Create a grid with every edge open, including the perimeter.
    pub fn open(width: usize, height: usize) -> Self {
        Self::filled(width, height, WallState::Open)
    }

    /// Create an open grid enclosed by a wall perimeter.
    pub fn with_border(width: usize, height: usize) -> Self {
        let mut grid = Self::open(width, height);
        for x in 0..width {
            grid.set_horizontal(x, 0, WallState::Wall);
            grid.set_horizontal(x, height, WallState::Wall);
        }
        for y in 0..height {
            grid.set_vertical(0, y, WallState::Wall);
            grid.set_vertical(width, y, WallState::Wall);
        }
        grid
    }

    /// Build from raw edge arrays (row-major).
    ///
    /// Returns `None` if the array lengths do not match the dimensions.
    pub fn from_edges(
        width: usize,
        height: usize,
        horizontal: Vec<WallState>,
        vertical: Vec<WallState>,
    ) -> Option<Self> {
        if horizontal.len() != (height + 1) * width || vertical.len() != height * (width + 1) {
            return None;
        }
        Some(Self {
            width,
            height,
            horizontal,
            vertical,
        })
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of rows and columns of one edge layer.
    pub fn layer_dims(&self, layer: EdgeLayer) -> (usize, usize) {
        match layer {
            EdgeLayer::Horizontal => (self.height + 1, self.width),
            EdgeLayer::Vertical => (self.height, self.width + 1),
        }
    }

    /// Check if a cell lies inside the maze.
    #[inline]
    pub fn contains(&self, cell: GridCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    /// Horizontal edge at column `x`, edge row `y` (`0..=height`).
    pub fn horizontal(&self, x: usize, y: usize) -> Option<WallState> {
        if x < self.width && y <= self.height {
            Some(self.horizontal[y * self.width + x])
        } else {
            None
        }
    }

    /// Vertical edge at edge column `x` (`0..=width`), row `y`.
    pub fn vertical(&self, x: usize, y: usize) -> Option<WallState> {
        if x <= self.width && y < self.height {
            Some(self.vertical[y * (self.width + 1) + x])
        } else {
            None
        }
    }

    /// Set a horizontal edge. Returns false if out of range.
    pub fn set_horizontal(&mut self, x: usize, y: usize, state: WallState) -> bool {
        if x < self.width && y <= self.height {
            self.horizontal[y * self.width + x] = state;
            true
        } else {
            false
        }
    }

    /// Set a vertical edge. Returns false if out of range.
    pub fn set_vertical(&mut self, x: usize, y: usize, state: WallState) -> bool {
        if x <= self.width && y < self.height {
            self.vertical[y * (self.width + 1) + x] = state;
            true
        } else {
            false
        }
    }

    /// Row-major view of one edge layer.
    pub fn layer(&self, layer: EdgeLayer) -> &[WallState] {
        match layer {
            EdgeLayer::Horizontal => &self.horizontal,
            EdgeLayer::Vertical => &self.vertical,
        }
    }

    /// Edge of `cell` on the side facing `heading`.
    pub fn edge(&self, cell: GridCoord, heading: Heading) -> Option<WallState> {
        if !self.contains(cell) {
            return None;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        match heading {
            Heading::North => self.horizontal(x, y),
            Heading::South => self.horizontal(x, y + 1),
            Heading::West => self.vertical(x, y),
            Heading::East => self.vertical(x + 1, y),
        }
    }

    /// Set the edge of `cell` on the side facing `heading`.
    ///
    /// Returns false if the cell is outside the maze.
    pub fn set_edge(&mut self, cell: GridCoord, heading: Heading, state: WallState) -> bool {
        if !self.contains(cell) {
            return false;
        }
        let (x, y) = (cell.x as usize, cell.y as usize);
        match heading {
            Heading::North => self.set_horizontal(x, y, state),
            Heading::South => self.set_horizontal(x, y + 1, state),
            Heading::West => self.set_vertical(x, y, state),
            Heading::East => self.set_vertical(x + 1, y, state),
        }
    }

    /// Check whether a single step from `from` to `to` is allowed.
    ///
    /// The target must be in bounds (checked before any edge lookup), the
    /// cells must be orthogonally adjacent, and the shared edge must be open.
    pub fn is_move_valid(&self, from: GridCoord, to: GridCoord) -> bool {
        if !self.contains(to) {
            return false;
        }
        match from.heading_to(to) {
            Some(heading) => self.edge(from, heading).is_some_and(WallState::is_open),
            None => false,
        }
    }

    /// Reachable neighbours of `cell` in fixed North, East, South, West order.
    pub fn open_neighbors(&self, cell: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        Heading::ALL
            .into_iter()
            .map(move |h| cell.step(h))
            .filter(move |&next| self.is_move_valid(cell, next))
    }

    /// Mark every side flagged in `walls` as a wall. Unflagged sides are
    /// left untouched.
    ///
    /// Returns false if the cell is outside the maze.
    pub fn plot_cell(&mut self, cell: GridCoord, walls: CellWalls) -> bool {
        if !self.contains(cell) {
            return false;
        }
        for heading in Heading::ALL {
            if walls.get(heading) {
                self.set_edge(cell, heading, WallState::Wall);
            }
        }
        true
    }

    /// Reset all four edges of `cell` to unknown.
    ///
    /// Returns false if the cell is outside the maze.
    pub fn clear_cell(&mut self, cell: GridCoord) -> bool {
        if !self.contains(cell) {
            return false;
        }
        for heading in Heading::ALL {
            self.set_edge(cell, heading, WallState::Unknown);
        }
        true
    }

    /// Copy of this grid with every unknown edge treated as open.
    ///
    /// Mapper output only records walls it has seen; this is the explicit
    /// conversion needed before handing such a grid to the solver.
    pub fn with_unknown_as_open(&self) -> Self {
        let convert = |s: &WallState| match s {
            WallState::Unknown => WallState::Open,
            other => *other,
        };
        Self {
            width: self.width,
            height: self.height,
            horizontal: self.horizontal.iter().map(convert).collect(),
            vertical: self.vertical.iter().map(convert).collect(),
        }
    }

    /// Count of edges in each state as `(unknown, open, wall)`.
    pub fn edge_counts(&self) -> (usize, usize, usize) {
        self.horizontal
            .iter()
            .chain(self.vertical.iter())
            .fold((0, 0, 0), |(u, o, w), s| match s {
                WallState::Unknown => (u + 1, o, w),
                WallState::Open => (u, o + 1, w),
                WallState::Wall => (u, o, w + 1),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let grid = WallGrid::unknown(8, 6);
        assert_eq!(grid.layer(EdgeLayer::Horizontal).len(), 7 * 8);
        assert_eq!(grid.layer(EdgeLayer::Vertical).len(), 6 * 9);
        assert_eq!(grid.layer_dims(EdgeLayer::Horizontal), (7, 8));
        assert_eq!(grid.layer_dims(EdgeLayer::Vertical), (6, 9));
    }

    #[test]
    fn test_border_blocks_exit() {
        let grid = WallGrid::with_border(4, 4);
        let corner = GridCoord::new(0, 0);
        assert_eq!(grid.edge(corner, Heading::North), Some(WallState::Wall));
        assert_eq!(grid.edge(corner, Heading::West), Some(WallState::Wall));
        assert_eq!(grid.edge(corner, Heading::East), Some(WallState::Open));

        let neighbors: Vec<_> = grid.open_neighbors(corner).collect();
        assert_eq!(neighbors, vec![GridCoord::new(1, 0), GridCoord::new(0, 1)]);
    }

    #[test]
    fn test_out_of_bounds_rejected_before_edge() {
        // Fully open grid: perimeter edges are open but leaving is still invalid
        let grid = WallGrid::open(3, 3);
        assert!(!grid.is_move_valid(GridCoord::new(0, 0), GridCoord::new(-1, 0)));
        assert!(!grid.is_move_valid(GridCoord::new(2, 2), GridCoord::new(2, 3)));
        assert!(grid.is_move_valid(GridCoord::new(0, 0), GridCoord::new(1, 0)));
    }

    #[test]
    fn test_edges_are_shared_between_cells() {
        let mut grid = WallGrid::open(3, 3);
        grid.set_edge(GridCoord::new(1, 1), Heading::East, WallState::Wall);

        assert_eq!(
            grid.edge(GridCoord::new(2, 1), Heading::West),
            Some(WallState::Wall)
        );
        assert!(!grid.is_move_valid(GridCoord::new(1, 1), GridCoord::new(2, 1)));
        assert!(!grid.is_move_valid(GridCoord::new(2, 1), GridCoord::new(1, 1)));
    }

    #[test]
    fn test_unknown_is_not_passable() {
        let grid = WallGrid::unknown(3, 3);
        assert!(!grid.is_move_valid(GridCoord::new(0, 0), GridCoord::new(1, 0)));

        let converted = grid.with_unknown_as_open();
        assert!(converted.is_move_valid(GridCoord::new(0, 0), GridCoord::new(1, 0)));
    }

    #[test]
    fn test_plot_and_clear_cell() {
        let mut grid = WallGrid::unknown(4, 4);
        let cell = GridCoord::new(1, 2);
        let walls = CellWalls {
            top: true,
            left: true,
            ..Default::default()
        };

        assert!(grid.plot_cell(cell, walls));
        assert_eq!(grid.horizontal(1, 2), Some(WallState::Wall));
        assert_eq!(grid.vertical(1, 2), Some(WallState::Wall));
        assert_eq!(grid.horizontal(1, 3), Some(WallState::Unknown));
        assert_eq!(grid.edge_counts().2, 2);

        assert!(grid.clear_cell(cell));
        assert_eq!(grid.edge_counts().2, 0);

        assert!(!grid.plot_cell(GridCoord::new(4, 0), walls));
    }

    #[test]
    fn test_from_edges_checks_lengths() {
        let h = vec![WallState::Open; 3 * 2];
        let v = vec![WallState::Open; 2 * 3];
        assert!(WallGrid::from_edges(2, 2, h.clone(), v.clone()).is_some());
        assert!(WallGrid::from_edges(3, 2, h, v).is_none());
    }
}
