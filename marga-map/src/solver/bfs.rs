//! Breadth-first search over open edges.

use std::collections::VecDeque;

use crate::core::GridCoord;
use crate::grid::WallGrid;

/// Unweighted shortest-path search on a wall grid.
///
/// Neighbours are expanded in North, East, South, West order, so ties between
/// equally short routes always resolve the same way for the same grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsPathfinder;

impl BfsPathfinder {
    /// Create a pathfinder.
    pub fn new() -> Self {
        Self
    }

    /// Find the shortest path from `start` to `goal`, both inclusive.
    ///
    /// Returns an empty path if either end lies outside the maze or the goal
    /// cannot be reached. `start == goal` yields `[start]`.
    pub fn solve(&self, grid: &WallGrid, start: GridCoord, goal: GridCoord) -> Vec<GridCoord> {
        if !grid.contains(start) || !grid.contains(goal) {
            log::debug!("BFS endpoints out of bounds: {} -> {}", start, goal);
            return Vec::new();
        }

        let width = grid.width();
        let index = |c: GridCoord| c.y as usize * width + c.x as usize;

        let mut visited = vec![false; width * grid.height()];
        let mut parent: Vec<Option<GridCoord>> = vec![None; width * grid.height()];
        let mut queue = VecDeque::new();

        visited[index(start)] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                return Self::reconstruct(&parent, index, start, goal);
            }

            for next in grid.open_neighbors(current) {
                let i = index(next);
                if !visited[i] {
                    visited[i] = true;
                    parent[i] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        log::debug!("No path from {} to {}", start, goal);
        Vec::new()
    }

    fn reconstruct(
        parent: &[Option<GridCoord>],
        index: impl Fn(GridCoord) -> usize,
        start: GridCoord,
        goal: GridCoord,
    ) -> Vec<GridCoord> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match parent[index(current)] {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => return Vec::new(),
            }
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Heading;
    use crate::grid::WallState;

    #[test]
    fn test_start_equals_goal() {
        let grid = WallGrid::open(3, 3);
        let c = GridCoord::new(1, 1);
        assert_eq!(BfsPathfinder::new().solve(&grid, c, c), vec![c]);
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        let grid = WallGrid::open(3, 3);
        let solver = BfsPathfinder::new();
        assert!(solver.solve(&grid, GridCoord::new(-1, 0), GridCoord::new(1, 1)).is_empty());
        assert!(solver.solve(&grid, GridCoord::new(0, 0), GridCoord::new(3, 0)).is_empty());
    }

    #[test]
    fn test_north_first_tie_break() {
        // From (1,1) to (0,0) both N-then-W and W-then-N are shortest.
        // North is expanded first, so the route goes through (1,0).
        let grid = WallGrid::open(3, 3);
        let path = BfsPathfinder::new().solve(&grid, GridCoord::new(1, 1), GridCoord::new(0, 0));
        assert_eq!(
            path,
            vec![GridCoord::new(1, 1), GridCoord::new(1, 0), GridCoord::new(0, 0)]
        );
    }

    #[test]
    fn test_routes_around_wall() {
        let mut grid = WallGrid::with_border(3, 2);
        // Wall between (0,0) and (1,0)
        grid.set_edge(GridCoord::new(0, 0), Heading::East, WallState::Wall);

        let path = BfsPathfinder::new().solve(&grid, GridCoord::new(0, 0), GridCoord::new(1, 0));
        assert_eq!(
            path,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 1),
                GridCoord::new(1, 0),
            ]
        );
        for pair in path.windows(2) {
            assert!(grid.is_move_valid(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_unknown_edges_block_search() {
        let grid = WallGrid::unknown(4, 4);
        let solver = BfsPathfinder::new();
        assert!(solver.solve(&grid, GridCoord::new(0, 0), GridCoord::new(3, 3)).is_empty());

        let path = solver.solve(
            &grid.with_unknown_as_open(),
            GridCoord::new(0, 0),
            GridCoord::new(3, 3),
        );
        assert_eq!(path.len(), 7);
    }
}
