#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Navigation grid that owns cell occupancy and the direction field creeps
//! follow toward the goal.
//!
//! The field is rebuilt from scratch whenever a tower claims a cell. A
//! placement that would leave the origin without a route to the goal is
//! rolled back before anyone can observe it.

use std::{cmp::Reverse, collections::BinaryHeap};

use field_defence_core::{CellCoord, CellMatrix, CellState, PlacementError};

/// Cost of moving between two orthogonally adjacent cells.
const EDGE_COST: u32 = 1;

/// Occupancy grid with a shortest-path direction field rooted at the goal.
#[derive(Clone, Debug)]
pub struct NavigationGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellState>,
    origin: CellCoord,
    goal: CellCoord,
    field: DirectionField,
}

impl NavigationGrid {
    /// Builds the standard field layout for the provided dimensions.
    ///
    /// The top and bottom rows are walls. Interior columns `2..=columns - 4`
    /// are open ground, while the remaining edge columns are walls except for
    /// the middle row, which carves an entry corridor on the left and an exit
    /// corridor on the right. Creeps enter at the left end of that row and
    /// leave at its right end.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let middle = i32::try_from(rows / 2).unwrap_or(0);
        let last_column = i32::try_from(columns).unwrap_or(i32::MAX) - 1;
        let last_row = i32::try_from(rows).unwrap_or(i32::MAX) - 1;
        Self::from_fn(
            columns,
            rows,
            CellCoord::new(0, middle),
            CellCoord::new(last_column.max(0), middle),
            |cell| {
                if cell.row() == 0 || cell.row() == last_row {
                    CellState::Wall
                } else if cell.column() > 1 && cell.column() < last_column - 2 {
                    CellState::Empty
                } else if cell.row() == middle {
                    CellState::Empty
                } else {
                    CellState::Wall
                }
            },
        )
    }

    /// Builds a grid whose cells are produced by `layout`.
    ///
    /// Cells are visited in row-major order. The direction field is computed
    /// immediately; an origin with no route simply has no next step.
    #[must_use]
    pub fn from_fn<F>(
        columns: u32,
        rows: u32,
        origin: CellCoord,
        goal: CellCoord,
        mut layout: F,
    ) -> Self
    where
        F: FnMut(CellCoord) -> CellState,
    {
        let mut cells = Vec::with_capacity(cell_count(columns, rows));
        for row in 0..i32::try_from(rows).unwrap_or(0) {
            for column in 0..i32::try_from(columns).unwrap_or(0) {
                cells.push(layout(CellCoord::new(column, row)));
            }
        }

        let mut grid = Self {
            columns,
            rows,
            cells,
            origin,
            goal,
            field: DirectionField::default(),
        };
        grid.field = grid.compute_field();
        grid
    }

    /// Attempts to claim `cell` for a tower.
    ///
    /// Border cells, cells outside the field and cells that are not empty are
    /// refused outright. Otherwise the cell is provisionally occupied and the
    /// direction field recomputed; if the origin loses its route to the goal
    /// the cell is released again and the previous field stays in place.
    pub fn try_place_obstacle(&mut self, cell: CellCoord) -> Result<(), PlacementError> {
        let index = self.index(cell).ok_or(PlacementError::OutOfBounds)?;
        if self.is_border(cell) {
            return Err(PlacementError::Border);
        }
        if self.cells[index] != CellState::Empty {
            return Err(PlacementError::Occupied);
        }

        self.cells[index] = CellState::Tower;
        let candidate = self.compute_field();
        if self.origin != self.goal && candidate.parent(self.origin).is_none() {
            self.cells[index] = CellState::Empty;
            return Err(PlacementError::BlocksPath);
        }

        self.field = candidate;
        Ok(())
    }

    /// Reports whether a creep may stand on `cell`.
    ///
    /// Cells outside the field are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.cell_state(cell).is_some_and(CellState::is_walkable)
    }

    /// Adjacent cell one step closer to the goal, if `cell` has a route.
    #[must_use]
    pub fn next_step(&self, cell: CellCoord) -> Option<CellCoord> {
        self.field.parent(cell)
    }

    /// Far end of the straight run that starts at [`Self::next_step`].
    ///
    /// Heading toward the waypoint moves a creep in exactly the direction the
    /// single-step chain would, but the target stays fixed for as long as the
    /// path keeps going straight.
    #[must_use]
    pub fn waypoint(&self, cell: CellCoord) -> Option<CellCoord> {
        self.field.waypoint(cell)
    }

    /// Number of steps between `cell` and the goal, if reachable.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.field.distance(cell)
    }

    /// Occupancy of `cell`, if it lies within the field.
    #[must_use]
    pub fn cell_state(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Read-only view of every cell for background rendering.
    #[must_use]
    pub fn cells(&self) -> CellMatrix<'_> {
        CellMatrix::new(&self.cells, self.columns, self.rows)
    }

    /// Cell creeps enter from.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        self.origin
    }

    /// Cell creeps try to reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    fn is_border(&self, cell: CellCoord) -> bool {
        let last_column = i64::from(self.columns) - 1;
        let last_row = i64::from(self.rows) - 1;
        cell.column() <= 0
            || cell.row() <= 0
            || i64::from(cell.column()) >= last_column
            || i64::from(cell.row()) >= last_row
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        index(self.columns, self.rows, cell)
    }

    /// Runs Dijkstra outward from the goal over walkable cells.
    fn compute_field(&self) -> DirectionField {
        let count = self.cells.len();
        let mut field = DirectionField {
            columns: self.columns,
            rows: self.rows,
            distances: vec![u32::MAX; count],
            parents: vec![None; count],
            waypoints: vec![None; count],
        };

        let Some(goal_index) = self.index(self.goal) else {
            return field;
        };
        if !self.cells[goal_index].is_walkable() {
            return field;
        }

        let mut heap: BinaryHeap<Reverse<(u32, usize)>> = BinaryHeap::new();
        field.distances[goal_index] = 0;
        heap.push(Reverse((0, goal_index)));

        while let Some(Reverse((distance, current_index))) = heap.pop() {
            if distance > field.distances[current_index] {
                continue;
            }

            let current = self.coord(current_index);
            let next_distance = distance.saturating_add(EDGE_COST);

            for neighbor in neighbors(current) {
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };

                if !self.cells[neighbor_index].is_walkable() {
                    continue;
                }

                if next_distance >= field.distances[neighbor_index] {
                    continue;
                }

                field.distances[neighbor_index] = next_distance;
                field.parents[neighbor_index] = Some(current);
                heap.push(Reverse((next_distance, neighbor_index)));
            }
        }

        field.compress_runs();
        field
    }

    fn coord(&self, index: usize) -> CellCoord {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        let column = i32::try_from(index % width).unwrap_or(i32::MAX);
        let row = i32::try_from(index / width).unwrap_or(i32::MAX);
        CellCoord::new(column, row)
    }
}

/// Shortest-path tree toward the goal, stored densely in row-major order.
#[derive(Clone, Debug, Default)]
struct DirectionField {
    columns: u32,
    rows: u32,
    distances: Vec<u32>,
    parents: Vec<Option<CellCoord>>,
    waypoints: Vec<Option<CellCoord>>,
}

impl DirectionField {
    fn parent(&self, cell: CellCoord) -> Option<CellCoord> {
        index(self.columns, self.rows, cell).and_then(|index| self.parents[index])
    }

    fn waypoint(&self, cell: CellCoord) -> Option<CellCoord> {
        index(self.columns, self.rows, cell).and_then(|index| self.waypoints[index])
    }

    fn distance(&self, cell: CellCoord) -> Option<u32> {
        index(self.columns, self.rows, cell)
            .map(|index| self.distances[index])
            .filter(|distance| *distance != u32::MAX)
    }

    /// Collapses each parent pointer along the straight run it starts.
    fn compress_runs(&mut self) {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        for index in 0..self.parents.len() {
            let Some(first) = self.parents[index] else {
                continue;
            };
            let column = i32::try_from(index % width).unwrap_or(i32::MAX);
            let row = i32::try_from(index / width).unwrap_or(i32::MAX);
            let heading = CellCoord::new(column, row).delta_to(first);

            let mut end = first;
            while let Some(next) = self.parent(end) {
                if end.delta_to(next) != heading {
                    break;
                }
                end = next;
            }
            self.waypoints[index] = Some(end);
        }
    }
}

fn neighbors(cell: CellCoord) -> [CellCoord; 4] {
    [
        cell.offset(0, -1),
        cell.offset(1, 0),
        cell.offset(0, 1),
        cell.offset(-1, 0),
    ]
}

fn cell_count(columns: u32, rows: u32) -> usize {
    let count = u64::from(columns) * u64::from(rows);
    usize::try_from(count).unwrap_or(0)
}

fn index(columns: u32, rows: u32, cell: CellCoord) -> Option<usize> {
    let column = u32::try_from(cell.column()).ok()?;
    let row = u32::try_from(cell.row()).ok()?;
    if column >= columns || row >= rows {
        return None;
    }
    let width = usize::try_from(columns).ok()?;
    usize::try_from(row)
        .ok()?
        .checked_mul(width)?
        .checked_add(usize::try_from(column).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_grid(columns: u32, rows: u32, goal: CellCoord) -> NavigationGrid {
        NavigationGrid::from_fn(columns, rows, CellCoord::new(0, 0), goal, |_| {
            CellState::Empty
        })
    }

    #[test]
    fn goal_has_zero_distance_and_no_step() {
        let grid = open_grid(3, 4, CellCoord::new(1, 2));

        assert_eq!(grid.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(grid.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(grid.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(grid.distance(CellCoord::new(0, 0)), Some(3));
        assert_eq!(grid.next_step(CellCoord::new(1, 2)), None);
    }

    #[test]
    fn walls_are_never_expanded() {
        let wall = CellCoord::new(1, 1);
        let grid = NavigationGrid::from_fn(
            3,
            4,
            CellCoord::new(1, 0),
            CellCoord::new(1, 2),
            |cell| {
                if cell == wall {
                    CellState::Wall
                } else {
                    CellState::Empty
                }
            },
        );

        assert_eq!(grid.distance(wall), None);
        assert_eq!(grid.next_step(wall), None);
        assert_eq!(grid.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(grid.distance(CellCoord::new(0, 1)), Some(2));
        for column in 0..3 {
            for row in 0..4 {
                let cell = CellCoord::new(column, row);
                assert_ne!(grid.next_step(cell), Some(wall));
            }
        }
    }

    #[test]
    fn next_step_is_adjacent_and_descends() {
        let grid = open_grid(5, 5, CellCoord::new(4, 2));
        for column in 0..5 {
            for row in 0..5 {
                let cell = CellCoord::new(column, row);
                let Some(next) = grid.next_step(cell) else {
                    assert_eq!(cell, grid.goal());
                    continue;
                };
                assert_eq!(cell.manhattan_distance(next), 1);
                assert_eq!(grid.distance(next).map(|d| d + 1), grid.distance(cell));
            }
        }
    }

    #[test]
    fn waypoint_points_to_end_of_straight_run() {
        let grid = NavigationGrid::new(12, 9);
        let waypoint = grid.waypoint(grid.origin()).expect("origin has a route");
        let next = grid.next_step(grid.origin()).expect("origin has a route");

        assert_eq!(grid.origin().delta_to(next), (1, 0));
        let (dx, dy) = grid.origin().delta_to(waypoint);
        assert_eq!(dy, 0);
        assert!(dx >= 1);

        let mut cursor = grid.origin();
        while cursor != waypoint {
            let step = grid.next_step(cursor).expect("run continues");
            assert_eq!(cursor.delta_to(step), (1, 0));
            cursor = step;
        }
    }

    #[test]
    fn default_layout_carves_corridors() {
        let grid = NavigationGrid::new(12, 9);
        assert_eq!(grid.origin(), CellCoord::new(0, 4));
        assert_eq!(grid.goal(), CellCoord::new(11, 4));
        assert!(grid.is_walkable(CellCoord::new(0, 4)));
        assert!(grid.is_walkable(CellCoord::new(1, 4)));
        assert!(!grid.is_walkable(CellCoord::new(1, 3)));
        assert!(grid.is_walkable(CellCoord::new(2, 1)));
        assert!(grid.is_walkable(CellCoord::new(8, 7)));
        assert!(!grid.is_walkable(CellCoord::new(9, 7)));
        assert!(!grid.is_walkable(CellCoord::new(5, 0)));
        assert!(!grid.is_walkable(CellCoord::new(-1, 4)));
    }

    #[test]
    fn border_and_outside_cells_are_refused() {
        let mut grid = NavigationGrid::new(12, 9);
        assert_eq!(
            grid.try_place_obstacle(CellCoord::new(0, 3)),
            Err(PlacementError::Border)
        );
        assert_eq!(
            grid.try_place_obstacle(CellCoord::new(11, 4)),
            Err(PlacementError::Border)
        );
        assert_eq!(
            grid.try_place_obstacle(CellCoord::new(12, 4)),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            grid.try_place_obstacle(CellCoord::new(3, -1)),
            Err(PlacementError::OutOfBounds)
        );
    }

    #[test]
    fn interior_wall_counts_as_occupied() {
        let mut grid = NavigationGrid::new(12, 9);
        assert_eq!(
            grid.try_place_obstacle(CellCoord::new(1, 2)),
            Err(PlacementError::Occupied)
        );
    }

    #[test]
    fn successful_placement_reroutes_around_tower() {
        let mut grid = NavigationGrid::new(12, 9);
        let tower = CellCoord::new(5, 4);
        let before = grid.distance(grid.origin());

        assert_eq!(grid.try_place_obstacle(tower), Ok(()));
        assert_eq!(grid.cell_state(tower), Some(CellState::Tower));
        assert!(!grid.is_walkable(tower));
        assert_eq!(grid.distance(grid.origin()), before.map(|d| d + 2));
    }
}
