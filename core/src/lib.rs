#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Field Defence simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the simulation systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened during the step. Renderers read the snapshot
//! types defined here and never write back.

mod config;
mod vector;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, SimulationConfig};
pub use vector::Vec2;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Field Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances every simulation component by one logical tick.
    Tick,
    /// Starts releasing a fresh batch of creeps from the origin.
    Summon,
    /// Requests a tower on the provided cell.
    PlaceTower {
        /// Cell that should hold the tower.
        cell: CellCoord,
    },
    /// Requests a tower under a pointer position measured in pixels.
    PlaceTowerAtPixel {
        /// Horizontal pointer coordinate.
        x: f64,
        /// Vertical pointer coordinate.
        y: f64,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just completed, starting at one.
        tick: u64,
    },
    /// Confirms that a creep batch was scheduled.
    SummonStarted {
        /// Number of creeps the batch will release.
        count: u32,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a creep entered the field.
    CreepSpawned {
        /// Identifier assigned to the creep.
        creep: CreepId,
        /// Position the creep starts from.
        position: Vec2,
    },
    /// Reports that a creep reached the goal cell.
    CreepArrived {
        /// Identifier of the creep that escaped.
        creep: CreepId,
    },
    /// Reports that a creep ran out of health.
    CreepDestroyed {
        /// Identifier of the destroyed creep.
        creep: CreepId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Identifier assigned to the new projectile.
        projectile: ProjectileId,
    },
    /// Reports that a projectile connected with a creep.
    ProjectileHit {
        /// Projectile that struck.
        projectile: ProjectileId,
        /// Creep that took the damage.
        creep: CreepId,
    },
    /// Reports that a projectile used up its lifetime.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: ProjectileId,
    },
    /// Announces new values for the economy counters.
    EconomyChanged {
        /// Money available after the change.
        money: u32,
        /// Lives remaining after the change.
        lives: i32,
    },
}

/// Reasons a tower placement request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the field.
    #[error("cell lies outside the field")]
    OutOfBounds,
    /// The requested cell belongs to the permanent border.
    #[error("cell belongs to the field border")]
    Border,
    /// The requested cell already holds a wall or a tower.
    #[error("cell is already occupied")]
    Occupied,
    /// Blocking the cell would disconnect the origin from the goal.
    #[error("placement would cut the origin off from the goal")]
    BlocksPath,
    /// The session cannot afford another tower.
    #[error("not enough money for a tower")]
    InsufficientFunds,
}

/// Occupancy of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Open ground creeps may cross.
    Empty,
    /// Permanent terrain.
    Wall,
    /// Ground claimed by a tower.
    Tower,
}

impl CellState {
    /// Reports whether creeps may traverse the cell.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed because creep positions rounded near the border may
/// fall outside the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Maps a pointer position in pixels onto the cell beneath it.
    ///
    /// Division is floored, so negative pixels land on negative cells that no
    /// field contains.
    #[must_use]
    pub fn from_pixel(x: f64, y: f64, cell_size: f64) -> Self {
        Self::new(
            (x / cell_size).floor() as i32,
            (y / cell_size).floor() as i32,
        )
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Cell displaced by the provided offsets.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }

    /// Column and row displacement from `self` to `other`.
    #[must_use]
    pub const fn delta_to(self, other: CellCoord) -> (i32, i32) {
        (other.column - self.column, other.row - self.row)
    }

    /// Continuous position of the cell centre.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.column), f64::from(self.row))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }
}

/// Unique identifier assigned to a creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreepId(u32);

impl CreepId {
    /// Creates a new creep identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Remaining hit points of a creep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Wraps a raw hit point count.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw hit point count.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Health left after absorbing `damage`, floored at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Money and lives of the running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomyState {
    /// Money available for towers.
    pub money: u32,
    /// Creeps that may still escape; may drop below zero.
    pub lives: i32,
}

impl EconomyState {
    /// Seeds the counters from the configured starting values.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            money: config.starting_money,
            lives: config.starting_lives,
        }
    }

    /// Reports whether a purchase of `cost` is affordable.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.money >= cost
    }
}

/// Immutable representation of a single creep used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CreepSnapshot {
    /// Unique identifier assigned to the creep.
    pub id: CreepId,
    /// Continuous position in cells.
    pub position: Vec2,
    /// Velocity in cells per tick.
    pub velocity: Vec2,
    /// Remaining hit points.
    pub health: Health,
}

/// Read-only snapshot describing all creeps in insertion order.
#[derive(Clone, Debug, Default)]
pub struct CreepView {
    snapshots: Vec<CreepSnapshot>,
}

impl CreepView {
    /// Creates a new creep view from snapshots already in insertion order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<CreepSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured creep snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &CreepSnapshot> {
        self.snapshots.iter()
    }

    /// Number of creeps captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no creeps were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Continuous position in cells.
    pub position: Vec2,
    /// Velocity in cells per tick.
    pub velocity: Vec2,
    /// Ticks left before the projectile expires.
    pub lifetime: u32,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from snapshots in insertion order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectiles were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell the tower stands on.
    pub cell: CellCoord,
    /// Ticks until the tower may fire again.
    pub cooldown: u32,
}

/// Read-only snapshot describing all towers in placement order.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no towers were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Read-only view into the dense cell matrix, stored row-major.
#[derive(Clone, Copy, Debug)]
pub struct CellMatrix<'a> {
    cells: &'a [CellState],
    columns: u32,
    rows: u32,
}

impl<'a> CellMatrix<'a> {
    /// Captures a new matrix view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellState], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// State of the provided cell, if it lies within the field.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellState> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellState> + 'a {
        self.cells.iter().copied()
    }

    /// Provides the dimensions of the underlying matrix.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}
