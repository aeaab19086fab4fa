//! Kinematics of a single creep.

use field_defence_core::{CellCoord, CreepId, CreepSnapshot, Health, Vec2};
use field_defence_system_navigation::NavigationGrid;

use crate::CreepTuning;

/// A continuously moving creep.
///
/// The creep tracks a discrete cell alongside its position. That cell is the
/// rounded look-ahead point from the last successful move, and it indexes the
/// direction field and the goal test.
#[derive(Clone, Debug, PartialEq)]
pub struct Creep {
    id: CreepId,
    position: Vec2,
    velocity: Vec2,
    cell: CellCoord,
    health: Health,
}

impl Creep {
    /// Creates a creep at `position` whose current cell is the rounded position.
    #[must_use]
    pub fn new(id: CreepId, position: Vec2, velocity: Vec2, health: Health) -> Self {
        Self {
            id,
            position,
            velocity,
            cell: position.round(),
            health,
        }
    }

    /// Identifier of the creep.
    #[must_use]
    pub const fn id(&self) -> CreepId {
        self.id
    }

    /// Continuous position in cells.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in cells per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Discrete cell used for navigation.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Immutable copy of the creep for render queries.
    #[must_use]
    pub fn snapshot(&self) -> CreepSnapshot {
        CreepSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            health: self.health,
        }
    }

    pub(crate) fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub(crate) fn absorb(&mut self, damage: u32) -> Health {
        self.health = self.health.saturating_sub(damage);
        self.health
    }

    /// Sheds `deceleration` from the speed, stopping dead below it.
    pub(crate) fn decelerate(&mut self, deceleration: f64) {
        let speed = self.velocity.norm();
        if speed < deceleration {
            self.velocity = Vec2::ZERO;
        } else if speed > 0.0 {
            self.velocity = self.velocity.scale((speed - deceleration) / speed);
        }
    }

    /// Accelerates toward the waypoint of the current cell while under the
    /// speed cap. Cells without a waypoint leave the creep coasting.
    pub(crate) fn steer(&mut self, grid: &NavigationGrid, tuning: &CreepTuning) {
        let Some(target) = grid.waypoint(self.cell) else {
            return;
        };
        if self.velocity.norm2() >= tuning.max_speed * tuning.max_speed {
            return;
        }
        if let Some(push) = (target.center() - self.position).with_length(tuning.acceleration) {
            self.velocity += push;
        }
    }

    /// Moves the creep one tick, bouncing off cells the grid refuses.
    ///
    /// When the look-ahead cell is blocked, each velocity axis on which that
    /// cell differs from the current one is reversed and the creep holds its
    /// place for the tick.
    pub(crate) fn advance(&mut self, grid: &NavigationGrid, radius: f64) {
        let speed = self.velocity.norm();
        if speed == 0.0 {
            return;
        }

        let look_ahead = (self.position + self.velocity.scale((speed + radius) / speed)).round();
        if look_ahead != self.cell && !grid.is_walkable(look_ahead) {
            let (columns, rows) = self.cell.delta_to(look_ahead);
            if columns != 0 {
                self.velocity.x = -self.velocity.x;
            }
            if rows != 0 {
                self.velocity.y = -self.velocity.y;
            }
            return;
        }

        self.cell = look_ahead;
        self.position += self.velocity;
    }
}
