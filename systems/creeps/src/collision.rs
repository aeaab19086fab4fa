//! Pairwise elastic collisions between equal-mass creeps.

use crate::Creep;

/// Resolves every overlapping, approaching pair of creeps once.
///
/// Pairs are visited in insertion order. Bounding boxes with side
/// `2 * radius` reject most pairs before the exact distance test. Overlapping
/// pairs whose relative velocity does not close the gap are left alone; the
/// rest swap the velocity components along the line joining their centres and
/// keep their tangential components.
pub fn resolve_collisions(creeps: &mut [Creep], radius: f64) {
    let reach = radius * 2.0;
    let reach2 = reach * reach;

    for first in 0..creeps.len() {
        for second in first + 1..creeps.len() {
            let first_position = creeps[first].position();
            let second_position = creeps[second].position();

            if (first_position.x - second_position.x).abs() > reach
                || (first_position.y - second_position.y).abs() > reach
            {
                continue;
            }

            let separation = second_position - first_position;
            if separation.norm2() > reach2 {
                continue;
            }

            let first_velocity = creeps[first].velocity();
            let second_velocity = creeps[second].velocity();
            if (second_velocity - first_velocity).dot(separation) >= 0.0 {
                continue;
            }

            let first_normal = first_velocity.project_onto(separation);
            let second_normal = second_velocity.project_onto(separation);
            creeps[first].set_velocity(first_velocity - first_normal + second_normal);
            creeps[second].set_velocity(second_velocity - second_normal + first_normal);
        }
    }
}
