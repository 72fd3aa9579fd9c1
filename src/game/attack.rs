use bevy::prelude::*;

use super::body::Body;
use super::components::{Facing, PlayerSlot};
use super::fighter::Fighter;
use crate::config::tuning::Tuning;

/// Short-lived hitbox thrown forward by a fighter.
#[derive(Debug, Clone, PartialEq)]
pub struct Attack {
    pub owner: PlayerSlot,
    pub body: Body,
    pub vx: f32,
    /// Ticks left before the attack fizzles.
    pub lifetime: i32,
    pub alive: bool,
}

impl Attack {
    /// Attach to the owner's leading edge, vertically centered on its body.
    pub fn spawn(owner: &Fighter, tuning: &Tuning) -> Self {
        let size = tuning.attack_size();
        let x = match owner.facing {
            Facing::Right => owner.body.right(),
            Facing::Left => owner.body.left() - size.x,
        };
        let y = owner.body.center_y() - size.y * 0.5;
        Self {
            owner: owner.slot,
            body: Body::new(Vec2::new(x, y), size),
            vx: tuning.attack_speed * owner.facing.sign(),
            lifetime: tuning.attack_lifetime,
            alive: true,
        }
    }

    pub fn update(&mut self) {
        self.body.pos.x += self.vx;
        self.lifetime -= 1;
        if self.lifetime <= 0 {
            self.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_on_the_facing_side() {
        let tuning = Tuning::default();
        let mut f = Fighter::spawn(PlayerSlot::P1, &tuning);

        let right = Attack::spawn(&f, &tuning);
        assert_eq!(right.body.left(), f.body.right());
        assert_eq!(right.body.center_y(), f.body.center_y());
        assert_eq!(right.vx, 12.0);
        assert_eq!(right.lifetime, 30);
        assert_eq!(right.owner, PlayerSlot::P1);

        f.facing = Facing::Left;
        let left = Attack::spawn(&f, &tuning);
        assert_eq!(left.body.right(), f.body.left());
        assert_eq!(left.vx, -12.0);
    }

    #[test]
    fn lifetime_runs_out_after_thirty_ticks() {
        let tuning = Tuning::default();
        let f = Fighter::spawn(PlayerSlot::P2, &tuning);
        let mut atk = Attack::spawn(&f, &tuning);
        let start_x = atk.body.left();
        let start_y = atk.body.top();

        for tick in 1..=30 {
            let before = atk.lifetime;
            atk.update();
            assert_eq!(atk.lifetime, before - 1);
            assert_eq!(atk.alive, tick < 30);
        }
        assert_eq!(atk.lifetime, 0);
        assert_eq!(atk.body.left(), start_x - 12.0 * 30.0);
        assert_eq!(atk.body.top(), start_y);
    }
}
