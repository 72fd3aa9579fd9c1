use bevy::prelude::*;

use super::body::Body;
use super::components::{Facing, PlayerSlot};
use super::input::{Bindings, InputSnapshot};
use crate::config::tuning::Tuning;

/// One player's body on the floor.
#[derive(Debug, Clone)]
pub struct Fighter {
    pub slot: PlayerSlot,
    pub body: Body,
    pub velocity: Vec2,
    pub on_ground: bool,
    /// May read <= 0 on the tick a finishing blow lands.
    pub hp: i32,
    pub facing: Facing,
    pub bindings: Bindings,
    pub color: Color,
}

impl Fighter {
    /// Spawn standing on the floor at the slot's start position.
    pub fn spawn(slot: PlayerSlot, tuning: &Tuning) -> Self {
        let (x, facing, color) = match slot {
            PlayerSlot::P1 => (tuning.p1_spawn_x, Facing::Right, Color::srgb(0.0, 0.0, 1.0)),
            PlayerSlot::P2 => (tuning.p2_spawn_x, Facing::Left, Color::srgb(1.0, 0.0, 0.0)),
        };
        let mut body = Body::new(Vec2::new(x, 0.0), tuning.fighter_size());
        body.set_bottom(tuning.floor_y());
        Self {
            slot,
            body,
            velocity: Vec2::ZERO,
            on_ground: true,
            hp: tuning.max_hp,
            facing,
            bindings: Bindings::for_slot(slot),
            color,
        }
    }

    /// Advance one tick from held input, then gravity, then floor clamp.
    pub fn update(&mut self, input: &impl InputSnapshot, tuning: &Tuning) {
        self.velocity.x = 0.0;

        // Right is read after left so holding both resolves to Right.
        if input.pressed(self.bindings.left) {
            self.velocity.x = -tuning.walk_speed;
            self.facing = Facing::Left;
        }
        if input.pressed(self.bindings.right) {
            self.velocity.x = tuning.walk_speed;
            self.facing = Facing::Right;
        }

        if input.pressed(self.bindings.jump) && self.on_ground {
            self.velocity.y = tuning.jump_velocity;
            self.on_ground = false;
        }

        self.velocity.y += tuning.gravity;
        self.body.pos += self.velocity;

        let floor = tuning.floor_y();
        if self.body.bottom() >= floor {
            self.body.set_bottom(floor);
            self.velocity.y = 0.0;
            self.on_ground = true;
        }
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::input::KeySnapshot;

    fn p1() -> (Fighter, Tuning) {
        let tuning = Tuning::default();
        (Fighter::spawn(PlayerSlot::P1, &tuning), tuning)
    }

    fn grounded_invariant(f: &Fighter, tuning: &Tuning) -> bool {
        f.on_ground == (f.body.bottom() == tuning.floor_y() && f.velocity.y == 0.0)
    }

    #[test]
    fn spawns_grounded_with_full_hp() {
        let (f, tuning) = p1();
        assert!(f.on_ground);
        assert_eq!(f.body.bottom(), 550.0);
        assert_eq!(f.body.left(), 200.0);
        assert_eq!(f.hp, 100);
        assert_eq!(f.facing, Facing::Right);
        assert!(grounded_invariant(&f, &tuning));
    }

    #[test]
    fn idle_stays_on_floor() {
        let (mut f, tuning) = p1();
        for _ in 0..10 {
            f.update(&KeySnapshot::none(), &tuning);
            assert!(f.on_ground);
            assert_eq!(f.velocity, Vec2::ZERO);
            assert_eq!(f.body.bottom(), 550.0);
        }
    }

    #[test]
    fn walking_left_then_right() {
        let (mut f, tuning) = p1();
        f.update(&KeySnapshot::holding(&[KeyCode::KeyA]), &tuning);
        assert_eq!(f.body.left(), 194.0);
        assert_eq!(f.facing, Facing::Left);

        f.update(&KeySnapshot::holding(&[KeyCode::KeyD]), &tuning);
        assert_eq!(f.body.left(), 200.0);
        assert_eq!(f.facing, Facing::Right);

        // No momentum once released.
        f.update(&KeySnapshot::none(), &tuning);
        assert_eq!(f.body.left(), 200.0);
        assert_eq!(f.velocity.x, 0.0);
    }

    #[test]
    fn both_directions_resolve_to_right() {
        let (mut f, tuning) = p1();
        f.facing = Facing::Left;
        f.update(&KeySnapshot::holding(&[KeyCode::KeyA, KeyCode::KeyD]), &tuning);
        assert_eq!(f.velocity.x, 6.0);
        assert_eq!(f.facing, Facing::Right);
    }

    #[test]
    fn jump_arc_lands_back_on_floor() {
        let (mut f, tuning) = p1();
        f.update(&KeySnapshot::holding(&[KeyCode::KeyW]), &tuning);
        assert!(!f.on_ground);
        assert_eq!(f.velocity.y, -19.0);
        assert_eq!(f.body.bottom(), 531.0);

        let mut ticks = 1;
        let mut peak = f.body.bottom();
        while !f.on_ground {
            let vy = f.velocity.y;
            f.update(&KeySnapshot::none(), &tuning);
            if !f.on_ground {
                // Gravity adds exactly one per tick while airborne.
                assert_eq!(f.velocity.y, vy + 1.0);
            }
            assert!(grounded_invariant(&f, &tuning));
            assert!(f.body.bottom() <= 550.0);
            peak = peak.min(f.body.bottom());
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        // 19 + 18 + ... + 1
        assert_eq!(peak, 550.0 - 190.0);
        assert_eq!(f.body.bottom(), 550.0);
        assert_eq!(f.velocity.y, 0.0);
    }

    #[test]
    fn jump_while_airborne_is_ignored() {
        let (mut f, tuning) = p1();
        f.update(&KeySnapshot::holding(&[KeyCode::KeyW]), &tuning);
        let vy = f.velocity.y;
        f.update(&KeySnapshot::holding(&[KeyCode::KeyW]), &tuning);
        assert_eq!(f.velocity.y, vy + 1.0);
    }

    #[test]
    fn other_players_keys_do_nothing() {
        let (mut f, tuning) = p1();
        f.update(
            &KeySnapshot::holding(&[KeyCode::ArrowLeft, KeyCode::ArrowUp]),
            &tuning,
        );
        assert_eq!(f.body.left(), 200.0);
        assert!(f.on_ground);
    }

    #[test]
    fn no_horizontal_bounds() {
        let (mut f, tuning) = p1();
        for _ in 0..100 {
            f.update(&KeySnapshot::holding(&[KeyCode::KeyA]), &tuning);
        }
        assert_eq!(f.body.left(), 200.0 - 600.0);
    }
}
