use bevy::prelude::*;

use super::components::PlayerSlot;

/// The four keys one player fights with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    pub left: KeyCode,
    pub right: KeyCode,
    pub jump: KeyCode,
    pub attack: KeyCode,
}

impl Bindings {
    pub const P1: Self = Self {
        left: KeyCode::KeyA,
        right: KeyCode::KeyD,
        jump: KeyCode::KeyW,
        attack: KeyCode::KeyF,
    };

    pub const P2: Self = Self {
        left: KeyCode::ArrowLeft,
        right: KeyCode::ArrowRight,
        jump: KeyCode::ArrowUp,
        attack: KeyCode::ControlRight,
    };

    pub fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::P1 => Self::P1,
            PlayerSlot::P2 => Self::P2,
        }
    }

    /// One-line control legend for the bottom bar.
    pub fn legend(slot: PlayerSlot) -> &'static str {
        match slot {
            PlayerSlot::P1 => "P1: A/D Move  W Jump  F Attack",
            PlayerSlot::P2 => "P2: ←/→ Move  ↑ Jump  RCTRL Attack",
        }
    }
}

/// Held-key state for one tick.
pub trait InputSnapshot {
    fn pressed(&self, key: KeyCode) -> bool;
}

impl InputSnapshot for ButtonInput<KeyCode> {
    fn pressed(&self, key: KeyCode) -> bool {
        ButtonInput::pressed(self, key)
    }
}

/// Attack key-down edges: written in Update, consumed in FixedUpdate.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AttackIntent {
    pub p1: bool,
    pub p2: bool,
}

impl AttackIntent {
    pub fn get(&self, slot: PlayerSlot) -> bool {
        match slot {
            PlayerSlot::P1 => self.p1,
            PlayerSlot::P2 => self.p2,
        }
    }

    pub fn set(&mut self, slot: PlayerSlot) {
        match slot {
            PlayerSlot::P1 => self.p1 = true,
            PlayerSlot::P2 => self.p2 = true,
        }
    }

    /// Hand the latched edges to the simulation and clear them.
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Latch attack presses so a key-down between two fixed ticks is not lost.
pub fn latch_attack_input(keyboard: Res<ButtonInput<KeyCode>>, mut intent: ResMut<AttackIntent>) {
    for slot in PlayerSlot::ALL {
        if keyboard.just_pressed(Bindings::for_slot(slot).attack) {
            intent.set(slot);
        }
    }
}

/// Fixed set of held keys, for driving the simulation without a window.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct KeySnapshot {
    held: Vec<KeyCode>,
}

#[cfg(test)]
impl KeySnapshot {
    pub fn none() -> Self {
        Self::default()
    }

    /// Panics on keys neither player is bound to.
    pub fn holding(keys: &[KeyCode]) -> Self {
        for key in keys {
            let bound = PlayerSlot::ALL.iter().any(|&slot| {
                let b = Bindings::for_slot(slot);
                [b.left, b.right, b.jump, b.attack].contains(key)
            });
            assert!(bound, "{key:?} is not bound to any player");
        }
        Self { held: keys.to_vec() }
    }
}

#[cfg(test)]
impl InputSnapshot for KeySnapshot {
    fn pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}
