use bevy::prelude::*;

// ── Game phase state ────────────────────────────────────────────────

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Title,
    StageSelect,
    Battle,
    Paused,
    Settings,
    /// K.O. / Time Up banner between a finished round and stage select.
    RoundOver,
}

// ── Identity ────────────────────────────────────────────────────────

/// Which side of the keyboard a fighter (or an attack's owner) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerSlot {
    P1,
    P2,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::P1, PlayerSlot::P2];

    pub fn index(self) -> usize {
        match self {
            Self::P1 => 0,
            Self::P2 => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::P1 => "P1",
            Self::P2 => "P2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// +1 for Right, -1 for Left.
    pub fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

// ── Render-side markers ─────────────────────────────────────────────

/// Marker: tag all battle-screen entities for cleanup when leaving the battle.
#[derive(Component)]
pub struct InBattle;

/// Sprite mirroring one fighter of the simulation.
#[derive(Component)]
pub struct FighterSprite(pub PlayerSlot);

/// Sprite mirroring one live attack (pooled by index).
#[derive(Component)]
pub struct AttackSprite(pub usize);
