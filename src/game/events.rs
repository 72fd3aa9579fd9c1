use bevy::prelude::*;

use super::components::PlayerSlot;
use super::outcome::RoundResult;

/// Everything noteworthy that happened during one simulation tick.
///
/// The simulation collects these into a `Vec`; the game plugin forwards them
/// as messages for HUD and logging consumers.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    AttackLaunched {
        owner: PlayerSlot,
    },
    FighterHit {
        attacker: PlayerSlot,
        target: PlayerSlot,
        hp: i32,
    },
    RoundEnded(RoundResult),
}
