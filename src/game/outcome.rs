use super::clock::MatchClock;
use super::components::PlayerSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player(PlayerSlot),
    Draw,
}

impl Winner {
    pub fn label(self) -> &'static str {
        match self {
            Self::Player(slot) => slot.label(),
            Self::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    KnockOut,
    TimeUp,
}

impl EndReason {
    pub fn banner(self) -> &'static str {
        match self {
            Self::KnockOut => "K.O.",
            Self::TimeUp => "Time Up",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub winner: Winner,
    pub reason: EndReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundStatus {
    #[default]
    InProgress,
    Ended(RoundResult),
}

/// Session win counters. Never reset while the program runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scoreboard {
    pub p1_wins: u64,
    pub p2_wins: u64,
}

impl Scoreboard {
    pub fn wins(&self, slot: PlayerSlot) -> u64 {
        match slot {
            PlayerSlot::P1 => self.p1_wins,
            PlayerSlot::P2 => self.p2_wins,
        }
    }

    pub fn record(&mut self, winner: Winner) {
        match winner {
            Winner::Player(PlayerSlot::P1) => self.p1_wins += 1,
            Winner::Player(PlayerSlot::P2) => self.p2_wins += 1,
            Winner::Draw => {}
        }
    }
}

/// Returns the result if the round is over: a knockout or the clock at zero.
///
/// hp is compared raw, so a fighter driven below zero still loses to one
/// standing at zero or above.
pub fn evaluate(hp1: i32, hp2: i32, clock: &MatchClock) -> Option<RoundResult> {
    let knocked_out = hp1 <= 0 || hp2 <= 0;
    if !knocked_out && !clock.is_expired() {
        return None;
    }

    let winner = if hp1 > hp2 {
        Winner::Player(PlayerSlot::P1)
    } else if hp2 > hp1 {
        Winner::Player(PlayerSlot::P2)
    } else {
        Winner::Draw
    };
    let reason = if knocked_out {
        EndReason::KnockOut
    } else {
        EndReason::TimeUp
    };
    Some(RoundResult { winner, reason })
}
