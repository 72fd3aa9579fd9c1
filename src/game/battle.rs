use bevy::prelude::*;

use super::attack::Attack;
use super::clock::MatchClock;
use super::collision;
use super::components::PlayerSlot;
use super::events::BattleEvent;
use super::fighter::Fighter;
use super::input::{AttackIntent, InputSnapshot};
use super::outcome::{self, RoundStatus, Scoreboard};
use super::stage::StageId;
use crate::config::tuning::Tuning;

/// The whole fight: both fighters, live attacks, clock and score.
///
/// Owned by the app as a resource but free of any ECS state, so it can be
/// stepped directly in tests.
#[derive(Resource, Debug, Clone)]
pub struct BattleState {
    pub fighters: [Fighter; 2],
    pub attacks: Vec<Attack>,
    pub clock: MatchClock,
    pub status: RoundStatus,
    pub score: Scoreboard,
    pub stage: StageId,
    frozen: bool,
}

impl BattleState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fighters: [
                Fighter::spawn(PlayerSlot::P1, tuning),
                Fighter::spawn(PlayerSlot::P2, tuning),
            ],
            attacks: Vec::new(),
            clock: MatchClock::new(tuning.match_time, tuning.critical_time),
            status: RoundStatus::InProgress,
            score: Scoreboard::default(),
            stage: StageId::default(),
            frozen: false,
        }
    }

    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        &self.fighters[slot.index()]
    }

    /// Fresh round on `stage`: fighters back at their marks, clock full.
    /// The score carries over.
    pub fn start_round(&mut self, stage: StageId, tuning: &Tuning) {
        self.fighters = [
            Fighter::spawn(PlayerSlot::P1, tuning),
            Fighter::spawn(PlayerSlot::P2, tuning),
        ];
        self.attacks.clear();
        self.clock = MatchClock::new(tuning.match_time, tuning.critical_time);
        self.status = RoundStatus::InProgress;
        self.stage = stage;
        self.frozen = false;
        info!("Round start on {}", stage.spec().name);
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_running(&self) -> bool {
        !self.frozen && self.status == RoundStatus::InProgress
    }

    /// One simulation tick.
    ///
    /// Order: attack spawns from this tick's key-down edges, fighter updates,
    /// attack updates, hit resolution, clock, outcome check. Does nothing
    /// while frozen or after the round has ended.
    pub fn step(
        &mut self,
        input: &impl InputSnapshot,
        triggers: AttackIntent,
        dt: f32,
        tuning: &Tuning,
    ) -> Vec<BattleEvent> {
        let mut events = Vec::new();
        if !self.is_running() {
            return events;
        }

        for slot in PlayerSlot::ALL {
            if triggers.get(slot) {
                let atk = Attack::spawn(self.fighter(slot), tuning);
                self.attacks.push(atk);
                events.push(BattleEvent::AttackLaunched { owner: slot });
            }
        }

        for fighter in &mut self.fighters {
            fighter.update(input, tuning);
        }

        for atk in &mut self.attacks {
            atk.update();
        }

        collision::resolve_hits(
            &mut self.attacks,
            &mut self.fighters,
            tuning.attack_damage,
            &mut events,
        );
        collision::sweep(&mut self.attacks);

        self.clock.advance(dt);

        if let Some(result) = outcome::evaluate(self.fighters[0].hp, self.fighters[1].hp, &self.clock) {
            self.score.record(result.winner);
            for fighter in &mut self.fighters {
                fighter.hp = fighter.hp.max(0);
            }
            self.status = RoundStatus::Ended(result);
            info!(
                "{} - winner: {} (P1 {} / P2 {})",
                result.reason.banner(),
                result.winner.label(),
                self.score.p1_wins,
                self.score.p2_wins
            );
            events.push(BattleEvent::RoundEnded(result));
        }

        events
    }

    /// Post-round cleanup: full hp, no attacks, clock rewound.
    pub fn finish_round(&mut self, tuning: &Tuning) {
        for fighter in &mut self.fighters {
            fighter.hp = tuning.max_hp;
        }
        self.attacks.clear();
        self.clock.reset();
        self.status = RoundStatus::InProgress;
    }

    /// Stop simulating and hand back the final tally.
    pub fn end_session(&mut self) -> Scoreboard {
        self.freeze();
        info!(
            "Session over: P1 {} - P2 {}",
            self.score.p1_wins, self.score.p2_wins
        );
        self.score
    }
}

#[cfg(test)]
impl BattleState {
    pub fn fighter_mut(&mut self, slot: PlayerSlot) -> &mut Fighter {
        &mut self.fighters[slot.index()]
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::Facing;
    use crate::game::input::KeySnapshot;
    use crate::game::outcome::{EndReason, RoundResult, Winner};

    const DT: f32 = 1.0 / 60.0;

    fn fresh() -> (BattleState, Tuning) {
        let tuning = Tuning::default();
        let mut battle = BattleState::new(&tuning);
        battle.start_round(StageId(1), &tuning);
        (battle, tuning)
    }

    fn idle(battle: &mut BattleState, tuning: &Tuning) -> Vec<BattleEvent> {
        battle.step(&KeySnapshot::none(), AttackIntent::default(), DT, tuning)
    }

    fn fire(slot: PlayerSlot) -> AttackIntent {
        let mut intent = AttackIntent::default();
        intent.set(slot);
        intent
    }

    /// Put the two fighters nose to nose, P1 on the left facing right.
    fn close_in(battle: &mut BattleState) {
        let p1 = battle.fighter_mut(PlayerSlot::P1);
        p1.body.pos.x = 400.0;
        p1.facing = Facing::Right;
        let p2 = battle.fighter_mut(PlayerSlot::P2);
        p2.body.pos.x = 480.0;
        p2.facing = Facing::Left;
    }

    #[test]
    fn knockout_gives_p2_the_round() {
        let (mut battle, tuning) = fresh();
        battle.fighter_mut(PlayerSlot::P1).hp = 0;
        battle.fighter_mut(PlayerSlot::P2).hp = 40;
        battle.clock.advance(80.0);

        let events = battle.step(&KeySnapshot::none(), AttackIntent::default(), 0.0, &tuning);
        let expected = RoundResult {
            winner: Winner::Player(PlayerSlot::P2),
            reason: EndReason::KnockOut,
        };
        assert_eq!(events, vec![BattleEvent::RoundEnded(expected)]);
        assert_eq!(battle.status, RoundStatus::Ended(expected));
        assert_eq!(battle.score.p2_wins, 1);
        assert_eq!(battle.score.p1_wins, 0);
    }

    #[test]
    fn time_up_with_equal_hp_is_a_draw() {
        let (mut battle, tuning) = fresh();
        battle.fighter_mut(PlayerSlot::P1).hp = 20;
        battle.fighter_mut(PlayerSlot::P2).hp = 20;
        battle.clock.advance(90.0);

        idle(&mut battle, &tuning);
        assert_eq!(
            battle.status,
            RoundStatus::Ended(RoundResult {
                winner: Winner::Draw,
                reason: EndReason::TimeUp,
            })
        );
        assert_eq!(battle.score, Scoreboard::default());
    }

    #[test]
    fn clock_runs_the_round_out() {
        let (mut battle, tuning) = fresh();
        let mut ticks = 0;
        while battle.status == RoundStatus::InProgress {
            idle(&mut battle, &tuning);
            ticks += 1;
            assert!(ticks < 90 * 60 + 120, "clock never expired");
        }
        assert_eq!(battle.clock.remaining(), 0.0);
        assert!(matches!(
            battle.status,
            RoundStatus::Ended(RoundResult { winner: Winner::Draw, .. })
        ));
    }

    #[test]
    fn finish_round_resets_everything_but_the_score() {
        let (mut battle, tuning) = fresh();
        close_in(&mut battle);
        battle.step(&KeySnapshot::none(), fire(PlayerSlot::P1), DT, &tuning);
        battle.fighter_mut(PlayerSlot::P2).hp = 0;
        let counter = Attack::spawn(battle.fighter(PlayerSlot::P2), &tuning);
        battle.attacks.push(counter);
        idle(&mut battle, &tuning);
        assert!(matches!(battle.status, RoundStatus::Ended(_)));

        battle.finish_round(&tuning);
        assert_eq!(battle.fighter(PlayerSlot::P1).hp, 100);
        assert_eq!(battle.fighter(PlayerSlot::P2).hp, 100);
        assert!(battle.attacks.is_empty());
        assert_eq!(battle.clock.remaining(), 90.0);
        assert_eq!(battle.status, RoundStatus::InProgress);
        assert_eq!(battle.score.p1_wins, 1);
    }

    #[test]
    fn overkill_is_clamped_after_judging() {
        let (mut battle, tuning) = fresh();
        close_in(&mut battle);
        battle.fighter_mut(PlayerSlot::P2).hp = 3;
        battle.step(&KeySnapshot::none(), fire(PlayerSlot::P1), DT, &tuning);
        assert_eq!(battle.fighter(PlayerSlot::P2).hp, 0);
        assert_eq!(battle.score.p1_wins, 1);
    }

    #[test]
    fn point_blank_attack_lands_on_the_spawn_tick() {
        let (mut battle, tuning) = fresh();
        close_in(&mut battle);
        let events = battle.step(&KeySnapshot::none(), fire(PlayerSlot::P1), DT, &tuning);
        assert_eq!(
            events,
            vec![
                BattleEvent::AttackLaunched { owner: PlayerSlot::P1 },
                BattleEvent::FighterHit {
                    attacker: PlayerSlot::P1,
                    target: PlayerSlot::P2,
                    hp: 95,
                },
            ]
        );
        assert!(battle.attacks.is_empty());
        assert_eq!(battle.fighter(PlayerSlot::P1).hp, 100);
    }

    #[test]
    fn unanswered_attack_fizzles_after_its_lifetime() {
        let (mut battle, tuning) = fresh();
        // P2 starts facing P1 but 440px away: 30 ticks * 12px = 360px of reach.
        battle.step(&KeySnapshot::none(), fire(PlayerSlot::P2), DT, &tuning);
        assert_eq!(battle.attacks.len(), 1);
        assert_eq!(battle.attacks[0].lifetime, 29);
        for _ in 0..28 {
            idle(&mut battle, &tuning);
            assert_eq!(battle.attacks.len(), 1);
        }
        idle(&mut battle, &tuning);
        assert!(battle.attacks.is_empty());
        assert_eq!(battle.fighter(PlayerSlot::P1).hp, 100);
    }

    #[test]
    fn hp_only_drops_in_steps_of_five() {
        let (mut battle, tuning) = fresh();
        close_in(&mut battle);
        let mut last = [100, 100];
        for tick in 0..200 {
            let intent = match tick % 7 {
                0 => fire(PlayerSlot::P1),
                3 => fire(PlayerSlot::P2),
                _ => AttackIntent::default(),
            };
            battle.step(&KeySnapshot::none(), intent, DT, &tuning);
            if battle.status != RoundStatus::InProgress {
                break;
            }
            for slot in PlayerSlot::ALL {
                let hp = battle.fighter(slot).hp;
                assert!(hp <= last[slot.index()]);
                assert_eq!((last[slot.index()] - hp) % 5, 0);
                last[slot.index()] = hp;
            }
        }
        assert!(last[0] < 100 && last[1] < 100);
    }

    #[test]
    fn grounded_flag_tracks_the_floor() {
        let (mut battle, tuning) = fresh();
        let script: [&[KeyCode]; 4] = [
            &[KeyCode::KeyW, KeyCode::ArrowRight],
            &[KeyCode::KeyD],
            &[KeyCode::ArrowUp, KeyCode::KeyA],
            &[],
        ];
        let floor = tuning.floor_y();
        for tick in 0..240 {
            let keys = KeySnapshot::holding(script[(tick / 13) % script.len()]);
            battle.step(&keys, AttackIntent::default(), DT, &tuning);
            for f in &battle.fighters {
                let on_floor = f.body.bottom() == floor && f.velocity.y == 0.0;
                assert_eq!(f.on_ground, on_floor);
                assert!(f.body.bottom() <= floor);
            }
        }
    }

    #[test]
    fn frozen_battle_does_not_move() {
        let (mut battle, tuning) = fresh();
        battle.freeze();
        let before = battle.clone();
        let events = battle.step(
            &KeySnapshot::holding(&[KeyCode::KeyD, KeyCode::KeyW]),
            fire(PlayerSlot::P1),
            DT,
            &tuning,
        );
        assert!(events.is_empty());
        assert!(battle.attacks.is_empty());
        assert_eq!(battle.clock, before.clock);
        assert_eq!(battle.fighter(PlayerSlot::P1).body, before.fighter(PlayerSlot::P1).body);

        battle.unfreeze();
        idle(&mut battle, &tuning);
        assert!(battle.clock.remaining() < 90.0);
    }

    #[test]
    fn ended_round_ignores_further_ticks() {
        let (mut battle, tuning) = fresh();
        battle.fighter_mut(PlayerSlot::P1).hp = 0;
        idle(&mut battle, &tuning);
        idle(&mut battle, &tuning);
        assert_eq!(battle.score.p2_wins, 1);
    }

    #[test]
    fn start_round_keeps_score_and_resets_positions() {
        let (mut battle, tuning) = fresh();
        battle.fighter_mut(PlayerSlot::P1).hp = 0;
        idle(&mut battle, &tuning);
        battle.finish_round(&tuning);
        battle.fighter_mut(PlayerSlot::P1).body.pos.x = -500.0;

        battle.start_round(StageId(2), &tuning);
        assert_eq!(battle.stage, StageId(2));
        assert_eq!(battle.fighter(PlayerSlot::P1).body.left(), 200.0);
        assert_eq!(battle.score.p2_wins, 1);
        assert!(battle.is_running());
    }

    #[test]
    fn end_session_reports_the_tally() {
        let (mut battle, tuning) = fresh();
        battle.fighter_mut(PlayerSlot::P2).hp = 0;
        idle(&mut battle, &tuning);
        let score = battle.end_session();
        assert_eq!(score.p1_wins, 1);
        assert!(battle.is_frozen());
    }
}
