use bevy::prelude::*;

use super::attack::Attack;
use super::components::PlayerSlot;
use super::events::BattleEvent;
use super::fighter::Fighter;

/// Attack-vs-fighter hits: damage the non-owner and retire the attack.
///
/// Retired attacks are skipped, so each attack lands at most once. The
/// caller compacts the list afterwards.
pub fn resolve_hits(
    attacks: &mut [Attack],
    fighters: &mut [Fighter; 2],
    damage: i32,
    events: &mut Vec<BattleEvent>,
) {
    for atk in attacks.iter_mut() {
        for fighter in fighters.iter_mut() {
            if !can_hit(atk, fighter.slot) {
                continue;
            }
            if atk.body.intersects(&fighter.body) {
                fighter.take_damage(damage);
                atk.alive = false;
                debug!(
                    "{} hit {} for {damage}, hp now {}",
                    atk.owner.label(),
                    fighter.slot.label(),
                    fighter.hp
                );
                events.push(BattleEvent::FighterHit {
                    attacker: atk.owner,
                    target: fighter.slot,
                    hp: fighter.hp,
                });
            }
        }
    }
}

/// Drop attacks that expired or landed this tick.
pub fn sweep(attacks: &mut Vec<Attack>) {
    attacks.retain(|a| a.alive);
}

/// Live and not friendly fire.
pub fn can_hit(attack: &Attack, target: PlayerSlot) -> bool {
    attack.alive && attack.owner != target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;

    fn setup() -> (Tuning, [Fighter; 2]) {
        let tuning = Tuning::default();
        let fighters = [
            Fighter::spawn(PlayerSlot::P1, &tuning),
            Fighter::spawn(PlayerSlot::P2, &tuning),
        ];
        (tuning, fighters)
    }

    /// An attack owned by `owner` placed squarely over `over`.
    fn attack_over(owner: PlayerSlot, over: &Fighter, tuning: &Tuning) -> Attack {
        let mut atk = Attack::spawn(over, tuning);
        atk.owner = owner;
        atk.body.pos.x = over.body.left() + 10.0;
        atk
    }

    #[test]
    fn never_hits_its_owner() {
        let (tuning, mut fighters) = setup();
        for owner in PlayerSlot::ALL {
            for target in PlayerSlot::ALL {
                let mut attacks = vec![attack_over(owner, &fighters[target.index()], &tuning)];
                let mut events = Vec::new();
                let before = fighters.clone().map(|f| f.hp);
                resolve_hits(&mut attacks, &mut fighters, 5, &mut events);

                if owner == target {
                    assert_eq!(fighters.clone().map(|f| f.hp), before);
                    assert!(attacks[0].alive);
                    assert!(events.is_empty());
                } else {
                    assert_eq!(fighters[target.index()].hp, before[target.index()] - 5);
                    assert_eq!(fighters[owner.index()].hp, before[owner.index()]);
                    assert!(!attacks[0].alive);
                }
            }
        }
    }

    #[test]
    fn stacked_hits_each_deal_damage() {
        let (tuning, mut fighters) = setup();
        let mut attacks = vec![
            attack_over(PlayerSlot::P2, &fighters[0], &tuning),
            attack_over(PlayerSlot::P2, &fighters[0], &tuning),
            attack_over(PlayerSlot::P2, &fighters[0], &tuning),
        ];
        let mut events = Vec::new();
        resolve_hits(&mut attacks, &mut fighters, 5, &mut events);
        assert_eq!(fighters[0].hp, 85);
        assert_eq!(fighters[1].hp, 100);
        assert_eq!(events.len(), 3);

        sweep(&mut attacks);
        assert!(attacks.is_empty());
    }

    #[test]
    fn a_retired_attack_is_not_retested() {
        let (tuning, mut fighters) = setup();
        let mut attacks = vec![attack_over(PlayerSlot::P2, &fighters[0], &tuning)];
        let mut events = Vec::new();
        resolve_hits(&mut attacks, &mut fighters, 5, &mut events);
        resolve_hits(&mut attacks, &mut fighters, 5, &mut events);
        assert_eq!(fighters[0].hp, 95);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn misses_leave_everything_alone() {
        let (tuning, mut fighters) = setup();
        let mut attacks = vec![Attack::spawn(&fighters[0], &tuning)];
        let mut events = Vec::new();
        resolve_hits(&mut attacks, &mut fighters, 5, &mut events);
        assert!(attacks[0].alive);
        assert_eq!(fighters[1].hp, 100);
        assert!(can_hit(&attacks[0], PlayerSlot::P2));
        assert!(!can_hit(&attacks[0], PlayerSlot::P1));
    }
}
