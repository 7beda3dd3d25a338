//! Combat tests - effect formulas, defense and stat clamping

use gem_duel::core::{
    apply_effects, compute_effects, final_damage, Actor, ActorStats, EffectBundle, EffectTable,
    MatchGroup,
};
use gem_duel::types::{Coord, GemType};

fn row(kind: GemType, size: usize) -> MatchGroup {
    MatchGroup::new(kind, (0..size).map(|x| Coord::new(x as i8, 0)))
}

fn column(kind: GemType, x: i8, size: usize) -> MatchGroup {
    MatchGroup::new(kind, (0..size).map(|y| Coord::new(x, y as i8)))
}

fn actor(name: &str, attack: u32, defense: u32) -> Actor {
    Actor::new(&ActorStats {
        name: name.to_string(),
        attack,
        defense,
        ..ActorStats::default()
    })
}

#[test]
fn test_defense_floor() {
    assert_eq!(final_damage(50, 70), 1);
    assert_eq!(final_damage(100, 30), 70);
    assert_eq!(final_damage(0, 30), 0);
    assert_eq!(final_damage(5, 5), 1);
}

#[test]
fn test_damage_scales_with_attack_and_size() {
    let attacker = actor("A", 20, 0);
    let table = EffectTable::default();

    assert_eq!(compute_effects(&[row(GemType::Yellow, 3)], &attacker, &table).raw_damage, 32);
    assert_eq!(compute_effects(&[row(GemType::Yellow, 5)], &attacker, &table).raw_damage, 96);
}

#[test]
fn test_lifesteal_heals_half_rounded_up() {
    let attacker = actor("A", 10, 0);
    let fx = compute_effects(&[row(GemType::Grey, 3)], &attacker, &EffectTable::default());
    // (6 + 10 * 50%) = 11 power, 5.5 heal rounds to 6.
    assert_eq!(fx.raw_damage, 11);
    assert_eq!(fx.heal_self, 6);
}

#[test]
fn test_mixed_batch_aggregates_per_kind() {
    let attacker = actor("A", 20, 0);
    let groups = [
        row(GemType::Red, 3),
        column(GemType::Blue, 5, 4),
        column(GemType::Green, 6, 3),
        column(GemType::Purple, 7, 3),
    ];
    let fx = compute_effects(&groups, &attacker, &EffectTable::default());
    assert_eq!(
        fx,
        EffectBundle {
            raw_damage: 0,
            heal_self: 7,
            mana_gain: 14,
            rage_gain: 7,
            rage_drain: 6,
        }
    );
}

#[test]
fn test_apply_moves_drained_rage_to_attacker() {
    let mut attacker = actor("Hero", 20, 5);
    let mut defender = actor("Slime", 20, 5);
    defender.gain_rage(4);

    let fx = EffectBundle {
        rage_drain: 6,
        ..EffectBundle::default()
    };
    let applied = apply_effects(&fx, &mut attacker, &mut defender);
    assert_eq!(applied.rage_drained, 4);
    assert_eq!(defender.rage(), 0);
    assert_eq!(attacker.rage(), 4);
    assert_eq!(
        applied.log_lines(attacker.name(), defender.name()),
        vec!["Hero drains 4 rage from Slime".to_string()]
    );
}

#[test]
fn test_apply_clamps_to_bounds() {
    let mut attacker = actor("Hero", 20, 5);
    let mut defender = actor("Slime", 20, 5);
    attacker.take_damage(10);

    let fx = EffectBundle {
        raw_damage: 500,
        heal_self: 50,
        mana_gain: 300,
        rage_gain: 300,
        rage_drain: 0,
    };
    let applied = apply_effects(&fx, &mut attacker, &mut defender);

    assert_eq!(applied.damage, 100);
    assert_eq!(applied.healed, 10);
    assert_eq!(defender.hp(), 0);
    assert!(defender.is_defeated());
    assert_eq!(attacker.hp(), attacker.max_hp());
    assert_eq!(attacker.mana(), attacker.max_mana());
    assert_eq!(attacker.rage(), attacker.max_rage());
}

#[test]
fn test_stats_load_from_json_with_defaults() {
    let stats: ActorStats = serde_json::from_str(r#"{"name":"Golem","maxHp":250,"defense":40}"#).unwrap();
    assert_eq!(stats.max_hp, 250);
    assert_eq!(stats.defense, 40);
    assert_eq!(stats.attack, ActorStats::default().attack);

    let golem = Actor::new(&stats);
    assert_eq!(golem.hp(), 250);
    assert_eq!(golem.mana(), 0);
    assert_eq!(golem.rage(), 0);
}
