//! Combat effect calculation (attack/defense-scaled rules)
//!
//! Rules:
//! - Every match group contributes `base * multiplier`, where the multiplier is
//!   linear in group size (3 -> x1, 4 -> x2, 5 -> x3).
//! - Damage and lifesteal groups add the attacker's attack, scaled by the kind's
//!   `attack_percent`, to the base before multiplying. Raw damage power from all
//!   damage-class groups of a batch accumulates uncapped.
//! - Lifesteal also heals the attacker for `lifesteal_percent` of its power.
//! - On application, defense is subtracted from raw damage power but a batch with
//!   any damage power always deals at least 1.
//! - Rage drain takes at most what the defender has and hands it to the attacker.
//! - Every stat stays clamped to `[0, max]`.

use serde::{Deserialize, Serialize};

use crate::matcher::MatchGroup;
use crate::types::{EffectClass, GemType};

/// Base stats a combatant enters the battle with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActorStats {
    pub name: String,
    pub max_hp: u32,
    pub max_mana: u32,
    pub max_rage: u32,
    pub attack: u32,
    pub defense: u32,
}

impl Default for ActorStats {
    fn default() -> Self {
        Self {
            name: String::from("Actor"),
            max_hp: 100,
            max_mana: 100,
            max_rage: 100,
            attack: 20,
            defense: 5,
        }
    }
}

/// A combatant's live stats. Every mutation re-clamps to `[0, max]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    name: String,
    hp: u32,
    max_hp: u32,
    mana: u32,
    max_mana: u32,
    rage: u32,
    max_rage: u32,
    attack: u32,
    defense: u32,
}

impl Actor {
    /// Create an actor at full health with empty resources
    pub fn new(stats: &ActorStats) -> Self {
        let mut actor = Self {
            name: stats.name.clone(),
            hp: 0,
            max_hp: stats.max_hp,
            mana: 0,
            max_mana: stats.max_mana,
            rage: 0,
            max_rage: stats.max_rage,
            attack: stats.attack,
            defense: stats.defense,
        };
        actor.reset_for_battle();
        actor
    }

    /// Full health, no mana, no rage
    pub fn reset_for_battle(&mut self) {
        self.max_hp = self.max_hp.max(1);
        self.hp = self.max_hp;
        self.mana = 0;
        self.rage = 0;
        self.clamp();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn rage(&self) -> u32 {
        self.rage
    }

    pub fn max_rage(&self) -> u32 {
        self.max_rage
    }

    pub fn attack(&self) -> u32 {
        self.attack
    }

    pub fn defense(&self) -> u32 {
        self.defense
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Returns the damage actually taken
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.hp);
        self.hp -= taken;
        self.clamp();
        taken
    }

    /// Returns the health actually restored
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.clamp();
        self.hp - before
    }

    /// Returns the mana actually gained
    pub fn gain_mana(&mut self, amount: u32) -> u32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
        self.clamp();
        self.mana - before
    }

    /// Returns the mana actually removed
    pub fn drain_mana(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.mana);
        self.mana -= drained;
        self.clamp();
        drained
    }

    /// Returns the rage actually gained
    pub fn gain_rage(&mut self, amount: u32) -> u32 {
        let before = self.rage;
        self.rage = self.rage.saturating_add(amount).min(self.max_rage);
        self.clamp();
        self.rage - before
    }

    /// Returns the rage actually removed
    pub fn drain_rage(&mut self, amount: u32) -> u32 {
        let drained = amount.min(self.rage);
        self.rage -= drained;
        self.clamp();
        drained
    }

    /// Force every stat back into `[0, max]`
    pub fn clamp(&mut self) {
        self.hp = self.hp.min(self.max_hp);
        self.mana = self.mana.min(self.max_mana);
        self.rage = self.rage.min(self.max_rage);
    }
}

/// Per-kind effect tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectTuning {
    /// Fixed value per group before the size multiplier
    pub base: u32,
    /// Share of the attacker's attack added to `base` (damage classes only)
    pub attack_percent: u32,
}

impl EffectTuning {
    pub const fn new(base: u32, attack_percent: u32) -> Self {
        Self {
            base,
            attack_percent,
        }
    }
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Effect tuning for every gem kind.
///
/// When deserialized, every field left out falls back to that kind's own
/// default rather than to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EffectTableOverrides", rename_all = "camelCase")]
pub struct EffectTable {
    pub red: EffectTuning,
    pub blue: EffectTuning,
    pub green: EffectTuning,
    pub yellow: EffectTuning,
    pub purple: EffectTuning,
    pub grey: EffectTuning,
    /// Share of lifesteal power returned to the attacker as healing
    pub lifesteal_percent: u32,
}

impl EffectTable {
    pub fn tuning(&self, kind: GemType) -> EffectTuning {
        match kind {
            GemType::Red => self.red,
            GemType::Blue => self.blue,
            GemType::Green => self.green,
            GemType::Yellow => self.yellow,
            GemType::Purple => self.purple,
            GemType::Grey => self.grey,
        }
    }

    /// Base value of a kind (also the AI's per-kind base score)
    pub fn base(&self, kind: GemType) -> u32 {
        self.tuning(kind).base
    }
}

impl Default for EffectTable {
    fn default() -> Self {
        Self {
            red: EffectTuning::new(7, 0),
            blue: EffectTuning::new(7, 0),
            green: EffectTuning::new(7, 0),
            yellow: EffectTuning::new(12, 100),
            purple: EffectTuning::new(6, 0),
            grey: EffectTuning::new(6, 50),
            lifesteal_percent: 50,
        }
    }
}

/// A tuning as written in config, any field may be missing
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TuningOverride {
    base: Option<u32>,
    attack_percent: Option<u32>,
}

impl TuningOverride {
    fn apply(self, tuning: &mut EffectTuning) {
        if let Some(base) = self.base {
            tuning.base = base;
        }
        if let Some(attack_percent) = self.attack_percent {
            tuning.attack_percent = attack_percent;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EffectTableOverrides {
    red: TuningOverride,
    blue: TuningOverride,
    green: TuningOverride,
    yellow: TuningOverride,
    purple: TuningOverride,
    grey: TuningOverride,
    lifesteal_percent: Option<u32>,
}

impl From<EffectTableOverrides> for EffectTable {
    fn from(overrides: EffectTableOverrides) -> Self {
        let mut table = EffectTable::default();
        overrides.red.apply(&mut table.red);
        overrides.blue.apply(&mut table.blue);
        overrides.green.apply(&mut table.green);
        overrides.yellow.apply(&mut table.yellow);
        overrides.purple.apply(&mut table.purple);
        overrides.grey.apply(&mut table.grey);
        if let Some(percent) = overrides.lifesteal_percent {
            table.lifesteal_percent = percent;
        }
        table
    }
}

/// Aggregated outcome of one or more match groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectBundle {
    /// Damage power before the defender's defense
    pub raw_damage: u32,
    pub heal_self: u32,
    pub mana_gain: u32,
    pub rage_gain: u32,
    pub rage_drain: u32,
}

impl EffectBundle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Component-wise saturating sum
    pub fn combine(self, other: EffectBundle) -> EffectBundle {
        EffectBundle {
            raw_damage: self.raw_damage.saturating_add(other.raw_damage),
            heal_self: self.heal_self.saturating_add(other.heal_self),
            mana_gain: self.mana_gain.saturating_add(other.mana_gain),
            rage_gain: self.rage_gain.saturating_add(other.rage_gain),
            rage_drain: self.rage_drain.saturating_add(other.rage_drain),
        }
    }
}

/// What an [`EffectBundle`] actually did once applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedEffects {
    pub damage: u32,
    pub healed: u32,
    pub mana_gained: u32,
    pub rage_gained: u32,
    pub rage_drained: u32,
}

impl AppliedEffects {
    /// Human-readable combat log lines
    pub fn log_lines(&self, attacker: &str, defender: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if self.damage > 0 {
            lines.push(format!("{} deals {} damage to {}", attacker, self.damage, defender));
        }
        if self.healed > 0 {
            lines.push(format!("{} heals {} HP", attacker, self.healed));
        }
        if self.mana_gained > 0 {
            lines.push(format!("{} +{} mana", attacker, self.mana_gained));
        }
        if self.rage_gained > 0 {
            lines.push(format!("{} +{} rage", attacker, self.rage_gained));
        }
        if self.rage_drained > 0 {
            lines.push(format!(
                "{} drains {} rage from {}",
                attacker, self.rage_drained, defender
            ));
        }
        lines
    }
}

fn percent_of(value: u32, percent: u32) -> u32 {
    (u64::from(value) * u64::from(percent) / 100) as u32
}

/// `value * percent / 100`, rounded half up
fn rounded_percent_of(value: u32, percent: u32) -> u32 {
    ((u64::from(value) * u64::from(percent) + 50) / 100) as u32
}

/// Effects of a single match group
pub fn group_effects(group: &MatchGroup, attacker: &Actor, table: &EffectTable) -> EffectBundle {
    let mut fx = EffectBundle::default();
    if group.is_empty() {
        return fx;
    }

    let tuning = table.tuning(group.kind);
    let multiplier = group.multiplier();
    let flat = tuning.base.saturating_mul(multiplier);
    let scaled = || {
        tuning
            .base
            .saturating_add(percent_of(attacker.attack(), tuning.attack_percent))
            .saturating_mul(multiplier)
    };

    match group.kind.effect_class() {
        EffectClass::Damage => {
            fx.raw_damage = scaled();
        }
        EffectClass::Lifesteal => {
            let power = scaled();
            fx.raw_damage = power;
            fx.heal_self = rounded_percent_of(power, table.lifesteal_percent);
        }
        EffectClass::Heal => fx.heal_self = flat,
        EffectClass::ManaGain => fx.mana_gain = flat,
        EffectClass::RageGain => fx.rage_gain = flat,
        EffectClass::RageDrain => fx.rage_drain = flat,
    }
    fx
}

/// Aggregate the effects of every group in a batch (or a whole cascade)
pub fn compute_effects(groups: &[MatchGroup], attacker: &Actor, table: &EffectTable) -> EffectBundle {
    groups
        .iter()
        .map(|group| group_effects(group, attacker, table))
        .fold(EffectBundle::default(), EffectBundle::combine)
}

/// Damage after defense: never below 1 when there is any raw power, 0 otherwise
pub fn final_damage(raw_damage: u32, defense: u32) -> u32 {
    if raw_damage == 0 {
        return 0;
    }
    raw_damage.saturating_sub(defense).max(1)
}

/// Apply a bundle: damage to the defender, everything else to the attacker
pub fn apply_effects(fx: &EffectBundle, attacker: &mut Actor, defender: &mut Actor) -> AppliedEffects {
    let mut applied = AppliedEffects::default();

    if fx.raw_damage > 0 {
        applied.damage = defender.take_damage(final_damage(fx.raw_damage, defender.defense()));
    }
    if fx.heal_self > 0 {
        applied.healed = attacker.heal(fx.heal_self);
    }
    if fx.mana_gain > 0 {
        applied.mana_gained = attacker.gain_mana(fx.mana_gain);
    }
    if fx.rage_gain > 0 {
        applied.rage_gained = attacker.gain_rage(fx.rage_gain);
    }
    if fx.rage_drain > 0 {
        let drained = defender.drain_rage(fx.rage_drain);
        if drained > 0 {
            attacker.gain_rage(drained);
        }
        applied.rage_drained = drained;
    }

    attacker.clamp();
    defender.clamp();
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn group(kind: GemType, size: usize) -> MatchGroup {
        MatchGroup::new(kind, (0..size).map(|x| Coord::new(x as i8, 0)))
    }

    fn actor(attack: u32, defense: u32) -> Actor {
        Actor::new(&ActorStats {
            name: String::from("T"),
            attack,
            defense,
            ..ActorStats::default()
        })
    }

    #[test]
    fn test_new_actor_is_fresh() {
        let a = actor(10, 0);
        assert_eq!(a.hp(), 100);
        assert_eq!(a.mana(), 0);
        assert_eq!(a.rage(), 0);
        assert!(!a.is_defeated());
    }

    #[test]
    fn test_actor_operations_clamp() {
        let mut a = actor(10, 0);
        assert_eq!(a.take_damage(30), 30);
        assert_eq!(a.heal(50), 30);
        assert_eq!(a.hp(), 100);
        assert_eq!(a.take_damage(500), 100);
        assert!(a.is_defeated());
        assert_eq!(a.gain_rage(250), 100);
        assert_eq!(a.drain_rage(30), 30);
        assert_eq!(a.drain_rage(500), 70);
        assert_eq!(a.rage(), 0);
        assert_eq!(a.gain_mana(40), 40);
        assert_eq!(a.drain_mana(100), 40);
    }

    #[test]
    fn test_zero_max_hp_is_raised_to_one() {
        let a = Actor::new(&ActorStats {
            max_hp: 0,
            ..ActorStats::default()
        });
        assert_eq!(a.max_hp(), 1);
        assert_eq!(a.hp(), 1);
    }

    #[test]
    fn test_damage_scales_with_attack_and_size() {
        let table = EffectTable::default();
        let attacker = actor(20, 0);

        let three = group_effects(&group(GemType::Yellow, 3), &attacker, &table);
        let five = group_effects(&group(GemType::Yellow, 5), &attacker, &table);
        assert_eq!(three.raw_damage, 12 + 20);
        assert_eq!(five.raw_damage, three.raw_damage * 3);
    }

    #[test]
    fn test_lifesteal_heals_half_of_power() {
        let table = EffectTable::default();
        let attacker = actor(20, 0);

        let fx = group_effects(&group(GemType::Grey, 3), &attacker, &table);
        // 6 + 50% of 20
        assert_eq!(fx.raw_damage, 16);
        assert_eq!(fx.heal_self, 8);

        let fx = group_effects(&group(GemType::Grey, 3), &actor(10, 0), &table);
        assert_eq!(fx.raw_damage, 11);
        // 5.5 rounds up
        assert_eq!(fx.heal_self, 6);
    }

    #[test]
    fn test_flat_kinds_ignore_attack() {
        let table = EffectTable::default();
        let strong = actor(90, 0);
        let fx = compute_effects(
            &[
                group(GemType::Green, 3),
                group(GemType::Blue, 4),
                group(GemType::Red, 3),
                group(GemType::Purple, 5),
            ],
            &strong,
            &table,
        );
        assert_eq!(fx.raw_damage, 0);
        assert_eq!(fx.heal_self, 7);
        assert_eq!(fx.mana_gain, 14);
        assert_eq!(fx.rage_gain, 7);
        assert_eq!(fx.rage_drain, 18);
    }

    #[test]
    fn test_damage_accumulates_across_groups() {
        let table = EffectTable::default();
        let attacker = actor(20, 0);
        let fx = compute_effects(
            &[group(GemType::Yellow, 3), group(GemType::Yellow, 4), group(GemType::Grey, 3)],
            &attacker,
            &table,
        );
        assert_eq!(fx.raw_damage, 32 + 64 + 16);
    }

    #[test]
    fn test_final_damage_floor() {
        assert_eq!(final_damage(50, 70), 1);
        assert_eq!(final_damage(100, 30), 70);
        assert_eq!(final_damage(0, 0), 0);
        assert_eq!(final_damage(5, 5), 1);
    }

    #[test]
    fn test_apply_effects_rage_drain_transfers() {
        let mut attacker = actor(10, 0);
        let mut defender = actor(10, 0);
        defender.gain_rage(10);

        let fx = EffectBundle {
            rage_drain: 25,
            ..EffectBundle::default()
        };
        let applied = apply_effects(&fx, &mut attacker, &mut defender);
        assert_eq!(applied.rage_drained, 10);
        assert_eq!(defender.rage(), 0);
        assert_eq!(attacker.rage(), 10);
        assert_eq!(applied.damage, 0);
    }

    #[test]
    fn test_apply_effects_floors_damage_at_one() {
        let mut attacker = actor(10, 0);
        let mut defender = actor(10, 70);
        let fx = EffectBundle {
            raw_damage: 50,
            ..EffectBundle::default()
        };
        let applied = apply_effects(&fx, &mut attacker, &mut defender);
        assert_eq!(applied.damage, 1);
        assert_eq!(defender.hp(), 99);
    }

    #[test]
    fn test_log_lines() {
        let applied = AppliedEffects {
            damage: 12,
            rage_drained: 3,
            ..AppliedEffects::default()
        };
        let lines = applied.log_lines("Cat", "Dog");
        assert_eq!(lines, vec!["Cat deals 12 damage to Dog", "Cat drains 3 rage from Dog"]);
    }

    #[test]
    fn test_partial_tuning_keeps_kind_defaults() {
        let table: EffectTable =
            serde_json::from_str(r#"{ "yellow": { "base": 20 }, "grey": { "attackPercent": 80 } }"#).unwrap();
        assert_eq!(table.yellow, EffectTuning::new(20, 100));
        assert_eq!(table.grey, EffectTuning::new(6, 80));
        assert_eq!(table.red, EffectTable::default().red);
        assert_eq!(table.lifesteal_percent, 50);

        // Raising a base never lowers the damage it deals.
        let attacker = actor(20, 0);
        let yyy = [group(GemType::Yellow, 3)];
        let before = compute_effects(&yyy, &attacker, &EffectTable::default()).raw_damage;
        let after = compute_effects(&yyy, &attacker, &table).raw_damage;
        assert_eq!((before, after), (32, 40));
    }

    #[test]
    fn test_effect_table_round_trips_through_json() {
        let table = EffectTable::default();
        let json = serde_json::to_string(&table).unwrap();
        let back: EffectTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
