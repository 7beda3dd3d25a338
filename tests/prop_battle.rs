//! Property tests for matching, cascades, combat and the evaluator

use gem_duel::core::matcher::{merge_groups, scan_runs};
use gem_duel::core::{
    apply_effects, find_matches, has_match, Actor, ActorStats, CascadeResolver, EffectBundle,
    Grid, GridSnapshot, SimpleRng, MAX_CASCADE_PASSES,
};
use gem_duel::engine::{MoveEvaluator, MoveSpace};
use gem_duel::types::{Coord, GemType};
use proptest::prelude::*;

/// Random board with edges in 3..=9. Kind index 6 means an empty cell when
/// `with_holes` is set.
fn board(with_holes: bool) -> impl Strategy<Value = GridSnapshot> {
    let kinds = if with_holes { 7usize } else { 6usize };
    (3u8..=9, 3u8..=9).prop_flat_map(move |(w, h)| {
        prop::collection::vec(0..kinds, w as usize * h as usize).prop_map(move |cells| {
            let mut snapshot = GridSnapshot::new(w, h);
            for (i, kind) in cells.into_iter().enumerate() {
                let at = Coord::new((i % w as usize) as i8, (i / w as usize) as i8);
                snapshot.set(at, GemType::from_index(kind));
            }
            snapshot
        })
    })
}

fn actor_stats() -> impl Strategy<Value = ActorStats> {
    (1u32..300, 0u32..200, 0u32..200, 0u32..100, 0u32..100).prop_map(
        |(max_hp, max_mana, max_rage, attack, defense)| ActorStats {
            name: String::from("P"),
            max_hp,
            max_mana,
            max_rage,
            attack,
            defense,
        },
    )
}

fn bundle() -> impl Strategy<Value = EffectBundle> {
    (0u32..1_000, 0u32..1_000, 0u32..1_000, 0u32..1_000, 0u32..1_000).prop_map(
        |(raw_damage, heal_self, mana_gain, rage_gain, rage_drain)| EffectBundle {
            raw_damage,
            heal_self,
            mana_gain,
            rage_gain,
            rage_drain,
        },
    )
}

fn within_bounds(actor: &Actor) -> bool {
    actor.hp() <= actor.max_hp() && actor.mana() <= actor.max_mana() && actor.rage() <= actor.max_rage()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_groups_are_uniform_and_disjoint(snapshot in board(true)) {
        let groups = find_matches(&snapshot);
        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            prop_assert!(group.len() >= 3);
            for &at in group.cells() {
                prop_assert_eq!(snapshot.get(at), Some(Some(group.kind)));
                prop_assert!(seen.insert(at), "cell {} in two groups", at);
            }
        }
        prop_assert_eq!(groups.is_empty(), !has_match(&snapshot));
    }

    #[test]
    fn prop_merging_is_idempotent(snapshot in board(true)) {
        let merged = merge_groups(scan_runs(&snapshot));
        prop_assert_eq!(merge_groups(merged.clone()), merged.clone());
        prop_assert_eq!(merged, find_matches(&snapshot));
    }

    #[test]
    fn prop_matching_ignores_grid_identity(snapshot in board(true)) {
        let grid = Grid::from_snapshot(&snapshot);
        prop_assert_eq!(find_matches(&grid), find_matches(&snapshot));
    }

    #[test]
    fn prop_cascade_terminates_on_a_full_grid(snapshot in board(false), seed in 1u32..10_000) {
        let mut grid = Grid::from_snapshot(&snapshot);
        let mut rng = SimpleRng::new(seed);
        let report = CascadeResolver::new().clear_standing_matches(&mut grid, &mut rng);

        prop_assert!(report.pass_count() <= MAX_CASCADE_PASSES);
        prop_assert!(grid.is_full());
        prop_assert!(grid.check_integrity());
        if !report.truncated {
            prop_assert!(!has_match(&grid));
        }
    }

    #[test]
    fn prop_populate_is_match_free(w in 3u8..=12, h in 3u8..=12, seed in 1u32..10_000) {
        let mut grid = Grid::new(w, h);
        grid.populate(&mut SimpleRng::new(seed));
        prop_assert!(grid.is_full());
        prop_assert!(!has_match(&grid));
    }

    #[test]
    fn prop_stats_stay_clamped(a in actor_stats(), d in actor_stats(), fx in bundle(), pre in 0u32..300) {
        let mut attacker = Actor::new(&a);
        let mut defender = Actor::new(&d);
        attacker.take_damage(pre);
        defender.gain_rage(pre);

        let hp_before = defender.hp();
        let applied = apply_effects(&fx, &mut attacker, &mut defender);

        prop_assert!(within_bounds(&attacker));
        prop_assert!(within_bounds(&defender));
        prop_assert_eq!(defender.hp(), hp_before - applied.damage);
        if fx.raw_damage > 0 && hp_before > 0 {
            prop_assert!(applied.damage >= 1);
        }
    }

    #[test]
    fn prop_evaluator_is_pure_and_sound(snapshot in board(true)) {
        let before = snapshot.clone();
        let eval = MoveEvaluator::default();
        let best = eval.best_move(&snapshot);
        prop_assert_eq!(&snapshot, &before);

        if let Some(mv) = best {
            prop_assert!(mv.a.is_adjacent(mv.b));
            let mut scratch = snapshot.clone();
            scratch.swap(mv.a, mv.b);
            prop_assert!(has_match(&scratch));
            for candidate in eval.candidates(&snapshot) {
                prop_assert!(candidate.score <= mv.score);
            }
        }
    }

    #[test]
    fn prop_move_space_covers_every_adjacent_pair(w in 3u8..=12, h in 3u8..=12) {
        let space = MoveSpace::new(w, h);
        let expected = w as usize * (h as usize - 1) + h as usize * (w as usize - 1);
        prop_assert_eq!(space.len(), expected);
        for index in 0..space.len() {
            let (a, b) = space.decode(index).unwrap();
            prop_assert!(a.is_adjacent(b));
            prop_assert_eq!(space.encode(a, b), Some(index));
        }
        prop_assert_eq!(space.decode(space.len()), None);
    }
}
