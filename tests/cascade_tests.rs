//! Cascade and combat integration - swaps flowing into effect bundles

use gem_duel::core::{
    compute_effects, find_matches, has_match, resolve_swap, Actor, ActorStats, CascadeResolver,
    EffectTable, Grid, SimpleRng, SwapOutcome, SwapRejection, MAX_CASCADE_PASSES,
};
use gem_duel::types::{Coord, GemType};

// Column 0 holds blue at rows 0, 1 and 3; (1,2) is blue too.
const BLUE_COLUMN: [&str; 4] = ["BGRY", "RBYG", "BRGP", "BYPR"];

#[test]
fn test_four_long_vertical_run_doubles_effects() {
    let mut grid = Grid::from_layout(&BLUE_COLUMN).unwrap();
    assert!(!has_match(&grid));
    let mut rng = SimpleRng::new(3);

    let outcome = resolve_swap(&mut grid, &mut rng, Coord::new(0, 2), Coord::new(1, 2)).unwrap();
    let report = match outcome {
        SwapOutcome::Resolved(report) => report,
        SwapOutcome::Reverted => panic!("swap should have matched"),
    };

    let first = &report.passes[0].groups;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].kind, GemType::Blue);
    assert_eq!(first[0].len(), 4);
    assert_eq!(first[0].multiplier(), 2);

    let actor = Actor::new(&ActorStats::default());
    let fx = compute_effects(first, &actor, &EffectTable::default());
    assert_eq!(fx.mana_gain, 14);
    assert_eq!(fx.raw_damage, 0);
}

#[test]
fn test_cascade_leaves_full_match_free_grid() {
    let mut grid = Grid::from_layout(&BLUE_COLUMN).unwrap();
    let mut rng = SimpleRng::new(11);
    let outcome = resolve_swap(&mut grid, &mut rng, Coord::new(0, 2), Coord::new(1, 2)).unwrap();

    let SwapOutcome::Resolved(report) = outcome else {
        panic!("swap should have matched");
    };
    assert!(!report.truncated);
    assert!(report.pass_count() >= 1 && report.pass_count() <= MAX_CASCADE_PASSES);
    assert!(report.destroyed_count() >= 4);
    assert!(grid.is_full());
    assert!(grid.check_integrity());
    assert!(find_matches(&grid).is_empty());

    // Passes are recorded in order.
    for (i, pass) in report.passes.iter().enumerate() {
        assert_eq!(pass.index, i);
        assert_eq!(pass.spawned.len(), pass.destroyed.len());
    }
}

#[test]
fn test_non_matching_swap_is_undone() {
    let mut grid = Grid::from_layout(&BLUE_COLUMN).unwrap();
    let before = grid.clone();
    let mut rng = SimpleRng::new(3);
    let outcome = resolve_swap(&mut grid, &mut rng, Coord::new(2, 0), Coord::new(3, 0)).unwrap();
    assert_eq!(outcome, SwapOutcome::Reverted);
    assert_eq!(grid, before);
}

#[test]
fn test_rejected_swaps() {
    let mut grid = Grid::from_layout(&["RB.", "GYX"]).unwrap();
    let mut rng = SimpleRng::new(3);
    assert_eq!(
        resolve_swap(&mut grid, &mut rng, Coord::new(0, 0), Coord::new(1, 1)),
        Err(SwapRejection::NotAdjacent {
            a: Coord::new(0, 0),
            b: Coord::new(1, 1)
        })
    );
    assert_eq!(
        resolve_swap(&mut grid, &mut rng, Coord::new(1, 1), Coord::new(2, 1)),
        Err(SwapRejection::EmptyCell {
            at: Coord::new(2, 1)
        })
    );
    assert_eq!(
        resolve_swap(&mut grid, &mut rng, Coord::new(2, 0), Coord::new(3, 0)),
        Err(SwapRejection::OutOfBounds {
            at: Coord::new(3, 0)
        })
    );
}

#[test]
fn test_stepwise_resolution_matches_batches() {
    let mut grid = Grid::from_layout(&BLUE_COLUMN).unwrap();
    let mut rng = SimpleRng::new(3);
    let mut resolver = CascadeResolver::new();
    resolver
        .request_swap(&mut grid, Coord::new(0, 2), Coord::new(1, 2))
        .unwrap();

    let mut passes = Vec::new();
    while let Some(pass) = resolver.step(&mut grid, &mut rng) {
        passes.push(pass);
    }
    assert!(resolver.is_idle());
    assert!(!passes.is_empty());
    assert_eq!(passes[0].groups[0].kind, GemType::Blue);
    assert!(!has_match(&grid));
}

#[test]
fn test_same_seed_same_cascade() {
    let run = |seed| {
        let mut grid = Grid::from_layout(&BLUE_COLUMN).unwrap();
        let mut rng = SimpleRng::new(seed);
        resolve_swap(&mut grid, &mut rng, Coord::new(0, 2), Coord::new(1, 2)).unwrap();
        grid.snapshot()
    };
    assert_eq!(run(21), run(21));
}
