// dungeon-core/tests/wfc_tests.rs
use dungeon_core::wfc::{generate_wfc, WfcGenerator, WfcOptions};
use dungeon_core::{GenerationError, GridPoint, ProgressInfo};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn mean_pairwise(points: &[GridPoint]) -> f64 {
    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            total += a.distance(*b);
            pairs += 1;
        }
    }
    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}

#[test]
fn same_seed_same_dungeon() {
    init_logger();
    let a = generate_wfc(30, 30, 42).unwrap();
    let b = generate_wfc(30, 30, 42).unwrap();
    assert_eq!(a, b);
}

#[test]
fn seed_42_spawn_is_walkable_and_inside_margin() {
    let dungeon = generate_wfc(30, 30, 42).unwrap();
    assert_eq!(dungeon.grid.width, 30);
    assert_eq!(dungeon.grid.height, 30);
    assert!(dungeon.walkable_count > 0);

    let spawn = dungeon.spawn_point;
    assert!(dungeon.is_walkable(spawn.x, spawn.y));
    assert!((5..25).contains(&spawn.x));
    assert!((5..25).contains(&spawn.y));
}

#[test]
fn seed_42_interior_is_mostly_open() {
    // Roughly 275 of the 400 interior cells come out walkable. A solver
    // that constrains from undecided cells walls nearly everything off.
    let dungeon = generate_wfc(30, 30, 42).unwrap();
    assert!(
        dungeon.walkable_count >= 200,
        "only {} walkable cells",
        dungeon.walkable_count
    );
    assert_eq!(dungeon.portal_positions.len(), 4);
}

#[test]
fn larger_grids_stay_open() {
    for seed in 0..3 {
        let dungeon = generate_wfc(50, 50, seed).unwrap();
        assert!(
            dungeon.walkable_count > 800,
            "seed {seed}: only {} walkable cells",
            dungeon.walkable_count
        );
    }
}

#[test]
fn portals_are_walkable_and_bounded() {
    for seed in [1, 7, 42, 1234, -5] {
        let dungeon = generate_wfc(40, 40, seed).unwrap();
        assert!(dungeon.portal_positions.len() <= 4);
        for portal in &dungeon.portal_positions {
            assert!(dungeon.is_walkable(portal.x, portal.y));
            assert!((5..35).contains(&portal.x) && (5..35).contains(&portal.y));
        }
        if dungeon.walkable_count >= 4 {
            assert_eq!(dungeon.portal_positions.len(), 4);
        }
    }
}

#[test]
fn iteration_cap_is_respected() {
    let dungeon = generate_wfc(20, 20, 9).unwrap();
    assert!(dungeon.stats.iterations <= 2 * 20 * 20);

    let mut capped = WfcGenerator::new(WfcOptions {
        max_iterations: Some(3),
        ..WfcOptions::default()
    });
    let dungeon = capped.generate(20, 20, 9).unwrap();
    assert_eq!(dungeon.stats.iterations, 3);
    assert!(dungeon.stats.hit_iteration_cap);
    // Unfinished cells still come back as concrete tiles.
    assert_eq!(dungeon.grid.len(), 400);
}

#[test]
fn zero_size_is_rejected() {
    assert_eq!(
        generate_wfc(0, 10, 1),
        Err(GenerationError::InvalidDimensions {
            width: 0,
            height: 10
        })
    );
}

#[test]
fn overflowing_size_is_rejected() {
    assert_eq!(
        generate_wfc(usize::MAX, 2, 1),
        Err(GenerationError::InvalidDimensions {
            width: usize::MAX,
            height: 2
        })
    );
}

#[test]
fn one_by_one_grid() {
    let dungeon = generate_wfc(1, 1, 3).unwrap();
    assert_eq!(dungeon.walkable_count, 0);
    assert!(dungeon.portal_positions.is_empty());
    assert_eq!(dungeon.spawn_point, GridPoint::new(0, 0));
}

#[test]
fn progress_is_reported() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mut generator = WfcGenerator::default().with_progress(Box::new(move |info: &ProgressInfo| {
        assert_eq!(info.total_cells, 100);
        assert!(info.percentage() <= 100.0);
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let dungeon = generator.generate(10, 10, 5).unwrap();
    assert_eq!(
        calls.load(Ordering::SeqCst) as u64,
        dungeon.stats.iterations
    );

    // The callback survives for the next run.
    generator.generate(10, 10, 6).unwrap();
    assert!(calls.load(Ordering::SeqCst) as u64 > dungeon.stats.iterations);
}

#[test]
fn portals_are_spread_better_than_random_picks() {
    let dungeon = generate_wfc(30, 30, 42).unwrap();
    assert_eq!(dungeon.portal_positions.len(), 4);

    let candidates: Vec<GridPoint> = dungeon
        .grid
        .iter()
        .filter(|(p, tile)| tile.is_walkable() && (5..25).contains(&p.x) && (5..25).contains(&p.y))
        .map(|(p, _)| p)
        .collect();
    assert_eq!(candidates.len(), dungeon.walkable_count);

    let mut sampler = StdRng::seed_from_u64(2024);
    let samples = 200;
    let mut random_total = 0.0;
    for _ in 0..samples {
        let picks: Vec<GridPoint> = candidates
            .choose_multiple(&mut sampler, 4)
            .copied()
            .collect();
        random_total += mean_pairwise(&picks);
    }
    let random_mean = random_total / f64::from(samples);
    let portal_mean = mean_pairwise(&dungeon.portal_positions);

    assert!(
        portal_mean > random_mean,
        "portal spacing {portal_mean} vs random {random_mean}"
    );
}

#[cfg(feature = "serde")]
#[test]
fn json_shape() {
    let dungeon = generate_wfc(12, 12, 4).unwrap();
    let value = serde_json::to_value(&dungeon).unwrap();
    assert_eq!(value["seed"], 4);
    assert_eq!(value["grid"].as_array().map(Vec::len), Some(12));
    assert!(value["spawnPoint"]["x"].is_u64());
    assert!(value["portalPositions"].is_array());
    assert!(value.get("stats").is_none());
}
