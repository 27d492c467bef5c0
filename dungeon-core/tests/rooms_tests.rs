// dungeon-core/tests/rooms_tests.rs
use dungeon_core::rooms::{generate_rooms, Cell, DecorationKind, RoomDungeon};
use dungeon_core::GridPoint;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{HashSet, VecDeque};

fn reachable_floor(dungeon: &RoomDungeon, start: GridPoint) -> HashSet<GridPoint> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(point) = queue.pop_front() {
        for next in dungeon.grid.neighbors4(point.x, point.y) {
            if dungeon.is_floor(next.x, next.y) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn assert_well_formed(dungeon: &RoomDungeon) {
    let (w, h) = (dungeon.width, dungeon.height);
    for room in &dungeon.rooms {
        assert!(room.x >= 1 && room.y >= 1, "room touches the border: {room:?}");
        assert!(room.x + room.width <= w - 1, "room overflows: {room:?}");
        assert!(room.y + room.height <= h - 1, "room overflows: {room:?}");
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                assert!(dungeon.is_floor(x, y));
            }
        }
    }
    for (i, a) in dungeon.rooms.iter().enumerate() {
        for b in &dungeon.rooms[i + 1..] {
            assert!(!a.overlaps(b, 2), "{a:?} overlaps {b:?}");
        }
    }
    for decoration in &dungeon.decorations {
        assert!(dungeon.is_floor(decoration.x, decoration.z));
    }
}

#[test]
fn twenty_by_twenty_is_connected() {
    let mut rng = StdRng::seed_from_u64(7);
    let dungeon = generate_rooms(20, 20, 0.25, &mut rng).unwrap();

    assert_eq!(dungeon.grid.width, 20);
    assert_eq!(dungeon.grid.height, 20);
    assert!(!dungeon.rooms.is_empty());
    assert!(dungeon.rooms.len() <= 2);
    assert_well_formed(&dungeon);

    if let Some(first) = dungeon.rooms.first() {
        let reached = reachable_floor(&dungeon, first.center());
        assert_eq!(reached.len(), dungeon.floor_count());
    }
}

#[test]
fn border_stays_wall() {
    let mut rng = StdRng::seed_from_u64(99);
    let dungeon = generate_rooms(40, 30, 1.0, &mut rng).unwrap();
    for x in 0..40 {
        assert_eq!(dungeon.grid.get(x, 0), Some(&Cell::Wall));
        assert_eq!(dungeon.grid.get(x, 29), Some(&Cell::Wall));
    }
    for y in 0..30 {
        assert_eq!(dungeon.grid.get(0, y), Some(&Cell::Wall));
        assert_eq!(dungeon.grid.get(39, y), Some(&Cell::Wall));
    }
}

#[test]
fn same_rng_state_same_dungeon() {
    let a = generate_rooms(32, 24, 0.6, &mut StdRng::seed_from_u64(3)).unwrap();
    let b = generate_rooms(32, 24, 0.6, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn pillars_only_in_large_rooms() {
    let dungeon = generate_rooms(60, 60, 1.0, &mut StdRng::seed_from_u64(12)).unwrap();
    for pillar in dungeon
        .decorations
        .iter()
        .filter(|d| d.kind == DecorationKind::Pillar)
    {
        let room = dungeon
            .rooms
            .iter()
            .find(|r| r.center_x == pillar.x && r.center_y == pillar.z)
            .expect("pillar sits at a room centre");
        assert!(room.width >= 6 && room.height >= 6);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_layout_is_connected(
        seed in any::<u64>(),
        width in 12usize..48,
        height in 12usize..48,
        complexity in 0.05f64..=1.0,
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dungeon = generate_rooms(width, height, complexity, &mut rng).unwrap();
        assert_well_formed(&dungeon);

        let target = (width as f64 * height as f64 * complexity / 50.0).floor() as usize;
        prop_assert!(dungeon.rooms.len() <= target);

        match dungeon.rooms.first() {
            Some(first) => {
                let reached = reachable_floor(&dungeon, first.center());
                prop_assert_eq!(reached.len(), dungeon.floor_count());
            }
            None => prop_assert_eq!(dungeon.floor_count(), 0),
        }
    }
}
