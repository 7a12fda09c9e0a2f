use std::fs;

use image::{Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sneaky_doctor_core::{
    Command, Event, Facing, GameConfig, GameStats, GridCell, Layer, MoveIntent, PathCursor,
    PatrolPath, RealPosition, RealRect,
};
use sneaky_doctor_level::{EnemyPatrol, ExitDoor, LevelAssets, LevelLoader, LevelMap};
use sneaky_doctor_system_movement::{CollisionOutcome, Movement, PlayerController};
use sneaky_doctor_world::{self as world, query, World};

const B: i32 = 30;

fn block(column: i32, row: i32) -> RealRect {
    RealRect::square(RealPosition::new(column * B, row * B), B)
}

fn player_at(x: i32, y: i32) -> RealRect {
    RealRect::square(RealPosition::new(x, y), B)
}

fn intent(horizontal: i32, vertical: i32) -> MoveIntent {
    MoveIntent {
        horizontal,
        vertical,
    }
}

fn sorted_walls(cells: &[(i32, i32)]) -> Vec<RealRect> {
    let mut cells = cells.to_vec();
    cells.sort_by_key(|&(column, row)| (row, column));
    cells
        .into_iter()
        .map(|(column, row)| block(column, row))
        .collect()
}

#[test]
fn walking_into_a_horizontal_wall_stops_on_its_top() {
    let controller = PlayerController::new(&GameConfig::default());
    let walls = sorted_walls(&[(3, 5), (4, 5), (5, 5), (6, 5), (7, 5), (8, 5)]);

    let aligned = controller.step(player_at(120, 118), intent(0, 1), &walls);
    assert_eq!(aligned.rect, player_at(120, 120));
    assert_eq!(aligned.collision, CollisionOutcome::PushedVertically { wall: 1 });

    let straddling = controller.step(player_at(125, 118), intent(0, 1), &walls);
    assert_eq!(straddling.rect, player_at(125, 120));
    assert_eq!(
        straddling.collision,
        CollisionOutcome::PushedVertically { wall: 1 }
    );
}

#[test]
fn walking_into_a_vertical_wall_slides_flush_against_it() {
    let controller = PlayerController::new(&GameConfig::default());
    let walls = sorted_walls(&[(6, 2), (6, 3), (6, 4), (6, 5), (6, 6)]);

    let step = controller.step(player_at(148, 100), intent(1, 0), &walls);

    assert_eq!(step.rect, player_at(150, 100));
    assert_eq!(step.collision, CollisionOutcome::PushedHorizontally { wall: 1 });

    let sliding = controller.step(step.rect, intent(1, 1), &walls);
    assert_eq!(sliding.rect, player_at(150, 103));
    assert_eq!(sliding.collision, CollisionOutcome::PushedHorizontally { wall: 1 });
}

#[test]
fn grazing_a_wall_end_rounds_the_corner() {
    let controller = PlayerController::new(&GameConfig::default());
    let walls = sorted_walls(&[(5, 5), (6, 5), (7, 5)]);

    let step = controller.step(player_at(122, 119), intent(1, 1), &walls);

    assert_eq!(step.rect, player_at(120, 122));
    assert_eq!(step.collision, CollisionOutcome::PushedHorizontally { wall: 0 });
}

#[test]
fn inside_corners_snap_for_every_diagonal() {
    let controller = PlayerController::new(&GameConfig::default());
    let cases = [
        (intent(1, 1), [(6, 5), (5, 6), (6, 6)], 2),
        (intent(1, -1), [(5, 4), (6, 4), (6, 5)], 1),
        (intent(-1, 1), [(4, 5), (4, 6), (5, 6)], 1),
        (intent(-1, -1), [(4, 4), (5, 4), (4, 5)], 0),
    ];

    for (direction, cells, anchor) in cases {
        let walls = sorted_walls(&cells);
        let step = controller.step(player_at(150, 150), direction, &walls);

        assert_eq!(step.rect, player_at(150, 150), "{direction:?}");
        assert_eq!(
            step.collision,
            CollisionOutcome::SnappedToCorner { wall: anchor },
            "{direction:?}"
        );
        assert!(!step.rect.collides_any(&walls));
    }
}

#[test]
fn inside_corner_snap_pulls_the_player_out_of_the_overlap() {
    let controller = PlayerController::new(&GameConfig::default());
    let walls = sorted_walls(&[(6, 5), (5, 6), (6, 6)]);

    let step = controller.step(player_at(151, 152), intent(1, 1), &walls);

    assert_eq!(step.rect, player_at(150, 150));
}

/// Straight wall segments are the layout the one-or-two overlap rule is
/// built for; the player must never end a tick inside one.
#[test]
fn straight_segments_are_never_penetrated() {
    let controller = PlayerController::new(&GameConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);

    for _ in 0..200 {
        let horizontal = rng.gen_bool(0.5);
        let start = (rng.gen_range(2..=20), rng.gen_range(2..=20));
        let length = rng.gen_range(1..=8);
        let cells: Vec<(i32, i32)> = (0..length)
            .map(|offset| {
                if horizontal {
                    (start.0 + offset, start.1)
                } else {
                    (start.0, start.1 + offset)
                }
            })
            .collect();
        let walls = sorted_walls(&cells);

        let mut rect = loop {
            let candidate = player_at(rng.gen_range(0..=900), rng.gen_range(0..=870));
            if !candidate.collides_any(&walls) {
                break candidate;
            }
        };

        let mut direction = intent(0, 0);
        for tick in 0..300 {
            if tick % 12 == 0 {
                direction = intent(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
            }
            let step = controller.step(rect, direction, &walls);
            assert!(
                !step.rect.collides_any(&walls),
                "penetrated {cells:?} at {:?} moving {direction:?} from {rect:?}",
                step.rect
            );
            rect = step.rect;
        }
    }
}

/// Arbitrary layouts may produce overlaps the resolver does not recognise;
/// those must leave the clamped move untouched instead of failing.
#[test]
fn arbitrary_layouts_never_fail() {
    let config = GameConfig::default();
    let controller = PlayerController::new(&config);
    let bounds = config.real_bounds();
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0002);

    for _ in 0..50 {
        let mut cells = Vec::new();
        for column in 0..12 {
            for row in 0..12 {
                if rng.gen_bool(0.35) {
                    cells.push((column, row));
                }
            }
        }
        let walls = sorted_walls(&cells);
        let mut rect = player_at(rng.gen_range(0..=330), rng.gen_range(0..=330));

        for _ in 0..200 {
            let direction = intent(rng.gen_range(-1..=1), rng.gen_range(-1..=1));
            let velocity = controller.velocity(direction);
            let step = controller.step(rect, direction, &walls);

            if let CollisionOutcome::Unresolved { colliding } = step.collision {
                let mut clamped = rect.translated(velocity.dx, velocity.dy);
                clamped.clamp_within(&bounds);
                assert_eq!(step.rect, clamped);
                assert!(colliding >= 3);
            }
            rect = step.rect;
        }
    }
}

fn patrol(len: i32, start_index: usize) -> EnemyPatrol {
    let positions = (0..len).map(|x| RealPosition::new(300 + x, 450)).collect();
    EnemyPatrol {
        name: "npc1.png".to_owned(),
        start: GridCell::new(10, 15),
        route: vec![GridCell::new(10, 15), GridCell::new(11, 15)],
        path: PatrolPath::new(positions).expect("path"),
        start_index,
    }
}

fn level(patrols: Vec<EnemyPatrol>) -> LevelAssets {
    LevelAssets {
        number: 1,
        map: LevelMap {
            walls: Vec::new(),
            exit: ExitDoor {
                cell: GridCell::new(30, 0),
                rect: block(30, 0),
                lower_layer: Layer::new(0),
                upper_layer: Layer::new(1),
            },
            masks: Vec::new(),
            start: GridCell::new(5, 5),
        },
        patrols,
    }
}

fn run_tick(world: &mut World, movement: &mut Movement, direction: MoveIntent) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick, &mut events);

    let mut commands = Vec::new();
    let player = query::player(world);
    let enemies = query::enemy_view(world);
    let walls = query::wall_rects(world);
    movement.handle(&events, direction, &player, &enemies, walls, &mut commands);

    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn enemies_reflect_off_the_path_end() {
    let config = GameConfig {
        enemy_speed: 3,
        ..GameConfig::default()
    };
    let mut world = World::new(&config, level(vec![patrol(10, 8)]), &GameStats::new_game());
    let mut movement = Movement::new(&config);

    let events = run_tick(&mut world, &mut movement, MoveIntent::default());

    assert!(events.contains(&Event::EnemyMoved {
        enemy: sneaky_doctor_core::EnemyId::new(0),
        from: RealPosition::new(308, 450),
        to: RealPosition::new(307, 450),
        facing: Facing::Left,
    }));
    let enemy = query::enemy_view(&world).into_vec()[0];
    assert_eq!(enemy.cursor, PathCursor::new(7, -3));
    assert_eq!(enemy.rect.origin(), RealPosition::new(307, 450));
}

#[test]
fn enemies_ping_pong_forever_within_the_path() {
    let config = GameConfig::default();
    let mut world = World::new(&config, level(vec![patrol(61, 30)]), &GameStats::new_game());
    let mut movement = Movement::new(&config);

    for _ in 0..500 {
        let _ = run_tick(&mut world, &mut movement, MoveIntent::default());
        let enemy = query::enemy_view(&world).into_vec()[0];
        assert!(enemy.cursor.index() <= 60);
        assert_eq!(enemy.cursor.step().abs(), 7);
    }
}

fn turned(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::PlayerTurned { .. }))
        .count()
}

#[test]
fn player_turns_only_when_horizontal_direction_changes() {
    let config = GameConfig::default();
    let mut world = World::new(&config, level(Vec::new()), &GameStats::new_game());
    let mut movement = Movement::new(&config);

    assert_eq!(turned(&run_tick(&mut world, &mut movement, intent(1, 0))), 0);
    assert_eq!(turned(&run_tick(&mut world, &mut movement, intent(-1, 0))), 1);
    assert_eq!(turned(&run_tick(&mut world, &mut movement, intent(0, 1))), 0);
    assert_eq!(turned(&run_tick(&mut world, &mut movement, intent(-1, -1))), 0);

    let player = query::player(&world);
    assert_eq!(player.facing, Facing::Left);
    assert_eq!(player.rect, player_at(150 + 5 - 5 - 3, 150 + 5 - 3));
}

#[test]
fn dying_player_stands_still() {
    let config = GameConfig::default();
    let mut world = World::new(&config, level(Vec::new()), &GameStats::new_game());
    let mut movement = Movement::new(&config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::KillPlayer, &mut events);

    let events = run_tick(&mut world, &mut movement, intent(-1, 0));

    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PlayerMoved { .. } | Event::PlayerTurned { .. })));
    assert_eq!(query::player(&world).rect, player_at(150, 150));
}

#[test]
fn patrols_through_walls_stay_on_their_path() {
    const BLANK: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    let root = tempfile::tempdir().expect("temp dir");
    let config = GameConfig::default();
    let loader = LevelLoader::new(root.path(), &config);
    let dir = loader.level_dir(1);
    fs::create_dir_all(&dir).expect("level dir");

    let mut map = RgbaImage::from_pixel(32, 31, BLANK);
    for row in 0..31 {
        map.put_pixel(8, row, BLACK);
    }
    map.put_pixel(2, 20, BLUE);
    map.put_pixel(20, 20, GREEN);
    map.save(dir.join("map1.png")).expect("map written");

    let mut route = RgbaImage::from_pixel(32, 31, BLANK);
    route.put_pixel(3, 12, GREEN);
    for column in 4..=14 {
        route.put_pixel(column, 12, BLACK);
    }
    route.save(dir.join("npc1.png")).expect("patrol written");

    let assets = loader.load(1).expect("level loads");
    let last = assets.patrols[0].path.last_index();
    let mut world = World::new(&config, assets, &GameStats::new_game());
    let mut movement = Movement::new(&config);
    let walls = query::wall_rects(&world).to_vec();

    let mut ticks_inside_walls = 0;
    for _ in 0..600 {
        let _ = run_tick(&mut world, &mut movement, intent(0, 0));
        let enemy = query::enemy_view(&world).into_vec()[0];
        assert!(enemy.cursor.index() <= last);
        assert_eq!(
            enemy.path.get(enemy.cursor.index()),
            Some(enemy.rect.origin())
        );
        if enemy.rect.collides_any(&walls) {
            ticks_inside_walls += 1;
        }
    }
    assert!(ticks_inside_walls > 0);
}
