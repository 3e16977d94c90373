use campus_invasion::{Command, Game, GameEvent, HighScoreStore, Settings};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn new_game(dir: &tempfile::TempDir, seed: u64) -> Game<StdRng> {
    let store = HighScoreStore::new(dir.path().join("high_score.txt"));
    Game::new(Settings::default(), store, StdRng::seed_from_u64(seed))
}

/// Hold right and fire on a fixed cadence for `frames` frames.
fn autoplay(game: &mut Game<StdRng>, frames: usize) -> Vec<GameEvent> {
    let mut events = game.handle(Command::Play);
    events.extend(game.handle(Command::MoveRight(true)));
    for frame in 0..frames {
        if frame % 20 == 0 {
            events.extend(game.handle(Command::Fire));
        }
        if frame % 300 == 150 {
            events.extend(game.handle(Command::MoveRight(false)));
            events.extend(game.handle(Command::MoveLeft(true)));
        }
        events.extend(game.tick());
    }
    events
}

#[test]
fn test_seeded_games_are_deterministic() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();
    let mut a = new_game(&dir_a, 2024);
    let mut b = new_game(&dir_b, 2024);

    let events_a = autoplay(&mut a, 2_000);
    let events_b = autoplay(&mut b, 2_000);

    assert_eq!(events_a, events_b);
    assert_eq!(a.stats(), b.stats());
    assert_eq!(a.aliens().len(), b.aliens().len());
    assert_eq!(a.alien_bullets().len(), b.alien_bullets().len());
}

#[test]
fn test_alien_bullets_keep_their_speed() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(&dir, 99);
    game.handle(Command::Play);

    for _ in 0..3_000 {
        game.tick();
        if !game.is_active() {
            break;
        }
        let speed = game.settings().dynamic.alien_bullet_speed;
        for bullet in game.alien_bullets() {
            let magnitude = bullet.dx * bullet.dx + bullet.dy * bullet.dy;
            assert!((magnitude - speed * speed).abs() < 1e-3);
        }
    }
}

#[test]
fn test_ships_only_lost_while_lives_remain() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(&dir, 5);

    // An idle player eventually loses every ship.
    game.handle(Command::Play);
    let mut events = Vec::new();
    for _ in 0..200_000 {
        events.extend(game.tick());
        if !game.is_active() {
            break;
        }
    }

    let lost: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ShipLost { ships_left } => Some(*ships_left),
            _ => None,
        })
        .collect();
    assert_eq!(lost, vec![2, 1, 0]);
    assert_eq!(events.last(), Some(&GameEvent::GameOver));
    assert!(!game.is_active());

    // Playing again resets the stats but keeps the high score.
    let high = game.stats().high_score;
    game.handle(Command::Play);
    assert_eq!(game.stats().ships_left, 3);
    assert_eq!(game.stats().score, 0);
    assert_eq!(game.stats().high_score, high);
}

#[test]
fn test_high_score_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut game = new_game(&dir, 11);
    autoplay(&mut game, 3_000);
    let high = game.stats().high_score;
    game.quit().unwrap();

    let restarted = new_game(&dir, 12);
    assert_eq!(restarted.stats().high_score, high);
    assert!(!restarted.is_active());
}
