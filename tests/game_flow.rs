//! End-to-end session scenarios, driven through the registry and games
//! with captured per-participant channels standing in for the sockets.

use pretty_assertions::assert_eq;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

use blockbattle_server::domain::{
    ClientMessage, GameRegistry, GameStatus, Participant, ParticipantStatus, ServerMessage,
};

fn connect(name: &str) -> (Participant, UnboundedReceiver<ServerMessage>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Participant::new(name, tx), rx)
}

fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

fn expect_game_info(msg: &ServerMessage) -> (&str, GameStatus, Vec<(&str, ParticipantStatus)>) {
    match msg {
        ServerMessage::GameInfo { name, status, users } => (
            name,
            *status,
            users.iter().map(|u| (u.name.as_str(), u.status)).collect(),
        ),
        other => panic!("expected game_info, got {other:?}"),
    }
}

/// Alice creates a game and sees herself alone in the lobby.
#[test]
fn creator_sees_a_single_player_lobby() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let alice_id = alice.id();

    let game = registry.create(alice);
    game.broadcast_game_info();

    let msgs = drain(&mut alice_rx);
    assert_eq!(msgs.len(), 1);
    let (name, status, users) = expect_game_info(&msgs[0]);
    assert_eq!(name, game.name());
    assert_eq!(status, GameStatus::Lobby);
    assert_eq!(users, vec![("Alice", ParticipantStatus::Alive)]);

    // And the game is reachable under its join code.
    assert_eq!(game.admin_id(), alice_id);
    assert!(registry.lookup(game.name()).is_some());
}

/// Bob joins by code; both players get the two-entry roster.
#[test]
fn joiner_appears_in_everyones_roster() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let game = registry.create(alice);
    game.broadcast_game_info();
    drain(&mut alice_rx);

    let (bob, mut bob_rx) = connect("Bob");
    let joined = registry.lookup(game.name()).expect("game exists");
    joined.join(bob).expect("lobby accepts joins");

    for rx in [&mut alice_rx, &mut bob_rx] {
        let msgs = drain(rx);
        assert_eq!(msgs.len(), 1);
        let (_, status, users) = expect_game_info(&msgs[0]);
        assert_eq!(status, GameStatus::Lobby);
        assert_eq!(
            users,
            vec![
                ("Alice", ParticipantStatus::Alive),
                ("Bob", ParticipantStatus::Alive),
            ]
        );
    }
}

/// The admin starts the game; everyone receives the same tile sequence.
#[test]
fn admin_start_distributes_one_tile_sequence() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let alice_id = alice.id();
    let game = registry.create(alice);
    let (bob, mut bob_rx) = connect("Bob");
    game.join(bob).unwrap();
    drain(&mut alice_rx);
    drain(&mut bob_rx);

    game.process(alice_id, ClientMessage::Start);
    assert_eq!(game.status(), GameStatus::Running);

    let tiles = game.tiles().expect("seed generated at start");
    assert_eq!(tiles.len(), 512);
    for rx in [&mut alice_rx, &mut bob_rx] {
        let msgs = drain(rx);
        assert_eq!(msgs, vec![ServerMessage::StartGame { tiles: tiles.clone() }]);
    }
}

/// With three alive players one death leaves the game running.
#[test]
fn first_death_of_three_keeps_playing() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let alice_id = alice.id();
    let game = registry.create(alice);
    let (bob, mut bob_rx) = connect("Bob");
    let bob_id = bob.id();
    game.join(bob).unwrap();
    let (carol, mut carol_rx) = connect("Carol");
    game.join(carol).unwrap();
    game.process(alice_id, ClientMessage::Start);
    for rx in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
        drain(rx);
    }

    game.process(bob_id, ClientMessage::Dead);
    assert_eq!(game.status(), GameStatus::Running);

    for rx in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
        let msgs = drain(rx);
        assert_eq!(msgs.len(), 1);
        let (_, status, users) = expect_game_info(&msgs[0]);
        assert_eq!(status, GameStatus::Running);
        assert_eq!(
            users,
            vec![
                ("Alice", ParticipantStatus::Alive),
                ("Bob", ParticipantStatus::Dead),
                ("Carol", ParticipantStatus::Alive),
            ]
        );
    }
}

/// Down to two players, a death ends the game: the survivor alone gets
/// `win`, the game finishes, and every later gameplay frame is a no-op.
#[test]
fn last_death_crowns_the_survivor_and_freezes_the_game() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let alice_id = alice.id();
    let game = registry.create(alice);
    let (bob, mut bob_rx) = connect("Bob");
    let bob_id = bob.id();
    game.join(bob).unwrap();
    game.process(alice_id, ClientMessage::Start);
    drain(&mut alice_rx);
    drain(&mut bob_rx);

    game.process(bob_id, ClientMessage::Dead);
    assert_eq!(game.status(), GameStatus::Finished);

    let alice_msgs = drain(&mut alice_rx);
    assert_eq!(alice_msgs.len(), 2);
    assert_eq!(alice_msgs[0], ServerMessage::Win);
    let (_, status, users) = expect_game_info(&alice_msgs[1]);
    assert_eq!(status, GameStatus::Finished);
    assert_eq!(
        users,
        vec![
            ("Alice", ParticipantStatus::Winner),
            ("Bob", ParticipantStatus::Dead),
        ]
    );

    let bob_msgs = drain(&mut bob_rx);
    assert_eq!(bob_msgs.len(), 1);
    assert!(!bob_msgs.contains(&ServerMessage::Win));

    // Frozen: nothing below changes state or produces a broadcast.
    let snapshot = game.game_info();
    game.process(alice_id, ClientMessage::Update { level: 42 });
    game.process(bob_id, ClientMessage::Lines { lines: 3 });
    game.process(alice_id, ClientMessage::Dead);
    game.process(Uuid::new_v4(), ClientMessage::Dead);
    assert_eq!(game.status(), GameStatus::Finished);
    assert_eq!(game.game_info(), snapshot);
    assert!(drain(&mut alice_rx).is_empty());
    assert!(drain(&mut bob_rx).is_empty());
}

/// Garbage lines reach everyone but their sender while the game runs.
#[test]
fn garbage_lines_skip_their_sender() {
    let registry = GameRegistry::new();
    let (alice, mut alice_rx) = connect("Alice");
    let alice_id = alice.id();
    let game = registry.create(alice);
    let (bob, mut bob_rx) = connect("Bob");
    game.join(bob).unwrap();
    let (carol, mut carol_rx) = connect("Carol");
    let carol_id = carol.id();
    game.join(carol).unwrap();
    game.process(alice_id, ClientMessage::Start);
    for rx in [&mut alice_rx, &mut bob_rx, &mut carol_rx] {
        drain(rx);
    }

    game.process(carol_id, ClientMessage::Lines { lines: 2 });
    assert_eq!(drain(&mut alice_rx), vec![ServerMessage::Lines { lines: 2 }]);
    assert_eq!(drain(&mut bob_rx), vec![ServerMessage::Lines { lines: 2 }]);
    assert!(drain(&mut carol_rx).is_empty());
}
