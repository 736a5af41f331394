//! Game registry: join-code allocation and lookup.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;

use super::game::Game;
use super::participant::Participant;

/// Length of the public join code.
const NAME_LEN: usize = 8;

/// All live games, keyed by join code. Games are never removed; they live
/// for the process lifetime.
#[derive(Default)]
pub struct GameRegistry {
    games: DashMap<String, Arc<Game>>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a game with `admin` as its creator, under a fresh unique
    /// join code. The code is reserved in the map before this returns, so
    /// two concurrent creators can never be handed the same one.
    pub fn create(&self, admin: Participant) -> Arc<Game> {
        loop {
            let name = generate_name();
            match self.games.entry(name.clone()) {
                // Astronomically rare with 26^8 codes, but handled: retry.
                Entry::Occupied(_) => continue,
                Entry::Vacant(entry) => {
                    let game = Arc::new(Game::new(name, admin));
                    entry.insert(Arc::clone(&game));
                    return game;
                }
            }
        }
    }

    /// Look up a game by its join code.
    pub fn lookup(&self, name: &str) -> Option<Arc<Game>> {
        self.games.get(name).map(|g| Arc::clone(g.value()))
    }

    /// Number of registered games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Random 8-letter uppercase join code.
fn generate_name() -> String {
    let mut rng = rand::rng();
    (0..NAME_LEN)
        .map(|_| rng.random_range(b'A'..=b'Z') as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::messages::ServerMessage;
    use tokio::sync::mpsc;

    fn admin(name: &str) -> Participant {
        let (tx, rx) = mpsc::unbounded_channel();
        // Receivers are not exercised here; leak them so sends keep working.
        std::mem::forget(rx);
        Participant::new(name, tx)
    }

    #[test]
    fn join_codes_are_eight_uppercase_letters() {
        for _ in 0..50 {
            let name = generate_name();
            assert_eq!(name.len(), 8);
            assert!(name.chars().all(|c| c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn created_game_is_found_under_its_code() {
        let registry = GameRegistry::new();
        let game = registry.create(admin("Alice"));
        let found = registry.lookup(game.name()).expect("registered game");
        assert!(Arc::ptr_eq(&game, &found));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn lookup_of_unknown_code_is_none() {
        let registry = GameRegistry::new();
        assert!(registry.lookup("NOTAGAME").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn creator_is_admin_and_first_roster_entry() {
        let registry = GameRegistry::new();
        let creator = admin("Alice");
        let creator_id = creator.id();
        let game = registry.create(creator);
        assert_eq!(game.admin_id(), creator_id);
        match game.game_info() {
            ServerMessage::GameInfo { users, .. } => {
                assert_eq!(users.len(), 1);
                assert_eq!(users[0].id, creator_id);
            }
            other => panic!("expected game_info, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_creation_never_reuses_a_code() {
        let registry = Arc::new(GameRegistry::new());
        let mut handles = Vec::new();
        for t in 0..8 {
            let registry = Arc::clone(&registry);
            handles.push(std::thread::spawn(move || {
                (0..25)
                    .map(|i| registry.create(admin(&format!("p{t}-{i}"))).name().to_owned())
                    .collect::<Vec<_>>()
            }));
        }
        let mut names: Vec<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(names.len(), 200);
        assert_eq!(registry.len(), 200);
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 200, "duplicate join code handed out");
    }
}
