//! Integration tests for GameStore implementations
//!
//! Every store is driven through the same contract checks so the in-memory store
//! stays interchangeable with the SQLite one.

use database::{DatabaseConfig, GameRecord, GameStore, MemoryGameStore, SqliteGameStore};
use types::{Game, GameId, LoserPoints};

fn played_game(names: &[&str]) -> Game {
    let mut game = Game::new(names, 40).expect("valid game");
    let winner = game.players[0].id.clone();
    let loser = game.players[1].id.clone();
    game.record_round(&winner, &[LoserPoints::new(loser, 15)])
        .expect("valid round");
    game
}

async fn check_store_contract(store: &mut dyn GameStore) {
    let first = played_game(&["Ana", "Bo"]);
    let second = played_game(&["Cy", "Di", "Ed"]);

    store.put(&first.id, &GameRecord::from(&first)).await.unwrap();
    store.put(&second.id, &GameRecord::from(&second)).await.unwrap();
    store.set_current(Some(&second.id)).await.unwrap();

    let loaded: Game = store.get(&first.id).await.unwrap().unwrap().into();
    assert_eq!(loaded, first);
    assert_eq!(store.list_all().await.unwrap().len(), 2);
    assert_eq!(store.get_current().await.unwrap(), Some(second.id.clone()));

    assert!(store.delete(&first.id).await.unwrap());
    assert!(store.get(&first.id).await.unwrap().is_none());
    assert!(!store.delete(&first.id).await.unwrap());

    store
        .delete_many(&[second.id.clone(), GameId::from("unknown")])
        .await
        .unwrap();
    assert!(store.list_all().await.unwrap().is_empty());

    // the pointer is the session's to clear, not the store's
    assert_eq!(store.get_current().await.unwrap(), Some(second.id.clone()));
    store.set_current(None).await.unwrap();
    assert_eq!(store.get_current().await.unwrap(), None);
}

#[tokio::test]
async fn test_memory_store_contract() {
    let mut store = MemoryGameStore::new();
    check_store_contract(&mut store).await;
}

#[tokio::test]
async fn test_sqlite_store_contract() {
    let mut store = SqliteGameStore::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    check_store_contract(&mut store).await;
}

#[tokio::test]
async fn test_store_trait_objects() {
    let sqlite = SqliteGameStore::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");

    let stores: Vec<Box<dyn GameStore>> = vec![Box::new(MemoryGameStore::new()), Box::new(sqlite)];
    for mut store in stores {
        let game = played_game(&["Ana", "Bo"]);
        store.put(&game.id, &GameRecord::from(&game)).await.unwrap();
        let summary = Game::from(store.get(&game.id).await.unwrap().unwrap()).summary();
        assert_eq!(summary.scores, vec![15, 0]);
    }
}

#[tokio::test]
async fn test_records_written_by_one_store_load_in_the_other() {
    let game = played_game(&["Ana", "Bo"]);
    let mut memory = MemoryGameStore::new();
    memory.put(&game.id, &GameRecord::from(&game)).await.unwrap();

    let mut sqlite = SqliteGameStore::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    for record in memory.list_all().await.unwrap() {
        let id = GameId::from(record.id.clone());
        sqlite.put(&id, &record).await.unwrap();
    }

    let loaded: Game = sqlite.get(&game.id).await.unwrap().unwrap().into();
    assert_eq!(loaded, game);
}
