use chrono::Duration;
use database::{DatabaseConfig, GameRecord, GameStore, MemoryGameStore, SqliteGameStore};
use session::{input, SessionError, SessionManager};
use types::{GameId, GameStatus, LoserPoints, PlayerId, ValidationError};

fn memory_session() -> SessionManager<MemoryGameStore> {
    SessionManager::new(MemoryGameStore::new())
}

#[tokio::test]
async fn test_first_to_fifty_scenario() {
    let mut manager = memory_session();
    let game = manager
        .create_game(&["Ana", "Bo"], 50)
        .await
        .expect("Game should be created");
    let ana = game.player_by_name("Ana").unwrap().id.clone();
    let bo = game.player_by_name("Bo").unwrap().id.clone();

    let game = manager
        .record_round(&game.id, &ana, &[LoserPoints::new(bo.clone(), 30)])
        .await
        .unwrap();
    assert_eq!(game.player(&ana).unwrap().score, 30);
    assert_eq!(game.player(&bo).unwrap().score, 0);
    assert_eq!(game.round_count(), 1);

    let game = manager
        .record_round(&game.id, &bo, &[LoserPoints::new(ana.clone(), 10)])
        .await
        .unwrap();
    assert_eq!(game.player(&bo).unwrap().score, 10);
    assert_eq!(game.player(&ana).unwrap().score, 30);

    let game = manager
        .record_round(&game.id, &ana, &[LoserPoints::new(bo.clone(), 25)])
        .await
        .unwrap();
    assert_eq!(game.player(&ana).unwrap().score, 55);
    assert_eq!(game.check_victory().map(|p| p.name.as_str()), Some("Ana"));

    // the stored copy matches what was returned
    let stored = manager.load_game(&game.id).await.unwrap();
    assert_eq!(stored, game);
}

#[tokio::test]
async fn test_create_game_sets_current_and_persists() {
    let mut manager = memory_session();
    let game = manager.create_game(&["Ana", "Bo", "Cy"], 100).await.unwrap();

    assert!(game.players.iter().all(|p| p.score == 0));
    assert!(game.rounds.is_empty());
    assert_eq!(manager.current_game_id().await.unwrap(), Some(game.id.clone()));
    assert_eq!(manager.current_game().await.unwrap(), Some(game.clone()));
    assert_eq!(manager.store().len(), 1);
}

#[tokio::test]
async fn test_invalid_games_are_not_stored() {
    let mut manager = memory_session();

    let err = manager.create_game(&["Ana", "ana"], 100).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::DuplicateName(_))
    ));

    let err = manager.create_game(&["OnlyOne"], 100).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::TooFewPlayers(1))
    ));

    assert!(manager.store().is_empty());
    assert_eq!(manager.current_game_id().await.unwrap(), None);
}

#[tokio::test]
async fn test_rejected_round_leaves_store_untouched() {
    let mut manager = memory_session();
    let game = manager.create_game(&["Ana", "Bo"], 50).await.unwrap();
    let bo = game.players[1].id.clone();

    let err = manager
        .record_round(
            &game.id,
            &PlayerId::from("stranger"),
            &[LoserPoints::new(bo, 20)],
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::UnknownWinner(_))
    ));
    assert_eq!(manager.load_game(&game.id).await.unwrap(), game);
}

#[tokio::test]
async fn test_won_game_refuses_more_rounds_until_reset() {
    let mut manager = memory_session();
    let game = manager.create_game(&["Ana", "Bo"], 20).await.unwrap();
    let ana = game.players[0].id.clone();
    let bo = game.players[1].id.clone();

    let won = manager
        .record_round(&game.id, &ana, &[LoserPoints::new(bo.clone(), 25)])
        .await
        .unwrap();
    assert_eq!(won.status(), GameStatus::Won { winner: ana.clone() });

    let err = manager
        .record_round(&game.id, &bo, &[LoserPoints::new(ana.clone(), 5)])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::GameOver(ref name)) if name == "Ana"
    ));
    assert_eq!(manager.load_game(&game.id).await.unwrap(), won);

    let reset = manager.reset_scores(&game.id).await.unwrap();
    assert_eq!(reset.status(), GameStatus::Active);
    assert!(reset.rounds.is_empty());
    assert_eq!(reset.target_score, 20);
    assert_eq!(
        reset.players.iter().map(|p| &p.id).collect::<Vec<_>>(),
        won.players.iter().map(|p| &p.id).collect::<Vec<_>>()
    );
    assert!(reset.updated_at >= won.updated_at);

    manager
        .record_round(&game.id, &bo, &[LoserPoints::new(ana, 5)])
        .await
        .expect("Rounds are allowed again after a reset");
}

#[tokio::test]
async fn test_opening_a_game_detects_earlier_victory() {
    let mut manager = memory_session();
    let first = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();
    let second = manager.create_game(&["Cy", "Di"], 100).await.unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), Some(second.id.clone()));

    // scores edited outside the session, already past the target
    let mut edited = first.clone();
    edited.players[1].score = 120;
    manager
        .store_mut()
        .put(&edited.id, &GameRecord::from(&edited))
        .await
        .unwrap();

    let opened = manager.open_game(&first.id).await.unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), Some(first.id.clone()));
    assert_eq!(opened.check_victory().map(|p| p.name.as_str()), Some("Bo"));
}

#[tokio::test]
async fn test_missing_games_are_not_found() {
    let mut manager = memory_session();
    let ghost = GameId::from("ghost");

    assert!(matches!(
        manager.open_game(&ghost).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        manager.reset_scores(&ghost).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        manager.delete_game(&ghost).await,
        Err(SessionError::NotFound(_))
    ));
    assert!(matches!(
        manager
            .record_round(&ghost, &PlayerId::from("p"), &[])
            .await,
        Err(SessionError::NotFound(_))
    ));
    assert_eq!(manager.current_game_id().await.unwrap(), None);
}

#[tokio::test]
async fn test_deleting_current_game_clears_pointer() {
    let mut manager = memory_session();
    let older = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();
    let current = manager.create_game(&["Cy", "Di"], 100).await.unwrap();

    manager.delete_game(&older.id).await.unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), Some(current.id.clone()));

    manager.delete_game(&current.id).await.unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), None);
    assert!(manager.store().is_empty());
}

#[tokio::test]
async fn test_bulk_delete() {
    let mut manager = memory_session();
    let a = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();
    let b = manager.create_game(&["Cy", "Di"], 100).await.unwrap();
    let c = manager.create_game(&["Ed", "Flo"], 100).await.unwrap();

    manager
        .delete_games(&[a.id.clone(), GameId::from("unknown")])
        .await
        .unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), Some(c.id.clone()));

    manager
        .delete_games(&[b.id.clone(), c.id.clone()])
        .await
        .unwrap();
    assert_eq!(manager.current_game_id().await.unwrap(), None);
    assert!(manager.list_summaries().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_dangling_current_pointer_is_cleared() {
    let mut manager = memory_session();
    manager
        .store_mut()
        .set_current(Some(&GameId::from("vanished")))
        .await
        .unwrap();

    assert_eq!(manager.current_game().await.unwrap(), None);
    assert_eq!(manager.current_game_id().await.unwrap(), None);
}

#[tokio::test]
async fn test_summaries_are_most_recent_first() {
    let mut manager = memory_session();
    let first = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();
    let second = manager.create_game(&["Cy", "Di"], 100).await.unwrap();

    // pin the ordering on timestamps rather than on how fast the test runs
    let mut older = second.clone();
    older.updated_at = first.updated_at - Duration::seconds(60);
    manager
        .store_mut()
        .put(&older.id, &GameRecord::from(&older))
        .await
        .unwrap();

    let ana = first.players[0].id.clone();
    let bo = first.players[1].id.clone();
    manager
        .record_round(&first.id, &ana, &[LoserPoints::new(bo, 8)])
        .await
        .unwrap();

    let summaries = manager.list_summaries().await.unwrap();
    let ids: Vec<_> = summaries.iter().map(|s| s.id.clone()).collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(summaries[0].scores, vec![8, 0]);
    assert_eq!(summaries[0].player_names, vec!["Ana", "Bo"]);
}

#[tokio::test]
async fn test_round_from_typed_input() {
    let mut manager = memory_session();
    let game = manager.create_game(&["Ana", "Bo", "Cy"], 100).await.unwrap();

    let winner = input::resolve_player(&game, "cy").unwrap();
    let losers = input::parse_losers_points(&game, &["ana=12", "Bo=abc"]).unwrap();
    let game = manager.record_round(&game.id, &winner, &losers).await.unwrap();

    let cy = game.player_by_name("Cy").unwrap();
    assert_eq!(cy.score, 12);
    assert_eq!(game.rounds[0].points_gained, 12);
    assert_eq!(game.rounds[0].losers_points.len(), 2);
}

#[tokio::test]
async fn test_session_on_sqlite_survives_reopening_the_manager() {
    let store = SqliteGameStore::open(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    let mut manager = SessionManager::new(store);
    let game = manager.create_game(&["Ana", "Bo"], 30).await.unwrap();
    let ana = game.players[0].id.clone();
    let bo = game.players[1].id.clone();
    manager
        .record_round(&game.id, &ana, &[LoserPoints::new(bo, 31)])
        .await
        .unwrap();

    // same pool, fresh manager: the app reopening on the same device
    let mut manager = SessionManager::new(manager.into_store());
    let resumed = manager
        .current_game()
        .await
        .unwrap()
        .expect("Current game should resume");
    assert_eq!(resumed.id, game.id);
    assert_eq!(resumed.check_victory().map(|p| p.id.clone()), Some(ana));
    assert_eq!(manager.list_summaries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unreadable_current_game_can_still_be_deleted() {
    let mut manager = memory_session();
    let kept = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();
    let broken = GameId::from("broken");
    manager
        .store_mut()
        .insert_raw(broken.clone(), "{not json".to_string());
    manager.store_mut().set_current(Some(&broken)).await.unwrap();

    manager
        .delete_game(&broken)
        .await
        .expect("Unreadable game should be deletable");

    assert_eq!(manager.store().len(), 1);
    assert_eq!(manager.current_game_id().await.unwrap(), None);
    assert!(matches!(
        manager.delete_game(&broken).await,
        Err(SessionError::NotFound(_))
    ));
    assert_eq!(manager.load_game(&kept.id).await.unwrap(), kept);
}

#[tokio::test]
async fn test_legacy_record_with_negative_points_still_opens() {
    let mut manager = memory_session();
    let json = r#"{
        "id": "legacy",
        "players": [
            {"id": "p1", "name": "Ana", "score": 0},
            {"id": "p2", "name": "Bo", "score": 0}
        ],
        "createdAt": "2024-06-10T08:00:00.000Z",
        "rounds": [
            {
                "id": "r1",
                "winnerId": "p1",
                "pointsGained": -5,
                "losersPoints": [{"playerId": "p2", "points": -5}],
                "timestamp": "2024-06-10T08:30:00.000Z"
            },
            {
                "id": "r2",
                "winnerId": "p2",
                "pointsGained": null,
                "losersPoints": [{"playerId": "p1", "points": null}],
                "timestamp": "2024-06-10T08:40:00.000Z"
            }
        ]
    }"#;
    manager
        .store_mut()
        .insert_raw(GameId::from("legacy"), json.to_string());

    assert_eq!(manager.list_summaries().await.unwrap().len(), 1);
    let game = manager.open_game(&GameId::from("legacy")).await.unwrap();
    assert_eq!(game.round_count(), 2);
    assert!(game.rounds.iter().all(|r| r.points_gained == 0));
}

#[tokio::test]
async fn test_winner_listed_as_loser_is_reported_by_name() {
    let mut manager = memory_session();
    let game = manager.create_game(&["Ana", "Bo"], 100).await.unwrap();

    let winner = input::resolve_player(&game, "ana").unwrap();
    let losers = input::parse_losers_points(&game, &["Ana=5"]).unwrap();
    let err = manager
        .record_round(&game.id, &winner, &losers)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SessionError::Validation(ValidationError::DuplicateLoser(ref name)) if name == "Ana"
    ));
    assert!(err.to_string().contains("Ana"));
    assert!(!err.to_string().contains(winner.as_str()));
}
