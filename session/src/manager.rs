use std::cmp::Reverse;

use database::{GameRecord, GameStore};
use log;
use types::{Game, GameId, GameSummary, LoserPoints, PlayerId, ValidationError};

use crate::SessionError;

/// Drives game lifecycles against a [`GameStore`]. Each operation loads the game,
/// applies one transition and writes the whole record back, so a rejected
/// operation never reaches the store.
///
/// The current-game pointer lives in the store and only changes through
/// [`create_game`](Self::create_game), [`open_game`](Self::open_game) and the
/// delete operations.
pub struct SessionManager<S: GameStore> {
    store: S,
}

impl<S: GameStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub async fn create_game<N: AsRef<str>>(
        &mut self,
        names: &[N],
        target_score: u32,
    ) -> Result<Game, SessionError> {
        let game = Game::new(names, target_score)?;
        self.save(&game).await?;
        self.store.set_current(Some(&game.id)).await?;
        log::info!("Created game {}", game.id);
        Ok(game)
    }

    pub async fn load_game(&mut self, game_id: &GameId) -> Result<Game, SessionError> {
        self.store
            .get(game_id)
            .await?
            .map(Game::from)
            .ok_or_else(|| SessionError::NotFound(game_id.clone()))
    }

    /// Loads a stored game and makes it the current one. A game whose stored
    /// scores already reach the target comes back won.
    pub async fn open_game(&mut self, game_id: &GameId) -> Result<Game, SessionError> {
        let game = self.load_game(game_id).await?;
        self.store.set_current(Some(game_id)).await?;
        if let Some(winner) = game.check_victory() {
            log::info!("Opened game {game_id}, already won by {}", winner.name);
        }
        Ok(game)
    }

    pub async fn current_game_id(&mut self) -> Result<Option<GameId>, SessionError> {
        Ok(self.store.get_current().await?)
    }

    /// The game to resume, if any. A pointer to a game that is gone is cleared.
    pub async fn current_game(&mut self) -> Result<Option<Game>, SessionError> {
        let Some(game_id) = self.store.get_current().await? else {
            return Ok(None);
        };
        match self.store.get(&game_id).await? {
            Some(record) => Ok(Some(record.into())),
            None => {
                log::warn!("Current game {game_id} no longer exists, clearing pointer");
                self.store.set_current(None).await?;
                Ok(None)
            }
        }
    }

    pub async fn record_round(
        &mut self,
        game_id: &GameId,
        winner_id: &PlayerId,
        losers_points: &[LoserPoints],
    ) -> Result<Game, SessionError> {
        let mut game = self.load_game(game_id).await?;
        if let Some(winner) = game.check_victory() {
            return Err(ValidationError::GameOver(winner.name.clone()).into());
        }

        game.record_round(winner_id, losers_points)?;
        self.save(&game).await?;

        if let Some(winner) = game.check_victory() {
            log::info!(
                "{} reached {} points and wins game {game_id}",
                winner.name,
                game.target_score
            );
        }
        Ok(game)
    }

    pub async fn reset_scores(&mut self, game_id: &GameId) -> Result<Game, SessionError> {
        let mut game = self.load_game(game_id).await?;
        game.reset_scores();
        self.save(&game).await?;
        Ok(game)
    }

    /// Removes a game even when its stored record can no longer be read.
    pub async fn delete_game(&mut self, game_id: &GameId) -> Result<(), SessionError> {
        if !self.store.delete(game_id).await? {
            return Err(SessionError::NotFound(game_id.clone()));
        }
        if self.store.get_current().await?.as_ref() == Some(game_id) {
            self.store.set_current(None).await?;
        }
        log::info!("Deleted game {game_id}");
        Ok(())
    }

    /// Deletes every listed game that exists; unknown ids are ignored.
    pub async fn delete_games(&mut self, game_ids: &[GameId]) -> Result<(), SessionError> {
        if game_ids.is_empty() {
            return Ok(());
        }
        self.store.delete_many(game_ids).await?;
        if let Some(current) = self.store.get_current().await? {
            if game_ids.contains(&current) {
                self.store.set_current(None).await?;
            }
        }
        log::info!("Deleted {} games", game_ids.len());
        Ok(())
    }

    /// Summaries of every stored game, most recently updated first.
    pub async fn list_summaries(&mut self) -> Result<Vec<GameSummary>, SessionError> {
        let mut summaries: Vec<GameSummary> = self
            .store
            .list_all()
            .await?
            .into_iter()
            .map(|record| Game::from(record).summary())
            .collect();
        summaries.sort_by_key(|s| Reverse(s.updated_at));
        Ok(summaries)
    }

    async fn save(&mut self, game: &Game) -> Result<(), SessionError> {
        self.store.put(&game.id, &GameRecord::from(game)).await?;
        Ok(())
    }
}
