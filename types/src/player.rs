use std::fmt::Display;

use crate::PlayerId;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub score: u64,
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.score)
    }
}

impl Player {
    pub fn new(name: String) -> Self {
        Self {
            id: PlayerId::generate(),
            name,
            score: 0,
        }
    }

    pub fn new_with_id(id: PlayerId, name: String, score: u64) -> Self {
        Self { id, name, score }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}
