use serde::{Deserialize, Serialize};

use super::{Cricketer, PlayerId};

/// Which of the two teams in a match.
///
/// `Home` is the first team entered at setup ("team A"), `Away` the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    /// The other team
    #[inline]
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    #[inline]
    pub fn is_home(&self) -> bool {
        matches!(self, TeamSide::Home)
    }
}

/// Roster plus the batting/bowling role for the active innings.
///
/// Crease and bowling pointers are owned by the active `InningsData`,
/// so there is only one writable copy of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Cricketer>,
    #[serde(default)]
    pub is_batting: bool,
    #[serde(default)]
    pub is_bowling: bool,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            players: Vec::new(),
            is_batting: false,
            is_bowling: false,
        }
    }

    pub fn player(&self, player_id: &str) -> Option<&Cricketer> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: &str) -> Option<&mut Cricketer> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player(player_id).is_some()
    }

    /// Add a player unless one with the same id is already on the roster.
    /// Returns false for a duplicate.
    pub fn add_player(&mut self, player: Cricketer) -> bool {
        if self.has_player(&player.id) {
            return false;
        }
        self.players.push(player);
        true
    }

    pub fn retired_count(&self) -> u32 {
        self.players.iter().filter(|p| p.batting.is_retired).count() as u32
    }

    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        self.players.iter().map(|p| &p.id)
    }

    pub(crate) fn set_role(&mut self, batting: bool) {
        self.is_batting = batting;
        self.is_bowling = !batting;
    }
}
