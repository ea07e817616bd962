use serde::{Deserialize, Serialize};

/// Rules and limits for one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// How many chips of their own color every player starts with.
    pub chips_per_player: usize,
    /// How often a decision-maker is asked again after an invalid answer,
    /// counting the first request. Values below 1 are treated as 1.
    pub max_decision_attempts: usize,
    /// End the game after this many turns, even if players are still alive.
    pub max_turns: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            chips_per_player: 7,
            max_decision_attempts: 3,
            max_turns: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"max_turns": 500}"#).unwrap();
        assert_eq!(
            config,
            GameConfig {
                max_turns: Some(500),
                ..GameConfig::default()
            }
        );
    }
}
