use serde::{Deserialize, Serialize};

use crate::{ChipId, PileId, PlayerId};

/// What a player does on their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Start a new pile.
    ///
    /// Without an explicit chip, the first chip in hand is played.
    New {
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        chip: Option<ChipId>,
    },
    /// Play on an existing pile, or capture it if its top chip has the
    /// player's color.
    Existing {
        pile_id: PileId,
        #[serde(skip_serializing_if = "Option::is_none")]
        #[serde(default)]
        chip: Option<ChipId>,
    },
    /// Give a chip to another player. Not supported by the engine.
    Transfer {
        chip: Option<ChipId>,
        dest_player: PlayerId,
    },
    /// Concede. Not supported by the engine.
    Defeated,
}

/// The kind of an [`Action`], without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    New,
    Existing,
    Transfer,
    Defeated,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionKind::New => "NEW",
            ActionKind::Existing => "EXISTING",
            ActionKind::Transfer => "TRANSFER",
            ActionKind::Defeated => "DEFEATED",
        };
        f.write_str(s)
    }
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::New { .. } => ActionKind::New,
            Action::Existing { .. } => ActionKind::Existing,
            Action::Transfer { .. } => ActionKind::Transfer,
            Action::Defeated => ActionKind::Defeated,
        }
    }
}

/// A single move, as decided by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMove {
    pub player: PlayerId,
    pub action: Action,
}

impl PlayerMove {
    /// Start a new pile with the first chip in hand.
    pub fn new_pile(player: PlayerId) -> Self {
        Self {
            player,
            action: Action::New { chip: None },
        }
    }

    pub fn existing(player: PlayerId, pile_id: PileId, chip: Option<ChipId>) -> Self {
        Self {
            player,
            action: Action::Existing { pile_id, chip },
        }
    }
}

impl std::fmt::Display for PlayerMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.player, self.action.kind())?;
        match self.action {
            Action::New { chip: Some(chip) } => write!(f, " - {}", chip),
            Action::New { chip: None } | Action::Defeated => Ok(()),
            Action::Existing { pile_id, chip } => {
                write!(f, " - {}", pile_id)?;
                if let Some(chip) = chip {
                    write!(f, " - {}", chip)?;
                }
                Ok(())
            }
            Action::Transfer { chip, dest_player } => match chip {
                Some(chip) => write!(f, " - {} -> {}", chip, dest_player),
                None => write!(f, " -> {}", dest_player),
            },
        }
    }
}

/// Summarizes the outcome of playing a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    /// A chip was played, either starting a pile or on top of one.
    None,
    /// The player captured a pile.
    Capture,
    /// The player had to start a pile without chips and is out of the game.
    PendingDefeat,
}

impl std::fmt::Display for MoveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MoveOutcome::None => "NONE",
            MoveOutcome::Capture => "CAPTURE",
            MoveOutcome::PendingDefeat => "PENDING_DEFEAT",
        };
        f.write_str(s)
    }
}

/// One entry of the game history.
///
/// Together with the starting roster, the records contain every decision
/// needed to replay a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    #[serde(rename = "move")]
    pub mv: PlayerMove,
    /// Index into the captured pile of the chip that was killed.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub killed_chip: Option<usize>,
    pub outcome: MoveOutcome,
    /// `None` once nobody is left alive.
    pub next_player: Option<PlayerId>,
}

impl std::fmt::Display for TurnRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ==> {}", self.mv, self.outcome)?;
        if let Some(idx) = self.killed_chip {
            write!(f, " (killed [{}])", idx)?;
        }
        match self.next_player {
            Some(player) => write!(f, " ==> {}", player),
            None => write!(f, " ==> -"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_json_format() {
        let mv = PlayerMove::existing(PlayerId(1), PileId(4), None);
        let json = serde_json::to_string(&mv).unwrap();
        assert_eq!(
            json,
            r#"{"player":1,"action":{"type":"Existing","pile_id":4}}"#
        );
        let back: PlayerMove = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mv);
    }

    #[test]
    fn new_action_without_chip_parses() {
        let action: Action = serde_json::from_str(r#"{"type":"New"}"#).unwrap();
        assert_eq!(action, Action::New { chip: None });
    }

    #[test]
    fn display() {
        let mv = PlayerMove::existing(PlayerId(0), PileId(2), Some(ChipId(5)));
        assert_eq!(mv.to_string(), "p0 - EXISTING - #2 - c5");
        let record = TurnRecord {
            mv: PlayerMove::new_pile(PlayerId(3)),
            killed_chip: None,
            outcome: MoveOutcome::None,
            next_player: Some(PlayerId(1)),
        };
        assert_eq!(record.to_string(), "p3 - NEW ==> NONE ==> p1");
    }
}
