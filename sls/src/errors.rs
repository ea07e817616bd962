use crate::{ActionKind, ChipId, PileId, PlayerId};

/// The error type for a decision that kept being answered with an invalid
/// choice, even after re-asking.
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidDecision {
    ChipToKillOutOfRange {
        index: usize,
        pile_len: usize,
        attempts: usize,
    },
    NextPlayerNotACandidate {
        choice: PlayerId,
        candidates: Vec<PlayerId>,
        attempts: usize,
    },
}

impl std::error::Error for InvalidDecision {}

impl std::fmt::Display for InvalidDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidDecision::ChipToKillOutOfRange { index, pile_len, attempts } =>
                write!(f, "Chip index {} is out of range for a pile of {} chips (asked {} times)", index, pile_len, attempts),
            InvalidDecision::NextPlayerNotACandidate { choice, candidates, attempts } => {
                write!(f, "Player {} is not among the candidates [", choice)?;
                for (i, candidate) in candidates.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", candidate)?;
                }
                write!(f, "] (asked {} times)", attempts)
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
/// The error type for one turn.
///
/// A turn that fails with this error has not changed the game state.
pub enum IllegalMove {
    GameOver,
    NoSuchPlayer {
        player: PlayerId,
    },
    NotPlayersTurn {
        player: PlayerId,
        current: PlayerId,
    },
    PlayerIsDead {
        player: PlayerId,
    },
    NoSuchPile {
        pile_id: PileId,
    },
    ChipNotInHand {
        chip: ChipId,
    },
    NoChipToPlay,
    UnsupportedAction {
        kind: ActionKind,
    },
    InvalidDecision(InvalidDecision),
}

impl std::error::Error for IllegalMove {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IllegalMove::InvalidDecision(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InvalidDecision> for IllegalMove {
    fn from(err: InvalidDecision) -> Self {
        IllegalMove::InvalidDecision(err)
    }
}

impl std::fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalMove::GameOver => write!(f, "Tried to move after the game ended"),
            IllegalMove::NoSuchPlayer { player } => write!(f, "Player {} does not exist", player),
            IllegalMove::NotPlayersTurn { player, current } => {
                write!(f, "Player {} moved, but it is {}'s turn", player, current)
            }
            IllegalMove::PlayerIsDead { player } => {
                write!(f, "Player {} has been defeated and cannot move", player)
            }
            IllegalMove::NoSuchPile { pile_id } => write!(f, "Pile {} does not exist", pile_id),
            IllegalMove::ChipNotInHand { chip } => {
                write!(f, "Tried to play chip {}, which is not in the player's hand", chip)
            }
            IllegalMove::NoChipToPlay => write!(f, "Tried to play a chip with an empty hand"),
            IllegalMove::UnsupportedAction { kind } => {
                write!(f, "The {} action is not supported", kind)
            }
            IllegalMove::InvalidDecision(_) => write!(f, "The player made an invalid decision"),
        }
    }
}
