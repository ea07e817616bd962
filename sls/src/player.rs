use serde::{Deserialize, Serialize};

use crate::{Chip, ChipId, Pile};

/// The seat of a player in the roster. Also serves as the player's chip color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub usize);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Alive,
    Dead,
}

/// The state for a single player during one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Display name of the player's color, e.g. "red".
    pub color: String,
    /// All chips in hand, both the player's own and prisoners.
    pub chips: Vec<Chip>,
    pub state: PlayerState,
}

impl Player {
    /// Creates a player holding `num_chips` fresh chips of its own color,
    /// with ids counting up from `first_chip`.
    pub fn new(id: PlayerId, color: &str, first_chip: ChipId, num_chips: u32) -> Self {
        let chips = (0..num_chips)
            .map(|i| Chip::new(ChipId(first_chip.0 + i), id))
            .collect();
        Self {
            id,
            color: String::from(color),
            chips,
            state: PlayerState::Alive,
        }
    }

    pub fn alive(&self) -> bool {
        self.state == PlayerState::Alive
    }

    pub fn defeat(&mut self) {
        self.state = PlayerState::Dead;
    }

    pub fn has_chip(&self, chip: ChipId) -> bool {
        self.chips.iter().any(|c| c.id == chip)
    }

    /// Takes a chip out of the hand: the given one, or the first one if `None`.
    pub(crate) fn take_chip(&mut self, chip: Option<ChipId>) -> Option<Chip> {
        let idx = match chip {
            Some(chip_id) => self.chips.iter().position(|c| c.id == chip_id)?,
            None if self.chips.is_empty() => return None,
            None => 0,
        };
        Some(self.chips.remove(idx))
    }

    /// Captures a whole pile.
    ///
    /// The chip at `chip_to_kill` is killed and returned, the remaining chips
    /// become prisoners of this player and are appended to its hand.
    /// Panics if `chip_to_kill` is out of range.
    pub(crate) fn capture(&mut self, pile: &mut Pile, chip_to_kill: usize) -> Chip {
        let mut chips = pile.take_chips();
        let mut killed = chips.remove(chip_to_kill);
        killed.kill();
        for mut chip in chips {
            chip.capture(self.id);
            self.chips.push(chip);
        }
        killed
    }
}
