use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Identifies a single chip for the whole lifetime of a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChipId(pub u32);

impl std::fmt::Display for ChipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// The lifecycle of a [`Chip`].
///
/// The only transitions are `New -> Prisoner` and `New | Prisoner -> Dead`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChipState {
    /// Still held by (or played by) the player whose color it carries.
    New,
    /// Captured at least once by some player.
    Prisoner,
    /// Sacrificed during a capture. Dead chips never return to play.
    Dead,
}

/// A single chip.
///
/// Chips are moved by value between hands, piles and the graveyard, so at
/// any point in time exactly one container holds a given chip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chip {
    pub id: ChipId,
    /// The color of the chip, i.e. the player it was created for. Never changes.
    pub color: PlayerId,
    /// The player currently holding the chip, or who held it when it was played.
    pub owner: PlayerId,
    pub state: ChipState,
}

impl Chip {
    pub fn new(id: ChipId, color: PlayerId) -> Self {
        Self {
            id,
            color,
            owner: color,
            state: ChipState::New,
        }
    }

    /// Hands the chip over to `new_owner` as a prisoner.
    pub fn capture(&mut self, new_owner: PlayerId) {
        debug_assert!(self.state != ChipState::Dead, "captured a dead chip");
        self.owner = new_owner;
        self.state = ChipState::Prisoner;
    }

    /// Marks the chip as dead. The owner is left as-is.
    pub fn kill(&mut self) {
        debug_assert!(self.state != ChipState::Dead, "killed a chip twice");
        self.state = ChipState::Dead;
    }

    pub fn is_dead(&self) -> bool {
        self.state == ChipState::Dead
    }
}

impl std::fmt::Display for Chip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} ({})", self.id, self.color, self.owner)
    }
}
