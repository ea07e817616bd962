use serde::{Deserialize, Serialize};

use crate::{Chip, PlayerId};

/// Identifies a pile. Ids are handed out in increasing order and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PileId(pub u32);

impl std::fmt::Display for PileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Chips played on top of each other, in play order.
///
/// The first chip is at index 0, the most recently played chip is the last one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    pub id: PileId,
    chips: Vec<Chip>,
}

impl Pile {
    /// Starts a pile with a single chip.
    pub fn new(id: PileId, first_chip: Chip) -> Self {
        Self {
            id,
            chips: vec![first_chip],
        }
    }

    pub fn push(&mut self, chip: Chip) {
        self.chips.push(chip);
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Chip> {
        self.chips.get(idx)
    }

    /// The chip that started the pile.
    pub fn first(&self) -> Option<&Chip> {
        self.chips.first()
    }

    /// The most recently played chip.
    pub fn top(&self) -> Option<&Chip> {
        self.chips.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chip> {
        self.chips.iter()
    }

    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// The owners of the chips, in the same order as the chips.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.chips.iter().map(|chip| chip.owner)
    }

    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players().any(|owner| owner == player)
    }

    /// Removes and returns all chips, leaving the pile empty.
    pub(crate) fn take_chips(&mut self) -> Vec<Chip> {
        std::mem::take(&mut self.chips)
    }
}

impl std::ops::Index<usize> for Pile {
    type Output = Chip;

    fn index(&self, idx: usize) -> &Chip {
        &self.chips[idx]
    }
}

impl<'a> IntoIterator for &'a Pile {
    type Item = &'a Chip;
    type IntoIter = std::slice::Iter<'a, Chip>;

    fn into_iter(self) -> Self::IntoIter {
        self.chips.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChipId;

    fn chip(id: u32, color: usize) -> Chip {
        Chip::new(ChipId(id), PlayerId(color))
    }

    #[test]
    fn order_is_play_order() {
        let mut pile = Pile::new(PileId(1), chip(0, 0));
        pile.push(chip(7, 1));
        pile.push(chip(14, 2));

        assert_eq!(pile.len(), 3);
        assert_eq!(pile[0].id, ChipId(0));
        assert_eq!(pile.first().map(|c| c.id), Some(ChipId(0)));
        assert_eq!(pile.top().map(|c| c.id), Some(ChipId(14)));
        assert_eq!(
            pile.players().collect::<Vec<_>>(),
            vec![PlayerId(0), PlayerId(1), PlayerId(2)]
        );
    }

    #[test]
    fn has_player_follows_owner() {
        let mut red_chip = chip(0, 0);
        red_chip.capture(PlayerId(3));
        let pile = Pile::new(PileId(1), red_chip);

        assert!(pile.has_player(PlayerId(3)));
        assert!(!pile.has_player(PlayerId(0)));
    }

    #[test]
    fn take_chips_empties_pile() {
        let mut pile = Pile::new(PileId(2), chip(1, 0));
        pile.push(chip(8, 1));
        let chips = pile.take_chips();
        assert_eq!(chips.len(), 2);
        assert!(pile.is_empty());
        assert_eq!(pile.get(0), None);
    }
}
