use tracing::{trace, warn};

use crate::{
    Action, CapturedPile, ChipId, DecisionMaker, GameState, IllegalMove, InvalidDecision,
    MoveOutcome, Pile, PileId, PlayerId, PlayerMove,
};

/// The result of a successfully resolved move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnResult {
    pub outcome: MoveOutcome,
    /// `None` only if nobody is alive anymore.
    pub next_player: Option<PlayerId>,
    /// Index of the chip that was killed, if a pile was captured.
    pub killed_chip: Option<usize>,
}

/// Why a turn could not be resolved.
#[derive(Debug)]
pub enum TurnError {
    /// The move or one of the decisions was invalid. The state is unchanged.
    Illegal(IllegalMove),
    /// The decision-maker itself failed. The state is unchanged.
    Decision(anyhow::Error),
}

impl From<IllegalMove> for TurnError {
    fn from(err: IllegalMove) -> Self {
        TurnError::Illegal(err)
    }
}

impl From<InvalidDecision> for TurnError {
    fn from(err: InvalidDecision) -> Self {
        TurnError::Illegal(IllegalMove::InvalidDecision(err))
    }
}

impl std::error::Error for TurnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TurnError::Illegal(err) => Some(err),
            TurnError::Decision(err) => Some(&**err),
        }
    }
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::Illegal(_) => write!(f, "Illegal move"),
            TurnError::Decision(_) => write!(f, "The decision-maker failed"),
        }
    }
}

/// Everything needed to apply a move, validated and with all decisions made.
#[derive(Debug)]
enum TurnPlan {
    Defeat,
    StartPile {
        chip: Option<ChipId>,
        next_player: PlayerId,
    },
    AddToPile {
        pile_id: PileId,
        chip: Option<ChipId>,
        next_player: PlayerId,
    },
    Capture {
        pile_id: PileId,
        chip_to_kill: usize,
    },
}

impl GameState {
    /// Resolves `mv`, made by `player`, the player whose turn it is.
    ///
    /// Decisions needed along the way are requested from `decider`. All of
    /// them are collected before the state is touched, so on error the game
    /// state is unchanged.
    pub fn turn(
        &mut self,
        player: PlayerId,
        mv: &PlayerMove,
        decider: &mut dyn DecisionMaker,
    ) -> Result<TurnResult, TurnError> {
        let plan = self.calculate(player, mv, decider)?;
        trace!(?plan, "Executing turn");
        Ok(self.execute(player, plan)?)
    }

    fn calculate(
        &self,
        player: PlayerId,
        mv: &PlayerMove,
        decider: &mut dyn DecisionMaker,
    ) -> Result<TurnPlan, TurnError> {
        let acting = self
            .players
            .get(player.0)
            .ok_or(IllegalMove::NoSuchPlayer { player })?;
        if mv.player != player {
            return Err(IllegalMove::NotPlayersTurn {
                player: mv.player,
                current: player,
            }
            .into());
        }
        // A defeated player can still be handed the turn through a tie-break.
        // Its only move is to start a pile, which defeats it again.
        if !acting.alive() && !matches!(mv.action, Action::New { .. }) {
            return Err(IllegalMove::PlayerIsDead { player }.into());
        }

        match mv.action {
            Action::New { chip } => {
                if acting.chips.is_empty() || !acting.alive() {
                    return Ok(TurnPlan::Defeat);
                }
                self.check_chip(player, chip)?;
                // The new pile contains only this player
                let next_player = self.choose_successor(player, &[player], player, decider)?;
                Ok(TurnPlan::StartPile { chip, next_player })
            }
            Action::Existing { pile_id, chip } => {
                let pile = self
                    .piles
                    .get(&pile_id)
                    .ok_or(IllegalMove::NoSuchPile { pile_id })?;
                let top_color = pile.top().map(|c| c.color);
                if top_color == Some(player) {
                    let chip_to_kill = self.ask_chip_to_kill(player, pile, decider)?;
                    return Ok(TurnPlan::Capture {
                        pile_id,
                        chip_to_kill,
                    });
                }
                self.check_chip(player, chip)?;
                let mut owners: Vec<PlayerId> = pile.players().collect();
                owners.push(player);
                let next_player = self.choose_successor(player, &owners, player, decider)?;
                Ok(TurnPlan::AddToPile {
                    pile_id,
                    chip,
                    next_player,
                })
            }
            Action::Transfer { .. } | Action::Defeated => Err(IllegalMove::UnsupportedAction {
                kind: mv.action.kind(),
            }
            .into()),
        }
    }

    fn execute(&mut self, player: PlayerId, plan: TurnPlan) -> Result<TurnResult, IllegalMove> {
        let acting = self
            .players
            .get_mut(player.0)
            .ok_or(IllegalMove::NoSuchPlayer { player })?;
        match plan {
            TurnPlan::Defeat => {
                acting.defeat();
                Ok(TurnResult {
                    outcome: MoveOutcome::PendingDefeat,
                    next_player: self.next_living_after(player),
                    killed_chip: None,
                })
            }
            TurnPlan::StartPile { chip, next_player } => {
                let chip = acting.take_chip(chip).ok_or(IllegalMove::NoChipToPlay)?;
                self.pile_count += 1;
                let pile_id = PileId(self.pile_count);
                self.piles.insert(pile_id, Pile::new(pile_id, chip));
                self.most_recent_pile = Some(pile_id);
                Ok(TurnResult {
                    outcome: MoveOutcome::None,
                    next_player: Some(next_player),
                    killed_chip: None,
                })
            }
            TurnPlan::AddToPile {
                pile_id,
                chip,
                next_player,
            } => {
                let pile = self
                    .piles
                    .get_mut(&pile_id)
                    .ok_or(IllegalMove::NoSuchPile { pile_id })?;
                let chip = acting.take_chip(chip).ok_or(IllegalMove::NoChipToPlay)?;
                pile.push(chip);
                self.most_recent_pile = Some(pile_id);
                Ok(TurnResult {
                    outcome: MoveOutcome::None,
                    next_player: Some(next_player),
                    killed_chip: None,
                })
            }
            TurnPlan::Capture {
                pile_id,
                chip_to_kill,
            } => {
                let mut pile = self
                    .piles
                    .remove(&pile_id)
                    .ok_or(IllegalMove::NoSuchPile { pile_id })?;
                let size = pile.len();
                let killed = acting.capture(&mut pile, chip_to_kill);
                self.captured_piles.push(CapturedPile {
                    pile_id,
                    captured_by: player,
                    size,
                    killed: killed.id,
                });
                self.graveyard.push(killed);
                self.most_recent_pile = Some(pile_id);
                Ok(TurnResult {
                    outcome: MoveOutcome::Capture,
                    next_player: Some(player),
                    killed_chip: Some(chip_to_kill),
                })
            }
        }
    }

    fn check_chip(&self, player: PlayerId, chip: Option<ChipId>) -> Result<(), IllegalMove> {
        let hand = &self.players[player.0].chips;
        match chip {
            Some(chip) if !hand.iter().any(|c| c.id == chip) => {
                Err(IllegalMove::ChipNotInHand { chip })
            }
            None if hand.is_empty() => Err(IllegalMove::NoChipToPlay),
            _ => Ok(()),
        }
    }

    /// Picks the next player after a chip was played on a pile whose chips
    /// (after the move) are owned by `pile_owners`.
    ///
    /// The move goes to a living player not represented in the pile, chosen
    /// by the acting player. If every living player is represented, it goes
    /// to the owner of the first chip in the pile, even if that player is dead.
    fn choose_successor(
        &self,
        player: PlayerId,
        pile_owners: &[PlayerId],
        fallback: PlayerId,
        decider: &mut dyn DecisionMaker,
    ) -> Result<PlayerId, TurnError> {
        let candidates: Vec<PlayerId> = self
            .living_players()
            .map(|p| p.id)
            .filter(|id| !pile_owners.contains(id))
            .collect();
        if candidates.is_empty() {
            let next = pile_owners.first().copied().unwrap_or(fallback);
            trace!(player = %player, next = %next, "Every living player is in the pile");
            return Ok(next);
        }
        self.ask_next_player(player, &candidates, decider)
    }

    fn ask_chip_to_kill(
        &self,
        player: PlayerId,
        pile: &Pile,
        decider: &mut dyn DecisionMaker,
    ) -> Result<usize, TurnError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let index = decider
                .choose_chip_to_kill(player, pile)
                .map_err(TurnError::Decision)?;
            trace!(player = %player, pile = %pile.id, index, "Chip to kill");
            if index < pile.len() {
                return Ok(index);
            }
            warn!(player = %player, index, pile_len = pile.len(), attempts, "Chip to kill is out of range");
            if attempts >= self.max_decision_attempts {
                return Err(InvalidDecision::ChipToKillOutOfRange {
                    index,
                    pile_len: pile.len(),
                    attempts,
                }
                .into());
            }
        }
    }

    fn ask_next_player(
        &self,
        player: PlayerId,
        candidates: &[PlayerId],
        decider: &mut dyn DecisionMaker,
    ) -> Result<PlayerId, TurnError> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let choice = decider
                .choose_next_player(player, candidates)
                .map_err(TurnError::Decision)?;
            trace!(player = %player, choice = %choice, "Next player");
            if candidates.contains(&choice) {
                return Ok(choice);
            }
            warn!(player = %player, choice = %choice, attempts, "Next player is not a candidate");
            if attempts >= self.max_decision_attempts {
                return Err(InvalidDecision::NextPlayerNotACandidate {
                    choice,
                    candidates: candidates.to_vec(),
                    attempts,
                }
                .into());
            }
        }
    }

    /// The next living player in roster order, wrapping around.
    fn next_living_after(&self, player: PlayerId) -> Option<PlayerId> {
        let n = self.players.len();
        (1..=n)
            .map(|offset| PlayerId((player.0 + offset) % n))
            .find(|id| self.players[id.0].alive())
    }
}
