use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::{GameState, Pile, PlayerId, PlayerMove, TurnRecord};

/// Whoever decides on behalf of a player: a human at a console, a bot, or a
/// recorded game.
///
/// Errors are reserved for failures of the decision-maker itself (e.g. a
/// closed input stream). An answer that does not fit the question, such as
/// an out-of-range chip index, is returned as `Ok` and rejected by the engine.
pub trait DecisionMaker {
    /// The move for `player`, who is the current player.
    fn choose_move(&mut self, state: &GameState, player: PlayerId) -> anyhow::Result<PlayerMove>;

    /// `player` captures `pile`: which chip (by index into the pile) dies?
    fn choose_chip_to_kill(&mut self, player: PlayerId, pile: &Pile) -> anyhow::Result<usize>;

    /// Who moves next? `candidates` is never empty.
    fn choose_next_player(
        &mut self,
        player: PlayerId,
        candidates: &[PlayerId],
    ) -> anyhow::Result<PlayerId>;
}

/// The reference decision-maker.
///
/// Always starts a new pile with its first chip, kills a uniformly random
/// chip and passes the turn to a uniformly random candidate.
pub struct RandomDecider {
    rng: StdRng,
}

impl RandomDecider {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl DecisionMaker for RandomDecider {
    fn choose_move(&mut self, _state: &GameState, player: PlayerId) -> anyhow::Result<PlayerMove> {
        Ok(PlayerMove::new_pile(player))
    }

    fn choose_chip_to_kill(&mut self, _player: PlayerId, pile: &Pile) -> anyhow::Result<usize> {
        if pile.is_empty() {
            anyhow::bail!("Asked to kill a chip in the empty pile {}", pile.id);
        }
        Ok(self.rng.gen_range(0..pile.len()))
    }

    fn choose_next_player(
        &mut self,
        _player: PlayerId,
        candidates: &[PlayerId],
    ) -> anyhow::Result<PlayerId> {
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Asked to choose from zero candidates"))
    }
}

/// Answers every request from a recorded history.
pub struct ReplayDecider {
    records: Vec<TurnRecord>,
    // Index of the record whose move was handed out last
    current: Option<usize>,
}

impl ReplayDecider {
    pub fn new(records: Vec<TurnRecord>) -> Self {
        Self {
            records,
            current: None,
        }
    }

    fn current_record(&self) -> anyhow::Result<&TurnRecord> {
        self.current
            .and_then(|idx| self.records.get(idx))
            .ok_or_else(|| anyhow::anyhow!("No move has been replayed yet"))
    }
}

impl DecisionMaker for ReplayDecider {
    fn choose_move(&mut self, _state: &GameState, player: PlayerId) -> anyhow::Result<PlayerMove> {
        let idx = self.current.map_or(0, |idx| idx + 1);
        let record = self
            .records
            .get(idx)
            .ok_or_else(|| anyhow::anyhow!("The recording ends after {} turns", idx))?;
        if record.mv.player != player {
            anyhow::bail!(
                "Turn {} was recorded for {}, but {} is asked to move",
                idx,
                record.mv.player,
                player
            );
        }
        self.current = Some(idx);
        Ok(record.mv)
    }

    fn choose_chip_to_kill(&mut self, _player: PlayerId, _pile: &Pile) -> anyhow::Result<usize> {
        self.current_record()?
            .killed_chip
            .ok_or_else(|| anyhow::anyhow!("No capture was recorded for this turn"))
    }

    fn choose_next_player(
        &mut self,
        _player: PlayerId,
        _candidates: &[PlayerId],
    ) -> anyhow::Result<PlayerId> {
        self.current_record()?
            .next_player
            .ok_or_else(|| anyhow::anyhow!("No next player was recorded for this turn"))
    }
}
