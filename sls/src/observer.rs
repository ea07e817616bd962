use crate::{GameResult, GameState, PlayerId, TurnRecord};

/// Gets notified about the progress of a game, e.g. for logging.
///
/// Observers only get shared references, so they cannot influence the game.
pub trait GameObserver {
    fn game_started(&mut self, _state: &GameState, _first_player: PlayerId) {}

    /// Called after every successfully resolved turn. `turn` counts from 0.
    fn turn_resolved(&mut self, _turn: usize, _record: &TurnRecord, _state: &GameState) {}

    fn game_finished(&mut self, _state: &GameState, _history: &[TurnRecord], _result: &GameResult) {}
}

/// An observer that ignores everything.
pub struct NoopObserver;

impl GameObserver for NoopObserver {}
