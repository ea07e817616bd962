use sls::{
    describe_record, visualize_moves, visualize_piles, visualize_players, GameObserver,
    GameResult, GameState, PlayerId, TurnRecord,
};
use tracing::{debug, info, trace};

/// Logs the course of one game.
pub struct TracingObserver {
    game_idx: usize,
}

impl TracingObserver {
    pub fn new(game_idx: usize) -> Self {
        Self { game_idx }
    }

    fn log_game_state(&self, state: &GameState, history: &[TurnRecord], header: &str) {
        debug!("{}", "=".repeat(79));
        debug!("Piles {}:\n{}", header, visualize_piles(state));
        debug!("{}", "-".repeat(79));
        debug!("Players {}:\n{}", header, visualize_players(state));
        trace!("{}", "~".repeat(79));
        trace!("Moves {}:\n{}", header, visualize_moves(state, history));
    }
}

impl GameObserver for TracingObserver {
    fn game_started(&mut self, state: &GameState, first_player: PlayerId) {
        info!(
            game_idx = self.game_idx,
            players = state.players().len(),
            first_player = state.color(first_player),
            "New game"
        );
        self.log_game_state(state, &[], "@ t=0");
    }

    fn turn_resolved(&mut self, turn: usize, record: &TurnRecord, state: &GameState) {
        debug!(game_idx = self.game_idx, turn, "TURN: {}", describe_record(state, record));
        trace!("Piles @ t={}:\n{}", turn + 1, visualize_piles(state));
    }

    fn game_finished(&mut self, state: &GameState, history: &[TurnRecord], result: &GameResult) {
        info!("{}", "+".repeat(79));
        match result {
            GameResult::AllDefeated { last_standing } => info!(
                game_idx = self.game_idx,
                turns = history.len(),
                last_standing = state.color(*last_standing),
                "Everybody has been defeated"
            ),
            GameResult::TurnLimitReached => info!(
                game_idx = self.game_idx,
                turns = history.len(),
                alive = state.living_players().count(),
                "Turn limit reached"
            ),
            GameResult::IllegalMoveByPlayer { player, err } => info!(
                game_idx = self.game_idx,
                turns = history.len(),
                player = state.color(*player),
                %err,
                "Illegal move by player"
            ),
        }
        self.log_game_state(state, history, "@ Final");
    }
}
