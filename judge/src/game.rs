use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sls::{DecisionMaker, GameConfig, GameResult, GameSession, RandomDecider};

use crate::console::ConsoleDecider;
use crate::observer::TracingObserver;
use crate::recording::{GameRecording, Recorder};

/// Who decides for a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatKind {
    Random,
    Console,
}

/// Builds one decision-maker per seat. Random players get their own RNG, seeded from `rng`.
pub fn make_deciders(
    rng: &mut StdRng,
    colors: &[String],
    seats: &[SeatKind],
) -> Vec<Box<dyn DecisionMaker>> {
    seats
        .iter()
        .map(|seat| -> Box<dyn DecisionMaker> {
            match seat {
                SeatKind::Random => {
                    Box::new(RandomDecider::new(StdRng::seed_from_u64(rng.gen())))
                }
                SeatKind::Console => Box::new(ConsoleDecider::stdio(colors.to_vec())),
            }
        })
        .collect()
}

/// Plays one game and records it, if a recorder is given.
///
/// Returns an error only on failure of a decision-maker or the recorder,
/// not when an illegal move is played.
pub fn play_game(
    rng: &mut StdRng,
    game_idx: usize,
    colors: &[String],
    deciders: &mut [Box<dyn DecisionMaker>],
    config: &GameConfig,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<(GameSession, GameResult)> {
    let mut session = GameSession::new(colors, config.clone(), rng)?;
    let mut observer = TracingObserver::new(game_idx);
    let result = session.play(deciders, &mut observer)?;

    if let Some(rec) = recorder {
        rec.write_game_recording(&GameRecording::new(&session, &result))?;
    }
    Ok((session, result))
}

/// Results over several games.
#[derive(Debug, Default)]
pub struct Tally {
    /// Per seat: games in which that player was the last to be defeated.
    pub last_standing: Vec<usize>,
    /// Per seat: games lost through an illegal move.
    pub illegal_moves: Vec<usize>,
    pub turn_limits: usize,
    pub turns: usize,
    pub games: usize,
}

impl Tally {
    pub fn new(num_players: usize) -> Self {
        Self {
            last_standing: vec![0; num_players],
            illegal_moves: vec![0; num_players],
            ..Self::default()
        }
    }

    pub fn add(&mut self, session: &GameSession, result: &GameResult) {
        self.games += 1;
        self.turns += session.history().len();
        match result {
            GameResult::AllDefeated { last_standing } => self.last_standing[last_standing.0] += 1,
            GameResult::TurnLimitReached => self.turn_limits += 1,
            GameResult::IllegalMoveByPlayer { player, .. } => self.illegal_moves[player.0] += 1,
        }
    }

    pub fn summary(&self, colors: &[String]) -> String {
        let mut lines = vec![format!("End result after {} games:", self.games)];
        for (i, color) in colors.iter().enumerate() {
            let mut line = format!("- {} lasted longest {} times", color, self.last_standing[i]);
            if self.illegal_moves[i] > 0 {
                line += &format!(" ({} illegal moves)", self.illegal_moves[i]);
            }
            lines.push(line);
        }
        if self.turn_limits > 0 {
            lines.push(format!("- {} games hit the turn limit", self.turn_limits));
        }
        if self.games > 0 {
            lines.push(format!(
                "- {:.1} turns per game",
                self.turns as f32 / self.games as f32
            ));
        }
        lines.join("\n")
    }
}
