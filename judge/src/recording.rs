use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use sls::{GameConfig, GameResult, GameSession, PlayerId, TurnRecord};

/// Writes finished games as numbered JSON files into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self { num: 1, directory })
    }

    pub fn write_game_recording(&mut self, recording: &GameRecording) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("game_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, recording)?;
        writeln!(writer)?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}

/// Everything needed to replay a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecording {
    pub players: Vec<String>,
    pub config: GameConfig,
    pub first_player: PlayerId,
    /// Short description of how the game ended.
    pub result: String,
    pub turns: Vec<TurnRecord>,
}

impl GameRecording {
    pub fn new(session: &GameSession, result: &GameResult) -> Self {
        let state = session.state();
        let result = match result {
            GameResult::AllDefeated { last_standing } => {
                format!("all defeated, {} lasted longest", state.color(*last_standing))
            }
            GameResult::TurnLimitReached => String::from("turn limit reached"),
            GameResult::IllegalMoveByPlayer { player, err } => {
                format!("illegal move by {}: {}", state.color(*player), err)
            }
        };
        Self {
            players: state.players().iter().map(|p| p.color.clone()).collect(),
            config: session.config().clone(),
            first_player: session.first_player(),
            result,
            turns: session.history().to_vec(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Could not open recording '{}'", path.display()))?;
        let recording = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse recording '{}'", path.display()))?;
        Ok(recording)
    }

    /// Plays the recorded turns again. Fails if the game does not unfold the same way.
    pub fn replay(&self) -> anyhow::Result<GameSession> {
        if self.turns.is_empty() {
            return GameSession::with_first_player(self.players.as_slice(), self.config.clone(), self.first_player);
        }
        GameSession::replay(self.players.as_slice(), self.config.clone(), &self.turns)
    }
}
