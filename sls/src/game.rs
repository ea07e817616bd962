use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info};

use crate::{
    Chip, ChipId, DecisionMaker, GameConfig, GameObserver, IllegalMove, MoveOutcome, Pile, PileId,
    Player, PlayerId, PlayerMove, ReplayDecider, TurnError, TurnRecord,
};

/// What is left of a pile after it was captured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CapturedPile {
    pub pile_id: PileId,
    pub captured_by: PlayerId,
    /// Number of chips in the pile right before the capture.
    pub size: usize,
    pub killed: ChipId,
}

/// Players and piles. Every chip of the game is in exactly one place:
/// a player's hand, an active pile, or the graveyard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) players: Vec<Player>,
    /// Only non-empty piles. Since ids are increasing, iteration follows creation order.
    pub(crate) piles: BTreeMap<PileId, Pile>,
    pub(crate) pile_count: u32,
    /// The pile that was started, played on or captured in the last turn.
    pub(crate) most_recent_pile: Option<PileId>,
    pub(crate) captured_piles: Vec<CapturedPile>,
    pub(crate) graveyard: Vec<Chip>,
    pub(crate) max_decision_attempts: usize,
}

impl GameState {
    /// One player per color, in the given seating order.
    pub fn new<S: AsRef<str>>(colors: &[S], config: &GameConfig) -> anyhow::Result<Self> {
        if colors.is_empty() {
            anyhow::bail!("A game needs at least one player");
        }
        for (i, color) in colors.iter().enumerate() {
            if colors[..i].iter().any(|c| c.as_ref() == color.as_ref()) {
                anyhow::bail!("Color '{}' was given twice", color.as_ref());
            }
        }
        // Chip ids are unique u32s, handed out seat by seat
        colors
            .len()
            .checked_mul(config.chips_per_player)
            .and_then(|total| u32::try_from(total).ok())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "{} players with {} chips each are too many chips",
                    colors.len(),
                    config.chips_per_player
                )
            })?;
        let num_chips = u32::try_from(config.chips_per_player)?;
        let mut players = Vec::with_capacity(colors.len());
        let mut first_chip = 0;
        for (i, color) in colors.iter().enumerate() {
            players.push(Player::new(
                PlayerId(i),
                color.as_ref(),
                ChipId(first_chip),
                num_chips,
            ));
            first_chip += num_chips;
        }
        Ok(Self {
            players,
            piles: BTreeMap::new(),
            pile_count: 0,
            most_recent_pile: None,
            captured_piles: Vec::new(),
            graveyard: Vec::new(),
            max_decision_attempts: config.max_decision_attempts.max(1),
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.0)
    }

    pub fn living_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.alive())
    }

    pub fn any_alive(&self) -> bool {
        self.players.iter().any(|p| p.alive())
    }

    /// The active piles, oldest first.
    pub fn piles(&self) -> impl Iterator<Item = &Pile> {
        self.piles.values()
    }

    pub fn pile(&self, id: PileId) -> Option<&Pile> {
        self.piles.get(&id)
    }

    /// The pile resolved in the last turn. It is no longer active if it was captured.
    pub fn most_recent_pile_id(&self) -> Option<PileId> {
        self.most_recent_pile
    }

    pub fn captured_piles(&self) -> &[CapturedPile] {
        &self.captured_piles
    }

    /// Chips killed in captures, in order of death.
    pub fn graveyard(&self) -> &[Chip] {
        &self.graveyard
    }

    /// All chips in the game, wherever they are.
    pub fn chip_count(&self) -> usize {
        self.players.iter().map(|p| p.chips.len()).sum::<usize>()
            + self.piles.values().map(Pile::len).sum::<usize>()
            + self.graveyard.len()
    }

    /// Looks up the color name of a player.
    pub fn color(&self, id: PlayerId) -> &str {
        self.players.get(id.0).map_or("?", |p| p.color.as_str())
    }
}

/// How a game ended.
#[derive(Debug)]
pub enum GameResult {
    /// Every player was defeated. The last one standing held out longest.
    AllDefeated { last_standing: PlayerId },
    /// The configured turn limit was hit while players were still alive.
    TurnLimitReached,
    IllegalMoveByPlayer { player: PlayerId, err: IllegalMove },
}

/// One game, from the first move until nobody is alive.
pub struct GameSession {
    state: GameState,
    config: GameConfig,
    first_player: PlayerId,
    current_player: Option<PlayerId>,
    history: Vec<TurnRecord>,
}

impl GameSession {
    /// Sets up a game and randomly picks the starting player.
    pub fn new<S: AsRef<str>>(
        colors: &[S],
        config: GameConfig,
        rng: &mut StdRng,
    ) -> anyhow::Result<Self> {
        let first_player = PlayerId(rng.gen_range(0..colors.len().max(1)));
        Self::with_first_player(colors, config, first_player)
    }

    pub fn with_first_player<S: AsRef<str>>(
        colors: &[S],
        config: GameConfig,
        first_player: PlayerId,
    ) -> anyhow::Result<Self> {
        let state = GameState::new(colors, &config)?;
        if first_player.0 >= colors.len() {
            anyhow::bail!("Starting player {} does not exist", first_player);
        }
        Ok(Self {
            state,
            config,
            first_player,
            current_player: Some(first_player),
            history: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn first_player(&self) -> PlayerId {
        self.first_player
    }

    /// `None` once the game is over.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.current_player
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Resolves one move of the current player and records it.
    pub fn play_turn(
        &mut self,
        mv: PlayerMove,
        decider: &mut dyn DecisionMaker,
    ) -> Result<TurnRecord, TurnError> {
        let current = self.current_player.ok_or(IllegalMove::GameOver)?;
        let result = self.state.turn(current, &mv, decider)?;
        let record = TurnRecord {
            mv,
            killed_chip: result.killed_chip,
            outcome: result.outcome,
            next_player: result.next_player,
        };
        debug!(turn = self.history.len(), "TURN: {}", record);
        self.history.push(record);
        self.current_player = result.next_player;
        Ok(record)
    }

    /// Plays until nobody is alive, the turn limit is hit or a move is illegal.
    ///
    /// `deciders[i]` decides for the player in seat `i`. Returns an error only
    /// when a decision-maker fails, not when an illegal move is played.
    pub fn play(
        &mut self,
        deciders: &mut [Box<dyn DecisionMaker>],
        observer: &mut dyn GameObserver,
    ) -> anyhow::Result<GameResult> {
        if deciders.len() != self.state.players.len() {
            anyhow::bail!(
                "Got {} decision-makers for {} players",
                deciders.len(),
                self.state.players.len()
            );
        }
        observer.game_started(&self.state, self.first_player);

        let result = loop {
            let Some(current) = self.current_player else {
                let last_standing = self
                    .history
                    .iter()
                    .rev()
                    .find(|r| r.outcome == MoveOutcome::PendingDefeat)
                    .map_or(self.first_player, |r| r.mv.player);
                break GameResult::AllDefeated { last_standing };
            };
            if let Some(max_turns) = self.config.max_turns {
                if self.history.len() >= max_turns {
                    break GameResult::TurnLimitReached;
                }
            }

            let decider = deciders[current.0].as_mut();
            let mv = decider.choose_move(&self.state, current)?;
            match self.play_turn(mv, decider) {
                Ok(record) => {
                    observer.turn_resolved(self.history.len() - 1, &record, &self.state)
                }
                Err(TurnError::Illegal(err)) => {
                    info!(player = self.state.color(current), %err, "Illegal move");
                    break GameResult::IllegalMoveByPlayer {
                        player: current,
                        err,
                    };
                }
                Err(TurnError::Decision(err)) => return Err(err),
            }
        };

        observer.game_finished(&self.state, &self.history, &result);
        Ok(result)
    }

    /// Plays a recorded history again from the start.
    ///
    /// Fails if any turn resolves differently from the recording.
    pub fn replay<S: AsRef<str>>(
        colors: &[S],
        config: GameConfig,
        history: &[TurnRecord],
    ) -> anyhow::Result<Self> {
        let Some(first) = history.first() else {
            anyhow::bail!("Cannot replay an empty history");
        };
        let mut session = Self::with_first_player(colors, config, first.mv.player)?;
        let mut decider = ReplayDecider::new(history.to_vec());
        for (turn, expected) in history.iter().enumerate() {
            let current = session.current_player.ok_or_else(|| {
                anyhow::anyhow!("The game ended after {} of {} turns", turn, history.len())
            })?;
            let mv = decider.choose_move(&session.state, current)?;
            let record = session
                .play_turn(mv, &mut decider)
                .map_err(|err| anyhow::anyhow!("Turn {} could not be replayed: {:?}", turn, err))?;
            if record != *expected {
                anyhow::bail!("Turn {} diverged: recorded {}, replayed {}", turn, expected, record);
            }
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use quickcheck::quickcheck;
    use rand::SeedableRng;

    use super::*;
    use crate::arbitrary::{Script, ScriptedDecider};
    use crate::{ChipState, NoopObserver, PlayerState, RandomDecider};

    const COLORS: [&str; 4] = ["red", "green", "blue", "orange"];

    fn random_deciders(seed: u64, n: usize) -> Vec<Box<dyn DecisionMaker>> {
        (0..n)
            .map(|i| Box::new(RandomDecider::from_seed(seed + i as u64)) as Box<dyn DecisionMaker>)
            .collect()
    }

    /// Checks the invariants after every turn.
    #[derive(Default)]
    struct InvariantChecker {
        chip_states: HashMap<ChipId, ChipState>,
        turns: usize,
    }

    fn state_rank(state: ChipState) -> u8 {
        match state {
            ChipState::New => 0,
            ChipState::Prisoner => 1,
            ChipState::Dead => 2,
        }
    }

    impl InvariantChecker {
        fn check(&mut self, state: &GameState) {
            assert_eq!(state.chip_count(), 28);
            assert!(state.piles().all(|pile| !pile.is_empty()));
            let all_chips = state
                .players()
                .iter()
                .flat_map(|p| p.chips.iter())
                .chain(state.piles().flat_map(|pile| pile.iter()))
                .chain(state.graveyard().iter());
            for chip in all_chips {
                let old = self.chip_states.insert(chip.id, chip.state);
                if let Some(old) = old {
                    assert!(state_rank(old) <= state_rank(chip.state), "chip {} went back", chip.id);
                }
            }
            assert!(state.graveyard().iter().all(|c| c.is_dead()));
        }
    }

    impl GameObserver for InvariantChecker {
        fn game_started(&mut self, state: &GameState, _first_player: PlayerId) {
            self.check(state);
        }

        fn turn_resolved(&mut self, _turn: usize, record: &TurnRecord, state: &GameState) {
            self.turns += 1;
            self.check(state);
            if record.outcome == MoveOutcome::Capture {
                assert!(state.pile(state.most_recent_pile_id().unwrap()).is_none());
            }
        }
    }

    #[test]
    fn four_players_seed_1() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = GameSession::new(&COLORS, GameConfig::default(), &mut rng).unwrap();
        assert_eq!(session.state().players().len(), 4);
        let mut deciders = random_deciders(1, 4);
        let mut checker = InvariantChecker::default();

        let result = session.play(&mut deciders, &mut checker).unwrap();

        assert!(matches!(result, GameResult::AllDefeated { .. }));
        assert!(session.state().living_players().count() <= 1);
        assert_eq!(session.current_player(), None);
        // Seven piles per player, then everybody has to give up
        assert_eq!(session.history().len(), 28 + 4);
        assert_eq!(checker.turns, 32);
        assert_eq!(session.state().chip_count(), 28);
        let defeats = session
            .history()
            .iter()
            .filter(|r| r.outcome == MoveOutcome::PendingDefeat)
            .count();
        assert_eq!(defeats, 4);
    }

    #[test]
    fn same_seed_same_game() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut session = GameSession::new(&COLORS, GameConfig::default(), &mut rng).unwrap();
            session
                .play(&mut random_deciders(seed, 4), &mut NoopObserver)
                .unwrap();
            session.history().to_vec()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn replay_reproduces_final_state() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = GameSession::new(&COLORS, GameConfig::default(), &mut rng).unwrap();
        session
            .play(&mut random_deciders(3, 4), &mut NoopObserver)
            .unwrap();

        let replayed =
            GameSession::replay(&COLORS, GameConfig::default(), session.history()).unwrap();
        assert_eq!(replayed.state(), session.state());
        assert_eq!(replayed.history(), session.history());
    }

    #[test]
    fn replay_detects_divergence() {
        let mut session =
            GameSession::with_first_player(&COLORS, GameConfig::default(), PlayerId(0)).unwrap();
        let mut decider = RandomDecider::from_seed(0);
        session
            .play_turn(PlayerMove::new_pile(PlayerId(0)), &mut decider)
            .unwrap();
        let mut history = session.history().to_vec();
        history[0].outcome = MoveOutcome::Capture;
        assert!(GameSession::replay(&COLORS, GameConfig::default(), &history).is_err());
        assert!(GameSession::replay(&COLORS, GameConfig::default(), &[]).is_err());
    }

    #[test]
    fn turn_limit() {
        let config = GameConfig {
            max_turns: Some(5),
            ..GameConfig::default()
        };
        let mut session = GameSession::with_first_player(&COLORS, config, PlayerId(2)).unwrap();
        let result = session
            .play(&mut random_deciders(0, 4), &mut NoopObserver)
            .unwrap();
        assert!(matches!(result, GameResult::TurnLimitReached));
        assert_eq!(session.history().len(), 5);
        assert_eq!(session.history()[0].mv.player, PlayerId(2));
    }

    #[test]
    fn illegal_move_ends_game() {
        struct Cheater;
        impl DecisionMaker for Cheater {
            fn choose_move(&mut self, _: &GameState, p: PlayerId) -> anyhow::Result<PlayerMove> {
                Ok(PlayerMove::existing(p, PileId(42), None))
            }
            fn choose_chip_to_kill(&mut self, _: PlayerId, _: &Pile) -> anyhow::Result<usize> {
                Ok(0)
            }
            fn choose_next_player(&mut self, _: PlayerId, c: &[PlayerId]) -> anyhow::Result<PlayerId> {
                Ok(c[0])
            }
        }
        let mut session =
            GameSession::with_first_player(&["red", "green"], GameConfig::default(), PlayerId(1))
                .unwrap();
        let mut deciders: Vec<Box<dyn DecisionMaker>> = vec![Box::new(Cheater), Box::new(Cheater)];
        let result = session.play(&mut deciders, &mut NoopObserver).unwrap();
        match result {
            GameResult::IllegalMoveByPlayer { player, err } => {
                assert_eq!(player, PlayerId(1));
                assert_eq!(err, IllegalMove::NoSuchPile { pile_id: PileId(42) });
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(session.history().is_empty());
    }

    #[test]
    fn wrong_number_of_deciders() {
        let mut session =
            GameSession::with_first_player(&COLORS, GameConfig::default(), PlayerId(0)).unwrap();
        assert!(session
            .play(&mut random_deciders(0, 3), &mut NoopObserver)
            .is_err());
    }

    #[test]
    fn invalid_rosters() {
        let empty: [&str; 0] = [];
        assert!(GameState::new(&empty, &GameConfig::default()).is_err());
        assert!(GameState::new(&["red", "red"], &GameConfig::default()).is_err());
        let huge = GameConfig {
            chips_per_player: u32::MAX as usize / 2 + 1,
            ..GameConfig::default()
        };
        assert!(GameState::new(&["red", "green"], &huge).is_err());

        let state = GameState::new(&COLORS, &GameConfig::default()).unwrap();
        let mut ids: Vec<ChipId> = state
            .players()
            .iter()
            .flat_map(|p| p.chips.iter().map(|c| c.id))
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 28);
        assert_eq!(ids.last(), Some(&ChipId(27)));
        assert!(
            GameSession::with_first_player(&["red"], GameConfig::default(), PlayerId(1)).is_err()
        );
    }

    #[test]
    fn moving_after_game_over() {
        let config = GameConfig {
            chips_per_player: 0,
            ..GameConfig::default()
        };
        let mut session = GameSession::with_first_player(&["red"], config, PlayerId(0)).unwrap();
        let mut decider = RandomDecider::from_seed(0);
        let record = session
            .play_turn(PlayerMove::new_pile(PlayerId(0)), &mut decider)
            .unwrap();
        assert_eq!(record.outcome, MoveOutcome::PendingDefeat);
        assert!(matches!(
            session.play_turn(PlayerMove::new_pile(PlayerId(0)), &mut decider),
            Err(TurnError::Illegal(IllegalMove::GameOver))
        ));
    }

    quickcheck! {
        fn scripted_games_keep_invariants(script: Script) -> bool {
            let config = GameConfig { max_turns: Some(150), ..GameConfig::default() };
            let mut session = GameSession::with_first_player(&COLORS, config.clone(), PlayerId(script.first_player % 4)).unwrap();
            let mut deciders: Vec<Box<dyn DecisionMaker>> = (0..4)
                .map(|_| Box::new(ScriptedDecider::new(script.clone())) as Box<dyn DecisionMaker>)
                .collect();
            let mut checker = InvariantChecker::default();

            // Capturing player's hand before each capture
            let mut previous = session.state().clone();
            let result = loop {
                let Some(current) = session.current_player() else { break None };
                if session.history().len() >= 150 {
                    break None;
                }
                let decider = deciders[current.0].as_mut();
                let mv = decider.choose_move(session.state(), current).unwrap();
                let record = match session.play_turn(mv, decider) {
                    Ok(record) => record,
                    Err(err) => break Some(err),
                };
                checker.turn_resolved(0, &record, session.state());
                let player = record.mv.player;
                match record.outcome {
                    MoveOutcome::Capture => {
                        let Some(pile_id) = session.state().most_recent_pile_id() else { return false };
                        let pile_len = previous.pile(pile_id).map_or(0, Pile::len);
                        let before = previous.players()[player.0].chips.len();
                        let after = session.state().players()[player.0].chips.len();
                        if after + 1 != before + pile_len {
                            return false;
                        }
                    }
                    MoveOutcome::PendingDefeat => {
                        if !previous.players()[player.0].chips.is_empty() {
                            return false;
                        }
                    }
                    MoveOutcome::None => {}
                }
                // Players only die through PendingDefeat
                for (old, new) in previous.players().iter().zip(session.state().players()) {
                    if old.state == PlayerState::Alive && new.state == PlayerState::Dead
                        && !(record.outcome == MoveOutcome::PendingDefeat && old.id == player)
                    {
                        return false;
                    }
                }
                previous = session.state().clone();
            };
            // The scripted decider only makes legal moves
            result.is_none()
                && GameSession::replay(&COLORS, config, session.history())
                    .map_or(session.history().is_empty(), |replayed| replayed.state() == session.state())
        }
    }
}
