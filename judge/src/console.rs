use std::io::{Cursor, Stdin, Write};

use sls::{
    describe_chip, visualize_piles, Action, ChipId, DecisionMaker, GameState, Pile, PileId,
    PlayerId, PlayerMove,
};
use tracing::error;

/// How often a human is asked again after an unparsable answer.
const MAX_PROMPTS: usize = 5;

/// Something answers can be read from, one line at a time.
pub trait ReadLine {
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize>;
}

// Stdin has its own shared buffer, so several console players can use it.
impl ReadLine for Stdin {
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize> {
        Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> ReadLine for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> std::io::Result<usize> {
        std::io::BufRead::read_line(self, buf)
    }
}

/// A human player, prompted on a console.
pub struct ConsoleDecider<R, W> {
    colors: Vec<String>,
    input: R,
    output: W,
    // A re-usable buffer for input.
    buf: String,
}

impl ConsoleDecider<Stdin, std::io::Stdout> {
    pub fn stdio(colors: Vec<String>) -> Self {
        Self::new(colors, std::io::stdin(), std::io::stdout())
    }
}

impl<R: ReadLine, W: Write> ConsoleDecider<R, W> {
    pub fn new(colors: Vec<String>, input: R, output: W) -> Self {
        Self {
            colors,
            input,
            output,
            buf: String::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> anyhow::Result<T> {
        for _ in 0..MAX_PROMPTS {
            write!(self.output, "{}", question)?;
            self.output.flush()?;
            self.buf.clear();
            if self.input.read_line(&mut self.buf)? == 0 {
                anyhow::bail!("The input was closed");
            }
            match parse(self.buf.trim()) {
                Ok(answer) => return Ok(answer),
                Err(msg) => {
                    error!("{}", msg);
                    writeln!(self.output, "{}", msg)?;
                }
            }
        }
        anyhow::bail!("No valid answer after {} prompts", MAX_PROMPTS)
    }
}

fn color_name(colors: &[String], player: PlayerId) -> &str {
    colors.get(player.0).map_or("?", String::as_str)
}

fn parse_index(answer: &str, len: usize) -> Result<usize, String> {
    match answer.parse::<usize>() {
        Ok(idx) if idx < len => Ok(idx),
        Ok(idx) => Err(format!("{} is not a valid option", idx)),
        Err(_) => Err(format!(
            "{:?} is not an integer between 0 and {}",
            answer,
            len.saturating_sub(1)
        )),
    }
}

/// Parses `n [chip]` or `e <pile> [chip]`.
fn parse_move(player: PlayerId, answer: &str) -> Result<PlayerMove, String> {
    let mut words = answer.split_whitespace();
    let parse_num = |word: &str| {
        word.trim_start_matches(&['#', 'c'][..])
            .parse::<u32>()
            .map_err(|_| format!("{:?} is not a number", word))
    };
    let action = match words.next() {
        Some("n") | Some("new") => Action::New {
            chip: words.next().map(parse_num).transpose()?.map(ChipId),
        },
        Some("e") | Some("existing") => {
            let pile_id = words
                .next()
                .ok_or_else(|| String::from("Which pile?"))
                .and_then(parse_num)?;
            Action::Existing {
                pile_id: PileId(pile_id),
                chip: words.next().map(parse_num).transpose()?.map(ChipId),
            }
        }
        _ => return Err(format!("{:?} is not a move", answer)),
    };
    if words.next().is_some() {
        return Err(format!("Too many words in {:?}", answer));
    }
    Ok(PlayerMove { player, action })
}

/// Catches moves that refer to piles or chips that are not there, so that a
/// typo is asked again instead of ending the game.
fn check_move(state: &GameState, mv: PlayerMove) -> Result<PlayerMove, String> {
    let (pile_id, chip) = match mv.action {
        Action::New { chip } => (None, chip),
        Action::Existing { pile_id, chip } => (Some(pile_id), chip),
        _ => return Ok(mv),
    };
    if let Some(pile_id) = pile_id {
        if state.pile(pile_id).is_none() {
            return Err(format!("There is no pile {}", pile_id));
        }
    }
    if let Some(chip) = chip {
        if !state.player(mv.player).is_some_and(|p| p.has_chip(chip)) {
            return Err(format!("Chip {} is not in your hand", chip));
        }
    }
    Ok(mv)
}

impl<R: ReadLine, W: Write> DecisionMaker for ConsoleDecider<R, W> {
    fn choose_move(&mut self, state: &GameState, player: PlayerId) -> anyhow::Result<PlayerMove> {
        writeln!(self.output, "Piles:\n{}", visualize_piles(state))?;
        let hand: Vec<String> = state
            .player(player)
            .map(|p| {
                p.chips
                    .iter()
                    .map(|chip| format!("{} {}", chip.id, describe_chip(state, chip)))
                    .collect()
            })
            .unwrap_or_default();
        writeln!(self.output, "Hand of {}: {}", color_name(&self.colors, player), hand.join(", "))?;
        self.prompt(
            "Your move, [n]ew [chip] or [e]xisting <pile> [chip]: ",
            |answer| parse_move(player, answer).and_then(|mv| check_move(state, mv)),
        )
    }

    fn choose_chip_to_kill(&mut self, _player: PlayerId, pile: &Pile) -> anyhow::Result<usize> {
        for (i, chip) in pile.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} ({})",
                i,
                color_name(&self.colors, chip.color),
                color_name(&self.colors, chip.owner)
            )?;
        }
        let len = pile.len();
        self.prompt("Choose a chip to kill: ", |answer| parse_index(answer, len))
    }

    fn choose_next_player(
        &mut self,
        _player: PlayerId,
        candidates: &[PlayerId],
    ) -> anyhow::Result<PlayerId> {
        for (i, &candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "{}. {}", i, color_name(&self.colors, candidate))?;
        }
        let idx = self.prompt("Choose the next player: ", |answer| {
            parse_index(answer, candidates.len())
        })?;
        Ok(candidates[idx])
    }
}
