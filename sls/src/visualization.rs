use crate::{Action, Chip, GameState, Pile, PlayerMove, TurnRecord};

/// Renders a chip as `color (owner)`, using color names.
pub fn describe_chip(state: &GameState, chip: &Chip) -> String {
    format!("{} ({})", state.color(chip.color), state.color(chip.owner))
}

fn describe_chips<'a>(state: &GameState, chips: impl Iterator<Item = &'a Chip>) -> String {
    chips
        .map(|chip| describe_chip(state, chip))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per pile: id, number of chips and the chips from bottom to top.
pub fn describe_pile(state: &GameState, pile: &Pile) -> String {
    format!(
        "#{:>4}: {:>2}: {}",
        pile.id.0,
        pile.len(),
        describe_chips(state, pile.iter())
    )
}

pub fn visualize_piles(state: &GameState) -> String {
    let lines: Vec<String> = state.piles().map(|pile| describe_pile(state, pile)).collect();
    lines.join("\n")
}

/// One line per player: color, number of chips and the chips in hand.
pub fn visualize_players(state: &GameState) -> String {
    let lines: Vec<String> = state
        .players()
        .iter()
        .map(|player| {
            let mut line = format!(
                "{:>10}: {:>4}: {}",
                player.color,
                player.chips.len(),
                describe_chips(state, player.chips.iter())
            );
            if !player.alive() {
                line += " [defeated]";
            }
            line
        })
        .collect();
    lines.join("\n")
}

pub fn describe_move(state: &GameState, mv: &PlayerMove) -> String {
    let player = state.color(mv.player);
    match mv.action {
        Action::New { chip: None } => format!("{} starts a pile", player),
        Action::New { chip: Some(chip) } => format!("{} starts a pile with {}", player, chip),
        Action::Existing { pile_id, chip } => match chip {
            Some(chip) => format!("{} plays {} on pile {}", player, chip, pile_id),
            None => format!("{} plays on pile {}", player, pile_id),
        },
        Action::Transfer { dest_player, .. } => {
            format!("{} transfers to {}", player, state.color(dest_player))
        }
        Action::Defeated => format!("{} gives up", player),
    }
}

pub fn describe_record(state: &GameState, record: &TurnRecord) -> String {
    let next = record
        .next_player
        .map_or("-", |player| state.color(player));
    format!(
        "{} ==> {} ==> {}",
        describe_move(state, &record.mv),
        record.outcome,
        next
    )
}

/// Numbered list of all turns so far.
pub fn visualize_moves(state: &GameState, history: &[TurnRecord]) -> String {
    let lines: Vec<String> = history
        .iter()
        .enumerate()
        .map(|(i, record)| format!("{:>4}. {}", i, describe_record(state, record)))
        .collect();
    lines.join("\n")
}
