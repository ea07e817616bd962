use quickcheck::{Arbitrary, Gen};

use crate::{Action, DecisionMaker, GameState, Pile, PlayerId, PlayerMove};

/// Raw material for one decision-maker answer. Every field is reduced modulo
/// the number of valid options, so any value leads to a legal move.
#[derive(Clone, Copy, Debug, Default)]
pub struct Step {
    pub existing: bool,
    pub pile: u8,
    pub chip: u8,
    pub kill: u8,
    pub next: u8,
}

#[derive(Clone, Debug)]
pub struct Script {
    pub first_player: usize,
    pub steps: Vec<Step>,
}

impl Arbitrary for Step {
    fn arbitrary(g: &mut Gen) -> Self {
        Step {
            existing: bool::arbitrary(g),
            pile: u8::arbitrary(g),
            chip: u8::arbitrary(g),
            kill: u8::arbitrary(g),
            next: u8::arbitrary(g),
        }
    }
}

impl Arbitrary for Script {
    fn arbitrary(g: &mut Gen) -> Self {
        Script {
            first_player: usize::arbitrary(g),
            steps: Vec::<Step>::arbitrary(g),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let first_player = self.first_player;
        Box::new(self.steps.shrink().map(move |steps| Script {
            first_player,
            steps,
        }))
    }
}

/// Plays a [`Script`], one step per move, starting over when it runs out.
pub struct ScriptedDecider {
    script: Script,
    cursor: usize,
    step: Step,
}

impl ScriptedDecider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            cursor: 0,
            step: Step::default(),
        }
    }
}

impl DecisionMaker for ScriptedDecider {
    fn choose_move(&mut self, state: &GameState, player: PlayerId) -> anyhow::Result<PlayerMove> {
        if !self.script.steps.is_empty() {
            self.step = self.script.steps[self.cursor % self.script.steps.len()];
        }
        self.cursor += 1;

        let hand = &state.players()[player.0].chips;
        let chip = (!hand.is_empty() && self.step.chip % 2 == 0)
            .then(|| hand[self.step.chip as usize % hand.len()].id);

        let piles: Vec<&Pile> = state.piles().collect();
        let alive = state.player(player).is_some_and(|p| p.alive());
        if self.step.existing && alive && !piles.is_empty() {
            let pile = piles[self.step.pile as usize % piles.len()];
            let captures = pile.top().map(|c| c.color) == Some(player);
            if captures || !hand.is_empty() {
                return Ok(PlayerMove::existing(player, pile.id, chip));
            }
        }
        Ok(PlayerMove {
            player,
            action: Action::New { chip },
        })
    }

    fn choose_chip_to_kill(&mut self, _player: PlayerId, pile: &Pile) -> anyhow::Result<usize> {
        Ok(self.step.kill as usize % pile.len())
    }

    fn choose_next_player(
        &mut self,
        _player: PlayerId,
        candidates: &[PlayerId],
    ) -> anyhow::Result<PlayerId> {
        Ok(candidates[self.step.next as usize % candidates.len()])
    }
}
