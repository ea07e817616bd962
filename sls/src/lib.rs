//! Rules engine for So Long Sucker: chips, piles, players and the resolution
//! of one move into an outcome and the next player to move.
pub use chip::*;
pub use config::*;
pub use decision::*;
pub use errors::*;
pub use game::*;
pub use observer::*;
pub use pile::*;
pub use player::*;
pub use protocol::*;
pub use turn::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod chip;
mod config;
mod decision;
mod errors;
mod game;
mod observer;
mod pile;
mod player;
mod protocol;
mod turn;
mod visualization;
