mod config;
mod console;
mod game;
mod observer;
mod recording;
pub use config::*;
pub use console::*;
pub use game::*;
pub use observer::*;
pub use recording::*;
