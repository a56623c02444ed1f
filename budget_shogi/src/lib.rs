pub use abilities::*;
pub use board::*;
pub use catalog::*;
pub use config::*;
pub use design::*;
pub use errors::*;
pub use game::*;
pub use hand::*;
pub use movegen::*;
pub use piece::*;
pub use promotion::*;
pub use session::*;
pub use visualization::*;

mod abilities;
#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod catalog;
mod config;
mod design;
mod errors;
mod game;
mod hand;
mod movegen;
mod piece;
mod promotion;
mod session;
mod visualization;
