#[macro_use]
extern crate serde;

mod ballot;
mod clock;
mod commitment;
mod config;
mod engine;
mod error;
mod shared;
mod store;
mod tally;
mod transaction;
mod verify;

pub use ballot::*;
pub use clock::*;
pub use commitment::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use shared::*;
pub use store::*;
pub use tally::*;
pub use transaction::*;
pub use verify::*;
