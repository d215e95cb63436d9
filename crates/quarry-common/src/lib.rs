pub mod error;
pub mod types;

pub use error::QuarryError;
pub use types::{ChunkCoord, Coord, Result};
