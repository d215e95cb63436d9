pub mod batch;
pub mod chunk;
pub mod decoder;
pub mod entity;
pub mod interface;
pub mod storage;

// Re-export commonly used items
pub use batch::{decode_batch, decode_from_source, BatchOptions, BatchOutcome};
pub use chunk::palette::{BlockPair, Palette};
pub use chunk::volume::Volume;
pub use chunk::Chunk;
pub use decoder::{default_decoders, Decoder, DecoderRegistry, TranslatorKey};
pub use entity::{EntityCodec, EntityEntry, EntityHandler, EntityHandlerRegistry};
pub use interface::{default_interfaces, derive, FeatureValue, Interface, InterfaceChain, InterfaceRegistry};
pub use quarry_common::{ChunkCoord, Coord, QuarryError, Result};
pub use quarry_nbt::Tag;
pub use storage::{ChunkSource, InMemoryChunkSource, RawChunk};
