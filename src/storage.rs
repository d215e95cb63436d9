use quarry_common::{ChunkCoord, QuarryError, Result};
use quarry_nbt::{NBTFile, Tag};
use std::collections::HashMap;

/// A chunk record as handed over by a storage backend, tagged with the key decoders
/// identify on.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChunk {
    pub format: String,
    pub version: i32,
    pub record: Tag,
}

impl RawChunk {
    pub fn new(format: impl Into<String>, version: i32, record: Tag) -> Self {
        RawChunk {
            format: format.into(),
            version,
            record,
        }
    }

    /// Wraps a region-file record, reading its key from `DataVersion`. Chunks
    /// written before data versions existed count as version 0.
    pub fn anvil(record: Tag) -> Self {
        let version = record
            .get("DataVersion")
            .and_then(Tag::as_i32)
            .unwrap_or(0);
        RawChunk::new("anvil", version, record)
    }

    /// Parses a region-file chunk payload (raw, gzip, or zlib NBT).
    pub fn anvil_from_bytes(bytes: &[u8]) -> Result<Self> {
        let file = NBTFile::read_any(bytes)?;
        Ok(RawChunk::anvil(file.root))
    }
}

/// Supplies raw chunk records. Implemented by whatever owns the world files.
pub trait ChunkSource: Send + Sync {
    fn raw_chunk(&self, coord: ChunkCoord, dimension: &str) -> Result<RawChunk>;
}

/// A [`ChunkSource`] over records already in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryChunkSource {
    chunks: HashMap<(String, ChunkCoord), RawChunk>,
}

impl InMemoryChunkSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: ChunkCoord, dimension: impl Into<String>, chunk: RawChunk) {
        self.chunks.insert((dimension.into(), coord), chunk);
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

impl ChunkSource for InMemoryChunkSource {
    fn raw_chunk(&self, coord: ChunkCoord, dimension: &str) -> Result<RawChunk> {
        self.chunks
            .get(&(dimension.to_string(), coord))
            .cloned()
            .ok_or_else(|| {
                QuarryError::format(format!("no chunk at {} in {}", coord, dimension))
            })
    }
}
