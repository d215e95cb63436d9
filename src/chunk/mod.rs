pub mod palette;
pub mod section;
pub mod volume;

use crate::entity::EntityEntry;
use palette::{BlockPair, Palette};
use quarry_common::{ChunkCoord, QuarryError, Result};
use volume::Volume;

pub use section::CHUNK_SHAPE;

/// A decoded, version independent chunk column.
///
/// `blocks` holds palette indices in (X, Y, Z) order with shape [`CHUNK_SHAPE`].
#[derive(Debug)]
pub struct Chunk {
    pub cx: i32,
    pub cz: i32,
    blocks: Volume<u32>,
    palette: Palette,
    pub entities: Vec<EntityEntry>,
    /// Entity records that could not be decoded, each an `EntityDecode` error carrying
    /// the record's index in the raw list. Their entries are absent from `entities`.
    pub entity_errors: Vec<QuarryError>,
    /// Always `None` from the legacy decoder; no stage fills it yet.
    pub tile_entities: Option<Vec<EntityEntry>>,
    /// Set by editors when the chunk must be written back.
    pub changed: bool,
}

impl Chunk {
    pub fn new(
        cx: i32,
        cz: i32,
        blocks: Volume<u32>,
        palette: Palette,
        entities: Vec<EntityEntry>,
    ) -> Self {
        Chunk {
            cx,
            cz,
            blocks,
            palette,
            entities,
            entity_errors: Vec::new(),
            tile_entities: None,
            changed: false,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        ChunkCoord::new(self.cx, self.cz)
    }

    pub fn blocks(&self) -> &Volume<u32> {
        &self.blocks
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The block pair at a chunk-local position.
    pub fn palette_entry(&self, x: usize, y: usize, z: usize) -> Option<BlockPair> {
        self.blocks
            .get([x, y, z])
            .and_then(|index| self.palette.get(index))
    }

    /// Reads the palette indices of the half-open box `min..max`.
    pub fn read_box(&self, min: [usize; 3], max: [usize; 3]) -> Result<Volume<u32>> {
        self.blocks.read_box(min, max)
    }

    /// Overwrites a box of palette indices and marks the chunk changed.
    ///
    /// Indices are not checked against the palette; callers copying between chunks
    /// must remap them first.
    pub fn write_box(&mut self, min: [usize; 3], max: [usize; 3], src: &Volume<u32>) -> Result<()> {
        self.blocks.write_box(min, max, src)?;
        self.changed = true;
        Ok(())
    }
}
