use quarry_common::{QuarryError, Result};
use serde::Serialize;

/// A legacy block value: numeric id (up to 12 bits with the add nibble) plus its 4 bit data.
///
/// Ordering is by id first, then data, matching the numeric order of the packed key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockPair {
    pub id: u16,
    pub data: u8,
}

impl BlockPair {
    pub fn new(id: u16, data: u8) -> Self {
        BlockPair { id, data }
    }

    fn key(self) -> u32 {
        (self.id as u32) << 8 | self.data as u32
    }

    fn from_key(key: u32) -> Self {
        BlockPair {
            id: (key >> 8) as u16,
            data: (key & 0xff) as u8,
        }
    }
}

/// Sorted, duplicate-free table of the block pairs a chunk uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Palette {
    entries: Vec<BlockPair>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<BlockPair> {
        self.entries.get(index as usize).copied()
    }

    pub fn entries(&self) -> &[BlockPair] {
        &self.entries
    }

    pub fn index_of(&self, pair: BlockPair) -> Option<u32> {
        self.entries.binary_search(&pair).ok().map(|i| i as u32)
    }

    /// Pairs `ids[i]` with `data[i]`, deduplicates, and returns one palette index per voxel.
    ///
    /// The palette is the sorted set of distinct pairs, so the result depends only on the
    /// input values and never on hashing or insertion order.
    pub fn compress(ids: &[u16], data: &[u8]) -> Result<(Vec<u32>, Palette)> {
        if ids.len() != data.len() {
            return Err(QuarryError::format(format!(
                "{} block ids but {} data values",
                ids.len(),
                data.len()
            )));
        }

        let keys: Vec<u32> = ids
            .iter()
            .zip(data)
            .map(|(&id, &d)| BlockPair::new(id, d).key())
            .collect();

        let mut unique = keys.clone();
        unique.sort_unstable();
        unique.dedup();

        let indices = keys
            .iter()
            // every key came from `unique`, so the search always hits
            .map(|key| unique.binary_search(key).unwrap_or_default() as u32)
            .collect();

        let entries = unique.into_iter().map(BlockPair::from_key).collect();
        Ok((indices, Palette { entries }))
    }
}
