use crate::chunk::palette::Palette;
use crate::chunk::volume::Volume;
use quarry_common::{QuarryError, Result};
use quarry_nbt::Tag;

/// Voxels per 16x16x16 section.
pub const SECTION_VOLUME: usize = 16 * 16 * 16;
/// Sections stacked in one legacy column.
pub const SECTIONS_PER_COLUMN: i32 = 16;
pub const COLUMN_HEIGHT: usize = 256;
/// Canonical chunk shape in (X, Y, Z) order.
pub const CHUNK_SHAPE: [usize; 3] = [16, COLUMN_HEIGHT, 16];

/// One raw legacy section, as it sits in the `Sections` list.
///
/// All byte arrays are in (Y, Z, X) order with X varying fastest.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub sy: i32,
    pub blocks: Vec<u8>,
    /// Nibble packed, low nibble holds the even voxel.
    pub data: Vec<u8>,
    /// Optional nibble packed high bits of the block id.
    pub add: Option<Vec<u8>>,
}

impl Section {
    /// Reads and validates one section compound (`Y`, `Blocks`, `Data`, optional `Add`).
    pub fn from_tag(tag: &Tag) -> Result<Section> {
        if tag.as_compound().is_none() {
            return Err(QuarryError::format(format!(
                "section must be a TAG_Compound, got {}",
                tag.type_name()
            )));
        }

        let sy = tag
            .get("Y")
            .and_then(Tag::as_integer)
            .ok_or_else(|| QuarryError::format("section is missing Y"))?;
        if !(0..SECTIONS_PER_COLUMN as i64).contains(&sy) {
            return Err(QuarryError::format(format!(
                "section Y {} outside 0..{}",
                sy, SECTIONS_PER_COLUMN
            )));
        }

        let blocks = byte_array(tag, "Blocks", SECTION_VOLUME)?;
        let data = byte_array(tag, "Data", SECTION_VOLUME / 2)?;
        let add = match tag.get("Add") {
            Some(_) => Some(byte_array(tag, "Add", SECTION_VOLUME / 2)?),
            None => None,
        };

        Ok(Section {
            sy: sy as i32,
            blocks,
            data,
            add,
        })
    }

    /// Block ids for this section with the add nibbles merged in, in storage order.
    pub fn block_ids(&self) -> Vec<u16> {
        let mut ids: Vec<u16> = self.blocks.iter().map(|&b| b as u16).collect();
        if let Some(add) = &self.add {
            for (id, high) in ids.iter_mut().zip(unpack_nibbles(add)) {
                *id |= (high as u16) << 8;
            }
        }
        ids
    }

    pub fn block_data(&self) -> Vec<u8> {
        unpack_nibbles(&self.data)
    }
}

fn byte_array(tag: &Tag, key: &str, expected: usize) -> Result<Vec<u8>> {
    let bytes = tag
        .get(key)
        .ok_or_else(|| QuarryError::format(format!("section is missing {}", key)))?
        .as_byte_array()
        .ok_or_else(|| QuarryError::format(format!("section {} is not a TAG_Byte_Array", key)))?;
    if bytes.len() != expected {
        return Err(QuarryError::format(format!(
            "section {} holds {} bytes, expected {}",
            key,
            bytes.len(),
            expected
        )));
    }
    Ok(bytes.iter().map(|&b| b as u8).collect())
}

/// Expands packed nibbles to one value per byte. Byte `n` yields positions `2n` (low
/// nibble) and `2n + 1` (high nibble).
pub fn unpack_nibbles(packed: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(packed.len() * 2);
    for &byte in packed {
        out.push(byte & 0x0f);
        out.push(byte >> 4);
    }
    out
}

/// Stacks sections into a 256 tall column and reorders it to (X, Y, Z).
///
/// Returns the merged block ids and data values as two volumes of [`CHUNK_SHAPE`].
/// Heights not covered by any section stay zero.
pub fn assemble_column(sections: &[Section]) -> Result<(Volume<u16>, Volume<u8>)> {
    if sections.is_empty() {
        return Err(QuarryError::format(
            "chunk has no sections; it was never populated",
        ));
    }

    // Working column in storage order (Y, Z, X).
    let mut ids: Volume<u16> = Volume::new([COLUMN_HEIGHT, 16, 16]);
    let mut data: Volume<u8> = Volume::new([COLUMN_HEIGHT, 16, 16]);

    for section in sections {
        let offset = [section.sy as usize * 16, 0, 0];
        ids.write_at(offset, &Volume::from_vec([16, 16, 16], section.block_ids())?)?;
        data.write_at(offset, &Volume::from_vec([16, 16, 16], section.block_data())?)?;
    }

    // (Y, Z, X) -> (Z, Y, X) -> (X, Y, Z)
    let ids = ids.swap_axes(0, 1).swap_axes(0, 2);
    let data = data.swap_axes(0, 1).swap_axes(0, 2);
    Ok((ids, data))
}

/// Runs the whole legacy block pipeline: section list in, (index volume, palette) out.
pub fn decode_blocks(sections: &[Section]) -> Result<(Volume<u32>, Palette)> {
    let (ids, data) = assemble_column(sections)?;
    let (indices, palette) = Palette::compress(ids.as_slice(), data.as_slice())?;
    Ok((Volume::from_vec(CHUNK_SHAPE, indices)?, palette))
}
