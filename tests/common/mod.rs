use quarry::{RawChunk, Tag};
use quarry_nbt::NBTFile;
use std::collections::HashMap;

pub const SECTION_VOLUME: usize = 4096;

/// A section whose block id is `x + sy` and whose data is `z`, so axis mix-ups show.
pub fn patterned_section(sy: i8) -> Tag {
    let blocks: Vec<i8> = (0..SECTION_VOLUME)
        .map(|i| ((i % 16) + (sy as usize)) as i8)
        .collect();
    // byte j covers voxels 2j and 2j + 1, which share y and z; j / 8 == y * 16 + z
    let data: Vec<i8> = (0..SECTION_VOLUME / 2)
        .map(|j| {
            let z = ((j / 8) % 16) as u8;
            (z << 4 | z) as i8
        })
        .collect();
    section(sy, blocks, data, None)
}

pub fn section(sy: i8, blocks: Vec<i8>, data: Vec<i8>, add: Option<Vec<i8>>) -> Tag {
    let mut compound = HashMap::from([
        ("Y".to_string(), Tag::Byte(sy)),
        ("Blocks".to_string(), Tag::ByteArray(blocks)),
        ("Data".to_string(), Tag::ByteArray(data)),
    ]);
    if let Some(add) = add {
        compound.insert("Add".to_string(), Tag::ByteArray(add));
    }
    Tag::Compound(compound)
}

pub fn entity(id: &str, pos: [f64; 3]) -> Tag {
    Tag::Compound(HashMap::from([
        ("id".to_string(), Tag::String(id.to_string())),
        (
            "Pos".to_string(),
            Tag::List(pos.iter().map(|&v| Tag::Double(v)).collect()),
        ),
        ("OnGround".to_string(), Tag::Byte(1)),
    ]))
}

pub fn chunk_record(cx: i32, cz: i32, data_version: i32, sections: Vec<Tag>, entities: Vec<Tag>) -> Tag {
    let level = HashMap::from([
        ("xPos".to_string(), Tag::Int(cx)),
        ("zPos".to_string(), Tag::Int(cz)),
        ("Sections".to_string(), Tag::List(sections)),
        ("Entities".to_string(), Tag::List(entities)),
        ("TileEntities".to_string(), Tag::List(vec![])),
    ]);
    Tag::Compound(HashMap::from([
        ("DataVersion".to_string(), Tag::Int(data_version)),
        ("Level".to_string(), Tag::Compound(level)),
    ]))
}

pub fn legacy_chunk(cx: i32, cz: i32) -> RawChunk {
    RawChunk::anvil(chunk_record(
        cx,
        cz,
        1343,
        vec![patterned_section(0), patterned_section(3)],
        vec![entity("minecraft:pig", [cx as f64 * 16.0, 64.0, cz as f64 * 16.0])],
    ))
}

/// Serializes a record the way a region file stores it.
pub fn to_zlib_bytes(record: &Tag) -> Vec<u8> {
    let file = NBTFile::new(String::new(), record.clone());
    let mut bytes = Vec::new();
    file.write_zlib(&mut bytes).unwrap();
    bytes
}
