mod common;

use assert_matches::assert_matches;
use common::*;
use quarry::{
    decode_batch, decode_from_source, default_decoders, default_interfaces, BatchOptions, BlockPair,
    ChunkCoord, FeatureValue, InMemoryChunkSource, QuarryError, RawChunk, Tag,
};
use std::thread;

#[test]
fn test_decode_from_region_bytes_is_deterministic() {
    let record = legacy_chunk(3, -9).record;
    let bytes = to_zlib_bytes(&record);

    let first = default_decoders()
        .decode(&RawChunk::anvil_from_bytes(&bytes).unwrap())
        .unwrap();
    let second = default_decoders()
        .decode(&RawChunk::anvil_from_bytes(&bytes).unwrap())
        .unwrap();

    assert_eq!(first.0.blocks(), second.0.blocks());
    assert_eq!(first.1, second.1);
    assert_eq!((first.0.cx, first.0.cz), (3, -9));
}

#[test]
fn test_palette_is_valid_and_axes_are_xyz() {
    let (chunk, palette) = default_decoders().decode(&legacy_chunk(0, 0)).unwrap();

    assert!(chunk
        .blocks()
        .as_slice()
        .iter()
        .all(|&i| (i as usize) < palette.len()));
    let mut entries = palette.entries().to_vec();
    entries.dedup();
    assert_eq!(entries.len(), palette.len());

    // the fixture's id follows x (plus section index) and its data follows z
    assert_eq!(chunk.palette_entry(5, 0, 0), Some(BlockPair::new(5, 0)));
    assert_eq!(chunk.palette_entry(0, 0, 5), Some(BlockPair::new(0, 5)));
    assert_eq!(chunk.palette_entry(2, 49, 7), Some(BlockPair::new(5, 7)));
    // heights without a section are air
    assert_eq!(chunk.palette_entry(2, 20, 7), Some(BlockPair::new(0, 0)));
}

#[test]
fn test_add_nibble_reaches_palette() {
    let mut blocks = vec![0i8; SECTION_VOLUME];
    blocks[0] = 0x03;
    let mut add = vec![0i8; SECTION_VOLUME / 2];
    add[0] = 0x01;
    let record = chunk_record(
        0,
        0,
        1139,
        vec![section(0, blocks, vec![0; SECTION_VOLUME / 2], Some(add))],
        vec![],
    );

    let (chunk, palette) = default_decoders().decode(&RawChunk::anvil(record)).unwrap();
    assert_eq!(chunk.palette_entry(0, 0, 0), Some(BlockPair::new(0x103, 0)));
    assert_eq!(palette.entries().last(), Some(&BlockPair::new(0x103, 0)));
}

#[test]
fn test_batch_isolates_corrupt_chunk() {
    let mut items: Vec<(ChunkCoord, RawChunk)> = (0..6)
        .map(|i| (ChunkCoord::new(i, 0), legacy_chunk(i, 0)))
        .collect();

    let corrupt = chunk_record(
        4,
        0,
        1343,
        vec![section(0, vec![0; 100], vec![0; SECTION_VOLUME / 2], None)],
        vec![],
    );
    items[4].1 = RawChunk::anvil(corrupt);

    for parallel in [true, false] {
        let options = BatchOptions {
            parallel,
            log_failures: false,
            log_entity_failures: false,
        };
        let outcome = decode_batch(default_decoders(), &items, options);

        let decoded: Vec<i32> = outcome.decoded.iter().map(|d| d.coord.cx).collect();
        assert_eq!(decoded, vec![0, 1, 2, 3, 5]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].coord, ChunkCoord::new(4, 0));
        assert_matches!(outcome.failures[0].error, QuarryError::Format(_));
    }
}

#[test]
fn test_unsupported_version_in_batch() {
    let items = vec![
        (ChunkCoord::new(0, 0), legacy_chunk(0, 0)),
        (
            ChunkCoord::new(1, 0),
            RawChunk::new("anvil", 1631, legacy_chunk(1, 0).record),
        ),
    ];
    let outcome = decode_batch(default_decoders(), &items, BatchOptions::default());
    assert_eq!(outcome.decoded.len(), 1);
    assert_matches!(
        outcome.failures[0].error,
        QuarryError::UnsupportedVersion { version: 1631, .. }
    );
}

#[test]
fn test_decode_from_source() {
    let mut source = InMemoryChunkSource::new();
    for cx in 0..3 {
        source.insert(ChunkCoord::new(cx, 1), "overworld", legacy_chunk(cx, 1));
    }
    let coords = [ChunkCoord::new(0, 1), ChunkCoord::new(9, 9), ChunkCoord::new(2, 1)];

    let outcome = decode_from_source(
        default_decoders(),
        &source,
        "overworld",
        &coords,
        BatchOptions::default(),
    );
    assert_eq!(outcome.decoded.len(), 2);
    assert_eq!(outcome.decoded[1].coord, ChunkCoord::new(2, 1));
    assert_eq!(outcome.failures[0].coord, ChunkCoord::new(9, 9));
}

#[test]
fn test_entities_survive_malformed_neighbour() {
    let record = chunk_record(
        0,
        0,
        1343,
        vec![patterned_section(0)],
        vec![
            entity("minecraft:cow", [1.0, 2.0, 3.0]),
            Tag::String("not an entity".to_string()),
            entity("Creeper", [4.0, 5.0, 6.0]),
        ],
    );
    let (chunk, _) = default_decoders().decode(&RawChunk::anvil(record)).unwrap();

    let names: Vec<&str> = chunk.entities.iter().map(|e| e.namespaced_name()).collect();
    assert_eq!(names, vec!["minecraft:cow", "Creeper"]);
    assert_eq!(chunk.entities[1].namespace(), None);
    assert_eq!(
        chunk.entities[0].payload().get("OnGround"),
        Some(&Tag::Byte(1))
    );
    assert_eq!(chunk.entity_errors.len(), 1);
    assert_matches!(chunk.entity_errors[0], QuarryError::EntityDecode { index: 1, .. });
}

#[test]
fn test_bad_entities_reach_batch_caller() {
    let bad = chunk_record(
        1,
        0,
        1343,
        vec![patterned_section(0)],
        vec![Tag::Int(7), Tag::Compound(Default::default())],
    );
    let items = vec![
        (ChunkCoord::new(0, 0), legacy_chunk(0, 0)),
        (ChunkCoord::new(1, 0), RawChunk::anvil(bad)),
    ];

    for log_entity_failures in [true, false] {
        let options = BatchOptions {
            log_entity_failures,
            ..BatchOptions::default()
        };
        let outcome = decode_batch(default_decoders(), &items, options);

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.entity_failure_count(), 2);
        let errors = &outcome.decoded[1].chunk.entity_errors;
        assert_matches!(errors[0], QuarryError::EntityDecode { index: 0, .. });
        assert_matches!(errors[1], QuarryError::EntityDecode { index: 1, .. });
        assert!(outcome.decoded[0].chunk.entity_errors.is_empty());
    }
}

#[test]
fn test_translator_key() {
    let raw = legacy_chunk(0, 0);
    let key = default_decoders().get_translator(&raw).unwrap();
    assert_eq!(key.format, "anvil");
    assert_eq!(key.version, 1343);

    let interface = default_interfaces()
        .unwrap()
        .for_version(&key.format, key.version)
        .unwrap();
    assert_eq!(interface.feature("data_version"), Some(&FeatureValue::Text("int".to_string())));
}

#[test]
fn test_concurrent_decoding_shares_registry() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            thread::spawn(move || {
                let (chunk, palette) = default_decoders().decode(&legacy_chunk(i, i)).unwrap();
                (chunk.cx, palette)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, (cx, palette)) in results.iter().enumerate() {
        assert_eq!(*cx, i as i32);
        assert_eq!(palette, &results[0].1);
    }
}
