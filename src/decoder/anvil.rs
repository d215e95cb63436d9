use crate::chunk::palette::Palette;
use crate::chunk::section::{decode_blocks, Section};
use crate::chunk::Chunk;
use crate::decoder::{Decoder, TranslatorKey};
use crate::entity::{EntityCodec, EntityEntry, EntityHandlerRegistry};
use quarry_common::{QuarryError, Result};
use quarry_logger::{log, LogSeverity};
use quarry_nbt::Tag;

type EntityResults = (Vec<EntityEntry>, Vec<QuarryError>);

pub const FORMAT: &str = "anvil";

/// Last data version that still stores numeric `Blocks`/`Data` sections (1.12.2).
pub const MAX_LEGACY_DATA_VERSION: i32 = 1343;

/// Region-file chunks from before the block flattening.
///
/// Expects the record layout `{DataVersion, Level: {xPos, zPos, Sections, Entities}}`.
#[derive(Clone, Default)]
pub struct AnvilDecoder {
    entities: EntityCodec,
}

impl AnvilDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handlers(handlers: EntityHandlerRegistry) -> Self {
        AnvilDecoder {
            entities: EntityCodec::new(handlers),
        }
    }

    /// Good entries in input order, plus one error per record that failed.
    fn decode_entities(&self, level: &Tag) -> Result<EntityResults> {
        let records = match level.get("Entities") {
            None => return Ok((Vec::new(), Vec::new())),
            Some(tag) => tag
                .as_list()
                .ok_or_else(|| QuarryError::format("Level.Entities is not a TAG_List"))?,
        };

        let mut entries = Vec::with_capacity(records.len());
        let mut errors = Vec::new();
        for result in self.entities.decode_entities(records) {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => errors.push(e),
            }
        }
        Ok((entries, errors))
    }
}

fn required_int(tag: &Tag, key: &str, context: &str) -> Result<i32> {
    let value = tag
        .get(key)
        .ok_or_else(|| QuarryError::format(format!("{} is missing {}", context, key)))?;
    value.as_i32().ok_or_else(|| {
        QuarryError::format(format!(
            "{}.{} must be a TAG_Int, got {}",
            context,
            key,
            value.type_name()
        ))
    })
}

impl Decoder for AnvilDecoder {
    fn name(&self) -> &'static str {
        "anvil_legacy"
    }

    fn identify(&self, format: &str, version: i32) -> bool {
        format == FORMAT && version <= MAX_LEGACY_DATA_VERSION
    }

    fn decode(&self, record: &Tag) -> Result<(Chunk, Palette)> {
        let level = record
            .get("Level")
            .filter(|level| level.as_compound().is_some())
            .ok_or_else(|| QuarryError::format("chunk record has no Level compound"))?;

        let cx = required_int(level, "xPos", "Level")?;
        let cz = required_int(level, "zPos", "Level")?;

        let sections = match level.get("Sections") {
            Some(tag) => tag
                .as_list()
                .ok_or_else(|| QuarryError::format("Level.Sections is not a TAG_List"))?
                .iter()
                .map(Section::from_tag)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let (blocks, palette) = decode_blocks(&sections)?;
        let (entities, entity_errors) = self.decode_entities(level)?;

        log(
            format!(
                "Decoded chunk ({}, {}): {} sections, {} palette entries, {} entities, {} bad entities",
                cx,
                cz,
                sections.len(),
                palette.len(),
                entities.len(),
                entity_errors.len()
            ),
            LogSeverity::Debug,
        );

        // Block entities are left to a later stage.
        let mut chunk = Chunk::new(cx, cz, blocks, palette.clone(), entities);
        chunk.entity_errors = entity_errors;
        Ok((chunk, palette))
    }

    fn get_translator(&self, record: &Tag) -> Result<TranslatorKey> {
        Ok(TranslatorKey {
            format: FORMAT.to_string(),
            version: required_int(record, "DataVersion", "chunk record")?,
        })
    }
}
