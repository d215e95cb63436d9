pub mod anvil;

use crate::chunk::palette::Palette;
use crate::chunk::Chunk;
use crate::storage::RawChunk;
use once_cell::sync::Lazy;
use quarry_common::{QuarryError, Result};
use quarry_logger::{log, LogSeverity};
use quarry_nbt::Tag;
use serde::Serialize;
use std::fmt;

pub use anvil::AnvilDecoder;

/// Names the block/entity mapping table a chunk must be translated with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TranslatorKey {
    pub format: String,
    pub version: i32,
}

impl fmt::Display for TranslatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.format, self.version)
    }
}

/// Decoding logic for one range of versions of one storage format.
pub trait Decoder: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this decoder owns records of the given format and version. Never fails.
    fn identify(&self, format: &str, version: i32) -> bool;

    /// Decodes a full record. Either the whole chunk comes back or an error does.
    fn decode(&self, record: &Tag) -> Result<(Chunk, Palette)>;

    /// Reads the translator key without decoding anything else.
    fn get_translator(&self, record: &Tag) -> Result<TranslatorKey>;
}

struct DecoderFamily {
    format: String,
    decoders: Vec<Box<dyn Decoder>>,
}

/// Decoders grouped by format family, each family in priority order.
///
/// Built once and then only read, so a shared reference can be used from many threads.
#[derive(Default)]
pub struct DecoderRegistry {
    families: Vec<DecoderFamily>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `decoder` to `format`'s family; earlier registrations are tried first.
    pub fn register(&mut self, format: impl Into<String>, decoder: Box<dyn Decoder>) {
        let format = format.into();
        match self.families.iter_mut().find(|f| f.format == format) {
            Some(family) => family.decoders.push(decoder),
            None => self.families.push(DecoderFamily {
                format,
                decoders: vec![decoder],
            }),
        }
    }

    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.families.iter().map(|f| f.format.as_str())
    }

    /// The first decoder, in priority order, whose `identify` accepts the key.
    pub fn find(&self, format: &str, version: i32) -> Result<&dyn Decoder> {
        self.families
            .iter()
            .filter(|family| family.format == format)
            .flat_map(|family| family.decoders.iter())
            .find(|decoder| decoder.identify(format, version))
            .map(|decoder| decoder.as_ref())
            .ok_or_else(|| QuarryError::UnsupportedVersion {
                format: format.to_string(),
                version,
            })
    }

    pub fn decode(&self, raw: &RawChunk) -> Result<(Chunk, Palette)> {
        let decoder = self.find(&raw.format, raw.version)?;
        log(
            format!(
                "Decoding {} version {} with {}",
                raw.format,
                raw.version,
                decoder.name()
            ),
            LogSeverity::Debug,
        );
        decoder.decode(&raw.record)
    }

    pub fn get_translator(&self, raw: &RawChunk) -> Result<TranslatorKey> {
        self.find(&raw.format, raw.version)?
            .get_translator(&raw.record)
    }
}

static DEFAULT_DECODERS: Lazy<DecoderRegistry> = Lazy::new(|| {
    let mut registry = DecoderRegistry::new();
    registry.register(anvil::FORMAT, Box::new(AnvilDecoder::new()));
    registry
});

/// The process wide registry with every built-in decoder.
pub fn default_decoders() -> &'static DecoderRegistry {
    &DEFAULT_DECODERS
}
