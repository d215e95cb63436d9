use crate::chunk::palette::Palette;
use crate::chunk::Chunk;
use crate::decoder::DecoderRegistry;
use crate::storage::{ChunkSource, RawChunk};
use quarry_common::{ChunkCoord, QuarryError, Result};
use quarry_logger::{log, LogSeverity};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Decode chunks on the rayon pool instead of the calling thread.
    pub parallel: bool,
    /// Log each failed chunk at error severity.
    pub log_failures: bool,
    /// Log each entity record a decoded chunk had to leave out, at warning severity.
    pub log_entity_failures: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            parallel: true,
            log_failures: true,
            log_entity_failures: true,
        }
    }
}

#[derive(Debug)]
pub struct DecodedChunk {
    pub coord: ChunkCoord,
    pub chunk: Chunk,
    pub palette: Palette,
}

#[derive(Debug)]
pub struct ChunkFailure {
    pub coord: ChunkCoord,
    pub error: QuarryError,
}

/// Successes and failures of one batch, each in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub decoded: Vec<DecodedChunk>,
    pub failures: Vec<ChunkFailure>,
}

impl BatchOutcome {
    /// Number of entity records left out across all decoded chunks.
    pub fn entity_failure_count(&self) -> usize {
        self.decoded.iter().map(|d| d.chunk.entity_errors.len()).sum()
    }
}

impl BatchOutcome {
    fn collect(results: Vec<(ChunkCoord, Result<(Chunk, Palette)>)>, options: BatchOptions) -> Self {
        let mut outcome = BatchOutcome::default();
        for (coord, result) in results {
            match result {
                Ok((chunk, palette)) => {
                    if options.log_entity_failures {
                        for error in &chunk.entity_errors {
                            log(
                                format!("Skipped entity in chunk {}: {}", coord, error),
                                LogSeverity::Warning,
                            );
                        }
                    }
                    outcome.decoded.push(DecodedChunk {
                        coord,
                        chunk,
                        palette,
                    })
                }
                Err(error) => {
                    if options.log_failures {
                        log(
                            format!("Failed to decode chunk {}: {}", coord, error),
                            LogSeverity::Error,
                        );
                    }
                    outcome.failures.push(ChunkFailure { coord, error });
                }
            }
        }
        outcome
    }
}

/// Decodes every chunk independently; one bad chunk never affects another.
pub fn decode_batch(
    registry: &DecoderRegistry,
    items: &[(ChunkCoord, RawChunk)],
    options: BatchOptions,
) -> BatchOutcome {
    let decode = |(coord, raw): &(ChunkCoord, RawChunk)| (*coord, registry.decode(raw));
    let results: Vec<_> = if options.parallel {
        items.par_iter().map(decode).collect()
    } else {
        items.iter().map(decode).collect()
    };
    BatchOutcome::collect(results, options)
}

/// Fetches each coordinate from `source` and decodes it. A failed fetch is reported
/// like a failed decode.
pub fn decode_from_source<S: ChunkSource + ?Sized>(
    registry: &DecoderRegistry,
    source: &S,
    dimension: &str,
    coords: &[ChunkCoord],
    options: BatchOptions,
) -> BatchOutcome {
    let decode = |coord: &ChunkCoord| {
        let result = source
            .raw_chunk(*coord, dimension)
            .and_then(|raw| registry.decode(&raw));
        (*coord, result)
    };
    let results: Vec<_> = if options.parallel {
        coords.par_iter().map(decode).collect()
    } else {
        coords.iter().map(decode).collect()
    };
    BatchOutcome::collect(results, options)
}
