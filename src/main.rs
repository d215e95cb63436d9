use quarry::storage::RawChunk;
use quarry::{default_decoders, default_interfaces};
use quarry_logger::{log, LogSeverity::*};
use std::process::ExitCode;

/// Decodes each chunk file named on the command line and logs what it holds.
fn main() -> ExitCode {
    quarry_logger::init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        log("Usage: quarry <chunk.nbt>...".to_owned(), Error);
        return ExitCode::FAILURE;
    }

    let registry = default_decoders();
    let interfaces = match default_interfaces() {
        Ok(interfaces) => interfaces,
        Err(e) => {
            log(format!("Built-in interfaces are broken: {}", e), Fatal);
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0;
    for path in &paths {
        let raw = match std::fs::read(path)
            .map_err(quarry::QuarryError::from)
            .and_then(|bytes| RawChunk::anvil_from_bytes(&bytes))
        {
            Ok(raw) => raw,
            Err(e) => {
                log(format!("{}: {}", path, e), Error);
                failed += 1;
                continue;
            }
        };

        match registry.decode(&raw) {
            Ok((chunk, palette)) => {
                log(
                    format!(
                        "{}: chunk ({}, {}) {} {}, {} palette entries, {} entities",
                        path,
                        chunk.cx,
                        chunk.cz,
                        raw.format,
                        raw.version,
                        palette.len(),
                        chunk.entities.len()
                    ),
                    Info,
                );
                if let Ok(interface) = interfaces.for_version(&raw.format, raw.version) {
                    log(
                        format!(
                            "{}: interface {}_{} ({} features)",
                            path,
                            interface.family(),
                            interface.version(),
                            interface.features().len()
                        ),
                        Debug,
                    );
                }
                for error in &chunk.entity_errors {
                    log(format!("{}: skipped entity: {}", path, error), Warning);
                }
                for entity in &chunk.entities {
                    match serde_json::to_string(entity.payload()) {
                        Ok(json) => log(format!("  {} {}", entity, json), Debug),
                        Err(e) => log(format!("  {} <payload: {}>", entity, e), Warning),
                    }
                }
            }
            Err(e) => {
                log(format!("{}: {}", path, e), Error);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        log(format!("{} of {} chunks failed", failed, paths.len()), Warning);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
