pub mod entry;
pub mod handler;

pub use entry::EntityEntry;
pub use handler::{EntityHandler, EntityHandlerRegistry, PassthroughHandler};

use quarry_common::Result;
use quarry_nbt::Tag;

/// Converts a chunk's raw entity list into entries, dispatching on each record's `id`.
#[derive(Clone, Default)]
pub struct EntityCodec {
    handlers: EntityHandlerRegistry,
}

impl EntityCodec {
    pub fn new(handlers: EntityHandlerRegistry) -> Self {
        EntityCodec { handlers }
    }

    pub fn handlers(&self) -> &EntityHandlerRegistry {
        &self.handlers
    }

    /// One result per input record, in input order. A bad record does not stop the rest.
    pub fn decode_entities(&self, records: &[Tag]) -> Vec<Result<EntityEntry>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let handler = match record.get("id").and_then(Tag::as_string) {
                    Some(id) => self.handlers.handler_for(id),
                    None => self.handlers.default_handler(),
                };
                handler.load_entity(index, record)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use quarry_common::QuarryError;
    use std::collections::HashMap;

    fn mob(id: &str, x: f64) -> Tag {
        Tag::Compound(HashMap::from([
            ("id".to_string(), Tag::String(id.to_string())),
            (
                "Pos".to_string(),
                Tag::List(vec![Tag::Double(x), Tag::Double(64.0), Tag::Double(0.0)]),
            ),
        ]))
    }

    #[test]
    fn test_order_preserved_and_failures_isolated() {
        let codec = EntityCodec::default();
        let records = vec![
            mob("minecraft:pig", 1.0),
            Tag::Compound(HashMap::new()),
            mob("minecraft:cow", 3.0),
        ];
        let results = codec.decode_entities(&records);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().base_name(), "pig");
        assert_matches!(results[1], Err(QuarryError::EntityDecode { index: 1, .. }));
        assert_eq!(results[2].as_ref().unwrap().base_name(), "cow");
    }
}
