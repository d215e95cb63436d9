use crate::entity::entry::EntityEntry;
use quarry_common::{Coord, QuarryError, Result};
use quarry_nbt::Tag;
use std::collections::HashMap;
use std::sync::Arc;

/// Turns one raw entity compound into an [`EntityEntry`].
pub trait EntityHandler: Send + Sync {
    /// `index` is the record's position in the chunk's entity list, for error reporting.
    fn load_entity(&self, index: usize, record: &Tag) -> Result<EntityEntry>;
}

/// Handles any entity: reads `id`, takes the position from `Pos` (or integer
/// `x`/`y`/`z`), and keeps every other field as the payload.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughHandler;

impl EntityHandler for PassthroughHandler {
    fn load_entity(&self, index: usize, record: &Tag) -> Result<EntityEntry> {
        let mut fields = record
            .as_compound()
            .cloned()
            .ok_or_else(|| {
                QuarryError::entity(index, format!("expected TAG_Compound, got {}", record.type_name()))
            })?;

        let identifier = match fields.remove("id") {
            Some(Tag::String(id)) => id,
            Some(other) => {
                return Err(QuarryError::entity(
                    index,
                    format!("id must be a TAG_String, got {}", other.type_name()),
                ))
            }
            None => return Err(QuarryError::entity(index, "missing id")),
        };

        let (x, y, z) = take_position(index, &mut fields)?;
        Ok(EntityEntry::from_identifier(
            &identifier,
            x,
            y,
            z,
            Tag::Compound(fields),
        ))
    }
}

fn coord(tag: &Tag) -> Option<Coord> {
    match tag {
        Tag::Float(v) => Some(Coord::Float(*v as f64)),
        Tag::Double(v) => Some(Coord::Float(*v)),
        other => other.as_integer().map(Coord::Int),
    }
}

fn take_position(index: usize, fields: &mut HashMap<String, Tag>) -> Result<(Coord, Coord, Coord)> {
    if let Some(pos) = fields.remove("Pos") {
        let parts = pos
            .as_list()
            .filter(|list| list.len() == 3)
            .and_then(|list| Some((coord(&list[0])?, coord(&list[1])?, coord(&list[2])?)));
        return parts.ok_or_else(|| QuarryError::entity(index, "Pos must be a list of three numbers"));
    }

    let mut axis = |name: &str| {
        fields
            .remove(name)
            .as_ref()
            .and_then(coord)
            .ok_or_else(|| QuarryError::entity(index, format!("missing position field {}", name)))
    };
    Ok((axis("x")?, axis("y")?, axis("z")?))
}

/// Entity id to handler map. Lookups never insert; unmatched ids get the default handler.
#[derive(Clone)]
pub struct EntityHandlerRegistry {
    handlers: HashMap<String, Arc<dyn EntityHandler>>,
    default: Arc<dyn EntityHandler>,
}

impl EntityHandlerRegistry {
    pub fn new() -> Self {
        Self::with_default(Arc::new(PassthroughHandler))
    }

    pub fn with_default(default: Arc<dyn EntityHandler>) -> Self {
        EntityHandlerRegistry {
            handlers: HashMap::new(),
            default,
        }
    }

    pub fn register(&mut self, entity_id: impl Into<String>, handler: Arc<dyn EntityHandler>) {
        self.handlers.insert(entity_id.into(), handler);
    }

    pub fn specific(&self, entity_id: &str) -> Option<&dyn EntityHandler> {
        self.handlers.get(entity_id).map(|h| h.as_ref())
    }

    pub fn default_handler(&self) -> &dyn EntityHandler {
        self.default.as_ref()
    }

    pub fn handler_for(&self, entity_id: &str) -> &dyn EntityHandler {
        self.specific(entity_id)
            .unwrap_or_else(|| self.default_handler())
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for EntityHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn pig() -> Tag {
        Tag::Compound(HashMap::from([
            ("id".to_string(), Tag::String("minecraft:pig".to_string())),
            (
                "Pos".to_string(),
                Tag::List(vec![Tag::Double(0.5), Tag::Double(70.0), Tag::Double(-8.5)]),
            ),
            ("Health".to_string(), Tag::Float(10.0)),
        ]))
    }

    struct Renaming;

    impl EntityHandler for Renaming {
        fn load_entity(&self, index: usize, record: &Tag) -> Result<EntityEntry> {
            let mut entry = PassthroughHandler.load_entity(index, record)?;
            entry.set_base_name("renamed");
            Ok(entry)
        }
    }

    #[test]
    fn test_passthrough_splits_id_and_keeps_rest() {
        let entry = PassthroughHandler.load_entity(0, &pig()).unwrap();
        assert_eq!(entry.namespace(), Some("minecraft"));
        assert_eq!(entry.base_name(), "pig");
        assert_eq!(entry.x(), Coord::Float(0.5));
        assert_eq!(entry.y(), Coord::Float(70.0));

        let payload = entry.payload().as_compound().unwrap();
        assert_eq!(payload.get("Health"), Some(&Tag::Float(10.0)));
        assert!(!payload.contains_key("id"));
        assert!(!payload.contains_key("Pos"));
    }

    #[test]
    fn test_legacy_id_without_namespace() {
        let mut fields = pig().into_compound().unwrap();
        fields.insert("id".to_string(), Tag::String("Pig".to_string()));
        let entry = PassthroughHandler.load_entity(0, &Tag::Compound(fields)).unwrap();
        assert_eq!(entry.namespace(), None);
        assert_eq!(entry.namespaced_name(), "Pig");
    }

    #[test]
    fn test_integer_xyz_position() {
        let record = Tag::Compound(HashMap::from([
            ("id".to_string(), Tag::String("Chest".to_string())),
            ("x".to_string(), Tag::Int(1)),
            ("y".to_string(), Tag::Int(2)),
            ("z".to_string(), Tag::Int(3)),
        ]));
        let entry = PassthroughHandler.load_entity(0, &record).unwrap();
        assert_eq!(entry.location(), (Coord::Int(1), Coord::Int(2), Coord::Int(3)));
    }

    #[test]
    fn test_malformed_records() {
        let mut no_id = pig().into_compound().unwrap();
        no_id.remove("id");
        assert_matches!(
            PassthroughHandler.load_entity(4, &Tag::Compound(no_id)),
            Err(QuarryError::EntityDecode { index: 4, .. })
        );

        let mut bad_pos = pig().into_compound().unwrap();
        bad_pos.insert("Pos".to_string(), Tag::List(vec![Tag::Double(1.0)]));
        assert_matches!(
            PassthroughHandler.load_entity(1, &Tag::Compound(bad_pos)),
            Err(QuarryError::EntityDecode { index: 1, .. })
        );

        assert_matches!(
            PassthroughHandler.load_entity(0, &Tag::Int(3)),
            Err(QuarryError::EntityDecode { .. })
        );
    }

    #[test]
    fn test_registry_lookup_does_not_insert() {
        let mut registry = EntityHandlerRegistry::new();
        registry.register("minecraft:pig", Arc::new(Renaming));

        let entry = registry.handler_for("minecraft:pig").load_entity(0, &pig()).unwrap();
        assert_eq!(entry.namespaced_name(), "minecraft:renamed");

        assert!(registry.specific("minecraft:cow").is_none());
        let entry = registry.handler_for("minecraft:cow").load_entity(0, &pig()).unwrap();
        assert_eq!(entry.base_name(), "pig");
        assert_eq!(registry.len(), 1);
    }
}
