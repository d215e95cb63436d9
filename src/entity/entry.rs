use quarry_common::Coord;
use quarry_nbt::Tag;
use std::fmt;

/// Which name field a caller is assigning. All three go through [`EntityEntry::rename`].
enum NameUpdate {
    Namespace(Option<String>),
    BaseName(String),
    Namespaced(String),
}

/// One entity lifted out of a chunk record.
///
/// The name is kept as `namespace`, `base_name`, and the joined `namespace:base_name`
/// form; the three always agree. Position is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityEntry {
    namespace: Option<String>,
    base_name: String,
    namespaced_name: String,
    x: Coord,
    y: Coord,
    z: Coord,
    payload: Tag,
}

impl EntityEntry {
    pub fn new(
        namespace: Option<String>,
        base_name: impl Into<String>,
        x: Coord,
        y: Coord,
        z: Coord,
        payload: Tag,
    ) -> Self {
        let mut entry = EntityEntry {
            namespace: None,
            base_name: String::new(),
            namespaced_name: String::new(),
            x,
            y,
            z,
            payload,
        };
        entry.rename(NameUpdate::Namespace(namespace));
        entry.rename(NameUpdate::BaseName(base_name.into()));
        entry
    }

    /// Builds an entry from a `namespace:base_name` identifier.
    pub fn from_identifier(identifier: &str, x: Coord, y: Coord, z: Coord, payload: Tag) -> Self {
        let mut entry = EntityEntry::new(None, "", x, y, z, payload);
        entry.rename(NameUpdate::Namespaced(identifier.to_string()));
        entry
    }

    fn rename(&mut self, update: NameUpdate) {
        match update {
            NameUpdate::Namespace(namespace) => self.namespace = namespace,
            NameUpdate::BaseName(base_name) => self.base_name = base_name,
            NameUpdate::Namespaced(name) => {
                let (namespace, base_name) = split_identifier(&name);
                self.namespace = namespace.map(str::to_string);
                self.base_name = base_name.to_string();
            }
        }
        self.namespaced_name = match self.namespace.as_deref() {
            None | Some("") => self.base_name.clone(),
            Some(namespace) => format!("{}:{}", namespace, self.base_name),
        };
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn set_namespace(&mut self, namespace: Option<String>) {
        self.rename(NameUpdate::Namespace(namespace));
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn set_base_name(&mut self, base_name: impl Into<String>) {
        self.rename(NameUpdate::BaseName(base_name.into()));
    }

    pub fn namespaced_name(&self) -> &str {
        &self.namespaced_name
    }

    pub fn set_namespaced_name(&mut self, name: impl Into<String>) {
        self.rename(NameUpdate::Namespaced(name.into()));
    }

    pub fn x(&self) -> Coord {
        self.x
    }

    pub fn y(&self) -> Coord {
        self.y
    }

    pub fn z(&self) -> Coord {
        self.z
    }

    pub fn location(&self) -> (Coord, Coord, Coord) {
        (self.x, self.y, self.z)
    }

    pub fn payload(&self) -> &Tag {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Tag {
        &mut self.payload
    }

    /// Replaces the payload, handing back the previous one.
    pub fn set_payload(&mut self, payload: Tag) -> Tag {
        std::mem::replace(&mut self.payload, payload)
    }

    pub fn into_payload(self) -> Tag {
        self.payload
    }
}

/// Splits on the first colon. No colon means no namespace.
pub fn split_identifier(identifier: &str) -> (Option<&str>, &str) {
    match identifier.split_once(':') {
        Some((namespace, base_name)) => (Some(namespace), base_name),
        None => (None, identifier),
    }
}

impl fmt::Display for EntityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity[{}, {}, {}, {}]",
            self.namespaced_name, self.x, self.y, self.z
        )
    }
}
