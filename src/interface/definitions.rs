use crate::interface::{Features, Interface, InterfaceChain};
use quarry_common::Result;
use serde::Deserialize;
use std::collections::BTreeMap;

/// The definitions shipped with the crate.
pub const BUILTIN: &str = include_str!("definitions.json");

/// Interface definitions document: one entry per format family.
#[derive(Debug, Clone, Deserialize)]
pub struct Definitions {
    pub families: BTreeMap<String, FamilyDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyDefinition {
    pub root: RootDefinition,
    /// Children, each listed after its parent.
    #[serde(default)]
    pub versions: Vec<VersionDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RootDefinition {
    pub version: i32,
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionDefinition {
    pub version: i32,
    pub parent: i32,
    #[serde(default)]
    pub delta: Features,
}

impl Definitions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl FamilyDefinition {
    pub fn build(&self, family: &str) -> Result<InterfaceChain> {
        let root = Interface::root(family, self.root.version, self.root.features.clone());
        let mut chain = InterfaceChain::new(root);
        for child in &self.versions {
            chain.extend(child.version, child.parent, &child.delta)?;
        }
        Ok(chain)
    }
}
