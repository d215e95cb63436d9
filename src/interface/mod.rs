//! Per-version format descriptors.
//!
//! Every version of a storage format is described by an [`Interface`]: the features its
//! chunk layout has. A version is declared as its parent plus the handful of features
//! that changed, and [`derive`] folds the two into a complete feature map up front, so a
//! lookup never has to walk back through ancestors.

pub mod definitions;

use once_cell::sync::OnceCell;
use quarry_common::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use definitions::Definitions;

/// Value of a single capability flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// The version lacks the feature entirely.
    Absent,
    Flag(bool),
    Int(i64),
    Text(String),
    Choices(Vec<String>),
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Int(value)
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<bool> for FeatureValue {
    fn from(value: bool) -> Self {
        FeatureValue::Flag(value)
    }
}

pub type Features = BTreeMap<String, FeatureValue>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    family: String,
    version: i32,
    parent: Option<i32>,
    features: Features,
}

impl Interface {
    /// A version with no parent; `features` must already be complete.
    pub fn root(family: impl Into<String>, version: i32, features: Features) -> Self {
        Interface {
            family: family.into(),
            version,
            parent: None,
            features,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn parent(&self) -> Option<i32> {
        self.parent
    }

    pub fn features(&self) -> &Features {
        &self.features
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features.get(name)
    }
}

/// Builds `version` as a child of `parent`: the parent's full feature map with `delta`
/// laid over it. `parent` is not modified.
pub fn derive(parent: &Interface, version: i32, delta: &Features) -> Interface {
    let mut features = parent.features.clone();
    for (name, value) in delta {
        features.insert(name.clone(), value.clone());
    }
    Interface {
        family: parent.family.clone(),
        version,
        parent: Some(parent.version),
        features,
    }
}

/// Every defined version of one format family.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceChain {
    family: String,
    versions: BTreeMap<i32, Interface>,
}

impl InterfaceChain {
    pub fn new(root: Interface) -> Self {
        InterfaceChain {
            family: root.family.clone(),
            versions: BTreeMap::from([(root.version, root)]),
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Adds `version` on top of an already defined `parent`.
    pub fn extend(&mut self, version: i32, parent: i32, delta: &Features) -> Result<&Interface> {
        if self.versions.contains_key(&version) {
            return Err(QuarryError::format(format!(
                "{} version {} is defined twice",
                self.family, version
            )));
        }
        let parent = self.get(parent)?;
        let child = derive(parent, version, delta);
        Ok(self.versions.entry(version).or_insert(child))
    }

    /// The interface defined for exactly `version`.
    pub fn get(&self, version: i32) -> Result<&Interface> {
        self.versions
            .get(&version)
            .ok_or_else(|| self.unknown(version))
    }

    /// The newest interface at or below `version`, which is what governs data written
    /// by a version with no definition of its own.
    pub fn for_version(&self, version: i32) -> Result<&Interface> {
        self.versions
            .range(..=version)
            .next_back()
            .map(|(_, interface)| interface)
            .ok_or_else(|| self.unknown(version))
    }

    /// `version` followed by its parent, grandparent, and so on up to the root.
    pub fn ancestry(&self, version: i32) -> Result<Vec<i32>> {
        let mut chain = Vec::new();
        let mut current = Some(version);
        while let Some(v) = current {
            chain.push(v);
            current = self.get(v)?.parent;
        }
        Ok(chain)
    }

    pub fn latest(&self) -> Option<&Interface> {
        self.versions.values().next_back()
    }

    pub fn versions(&self) -> impl Iterator<Item = &Interface> {
        self.versions.values()
    }

    fn unknown(&self, version: i32) -> QuarryError {
        QuarryError::UnknownInterface {
            family: self.family.clone(),
            version,
        }
    }
}

/// Interface chains for every known format family.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceRegistry {
    chains: BTreeMap<String, InterfaceChain>,
}

impl InterfaceRegistry {
    pub fn from_definitions(definitions: &Definitions) -> Result<Self> {
        let mut chains = BTreeMap::new();
        for (family, definition) in &definitions.families {
            chains.insert(family.clone(), definition.build(family)?);
        }
        Ok(InterfaceRegistry { chains })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_definitions(&Definitions::from_json(json)?)
    }

    pub fn chain(&self, family: &str) -> Option<&InterfaceChain> {
        self.chains.get(family)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn get(&self, family: &str, version: i32) -> Result<&Interface> {
        self.chain_or_err(family, version)?.get(version)
    }

    pub fn for_version(&self, family: &str, version: i32) -> Result<&Interface> {
        self.chain_or_err(family, version)?.for_version(version)
    }

    fn chain_or_err(&self, family: &str, version: i32) -> Result<&InterfaceChain> {
        self.chain(family).ok_or_else(|| QuarryError::UnknownInterface {
            family: family.to_string(),
            version,
        })
    }
}

static DEFAULT_INTERFACES: OnceCell<InterfaceRegistry> = OnceCell::new();

/// Built-in interface chains, parsed from the bundled definitions on first use.
pub fn default_interfaces() -> Result<&'static InterfaceRegistry> {
    DEFAULT_INTERFACES.get_or_try_init(|| InterfaceRegistry::from_json(definitions::BUILTIN))
}
