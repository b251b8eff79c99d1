use glam::Quat;
use rustc_hash::FxHashMap;

use crate::errors::{MarrowError, Result};

/// One entry of a skeleton mapping: animate the named target bone from the
/// named source bone, twisted by a corrective rotation.
///
/// The twist reconciles differing bone-axis conventions between the two
/// rigs; identity means the source orientation carries straight over.
#[derive(Debug, Clone)]
pub struct BoneMapping {
    pub target: String,
    pub source: String,
    pub twist: Quat,
}

impl BoneMapping {
    #[must_use]
    pub fn new(target: &str, source: &str) -> Self {
        Self::with_twist(target, source, Quat::IDENTITY)
    }

    #[must_use]
    pub fn with_twist(target: &str, source: &str, twist: Quat) -> Self {
        Self {
            target: target.to_string(),
            source: source.to_string(),
            twist,
        }
    }
}

/// The data required to map bone transforms from one rig to another: a
/// bijective partial mapping between target and source bone names.
///
/// At most one entry per target name and one per source name, so the
/// mapping can be inverted losslessly.
#[derive(Debug, Clone, Default)]
pub struct SkeletonMapping {
    entries: Vec<BoneMapping>,
    by_target: FxHashMap<String, usize>,
    by_source: FxHashMap<String, usize>,
}

impl SkeletonMapping {
    /// An empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping from the named target bone to the named source bone
    /// with an identity twist.
    pub fn map(&mut self, target: &str, source: &str) -> Result<()> {
        self.add(BoneMapping::new(target, source))
    }

    /// Adds a mapping from the named target bone to the named source bone,
    /// applying the given twist to the retargeted rotation.
    pub fn map_with_twist(&mut self, target: &str, source: &str, twist: Quat) -> Result<()> {
        self.add(BoneMapping::with_twist(target, source, twist))
    }

    /// Adds a prepared entry, rejecting a reused target or source name.
    pub fn add(&mut self, mapping: BoneMapping) -> Result<()> {
        if self.by_target.contains_key(&mapping.target) {
            return Err(MarrowError::DuplicateMapping {
                side: "target",
                name: mapping.target,
            });
        }
        if self.by_source.contains_key(&mapping.source) {
            return Err(MarrowError::DuplicateMapping {
                side: "source",
                name: mapping.source,
            });
        }

        let index = self.entries.len();
        self.by_target.insert(mapping.target.clone(), index);
        self.by_source.insert(mapping.source.clone(), index);
        self.entries.push(mapping);
        Ok(())
    }

    /// The entry for the named target bone, if any.
    #[must_use]
    pub fn get(&self, target_name: &str) -> Option<&BoneMapping> {
        self.by_target
            .get(target_name)
            .map(|&index| &self.entries[index])
    }

    /// The entry for the named source bone, if any.
    #[must_use]
    pub fn get_for_source(&self, source_name: &str) -> Option<&BoneMapping> {
        self.by_source
            .get(source_name)
            .map(|&index| &self.entries[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[BoneMapping] {
        &self.entries
    }

    /// The inverse mapping: target and source sides swapped, twists inverted.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let mut result = Self::new();
        for entry in &self.entries {
            let inverted =
                BoneMapping::with_twist(&entry.source, &entry.target, entry.twist.inverse());
            result
                .add(inverted)
                .expect("inverse of a bijective mapping cannot collide");
        }
        result
    }
}
