use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::errors::{MarrowError, Result};
use crate::transform::Transform;

/// A named node in a skeleton hierarchy.
#[derive(Debug, Clone)]
pub struct Bone {
    name: String,
    parent: Option<usize>,
    bind: Transform,
}

impl Bone {
    #[must_use]
    pub fn new(name: &str, parent: Option<usize>, bind: Transform) -> Self {
        Self {
            name: name.to_string(),
            parent,
            bind,
        }
    }

    /// A root bone in bind pose.
    #[must_use]
    pub fn root(name: &str) -> Self {
        Self::new(name, None, Transform::IDENTITY)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index of the parent bone, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// The bind-pose local transform.
    #[must_use]
    pub fn bind_transform(&self) -> Transform {
        self.bind
    }
}

/// An ordered list of named bones with parent links and bind transforms.
///
/// Bone order is the index space shared by tracks and poses. Parent indices
/// may point forward or backward; the only structural requirements are that
/// names are unique and non-empty, every parent exists, and the parent graph
/// is acyclic. A skeleton may have several root bones.
///
/// Immutable after construction; share via `Arc` for pose work.
#[derive(Debug, Clone)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    name_index: FxHashMap<String, usize>,
    children: Vec<SmallVec<[usize; 4]>>,
    roots: Vec<usize>,
    pre_order: Vec<usize>,
}

impl Skeleton {
    /// Validates the bone list and builds the lookup/traversal tables.
    pub fn new(name: &str, bones: Vec<Bone>) -> Result<Self> {
        let count = bones.len();

        let mut name_index = FxHashMap::default();
        for (index, bone) in bones.iter().enumerate() {
            if bone.name.is_empty() {
                return Err(MarrowError::EmptyBoneName(index));
            }
            if name_index.insert(bone.name.clone(), index).is_some() {
                return Err(MarrowError::DuplicateBoneName(bone.name.clone()));
            }
        }

        let mut children: Vec<SmallVec<[usize; 4]>> = vec![SmallVec::new(); count];
        let mut roots = Vec::new();
        for (index, bone) in bones.iter().enumerate() {
            match bone.parent {
                None => roots.push(index),
                Some(parent) => {
                    if parent >= count {
                        return Err(MarrowError::InvalidParent {
                            bone: index,
                            parent,
                        });
                    }
                    children[parent].push(index);
                }
            }
        }

        // Depth-first from the roots; any bone left unvisited sits on a cycle
        // (a self-parented bone included).
        let mut pre_order = Vec::with_capacity(count);
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            pre_order.push(index);
            for &child in children[index].iter().rev() {
                stack.push(child);
            }
        }
        if pre_order.len() != count {
            let mut visited = vec![false; count];
            for &index in &pre_order {
                visited[index] = true;
            }
            let culprit = visited.iter().position(|&v| !v).unwrap_or(0);
            return Err(MarrowError::CyclicHierarchy(culprit));
        }

        Ok(Self {
            name: name.to_string(),
            bones,
            name_index,
            children,
            roots,
            pre_order,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[must_use]
    pub fn bone(&self, index: usize) -> &Bone {
        &self.bones[index]
    }

    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    /// Finds the index of the named bone, if present.
    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    #[must_use]
    pub fn parent(&self, index: usize) -> Option<usize> {
        self.bones[index].parent
    }

    #[must_use]
    pub fn children(&self, index: usize) -> &[usize] {
        &self.children[index]
    }

    #[must_use]
    pub fn bind_transform(&self, index: usize) -> Transform {
        self.bones[index].bind
    }

    /// Indices of all root bones, in bone order.
    #[must_use]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// All bone indices in a depth-first order where children never precede
    /// their ancestors.
    #[must_use]
    pub fn pre_order_indices(&self) -> &[usize] {
        &self.pre_order
    }
}
