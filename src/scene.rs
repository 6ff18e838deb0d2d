//! Loaded scene graphs with a name→node index.

use feeder_core::ResolvedVariant;
use fnv::FnvHashMap;
use glam::DVec3;

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub scale: DVec3,
}

/// A loaded asset: its named nodes and the root transform scale.
///
/// The name index is built once on construction. When an asset repeats a
/// name, lookups resolve to the first node carrying it.
#[derive(Clone, Debug)]
pub struct SceneGraph {
    asset: String,
    root_scale: DVec3,
    nodes: Vec<SceneNode>,
    index: FnvHashMap<String, usize>,
}

impl SceneGraph {
    pub fn new<S: Into<String>>(
        asset: impl Into<String>,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        let nodes: Vec<SceneNode> = names
            .into_iter()
            .map(|name| SceneNode {
                name: name.into(),
                scale: DVec3::ONE,
            })
            .collect();
        let mut index = FnvHashMap::default();
        for (i, node) in nodes.iter().enumerate() {
            index.entry(node.name.clone()).or_insert(i);
        }
        Self {
            asset: asset.into(),
            root_scale: DVec3::ONE,
            nodes,
            index,
        }
    }

    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn root_scale(&self) -> DVec3 {
        self.root_scale
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        let i = *self.index.get(name)?;
        Some(&mut self.nodes[i])
    }

    /// Set the root scale and every matched part scale from `variant`.
    ///
    /// Returns the part names with no node in this scene; each one is logged
    /// as a warning and otherwise ignored.
    pub fn apply(&mut self, variant: &ResolvedVariant) -> Vec<String> {
        self.root_scale = variant.root_scale;
        let mut unmatched = Vec::new();
        for part in variant.part_scales.iter() {
            match self.node_mut(&part.part) {
                Some(node) => node.scale = part.scale,
                None => {
                    log::warn!("[scene] {}: no node named {:?}", self.asset, part.part);
                    unmatched.push(part.part.clone());
                }
            }
        }
        unmatched
    }
}
