//! Asynchronous scene loading with cancellation by staleness.
//!
//! Loads are never aborted. Each request carries a [`LoadTicket`] naming the
//! variant it was issued for, and a completion is only applied while that
//! variant is still the desired one.

use std::future::Future;

use anyhow::anyhow;
use feeder_core::{default_model_path, ResolvedVariant, RuleTable};
use fnv::FnvHashMap;
use smallvec::SmallVec;

use crate::scene::SceneGraph;

/// Produces a scene graph for an asset path, once per call.
pub trait SceneLoader {
    fn load(&self, asset: &str) -> impl Future<Output = anyhow::Result<SceneGraph>>;
}

/// In-memory loader keyed by asset path.
#[derive(Clone, Debug, Default)]
pub struct StaticLoader {
    scenes: FnvHashMap<String, Vec<String>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scene<S: Into<String>>(
        mut self,
        asset: impl Into<String>,
        nodes: impl IntoIterator<Item = S>,
    ) -> Self {
        self.scenes
            .insert(asset.into(), nodes.into_iter().map(Into::into).collect());
        self
    }

    /// One scene per rule asset in `table`, holding exactly the parts its
    /// rule references, plus an empty fallback scene per feeder type.
    pub fn from_rule_table(table: &RuleTable) -> Self {
        let mut loader = Self::new();
        for feeder in table.feeders() {
            loader = loader.with_scene(
                default_model_path(&feeder.feeder_type),
                std::iter::empty::<String>(),
            );
            for rule in &feeder.rules {
                let asset = format!("{}{}", feeder.folder(), rule.file);
                let nodes = rule.parts.iter().map(|p| p.target.clone());
                loader = loader.with_scene(asset, nodes);
            }
        }
        loader
    }
}

impl SceneLoader for StaticLoader {
    fn load(&self, asset: &str) -> impl Future<Output = anyhow::Result<SceneGraph>> {
        let result = self
            .scenes
            .get(asset)
            .map(|nodes| SceneGraph::new(asset, nodes.iter().cloned()))
            .ok_or_else(|| anyhow!("no scene for asset {asset}"));
        async move { result }
    }
}

/// Identity of one load request.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadTicket {
    pub seq: u64,
    pub variant: ResolvedVariant,
}

/// Issues tickets and decides which completions are still wanted.
#[derive(Debug, Default)]
pub struct LoadTracker {
    next_seq: u64,
    pending: SmallVec<[u64; 4]>,
}

impl LoadTracker {
    pub fn issue(&mut self, variant: ResolvedVariant) -> LoadTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(seq);
        LoadTicket { seq, variant }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Retire `ticket` and report whether its result should be applied.
    /// A ticket settles at most once; unknown or repeated tickets are stale.
    pub fn settle(&mut self, ticket: &LoadTicket, desired: &ResolvedVariant) -> bool {
        let Some(pos) = self.pending.iter().position(|&s| s == ticket.seq) else {
            return false;
        };
        self.pending.remove(pos);
        ticket.variant == *desired
    }
}

/// Run the load for `ticket` without holding on to the caller's state.
pub async fn fetch<L: SceneLoader>(
    loader: &L,
    ticket: LoadTicket,
) -> (LoadTicket, anyhow::Result<SceneGraph>) {
    let result = loader.load(&ticket.variant.asset_file).await;
    (ticket, result)
}
