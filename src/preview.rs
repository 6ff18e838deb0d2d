//! Caller-owned preview state around the pure engine.

use anyhow::Context;
use feeder_core::{
    check_dimension, compute_focus, reference_placement, resolve, Camera, Dimensions, Focus,
    LimitViolation, ReferencePlacement, ResolvedVariant, RuleTable,
};

use crate::loader::{fetch, LoadTicket, LoadTracker, SceneLoader};
use crate::scene::SceneGraph;

/// What happened to a finished load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The scene now shows the desired variant. Lists part names the asset lacks.
    Applied { unmatched: Vec<String> },
    /// Inputs changed while loading; the result was dropped.
    Stale,
}

/// Holds the current inputs, the variant they resolve to, and the scene
/// last applied. Every input change recomputes the desired variant.
pub struct Preview<'t> {
    table: &'t RuleTable,
    feeder_type: String,
    dimensions: Dimensions,
    desired: ResolvedVariant,
    scene: Option<SceneGraph>,
    tracker: LoadTracker,
}

impl<'t> Preview<'t> {
    pub fn new(table: &'t RuleTable, feeder_type: impl Into<String>) -> Self {
        Self::with_dimensions(table, feeder_type, Dimensions::new())
    }

    pub fn with_dimensions(
        table: &'t RuleTable,
        feeder_type: impl Into<String>,
        dimensions: Dimensions,
    ) -> Self {
        let feeder_type = feeder_type.into();
        let desired = resolve(table, &feeder_type, &dimensions);
        Self {
            table,
            feeder_type,
            dimensions,
            desired,
            scene: None,
            tracker: LoadTracker::default(),
        }
    }

    pub fn feeder_type(&self) -> &str {
        &self.feeder_type
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn desired(&self) -> &ResolvedVariant {
        &self.desired
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.scene.as_ref()
    }

    pub fn pending_loads(&self) -> usize {
        self.tracker.pending()
    }

    /// Validate and store one operator entry. Returns whether the desired
    /// variant changed.
    pub fn set_dimension(&mut self, name: &str, raw: &str) -> Result<bool, LimitViolation> {
        check_dimension(&self.feeder_type, name, raw)?;
        let next = self.dimensions.updated(name, raw);
        Ok(self.set_dimensions(next))
    }

    /// Replace the whole snapshot without limit checks (e.g. imported data).
    pub fn set_dimensions(&mut self, dimensions: Dimensions) -> bool {
        self.dimensions = dimensions;
        self.recompute()
    }

    pub fn set_feeder_type(&mut self, feeder_type: impl Into<String>) -> bool {
        self.feeder_type = feeder_type.into();
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        let next = resolve(self.table, &self.feeder_type, &self.dimensions);
        if next == self.desired {
            return false;
        }
        log::debug!(
            "[preview] {} -> {} ({} parts)",
            self.feeder_type,
            next.asset_file,
            next.part_scales.len()
        );
        self.desired = next;
        true
    }

    /// Re-apply the desired scales to the shown scene when only scales
    /// changed. Returns `None` if a different asset has to be loaded first.
    pub fn refresh_scene(&mut self) -> Option<Vec<String>> {
        let scene = self.scene.as_mut()?;
        if scene.asset() != self.desired.asset_file {
            return None;
        }
        Some(scene.apply(&self.desired))
    }

    pub fn request_load(&mut self) -> LoadTicket {
        self.tracker.issue(self.desired.clone())
    }

    /// Apply a finished load if its ticket still matches the desired variant.
    ///
    /// Stale completions are dropped even when they failed; a failure of
    /// a current load is returned as an error.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        result: anyhow::Result<SceneGraph>,
    ) -> anyhow::Result<LoadOutcome> {
        if !self.tracker.settle(ticket, &self.desired) {
            log::debug!(
                "[preview] dropping stale load #{} ({})",
                ticket.seq,
                ticket.variant.asset_file
            );
            return Ok(LoadOutcome::Stale);
        }
        let mut scene =
            result.with_context(|| format!("loading {}", ticket.variant.asset_file))?;
        let unmatched = scene.apply(&ticket.variant);
        log::info!(
            "[preview] applied {} (load #{}, {} unmatched)",
            scene.asset(),
            ticket.seq,
            unmatched.len()
        );
        self.scene = Some(scene);
        Ok(LoadOutcome::Applied { unmatched })
    }

    /// Request, await and complete one load in sequence.
    pub async fn load_with<L: SceneLoader>(&mut self, loader: &L) -> anyhow::Result<LoadOutcome> {
        let ticket = self.request_load();
        let (ticket, result) = fetch(loader, ticket).await;
        self.complete_load(&ticket, result)
    }

    pub fn reference(&self) -> ReferencePlacement {
        reference_placement(&self.feeder_type, &self.dimensions)
    }

    pub fn focus(&self) -> Option<Focus> {
        compute_focus(&self.feeder_type, &self.dimensions)
    }

    pub fn camera(&self, aspect: f64) -> Option<Camera> {
        self.focus().map(|f| Camera::from_focus(f, aspect))
    }
}
