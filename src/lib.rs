//! Scene-side boundary of the feeder preview.
//!
//! The pure engine lives in `feeder-core`; this crate owns what surrounds it:
//! loaded scene graphs indexed by node name, the asynchronous loader seam,
//! and the [`Preview`] state that recomputes the desired variant whenever the
//! operator's inputs change and drops load completions that arrive late.

pub mod loader;
pub mod preview;
pub mod scene;

pub use feeder_core as engine;
pub use loader::{fetch, LoadTicket, LoadTracker, SceneLoader, StaticLoader};
pub use preview::{LoadOutcome, Preview};
pub use scene::{SceneGraph, SceneNode};
