//! Native command-line front-end.
//!
//! Resolves the model variant for a feeder type and a set of measured
//! dimensions, simulates the scene load against an in-memory loader, and
//! prints everything a renderer would need as JSON.
//!
//! ```bash
//! feeder-native linear A=80 B=120 C=75 D=150
//! RUST_LOG=debug feeder-native --rules my_rules.toml bowl A=300
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use feeder_core::{Focus, ReferencePlacement, ResolvedVariant, RuleTable};
use feeder_preview::{LoadOutcome, Preview, StaticLoader};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "feeder-native")]
#[command(version, about = "Resolve a feeder model variant from measured dimensions", long_about = None)]
struct Cli {
    /// Replacement rule table (TOML); the embedded table is used otherwise
    #[arg(long, env = "FEEDER_RULES")]
    rules: Option<PathBuf>,

    /// Viewport aspect ratio for the camera matrices
    #[arg(long, default_value_t = 4.0 / 3.0)]
    aspect: f64,

    /// Feeder type, e.g. bowl or linear
    feeder_type: String,

    /// Dimensions as NAME=VALUE pairs, in millimetres
    #[arg(value_parser = parse_pair)]
    dimensions: Vec<(String, String)>,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing dimension name in {s:?}"));
    }
    Ok((name.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct NodeReport {
    name: String,
    scale: [f64; 3],
}

#[derive(Serialize)]
struct SceneReport {
    asset: String,
    root_scale: [f64; 3],
    nodes: Vec<NodeReport>,
    unmatched: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    feeder_type: &'a str,
    rejected: Vec<String>,
    variant: &'a ResolvedVariant,
    scene: Option<SceneReport>,
    reference: ReferencePlacement,
    focus: Option<Focus>,
    view_matrix: Option<[[f64; 4]; 4]>,
    projection_matrix: Option<[[f64; 4]; 4]>,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let loaded;
    let table: &RuleTable = match &cli.rules {
        Some(path) => {
            loaded = RuleTable::load(path)
                .with_context(|| format!("loading rules from {}", path.display()))?
                .table;
            &loaded
        }
        None => RuleTable::builtin(),
    };

    let mut preview = Preview::new(table, cli.feeder_type.as_str());
    let mut rejected = Vec::new();
    for (name, value) in &cli.dimensions {
        if let Err(violation) = preview.set_dimension(name, value) {
            log::warn!("[input] {violation}");
            rejected.push(violation.to_string());
        }
    }
    log::info!(
        "[input] {} with {} dimensions -> {}",
        preview.feeder_type(),
        preview.dimensions().len(),
        preview.desired().asset_file
    );

    let loader = StaticLoader::from_rule_table(table);
    let unmatched = match pollster::block_on(preview.load_with(&loader)) {
        Ok(LoadOutcome::Applied { unmatched }) => unmatched,
        Ok(LoadOutcome::Stale) => Vec::new(),
        Err(e) => {
            log::error!("[scene] load error: {e:?}");
            Vec::new()
        }
    };
    let scene = preview.scene().map(|scene| SceneReport {
        asset: scene.asset().to_string(),
        root_scale: scene.root_scale().to_array(),
        nodes: scene
            .nodes()
            .iter()
            .map(|n| NodeReport {
                name: n.name.clone(),
                scale: n.scale.to_array(),
            })
            .collect(),
        unmatched,
    });

    let camera = preview.camera(cli.aspect);
    let report = Report {
        feeder_type: preview.feeder_type(),
        rejected,
        variant: preview.desired(),
        scene,
        reference: preview.reference(),
        focus: preview.focus(),
        view_matrix: camera.as_ref().map(|c| c.view_matrix().to_cols_array_2d()),
        projection_matrix: camera.as_ref().map(|c| c.projection_matrix().to_cols_array_2d()),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
