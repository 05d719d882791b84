//! Ribbed Engine - parameters, sculptures and regeneration
//!
//! The engine coordinates ribbed-core: a [`Sculpture`] declares its
//! parameters and builds a scene from them, and a [`Pipeline`] rebuilds
//! that scene whenever the parameters change, publishing each complete
//! result atomically.
//!
//! ## Example
//!
//! ```ignore
//! use ribbed_engine::{Params, Pipeline};
//!
//! let mut pipeline = Pipeline::by_name("arch")?;
//! pipeline.update_defaults()?;
//!
//! let scene = pipeline.current().output;
//! println!("{} instances", scene.instances.len());
//!
//! // Only changed parameters trigger a rebuild
//! pipeline.update(&Params::new().with("rib_bend", 4.0))?;
//! ```

pub mod error;
pub mod params;
pub mod pipeline;
pub mod scene;
pub mod sculptures;

#[cfg(feature = "file-watcher")]
pub mod watch;

use anyhow::Context;
use std::path::Path;

pub use error::{Error, GeometryContext, Result};
pub use params::{ParamDecl, ParamKind, ParamRegistry, ParamValue, Params};
pub use pipeline::{Pipeline, Published, SceneHandle, UpdateOutcome};
pub use scene::{Light, SceneBuilder, SceneOutput, SceneSummary};
pub use sculptures::Sculpture;

// Re-export commonly used types from ribbed-core
pub use ribbed_core::color::Color;
pub use ribbed_core::scene::Instance;

#[cfg(feature = "file-watcher")]
pub use watch::{ParamWatcher, WatchEvent};

/// Read a JSON parameter file
pub fn load_params(path: &Path) -> anyhow::Result<Params> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    let params = serde_json::from_str(&text)
        .with_context(|| format!("Invalid parameter file {}", path.display()))?;
    tracing::debug!("Loaded parameters from {}", path.display());
    Ok(params)
}
