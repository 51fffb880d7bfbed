//! Graph export for recovered control flow.
//!
//! Turns a [`picgraph_cfg::CfgResult`] into Graphviz DOT graphs (one per
//! function plus the program-wide call graph) and prints annotated listings.

mod annotate;
mod config;
mod dot;
mod project;

pub use annotate::*;
pub use config::*;
pub use dot::*;
pub use project::*;

use std::path::PathBuf;

use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, EmitError>;
