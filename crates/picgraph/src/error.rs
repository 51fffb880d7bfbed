use thiserror::Error;

/// Top-level errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Listing(#[from] picgraph_listing::ListingError),
    #[error("internal analysis error: {0}")]
    Cfg(#[from] picgraph_cfg::CfgError),
    #[error(transparent)]
    Emit(#[from] picgraph_emit::EmitError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("analysis not run: call analyze before {0}")]
    NotAnalyzed(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
