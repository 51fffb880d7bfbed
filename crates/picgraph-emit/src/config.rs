//! Export configuration.

use std::path::{Path, PathBuf};

/// Default output directory for graph files.
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Graph export configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportConfig {
    /// Directory receiving `<graph>.dot` files.
    pub output_dir: PathBuf,
    /// Prefix of every function display name.
    pub prefix: String,
    /// Name of the program-wide call graph.
    pub call_graph_name: String,
    /// Colour of the taken edge of a conditional branch.
    pub taken_color: String,
    /// Colour of the fallthrough edge of a conditional branch.
    pub fallthrough_color: String,
    pub font_name: String,
    pub font_size: u32,
    /// Node width in inches.
    pub node_width: u32,
    /// Render threads (0 = auto).
    pub jobs: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: "sub_".to_string(),
            call_graph_name: "Functions".to_string(),
            taken_color: "green".to_string(),
            fallthrough_color: "red".to_string(),
            font_name: "Monospace".to_string(),
            font_size: 10,
            node_width: 5,
            jobs: 0,
        }
    }
}

impl ExportConfig {
    /// Set output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set number of render threads (0 = auto).
    #[must_use]
    pub const fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// File stem for a graph called `name`.
    ///
    /// Path separators and NUL become `_`, so the file always lands directly
    /// inside the output directory.
    pub fn file_stem(name: &str) -> String {
        let stem: String = name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect();
        if stem.is_empty() { "_".to_string() } else { stem }
    }

    /// Path of the file holding the graph called `name`.
    pub fn graph_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.dot", Self::file_stem(name)))
    }
}
