//! Render options and output location

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::decorate::FormProfile;
use crate::style::PageGeometry;

/// Per-render settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub form: FormProfile,
    pub geometry: PageGeometry,
}

impl RenderOptions {
    pub fn trec() -> Self {
        Self::default()
    }

    pub fn binsr() -> Self {
        Self {
            form: FormProfile::binsr(),
            ..Self::default()
        }
    }
}

/// Where generated artifacts are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
}

impl OutputConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Fresh, collision-free artifact path: `{prefix}_{uuid}.pdf`
    pub fn allocate(&self, prefix: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.pdf", prefix, Uuid::new_v4().simple()))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new("generated_files")
    }
}
