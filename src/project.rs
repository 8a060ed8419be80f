//! Project folder conventions.
//!
//! A project folder holds its deployable files in `public/`; the cleaned mirror
//! is written next to it as `cleaned/`.

use crate::{
    config::Config,
    copier::{CopyStats, TreeCopier},
    error::{Error, Result},
};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the subdirectory that is copied.
pub const PUBLIC_DIR: &str = "public";

/// Name of the subdirectory the cleaned copy is written to.
pub const CLEANED_DIR: &str = "cleaned";

/// Input and output roots derived from a project folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    /// The selected project folder
    pub project_dir: PathBuf,

    /// `<project>/public`
    pub input_dir: PathBuf,

    /// `<project>/cleaned`
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    /// Validates a selected project folder and derives its roots.
    ///
    /// # Errors
    ///
    /// - [`Error::NotADirectory`] if `path` is missing or not a directory
    /// - [`Error::MissingPublicDir`] if it has no `public` subdirectory
    pub fn from_project_dir(path: impl Into<PathBuf>) -> Result<Self> {
        let project_dir = path.into();

        if !project_dir.is_dir() {
            return Err(Error::NotADirectory { path: project_dir });
        }

        let input_dir = project_dir.join(PUBLIC_DIR);
        if !input_dir.is_dir() {
            return Err(Error::MissingPublicDir { path: project_dir });
        }

        let output_dir = project_dir.join(CLEANED_DIR);

        Ok(Self {
            project_dir,
            input_dir,
            output_dir,
        })
    }

    /// Replaces the derived output directory.
    #[must_use]
    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    /// Builds the copy configuration for this layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory is inside `public/`.
    pub fn config(&self, dry_run: bool) -> Result<Config> {
        Config::builder()
            .input_dir(&self.input_dir)
            .output_dir(&self.output_dir)
            .dry_run(dry_run)
            .build()
    }
}

/// Cleans the project at `path`: mirrors `path/public` into `path/cleaned`.
///
/// # Errors
///
/// Returns an error if the folder is not a valid project or any file fails to copy.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> web_cleaner::Result<()> {
/// let stats = web_cleaner::clean_project("./my-site")?;
/// println!("Cleaned project has been saved to: {}", stats.output_directory);
/// # Ok(())
/// # }
/// ```
pub fn clean_project(path: impl AsRef<Path>) -> Result<CopyStats> {
    let layout = ProjectLayout::from_project_dir(path.as_ref())?;
    info!("Cleaning project {}", layout.project_dir.display());
    TreeCopier::new(layout.config(false)?)?.copy_tree()
}
