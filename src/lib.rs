//! # web-cleaner
//!
//! Copies a web project's source tree into a mirror with comments and
//! `console.log` calls stripped from its script, markup and stylesheet files.
//!
//! ## Quick Start
//!
//! ```no_run
//! use web_cleaner::{Config, TreeCopier};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .input_dir("./site/public")
//!     .output_dir("./site/cleaned")
//!     .build()?;
//!
//! let stats = TreeCopier::new(config)?.copy_tree()?;
//! stats.print_summary();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Cleaner**: pure text transform per [`FileKind`]
//! 2. **Copier**: walks the input tree and cleans or copies each file
//! 3. **Project**: maps a project folder to its `public` and `cleaned` roots

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod cleaner;
mod config;
mod copier;
mod error;
mod file;
mod project;

pub use cleaner::{clean, CleanRuleSet, Rule};
pub use config::{Config, ConfigBuilder};
pub use copier::{CopyStats, TreeCopier};
pub use error::{Error, Result};
pub use file::{CopyTask, FileKind};
pub use project::{clean_project, ProjectLayout, CLEANED_DIR, PUBLIC_DIR};

/// Mirrors `config.input_dir` into `config.output_dir`.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - Any file cannot be read, cleaned or written
pub fn run(config: Config) -> Result<CopyStats> {
    TreeCopier::new(config)?.copy_tree()
}
