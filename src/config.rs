use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Configuration for a single tree copy.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root of the tree to copy
    pub input_dir: PathBuf,

    /// Root of the mirrored, cleaned tree
    pub output_dir: PathBuf,

    /// Walk and clean without writing anything
    pub dry_run: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use web_cleaner::Config;
    ///
    /// let config = Config::builder()
    ///     .input_dir("./site/public")
    ///     .output_dir("./site/cleaned")
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Input directory doesn't exist or is not a directory
    /// - Output directory is located inside the input directory
    pub fn validate(&self) -> Result<()> {
        if !self.input_dir.exists() {
            return Err(Error::config(format!(
                "Input directory does not exist: {}",
                self.input_dir.display()
            )));
        }

        if !self.input_dir.is_dir() {
            return Err(Error::config(format!(
                "Input path is not a directory: {}",
                self.input_dir.display()
            )));
        }

        if is_nested(&self.input_dir, &self.output_dir) {
            return Err(Error::config(format!(
                "Output directory {} must not be inside input directory {}",
                self.output_dir.display(),
                self.input_dir.display()
            )));
        }

        Ok(())
    }
}

/// Returns true if `inner` is `outer` itself or lies below it.
///
/// Compares canonical forms where they exist so `./a/../b` style paths are caught too.
fn is_nested(outer: &Path, inner: &Path) -> bool {
    let outer = outer.canonicalize().unwrap_or_else(|_| outer.to_path_buf());
    let inner = canonicalize_lenient(inner);
    inner.starts_with(outer)
}

// The output directory may not exist yet; resolve its closest existing ancestor.
fn canonicalize_lenient(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            canonicalize_lenient(parent).join(name)
        }
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
}

impl ConfigBuilder {
    /// Sets the directory to copy from.
    #[must_use]
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }

    /// Sets the directory the cleaned tree is written to.
    #[must_use]
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Enables dry run mode (no file writes).
    #[must_use]
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory is unset or validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            input_dir: self
                .input_dir
                .ok_or_else(|| Error::config("input_dir is required"))?,
            output_dir: self
                .output_dir
                .ok_or_else(|| Error::config("output_dir is required"))?,
            dry_run: self.dry_run,
        };

        config.validate()?;
        Ok(config)
    }
}
