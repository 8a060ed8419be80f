use crate::{
    cleaner::clean,
    config::Config,
    error::{Error, Result},
    file::CopyTask,
};
use serde::Serialize;
use std::{
    fs::{self, File, FileTimes},
    io::Write,
    path::Path,
    time::{Duration, Instant},
};
use tracing::{debug, info, instrument, trace, warn};
use walkdir::WalkDir;

/// Statistics collected during a tree copy.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CopyStats {
    /// Files that went through the text cleaner
    pub cleaned_files: usize,

    /// Files copied byte-for-byte
    pub copied_files: usize,

    /// Bytes read from cleaned files
    pub bytes_before_cleaning: u64,

    /// Bytes written for cleaned files
    pub bytes_after_cleaning: u64,

    /// Output directory path
    pub output_directory: String,

    /// Whether anything was written
    pub dry_run: bool,

    /// Total execution time
    pub duration: Duration,
}

impl CopyStats {
    /// Total number of files mirrored.
    #[must_use]
    pub const fn total_files(&self) -> usize {
        self.cleaned_files + self.copied_files
    }

    /// Bytes dropped by the text cleaner.
    #[must_use]
    pub const fn bytes_removed(&self) -> u64 {
        self.bytes_before_cleaning
            .saturating_sub(self.bytes_after_cleaning)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\nFiles mirrored:   {:>8}", self.total_files());
        println!("  - cleaned:      {:>8}", self.cleaned_files);
        println!("  - copied as-is: {:>8}", self.copied_files);
        println!("Bytes removed:    {:>8}", self.bytes_removed());
        println!("Took:             {:>8.2}s", self.duration.as_secs_f64());
        if self.dry_run {
            println!("No files were written (dry run mode)");
        }
        println!();
    }
}

/// Mirrors an input tree into an output tree, cleaning script, markup and style files.
pub struct TreeCopier {
    config: Config,
}

impl TreeCopier {
    /// Creates a new copier from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Copies the whole input tree.
    ///
    /// Directories are created on demand for the files below them; the output
    /// root itself always exists afterwards, even for an empty input tree.
    ///
    /// # Errors
    ///
    /// Any failure on a single file aborts the whole run. Output written before
    /// the failure is left in place.
    #[instrument(skip(self), fields(input_dir = %self.config.input_dir.display()))]
    pub fn copy_tree(&self) -> Result<CopyStats> {
        let start_time = Instant::now();
        let input = &self.config.input_dir;
        let output = &self.config.output_dir;

        info!("Mirroring {} into {}", input.display(), output.display());

        if self.config.dry_run {
            warn!("Dry run mode enabled - skipping file writes");
        } else {
            fs::create_dir_all(output).map_err(|e| Error::io(output, e))?;
        }

        let mut stats = CopyStats {
            output_directory: output.display().to_string(),
            dry_run: self.config.dry_run,
            ..CopyStats::default()
        };

        let walker = WalkDir::new(input)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(input.as_path()).to_path_buf();
                match e.into_io_error() {
                    Some(io) => Error::io(path, io),
                    None => Error::config(format!("filesystem loop at {}", path.display())),
                }
            })?;

            // Symlinked directories are listed but not descended into.
            if entry.file_type().is_dir() || entry.path().is_dir() {
                continue;
            }

            let task = CopyTask::new(entry.path(), input, output)?;
            self.process(&task, &mut stats)?;
        }

        stats.duration = start_time.elapsed();

        info!(
            "✓ Mirrored {} files ({} cleaned, {} copied) in {:.2}s",
            stats.total_files(),
            stats.cleaned_files,
            stats.copied_files,
            stats.duration.as_secs_f64()
        );

        Ok(stats)
    }

    fn process(&self, task: &CopyTask, stats: &mut CopyStats) -> Result<()> {
        trace!("Processing file: {}", task.relative_path.display());

        if !self.config.dry_run {
            ensure_parent(&task.destination)?;
        }

        if task.kind.is_cleanable() {
            let content =
                fs::read_to_string(&task.source).map_err(|e| Error::read(&task.source, e))?;
            let cleaned = clean(&content, task.kind);

            if !self.config.dry_run {
                write_file(&task.destination, &cleaned)?;
            }

            debug!(
                "Cleaned {} ({:?}, {} -> {} bytes)",
                task.relative_path.display(),
                task.kind,
                content.len(),
                cleaned.len()
            );

            stats.cleaned_files += 1;
            stats.bytes_before_cleaning += content.len() as u64;
            stats.bytes_after_cleaning += cleaned.len() as u64;
        } else {
            if !self.config.dry_run {
                copy_with_metadata(&task.source, &task.destination)?;
            }

            debug!("Copied {}", task.relative_path.display());
            stats.copied_files += 1;
        }

        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    Ok(())
}

/// Writes `content` as the full content of `path`, replacing any existing file.
fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(path, e))?;

    Ok(())
}

/// Copies bytes and permissions, then carries over access and modification times.
fn copy_with_metadata(source: &Path, destination: &Path) -> Result<()> {
    let metadata = fs::metadata(source).map_err(|e| Error::io(source, e))?;
    fs::copy(source, destination).map_err(|e| Error::io(destination, e))?;

    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }

    // Copied permissions may be read-only, so open for writing only when needed.
    let file = File::options()
        .write(!metadata.permissions().readonly())
        .read(true)
        .open(destination)
        .map_err(|e| Error::io(destination, e))?;

    file.set_times(times)
        .map_err(|e| Error::io(destination, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use predicates::prelude::*;
    use std::time::SystemTime;

    fn copier(temp: &assert_fs::TempDir) -> TreeCopier {
        let config = Config::builder()
            .input_dir(temp.child("public").path())
            .output_dir(temp.child("cleaned").path())
            .build()
            .unwrap();
        TreeCopier::new(config).unwrap()
    }

    #[test]
    fn test_copy_tree_cleans_and_copies() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public/app.js")
            .write_str("console.log(\"hi\"); // debug\nfunction f(){ /* note */ return 1; }\nconsole.error(\"x\");\nalert(\"y\");")
            .unwrap();
        temp.child("public/index.html")
            .write_str("<!-- header -->\n<h1>Hi</h1>")
            .unwrap();
        temp.child("public/css/site.css")
            .write_str("/* reset */\nbody{margin:0}")
            .unwrap();
        temp.child("public/robots.txt")
            .write_str("// kept verbatim")
            .unwrap();

        let stats = copier(&temp).copy_tree().unwrap();

        assert_eq!(stats.cleaned_files, 3);
        assert_eq!(stats.copied_files, 1);
        assert!(stats.bytes_removed() > 0);

        temp.child("cleaned/app.js").assert(
            "\nfunction f(){  return 1; }\nconsole.error(\"x\");\nalert(\"y\");",
        );
        temp.child("cleaned/index.html").assert("\n<h1>Hi</h1>");
        temp.child("cleaned/css/site.css").assert("\nbody{margin:0}");
        temp.child("cleaned/robots.txt").assert("// kept verbatim");
    }

    #[test]
    fn test_binary_copied_byte_for_byte() {
        let temp = assert_fs::TempDir::new().unwrap();
        let bytes: Vec<u8> = (0..=255).chain([0xff, 0xd8, 0x00, 0x2f, 0x2f]).collect();
        temp.child("public/img/logo.png").write_binary(&bytes).unwrap();

        copier(&temp).copy_tree().unwrap();

        let copied = std::fs::read(temp.child("cleaned/img/logo.png").path()).unwrap();
        assert_eq!(copied, bytes);
    }

    #[test]
    fn test_copy_preserves_modified_time() {
        let temp = assert_fs::TempDir::new().unwrap();
        let source = temp.child("public/data.bin");
        source.write_binary(&[1, 2, 3]).unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(source.path())
            .unwrap()
            .set_modified(past)
            .unwrap();

        copier(&temp).copy_tree().unwrap();

        let modified = std::fs::metadata(temp.child("cleaned/data.bin").path())
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(modified, past);
    }

    #[test]
    fn test_tree_structure_mirrored() {
        let temp = assert_fs::TempDir::new().unwrap();
        let files = ["a.js", "b/c.html", "b/d/e.css", "b/d/f.json", ".hidden", "noext"];
        for file in files {
            temp.child("public").child(file).write_str("x").unwrap();
        }

        copier(&temp).copy_tree().unwrap();

        for file in files {
            temp.child("cleaned").child(file).assert(predicate::path::is_file());
        }

        let count = walkdir::WalkDir::new(temp.child("cleaned").path())
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file())
            .count();
        assert_eq!(count, files.len());
    }

    #[test]
    fn test_empty_input_creates_output_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public").create_dir_all().unwrap();

        let stats = copier(&temp).copy_tree().unwrap();

        assert_eq!(stats.total_files(), 0);
        temp.child("cleaned").assert(predicate::path::is_dir());
    }

    #[test]
    fn test_existing_output_overwritten() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public/app.js").write_str("run(); // go").unwrap();
        temp.child("public/note.txt").write_str("new").unwrap();
        temp.child("cleaned/app.js").write_str("stale content that is longer").unwrap();
        temp.child("cleaned/note.txt").write_str("old").unwrap();

        copier(&temp).copy_tree().unwrap();

        temp.child("cleaned/app.js").assert("run(); ");
        temp.child("cleaned/note.txt").assert("new");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public/app.js").write_str("console.log(1);").unwrap();
        temp.child("public/logo.png").write_binary(&[0, 1]).unwrap();

        let config = Config::builder()
            .input_dir(temp.child("public").path())
            .output_dir(temp.child("cleaned").path())
            .dry_run(true)
            .build()
            .unwrap();
        let stats = TreeCopier::new(config).unwrap().copy_tree().unwrap();

        assert!(stats.dry_run);
        assert_eq!(stats.cleaned_files, 1);
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.bytes_removed(), 15);
        temp.child("cleaned").assert(predicate::path::missing());
    }

    #[test]
    fn test_invalid_utf8_aborts() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public/bad.js").write_binary(&[0xff, 0xfe, 0x00]).unwrap();

        let err = copier(&temp).copy_tree().unwrap_err();

        assert!(matches!(err, Error::InvalidUtf8 { .. }));
    }

    #[test]
    fn test_io_failure_aborts_run() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("public/js/app.js").write_str("run();").unwrap();
        temp.child("public/z.txt").write_str("later").unwrap();
        temp.child("cleaned/js").write_str("a file where a directory must go").unwrap();

        let err = copier(&temp).copy_tree().unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("js"));
        temp.child("cleaned/z.txt").assert(predicate::path::missing());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_preserves_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = assert_fs::TempDir::new().unwrap();
        let shared = temp.child("public/shared.dat");
        let locked = temp.child("public/locked.dat");
        shared.write_binary(&[1]).unwrap();
        locked.write_binary(&[2]).unwrap();

        let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
        File::options()
            .write(true)
            .open(locked.path())
            .unwrap()
            .set_modified(past)
            .unwrap();

        std::fs::set_permissions(shared.path(), std::fs::Permissions::from_mode(0o640)).unwrap();
        std::fs::set_permissions(locked.path(), std::fs::Permissions::from_mode(0o444)).unwrap();

        copier(&temp).copy_tree().unwrap();

        let mode = |name: &str| {
            std::fs::metadata(temp.child("cleaned").child(name).path())
                .unwrap()
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode("shared.dat"), 0o640);
        assert_eq!(mode("locked.dat"), 0o444);

        let modified = std::fs::metadata(temp.child("cleaned/locked.dat").path())
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(modified, past);
    }
}
