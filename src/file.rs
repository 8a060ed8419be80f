use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Classification of a file by extension.
///
/// Decides which cleaning rules, if any, apply to the file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// JavaScript (`.js`)
    Script,
    /// HTML (`.html`)
    Markup,
    /// CSS (`.css`)
    Style,
    /// Anything else, copied verbatim
    Other,
}

impl FileKind {
    /// Classifies a file name by the substring after its final `.`.
    ///
    /// The comparison ignores ASCII case. A name without any `.` is [`FileKind::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// use web_cleaner::FileKind;
    ///
    /// assert_eq!(FileKind::from_file_name("index.HTML"), FileKind::Markup);
    /// assert_eq!(FileKind::from_file_name("bundle.min.js"), FileKind::Script);
    /// assert_eq!(FileKind::from_file_name("LICENSE"), FileKind::Other);
    /// ```
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        Self::from_name_bytes(name.as_bytes())
    }

    /// Classifies a path by its final component.
    ///
    /// Works on the raw name, so names that are not valid UTF-8 still classify.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.file_name()
            .map_or(Self::Other, |name| Self::from_name_bytes(name.as_encoded_bytes()))
    }

    fn from_name_bytes(name: &[u8]) -> Self {
        let Some(dot) = name.iter().rposition(|&b| b == b'.') else {
            return Self::Other;
        };
        let extension = &name[dot + 1..];

        if extension.eq_ignore_ascii_case(b"html") {
            Self::Markup
        } else if extension.eq_ignore_ascii_case(b"js") {
            Self::Script
        } else if extension.eq_ignore_ascii_case(b"css") {
            Self::Style
        } else {
            Self::Other
        }
    }

    /// Returns true if files of this kind go through the text cleaner.
    #[must_use]
    pub const fn is_cleanable(self) -> bool {
        !matches!(self, Self::Other)
    }
}

/// One file of the walk: where it comes from, where it goes, and how it is treated.
#[derive(Debug, Clone)]
pub struct CopyTask {
    /// Absolute source path under the input root
    pub source: PathBuf,

    /// Mirrored path under the output root
    pub destination: PathBuf,

    /// Path relative to both roots
    pub relative_path: PathBuf,

    /// Classification of the source file
    pub kind: FileKind,
}

impl CopyTask {
    /// Builds the task for `source`, mirroring its position under `input_root` into `output_root`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `source` is not located under `input_root`.
    pub fn new(source: &Path, input_root: &Path, output_root: &Path) -> Result<Self> {
        let relative_path = source
            .strip_prefix(input_root)
            .map(Path::to_path_buf)
            .map_err(|_| {
                Error::config(format!(
                    "'{}' is not inside input root '{}'",
                    source.display(),
                    input_root.display()
                ))
            })?;

        Ok(Self {
            source: source.to_path_buf(),
            destination: output_root.join(&relative_path),
            kind: FileKind::from_path(source),
            relative_path,
        })
    }
}
