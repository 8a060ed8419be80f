//! Text cleaning for script, markup and stylesheet files.
//!
//! Every [`FileKind`] with rules owns an ordered [`CleanRuleSet`]. Rules are plain
//! pattern substitutions applied one after the other; they are not syntax aware.
//!
//! # Known limitations
//!
//! - `//` inside a string literal or URL (`"https://..."`) is treated as a comment
//!   start and the rest of the line is dropped.
//! - A `console.log(...)` whose arguments contain a `)` is cut at the first `)`.
//! - An unterminated `/*` swallows everything up to the end of the text.

use crate::file::FileKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use tracing::trace;

/// A single pattern substitution.
#[derive(Debug)]
pub struct Rule {
    name: &'static str,
    pattern: Regex,
}

impl Rule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("valid built-in pattern"),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Removes every match of this rule from `text`.
    #[must_use]
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, "")
    }
}

/// Ordered rules for one file kind.
#[derive(Debug)]
pub struct CleanRuleSet {
    rules: Vec<Rule>,
}

impl CleanRuleSet {
    /// Returns the rule set for `kind`, or `None` for [`FileKind::Other`].
    #[must_use]
    pub fn for_kind(kind: FileKind) -> Option<&'static Self> {
        match kind {
            FileKind::Script => Some(&SCRIPT_RULES),
            FileKind::Markup | FileKind::Style => Some(&MARKUP_RULES),
            FileKind::Other => None,
        }
    }

    /// The rules in application order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Applies every rule in order.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut cleaned = text.to_string();

        for rule in &self.rules {
            let replaced = match rule.apply(&cleaned) {
                Cow::Borrowed(_) => continue,
                Cow::Owned(replaced) => replaced,
            };

            trace!(
                "rule '{}' removed {} bytes",
                rule.name,
                cleaned.len() - replaced.len()
            );
            cleaned = replaced;
        }

        cleaned
    }
}

// Log calls go first so comment markers inside their arguments disappear with them.
static SCRIPT_RULES: Lazy<CleanRuleSet> = Lazy::new(|| CleanRuleSet {
    rules: vec![
        Rule::new("console-log", r"\bconsole\.log\(.*?\);?\s*"),
        Rule::new("line-comment", r"//.*"),
        Rule::new("block-comment", r"(?s)/\*.*?(?:\*/|\z)"),
    ],
});

static MARKUP_RULES: Lazy<CleanRuleSet> = Lazy::new(|| CleanRuleSet {
    rules: vec![
        Rule::new("block-comment", r"(?s)/\*.*?(?:\*/|\z)"),
        Rule::new("markup-comment", r"(?s)<!--.*?-->"),
    ],
});

/// Removes comments and `console.log` calls from `text` according to `kind`.
///
/// `console.error(...)` and `alert(...)` are left in place. [`FileKind::Other`]
/// content is returned unchanged.
///
/// # Examples
///
/// ```
/// use web_cleaner::{clean, FileKind};
///
/// let js = "console.log(\"hi\"); // debug\nfunction f(){ /* note */ return 1; }";
/// assert_eq!(clean(js, FileKind::Script), "\nfunction f(){  return 1; }");
///
/// let html = "<p>kept</p><!-- dropped -->";
/// assert_eq!(clean(html, FileKind::Markup), "<p>kept</p>");
/// ```
#[must_use]
pub fn clean(text: &str, kind: FileKind) -> String {
    CleanRuleSet::for_kind(kind).map_or_else(|| text.to_string(), |rules| rules.apply(text))
}
