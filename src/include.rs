//! HTML partial includes
//!
//! Site pages may carry placeholder elements such as
//! `<div include-html="nav.html"></div>`. Expansion replaces each
//! placeholder's content with the named file's body and strips the marker
//! attribute, repeating until no markers remain. Included content may
//! itself contain markers, so the document is rescanned after every
//! substitution; a pass cap turns include cycles into an error.

use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Literal substituted when the included file does not exist.
pub const NOT_FOUND_TEXT: &str = "Page not found.";

/// Literal substituted for any other resolution failure (unreadable file,
/// path escaping the site root).
pub const FAILED_TEXT: &str = "Include failed.";

/// Substitutions allowed per document before expansion is declared cyclic.
const MAX_PASSES: usize = 64;

/// Error type for include operations
#[derive(Debug)]
pub enum IncludeError {
    Io(std::io::Error),
    Regex(regex::Error),
    TooManyIncludes { limit: usize },
}

impl std::fmt::Display for IncludeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeError::Io(e) => write!(f, "IO error: {}", e),
            IncludeError::Regex(e) => write!(f, "Regex error: {}", e),
            IncludeError::TooManyIncludes { limit } => {
                write!(
                    f,
                    "Include expansion exceeded {} substitutions; include cycle suspected",
                    limit
                )
            }
        }
    }
}

impl std::error::Error for IncludeError {}

impl From<std::io::Error> for IncludeError {
    fn from(e: std::io::Error) -> Self {
        IncludeError::Io(e)
    }
}

impl From<regex::Error> for IncludeError {
    fn from(e: regex::Error) -> Self {
        IncludeError::Regex(e)
    }
}

pub type Result<T> = std::result::Result<T, IncludeError>;

/// Expands include placeholders against one site root.
pub struct Expander {
    site_root: PathBuf,
    marker: Regex,
}

impl Expander {
    pub fn new(site_root: &Path) -> Result<Self> {
        // Placeholders are leaf divs: their content must not contain a
        // closing div of its own before expansion.
        let marker = Regex::new(r#"(?s)<div([^>]*?)\sinclude-html="([^"]+)"([^>]*)>(.*?)</div>"#)?;
        Ok(Self {
            site_root: site_root.to_path_buf(),
            marker,
        })
    }

    /// Expand every placeholder in a document.
    pub fn expand(&self, document: &str) -> Result<String> {
        let mut doc = document.to_string();
        // One substitution per pass; rescanning keeps offsets valid and
        // makes the sequential order explicit.
        for _ in 0..MAX_PASSES {
            // Copy the capture pieces out before editing the document.
            let (range, attrs_before, file, attrs_after) = match self.marker.captures(&doc) {
                Some(captures) => {
                    let full = captures.get(0).expect("capture 0 always present");
                    (
                        full.range(),
                        captures[1].to_string(),
                        captures[2].to_string(),
                        captures[3].to_string(),
                    )
                }
                None => return Ok(doc),
            };

            let body = self.resolve(&file);
            let replacement = format!("<div{}{}>{}</div>", attrs_before, attrs_after, body);
            doc.replace_range(range, &replacement);
        }
        if self.marker.is_match(&doc) {
            return Err(IncludeError::TooManyIncludes { limit: MAX_PASSES });
        }
        Ok(doc)
    }

    /// Expand a single file from the site root.
    pub fn expand_file(&self, path: &Path) -> Result<String> {
        let contents = fs::read_to_string(path)?;
        self.expand(&contents)
    }

    /// Resolve an include reference to replacement content. Total: every
    /// failure maps to one of the fallback literals.
    fn resolve(&self, file: &str) -> String {
        let relative = Path::new(file);
        let escapes_root = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes_root {
            return FAILED_TEXT.to_string();
        }

        match fs::read_to_string(self.site_root.join(relative)) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => NOT_FOUND_TEXT.to_string(),
            Err(_) => FAILED_TEXT.to_string(),
        }
    }
}

/// Counts from a `build_site` run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub copied: usize,
}

/// Expand a whole site directory into `out_dir`. `.html` files are
/// expanded; everything else is copied through.
pub fn build_site(site_root: &Path, out_dir: &Path) -> Result<BuildSummary> {
    let expander = Expander::new(site_root)?;
    let mut summary = BuildSummary::default();
    build_dir(&expander, site_root, out_dir, out_dir, &mut summary)?;
    Ok(summary)
}

fn build_dir(
    expander: &Expander,
    dir: &Path,
    target_dir: &Path,
    out_root: &Path,
    summary: &mut BuildSummary,
) -> Result<()> {
    fs::create_dir_all(target_dir)?;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let target = target_dir.join(entry.file_name());
        if path.is_dir() {
            // Never descend into the output tree itself.
            if path == out_root {
                continue;
            }
            build_dir(expander, &path, &target, out_root, summary)?;
        } else if path.extension().map(|e| e == "html").unwrap_or(false) {
            let expanded = expander.expand_file(&path)?;
            fs::write(&target, expanded)?;
            summary.pages += 1;
        } else {
            fs::copy(&path, &target)?;
            summary.copied += 1;
        }
    }
    Ok(())
}
