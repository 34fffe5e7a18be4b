//! GitHub release metadata and download-link rendering
//!
//! Fetches release data through the GitHub CLI (`gh`) instead of the REST
//! API directly, which sidesteps token management. The filename-substring
//! ranking decides both the order of the download links and the
//! human-readable title shown on each one.

use crate::classes::ClassSet;
use crate::html::Element;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::process::Command;

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub size: u64,
    pub browser_download_url: String,
}

/// A published release.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    pub name: String,
    #[serde(rename = "tag_name")]
    pub tag: String,
    pub published_at: Option<String>,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Publication date as `YYYY-MM-DD`, when the payload carries one.
    pub fn published_date(&self) -> Option<String> {
        let raw = self.published_at.as_deref()?;
        let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
        Some(parsed.format("%Y-%m-%d").to_string())
    }
}

/// Error type for release operations
#[derive(Debug)]
pub enum ReleaseError {
    CommandFailed { command: String, stderr: String },
    NotAuthenticated,
    NotConfigured,
    RateLimited,
    NoReleases,
    ParseError { message: String },
    IoError(std::io::Error),
}

impl std::fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseError::CommandFailed { command, stderr } => {
                write!(f, "Command '{}' failed: {}", command, stderr)
            }
            ReleaseError::NotAuthenticated => {
                write!(f, "Not authenticated with GitHub. Run 'gh auth login' first.")
            }
            ReleaseError::NotConfigured => {
                write!(
                    f,
                    "No GitHub repository configured. Set github.repo in marquee.toml."
                )
            }
            ReleaseError::RateLimited => {
                write!(f, "GitHub API rate limit exceeded. Try again later.")
            }
            ReleaseError::NoReleases => write!(f, "No published releases found"),
            ReleaseError::ParseError { message } => {
                write!(f, "Failed to parse GitHub response: {}", message)
            }
            ReleaseError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ReleaseError {}

impl From<std::io::Error> for ReleaseError {
    fn from(e: std::io::Error) -> Self {
        ReleaseError::IoError(e)
    }
}

pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Release client using the `gh` CLI
pub struct ReleaseClient {
    repo: String, // "owner/repo" format
}

impl ReleaseClient {
    pub fn new(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
        }
    }

    pub fn repo_name(&self) -> &str {
        &self.repo
    }

    /// All published releases, newest first (GitHub's ordering).
    pub fn releases(&self) -> Result<Vec<Release>> {
        let endpoint = format!("repos/{}/releases", self.repo);
        let output = Command::new("gh").args(["api", &endpoint]).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if stderr.contains("not logged") || stderr.contains("auth") {
                return Err(ReleaseError::NotAuthenticated);
            }
            if stderr.contains("rate limit") {
                return Err(ReleaseError::RateLimited);
            }
            return Err(ReleaseError::CommandFailed {
                command: format!("gh api {}", endpoint),
                stderr,
            });
        }

        let json_str = String::from_utf8_lossy(&output.stdout);
        let releases: Vec<Release> =
            serde_json::from_str(&json_str).map_err(|e| ReleaseError::ParseError {
                message: format!("JSON parse error: {}", e),
            })?;

        Ok(releases)
    }

    /// The most recent release, with assets already in display order.
    pub fn latest(&self) -> Result<Release> {
        let mut releases = self.releases()?;
        if releases.is_empty() {
            return Err(ReleaseError::NoReleases);
        }
        let mut release = releases.remove(0);
        sort_assets(&mut release.assets);
        Ok(release)
    }
}

/// Display rank of an asset by filename substring. Lower ranks render
/// first. The `-setup-jre` test precedes `-setup` because the former
/// contains the latter.
pub fn asset_rank(filename: &str) -> u8 {
    if filename.contains("-jar") {
        5
    } else if filename.contains("-bash") {
        4
    } else if filename.contains("-cmd") {
        3
    } else if filename.contains("-setup-jre") {
        1
    } else if filename.contains("-setup") {
        2
    } else {
        0
    }
}

/// Human-readable title for an asset, from the same substrings as the
/// rank.
pub fn asset_title(filename: &str) -> &'static str {
    if filename.contains("-jar") {
        "Standalone JAR"
    } else if filename.contains("-bash") {
        "Bash (macOS/Linux/Cygwin) Version"
    } else if filename.contains("-cmd") {
        "CMD (Windows) Version"
    } else if filename.contains("-setup-jre") {
        "Windows Installer (x64)"
    } else if filename.contains("-setup") {
        "Windows Installer (no JRE)"
    } else {
        "Download"
    }
}

/// Whole kilobytes, truncated.
pub fn size_kb(bytes: u64) -> u64 {
    bytes / 1024
}

/// Sort assets into display order. The sort is stable, so same-rank
/// assets keep the order the payload listed them in.
pub fn sort_assets(assets: &mut [ReleaseAsset]) {
    assets.sort_by_key(|asset| asset_rank(&asset.name));
}

fn is_featured(filename: &str) -> bool {
    filename.contains("-setup-jre")
}

/// Render one download link.
fn render_link(asset: &ReleaseAsset) -> Element {
    let mut link_classes = ClassSet::parse("download-link");
    let mut column_classes = ClassSet::parse("col-half");
    if is_featured(&asset.name) {
        link_classes.add("download-link-featured");
        column_classes = ClassSet::parse("col-full");
    }

    let link = Element::new("a")
        .attr("href", &asset.browser_download_url)
        .class(&link_classes)
        .text(asset_title(&asset.name))
        .child(Element::new("br"))
        .child(
            Element::new("span")
                .attr("class", "asset-name")
                .text(&asset.name),
        )
        .child(Element::new("br"))
        .text(&format!("{} KB", size_kb(asset.size)));

    Element::new("div").class(&column_classes).child(link)
}

/// Render the releases section for a fetched release. Assets are assumed
/// to be sorted already (see `ReleaseClient::latest`).
pub fn render_release_section(release: &Release) -> String {
    let mut heading = Element::new("h2")
        .text("Download ")
        .child(
            Element::new("span")
                .attr("id", "release-version")
                .text(&release.name),
        );
    if let Some(date) = release.published_date() {
        heading = heading.child(
            Element::new("span")
                .attr("class", "note")
                .text(&format!(" released {}", date)),
        );
    }

    let mut links = Element::new("div").attr("class", "release-links");
    for asset in &release.assets {
        links = links.child(render_link(asset));
    }

    Element::new("div")
        .attr("id", "releases")
        .child(heading)
        .child(links)
        .render()
}

/// Render the degraded section shown when no release data is available.
pub fn render_release_unavailable(reason: &str) -> String {
    Element::new("div")
        .attr("id", "releases")
        .child(Element::new("p").attr("class", "note").text(reason))
        .render()
}
