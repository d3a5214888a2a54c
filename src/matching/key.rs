//! Canonical sample keys derived from heterogeneous artifact filenames
//!
//! Images, ROI archives, nucleus tables and cropped localization tables all
//! carry the same sample name wrapped in exporter-specific decorations:
//!
//! - `C1_sample.tif` (channel prefix written by channel splitting)
//! - `C1_sample_rois.zip` / `C2_sample_roi.csv` (ROI markers)
//! - `sample_0262-0212.csv` (crop bounding box of a single ROI)
//!
//! [`normalize`] strips those decorations so every artifact of one field of
//! view lands on the same [`SampleKey`].

use log::error;
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions removed repeatedly from the end of a filename
pub const KNOWN_EXTENSIONS: [&str; 10] = [
    "tif", "tiff", "png", "jpg", "jpeg", "zip", "nd2", "czi", "lif", "csv",
];

// Patterns are literals; a compile failure is logged and leaves that step a no-op
fn compile(pattern: &str) -> Option<Regex> {
    Regex::new(pattern)
        .inspect_err(|failure| error!("Key pattern {pattern:?} failed to compile: {failure}"))
        .ok()
}

static KNOWN_EXTENSION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(&format!(
        r"(\.ome)?\.({})$",
        KNOWN_EXTENSIONS.join("|")
    ))
});

// Fallback for names without a recognised extension
static ANY_EXTENSION: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"\.[a-z0-9]{1,5}$"));

static CHANNEL_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"^c\d+_"));

static ROI_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"_rois?$"));

static RANGE_SUFFIX: LazyLock<Option<Regex>> = LazyLock::new(|| compile(r"_\d+-\d+$"));

/// Normalized identifier shared by all files of one imaged field of view
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SampleKey(String);

impl SampleKey {
    /// Derive the key for a path from its file name
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        normalize(&name)
    }

    /// Borrow the key text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn strip(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let regex = pattern.as_ref()?;
    regex
        .is_match(text)
        .then(|| regex.replace(text, "").into_owned())
}

fn strip_known_extensions(name: &str) -> Option<String> {
    let mut current = strip(&KNOWN_EXTENSION, name)?;
    while let Some(next) = strip(&KNOWN_EXTENSION, &current) {
        current = next;
    }
    Some(current)
}

fn trim_separators(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || c == '_')
        .to_string()
}

/// Derive the canonical sample key from a filename
///
/// Matching is case-insensitive, so the key is lower-cased. Extensions,
/// channel prefix, ROI marker and crop-range suffix are stripped until none
/// applies, which handles both `name_roi_0001-0002` and `name_0001-0002_roi`
/// and makes `normalize(&format!("{key}.csv"))` return `key` again. Stacked
/// channel prefixes (`c1_c2_x`) are all removed for the same reason.
pub fn normalize(filename: &str) -> SampleKey {
    let lowered = filename.trim().to_lowercase();
    let mut current = strip_known_extensions(&lowered)
        .or_else(|| strip(&ANY_EXTENSION, &lowered))
        .unwrap_or(lowered);
    current = trim_separators(&current);

    loop {
        let mut next = strip_known_extensions(&current).unwrap_or_else(|| current.clone());
        for pattern in [&CHANNEL_PREFIX, &ROI_SUFFIX, &RANGE_SUFFIX] {
            if let Some(stripped) = strip(pattern, &next) {
                next = trim_separators(&stripped);
            }
        }
        if next == current {
            break;
        }
        current = next;
    }

    SampleKey(current)
}
