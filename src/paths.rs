use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

fn input_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\.(jsonl|ndjson)(\.zst)?$|\.zst$").expect("input name pattern")
    })
}

/// True for file names picked up from a directory scan (`.jsonl`, `.ndjson`, optionally `.zst`).
/// Plain `.json`, the format the exporter writes, is not scanned.
pub fn is_input_name(name: &str) -> bool {
    input_name_re().is_match(name)
}

/// Resolve the input selection into a sorted list of files.
/// A file path is returned as-is (whatever its extension); a directory is scanned
/// one level deep for recognised inputs. Missing paths yield an empty plan.
pub fn plan_inputs(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    if !input.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().map(is_input_name).unwrap_or(false))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
