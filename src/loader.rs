//! Record loader: turns one or more NDJSON exports into `RawPost` values, in file then line order.

use crate::ndjson::{is_zst, NdjsonReader};
use crate::paths::plan_inputs;
use crate::progress::{make_progress_bar_labeled, total_input_size};
use crate::records::{parse_post, RawPost};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Load every post from `input` (a file, or a directory of exports).
/// Blank lines are skipped; a line that does not parse aborts the load.
pub fn load_posts(input: &Path, read_buf: usize, progress: bool) -> Result<Vec<RawPost>> {
    let files = plan_inputs(input);
    if files.is_empty() {
        bail!("no input records found at {}", input.display());
    }
    tracing::info!("Planned {} input file(s) under {}.", files.len(), input.display());
    load_posts_from_files(&files, read_buf, progress)
}

pub fn load_posts_from_files(files: &[PathBuf], read_buf: usize, progress: bool) -> Result<Vec<RawPost>> {
    // Decompressed byte counts overshoot the on-disk total for .zst, so only track plain files.
    let pb = if progress && !files.iter().any(|p| is_zst(p)) {
        Some(make_progress_bar_labeled(total_input_size(files), Some("Loading posts")))
    } else {
        None
    };

    let mut posts = Vec::new();
    let mut buf = String::with_capacity(64 * 1024);
    for path in files {
        let mut rdr = NdjsonReader::open(path, read_buf)
            .with_context(|| format!("open {}", path.display()))?;
        let before = posts.len();
        loop {
            let n = rdr.read_line(&mut buf).with_context(|| format!("read {}", path.display()))?;
            if n == 0 { break; }
            if let Some(pb) = &pb { pb.inc(n as u64); }
            if buf.trim().is_empty() { continue; }
            let post = parse_post(&buf)
                .with_context(|| format!("parse {} line {}", path.display(), rdr.line_no()))?;
            posts.push(post);
        }
        tracing::debug!("{}: {} posts", path.display(), posts.len() - before);
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Loading posts done");
    }
    tracing::info!("Loaded {} posts.", posts.len());
    Ok(posts)
}
