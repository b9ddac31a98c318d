//! Corpus artifacts: one CSV and one JSON array per processing stage.
//! Files are written next to their destination and promoted atomically.

use crate::normalize::normalize_body;
use crate::tree::Comment;
use crate::util::{create_with_backoff, remove_with_backoff, replace_file_atomic_backoff, tmp_path_for};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// One labelled example.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    pub text: Option<String>,
    pub delta: bool,
}

impl CorpusRow {
    pub fn from_comment(c: &Comment) -> Self {
        Self { text: c.body.clone(), delta: c.is_op_concession() }
    }

    pub fn normalized(&self) -> Self {
        Self { text: normalize_body(self.text.as_deref()), delta: self.delta }
    }
}

pub fn rows_from_comments(selected: &[&Comment]) -> Vec<CorpusRow> {
    selected.iter().map(|c| CorpusRow::from_comment(c)).collect()
}

/// Paths of the four artifacts produced per run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportPaths {
    pub raw_csv: PathBuf,
    pub raw_json: PathBuf,
    pub cleaned_csv: PathBuf,
    pub cleaned_json: PathBuf,
}

impl ExportPaths {
    /// `<stem>.csv`, `<stem>.json`, `<stem><suffix>.csv`, `<stem><suffix>.json` under `out_dir`.
    pub fn for_stem(out_dir: &Path, stem: &str, cleaned_suffix: &str) -> Self {
        Self {
            raw_csv: out_dir.join(format!("{stem}.csv")),
            raw_json: out_dir.join(format!("{stem}.json")),
            cleaned_csv: out_dir.join(format!("{stem}{cleaned_suffix}.csv")),
            cleaned_json: out_dir.join(format!("{stem}{cleaned_suffix}.json")),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [&self.raw_csv, &self.raw_json, &self.cleaned_csv, &self.cleaned_json]
    }

    /// Best-effort removal of whichever artifacts exist, after a failed export.
    pub fn remove_existing(&self) {
        for p in self.all() {
            if !p.is_file() {
                continue;
            }
            if let Err(e) = remove_with_backoff(p, 4, 25) {
                tracing::warn!("Could not remove partial artifact {}: {e:#}", p.display());
            }
        }
    }
}

fn write_atomic(out_path: &Path, write_buf: usize, body: impl FnOnce(&mut BufWriter<fs::File>) -> Result<()>) -> Result<()> {
    if let Some(dir) = out_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = tmp_path_for(out_path);
    let f = create_with_backoff(&tmp, 16, 50).with_context(|| format!("create {}", tmp.display()))?;
    let mut w = BufWriter::with_capacity(write_buf.max(8 * 1024), f);
    let written = body(&mut w)
        .with_context(|| format!("write {}", tmp.display()))
        .and_then(|()| w.flush().with_context(|| format!("flush {}", tmp.display())));
    drop(w);
    let res = written.and_then(|()| replace_file_atomic_backoff(&tmp, out_path));
    if res.is_err() {
        let _ = remove_with_backoff(&tmp, 4, 25);
    }
    res
}

/// Two columns, `text` and `delta`, with a header row. Missing text is an empty cell.
pub fn write_csv(rows: &[CorpusRow], out_path: &Path, write_buf: usize) -> Result<()> {
    write_atomic(out_path, write_buf, |w| {
        let mut wtr = csv::Writer::from_writer(w);
        for row in rows {
            wtr.serialize(row)?;
        }
        if rows.is_empty() {
            wtr.write_record(["text", "delta"])?;
        }
        wtr.flush()?;
        Ok(())
    })
}

/// JSON array of `{"text", "delta"}` objects; `pretty` indents by four spaces.
pub fn write_json(rows: &[CorpusRow], out_path: &Path, pretty: bool, write_buf: usize) -> Result<()> {
    write_atomic(out_path, write_buf, |w| {
        if pretty {
            let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
            let mut ser = serde_json::Serializer::with_formatter(&mut *w, fmt);
            rows.serialize(&mut ser)?;
        } else {
            serde_json::to_writer(&mut *w, rows)?;
        }
        Ok(())
    })
}

/// Write the CSV + JSON pair for one stage.
pub fn write_pair(rows: &[CorpusRow], csv_path: &Path, json_path: &Path, pretty: bool, write_buf: usize) -> Result<()> {
    write_csv(rows, csv_path, write_buf)?;
    write_json(rows, json_path, pretty, write_buf)?;
    tracing::info!("Wrote {} rows to {} and {}.", rows.len(), csv_path.display(), json_path.display());
    Ok(())
}
