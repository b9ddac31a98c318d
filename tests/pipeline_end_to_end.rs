#[path = "common/mod.rs"]
mod common;

use cmv_corpus::{CorpusBuilder, CorpusRow, InsufficientDataError};
use common::*;
use std::fs;

/// Full run over a tiny export:
/// - thread "a": 2 OP deltas + 5 negatives, thread "b": no delta (ignored)
/// - seed 42, compact progress off
/// Checks: four artifacts, 4 balanced rows, CSV header, cleaned text stripped.
#[test]
fn run_writes_raw_and_cleaned_artifacts() {
    let base = make_corpus_basic();
    let out = base.join("out");

    let summary = CorpusBuilder::new()
        .input(base.join("input").join("cmv.jsonl"))
        .out_dir(&out)
        .seed(42)
        .progress(false)
        .run()
        .unwrap();

    assert_eq!(summary.forest.posts, 2);
    assert_eq!(summary.forest.comments, 2 * 3 + 5 + 3);
    assert_eq!(summary.forest.dropped, 0);
    assert_eq!(summary.positives, 2);
    assert_eq!(summary.negative_candidates, 5);
    assert_eq!(summary.selected, 4);
    for p in summary.paths.all() {
        assert!(p.exists(), "missing artifact {}", p.display());
    }
    assert_eq!(summary.paths.raw_csv, out.join("reddit.csv"));
    assert_eq!(summary.paths.cleaned_json, out.join("reddit_cleaned.json"));

    let raw = read_json_rows(&summary.paths.raw_json);
    let cleaned = read_json_rows(&summary.paths.cleaned_json);
    assert_eq!(raw.len(), 4);
    assert_eq!(raw.iter().filter(|r| r["delta"] == true).count(), 2);
    for (r, c) in raw.iter().zip(&cleaned) {
        assert_eq!(r["delta"], c["delta"]);
        let c_text = c["text"].as_str().unwrap();
        assert!(!c_text.contains('*') && !c_text.contains('`') && !c_text.contains('\n'));
    }
    assert!(raw.iter().any(|r| r["text"].as_str().unwrap().contains("**Strong**")));

    let csv = fs::read_to_string(&summary.paths.raw_csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("text,delta"));
    let cleaned_csv = fs::read_to_string(&summary.paths.cleaned_csv).unwrap();
    assert_eq!(cleaned_csv.lines().count(), 5);
}

/// Same input + same seed -> byte-identical artifacts.
#[test]
fn runs_are_reproducible() {
    let base = make_corpus_basic();
    let input = base.join("input").join("cmv.jsonl");

    let a = CorpusBuilder::new().input(&input).out_dir(base.join("a")).progress(false).run().unwrap();
    let b = CorpusBuilder::new().input(&input).out_dir(base.join("b")).progress(false).run().unwrap();
    for (pa, pb) in a.paths.all().iter().zip(b.paths.all()) {
        assert_eq!(fs::read(pa).unwrap(), fs::read(pb).unwrap());
    }
}

/// A directory mixing plain and zstd exports is loaded file by file; other files,
/// plain `.json` included, are skipped.
#[test]
fn loads_a_directory_of_plain_and_zst_exports() {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("input");
    write_jsonl(&input.join("part_1.jsonl"), &[balanced_thread("a", "alice", 1, 2)]);
    write_zst_lines(&input.join("part_2.jsonl.zst"), &[balanced_thread("b", "bob", 1, 2)]);
    fs::write(input.join("README.txt"), "not an export").unwrap();
    fs::write(input.join("previous.json"), "[]").unwrap();

    let summary = CorpusBuilder::new()
        .input(&input)
        .out_dir(base.join("out"))
        .stem("cmv")
        .pretty_json(false)
        .progress(false)
        .run()
        .unwrap();

    assert_eq!(summary.forest.posts, 2);
    assert_eq!(summary.positives, 2);
    assert_eq!(summary.selected, 4);
    assert!(base.join("out").join("cmv_cleaned.csv").exists());
    let json = fs::read_to_string(base.join("out").join("cmv.json")).unwrap();
    assert_eq!(json.lines().count(), 1);
}

/// Too few negatives aborts the run before anything is written.
#[test]
fn insufficient_data_aborts_without_output() {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("cmv.jsonl");
    write_jsonl(&input, &[balanced_thread("a", "alice", 2, 1)]);
    let out = base.join("out");

    let err = CorpusBuilder::new().input(&input).out_dir(&out).progress(false).run().unwrap_err();
    let insufficient = err.downcast_ref::<InsufficientDataError>().expect("typed error");
    assert_eq!(insufficient.positives, 2);
    assert_eq!(insufficient.candidates, 1);
    assert!(!out.exists());
}

/// A malformed line fails loudly with its location.
#[test]
fn malformed_line_reports_position() {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("cmv.jsonl");
    let good = balanced_thread("a", "alice", 1, 1).to_string();
    fs::write(&input, format!("{good}\n\n{{not json\n")).unwrap();

    let err = CorpusBuilder::new().input(&input).out_dir(base.join("out")).progress(false).run().unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("line 3"), "unexpected error: {msg}");
}

#[test]
fn missing_input_is_an_error() {
    let base = tempfile::tempdir().unwrap().into_path();
    let res = CorpusBuilder::new().input(base.join("nope")).out_dir(base.join("out")).progress(false).run();
    assert!(res.is_err());
}

/// The attributed forest is available without sampling or writing.
#[test]
fn build_forest_only() {
    let base = make_corpus_basic();
    let forest = CorpusBuilder::new()
        .input(base.join("input"))
        .progress(false)
        .build_forest()
        .unwrap();

    assert_eq!(forest.posts.len(), 2);
    assert_eq!(forest.attribution.op_concessions, 2);
    assert_eq!(forest.posts[0].has_op_concession(), Some(true));
    assert_eq!(forest.posts[1].has_op_concession(), Some(false));
}

/// Writing the corpus into the input directory does not feed it back in:
/// a second run over the same directory sees only the thread exports.
#[test]
fn rerun_with_output_in_input_directory() {
    let base = make_corpus_basic();
    let dir = base.join("input");

    let first = CorpusBuilder::new().input(&dir).out_dir(&dir).progress(false).run().unwrap();
    let snapshot: Vec<Vec<u8>> = first.paths.all().iter().map(|p| fs::read(p).unwrap()).collect();
    let second = CorpusBuilder::new().input(&dir).out_dir(&dir).progress(false).run().unwrap();

    assert_eq!(first.selected, 4);
    assert_eq!(second.forest.posts, 2);
    assert_eq!(second.selected, first.selected);
    for (p, before) in second.paths.all().iter().zip(&snapshot) {
        assert_eq!(&fs::read(p).unwrap(), before, "{} changed", p.display());
    }
}

fn read_csv_rows(path: &std::path::Path) -> Vec<CorpusRow> {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    rdr.deserialize().map(|r| r.unwrap()).collect()
}

fn read_json_corpus(path: &std::path::Path) -> Vec<CorpusRow> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

/// Multi-line bodies are quoted in the CSV; reading it back gives the JSON rows.
#[test]
fn csv_round_trips_multi_line_bodies() {
    let base = make_corpus_basic();
    let summary = CorpusBuilder::new()
        .input(base.join("input"))
        .out_dir(base.join("out"))
        .progress(false)
        .run()
        .unwrap();

    let from_csv = read_csv_rows(&summary.paths.raw_csv);
    let from_json = read_json_corpus(&summary.paths.raw_json);
    assert_eq!(from_csv.len(), 4);
    assert_eq!(from_csv, from_json);
    assert!(from_csv.iter().any(|r| r.text.as_deref().is_some_and(|t| t.contains("\n\n"))));

    assert_eq!(read_csv_rows(&summary.paths.cleaned_csv), read_json_corpus(&summary.paths.cleaned_json));
}

/// A positive without a body: empty CSV cell, `null` in JSON, in both stages.
#[test]
fn absent_body_exports_as_empty_cell_and_null() {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("cmv.jsonl");
    let mut thread = balanced_thread("a", "alice", 1, 1);
    thread["comments"][0].as_object_mut().unwrap().remove("body");
    write_jsonl(&input, &[thread]);

    let summary = CorpusBuilder::new().input(&input).out_dir(base.join("out")).progress(false).run().unwrap();
    assert_eq!(summary.positives, 1);

    for (csv_path, json_path) in [
        (&summary.paths.raw_csv, &summary.paths.raw_json),
        (&summary.paths.cleaned_csv, &summary.paths.cleaned_json),
    ] {
        let rows = read_json_rows(json_path);
        let positive = rows.iter().find(|r| r["delta"] == true).unwrap();
        assert!(positive["text"].is_null());
        assert!(positive.as_object().unwrap().contains_key("text"));

        let mut rdr = csv::Reader::from_path(csv_path).unwrap();
        let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        let positive = records.iter().find(|r| r.get(1) == Some("true")).unwrap();
        assert_eq!(positive.get(0), Some(""));
    }
}

/// No OP deltas anywhere: header-only CSVs and empty JSON arrays.
#[test]
fn zero_positives_writes_empty_artifacts() {
    let base = tempfile::tempdir().unwrap().into_path();
    let input = base.join("cmv.jsonl");
    write_jsonl(&input, &[balanced_thread("b", "dave", 0, 3)]);

    let summary = CorpusBuilder::new().input(&input).out_dir(base.join("out")).progress(false).run().unwrap();
    assert_eq!(summary.positives, 0);
    assert_eq!(summary.selected, 0);

    for csv_path in [&summary.paths.raw_csv, &summary.paths.cleaned_csv] {
        assert_eq!(fs::read_to_string(csv_path).unwrap(), "text,delta\n");
    }
    for json_path in [&summary.paths.raw_json, &summary.paths.cleaned_json] {
        assert!(read_json_rows(json_path).is_empty());
    }
}

/// A cleaned artifact that cannot be promoted fails the run and leaves no
/// partial corpus or temp files behind.
#[test]
fn failed_export_leaves_no_partial_output() {
    let base = make_corpus_basic();
    let out = base.join("out");
    fs::create_dir_all(out.join("reddit_cleaned.csv")).unwrap();

    let res = CorpusBuilder::new().input(base.join("input")).out_dir(&out).progress(false).run();
    assert!(res.is_err());

    assert!(!out.join("reddit.csv").exists());
    assert!(!out.join("reddit.json").exists());
    assert!(!out.join("reddit_cleaned.json").exists());
    assert!(out.join("reddit_cleaned.csv").is_dir());
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".part"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left: {leftovers:?}");
}
