#![allow(dead_code)]

use cmv_corpus::{Post, RawPost};
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A comment record the way the CMV export stores it.
pub fn comment(name: &str, parent: &str, author: &str, body: &str) -> Value {
    json!({
        "name": name, "parent_id": parent, "author": author, "body": body,
        "score": 1, "created_utc": 1420070400, "subreddit": "changemyview"
    })
}

/// A post record embedding its whole comment list.
pub fn post(name: &str, author: &str, comments: Vec<Value>) -> Value {
    json!({
        "name": name, "author": author, "selftext": "I believe something. CMV.",
        "title": "CMV: something", "subreddit": "changemyview", "comments": comments
    })
}

pub fn raw(v: &Value) -> RawPost {
    serde_json::from_value(v.clone()).unwrap()
}

pub fn built(v: &Value) -> Post {
    Post::from_raw(&raw(v))
}

/// alice posts; bob replies (c1); `granter` answers bob (c2); DeltaBot answers c2 with `confirm_body`.
pub fn delta_thread(granter: &str, confirm_body: &str) -> Value {
    post(
        "t3_p1",
        "alice",
        vec![
            comment("t1_c1", "t3_p1", "bob", "Have you considered the other side?"),
            comment("t1_c2", "t1_c1", granter, "Good point, &#8710; for you."),
            comment("t1_c3", "t1_c2", "DeltaBot", confirm_body),
        ],
    )
}

/// One thread by `op` where `deltas` top-level replies each get an OP delta and
/// `negatives` top-level replies get nothing. Ids are prefixed with `tag`.
pub fn balanced_thread(tag: &str, op: &str, deltas: usize, negatives: usize) -> Value {
    let post_id = format!("t3_{tag}");
    let mut comments = Vec::new();
    for i in 0..deltas {
        let c = format!("t1_{tag}_d{i}");
        let award = format!("t1_{tag}_d{i}_award");
        comments.push(comment(&c, &post_id, &format!("persuader{i}"), &format!("**Strong** argument {i}\n\nwith [a source](http://example.com/{i})")));
        comments.push(comment(&award, &c, op, "You changed my view."));
        comments.push(comment(&format!("t1_{tag}_d{i}_bot"), &award, "DeltaBot", "Confirmed: 1 delta awarded to /u/persuader"));
    }
    for i in 0..negatives {
        comments.push(comment(&format!("t1_{tag}_n{i}"), &post_id, &format!("talker{i}"), &format!("_Weak_ reply `{i}`")));
    }
    post(&post_id, op, comments)
}

pub fn write_jsonl(path: &Path, records: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for r in records {
        writeln!(&mut f, "{}", r).unwrap();
    }
}

/// Same as `write_jsonl` but zstd-compressed.
pub fn write_zst_lines(path: &Path, records: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for r in records {
        writeln!(&mut enc, "{}", r).unwrap();
    }
    enc.finish().unwrap();
}

/// Temp dir holding `cmv.jsonl` with one thread that has 2 OP deltas + 5 negatives
/// and one thread without any delta.
pub fn make_corpus_basic() -> PathBuf {
    let base = tempfile::tempdir().unwrap().into_path();
    let records = vec![
        balanced_thread("a", "alice", 2, 5),
        balanced_thread("b", "dave", 0, 3),
    ];
    write_jsonl(&base.join("input").join("cmv.jsonl"), &records);
    base
}

pub fn read_json_rows(path: &Path) -> Vec<Value> {
    let s = fs::read_to_string(path).unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();
    v.as_array().unwrap().clone()
}
