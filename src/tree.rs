//! Discussion hierarchy: owned Post -> Comment trees rebuilt from flat `parent_id` links.
//!
//! Each discussion gets one `parent_id -> [record index]` map; the tree is then
//! expanded with an explicit stack and assembled bottom-up, so neither building
//! nor dropping a deep reply chain recurses.

use crate::progress::make_count_progress;
use crate::records::{RawComment, RawPost};
use ahash::AHashMap;
use std::fmt;

/// Author name of the bot that confirms awarded deltas.
pub const CONFIRMATION_AUTHOR: &str = "DeltaBot";

/// Body prefixes (case-sensitive) of a delta confirmation.
pub const CONFIRMATION_PREFIXES: [&str; 3] = ["Confirmed: 1", "Confirmed - 1", "Confirmed -- 1"];

/// True when a record is a bot confirmation of an awarded delta.
/// Missing author or body never matches.
pub fn is_confirmation(author: Option<&str>, body: Option<&str>) -> bool {
    match (author, body) {
        (Some(a), Some(b)) => a == CONFIRMATION_AUTHOR && CONFIRMATION_PREFIXES.iter().any(|p| b.starts_with(p)),
        _ => false,
    }
}

/// Delta attribution state of a top-level comment. Set once by the attributor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConcessionLabel {
    /// Not evaluated (deeper comments, or before attribution runs).
    #[default]
    Unattributed,
    NoConcession,
    /// A confirmed delta that was not OP-to-third-party (e.g. self-awarded or granted by someone else).
    SelfConcession,
    /// OP awarded the delta to this comment's author.
    OpConcession,
}

impl ConcessionLabel {
    pub fn is_attributed(self) -> bool {
        self != ConcessionLabel::Unattributed
    }
    pub fn has_concession(self) -> bool {
        matches!(self, ConcessionLabel::SelfConcession | ConcessionLabel::OpConcession)
    }
    pub fn is_op_concession(self) -> bool {
        self == ConcessionLabel::OpConcession
    }
}

#[derive(Clone, Debug)]
pub struct Comment {
    pub author: Option<String>,
    pub id: Option<String>,
    pub body: Option<String>,
    children: Vec<Comment>,
    confirmation: bool,
    label: ConcessionLabel,
}

impl Comment {
    pub fn from_raw(raw: &RawComment, children: Vec<Comment>) -> Self {
        Self {
            confirmation: is_confirmation(raw.author.as_deref(), raw.body.as_deref()),
            author: raw.author.clone(),
            id: raw.name.clone(),
            body: raw.body.clone(),
            children,
            label: ConcessionLabel::Unattributed,
        }
    }

    pub fn children(&self) -> &[Comment] {
        &self.children
    }

    /// Fixed at construction from author and body.
    pub fn is_confirmation_marker(&self) -> bool {
        self.confirmation
    }

    pub fn label(&self) -> ConcessionLabel {
        self.label
    }
    pub fn has_concession(&self) -> bool {
        self.label.has_concession()
    }
    pub fn is_op_concession(&self) -> bool {
        self.label.is_op_concession()
    }

    /// Write-once; later calls are ignored.
    pub(crate) fn set_label(&mut self, label: ConcessionLabel) {
        debug_assert!(!self.label.is_attributed(), "comment {self} labelled twice");
        if !self.label.is_attributed() {
            self.label = label;
        }
    }

    /// This comment plus all of its descendants, pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }
}

impl Drop for Comment {
    // Flatten before dropping so long reply chains don't blow the stack.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut c) = pending.pop() {
            pending.append(&mut c.children);
        }
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id.as_deref().unwrap_or("None"), self.author.as_deref().unwrap_or("None"))
    }
}

/// Pre-order iterator over a comment forest.
pub struct Walk<'a> {
    stack: Vec<&'a Comment>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Comment;
    fn next(&mut self) -> Option<Self::Item> {
        let c = self.stack.pop()?;
        self.stack.extend(c.children.iter().rev());
        Some(c)
    }
}

#[derive(Clone, Debug)]
pub struct Post {
    pub author: Option<String>,
    pub id: Option<String>,
    pub body: Option<String>,
    comments: Vec<Comment>,
    op_concession: Option<bool>,
}

impl Post {
    /// Build the post and its full comment tree from an exported discussion.
    /// Comments whose parent is not reachable from the post are left out.
    pub fn from_raw(raw: &RawPost) -> Self {
        Self {
            author: raw.author.clone(),
            id: raw.name.clone(),
            body: raw.selftext.clone(),
            comments: build_comments(raw.name.as_deref(), &raw.comments),
            op_concession: None,
        }
    }

    /// Direct replies to the post.
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub(crate) fn comments_mut(&mut self) -> &mut [Comment] {
        &mut self.comments
    }

    /// `None` until attribution has run, then whether OP awarded any delta in this thread.
    pub fn has_op_concession(&self) -> Option<bool> {
        self.op_concession
    }

    pub(crate) fn begin_attribution(&mut self) {
        if self.op_concession.is_none() {
            self.op_concession = Some(false);
        }
    }

    pub(crate) fn mark_op_concession(&mut self) {
        self.op_concession = Some(true);
    }

    /// Every comment in the thread, pre-order.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: self.comments.iter().rev().collect() }
    }

    pub fn comment_count(&self) -> usize {
        self.walk().count()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id.as_deref().unwrap_or("None"), self.author.as_deref().unwrap_or("None"))
    }
}

/// Take every not-yet-placed record listed under `key`, in input order.
fn claim(index: &AHashMap<&str, Vec<usize>>, placed: &mut [bool], key: &str) -> Vec<usize> {
    let mut out = Vec::new();
    if let Some(idxs) = index.get(key) {
        for &i in idxs {
            if !placed[i] {
                placed[i] = true;
                out.push(i);
            }
        }
    }
    out
}

fn build_comments(post_id: Option<&str>, records: &[RawComment]) -> Vec<Comment> {
    let Some(post_id) = post_id else { return Vec::new() };

    let mut index: AHashMap<&str, Vec<usize>> = AHashMap::with_capacity(records.len());
    for (i, r) in records.iter().enumerate() {
        if let Some(p) = r.parent_id.as_deref() {
            index.entry(p).or_default().push(i);
        }
    }

    // Expand depth-first; a record goes under the first node that claims it,
    // so duplicated ids can never attach one record twice.
    let mut placed = vec![false; records.len()];
    let mut child_idx: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let roots = claim(&index, &mut placed, post_id);
    let mut stack: Vec<(usize, bool)> = roots.iter().rev().map(|&i| (i, false)).collect();
    let mut post_order = Vec::with_capacity(records.len());
    while let Some((i, expanded)) = stack.pop() {
        if expanded {
            post_order.push(i);
            continue;
        }
        stack.push((i, true));
        if let Some(id) = records[i].name.as_deref() {
            let kids = claim(&index, &mut placed, id);
            stack.extend(kids.iter().rev().map(|&k| (k, false)));
            child_idx[i] = kids;
        }
    }

    // Children precede parents in post-order, so each node's subtree is ready when it is built.
    let mut built: Vec<Option<Comment>> = (0..records.len()).map(|_| None).collect();
    for i in post_order {
        let children = std::mem::take(&mut child_idx[i])
            .into_iter()
            .filter_map(|k| built[k].take())
            .collect();
        built[i] = Some(Comment::from_raw(&records[i], children));
    }
    roots.into_iter().filter_map(|i| built[i].take()).collect()
}

/// Totals from building a forest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ForestStats {
    pub posts: usize,
    /// Comment records placed in some tree.
    pub comments: usize,
    /// Comment records whose parent chain never reaches their post.
    pub dropped: usize,
}

/// Build one `Post` per exported discussion, in input order.
pub fn build_forest(raws: &[RawPost], progress: bool) -> (Vec<Post>, ForestStats) {
    let pb = if progress { Some(make_count_progress(raws.len() as u64, "Building threads")) } else { None };

    let mut stats = ForestStats::default();
    let mut posts = Vec::with_capacity(raws.len());
    for raw in raws {
        let post = Post::from_raw(raw);
        let placed = post.comment_count();
        let dropped = raw.comments.len().saturating_sub(placed);
        if dropped > 0 {
            tracing::debug!("{post}: dropped {dropped} comment(s) with unresolvable parents");
        }
        stats.comments += placed;
        stats.dropped += dropped;
        posts.push(post);
        if let Some(pb) = &pb { pb.inc(1); }
    }
    stats.posts = posts.len();

    if let Some(pb) = pb {
        pb.finish_with_message("Building threads done");
    }
    (posts, stats)
}
