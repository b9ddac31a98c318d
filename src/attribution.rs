//! Delta attribution over built threads.
//!
//! Only direct replies to a post are evaluated. A reply C earned a delta when one
//! of its grandchildren is a bot confirmation: the child in between is the award
//! message, so its author is the one conceding. The delta counts as OP-granted
//! when that child is by OP and C is not.

use crate::tree::{Comment, ConcessionLabel, Post};

/// Totals from one attribution pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttributionStats {
    pub posts_with_op_concession: usize,
    pub op_concessions: usize,
    pub other_concessions: usize,
}

/// Label a single top-level comment of a thread authored by `op`.
///
/// Stops at the first OP-granted confirmation, so one comment records at most one
/// award even when several sub-threads confirm deltas for it.
pub fn classify_comment(comment: &Comment, op: Option<&str>) -> ConcessionLabel {
    let mut label = ConcessionLabel::NoConcession;
    for child in comment.children() {
        for grandchild in child.children() {
            if !grandchild.is_confirmation_marker() {
                continue;
            }
            if child.author.as_deref() == op && comment.author.as_deref() != op {
                return ConcessionLabel::OpConcession;
            }
            label = ConcessionLabel::SelfConcession;
        }
    }
    label
}

/// Attribute every direct comment of `post`. Deeper comments stay `Unattributed`.
/// Returns the labels assigned, in comment order.
pub fn attribute_post(post: &mut Post) -> Vec<ConcessionLabel> {
    if post.has_op_concession().is_some() {
        // Already attributed; labels are write-once.
        return post.comments().iter().map(Comment::label).collect();
    }
    post.begin_attribution();
    let op = post.author.clone();
    let mut labels = Vec::with_capacity(post.comments().len());
    let mut op_granted = false;
    for comment in post.comments_mut() {
        let label = classify_comment(comment, op.as_deref());
        comment.set_label(label);
        op_granted |= label.is_op_concession();
        labels.push(label);
    }
    if op_granted {
        post.mark_op_concession();
    }
    labels
}

/// Run attribution over the whole forest.
pub fn attribute_all(posts: &mut [Post]) -> AttributionStats {
    let mut stats = AttributionStats::default();
    for post in posts.iter_mut() {
        for label in attribute_post(post) {
            match label {
                ConcessionLabel::OpConcession => stats.op_concessions += 1,
                ConcessionLabel::SelfConcession => stats.other_concessions += 1,
                _ => {}
            }
        }
        if post.has_op_concession() == Some(true) {
            stats.posts_with_op_concession += 1;
        }
    }
    tracing::info!(
        "Attributed deltas: {} OP-granted, {} other, {} posts with an OP delta.",
        stats.op_concessions,
        stats.other_concessions,
        stats.posts_with_op_concession
    );
    stats
}
