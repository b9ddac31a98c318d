//! Markdown stripping for comment bodies.

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    stars: Regex,
    underscores: Regex,
    code: Regex,
    link: Regex,
    newlines: Regex,
}

fn patterns() -> &'static Patterns {
    static P: OnceLock<Patterns> = OnceLock::new();
    // `(?s)`: markup spanning a line break is stripped before newlines are collapsed.
    P.get_or_init(|| Patterns {
        stars: Regex::new(r"(?s)\*{1,2}(.*?)\*{1,2}").expect("emphasis pattern"),
        underscores: Regex::new(r"(?s)_{1,2}(.*?)_{1,2}").expect("emphasis pattern"),
        code: Regex::new(r"(?s)`(.*?)`").expect("inline code pattern"),
        link: Regex::new(r"(?s)\[(.*?)\]\(.*?\)").expect("link pattern"),
        newlines: Regex::new(r"(?:\r?\n)+").expect("newline pattern"),
    })
}

/// Strip emphasis, inline code and link markup, then collapse newline runs to a space.
///
/// Each marker pass leaves at most one unpaired marker behind, and links are
/// replaced until none remain (`[[a](b)](c)` unwraps twice), so applying this
/// to its own output changes nothing.
pub fn strip_markdown(text: &str) -> String {
    let p = patterns();
    let text = p.stars.replace_all(text, "$1");
    let text = p.underscores.replace_all(&text, "$1");
    let text = p.code.replace_all(&text, "$1");
    let mut text = text.into_owned();
    while p.link.is_match(&text) {
        text = p.link.replace_all(&text, "$1").into_owned();
    }
    p.newlines.replace_all(&text, " ").into_owned()
}

/// `strip_markdown` over an optional body; absent stays absent.
pub fn normalize_body(body: Option<&str>) -> Option<String> {
    body.map(strip_markdown)
}
