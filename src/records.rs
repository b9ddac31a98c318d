//! Minimal line-level schema for CMV thread exports.
//! Only the fields the corpus builder reads are declared; extra fields are ignored by serde.

use anyhow::Result;
use serde::Deserialize;

/// One discussion as exported: the submission plus every comment in the thread.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawPost {
    pub author: Option<String>,
    pub selftext: Option<String>,
    /// Fullname of the submission (`t3_...`), matched against comment `parent_id`s.
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comments: Vec<RawComment>,
}

/// A single comment record, linked to its parent only by `parent_id`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawComment {
    pub author: Option<String>,
    pub body: Option<String>,
    pub name: Option<String>,
    pub parent_id: Option<String>,
}

fn null_as_empty<'de, D>(de: D) -> std::result::Result<Vec<RawComment>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<RawComment>>::deserialize(de)?.unwrap_or_default())
}

/// Parse a JSON line into `RawPost` using serde_json.
#[inline]
pub fn parse_post(line: &str) -> Result<RawPost> {
    Ok(serde_json::from_str(line)?)
}
