mod config;
mod paths;
mod ndjson;
mod records;
mod loader;
mod progress;
mod util;

mod tree;
mod attribution;
mod sampler;
mod normalize;
mod export;
mod pipeline;

pub use crate::config::{CorpusOptions, DEFAULT_SEED};
pub use crate::pipeline::{CorpusBuilder, CorpusSummary, Forest};

// Export the raw record schema and loader so callers can feed their own records.
pub use crate::records::{parse_post, RawComment, RawPost};
pub use crate::loader::{load_posts, load_posts_from_files};
pub use crate::paths::{is_input_name, plan_inputs};
pub use crate::ndjson::NdjsonReader;

// Thread model + the stages over it.
pub use crate::tree::{
    build_forest, is_confirmation, Comment, ConcessionLabel, ForestStats, Post, Walk,
    CONFIRMATION_AUTHOR, CONFIRMATION_PREFIXES,
};
pub use crate::attribution::{attribute_all, attribute_post, classify_comment, AttributionStats};
pub use crate::sampler::{
    partition_candidates, sample_negatives, shuffle_selection, BalancedSampler, Candidates, CorpusSeed,
    InsufficientDataError,
};
pub use crate::normalize::{normalize_body, strip_markdown};
pub use crate::export::{rows_from_comments, write_csv, write_json, write_pair, CorpusRow, ExportPaths};

//export robust file ops from util so binaries can import from crate root.
pub use crate::util::{init_tracing_once, open_with_backoff, create_with_backoff, replace_file_atomic_backoff};
