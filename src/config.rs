use std::path::{Path, PathBuf};

/// Seed used for negative sampling and the final shuffle unless overridden.
pub const DEFAULT_SEED: u64 = 42;

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct CorpusOptions {
    pub input: PathBuf,               // single export file or a directory of them
    pub out_dir: PathBuf,
    pub stem: String,                 // artifact base name, e.g. "reddit" -> reddit.csv
    pub cleaned_suffix: String,       // appended to the stem for normalized artifacts
    pub seed: u64,
    pub progress: bool,               // show progress bars
    pub pretty_json: bool,            // 4-space indented JSON array

    // IO tuning
    pub read_buffer_bytes: usize,     // BufReader capacity
    pub write_buffer_bytes: usize,    // BufWriter capacity
}

impl Default for CorpusOptions {
    fn default() -> Self {
        let data = PathBuf::from("../data/reddit");
        Self {
            input: data.join("cmv_20161111"),
            out_dir: data,
            stem: "reddit".to_string(),
            cleaned_suffix: "_cleaned".to_string(),
            seed: DEFAULT_SEED,
            progress: true,
            pretty_json: true,

            read_buffer_bytes: 256 * 1024,
            write_buffer_bytes: 256 * 1024,
        }
    }
}

impl CorpusOptions {
    pub fn with_input(mut self, input: impl AsRef<Path>) -> Self {
        self.input = input.as_ref().to_path_buf();
        self
    }
    pub fn with_out_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.out_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_stem(mut self, stem: impl AsRef<str>) -> Self {
        let s = stem.as_ref().trim();
        if !s.is_empty() {
            self.stem = s.to_string();
        }
        self
    }
    pub fn with_cleaned_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.cleaned_suffix = suffix.into();
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_pretty_json(mut self, yes: bool) -> Self {
        self.pretty_json = yes;
        self
    }

    // IO buffers tuning
    pub fn with_io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self {
        self.read_buffer_bytes = read_bytes.max(8 * 1024);
        self.write_buffer_bytes = write_bytes.max(8 * 1024);
        self
    }
}
