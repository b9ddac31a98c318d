use crate::attribution::{attribute_all, AttributionStats};
use crate::config::CorpusOptions;
use crate::export::{rows_from_comments, write_pair, CorpusRow, ExportPaths};
use crate::loader::load_posts;
use crate::sampler::{partition_candidates, BalancedSampler};
use crate::tree::{build_forest, ForestStats, Post};
use crate::util::init_tracing_once;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct CorpusBuilder {
    pub(crate) opts: CorpusOptions,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What a run produced.
#[derive(Clone, Debug)]
pub struct CorpusSummary {
    pub forest: ForestStats,
    pub attribution: AttributionStats,
    pub positives: usize,
    pub negative_candidates: usize,
    pub selected: usize,
    pub paths: ExportPaths,
    pub elapsed: Duration,
}

/// Attributed forest, ready for sampling.
pub struct Forest {
    pub posts: Vec<Post>,
    pub stats: ForestStats,
    pub attribution: AttributionStats,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self { opts: CorpusOptions::default() }
    }

    pub fn with_options(opts: CorpusOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CorpusOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn input(mut self, input: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input(input); self }
    pub fn out_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_out_dir(dir); self }
    pub fn stem(mut self, stem: impl AsRef<str>) -> Self { self.opts = self.opts.with_stem(stem); self }
    pub fn cleaned_suffix(mut self, suffix: impl Into<String>) -> Self { self.opts = self.opts.with_cleaned_suffix(suffix); self }
    pub fn seed(mut self, seed: u64) -> Self { self.opts = self.opts.with_seed(seed); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn pretty_json(mut self, yes: bool) -> Self { self.opts = self.opts.with_pretty_json(yes); self }
    pub fn io_buffers(mut self, read_bytes: usize, write_bytes: usize) -> Self { self.opts = self.opts.with_io_buffers(read_bytes, write_bytes); self }

    pub fn export_paths(&self) -> ExportPaths {
        ExportPaths::for_stem(&self.opts.out_dir, &self.opts.stem, &self.opts.cleaned_suffix)
    }

    /// Load, build and attribute every thread under the configured input.
    pub fn build_forest(&self) -> Result<Forest> {
        init_tracing_once();
        let raws = load_posts(&self.opts.input, self.opts.read_buffer_bytes, self.opts.progress)?;
        let (mut posts, stats) = build_forest(&raws, self.opts.progress);
        drop(raws);
        tracing::info!(
            "Built {} threads with {} comments ({} dropped for unresolvable parents).",
            stats.posts,
            stats.comments,
            stats.dropped
        );
        let attribution = attribute_all(&mut posts);
        Ok(Forest { posts, stats, attribution })
    }

    /// Full run: sample, then write the raw and the normalized artifact pairs.
    /// Nothing is written when sampling fails.
    pub fn run(self) -> Result<CorpusSummary> {
        let started = Instant::now();
        let forest = self.build_forest()?;

        let candidates = partition_candidates(&forest.posts);
        let positives = candidates.positives.len();
        let negative_candidates = candidates.negatives.len();
        tracing::info!("{positives} OP-delta comments, {negative_candidates} negative candidates.");

        let sampler = BalancedSampler::new(self.opts.seed);
        let selected = sampler.select_from(&candidates)?;
        let raw_rows = rows_from_comments(&selected);

        let paths = self.export_paths();
        let write_buf = self.opts.write_buffer_bytes;
        let pretty = self.opts.pretty_json;
        let cleaned: Vec<CorpusRow> = raw_rows.iter().map(CorpusRow::normalized).collect();
        let exported = write_pair(&raw_rows, &paths.raw_csv, &paths.raw_json, pretty, write_buf)
            .and_then(|()| write_pair(&cleaned, &paths.cleaned_csv, &paths.cleaned_json, pretty, write_buf));
        if let Err(e) = exported {
            // All four artifacts or none.
            paths.remove_existing();
            return Err(e);
        }

        let elapsed = started.elapsed();
        tracing::info!("Corpus finished in {:.2} seconds.", elapsed.as_secs_f64());
        Ok(CorpusSummary {
            forest: forest.stats,
            attribution: forest.attribution,
            positives,
            negative_candidates,
            selected: selected.len(),
            paths,
            elapsed,
        })
    }
}
