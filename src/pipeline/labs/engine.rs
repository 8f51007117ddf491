use super::merge::merge;
use super::profile::detect_profile;
use super::report::assemble;
use super::strategies::{default_strategies, ExtractionStrategy, StrategyInput};
use super::synonyms::SynonymDictionary;
use crate::config::EngineConfig;
use crate::models::{ExtractionCounts, ReportResult, StrategyCount};
use crate::pipeline::extraction::{
    flatten_line, reconstruct_pages, sanitize_report_text, split_gutters, ReconstructedLine,
    TokenPage,
};

/// Runs every strategy over one report and merges the results.
///
/// Holds no per-report state: one engine can serve any number of
/// extractions, concurrently if shared behind a reference.
pub struct LabEngine<'d> {
    config: EngineConfig,
    dictionary: &'d SynonymDictionary,
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl<'d> LabEngine<'d> {
    pub fn new(config: EngineConfig, dictionary: &'d SynonymDictionary) -> Self {
        Self {
            config,
            dictionary,
            strategies: default_strategies(),
        }
    }

    /// Replace the strategy set. Order is merge priority.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract analytes from redacted report text, with positioned tokens
    /// when the text extractor provided them. Never fails: a document with
    /// nothing recognizable yields an empty report.
    pub fn extract(&self, text: &str, pages: Option<&[TokenPage]>) -> ReportResult {
        // Step 1: Normalize the text
        let sanitized = sanitize_report_text(text);
        let pages = pages.filter(|p| p.iter().any(|page| !page.tokens.is_empty()));

        // Step 2: Column-aware lines, from tokens when present
        let layout_lines: Vec<ReconstructedLine> = match pages {
            Some(pages) => {
                reconstruct_pages(pages, self.config.row_tolerance, self.config.column_gap)
            }
            None => split_gutters(&sanitized, self.config.gutter_min_spaces),
        };

        // Step 3: Flattened lines for the line-based strategies
        let mut lines: Vec<String> = sanitized
            .lines()
            .map(flatten_line)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() && pages.is_some() {
            lines = layout_lines
                .iter()
                .map(|l| l.plain_text())
                .filter(|l| !l.is_empty())
                .collect();
        }

        // Step 4: Profile
        let profile_text = if sanitized.is_empty() {
            lines.join("\n")
        } else {
            sanitized
        };
        let profile = detect_profile(&profile_text, &layout_lines);

        // Step 5: Every strategy over the same input
        let input = StrategyInput {
            lines: &lines,
            layout_lines: &layout_lines,
            profile: &profile,
            config: &self.config,
        };
        let candidates: Vec<_> = self
            .strategies
            .iter()
            .map(|strategy| {
                let items = strategy.extract(&input, self.dictionary);
                tracing::debug!(
                    strategy = %strategy.kind(),
                    candidates = items.len(),
                    "Strategy finished"
                );
                (strategy.kind(), items)
            })
            .collect();

        let counts_per_strategy: Vec<StrategyCount> = candidates
            .iter()
            .map(|(kind, items)| StrategyCount {
                strategy: *kind,
                candidates: items.len(),
            })
            .collect();
        let lists: Vec<_> = candidates.into_iter().map(|(_, items)| items).collect();

        // Step 6: Merge and assemble
        let outcome = merge(&lists);
        let merged = outcome.items.len();
        let mut report = assemble(outcome.items, self.dictionary);

        report.diagnostics.counts = ExtractionCounts {
            lines: lines.len(),
            layout_lines: layout_lines.len(),
            candidates: counts_per_strategy,
            duplicates_dropped: outcome.duplicates_dropped,
            percent_dropped: outcome.percent_dropped,
            merged,
            reported: report.items.len(),
        };
        report.diagnostics.profile_hints = profile;

        tracing::info!(
            lines = lines.len(),
            items = report.items.len(),
            laboratory = report
                .diagnostics
                .profile_hints
                .laboratory
                .as_deref()
                .unwrap_or("unknown"),
            "Lab extraction complete"
        );
        report
    }
}

impl LabEngine<'static> {
    /// Default configuration and the built-in dictionary.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), SynonymDictionary::builtin())
    }
}

impl std::fmt::Debug for LabEngine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabEngine")
            .field("config", &self.config)
            .field("dictionary_entries", &self.dictionary.len())
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Extract with the default configuration and built-in dictionary.
pub fn extract(text: &str, pages: Option<&[TokenPage]>) -> ReportResult {
    LabEngine::with_defaults().extract(text, pages)
}
