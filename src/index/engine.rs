//! Index engine: durable and scratch line indexes over tantivy
//!
//! Two lifetimes of one abstraction: [`LineIndex`] is either durable
//! (directory-backed, append-only after the initial build) or ephemeral
//! (RAM-backed). [`ScratchIndex`] wraps the ephemeral flavor with a
//! full-replace-on-rebuild contract so the orchestrator can re-search
//! within a restricted candidate subset without ever observing stale
//! contents.

use std::cmp::Ordering;
use std::path::Path;

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, Value, FAST, INDEXED,
    STORED,
};
use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer};
use tantivy::{Index, IndexWriter, TantivyDocument};
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::syntax;
use crate::record::LineRecord;

/// Analyzer registered on every line index.
const TOKENIZER_NAME: &str = "line_text_ru";

/// Writer arena for the durable index.
const DURABLE_WRITER_BUDGET: usize = 50_000_000;
/// Writer arena for scratch rebuilds, which index a handful of lines.
const SCRATCH_WRITER_BUDGET: usize = 15_000_000;

/// Stored field handles.
#[derive(Debug, Clone, Copy)]
struct Fields {
    line_number: Field,
    line_text: Field,
}

/// A full-text index over corpus lines.
#[derive(Debug)]
pub struct LineIndex {
    index: Index,
    fields: Fields,
    writer_budget: usize,
    max_results: usize,
}

impl LineIndex {
    /// Opens an existing durable index.
    ///
    /// A missing, locked or otherwise unopenable directory is
    /// [`SearchError::IndexUnavailable`]; this crate never retries it.
    pub fn open(path: &Path, config: &SearchConfig) -> Result<Self, SearchError> {
        if !path.exists() {
            return Err(SearchError::IndexUnavailable {
                path: path.to_path_buf(),
                message: "index directory does not exist".to_string(),
            });
        }
        let dir = MmapDirectory::open(path).map_err(|e| SearchError::IndexUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let index = Index::open(dir).map_err(|e| SearchError::IndexUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_index(index, config, DURABLE_WRITER_BUDGET)
    }

    /// Creates (or opens) a durable index under `path`.
    pub fn create(path: &Path, config: &SearchConfig) -> Result<Self, SearchError> {
        std::fs::create_dir_all(path)?;
        let dir = MmapDirectory::open(path).map_err(|e| SearchError::IndexUnavailable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let index = Index::open_or_create(dir, build_schema()).map_err(|e| {
            SearchError::IndexUnavailable {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        Self::from_index(index, config, DURABLE_WRITER_BUDGET)
    }

    /// Creates an ephemeral RAM index.
    pub fn in_memory(config: &SearchConfig) -> Result<Self, SearchError> {
        let index = Index::create_in_ram(build_schema());
        Self::from_index(index, config, SCRATCH_WRITER_BUDGET)
    }

    fn from_index(
        index: Index,
        config: &SearchConfig,
        writer_budget: usize,
    ) -> Result<Self, SearchError> {
        register_analyzer(&index, &config.stop_words);
        let schema = index.schema();
        let fields = Fields {
            line_number: schema.get_field("line_number")?,
            line_text: schema.get_field("line_text")?,
        };
        Ok(Self {
            index,
            fields,
            writer_budget,
            max_results: config.max_results,
        })
    }

    /// Indexes `records`, replacing all existing documents when `replace` is
    /// set. Appending requires the index to already hold at least one
    /// document; line numbers are the caller's responsibility and are never
    /// generated or checked here.
    pub fn build(&self, records: &[LineRecord], replace: bool) -> Result<(), SearchError> {
        if !replace && self.doc_count()? == 0 {
            return Err(SearchError::EmptyIndexAppend);
        }

        let mut writer: IndexWriter = self.index.writer(self.writer_budget)?;
        if replace {
            writer.delete_all_documents()?;
        }
        for record in records {
            let mut doc = TantivyDocument::default();
            doc.add_u64(self.fields.line_number, record.line_number);
            doc.add_text(self.fields.line_text, &record.line_text);
            writer.add_document(doc)?;
        }
        writer.commit()?;
        debug!(count = records.len(), replace, "indexed records");
        Ok(())
    }

    /// Number of documents currently searchable.
    pub fn doc_count(&self) -> Result<u64, SearchError> {
        Ok(self.index.reader()?.searcher().num_docs())
    }

    /// Runs a query in the engine's textual syntax, returning hits ordered
    /// by descending score (engine order preserved on ties).
    pub fn search(&self, query: &str, precision: u32) -> Result<Vec<LineRecord>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let similarity = syntax::fuzzy_similarity(precision);
        let Some(parsed) = syntax::build_query(
            &self.index,
            self.fields.line_text,
            TOKENIZER_NAME,
            query,
            similarity,
        )?
        else {
            return Ok(Vec::new());
        };

        let reader = self.index.reader()?;
        let searcher = reader.searcher();
        let top_docs = searcher.search(&parsed, &TopDocs::with_limit(self.max_results))?;

        let mut results = Vec::with_capacity(top_docs.len());
        for (score, address) in top_docs {
            let doc: TantivyDocument = searcher.doc(address)?;
            let line_number = doc
                .get_first(self.fields.line_number)
                .and_then(|v| v.as_u64())
                .unwrap_or_default();
            let line_text = doc
                .get_first(self.fields.line_text)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            results.push(LineRecord {
                line_number,
                line_text,
                score,
            });
        }

        // TopDocs is already score-descending; the stable re-sort keeps the
        // ordering contract explicit and engine order on ties.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(results)
    }
}

/// Volatile index over an explicit candidate subset.
///
/// Every rebuild discards the previous contents entirely; a search before
/// the first rebuild sees an empty index. One instance belongs to exactly
/// one logical search request.
pub struct ScratchIndex {
    config: SearchConfig,
    current: Option<LineIndex>,
}

impl ScratchIndex {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            config: config.clone(),
            current: None,
        }
    }

    /// Replaces the scratch contents with exactly `records`.
    pub fn rebuild(&mut self, records: &[LineRecord]) -> Result<(), SearchError> {
        let index = LineIndex::in_memory(&self.config)?;
        index.build(records, true)?;
        self.current = Some(index);
        Ok(())
    }

    /// Searches the most recent rebuild.
    pub fn search(&self, query: &str, precision: u32) -> Result<Vec<LineRecord>, SearchError> {
        match &self.current {
            Some(index) => index.search(query, precision),
            None => Ok(Vec::new()),
        }
    }
}

fn build_schema() -> Schema {
    let mut builder = Schema::builder();
    builder.add_u64_field("line_number", INDEXED | STORED | FAST);
    let text_options = TextOptions::default().set_stored().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(TOKENIZER_NAME)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    builder.add_text_field("line_text", text_options);
    builder.build()
}

fn register_analyzer(index: &Index, stop_words: &[String]) {
    let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(LowerCaser)
        .filter(StopWordFilter::remove(stop_words.to_vec()))
        .build();
    index.tokenizers().register(TOKENIZER_NAME, analyzer);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SearchConfig {
        SearchConfig::default()
    }

    fn sample_records() -> Vec<LineRecord> {
        vec![
            LineRecord::new(1, "Кабель ВВГ 3х2.5, 100м, ГОСТ"),
            LineRecord::new(2, "Труба ПВХ 20мм, 2м"),
            LineRecord::new(3, "Шуруп мебельный 12мм"),
        ]
    }

    fn built_index() -> LineIndex {
        let index = LineIndex::in_memory(&config()).unwrap();
        index.build(&sample_records(), true).unwrap();
        index
    }

    #[test]
    fn exact_term_search_finds_its_document() {
        let index = built_index();
        // Precision 100 means near-exact matching: a verbatim token of a
        // document must surface that document.
        let hits = index.search("ВВГ", 100).unwrap();
        assert!(hits.iter().any(|r| r.line_number == 1));
    }

    #[test]
    fn fuzzy_search_tolerates_an_edit() {
        let index = built_index();
        let hits = index.search("кобель~", 80).unwrap();
        assert!(hits.iter().any(|r| r.line_number == 1));
    }

    #[test]
    fn results_are_ordered_by_descending_score() {
        let index = built_index();
        let hits = index.search("Кабель~ 100м~ ГОСТ~", 90).unwrap();
        assert!(!hits.is_empty());
        for pair in hits.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn boosted_term_outranks_unboosted_competitor() {
        let index = LineIndex::in_memory(&config()).unwrap();
        index
            .build(
                &[
                    LineRecord::new(1, "кабель медный"),
                    LineRecord::new(2, "труба стальная"),
                ],
                true,
            )
            .unwrap();
        let hits = index.search("кабель^2 труба", 100).unwrap();
        assert_eq!(hits[0].line_number, 1);
    }

    #[test]
    fn stop_words_carry_no_matches() {
        let index = built_index();
        // Both tokens are analyzer stop words; no clause survives.
        let hits = index.search("для на", 90).unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn append_to_empty_index_fails() {
        let index = LineIndex::in_memory(&config()).unwrap();
        let err = index.build(&sample_records(), false).unwrap_err();
        assert!(matches!(err, SearchError::EmptyIndexAppend));
    }

    #[test]
    fn append_extends_an_existing_index() {
        let index = built_index();
        index
            .build(&[LineRecord::new(4, "Гайка оцинкованная М6")], false)
            .unwrap();
        assert_eq!(index.doc_count().unwrap(), 4);
        let hits = index.search("гайка", 100).unwrap();
        assert_eq!(hits[0].line_number, 4);
    }

    #[test]
    fn malformed_query_surfaces_syntax_error() {
        let index = built_index();
        let err = index.search("ка~бель", 90).unwrap_err();
        assert!(matches!(err, SearchError::QuerySyntax(_)));
    }

    #[test]
    fn scratch_rebuild_fully_replaces_contents() {
        let records = sample_records();
        let mut scratch = ScratchIndex::new(&config());

        scratch.rebuild(&records[..1]).unwrap();
        let hits = scratch.search("кабель", 100).unwrap();
        assert_eq!(hits.len(), 1);

        scratch.rebuild(&records[1..2]).unwrap();
        // The first rebuild's document must be gone.
        assert!(scratch.search("кабель", 100).unwrap().is_empty());
        assert_eq!(scratch.search("труба", 100).unwrap().len(), 1);
    }

    #[test]
    fn scratch_before_first_rebuild_is_empty() {
        let scratch = ScratchIndex::new(&config());
        assert!(scratch.search("кабель", 90).unwrap().is_empty());
    }

    #[test]
    fn durable_index_round_trips_through_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let index = LineIndex::create(dir.path(), &config()).unwrap();
            index.build(&sample_records(), true).unwrap();
        }
        let reopened = LineIndex::open(dir.path(), &config()).unwrap();
        assert_eq!(reopened.doc_count().unwrap(), 3);
        let hits = reopened.search("шуруп", 100).unwrap();
        assert_eq!(hits[0].line_number, 3);
    }

    #[test]
    fn missing_index_directory_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("no-index");
        let err = LineIndex::open(&missing, &config()).unwrap_err();
        assert!(matches!(err, SearchError::IndexUnavailable { .. }));
    }
}
