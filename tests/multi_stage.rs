//! End-to-end tests over the staged search pipeline, against a durable
//! on-disk index.

use std::io::Write;

use lineseek::{LineIndex, LineRecord, LineSearcher, SearchConfig, SearchError};

fn build_searcher(dir: &std::path::Path, lines: &[&str]) -> LineSearcher {
    let config = SearchConfig::default();
    let index = LineIndex::create(dir, &config).unwrap();
    let records: Vec<LineRecord> = lines
        .iter()
        .enumerate()
        .map(|(i, text)| LineRecord::new(i as u64 + 1, *text))
        .collect();
    index.build(&records, true).unwrap();
    LineSearcher::open(dir, config).unwrap()
}

#[test]
fn cable_query_ranks_the_cable_line_first() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &["Кабель ВВГ 3х2.5, 100м, ГОСТ", "Труба ПВХ 20мм, 2м"],
    );

    let hits = searcher.search_multi_stage("Кабель 100м", 90).unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].line_number, 1);
    assert!(hits.iter().all(|r| r.line_number != 2));
}

#[test]
fn narrowing_discriminates_within_fuzzy_anchor_hits() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &[
            "Кабель ВВГ 3х2.5, 100м, ГОСТ",
            "Труба ПВХ 20мм, 2м",
            "Кобель сторожевой, 100м провод",
        ],
    );

    // At precision 80 the anchor tolerates one edit and reaches line 3;
    // the narrowing pass keeps both cable-ish lines, never the pipe.
    let hits = searcher.search_multi_stage("Кабель 100м", 80).unwrap();
    let numbers: Vec<u64> = hits.iter().map(|r| r.line_number).collect();
    assert!(numbers.contains(&1));
    assert!(numbers.contains(&3));
    assert!(!numbers.contains(&2));
}

#[test]
fn quoted_token_drives_the_anchor_stage() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &[
            "Профиль ПВХ 20х40, белый",
            "Труба стальная",
            "Профиль алюминиевый 40х60",
        ],
    );

    let hits = searcher
        .search_multi_stage("обычный \"Профиль\" 20х40", 90)
        .unwrap();
    let numbers: Vec<u64> = hits.iter().map(|r| r.line_number).collect();
    assert_eq!(hits[0].line_number, 1);
    assert!(numbers.contains(&3));
    assert!(!numbers.contains(&2));
}

#[test]
fn exact_token_search_finds_its_line_at_full_precision() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &["Шуруп мебельный 12мм", "Гайка оцинкованная М6"],
    );

    let hits = searcher.search_multi_stage("Шуруп", 100).unwrap();
    assert!(hits.iter().any(|r| r.line_number == 1));
}

#[test]
fn results_are_ordered_by_descending_score() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &[
            "Кабель медный 100м ГОСТ",
            "Кабель алюминиевый 50м",
            "Кобель дворовый",
            "Труба ПВХ",
        ],
    );

    let hits = searcher.search_multi_stage("Кабель медный 100м", 80).unwrap();
    assert!(hits.len() > 1);
    assert_eq!(hits[0].line_number, 1);
    for pair in hits.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn adjective_only_query_takes_the_fallback_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &["Профиль ПВХ 20х40 оцинкованный белый", "Труба стальная 20мм"],
    );

    let hits = searcher
        .search_multi_stage("оцинкованный 20х40", 80)
        .unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0].line_number, 1);
}

#[test]
fn empty_and_unsearchable_queries_return_empty_sets() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(dir.path(), &["Кабель ВВГ"]);

    assert!(searcher.search_multi_stage("", 90).unwrap().is_empty());
    assert!(searcher.search_multi_stage("?? !! ~~", 90).unwrap().is_empty());
}

#[test]
fn short_search_skips_the_staged_pipeline() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(
        dir.path(),
        &["Кабель медный силовой", "Труба стальная оцинкованная"],
    );

    let hits = searcher.search_short("кабель-медный", 80).unwrap();
    assert!(hits.iter().any(|r| r.line_number == 1));
}

#[test]
fn appended_lines_become_searchable_with_continued_numbering() {
    let dir = tempfile::TempDir::new().unwrap();
    let searcher = build_searcher(dir.path(), &["Кабель ВВГ 3х2.5"]);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "Гайка оцинкованная М6").unwrap();
    writeln!(file, "Шуруп мебельный 12мм").unwrap();

    let count = searcher.append_file(file.path()).unwrap();
    assert_eq!(count, 3);

    let hits = searcher.search_multi_stage("Шуруп", 100).unwrap();
    assert_eq!(hits[0].line_number, 3);

    let count = searcher.append_line("Болт анкерный М10").unwrap();
    assert_eq!(count, 4);
    let hits = searcher.search_multi_stage("Болт", 100).unwrap();
    assert_eq!(hits[0].line_number, 4);
}

#[test]
fn opening_a_missing_index_fails_without_retry() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("absent");
    let err = LineSearcher::open(&missing, SearchConfig::default()).unwrap_err();
    assert!(matches!(err, SearchError::IndexUnavailable { .. }));
}
