//! Line-file ingestion
//!
//! Reads a corpus file into [`LineRecord`]s with caller-visible numbering.
//! The file is opened with shared read access so an external writer holding
//! the file open does not block ingestion.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::SearchError;
use crate::record::LineRecord;

/// Reads every line of `path`, numbering lines from 1.
pub fn read_lines(path: &Path) -> Result<Vec<LineRecord>, SearchError> {
    read_lines_from(path, 0)
}

/// Reads every line of `path`, numbering lines from `start + 1`.
///
/// Used by index appends: the caller passes the current document count so
/// new records continue the existing numbering without reuse.
pub fn read_lines_from(path: &Path, start: u64) -> Result<Vec<LineRecord>, SearchError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (offset, line) in reader.lines().enumerate() {
        let line = line?;
        records.push(LineRecord::new(start + offset as u64 + 1, line));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn numbers_lines_from_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Кабель ВВГ 3х2.5").unwrap();
        writeln!(file, "Труба ПВХ 20мм").unwrap();

        let records = read_lines(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[0].line_text, "Кабель ВВГ 3х2.5");
        assert_eq!(records[1].line_number, 2);
    }

    #[test]
    fn continues_numbering_for_appends() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Шуруп мебельный").unwrap();

        let records = read_lines_from(file.path(), 42).unwrap();
        assert_eq!(records[0].line_number, 43);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_lines(Path::new("/nonexistent/corpus.txt")).unwrap_err();
        assert!(matches!(err, SearchError::Io(_)));
    }
}
