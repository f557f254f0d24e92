// File: src/csv_io.rs
use crate::core::types::{Dataset, WordEntry};
use crate::error::{ParseError, PipelineError};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const WORD_COLUMN: &str = "word";

/// Counters from reading a CSV file record by record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    pub records: u64,
    pub skipped: u64,
}

/// Reads the `word` column of a CSV file. Blank words and unreadable rows
/// are skipped; a missing `word` column rejects the file.
pub fn read_words(path: &Path) -> Result<(Vec<String>, ReadStats), PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
    let result = read_words_from(file)?;
    tracing::info!(
        "read {} words from {} ({} rows skipped)",
        result.0.len(),
        path.display(),
        result.1.skipped
    );
    Ok(result)
}

pub fn read_words_from<R: Read>(reader: R) -> Result<(Vec<String>, ReadStats), PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let column = csv_reader
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}') == WORD_COLUMN)
        .ok_or_else(|| ParseError::MissingColumn(WORD_COLUMN.to_string()))?;

    let mut words = Vec::new();
    let mut stats = ReadStats::default();
    for (i, record) in csv_reader.records().enumerate() {
        stats.records += 1;
        let word = match record {
            Ok(record) => record.get(column).unwrap_or("").to_string(),
            Err(e) => {
                let err = ParseError::Record {
                    record: i as u64 + 1,
                    message: e.to_string(),
                };
                tracing::warn!("skipping {}", err);
                stats.skipped += 1;
                continue;
            }
        };
        if word.is_empty() {
            stats.skipped += 1;
            continue;
        }
        words.push(word);
    }
    Ok((words, stats))
}

/// Reads a `word,ipa,source` dataset. Rows that do not deserialize are
/// logged and skipped.
pub fn read_dataset(path: &Path) -> Result<(Dataset, ReadStats), PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
    read_dataset_from(file)
}

pub fn read_dataset_from<R: Read>(reader: R) -> Result<(Dataset, ReadStats), PipelineError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut dataset = Vec::new();
    let mut stats = ReadStats::default();
    for (i, record) in csv_reader.deserialize::<WordEntry>().enumerate() {
        stats.records += 1;
        match record {
            Ok(entry) => dataset.push(entry),
            Err(e) => {
                tracing::warn!("skipping dataset record {}: {}", i + 1, e);
                stats.skipped += 1;
            }
        }
    }
    Ok((dataset, stats))
}

/// Writes `contents` through a temp file in the target directory, then
/// renames it into place.
fn write_atomically<F>(path: &Path, contents: F) -> Result<(), PipelineError>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<(), PipelineError>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        contents(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    Ok(())
}

pub fn write_dataset(path: &Path, dataset: &[WordEntry]) -> Result<(), PipelineError> {
    write_atomically(path, |writer| {
        let mut csv_writer = csv::Writer::from_writer(writer);
        if dataset.is_empty() {
            csv_writer.write_record(["word", "ipa", "source"])?;
        }
        for entry in dataset {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush()?;
        Ok(())
    })?;
    tracing::info!("wrote {} records to {}", dataset.len(), path.display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PipelineError> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writer.write_all(b"\n")?;
        Ok(())
    })
}

#[cfg(test)]
#[path = "csv_io_test.rs"]
mod tests;
