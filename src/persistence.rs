// File: src/persistence.rs
use crate::core::lexicon::{DictionaryFormat, Lexicon};
use crate::error::PipelineError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;
use tempfile::NamedTempFile;

const SNAPSHOT_VERSION: u32 = 1;

/// Identifies the dictionary file a snapshot was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct SourceStamp {
    len: u64,
    modified_secs: u64,
    modified_nanos: u32,
}

impl SourceStamp {
    fn of(path: &Path) -> Result<Self, PipelineError> {
        let metadata = fs::metadata(path).map_err(|e| PipelineError::from_open(path, e))?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .unwrap_or_default();
        Ok(Self {
            len: metadata.len(),
            modified_secs: modified.as_secs(),
            modified_nanos: modified.subsec_nanos(),
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
struct LexiconSnapshot {
    version: u32,
    source: SourceStamp,
    format: DictionaryFormat,
    lexicon: Lexicon,
}

pub fn save_snapshot(
    lexicon: &Lexicon,
    format: DictionaryFormat,
    source_path: &Path,
    path: &Path,
) -> Result<(), PipelineError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let snapshot = LexiconSnapshot {
        version: SNAPSHOT_VERSION,
        source: SourceStamp::of(source_path)?,
        format,
        lexicon: lexicon.clone(),
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, &snapshot)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| PipelineError::Io(e.error))?;
    tracing::debug!("wrote lexicon snapshot to {}", path.display());
    Ok(())
}

/// Loads a snapshot if it was built from the current `source_path` with the
/// same format. Returns `Ok(None)` for a stale snapshot.
pub fn load_snapshot(
    path: &Path,
    format: DictionaryFormat,
    source_path: &Path,
) -> Result<Option<Lexicon>, PipelineError> {
    let file = File::open(path).map_err(|e| PipelineError::from_open(path, e))?;
    let reader = BufReader::new(file);
    let snapshot: LexiconSnapshot = bincode::deserialize_from(reader)?;

    if snapshot.version != SNAPSHOT_VERSION
        || snapshot.format != format
        || snapshot.source != SourceStamp::of(source_path)?
    {
        return Ok(None);
    }
    Ok(Some(snapshot.lexicon))
}

/// Loads the dictionary, going through the snapshot at `snapshot_path` when
/// one is configured. A missing, stale, or unreadable snapshot is rebuilt
/// from the source file.
pub fn load_lexicon(
    dictionary_path: &Path,
    format: DictionaryFormat,
    snapshot_path: Option<&Path>,
) -> Result<Lexicon, PipelineError> {
    let Some(snapshot_path) = snapshot_path else {
        return Lexicon::from_path(dictionary_path, format).map(|(lexicon, _)| lexicon);
    };

    match load_snapshot(snapshot_path, format, dictionary_path) {
        Ok(Some(lexicon)) => {
            tracing::info!(
                "loaded {} dictionary entries from snapshot {}",
                lexicon.len(),
                snapshot_path.display()
            );
            return Ok(lexicon);
        }
        Ok(None) => tracing::info!("snapshot {} is stale, rebuilding", snapshot_path.display()),
        Err(PipelineError::MissingInput(_)) => {}
        Err(e) => tracing::warn!("ignoring snapshot {}: {}", snapshot_path.display(), e),
    }

    let (lexicon, _) = Lexicon::from_path(dictionary_path, format)?;
    if let Err(e) = save_snapshot(&lexicon, format, dictionary_path, snapshot_path) {
        tracing::warn!("could not write snapshot {}: {}", snapshot_path.display(), e);
    }
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_dictionary(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_snapshot_roundtrip_matches_source() {
        let dir = tempdir().unwrap();
        let dict = dir.path().join("dict.txt");
        let snap = dir.path().join("cache/lexicon.bin");
        write_dictionary(&dict, "bird\tbɝd\nread\tɹiːd, ɹɛd\n");

        let built = load_lexicon(&dict, DictionaryFormat::Ipa, Some(&snap)).unwrap();
        assert!(snap.exists());

        let cached = load_snapshot(&snap, DictionaryFormat::Ipa, &dict)
            .unwrap()
            .unwrap();
        assert_eq!(cached.len(), built.len());
        assert_eq!(cached.get("read").unwrap().pronunciations, vec!["ɹiːd", "ɹɛd"]);
    }

    #[test]
    fn test_stale_snapshot_is_ignored() {
        let dir = tempdir().unwrap();
        let dict = dir.path().join("dict.txt");
        let snap = dir.path().join("lexicon.bin");
        write_dictionary(&dict, "bird\tbɝd\n");
        load_lexicon(&dict, DictionaryFormat::Ipa, Some(&snap)).unwrap();

        write_dictionary(&dict, "bird\tbɝd\ncat\tkæt\n");
        assert!(load_snapshot(&snap, DictionaryFormat::Ipa, &dict).unwrap().is_none());

        let rebuilt = load_lexicon(&dict, DictionaryFormat::Ipa, Some(&snap)).unwrap();
        assert!(rebuilt.get("cat").is_some());
    }

    #[test]
    fn test_format_change_invalidates_snapshot() {
        let dir = tempdir().unwrap();
        let dict = dir.path().join("dict.txt");
        let snap = dir.path().join("lexicon.bin");
        write_dictionary(&dict, "bird\tbɝd\n");
        load_lexicon(&dict, DictionaryFormat::Ipa, Some(&snap)).unwrap();
        assert!(load_snapshot(&snap, DictionaryFormat::Auto, &dict).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_source() {
        let dir = tempdir().unwrap();
        let dict = dir.path().join("dict.txt");
        let snap = dir.path().join("lexicon.bin");
        write_dictionary(&dict, "bird\tbɝd\n");
        fs::write(&snap, b"not a snapshot").unwrap();

        let lexicon = load_lexicon(&dict, DictionaryFormat::Ipa, Some(&snap)).unwrap();
        assert_eq!(lexicon.len(), 1);
    }
}
