use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::constants::store::{
    BITCODE_PREFIX, INDEX_FORMAT_VERSION, MASTER_FILENAME, TEMP_EXTENSION,
};
use crate::data::CorpusIndex;
use crate::errors::CorpusError;
use crate::types::{GroupKey, PathString, Transcription};

/// Wire record for a persisted index.
#[derive(Clone, Debug, bitcode::Encode, bitcode::Decode)]
struct PersistedIndex {
    version: u8,
    paths: Vec<PathString>,
    transcriptions: Vec<Transcription>,
    group_ids: Vec<GroupKey>,
}

/// File-backed persistence for one index per dataset root.
#[derive(Clone, Debug)]
pub struct IndexStore {
    file_name: String,
}

impl Default for IndexStore {
    fn default() -> Self {
        Self {
            file_name: MASTER_FILENAME.to_string(),
        }
    }
}

impl IndexStore {
    /// Store writing `master.bin` into each dataset root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of the persisted index for `dataset_root`.
    pub fn index_path(&self, dataset_root: &Path) -> PathBuf {
        dataset_root.join(&self.file_name)
    }

    /// True if an index has been persisted for `dataset_root`.
    pub fn exists(&self, dataset_root: &Path) -> bool {
        self.index_path(dataset_root).is_file()
    }

    /// Persist `index`, replacing any previous file.
    ///
    /// The payload is written to a temporary sibling and renamed into place.
    pub fn save(&self, dataset_root: &Path, index: &CorpusIndex) -> Result<PathBuf, CorpusError> {
        let path = self.index_path(dataset_root);
        let payload = encode_index(index)?;
        let tmp_path = temp_path(&path);
        fs::write(&tmp_path, &payload)?;
        fs::rename(&tmp_path, &path)?;
        info!(
            path = %path.display(),
            utterances = index.len(),
            bytes = payload.len(),
            "saved corpus index"
        );
        Ok(path)
    }

    /// Load the index persisted for `dataset_root`.
    pub fn load(&self, dataset_root: &Path) -> Result<CorpusIndex, CorpusError> {
        let path = self.index_path(dataset_root);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CorpusError::NotFound { path });
            }
            Err(err) => return Err(err.into()),
        };
        decode_index(&bytes).map_err(|reason| CorpusError::CorruptIndex { path, reason })
    }

    /// Delete the persisted index (and any leftover temporary file).
    ///
    /// Corpus files are never touched. Returns whether an index was removed.
    pub fn clean(&self, dataset_root: &Path) -> Result<bool, CorpusError> {
        let path = self.index_path(dataset_root);
        remove_if_present(&temp_path(&path))?;
        let removed = remove_if_present(&path)?;
        if removed {
            info!(path = %path.display(), "removed corpus index");
        } else {
            debug!(path = %path.display(), "no corpus index to remove");
        }
        Ok(removed)
    }
}

fn encode_index(index: &CorpusIndex) -> Result<Vec<u8>, CorpusError> {
    let paths = index
        .paths()
        .iter()
        .map(|path| {
            path.to_str().map(str::to_string).ok_or_else(|| {
                CorpusError::Configuration(format!(
                    "audio path {} is not valid UTF-8 and cannot be persisted",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let record = PersistedIndex {
        version: INDEX_FORMAT_VERSION,
        paths,
        transcriptions: index.transcriptions().to_vec(),
        group_ids: index.group_ids().to_vec(),
    };
    let encoded = bitcode::encode(&record);
    let mut out = Vec::with_capacity(1 + encoded.len());
    out.push(BITCODE_PREFIX);
    out.extend_from_slice(&encoded);
    Ok(out)
}

fn decode_index(bytes: &[u8]) -> Result<CorpusIndex, String> {
    let Some((&prefix, payload)) = bytes.split_first() else {
        return Err("file is empty".to_string());
    };
    if prefix != BITCODE_PREFIX {
        return Err("bitcode payload missing expected prefix".to_string());
    }
    let record: PersistedIndex =
        bitcode::decode(payload).map_err(|err| format!("failed to decode index: {err}"))?;
    if record.version != INDEX_FORMAT_VERSION {
        return Err(format!(
            "index format version mismatch (expected {}, found {})",
            INDEX_FORMAT_VERSION, record.version
        ));
    }
    CorpusIndex::from_parts(
        record.paths.into_iter().map(PathBuf::from).collect(),
        record.transcriptions,
        record.group_ids,
    )
    .map_err(|err| err.to_string())
}

fn temp_path(path: &Path) -> PathBuf {
    path.with_extension(TEMP_EXTENSION)
}

fn remove_if_present(path: &Path) -> Result<bool, CorpusError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_index() -> CorpusIndex {
        CorpusIndex::from_parts(
            vec![
                PathBuf::from("dev-clean/19/198/19-198-0001.flac"),
                PathBuf::from("dev-clean/19/198/19-198-0002.flac"),
                PathBuf::from("dev-clean/26/495/26-495-0001.flac"),
            ],
            vec![
                "NORTHANGER ABBEY".to_string(),
                "".to_string(),
                "CHAPTER ONE".to_string(),
            ],
            vec!["198".to_string(), "198".to_string(), "495".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn save_then_load_round_trips() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        let index = sample_index();

        let path = store.save(temp.path(), &index).unwrap();
        assert_eq!(path, temp.path().join("master.bin"));
        assert!(!temp.path().join("master.tmp").exists());
        assert_eq!(store.load(temp.path()).unwrap(), index);
    }

    #[test]
    fn save_overwrites_previous_index() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        store.save(temp.path(), &sample_index()).unwrap();
        store.save(temp.path(), &CorpusIndex::new()).unwrap();

        assert!(store.load(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn load_missing_index_is_not_found() {
        let temp = tempdir().unwrap();
        let err = IndexStore::new().load(temp.path()).unwrap_err();
        assert!(matches!(err, CorpusError::NotFound { .. }));
    }

    #[test]
    fn load_rejects_corrupt_payloads() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        let path = store.index_path(temp.path());

        let valid = encode_index(&sample_index()).unwrap();
        let truncated = valid[..valid.len() / 2].to_vec();
        for payload in [Vec::new(), b"not an index".to_vec(), truncated] {
            fs::write(&path, &payload).unwrap();
            let err = store.load(temp.path()).unwrap_err();
            assert!(
                matches!(err, CorpusError::CorruptIndex { .. }),
                "payload {payload:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn load_rejects_unknown_version() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        let record = PersistedIndex {
            version: INDEX_FORMAT_VERSION + 1,
            paths: Vec::new(),
            transcriptions: Vec::new(),
            group_ids: Vec::new(),
        };
        let mut bytes = vec![BITCODE_PREFIX];
        bytes.extend_from_slice(&bitcode::encode(&record));
        fs::write(store.index_path(temp.path()), bytes).unwrap();

        let err = store.load(temp.path()).unwrap_err();
        assert!(matches!(
            err,
            CorpusError::CorruptIndex { ref reason, .. } if reason.contains("version")
        ));
    }

    #[test]
    fn clean_removes_only_the_index() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        let corpus_file = temp.path().join("19-198.trans.txt");
        fs::write(&corpus_file, "19-198-0001 KEEP ME\n").unwrap();
        store.save(temp.path(), &sample_index()).unwrap();

        assert!(store.clean(temp.path()).unwrap());
        assert!(!store.exists(temp.path()));
        assert!(corpus_file.exists());
    }

    #[test]
    fn clean_removes_leftover_temp_file_and_index() {
        let temp = tempdir().unwrap();
        let store = IndexStore::new();
        let index_path = store.save(temp.path(), &sample_index()).unwrap();
        let tmp = temp_path(&index_path);
        assert_ne!(tmp, index_path);
        fs::write(&tmp, b"interrupted save").unwrap();

        assert!(store.clean(temp.path()).unwrap());
        assert!(!tmp.exists());
        assert!(!index_path.exists());
    }

    #[test]
    fn clean_without_index_is_a_noop() {
        let temp = tempdir().unwrap();
        assert!(!IndexStore::new().clean(temp.path()).unwrap());
        assert!(!IndexStore::new().clean(&temp.path().join("absent")).unwrap());
    }
}
