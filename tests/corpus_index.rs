use std::fs;
use std::path::{Path, PathBuf};

use librispeech_index::{CorpusError, CorpusIndex, IndexBuilder, IndexStore};
use tempfile::tempdir;

fn write_chapter(root: &Path, reader: &str, chapter: &str, lines: &[&str]) -> PathBuf {
    let dir = root.join(reader).join(chapter);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join(format!("{reader}-{chapter}.trans.txt")),
        lines.join("\n"),
    )
    .unwrap();
    for line in lines {
        if let Some(id) = line.split_whitespace().next() {
            fs::write(dir.join(format!("{id}.flac")), b"fLaC").unwrap();
        }
    }
    dir
}

fn assert_parallel(index: &CorpusIndex) {
    assert_eq!(index.paths().len(), index.transcriptions().len());
    assert_eq!(index.paths().len(), index.group_ids().len());
    assert_eq!(index.iter().count(), index.len());
}

#[test]
fn built_index_groups_utterances_in_discovery_order() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("dev-clean");
    let a = write_chapter(
        &root,
        "1",
        "A",
        &["1-A-0001 THE FIRST   LINE", "1-A-0002 THE SECOND LINE"],
    );
    let b = write_chapter(&root, "2", "B", &["2-B-0003 THIRD", "2-B-0001 FIRST OF B"]);

    let index = IndexBuilder::new().build(&root).unwrap();
    assert_parallel(&index);

    assert_eq!(index.group_ids(), ["A", "A", "B", "B"]);
    assert_eq!(
        index.transcriptions(),
        ["THE FIRST LINE", "THE SECOND LINE", "THIRD", "FIRST OF B"]
    );
    assert_eq!(
        index.paths(),
        [
            a.join("1-A-0001.flac"),
            a.join("1-A-0002.flac"),
            b.join("2-B-0003.flac"),
            b.join("2-B-0001.flac"),
        ]
    );
}

#[test]
fn referenced_audio_is_not_required_to_exist() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("dev-clean");
    let dir = root.join("1234").join("5678");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("1234-5678.trans.txt"), "1234-0001 HELLO WORLD\n").unwrap();

    let index = IndexBuilder::new().build(&root).unwrap();
    let entry = index.get(0).unwrap();
    assert_eq!(entry.transcription, "HELLO WORLD");
    assert_eq!(entry.path, dir.join("1234-0001.flac"));
    assert!(!entry.path.exists());
}

#[test]
fn build_save_load_round_trip() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("test-clean");
    write_chapter(&root, "19", "198", &["19-198-0001 NORTHANGER ABBEY"]);
    write_chapter(&root, "19", "227", &["19-227-0001 CHAPTER ONE", "19-227-0002 CATHERINE"]);

    let index = IndexBuilder::new().build(&root).unwrap();
    let store = IndexStore::new();
    store.save(&root, &index).unwrap();

    let loaded = store.load(&root).unwrap();
    assert_eq!(loaded, index);
    assert_parallel(&loaded);

    // The saved index sits in the dataset root and does not disturb a rebuild.
    let rebuilt = IndexBuilder::new().build(&root).unwrap();
    assert_eq!(rebuilt, index);
}

#[test]
fn missing_transcript_fails_build_and_nothing_is_persisted() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("dev-other");
    write_chapter(&root, "1", "A", &["1-A-0001 FINE"]);
    let broken = root.join("2").join("B");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("2-B-0001.flac"), b"fLaC").unwrap();

    let store = IndexStore::new();
    match IndexBuilder::new().build(&root) {
        Err(CorpusError::MalformedCorpus { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected malformed corpus, got {other:?}"),
    }
    assert!(!store.exists(&root));
    assert!(matches!(
        store.load(&root),
        Err(CorpusError::NotFound { .. })
    ));
}

#[test]
fn clean_is_idempotent_and_keeps_corpus() {
    let temp = tempdir().unwrap();
    let root = temp.path().join("dev-clean");
    let chapter = write_chapter(&root, "1", "A", &["1-A-0001 KEEP"]);
    let store = IndexStore::new();

    assert!(!store.clean(&root).unwrap());
    store
        .save(&root, &IndexBuilder::new().build(&root).unwrap())
        .unwrap();
    assert!(store.clean(&root).unwrap());
    assert!(!store.clean(&root).unwrap());
    assert!(chapter.join("1-A.trans.txt").exists());
    assert!(chapter.join("1-A-0001.flac").exists());
}
