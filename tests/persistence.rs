#![allow(unused)]

mod common;

use std::fs;
use std::path::PathBuf;

use chainfs::{BLOCK_SIZE, FileStore, FileVolume, VOLUME_SIZE};

fn temp_image(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("chainfs-{}-{}.img", tag, std::process::id()));
    let _ = fs::remove_file(&path);
    path
}

#[test]
fn reopen_reproduces_files_exactly() {
    let path = temp_image("reopen");
    let contents: Vec<(&str, Vec<u8>)> = vec![
        ("empty", Vec::new()),
        ("small", b"hello world".to_vec()),
        ("exact", vec![0x5au8; BLOCK_SIZE]),
        ("multi", (0..3 * BLOCK_SIZE + 7).map(|i| (i % 256) as u8).collect()),
    ];

    {
        let store = FileStore::open(FileVolume::open(&path).unwrap(), VOLUME_SIZE).unwrap();
        for (name, data) in &contents {
            store.create(name).unwrap();
            store.write(name, data).unwrap();
        }
        store.create("doomed").unwrap();
        store.write("doomed", b"gone soon").unwrap();
        store.delete("doomed").unwrap();
        store.flush().unwrap();
        log!("wrote {} file(s) to {}", contents.len(), path.display());
    }

    // A second open over the same image must reproduce everything, with
    // no extra or missing entries.
    let store = FileStore::open(FileVolume::open(&path).unwrap(), VOLUME_SIZE).unwrap();
    let names: Vec<String> = contents.iter().map(|(n, _)| n.to_string()).collect();
    assert_eq!(store.list(), names);
    for (name, data) in &contents {
        assert_eq!(store.read(name).unwrap(), *data, "content of {name}");
    }

    let _ = fs::remove_file(&path);
}

#[test]
fn reopened_store_keeps_allocations_consistent() {
    let path = temp_image("realloc");

    {
        let store = FileStore::open(FileVolume::open(&path).unwrap(), VOLUME_SIZE).unwrap();
        store.create("keep").unwrap();
        store.write("keep", &vec![1u8; 2 * BLOCK_SIZE]).unwrap();
    }

    // Writing through a reopened store must not clobber surviving data.
    let store = FileStore::open(FileVolume::open(&path).unwrap(), VOLUME_SIZE).unwrap();
    store.create("next").unwrap();
    store.write("next", &vec![2u8; 2 * BLOCK_SIZE]).unwrap();
    assert_eq!(store.read("keep").unwrap(), vec![1u8; 2 * BLOCK_SIZE]);
    assert_eq!(store.read("next").unwrap(), vec![2u8; 2 * BLOCK_SIZE]);

    let _ = fs::remove_file(&path);
}
