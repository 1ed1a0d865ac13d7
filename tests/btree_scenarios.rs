//! End-to-end scenarios against the public API: attach/detach round-trips
//! over a memory-mapped device file, split behavior under ordered and
//! reversed workloads, and device exhaustion.

use oakdb::{BTreeIndex, BlockDevice, DisplayMode, Error, MemDevice, MmapDevice};
use tempfile::tempdir;

const BLOCK_SIZE: usize = 64;

fn key_for(i: usize) -> Vec<u8> {
    format!("b{:03}", i).into_bytes()
}

fn value_for(i: usize) -> Vec<u8> {
    format!("v{:03}", i).into_bytes()
}

#[test]
fn round_trip_through_device_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.blk");

    {
        let mut dev = MmapDevice::create(&path, BLOCK_SIZE, 128).unwrap();
        let mut tree = BTreeIndex::new(4, 4, &mut dev, true);
        tree.attach(0, true).unwrap();

        for i in 1..=20 {
            tree.insert(&key_for(i), &value_for(i)).unwrap();
        }
        tree.detach().unwrap();
        dev.sync().unwrap();
    }

    let mut dev = MmapDevice::open(&path, BLOCK_SIZE).unwrap();
    let mut tree = BTreeIndex::new(0, 0, &mut dev, true);
    tree.attach(0, false).unwrap();

    tree.sanity_check().unwrap();
    assert_eq!(tree.key_count().unwrap(), 20);
    for i in 1..=20 {
        assert_eq!(tree.lookup(&key_for(i)).unwrap(), value_for(i));
    }
}

#[test]
fn reopened_tree_accepts_further_inserts() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("index.blk");

    {
        let mut dev = MmapDevice::create(&path, BLOCK_SIZE, 128).unwrap();
        let mut tree = BTreeIndex::new(4, 4, &mut dev, true);
        tree.attach(0, true).unwrap();
        for i in 1..=10 {
            tree.insert(&key_for(i), &value_for(i)).unwrap();
        }
        tree.detach().unwrap();
    }

    let mut dev = MmapDevice::open(&path, BLOCK_SIZE).unwrap();
    let mut tree = BTreeIndex::new(0, 0, &mut dev, true);
    tree.attach(0, false).unwrap();

    for i in 11..=30 {
        tree.insert(&key_for(i), &value_for(i)).unwrap();
    }
    tree.sanity_check().unwrap();
    for i in 1..=30 {
        assert_eq!(tree.lookup(&key_for(i)).unwrap(), value_for(i));
    }
    assert!(matches!(
        tree.insert(&key_for(5), &value_for(5)),
        Err(Error::Conflict)
    ));
}

#[test]
fn sorted_display_after_reversed_inserts() {
    let mut dev = MemDevice::new(BLOCK_SIZE, 128);
    let mut tree = BTreeIndex::new(4, 4, &mut dev, true);
    tree.attach(0, true).unwrap();

    for i in (1..=40).rev() {
        tree.insert(&key_for(i), &value_for(i)).unwrap();
    }
    tree.sanity_check().unwrap();

    let mut out = Vec::new();
    tree.display(&mut out, DisplayMode::SortedKeyVal).unwrap();
    let text = String::from_utf8(out).unwrap();

    let keys: Vec<&str> = text
        .lines()
        .map(|line| line.trim_start_matches('(').split(',').next().unwrap())
        .collect();
    assert_eq!(keys.len(), 40);
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
}

#[test]
fn interleaved_updates_survive_splits() {
    let mut dev = MemDevice::new(BLOCK_SIZE, 128);
    let mut tree = BTreeIndex::new(4, 4, &mut dev, true);
    tree.attach(0, true).unwrap();

    for i in 1..=30 {
        tree.insert(&key_for(i), &value_for(i)).unwrap();
        if i % 3 == 0 {
            tree.update(&key_for(i), b"upd0").unwrap();
        }
    }
    tree.sanity_check().unwrap();

    for i in 1..=30 {
        let expected = if i % 3 == 0 {
            b"upd0".to_vec()
        } else {
            value_for(i)
        };
        assert_eq!(tree.lookup(&key_for(i)).unwrap(), expected);
    }
}

#[test]
fn exhausted_device_keeps_serving_lookups() {
    let mut dev = MemDevice::new(BLOCK_SIZE, 16);
    let mut tree = BTreeIndex::new(4, 4, &mut dev, true);
    tree.attach(0, true).unwrap();

    let mut inserted = Vec::new();
    for i in 1..1000 {
        match tree.insert(&key_for(i), &value_for(i)) {
            Ok(()) => inserted.push(i),
            Err(Error::NoSpace) => break,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    tree.sanity_check().unwrap();
    assert_eq!(tree.free_block_count().unwrap(), 0);
    for &i in &inserted {
        assert_eq!(tree.lookup(&key_for(i)).unwrap(), value_for(i));
    }
}

#[test]
fn tree_works_behind_a_write_guard() {
    let lock = parking_lot::RwLock::new(MemDevice::new(BLOCK_SIZE, 16));
    let mut guard = lock.write();

    let mut tree = BTreeIndex::new(4, 4, &mut guard, true);
    tree.attach(0, true).unwrap();
    tree.insert(b"aaaa", b"1111").unwrap();

    assert_eq!(tree.lookup(b"aaaa").unwrap(), b"1111");
    drop(tree);
    assert_eq!(guard.num_blocks(), 16);
}
