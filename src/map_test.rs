use std::time::{SystemTime, UNIX_EPOCH};

use rand::prelude::random;
use rand::{rngs::SmallRng, SeedableRng};

use crate::compare::{Compare, Descending};
use crate::error::Error;
use crate::map::RbMap;

#[test]
fn test_id() {
    let map: RbMap<i64, i64> = RbMap::new("test-map");
    assert_eq!(map.id(), "test-map".to_string());
}

#[test]
fn test_len() {
    let map: RbMap<i64, i64> = RbMap::new("test-map");
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

#[test]
fn test_insert() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let mut refns = RefNodes::new(10);

    for key in [2, 1, 3, 6, 5, 4, 8, 0, 9, 7].iter().cloned() {
        let (cur, ok) = map.insert(key, key * 10);
        assert!(ok);
        assert!(refns.insert(key, key * 10));
        assert_eq!(cur.get(&map), Ok((&key, &(key * 10))));
        assert!(map.validate().is_ok());
    }
    assert_eq!(map.len(), 10);

    // existing key, nothing changes.
    let (cur, ok) = map.insert(7, 20);
    assert!(!ok);
    assert!(!refns.insert(7, 20));
    assert_eq!(cur.get(&map), Ok((&7, &70)));
    assert_eq!(cur, map.find(&7));
    assert_eq!(map.len(), 10);

    for i in 0..10 {
        assert_eq!(map.get(&i).cloned(), refns.get(i));
    }
    let (mut iter, mut iter_ref) = (map.iter(), refns.iter());
    loop {
        match (iter.next(), iter_ref.next()) {
            (Some(item), Some(ref_item)) => {
                assert_eq!(*item.0, ref_item.0);
                assert_eq!(*item.1, ref_item.1);
            }
            (None, None) => break,
            (_, _) => panic!("invalid"),
        }
    }
}

#[test]
fn test_sorted_iteration() {
    let mut map: RbMap<i64, ()> = RbMap::new("test-map");
    for key in vec![5, 3, 8, 1, 4, 7, 9].into_iter() {
        map.insert(key, ());
    }
    let keys: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);

    let keys: Vec<i64> = map.iter().rev().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![9, 8, 7, 5, 4, 3, 1]);

    let keys: Vec<i64> = (&map).into_iter().map(|(k, _)| *k).collect();
    assert_eq!(keys.len(), map.iter().len());

    assert_eq!(map.first(), Some((&1, &())));
    assert_eq!(map.last(), Some((&9, &())));
}

#[test]
fn test_iter_both_ends() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    for key in 0..10 {
        map.insert(key, key);
    }
    let mut iter = map.iter();
    assert_eq!(iter.next(), Some((&0, &0)));
    assert_eq!(iter.next_back(), Some((&9, &9)));
    assert_eq!(iter.len(), 8);
    let rest: Vec<i64> = iter.map(|(k, _)| *k).collect();
    assert_eq!(rest, (1..9).collect::<Vec<i64>>());

    let empty: RbMap<i64, i64> = RbMap::new("empty");
    assert!(empty.iter().next().is_none());
    assert!(empty.iter().next_back().is_none());
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
}

#[test]
fn test_at() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    assert_eq!(map.at(&42), Err(Error::KeyNotFound));
    assert_eq!(map.at_mut(&42), Err(Error::KeyNotFound));
    assert!(map.is_empty());

    map.insert(42, 1);
    assert_eq!(map.at(&42), Ok(&1));
    *map.at_mut(&42).unwrap() = 2;
    assert_eq!(map.at(&42), Ok(&2));
    assert_eq!(map[&42], 2);
    assert_eq!(map.count(&42), 1);
    assert_eq!(map.count(&43), 0);
    assert!(map.contains_key(&42));
    assert!(!map.contains_key(&43));
}

#[test]
#[should_panic]
fn test_index_missing() {
    let map: RbMap<i64, i64> = RbMap::new("test-map");
    let _value: i64 = map[&1];
}

#[test]
fn test_index_or_default() {
    let mut map: RbMap<i64, String> = RbMap::new("test-map");
    map.insert(1, "one".to_string());

    assert_eq!(map.index_or_default(7).as_str(), "");
    assert_eq!(map.len(), 2);
    map.index_or_default(7).push_str("seven");
    assert_eq!(map.len(), 2);
    assert_eq!(map.at(&7).unwrap(), "seven");
    assert_eq!(map.index_or_default(1).as_str(), "one");
    assert_eq!(map.len(), 2);
    assert!(map.validate().is_ok());
}

#[test]
fn test_erase_end() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    assert_eq!(map.erase(map.end()), Err(Error::InvalidIterator));
    assert_eq!(map.erase(map.begin()), Err(Error::InvalidIterator));

    for key in 0..5 {
        map.insert(key, key);
    }
    assert_eq!(map.erase(map.end()), Err(Error::InvalidIterator));
    assert_eq!(map.len(), 5);
    assert!(map.validate().is_ok());
    let keys: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_erase_find() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let (cur, _) = map.insert(3, 30);
    assert_eq!(map.find(&3).get(&map), Ok((&3, &30)));
    assert_eq!(map.erase(cur), Ok((3, 30)));
    assert_eq!(map.find(&3), map.end());
    assert_eq!(map.len(), 0);
    // stale cursor, slot is released.
    assert_eq!(map.erase(cur), Err(Error::InvalidIterator));
}

#[test]
fn test_remove() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let mut refns = RefNodes::new(11);

    for key in [2, 1, 3, 6, 5, 4, 8, 0, 9, 7].iter().cloned() {
        map.insert(key, 100);
        refns.insert(key, 100);
    }

    // remove a missing key.
    assert!(map.remove(&10).is_none());
    assert!(refns.remove(10).is_none());
    assert_eq!(map.len(), 10);
    assert!(map.validate().is_ok());

    for i in 0..10 {
        assert_eq!(map.remove(&i), refns.remove(i));
        assert!(map.validate().is_ok());
    }
    assert_eq!(map.len(), 0);
    assert!(map.iter().next().is_none());
}

#[test]
fn test_erase_ascending() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    for key in 1..=1000 {
        map.insert(key, key);
    }
    assert!(map.validate().is_ok());

    let mut expect = 1;
    while !map.is_empty() {
        let (key, _) = map.erase(map.begin()).unwrap();
        assert_eq!(key, expect);
        expect += 1;
        assert!(map.validate().is_ok());
        if let Some((first, _)) = map.first() {
            assert_eq!(*first, expect);
        }
    }
    assert_eq!(expect, 1001);
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
}

#[test]
fn test_erase_descending() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    for key in (0..500).rev() {
        map.insert(key, -key);
    }
    for key in (0..500).rev() {
        let mut cur = map.end();
        cur.move_prev(&map).unwrap();
        assert_eq!(map.erase(cur), Ok((key, -key)));
        assert!(map.validate().is_ok());
    }
    assert!(map.is_empty());
}

#[test]
fn test_crud() {
    let size = 1000;
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let mut refns = RefNodes::new(size);

    for _ in 0..20_000 {
        let key: i64 = (random::<i64>() % (size as i64)).abs();
        let value: i64 = random::<i32>() as i64;
        let op: i64 = (random::<i64>() % 5).abs();
        match op {
            0 => {
                let (_, ok) = map.insert(key, value);
                assert_eq!(ok, refns.insert(key, value));
            }
            1 => {
                *map.index_or_default(key) += value % 1000;
                *refns.index_or_default(key) += value % 1000;
            }
            2 => {
                assert_eq!(map.remove(&key), refns.remove(key));
            }
            3 => {
                let cur = map.find(&key);
                match refns.remove(key) {
                    Some(refval) => assert_eq!(map.erase(cur), Ok((key, refval))),
                    None => assert_eq!(map.erase(cur), Err(Error::InvalidIterator)),
                }
            }
            4 => {
                assert_eq!(map.get(&key).cloned(), refns.get(key));
            }
            op => panic!("unreachable {}", op),
        };

        assert!(map.validate().is_ok());
        assert_eq!(map.len(), refns.len());
    }

    println!("index-length {}", map.len());

    let (mut iter, mut iter_ref) = (map.iter(), refns.iter());
    loop {
        match (iter.next(), iter_ref.next()) {
            (Some(item), Some(ref_item)) => {
                assert_eq!(*item.0, ref_item.0);
                assert_eq!(*item.1, ref_item.1);
            }
            (None, None) => break,
            (_, _) => panic!("invalid"),
        }
    }
}

#[test]
fn test_clone() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    for key in 0..100 {
        map.insert(key, key * 2);
    }
    for key in (0..100).filter(|k| k % 3 == 0) {
        map.remove(&key);
    }

    let mut copy = map.clone();
    assert_eq!(copy.id(), map.id());
    assert_eq!(copy.len(), map.len());
    let (a, b) = (map.validate().unwrap(), copy.validate().unwrap());
    assert_eq!(a.blacks(), b.blacks());
    let (da, db) = (a.depths().unwrap(), b.depths().unwrap());
    assert_eq!((da.min(), da.max()), (db.min(), db.max()));
    assert!(map.iter().eq(copy.iter()));

    // mutate the copy.
    *copy.index_or_default(1) = -1;
    copy.index_or_default(1000);
    copy.erase(copy.find(&2)).unwrap();
    assert_eq!(map.at(&1), Ok(&2));
    assert_eq!(map.at(&2), Ok(&4));
    assert_eq!(map.count(&1000), 0);
    assert!(map.validate().is_ok());

    // mutate the source.
    map.clear();
    assert_eq!(copy.at(&1), Ok(&-1));
    assert_eq!(copy.len(), 66);
    assert!(copy.validate().is_ok());
}

#[test]
fn test_clone_from() {
    let mut src: RbMap<i64, i64> = RbMap::new("src");
    let mut dst: RbMap<i64, i64> = RbMap::new("dst");
    for key in 0..50 {
        src.insert(key, key);
    }
    for key in 100..120 {
        dst.insert(key, key);
    }
    let dst_end = dst.end();

    dst.clone_from(&src);
    assert_eq!(dst.id(), "dst".to_string());
    assert_eq!(dst.len(), 50);
    assert_eq!(dst.count(&100), 0);
    assert_eq!(dst.end(), dst_end);
    assert!(dst.validate().is_ok());
    assert!(src.iter().eq(dst.iter()));

    src.remove(&0);
    assert_eq!(dst.at(&0), Ok(&0));
}

#[derive(Clone, Default)]
struct NoCase;

impl Compare<String> for NoCase {
    fn less(&self, a: &String, b: &String) -> bool {
        a.to_lowercase() < b.to_lowercase()
    }
}

#[test]
fn test_comparator() {
    let mut map: RbMap<i64, i64, Descending> = RbMap::with_comparator("desc", Descending);
    for key in vec![5, 3, 8, 1, 4, 7, 9].into_iter() {
        map.insert(key, key);
    }
    let keys: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![9, 8, 7, 5, 4, 3, 1]);
    assert!(map.validate().is_ok());

    let mut map: RbMap<String, i64, NoCase> = RbMap::with_comparator("nocase", NoCase);
    assert!(map.insert("Apple".to_string(), 1).1);
    assert!(map.insert("banana".to_string(), 2).1);
    assert!(!map.insert("APPLE".to_string(), 3).1);
    assert_eq!(map.len(), 2);
    assert_eq!(map.at(&"apple".to_string()), Ok(&1));
    let (key, _) = map.find(&"BANANA".to_string()).get(&map).unwrap();
    assert_eq!(key, "banana");
    assert!(NoCase.equivalent(&"x".to_string(), &"X".to_string()));
}

#[test]
fn test_load_from() {
    let map = RbMap::load_from("test-map", (0..100).rev().map(|k| (k, k + 1))).unwrap();
    assert_eq!(map.len(), 100);
    assert_eq!(map.first(), Some((&0, &1)));
    assert!(map.validate().is_ok());

    let entries = vec![(1, 1), (2, 2), (1, 3)];
    match RbMap::load_from("test-map", entries) {
        Err(Error::DuplicateKey(1)) => (),
        Err(err) => panic!("unexpected {:?}", err),
        Ok(_) => panic!("expected duplicate key"),
    }
}

#[test]
fn test_random() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let mut rng = SmallRng::from_seed(make_seed().to_le_bytes());

    assert_eq!(map.random(&mut rng), None);

    map.insert(0, 0);
    assert_eq!(map.random(&mut rng), Some((&0, &0)));
    assert_eq!(map.random(&mut rng), Some((&0, &0)));

    for key in 1..100_000 {
        assert!(map.insert(key, key * 10).1);
    }
    for _i in 0..200_000 {
        let (key, value) = map.random(&mut rng).unwrap();
        assert!(*key >= 0 && *key < 100_000);
        assert_eq!(*value, key * 10);
    }
}

#[test]
fn test_stats() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    let stats = map.validate().unwrap();
    assert_eq!(stats.entries(), 0);
    assert_eq!(stats.blacks(), Some(0));
    assert_eq!(stats.depths().unwrap().samples(), 1);

    for key in 0..1024 {
        map.insert(key, key);
    }
    assert_eq!(map.stats().entries(), 1024);
    assert_eq!(map.stats().blacks(), None);

    let stats = map.validate().unwrap();
    let depths = stats.depths().unwrap();
    // one sentinel link per entry, plus one.
    assert_eq!(depths.samples(), 1025);
    assert!(depths.max() <= 2 * 11);
    assert!(stats.blacks().unwrap() <= 11);
    assert_eq!(depths.percentile(100), depths.max());
    assert_eq!(depths.percentile(0), depths.min());
    assert!(depths.mean() >= depths.min() && depths.mean() <= depths.max());
    assert_eq!(depths.percentiles().len(), 10);
    assert!(depths.json().starts_with("{ \"min\""));
    depths.pretty_print("test ");
}

#[test]
fn test_clear() {
    let mut map: RbMap<i64, i64> = RbMap::new("test-map");
    for key in 0..10 {
        map.insert(key, key);
    }
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.begin(), map.end());
    assert!(map.validate().is_ok());

    for key in (0..10).rev() {
        map.insert(key, key);
    }
    assert_eq!(map.len(), 10);
    assert!(map.validate().is_ok());
}

#[test]
fn test_debug() {
    let mut map: RbMap<i64, i64> = RbMap::default();
    map.insert(2, 20);
    map.insert(1, 10);
    assert_eq!(format!("{:?}", map), "{1: 10, 2: 20}");
    assert_eq!(Error::<i64>::KeyNotFound.to_string(), "key not found");
}

fn make_seed() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos()
}

include!("./ref_test.rs");
