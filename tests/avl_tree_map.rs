use std::collections::BTreeMap;

use avl_stat_tree::{AvlTreeMap, Descent, NodeRef};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range narrower than `TEST_SIZE` so that inserts collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Delete(i64),
    Remove(i64),
    Get(i64),
    Neighbors(i64),
    Snapshot,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        2 => key_strategy().prop_map(MapOp::Delete),
        1 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Neighbors),
        1 => Just(MapOp::Snapshot),
    ]
}

fn key_at<V>(map: &AvlTreeMap<i64, V>, node: Option<NodeRef>) -> Option<i64> {
    node.and_then(|n| map.node(n)).map(|view| *view.key())
}

// ─── Model tests ─────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both AvlTreeMap and
    /// BTreeMap and asserts identical observable results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        let mut bt: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    avl.insert(*k, *v);
                    bt.insert(*k, *v);
                }
                MapOp::Delete(k) => {
                    avl.delete(avl.search(k));
                    bt.remove(k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl.remove(k), bt.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl.get(k), bt.get(k), "get({})", k);
                }
                MapOp::Neighbors(k) => {
                    if let Some(node) = avl.search(k) {
                        let before = bt.range(..*k).next_back().map(|(k, _)| *k);
                        let after = bt.range(*k + 1..).next().map(|(k, _)| *k);
                        prop_assert_eq!(key_at(&avl, avl.predecessor(node)), before);
                        prop_assert_eq!(key_at(&avl, avl.successor(node)), after);
                    } else {
                        prop_assert!(!bt.contains_key(k));
                    }
                }
                MapOp::Snapshot => {
                    let expected: Vec<(i64, i64)> = bt.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(avl.snapshot(), expected.as_slice());
                }
            }
            prop_assert_eq!(avl.len(), bt.len());
            prop_assert_eq!(avl.last_key_value(), bt.last_key_value());
        }
        prop_assert_eq!(avl.check_invariants(), Ok(()));
        prop_assert!(avl.iter().eq(bt.iter()));
    }

    /// Every mutation leaves every cached height, balance factor and counter
    /// consistent with the tree it describes.
    #[test]
    fn invariants_hold_after_every_mutation(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE / 4)) {
        let mut avl: AvlTreeMap<i64, i64> = AvlTreeMap::new();
        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    avl.insert(*k, *v);
                }
                MapOp::Delete(k) | MapOp::Remove(k) => {
                    avl.delete(avl.search(k));
                }
                MapOp::Get(_) | MapOp::Neighbors(_) | MapOp::Snapshot => continue,
            }
            prop_assert_eq!(avl.check_invariants(), Ok(()));
        }
    }

    /// Appending a strictly increasing sequence through the max fast path
    /// builds exactly the tree a root descent builds.
    #[test]
    fn max_descent_matches_root_descent(mut keys in proptest::collection::vec(key_strategy(), 1..TEST_SIZE)) {
        keys.sort_unstable();
        keys.dedup();

        let mut from_root = AvlTreeMap::new();
        let mut from_max = AvlTreeMap::new();
        for &k in &keys {
            let a = from_root.insert(k, k);
            let b = from_max.insert_with_descent(k, k, Descent::Max);
            prop_assert_eq!(a, b);
        }
        prop_assert_eq!(from_max.check_invariants(), Ok(()));
        prop_assert_eq!(key_at(&from_root, from_root.root()), key_at(&from_max, from_max.root()));
        prop_assert_eq!(from_root.snapshot(), from_max.snapshot());
    }

    /// Deleting a two-child node moves its successor's pair into its slot and
    /// leaves every other pair where the reference says it should be.
    #[test]
    fn delete_matches_sorted_reference(entries in proptest::collection::vec(key_strategy(), 1..500), pick in any::<prop::sample::Index>()) {
        let mut avl: AvlTreeMap<i64, i64> = entries.iter().map(|&k| (k, -k)).collect();
        let mut reference: Vec<(i64, i64)> = avl.snapshot().to_vec();

        let doomed = reference.remove(pick.index(reference.len())).0;
        avl.delete(avl.search(&doomed));

        prop_assert_eq!(avl.snapshot(), reference.as_slice());
        prop_assert_eq!(avl.check_invariants(), Ok(()));
    }
}

// ─── Fixed scenarios ─────────────────────────────────────────────────────────

#[test]
fn empty_map() {
    let map: AvlTreeMap<i64, &str> = AvlTreeMap::new();
    assert!(map.root().is_none());
    assert_eq!(map.size(), 0);
    assert!(map.avl_to_array().is_empty());
    assert!(map.search(&42).is_none());
    assert_eq!(map.balance_zero_ratio(), 0.0);
}

#[test]
fn single_insert_then_search() {
    let mut map = AvlTreeMap::new();
    map.insert(10, "ten");

    let node = map.search(&10).unwrap();
    assert_eq!(map.node(node).unwrap().value(), &"ten");
    assert_eq!(map.size(), 1);
    assert_eq!(map.root(), Some(node));
}

#[test]
fn insert_overwrites_existing_key() {
    let mut map = AvlTreeMap::new();
    map.insert(5, "five");
    assert_eq!(map.insert(5, "FIVE"), 0);

    assert_eq!(map.get(&5), Some(&"FIVE"));
    assert_eq!(map.size(), 1);
}

#[test]
fn snapshot_is_sorted() {
    let map: AvlTreeMap<i64, String> = [20_i64, 10, 30, 5, 15].into_iter().map(|k| (k, k.to_string())).collect();
    let keys: Vec<i64> = map.snapshot().iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, [5, 10, 15, 20, 30]);
}

#[test]
fn predecessor_and_successor() {
    let map: AvlTreeMap<i64, i64> = [15, 10, 20, 5, 12, 18, 25].into_iter().map(|k| (k, k)).collect();
    let n12 = map.search(&12).unwrap();

    assert_eq!(key_at(&map, map.predecessor(n12)), Some(10));
    assert_eq!(key_at(&map, map.successor(n12)), Some(15));
    assert!(map.predecessor(map.search(&5).unwrap()).is_none());
    assert!(map.successor(map.search(&25).unwrap()).is_none());
}

#[test]
fn delete_leaf_one_child_and_root() {
    let mut map: AvlTreeMap<i64, i64> = [10, 5, 15, 3, 7].into_iter().map(|k| (k, k)).collect();

    map.delete(map.search(&3));
    assert!(map.search(&3).is_none());

    map.delete(map.search(&5));
    assert!(map.search(&5).is_none());

    map.delete(map.root());
    assert!(map.search(&10).is_none());
    assert_eq!(map.snapshot(), &[(7, 7), (15, 15)]);
    assert_eq!(map.check_invariants(), Ok(()));
}

#[test]
fn single_and_double_rotations_are_counted() {
    let cases: [([i64; 3], usize); 4] = [
        ([30, 20, 10], 1), // left-left
        ([10, 20, 30], 1), // right-right
        ([30, 10, 20], 2), // left-right
        ([10, 30, 20], 2), // right-left
    ];
    for (keys, expected) in cases {
        let mut map = AvlTreeMap::new();
        map.insert(keys[0], ());
        map.insert(keys[1], ());
        assert_eq!(map.insert(keys[2], ()), expected, "inserting {keys:?}");
        assert_eq!(key_at(&map, map.root()), Some(20));
    }
}

#[test]
fn balance_ratio_of_small_trees() {
    let mut map = AvlTreeMap::new();
    for k in [10, 20, 5] {
        map.insert(k, ());
    }
    let ratio = map.balance_zero_ratio();
    assert!((0.0..=1.0).contains(&ratio));

    let map: AvlTreeMap<i64, ()> = [20, 10, 30].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.balance_zero_ratio(), 1.0);
}

#[test]
fn mass_insert_then_delete() {
    const N: i64 = 100;
    let mut map = AvlTreeMap::new();
    for k in 0..N {
        map.insert(k, k.to_string());
    }
    assert_eq!(map.size(), 100);

    for k in 0..N {
        map.delete(map.search(&k));
    }
    assert_eq!(map.size(), 0);
    assert!(map.avl_to_array().is_empty());
}

#[test]
fn snapshot_is_reused_until_mutation() {
    let mut map: AvlTreeMap<i64, i64> = (0..16).map(|k| (k, k)).collect();

    let first = map.snapshot().as_ptr();
    assert!(map.is_snapshot_cached());
    assert_eq!(map.snapshot().as_ptr(), first);

    map.insert(99, 99);
    assert!(!map.is_snapshot_cached());
    assert_eq!(map.snapshot().last(), Some(&(99, 99)));

    *map.get_mut(&0).unwrap() = -1;
    assert_eq!(map.snapshot().first(), Some(&(0, -1)));
}

#[test]
fn node_views_describe_the_structure() {
    let map: AvlTreeMap<i64, i64> = (1..=7).map(|k| (k, k * 10)).collect();
    let root = map.node(map.root().unwrap()).unwrap();

    assert_eq!(root.key(), &4);
    assert_eq!(root.height(), 2);
    assert_eq!(root.balance_factor(), 0);

    let mut stack = vec![root];
    let mut seen = 0;
    while let Some(view) = stack.pop() {
        seen += 1;
        assert_eq!(view.value(), &(view.key() * 10));
        for child in [view.left(), view.right()].into_iter().flatten() {
            let child = map.node(child).unwrap();
            assert_eq!(child.parent(), Some(view.node_ref()));
            assert_eq!(child.height(), view.height() - 1);
            stack.push(child);
        }
    }
    assert_eq!(seen, 7);
}

#[test]
fn stale_reference_resolves_to_none() {
    let mut map: AvlTreeMap<i64, i64> = (0..3).map(|k| (k, k)).collect();
    let leaf = map.search(&2).unwrap();
    map.delete(leaf);
    assert!(map.node(leaf).is_none());
    assert!(map.node(NodeRef::SENTINEL).is_none());
}

#[test]
fn delete_rotates_at_several_levels() {
    // Removing 12 forces a rotation at 11 and another at the root.
    let mut map: AvlTreeMap<i64, ()> = [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1].into_iter().map(|k| (k, ())).collect();
    assert_eq!(map.delete(map.search(&12)), 2);
    assert_eq!(key_at(&map, map.root()), Some(5));
    assert_eq!(map.check_invariants(), Ok(()));
}
