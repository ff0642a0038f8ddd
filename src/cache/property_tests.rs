//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify the store's capacity and accounting invariants
//! over arbitrary operation sequences.

use bytes::Bytes;
use proptest::prelude::*;

use crate::cache::CacheStore;

// == Test Configuration ==
const TEST_MAX_BYTES: u64 = 4096;
const TEST_MAX_ITEMS: usize = 32;

// == Strategies ==
/// Generates slice keys drawn from a small pool so gets actually hit
fn key_strategy() -> impl Strategy<Value = String> {
    (0u32..64).prop_map(|i| format!("series-{}:{}", i % 4, i))
}

/// Generates payload sizes, occasionally larger than the whole byte budget
fn size_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![
        9 => 1u64..512,
        1 => (TEST_MAX_BYTES + 1)..(TEST_MAX_BYTES * 2),
    ]
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, size: u64, predicted: bool },
    Get { key: String },
    ClearScope { prefix: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), size_strategy(), any::<bool>())
            .prop_map(|(key, size, predicted)| CacheOp::Set { key, size, predicted }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => (0u32..4).prop_map(|i| CacheOp::ClearScope { prefix: format!("series-{}:", i) }),
    ]
}

fn apply(store: &mut CacheStore, op: &CacheOp) {
    match op {
        CacheOp::Set { key, size, predicted } => {
            store.set(
                key.clone(),
                Bytes::from(vec![0u8; *size as usize]),
                *size,
                *predicted,
            );
        }
        CacheOp::Get { key } => {
            let _ = store.get(key);
        }
        CacheOp::ClearScope { prefix } => {
            store.clear_scope(prefix);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // *For any* sequence of operations, both capacity bounds hold after
    // every single mutation, not just at the end.
    #[test]
    fn prop_capacity_invariant(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_MAX_ITEMS);

        for op in &ops {
            apply(&mut store, op);
            prop_assert!(store.total_bytes() <= TEST_MAX_BYTES,
                "byte budget exceeded: {}", store.total_bytes());
            prop_assert!(store.len() <= TEST_MAX_ITEMS,
                "item budget exceeded: {}", store.len());
        }
    }

    // *For any* stored payload, an immediate get returns the same bytes.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), size in 1u64..512) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_MAX_ITEMS);
        let payload = Bytes::from((0..size as usize).map(|i| i as u8).collect::<Vec<_>>());

        store.set(key.clone(), payload.clone(), size, false);
        let retrieved = store.get(&key).expect("fresh entry must be resident");

        prop_assert_eq!(retrieved, payload, "Round-trip payload mismatch");
    }

    // *For any* sequence of operations, hit/miss counters match what a
    // shadow model of the same gets observes.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_MAX_ITEMS);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in &ops {
            if let CacheOp::Get { key } = op {
                if store.contains(key) {
                    expected_hits += 1;
                } else {
                    expected_misses += 1;
                }
            }
            apply(&mut store, op);
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Usage mismatch");
        prop_assert_eq!(stats.total_bytes, store.total_bytes(), "Byte usage mismatch");
    }

    // *For any* accounting state, byte usage equals the sum of the sizes of
    // the resident entries (checked indirectly: clearing everything zeroes it).
    #[test]
    fn prop_clear_resets_accounting(ops in prop::collection::vec(cache_op_strategy(), 1..40)) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, TEST_MAX_ITEMS);
        for op in &ops {
            apply(&mut store, op);
        }

        store.clear_all();
        prop_assert_eq!(store.len(), 0);
        prop_assert_eq!(store.total_bytes(), 0);
    }

    // *For any* pair of a predicted and an explicit entry under item
    // pressure, the predicted one is evicted first.
    #[test]
    fn prop_predicted_evicted_first(size in 1u64..64) {
        let mut store = CacheStore::new(TEST_MAX_BYTES, 2);

        store.set("explicit".to_string(), Bytes::from(vec![0u8; size as usize]), size, false);
        store.set("predicted".to_string(), Bytes::from(vec![0u8; size as usize]), size, true);
        store.set("incoming".to_string(), Bytes::from(vec![0u8; size as usize]), size, false);

        prop_assert!(store.contains("explicit"));
        prop_assert!(!store.contains("predicted"));
        prop_assert!(store.contains("incoming"));
    }
}
