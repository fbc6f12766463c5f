use std::collections::HashSet;

use nodepool::{ArenaError, NodeArena};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// Randomized allocate/deallocate churn
// =============================================================================

#[test]
fn random_churn_preserves_conservation() {
    const CAPACITY: usize = 64;

    let mut rng = SmallRng::seed_from_u64(12345);
    let mut arena: NodeArena<u64> = NodeArena::with_capacity(CAPACITY);
    let mut live: Vec<u32> = Vec::new();

    for step in 0..10_000u64 {
        if live.is_empty() || rng.random_bool(0.55) {
            match arena.allocate(step) {
                Ok(idx) => {
                    assert!(!live.contains(&idx), "index {idx} handed out twice");
                    live.push(idx);
                }
                Err(err) => {
                    assert_eq!(err, ArenaError::PoolExhausted { capacity: CAPACITY });
                    assert_eq!(live.len(), CAPACITY);
                }
            }
        } else {
            let victim = live.swap_remove(rng.random_range(0..live.len()));
            arena.deallocate(victim).unwrap();
            assert_eq!(arena.free_head(), Some(victim));
        }

        assert_eq!(arena.len(), live.len());
        assert_eq!(arena.len() + arena.free_indices().count(), CAPACITY);
    }

    arena.assert_invariants();
}

#[test]
fn live_and_free_sets_are_disjoint() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut arena: NodeArena<u64> = NodeArena::with_capacity(32);
    let mut live: Vec<u32> = (0..32).map(|i| arena.allocate(i).unwrap()).collect();

    for _ in 0..16 {
        let victim = live.swap_remove(rng.random_range(0..live.len()));
        arena.deallocate(victim).unwrap();
    }

    let free: HashSet<u32> = arena.free_indices().collect();
    let live: HashSet<u32> = live.into_iter().collect();

    assert_eq!(free.len(), 16);
    assert!(free.is_disjoint(&live));
    assert_eq!(free.len() + live.len(), 32);
}

// =============================================================================
// Exhaustion and failure idempotence
// =============================================================================

#[test]
fn exhaustion_on_n_plus_one() {
    for capacity in [1usize, 2, 10, 100] {
        let mut arena: NodeArena<f64> = NodeArena::with_capacity(capacity);
        for i in 0..capacity {
            arena.allocate(i as f64).unwrap();
        }
        assert_eq!(
            arena.allocate(0.0),
            Err(ArenaError::PoolExhausted { capacity })
        );
        arena.assert_invariants();
    }
}

#[test]
fn exhaustion_recovers_after_deallocate() {
    let mut arena: NodeArena<u64> = NodeArena::with_capacity(2);
    let a = arena.allocate(1).unwrap();
    arena.allocate(2).unwrap();
    assert!(arena.allocate(3).is_err());

    arena.deallocate(a).unwrap();
    assert_eq!(arena.allocate(3), Ok(a));
}

#[test]
fn failed_operations_leave_state_unchanged() {
    let mut arena: NodeArena<u64> = NodeArena::with_capacity(3);
    let a = arena.allocate(1).unwrap();
    arena.allocate(2).unwrap();
    arena.deallocate(a).unwrap();

    let before = arena.clone();
    let free_before: Vec<u32> = arena.free_indices().collect();

    assert!(arena.deallocate(a).is_err());
    assert!(arena.deallocate(99).is_err());

    assert_eq!(arena.len(), before.len());
    assert_eq!(arena.free_indices().collect::<Vec<_>>(), free_before);
    arena.assert_invariants();
}
