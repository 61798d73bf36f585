//! Slot pool: reuse order, ceiling, growth, clear.

use hashbrown::HashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::POOL_ADDRESS_CEILING;
use crate::pool::{Address, PoolError, SlotPool};

#[test]
fn create_read_round_trip() {
    let mut pool: SlotPool<u32> = SlotPool::new(4);
    let a = pool.create(7).unwrap();
    let b = pool.create(9).unwrap();
    assert_eq!(*pool.read(a), 7);
    assert_eq!(*pool.read(b), 9);
    assert_eq!(pool.count(), 2);

    *pool.read_mut(a) = 11;
    assert_eq!(pool.get(a), Some(&11));
}

#[test]
fn freed_slots_are_reused_last_in_first_out() {
    let mut pool: SlotPool<u32> = SlotPool::new(4);
    let a = pool.create(1).unwrap();
    let b = pool.create(2).unwrap();
    let _c = pool.create(3).unwrap();

    pool.destroy(b);
    pool.destroy(a);
    assert_eq!(pool.count(), 1);
    assert!(!pool.is_active(a));
    assert_eq!(pool.get(b), None);

    assert_eq!(pool.create(4).unwrap(), a);
    assert_eq!(pool.create(5).unwrap(), b);
    assert_eq!(pool.create(6).unwrap(), Address(3));
    assert_eq!(pool.capacity(), 4);
}

#[test]
fn ceiling_rejects_without_mutation() {
    let mut pool: SlotPool<u32> = SlotPool::with_ceiling(8, 2);
    pool.create(1).unwrap();
    pool.create(2).unwrap();

    let err = pool.create(3).unwrap_err();
    assert!(matches!(err, PoolError::Full { ceiling: 2 }));
    assert_eq!(pool.count(), 2);
    assert_eq!(pool.capacity(), 2);
}

#[test]
fn ceiling_still_allows_reuse() {
    let mut pool: SlotPool<u32> = SlotPool::with_ceiling(2, 2);
    let a = pool.create(1).unwrap();
    pool.create(2).unwrap();
    pool.destroy(a);
    assert_eq!(pool.create(3).unwrap(), a);
    assert_eq!(pool.count(), 2);
}

#[test]
fn oversized_ceiling_is_clamped_to_the_address_limit() {
    let mut pool: SlotPool<u8> = SlotPool::with_ceiling(0, 40_000);
    assert_eq!(pool.ceiling(), POOL_ADDRESS_CEILING);

    let mut last = None;
    for _ in 0..POOL_ADDRESS_CEILING {
        last = Some(pool.create(1).unwrap());
    }
    assert_eq!(last, Some(Address(32_766)));
    assert!(matches!(pool.create(1), Err(PoolError::Full { ceiling: 32_767 })));
    assert_eq!(pool.count(), 32_767);
}

#[test]
fn grows_by_half_when_virgin_slots_run_out() {
    let mut pool: SlotPool<u32> = SlotPool::new(2);
    pool.create(0).unwrap();
    pool.create(1).unwrap();
    assert_eq!(pool.physical_len(), 2);

    pool.create(2).unwrap();
    assert_eq!(pool.physical_len(), 3);
    pool.create(3).unwrap();
    assert_eq!(pool.physical_len(), 4);
    pool.create(4).unwrap();
    assert_eq!(pool.physical_len(), 6);
    assert_eq!(pool.capacity(), 5);
}

#[test]
fn zero_capacity_grows_by_one() {
    let mut pool: SlotPool<u32> = SlotPool::new(0);
    let a = pool.create(5).unwrap();
    assert_eq!(a, Address(0));
    assert_eq!(pool.physical_len(), 1);
}

#[test]
fn clear_keeps_capacity_and_reissues_from_zero() {
    let mut pool: SlotPool<u32> = SlotPool::new(2);
    for i in 0..5 {
        pool.create(i).unwrap();
    }
    let len = pool.physical_len();
    pool.clear();

    assert_eq!(pool.count(), 0);
    assert_eq!(pool.capacity(), 5);
    assert_eq!(pool.physical_len(), len);
    assert_eq!(pool.iter().count(), 0);
    assert_eq!(pool.create(42).unwrap(), Address(0));
    assert_eq!(pool.create(43).unwrap(), Address(1));
}

#[test]
fn iter_yields_live_slots_in_address_order() {
    let mut pool: SlotPool<u32> = SlotPool::new(4);
    let addrs: Vec<_> = (0..4).map(|i| pool.create(i * 10).unwrap()).collect();
    pool.destroy(addrs[1]);

    let live: Vec<_> = pool.iter().map(|(a, v)| (a.0, *v)).collect();
    assert_eq!(live, vec![(0, 0), (2, 20), (3, 30)]);
}

#[test]
fn random_churn_never_reissues_live_addresses() {
    let mut rng = StdRng::seed_from_u64(0xB10C);
    let mut pool: SlotPool<u64> = SlotPool::new(4);
    let mut live: HashMap<Address, u64> = HashMap::new();

    for step in 0..2_000u64 {
        if live.is_empty() || rng.random_bool(0.6) {
            let address = pool.create(step).unwrap();
            assert!(live.insert(address, step).is_none(), "live address {:?} reissued", address);
        } else {
            let victim = *live.keys().nth(rng.random_range(0..live.len())).unwrap();
            live.remove(&victim);
            pool.destroy(victim);
        }
        assert_eq!(pool.count(), live.len());
    }
    for (address, value) in &live {
        assert_eq!(pool.read(*address), value);
    }
}
