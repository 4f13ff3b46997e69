#![no_main]

use libfuzzer_sys::fuzz_target;

use respool_core::{PoolConfig, Pooled, ReleaseOutcome, ResourcePool};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First two bytes size the pool, the rest is an op stream.
    let max = usize::from(data[0] % 16) + 1;
    let initial = usize::from(data[1]) % (max + 1);

    let mut next = 0u32;
    let mut pool = ResourcePool::new(
        move || {
            next += 1;
            next
        },
        |_: &mut u32| {},
        |_: &mut u32| {},
        drop,
        initial,
        max,
    )
    .unwrap();
    let config = PoolConfig::new(initial, max);
    let mut held: Vec<Pooled<u32>> = Vec::new();

    for &byte in &data[2..] {
        match byte % 8 {
            0..=3 => match pool.acquire() {
                Ok(p) => {
                    assert!(held.iter().all(|h| **h != *p), "resource {} handed out twice", *p);
                    held.push(p);
                }
                Err(e) => {
                    assert!(e.is_exhausted());
                    assert_eq!(pool.count_inactive(), 0);
                    assert_eq!(pool.count_all(), config.max_capacity);
                }
            },
            4..=6 if !held.is_empty() => {
                let p = held.swap_remove(usize::from(byte) % held.len());
                let idle_before = pool.count_inactive();
                match pool.release(p).unwrap() {
                    ReleaseOutcome::Kept => assert_eq!(pool.count_inactive(), idle_before + 1),
                    ReleaseOutcome::Destroyed => assert_eq!(pool.count_inactive(), idle_before),
                }
            }
            7 => {
                let idle = pool.count_inactive();
                assert_eq!(pool.clear(), idle);
                assert_eq!(pool.count_all(), 0);
            }
            _ => {}
        }

        let snap = pool.snapshot();
        assert!(snap.holds_invariants(), "invariants broken: {snap:?}");
    }
});
