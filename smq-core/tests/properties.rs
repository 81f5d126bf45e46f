//! Property-based tests for the multiqueue's core invariants, run over
//! randomized sequences of `hit`/`shuffle` calls.

use proptest::prelude::*;
use smq_core::MultiQueue;

#[derive(Debug, Clone)]
enum Op {
    Hit(usize),
    Shuffle(u32),
    ClearHits,
}

fn op_strategy(nr_blocks: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..nr_blocks + 5).prop_map(Op::Hit),
        (1u32..8).prop_map(Op::Shuffle),
        Just(Op::ClearHits),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn invariants_hold_after_every_op(
        nr_blocks in 1usize..64,
        nr_levels in 1usize..9,
        ops in prop::collection::vec(op_strategy(32), 0..200),
    ) {
        let mut mq = MultiQueue::new(nr_blocks, nr_levels);
        prop_assert!(mq.check_invariants().is_ok());

        for op in ops {
            match op {
                Op::Hit(idx) => mq.hit(idx),
                Op::Shuffle(adj) => mq.shuffle(adj),
                Op::ClearHits => mq.clear_hits(),
            }

            prop_assert!(mq.check_invariants().is_ok());
            let total: u32 = mq.level_populations().iter().sum();
            prop_assert_eq!(total as usize, nr_blocks);
        }
    }

    #[test]
    fn hit_count_never_decreases_between_clears(
        nr_blocks in 4usize..32,
        nr_levels in 1usize..5,
        indices in prop::collection::vec(0usize..40, 0..100),
    ) {
        let mut mq = MultiQueue::new(nr_blocks, nr_levels);
        let mut previous = mq.get_hits();

        for idx in indices {
            mq.hit(idx);
            let current = mq.get_hits();
            // get_hits() walks in engine order, which `hit` itself can
            // reshuffle within a level; compare totals instead of
            // per-position values.
            let prev_total: u64 = previous.iter().sum();
            let cur_total: u64 = current.iter().sum();
            prop_assert!(cur_total >= prev_total);
            previous = current;
        }
    }

    #[test]
    fn hit_analysis_bound_holds(
        nr_blocks in 8usize..128,
        nr_levels in 1usize..9,
        indices in prop::collection::vec(0usize..140, 0..300),
        percent in 0u32..=100,
    ) {
        let mut mq = MultiQueue::new(nr_blocks, nr_levels);
        for idx in indices {
            mq.hit(idx);
        }
        mq.shuffle(1);

        let r = mq.get_hit_analysis(percent);
        prop_assert!(r.hits_in_levels <= r.hits_actual);
    }

    #[test]
    fn shuffle_always_zeroes_autotune_adjustment_inputs(
        nr_blocks in 8usize..64,
        nr_levels in 1usize..9,
        adjustment in 1u32..16,
    ) {
        let mut mq = MultiQueue::new(nr_blocks, nr_levels);
        for i in 0..nr_blocks {
            mq.hit(i);
        }
        mq.shuffle(adjustment);

        // Right after a shuffle, no hits have been recorded yet, so the
        // adjustment must saturate to the cap (division-by-zero rule).
        let cap = ((nr_blocks / nr_levels) as u32 / 4).max(1);
        prop_assert_eq!(mq.get_autotune_adjustment(), cap);
    }
}

#[test]
fn hit_always_puts_block_at_back_of_its_level() {
    let mut mq = MultiQueue::new(16, 4);
    for i in 0..16 {
        mq.hit(i);
        assert!(mq.check_invariants().is_ok());
    }
}
