//! The diagnostic oracle: how closely does the engine's level ordering
//! track the true top-K hottest blocks?

use crate::multiqueue::MultiQueue;

/// Result of [`MultiQueue::get_hit_analysis`].
///
/// `hits_in_levels <= hits_actual` always, since `hits_actual` sums the
/// maximum possible top-K selection. The ratio of the two is the metric:
/// 1.0 means the engine's level ordering exactly matches the ideal
/// oracle ordering for that `percent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitAnalysis {
    pub percent: u32,
    pub hits_in_levels: u64,
    pub hits_actual: u64,
}

impl MultiQueue {
    /// Compares the hits accumulated in the top `percent`% of the
    /// engine's level positions (hottest level, back of level first)
    /// against the hits of the true top `percent`% hottest blocks.
    ///
    /// Pure: does not mutate any state. `percent = 0` returns
    /// `{0, 0, 0}` — callers must guard the `hits_in_levels /
    /// hits_actual` ratio against division by zero themselves.
    pub fn get_hit_analysis(&self, percent: u32) -> HitAnalysis {
        let n = self.nr_blocks() as u64;
        let mut remaining = (n * percent as u64) / 100;
        let k_actual = remaining as usize;

        let mut hits_in_levels = 0u64;
        'levels: for level in self.levels().iter().rev() {
            let mut idx = level.back();
            while let Some(i) = idx {
                if remaining == 0 {
                    break 'levels;
                }
                hits_in_levels += self.hit_count_of(i);
                remaining -= 1;
                idx = self.prev_in_level(i);
            }
        }

        let mut counts: Vec<u64> = (0..self.nr_blocks() as u32)
            .map(|i| self.hit_count_of(i))
            .collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        let hits_actual: u64 = counts.iter().take(k_actual).sum();

        HitAnalysis {
            percent,
            hits_in_levels,
            hits_actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_percent_is_all_zero() {
        let mut mq = MultiQueue::new(100, 4);
        mq.hit(0);
        let r = mq.get_hit_analysis(0);
        assert_eq!(r, HitAnalysis { percent: 0, hits_in_levels: 0, hits_actual: 0 });
    }

    #[test]
    fn uniform_hits_give_equal_hil_and_ha() {
        let mut mq = MultiQueue::new(100, 4);
        for i in 0..100 {
            mq.hit(i);
        }
        let r = mq.get_hit_analysis(10);
        assert_eq!(r.hits_in_levels, 10);
        assert_eq!(r.hits_actual, 10);
    }

    #[test]
    fn hil_never_exceeds_ha() {
        let mut mq = MultiQueue::new(200, 16);
        for i in 0..200 {
            for _ in 0..(i % 5) {
                mq.hit(i);
            }
        }
        mq.shuffle(1);
        for percent in 0..=100 {
            let r = mq.get_hit_analysis(percent);
            assert!(r.hits_in_levels <= r.hits_actual, "percent={percent}");
        }
    }
}
