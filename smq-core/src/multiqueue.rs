//! The multiqueue itself: construction, the `hit` fast path, `shuffle`
//! rebalancing, and the autotune feedback loop.

use crate::block::{Block, NIL};
use crate::level::Level;

/// Partitions a fixed population of `N` blocks across `L` ordered
/// levels, promoting/demoting them over time so that the top levels
/// track the true working set.
///
/// All `N` blocks are allocated at construction and live for the
/// multiqueue's whole lifetime — a block's index is its identity, and
/// `level` alone models cache residency. See the crate-level docs for
/// the full data model.
#[derive(Debug)]
pub struct MultiQueue {
    blocks: Vec<Block>,
    levels: Vec<Level>,
    autotune_hits: u64,
    autotune_misses: u64,
    /// Set during a `shuffle` that performed a multi-level jump.
    /// Cleared at the start of the next `shuffle`.
    autotune_overfull: bool,
}

impl MultiQueue {
    /// Allocates `nr_blocks` blocks, all at level 0, linked at the back
    /// of `levels[0]` in index order.
    ///
    /// # Panics
    ///
    /// Panics if `nr_levels == 0` — failing loudly here beats silently
    /// misbehaving on every later call (see DESIGN.md).
    pub fn new(nr_blocks: usize, nr_levels: usize) -> Self {
        assert!(nr_levels >= 1, "MultiQueue requires at least one level");
        log::debug!(
            "constructing multiqueue: nr_blocks={nr_blocks} nr_levels={nr_levels}"
        );

        let mut blocks: Vec<Block> = (0..nr_blocks).map(|_| Block::new(0)).collect();
        let mut levels = vec![Level::new(); nr_levels];

        for idx in 0..nr_blocks {
            levels[0].push_back(&mut blocks, idx as u32);
        }

        Self {
            blocks,
            levels,
            autotune_hits: 0,
            autotune_misses: 0,
            autotune_overfull: false,
        }
    }

    /// Number of tracked blocks.
    pub fn nr_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Number of levels.
    pub fn nr_levels(&self) -> usize {
        self.levels.len()
    }

    /// The diagnostic "in cache" predicate: `level > (L/8)*7`.
    ///
    /// Reproduced literally, integer truncation and all — for `L=64` this
    /// is 56; for `L=6` it is 0, so every level but the coldest counts as
    /// "in cache". It exists purely to bucket `hit` into
    /// `autotune_hits`/`autotune_misses`, not to gate any behavior.
    fn in_cache(&self, level: u32) -> bool {
        let threshold = (self.levels.len() / 8) * 7;
        (level as usize) > threshold
    }

    /// Records a reference to block `index`: bumps its hit counter,
    /// classifies it for autotune, and moves it to the back of its
    /// current level (LRU within the level). Out-of-range indices are
    /// silently ignored — this is the experimental harness's boundary,
    /// not a programmer error worth panicking over.
    pub fn hit(&mut self, index: usize) {
        if index >= self.blocks.len() {
            return;
        }

        let level = self.blocks[index].level;
        self.blocks[index].hit_count += 1;

        if self.in_cache(level) {
            self.autotune_hits += 1;
        } else {
            self.autotune_misses += 1;
        }

        let l = &mut self.levels[level as usize];
        l.erase(&mut self.blocks, index as u32);
        l.push_back(&mut self.blocks, index as u32);
    }

    /// Zeroes every block's hit counter. Linkage and level are untouched.
    pub fn clear_hits(&mut self) {
        for b in &mut self.blocks {
            b.hit_count = 0;
        }
    }

    /// Current population of each level, `levels[0]` first.
    pub fn level_populations(&self) -> Vec<u32> {
        self.levels.iter().map(|l| l.count).collect()
    }

    /// Hit counts in engine order: level `0..L` outer, front-to-back
    /// inner. Position `k` of the result is the `k`-th block in this
    /// total order; the original block index is not recoverable from it.
    pub fn get_hits(&self) -> Vec<u64> {
        let mut out = Vec::with_capacity(self.blocks.len());
        for level in &self.levels {
            let mut idx = level.front();
            while let Some(i) = idx {
                out.push(self.blocks[i as usize].hit_count);
                idx = self.next_in_level(i);
            }
        }
        out
    }

    pub(crate) fn next_in_level(&self, idx: u32) -> Option<u32> {
        let n = self.blocks[idx as usize].next;
        (n != NIL).then_some(n)
    }

    pub(crate) fn prev_in_level(&self, idx: u32) -> Option<u32> {
        let p = self.blocks[idx as usize].prev;
        (p != NIL).then_some(p)
    }

    pub(crate) fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub(crate) fn hit_count_of(&self, idx: u32) -> u64 {
        self.blocks[idx as usize].hit_count
    }

    /// Rebalances the population: promotes blocks from the back of each
    /// level upward, demotes blocks from the front downward, using
    /// `adjustment` as the per-level baseline move count, including the
    /// level-0/level-(L-1) doubling and the dead-band that suppresses
    /// churn at equilibrium.
    ///
    /// Resets the autotune hit/miss counters to 0 on return.
    pub fn shuffle(&mut self, adjustment: u32) {
        let nr_blocks = self.blocks.len() as u32;
        let nr_levels = self.levels.len() as u32;
        let target_per_level = nr_blocks / nr_levels;

        self.autotune_overfull = false;

        let mut promotes: Vec<Level> = vec![Level::new(); nr_levels as usize];
        let mut demotes: Vec<Level> = vec![Level::new(); nr_levels as usize];

        for level in 0..nr_levels {
            let mut target = 0u32;
            if self.levels[level as usize].count > target_per_level + 4 {
                target = (self.levels[level as usize].count - target_per_level) / 4;
            }
            target += adjustment;

            // Promote: move blocks from the back of `level` upward.
            if level < nr_levels - 1 {
                let mut promote_target = target;
                if level == 0 {
                    promote_target *= 2;
                }

                let jump = (promote_target / target_per_level).max(1);
                if jump > 1 {
                    self.autotune_overfull = true;
                }
                let new_level = (level + jump).min(nr_levels - 1);

                let mut moved = 0;
                while moved < promote_target {
                    let Some(idx) = self.levels[level as usize].pop_back(&mut self.blocks) else {
                        break;
                    };
                    self.blocks[idx as usize].level = new_level;
                    promotes[new_level as usize].push_front(&mut self.blocks, idx);
                    moved += 1;
                }
            }

            // Demote: move blocks from the front of `level` downward.
            if level > 0 {
                let mut demote_target = target;
                if level == nr_levels - 1 {
                    demote_target *= 2;
                }

                let jump = (demote_target / target_per_level).max(1);
                if jump > 1 {
                    self.autotune_overfull = true;
                }
                let new_level = if jump > level { 0 } else { level - jump };

                let mut moved = 0;
                while moved < demote_target {
                    let Some(idx) = self.levels[level as usize].pop_front(&mut self.blocks) else {
                        break;
                    };
                    self.blocks[idx as usize].level = new_level;
                    demotes[new_level as usize].push_back(&mut self.blocks, idx);
                    moved += 1;
                }
            }
        }

        for level in 0..nr_levels as usize {
            let mut p = std::mem::take(&mut promotes[level]);
            let mut d = std::mem::take(&mut demotes[level]);
            self.levels[level].splice_front(&mut self.blocks, &mut p);
            self.levels[level].splice_back(&mut self.blocks, &mut d);
        }

        log::trace!(
            "shuffle(adjustment={adjustment}) complete, overfull={}, populations={:?}",
            self.autotune_overfull,
            self.level_populations()
        );

        self.autotune_hits = 0;
        self.autotune_misses = 0;
    }

    /// Whether the most recent `shuffle` performed a multi-level jump on
    /// any level. Diagnostic only.
    pub fn autotune_overfull(&self) -> bool {
        self.autotune_overfull
    }

    /// The adjustment `shuffle_with_autotune` would use right now, were
    /// it called. Reading this does not clear the counters the
    /// subsequent `shuffle` will reset — callers who need both the
    /// adjustment and its effect must read this before calling `shuffle`.
    pub fn get_autotune_adjustment(&self) -> u32 {
        let target_per_level = (self.blocks.len() / self.levels.len()) as u32;
        let max_adjustment = (target_per_level / 4).max(1);

        if self.autotune_hits == 0 {
            // Division by zero is ill-defined upstream; saturate to the cap.
            return max_adjustment;
        }

        let miss_ratio = self.autotune_misses as f64 / self.autotune_hits as f64;
        let miss_ratio = (miss_ratio - 1.0) * 4.0 + 1.0;
        let miss_ratio = miss_ratio.clamp(1.0, max_adjustment as f64);
        miss_ratio.floor() as u32
    }

    /// Computes the current autotune adjustment and shuffles with it.
    pub fn shuffle_with_autotune(&mut self) {
        let adjustment = self.get_autotune_adjustment();
        self.shuffle(adjustment);
    }

    /// Validates invariants 1, 2 and 5 from the testable-properties list:
    /// total population conservation, level-tag/linkage agreement, and
    /// level bounds. O(N + L); meant for tests and debugging, not the
    /// hot path.
    pub fn check_invariants(&self) -> Result<(), String> {
        let total: u32 = self.levels.iter().map(|l| l.count).sum();
        if total as usize != self.blocks.len() {
            return Err(format!(
                "population mismatch: levels sum to {total}, expected {}",
                self.blocks.len()
            ));
        }

        for (level_idx, level) in self.levels.iter().enumerate() {
            let mut walked = 0u32;
            let mut idx = level.front();
            while let Some(i) = idx {
                if self.blocks[i as usize].level as usize != level_idx {
                    return Err(format!(
                        "block {i} linked into level {level_idx} but tagged level {}",
                        self.blocks[i as usize].level
                    ));
                }
                walked += 1;
                idx = self.next_in_level(i);
            }
            if walked != level.count {
                return Err(format!(
                    "level {level_idx} count is {} but walking it found {walked}",
                    level.count
                ));
            }
        }

        for (i, b) in self.blocks.iter().enumerate() {
            if b.level as usize >= self.levels.len() {
                return Err(format!(
                    "block {i} has level {} but there are only {} levels",
                    b.level,
                    self.levels.len()
                ));
            }
        }

        Ok(())
    }
}

#[allow(dead_code)]
fn _assert_send_sync() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<MultiQueue>();
    is_sync::<MultiQueue>();
}
