//! # smq-core
//!
//! The core of a Stochastic MultiQueue (SMQ) cache-replacement engine.
//!
//! The engine partitions a fixed population of tracked blocks across a
//! stack of ordered levels, with higher levels denoting hotter blocks.
//! Every [`MultiQueue::hit`] promotes the referenced block toward the
//! back of its own level; periodically [`MultiQueue::shuffle`] (or its
//! self-tuning sibling [`MultiQueue::shuffle_with_autotune`])
//! rebalances populations across levels so the top band accumulates the
//! true working set while the bottom levels hold cold eviction
//! candidates.
//!
//! This crate has no I/O and no concurrency: it's a single-threaded,
//! synchronous data structure, intended to be driven by an external
//! sampler and harness (see the `smq-sampler` and `smq-harness` crates
//! in this workspace) the same way `smq.h`/`multiqueue.cc` were driven
//! by `generate_multiqueue_data.cc` in the original C++ implementation
//! this crate is ported from.
//!
//! ```
//! use smq_core::MultiQueue;
//!
//! let mut mq = MultiQueue::new(8, 4);
//! for _ in 0..1000 {
//!     mq.hit(3);
//! }
//! for _ in 0..4 {
//!     mq.shuffle(1);
//! }
//! assert_eq!(mq.level_populations().iter().sum::<u32>(), 8);
//! ```

mod block;
mod hit_analysis;
mod level;
mod multiqueue;

pub use hit_analysis::HitAnalysis;
pub use multiqueue::MultiQueue;
