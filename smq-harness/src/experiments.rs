//! The experiment routines themselves, one per `.dat` file, ported
//! from `generate_multiqueue_data.cc`. Each writes whitespace-separated
//! columns, one record per line, to the given writer; `main.rs` is
//! responsible for opening the actual file and wrapping I/O failures in
//! [`crate::error::HarnessError`].

use std::io::{self, Write};

use smq_core::MultiQueue;
use smq_sampler::Sampler;

use crate::params::Params;
use crate::pdf::{gen1, gen2};

/// Generations between PDF swaps in the changing-pdf experiments,
/// independent of `Params::nr_generations` (matching the original,
/// which hard-codes it separately from the other experiments'
/// constants).
const PDF_SWITCH_PERIOD: usize = 50;

pub fn write_pdf<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let s1 = Sampler::new(params.nr_blocks, gen1);
    let s2 = Sampler::new(params.nr_blocks, gen2);

    for (p1, p2) in s1.get_pdf().iter().zip(s2.get_pdf().iter()) {
        writeln!(out, "{p1} {p2}")?;
    }
    Ok(())
}

pub fn write_summation_table<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let s = Sampler::new(params.nr_blocks, gen1);
    for v in s.get_summation() {
        writeln!(out, "{v}")?;
    }
    Ok(())
}

pub fn write_level_population<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let mut s = Sampler::new(params.nr_blocks, gen1);
    let mut mq = MultiQueue::new(params.nr_blocks, params.nr_levels);

    for _ in 0..params.nr_generations {
        for _ in 0..params.hits_per_generation {
            mq.hit(s.sample());
        }
        mq.shuffle(1);
        mq.clear_hits();

        let line: Vec<String> = mq
            .level_populations()
            .iter()
            .map(|p| p.to_string())
            .collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

/// Runs `L = 2^i` for `i in 0..8` against the same sampler stream,
/// shuffling with autotune, and dumps cumulative (never cleared) hit
/// counts at the end — one line per block ordinal, one column per
/// multiqueue.
pub fn write_hits_vs_levels<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let mut s = Sampler::new(params.nr_blocks, gen1);
    let mut mqs: Vec<MultiQueue> = (0..8)
        .map(|i| MultiQueue::new(params.nr_blocks, 1usize << i))
        .collect();

    for _ in 0..params.nr_generations {
        for _ in 0..params.hits_per_generation {
            let v = s.sample();
            for mq in &mut mqs {
                mq.hit(v);
            }
        }
        for mq in &mut mqs {
            mq.shuffle_with_autotune();
        }
    }

    write_hits_grid(&mqs, params.nr_blocks, out)
}

/// Runs 4 multiqueues (`L=64`) with fixed adjustments `1, 2, 4, 8`,
/// clearing hit counts every generation right after `shuffle` — matching
/// the original verbatim, including that this means the final
/// `get_hits()` dump reflects only the last generation's hits (the
/// generators clear the counters they're about to read one generation
/// later; the upstream code does not special-case the last iteration).
pub fn write_hits_vs_adjustments<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let mut s = Sampler::new(params.nr_blocks, gen1);
    let mut mqs: Vec<MultiQueue> = (0..4)
        .map(|_| MultiQueue::new(params.nr_blocks, 64))
        .collect();

    for _ in 0..params.nr_generations {
        for _ in 0..params.hits_per_generation {
            let v = s.sample();
            for mq in &mut mqs {
                mq.hit(v);
            }
        }

        let mut adjustment = 1u32;
        for mq in &mut mqs {
            mq.shuffle(adjustment);
            mq.clear_hits();
            adjustment *= 2;
        }
    }

    write_hits_grid(&mqs, params.nr_blocks, out)
}

fn write_hits_grid<W: Write>(mqs: &[MultiQueue], nr_blocks: usize, out: &mut W) -> io::Result<()> {
    let hits: Vec<Vec<u64>> = mqs.iter().map(|mq| mq.get_hits()).collect();

    for b in 0..nr_blocks {
        write!(out, "{b}")?;
        for h in &hits {
            write!(out, " {}", h[b])?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Runs 8 multiqueues (`L = 2^i`) in lockstep, printing the hit-analysis
/// ratio at `percent` per generation for each.
pub fn write_ha_vs_levels<W: Write>(params: &Params, percent: u32, out: &mut W) -> io::Result<()> {
    let mut s = Sampler::new(params.nr_blocks, gen1);
    let mut mqs: Vec<MultiQueue> = (0..8)
        .map(|i| MultiQueue::new(params.nr_blocks, 1usize << i))
        .collect();

    for generation in 0..params.nr_generations {
        for _ in 0..params.hits_per_generation {
            let v = s.sample();
            for mq in &mut mqs {
                mq.hit(v);
            }
        }

        for mq in &mut mqs {
            mq.shuffle(1);
        }

        write!(out, "{generation}")?;
        for mq in &mqs {
            let stats = mq.get_hit_analysis(percent);
            let ratio = stats.hits_in_levels as f64 / stats.hits_actual as f64;
            write!(out, " {ratio}")?;
        }
        writeln!(out)?;

        for mq in &mut mqs {
            mq.clear_hits();
        }
    }
    Ok(())
}

/// Drives one `L=64` multiqueue to rough equilibrium, then reports the
/// hit-analysis ratio at every `percent` from 0 to 100 inclusive.
pub fn write_ha_vs_percent<W: Write>(params: &Params, out: &mut W) -> io::Result<()> {
    let mut s = Sampler::new(params.nr_blocks, gen1);
    let mut mq = MultiQueue::new(params.nr_blocks, 64);

    for _ in 0..params.nr_generations {
        for _ in 0..params.hits_per_generation {
            mq.hit(s.sample());
        }
        mq.shuffle(1);
        mq.clear_hits();
    }

    for percent in 0..=100u32 {
        let stats = mq.get_hit_analysis(percent);
        let ratio = stats.hits_in_levels as f64 / stats.hits_actual as f64;
        writeln!(out, "{ratio}")?;
    }
    Ok(())
}

/// Six `L=64` multiqueues whose fixed `adjustment = 2^i` is reapplied
/// every generation, under an alternating pair of PDFs switching every
/// [`PDF_SWITCH_PERIOD`] generations — simulating a workload shift and
/// showing how aggressiveness trades off responsiveness.
pub fn write_ha_with_changing_pdf_vs_adjustments<W: Write>(
    params: &Params,
    out: &mut W,
) -> io::Result<()> {
    let mut s1 = Sampler::new(params.nr_blocks, gen1);
    let mut s2 = Sampler::new(params.nr_blocks, gen2);
    let mut mqs: Vec<MultiQueue> = (0..6)
        .map(|_| MultiQueue::new(params.nr_blocks, 64))
        .collect();

    let total_generations = PDF_SWITCH_PERIOD * 100;
    for generation in 0..total_generations {
        let use_second = ((generation / PDF_SWITCH_PERIOD) & 1) == 1;

        for _ in 0..params.hits_per_generation {
            let v = if use_second { s2.sample() } else { s1.sample() };
            for mq in &mut mqs {
                mq.hit(v);
            }
        }

        write!(out, "{generation}")?;
        for (i, mq) in mqs.iter_mut().enumerate() {
            mq.shuffle(1u32 << i);
            let stats = mq.get_hit_analysis(10);
            let ratio = stats.hits_in_levels as f64 / stats.hits_actual as f64;
            write!(out, " {ratio}")?;
            mq.clear_hits();
        }
        writeln!(out)?;
    }
    Ok(())
}

/// A single `L=64` multiqueue under autotune, across the same
/// alternating-PDF workload shift, reporting both the HIL/HA ratio and
/// the adjustment autotune picked that generation.
pub fn write_ha_with_changing_pdf_and_autotune<W: Write>(
    params: &Params,
    out: &mut W,
) -> io::Result<()> {
    let mut s1 = Sampler::new(params.nr_blocks, gen1);
    let mut s2 = Sampler::new(params.nr_blocks, gen2);
    let mut mq = MultiQueue::new(params.nr_blocks, 64);

    let total_generations = PDF_SWITCH_PERIOD * 6;
    for generation in 0..total_generations {
        let use_second = ((generation / PDF_SWITCH_PERIOD) & 1) == 1;

        for _ in 0..params.hits_per_generation {
            let v = if use_second { s2.sample() } else { s1.sample() };
            mq.hit(v);
        }

        // Read the adjustment before shuffling — shuffle zeroes the
        // counters it's derived from.
        let adjustment = mq.get_autotune_adjustment();
        mq.shuffle_with_autotune();

        let stats = mq.get_hit_analysis(10);
        let ratio = stats.hits_in_levels as f64 / stats.hits_actual as f64;
        writeln!(out, "{generation} {ratio} {adjustment}")?;

        mq.clear_hits();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> Params {
        Params {
            nr_blocks: 64,
            hits_per_generation: 200,
            nr_generations: 5,
            nr_levels: 8,
        }
    }

    #[test]
    fn level_population_emits_one_line_per_generation_with_nr_levels_columns() {
        let params = small_params();
        let mut buf = Vec::new();
        write_level_population(&params, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), params.nr_generations);

        for line in lines {
            let cols: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(cols.len(), params.nr_levels);
            let total: u32 = cols.iter().map(|c| c.parse::<u32>().unwrap()).sum();
            assert_eq!(total as usize, params.nr_blocks);
        }
    }

    #[test]
    fn pdf_file_has_two_columns_per_bin() {
        let params = small_params();
        let mut buf = Vec::new();
        write_pdf(&params, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), params.nr_blocks);
        for line in lines {
            assert_eq!(line.split_whitespace().count(), 2);
        }
    }

    #[test]
    fn hits_vs_levels_has_one_row_per_block_and_8_columns() {
        let params = small_params();
        let mut buf = Vec::new();
        write_hits_vs_levels(&params, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), params.nr_blocks);
        for (i, line) in lines.iter().enumerate() {
            let cols: Vec<&str> = line.split_whitespace().collect();
            assert_eq!(cols.len(), 9); // ordinal + 8 multiqueues
            assert_eq!(cols[0].parse::<usize>().unwrap(), i);
        }
    }

    #[test]
    fn ha_vs_percent_has_101_lines() {
        let params = small_params();
        let mut buf = Vec::new();
        write_ha_vs_percent(&params, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 101);
    }
}
