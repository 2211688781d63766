//! Progressive target refinement.
//!
//! The outer loop solves the target 32 bits at a time: run the pipeline
//! against the lowest unsolved window, fold the recovered seeds' hashes
//! into a running sum, and re-target the next window with the residual
//! the sum still owes.

use std::path::Path;
use std::time::Instant;

use bytemuck::Zeroable;
use sha2::{Digest, Sha256};

use crate::config::Params;
use crate::elem::Element;
use crate::error::SeedsumError;
use crate::generator::Generator;
use crate::stats::RunStats;

pub struct Solution {
    /// Recovered seeds across all outer iterations, in iteration order.
    pub seeds: Vec<u64>,
    /// Little-endian sum of the recovered seeds' digests.
    pub accum: Element,
    pub stats: RunStats,
}

/// Index of the first 4-byte target window that is non-zero, capped at
/// the last stage. Zero-prefix windows need no work.
pub fn first_unsolved_window(target: &[u8; 32], num_stages: usize) -> usize {
    let mut stage = 0;
    while stage < num_stages - 1 && target[stage * 4..stage * 4 + 4] == [0u8; 4] {
        stage += 1;
    }
    stage
}

/// The working target for an iteration: zeros below `offset`, the full
/// target from there on.
pub fn window_target(target: &[u8; 32], offset: usize) -> Element {
    let mut t = Element::zeroed();
    t.buf[offset..].copy_from_slice(&target[offset..]);
    t
}

/// The working target for the window at `stage`, discounting what
/// `accum` already contributes: `(target_window - accum_window) mod
/// 2^32` in the window, zeros below, the original target above.
pub fn residual_target(target: &[u8; 32], accum: &Element, stage: usize) -> Element {
    let offset = stage * 4;

    let mut a1 = Element::zeroed();
    let mut a2 = Element::zeroed();
    a1.buf[..4].copy_from_slice(&accum.buf[offset..offset + 4]);
    a2.buf[..4].copy_from_slice(&target[offset..offset + 4]);
    a1.negate_and_add(&a2.buf);

    let mut t = Element::zeroed();
    t.buf[offset..offset + 4].copy_from_slice(&a1.buf[..4]);
    t.buf[offset + 4..].copy_from_slice(&target[offset + 4..]);
    t
}

/// Solve `sum_i SHA256(decimal(seed_i)) = target (mod 2^256)` over the
/// first `num_stages*32` bits, printing each recovered seed as
/// `<hex-digest> (<decimal-seed>)`.
pub fn solve(
    mem_dir: &Path,
    target: [u8; 32],
    params: &Params,
) -> Result<Solution, SeedsumError> {
    if params.num_stages < 1 || params.num_stages > 8 {
        return Err(SeedsumError::Config(format!(
            "num_stages must be in 1..=8, got {}",
            params.num_stages
        )));
    }

    let mut gen = Generator::new(mem_dir, params.batch_size, params.merge_limit);
    let mut curr_stage = first_unsolved_window(&target, params.num_stages);
    let mut curr_target = window_target(&target, curr_stage * 4);
    let mut accum = Element::zeroed();
    let mut seeds = Vec::new();

    loop {
        println!("======================== {curr_stage}");
        println!("Processing stages 0 - {curr_stage}");
        println!("Target: {}", curr_target.hex());

        let started = Instant::now();
        let found = gen.run(curr_stage + 1, &curr_target.buf)?;

        for &seed in &found {
            let digest: [u8; 32] = Sha256::digest(seed.to_string().as_bytes()).into();
            println!("{} ({})", hex::encode(digest), seed);

            let mut le = digest;
            le.reverse();
            accum.add(&le);
            seeds.push(seed);
        }

        println!("Window {curr_stage} solved in {:.2?}", started.elapsed());

        curr_stage += 1;
        if curr_stage >= params.num_stages {
            break;
        }

        gen.retire_final_stage();
        curr_target = residual_target(&target, &accum, curr_stage);
    }

    Ok(Solution {
        seeds,
        accum,
        stats: gen.stats.clone(),
    })
}
