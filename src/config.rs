//! Runtime parameters and target parsing.

use std::env;

use crate::error::SeedsumError;

/// Tunables for a solving run.
#[derive(Debug, Clone)]
pub struct Params {
    /// Number of collision-tree stages; each stage pins another 32 bits
    /// of the target.
    pub num_stages: usize,
    /// Fresh hashes generated per stage-0 refill.
    pub batch_size: usize,
    /// Per-stage cap on `big`, in elements.
    pub merge_limit: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            num_stages: 8,
            batch_size: 500_000_000,
            merge_limit: 4_000_000_000,
        }
    }
}

impl Params {
    /// Apply NUMSTAGES / BATCHSIZE / MERGELIMIT environment overrides.
    /// Every accepted value is echoed as `NAME = value`.
    pub fn apply_env(&mut self) -> Result<(), SeedsumError> {
        env_param("NUMSTAGES", &mut self.num_stages, 1, 8)?;
        env_param("BATCHSIZE", &mut self.batch_size, 1, usize::MAX)?;
        env_param("MERGELIMIT", &mut self.merge_limit, 0, usize::MAX)?;
        Ok(())
    }
}

fn env_param(
    name: &str,
    value: &mut usize,
    min: usize,
    max: usize,
) -> Result<(), SeedsumError> {
    if let Ok(raw) = env::var(name) {
        *value = raw.trim().parse().map_err(|_| {
            SeedsumError::Config(format!("invalid value for {name}: '{raw}'"))
        })?;
    }
    if *value < min {
        return Err(SeedsumError::Config(format!(
            "param {name} too small, min = {min}"
        )));
    }
    if *value > max {
        return Err(SeedsumError::Config(format!(
            "param {name} too big, max = {max}"
        )));
    }
    println!("{name} = {value}");
    Ok(())
}

/// Parse a big-endian hex target into little-endian storage. The length
/// must be a non-empty multiple of 8 hex digits, at most 64; the stage
/// count is one per 4 target bytes.
pub fn parse_target(hex_target: &str) -> Result<([u8; 32], usize), SeedsumError> {
    if hex_target.is_empty() || hex_target.len() % 8 != 0 || hex_target.len() > 64 {
        return Err(SeedsumError::Config(format!(
            "bad size for target: '{hex_target}' (need a multiple of 8 hex digits, up to 64)"
        )));
    }

    let mut bytes = hex::decode(hex_target)
        .map_err(|e| SeedsumError::Config(format!("invalid target hex: {e}")))?;
    bytes.reverse();

    let num_stages = bytes.len() / 4;
    let mut target = [0u8; 32];
    target[..bytes.len()].copy_from_slice(&bytes);

    Ok((target, num_stages))
}
