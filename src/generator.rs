//! Stage orchestration: feeding fresh hashes, scheduling expands, and
//! walking ancestry back to seeds.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::error::SeedsumError;
use crate::stage::Stage;
use crate::stats::RunStats;

pub struct Generator {
    mem_dir: PathBuf,
    pub batch_size: usize,
    pub merge_limit: usize,
    /// Next fresh seed, strictly increasing from 1.
    pub curr_seed: u64,
    pub stages: Vec<Stage>,
    pub stats: RunStats,
}

impl Generator {
    pub fn new(mem_dir: &Path, batch_size: usize, merge_limit: usize) -> Generator {
        Generator {
            mem_dir: mem_dir.to_path_buf(),
            batch_size,
            merge_limit,
            curr_seed: 1,
            stages: Vec::new(),
            stats: RunStats::new(),
        }
    }

    /// Run the stage pipeline until the final stage reports a match,
    /// then resolve it to seed ids. Stages surviving from a previous
    /// call are kept; only the missing ones are created.
    pub fn run(
        &mut self,
        num_stages: usize,
        target: &[u8; 32],
    ) -> Result<BTreeSet<u64>, SeedsumError> {
        if num_stages == 0 {
            return Err(SeedsumError::Internal("no stages to run".into()));
        }

        if !self.stages.is_empty() {
            println!("Resuming at stage {}", self.stages.len());
        }

        for i in self.stages.len()..num_stages {
            self.stages
                .push(Stage::new(&self.mem_dir, i as u64, self.merge_limit));
        }
        self.stages[num_stages - 1].is_final = true;

        // Placeholder stage so the final stage has an outbox to borrow.
        self.stages.push(Stage::new(&self.mem_dir, 0, 0));

        print!("merge limits: ");
        for i in 0..num_stages {
            print!(" {}:{}", i, self.stages[i].stop_merging);
        }
        println!();

        loop {
            print!("Sizes:");
            for i in 0..num_stages {
                if self.stages[i].big.is_empty() {
                    break;
                }
                print!(
                    " {}:{}{}",
                    i,
                    self.stages[i].big.len(),
                    if self.stages[i].big.len() >= self.stages[i].stop_merging {
                        "(done)"
                    } else {
                        ""
                    }
                );
            }
            println!();

            // Drain upper-stage backlog before hashing fresh seeds.
            for i in (0..num_stages).rev() {
                if i == 0 && self.stages[0].inbox.is_empty() {
                    println!("Generating {} fresh hashes", self.batch_size);
                    self.populate_hashes(self.batch_size)?;
                }

                if i == 0 || !self.stages[i].inbox.is_empty() {
                    let (head, tail) = self.stages.split_at_mut(i + 1);
                    let ids = head[i].expand(target, &mut tail[0].inbox)?;
                    self.stats.expands += 1;
                    if !ids.is_empty() {
                        return self.recover_seeds(ids, i);
                    }
                    break;
                }
            }

            println!("------------------");
        }
    }

    /// Fill stage 0's inbox with `num_recs` fresh elements. Each seed
    /// is hashed as its decimal ASCII rendering and the digest is
    /// reversed into little-endian storage.
    fn populate_hashes(&mut self, num_recs: usize) -> Result<(), SeedsumError> {
        self.stages[0].inbox.resize(num_recs)?;

        let base = self.curr_seed;
        self.stages[0]
            .inbox
            .as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, elem)| {
                let seed = base + i as u64;
                let mut buf: [u8; 32] = Sha256::digest(seed.to_string().as_bytes()).into();
                buf.reverse();
                elem.buf = buf;
                elem.id = seed;
            });

        self.curr_seed += num_recs as u64;
        self.stats.hashes += num_recs as u64;
        self.stats.batches += 1;
        Ok(())
    }

    /// Walk ancestry downward from the stage below `final_stage`,
    /// replacing each id by its two parents, until only stage-0 seed
    /// ids remain.
    pub fn recover_seeds(
        &self,
        mut ids: BTreeSet<u64>,
        final_stage: usize,
    ) -> Result<BTreeSet<u64>, SeedsumError> {
        for i in (0..final_stage).rev() {
            let found = self.stages[i].found.as_slice();
            let mut parents = BTreeSet::new();

            for id in ids {
                let idx = found
                    .binary_search_by(|f| f.local_id.cmp(&id))
                    .map_err(|_| SeedsumError::UnknownAncestor { id, stage: i })?;
                parents.insert(found[idx].parent1);
                parents.insert(found[idx].parent2);
            }

            ids = parents;
        }

        Ok(ids)
    }

    /// Outer-loop cleanup when the driver advances to the next target
    /// window: drop the placeholder and the solved final stage, and
    /// clear the surviving top stage's ancestry (its emissions lived in
    /// the popped stage).
    pub fn retire_final_stage(&mut self) {
        self.stages.pop();
        self.stages.pop();
        if let Some(top) = self.stages.last_mut() {
            top.found.clear();
        }
    }
}
