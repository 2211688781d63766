//! One level of the collision tree.
//!
//! A stage accumulates elements into a sorted pool (`big`) and matches
//! each arriving batch against it on a 32*(stage_num+1)-bit prefix.
//! Two elements `a in big`, `b in inbox` sum to the target on that window
//! iff `a` and `target - b` share the prefix, so the batch is negated
//! once and both sides are walked in sorted order.

use std::collections::BTreeSet;
use std::mem;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::elem::{Element, FoundRecord};
use crate::error::SeedsumError;
use crate::fvec::FVec;

pub struct Stage {
    mem_dir: PathBuf,
    name_base: String,
    pub stage_num: u64,
    /// Once `big` reaches this many elements, later inboxes are matched
    /// but no longer merged in.
    pub stop_merging: usize,
    pub is_final: bool,
    /// Next synthesis id, strictly increasing from 1.
    pub curr_id: u64,
    pub inbox: FVec<Element>,
    pub big: FVec<Element>,
    pub found: FVec<FoundRecord>,
}

impl Stage {
    pub fn new(mem_dir: &Path, stage_num: u64, stop_merging: usize) -> Stage {
        let name_base = format!("stage-{stage_num}-");
        Stage {
            inbox: FVec::new(mem_dir, &format!("{name_base}inbox")),
            big: FVec::new(mem_dir, &format!("{name_base}big")),
            found: FVec::new(mem_dir, &format!("{name_base}found")),
            mem_dir: mem_dir.to_path_buf(),
            name_base,
            stage_num,
            stop_merging,
            is_final: false,
            curr_id: 1,
        }
    }

    /// Consume the inbox: negate it, sort, merge into `big` (unless the
    /// merge cap is reached), and walk both sorted runs for prefix
    /// matches. Non-final stages emit synthesized sums into `outbox`
    /// and record their ancestry; the final stage returns the matched
    /// id pair immediately.
    pub fn expand(
        &mut self,
        target: &[u8; 32],
        outbox: &mut FVec<Element>,
    ) -> Result<BTreeSet<u64>, SeedsumError> {
        let orig_found = self.found.len();
        let do_merge = self.big.len() < self.stop_merging;

        self.log(&format!(
            "Status: inbox = {} big = {} found = {}",
            self.inbox.len(),
            self.big.len(),
            self.found.len()
        ));

        self.log("Building negation");

        let mut inbox_negs: FVec<Element> =
            FVec::new(&self.mem_dir, &format!("{}inboxNegs", self.name_base));
        inbox_negs.resize(self.inbox.len())?;

        inbox_negs
            .as_mut_slice()
            .par_iter_mut()
            .zip(self.inbox.as_slice().par_iter())
            .for_each(|(neg, elem)| {
                *neg = *elem;
                neg.negate_and_add(target);
            });

        if do_merge {
            self.log("Sort inbox");
            self.inbox
                .as_mut_slice()
                .par_sort_unstable_by(|a, b| a.buf.cmp(&b.buf));
        }

        self.log("Sort inboxNegs");
        inbox_negs
            .as_mut_slice()
            .par_sort_unstable_by(|a, b| a.buf.cmp(&b.buf));

        if do_merge {
            if !self.big.is_empty() {
                self.log("Merging into big");

                let mut new_big: FVec<Element> =
                    FVec::new(&self.mem_dir, &format!("{}big", self.name_base));
                new_big.resize(self.big.len() + self.inbox.len())?;
                merge_by_digest(
                    self.big.as_slice(),
                    self.inbox.as_slice(),
                    new_big.as_mut_slice(),
                );
                mem::swap(&mut self.big, &mut new_big);
            } else {
                self.log("Moving inbox to big");
                mem::swap(&mut self.big, &mut self.inbox);
            }
        }

        self.log("Finding matches");

        let prefix_len = 4 * (self.stage_num as usize + 1);
        {
            let big = self.big.as_slice();
            let negs = inbox_negs.as_slice();
            let mut a = 0;
            let mut b = 0;

            while a < big.len() && b < negs.len() {
                if big[a].buf[..prefix_len] == negs[b].buf[..prefix_len] {
                    if self.is_final {
                        return Ok(BTreeSet::from([big[a].id, negs[b].id]));
                    }

                    self.found.push_back(FoundRecord {
                        local_id: self.curr_id,
                        parent1: big[a].id,
                        parent2: negs[b].id,
                    })?;

                    // sum = (target - (target - b)) + a = a + b,
                    // following the same byte path the ancestry
                    // record asserts.
                    let mut sum = negs[b];
                    sum.negate_and_add(target);
                    sum.add(&big[a].buf);
                    sum.id = self.curr_id;
                    outbox.push_back(sum)?;

                    self.curr_id += 1;
                }

                if negs[b].buf < big[a].buf {
                    b += 1;
                } else {
                    a += 1;
                }
            }
        }

        self.inbox = FVec::new(&self.mem_dir, &format!("{}inbox", self.name_base));

        self.log(&format!("newly found: {}", self.found.len() - orig_found));

        Ok(BTreeSet::new())
    }

    fn log(&self, msg: &str) {
        let indent = "  ".repeat(self.stage_num as usize + 1);
        println!("{indent}[{}] {msg}", self.stage_num);
    }
}

/// Merge two digest-sorted runs into `out`, which must hold exactly
/// `a.len() + b.len()` elements.
fn merge_by_digest(a: &[Element], b: &[Element], out: &mut [Element]) {
    let mut i = 0;
    let mut j = 0;
    let mut k = 0;

    while i < a.len() && j < b.len() {
        if b[j].buf < a[i].buf {
            out[k] = b[j];
            j += 1;
        } else {
            out[k] = a[i];
            i += 1;
        }
        k += 1;
    }
    while i < a.len() {
        out[k] = a[i];
        i += 1;
        k += 1;
    }
    while j < b.len() {
        out[k] = b[j];
        j += 1;
        k += 1;
    }
}
