//! Packed record types for the collision tree.
//!
//! Digests are stored little-endian (reversed from SHA-256 output) so
//! that lexicographic byte comparison equals unsigned 256-bit integer
//! comparison. Sorting and merging depend on this.

use bytemuck::{Pod, Zeroable};

/// A 256-bit digest plus the id of the seed or synthesized sum it
/// belongs to.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element {
    pub buf: [u8; 32],
    pub id: u64,
}

unsafe impl Zeroable for Element {}
unsafe impl Pod for Element {}

/// Ancestry record: the element with id `local_id` one stage up is the
/// modular sum of the elements with ids `parent1` and `parent2`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoundRecord {
    pub local_id: u64,
    pub parent1: u64,
    pub parent2: u64,
}

unsafe impl Zeroable for FoundRecord {}
unsafe impl Pod for FoundRecord {}

// Records are mapped directly out of spill files; any padding would
// corrupt the on-disk layout.
const _: () = assert!(std::mem::size_of::<Element>() == 40);
const _: () = assert!(std::mem::align_of::<Element>() == 8);
const _: () = assert!(std::mem::size_of::<FoundRecord>() == 24);
const _: () = assert!(std::mem::align_of::<FoundRecord>() == 8);

impl Element {
    /// `buf <- (buf + other) mod 2^256`.
    pub fn add(&mut self, other: &[u8; 32]) {
        self.add_carry(other, 0);
    }

    /// `buf <- (target - buf) mod 2^256`, via two's complement.
    pub fn negate_and_add(&mut self, target: &[u8; 32]) {
        for b in self.buf.iter_mut() {
            *b = !*b;
        }
        self.add_carry(target, 1);
    }

    fn add_carry(&mut self, other: &[u8; 32], mut carry: u64) {
        for i in 0..32 {
            carry += self.buf[i] as u64 + other[i] as u64;
            self.buf[i] = (carry & 0xff) as u8;
            carry >>= 8;
        }
    }

    /// Big-endian hex rendering of the little-endian buffer.
    pub fn hex(&self) -> String {
        let mut be = self.buf;
        be.reverse();
        hex::encode(be)
    }
}
