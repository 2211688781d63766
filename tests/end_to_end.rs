use bytemuck::Zeroable;
use seedsum::{parse_target, solve, Element, Params};
use sha2::{Digest, Sha256};
use tempfile::tempdir;

fn small_params(num_stages: usize, batch_size: usize) -> Params {
    Params {
        num_stages,
        batch_size,
        merge_limit: 4_000_000_000,
    }
}

fn digest_sum(seeds: &[u64]) -> Element {
    let mut sum = Element::zeroed();
    for &seed in seeds {
        let mut le: [u8; 32] = Sha256::digest(seed.to_string().as_bytes()).into();
        le.reverse();
        sum.add(&le);
    }
    sum
}

#[test]
fn zero_window_pair() {
    let dir = tempdir().unwrap();
    let solution = solve(dir.path(), [0u8; 32], &small_params(1, 1024)).unwrap();

    assert_eq!(solution.seeds.len(), 2);
    assert_ne!(solution.seeds[0], solution.seeds[1]);
    assert_eq!(solution.accum.buf[..4], [0u8; 4]);

    let sum = digest_sum(&solution.seeds);
    assert_eq!(sum.buf, solution.accum.buf);
}

#[test]
fn identical_runs_find_identical_seeds() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    let params = small_params(1, 1024);

    let a = solve(dir_a.path(), [0u8; 32], &params).unwrap();
    let b = solve(dir_b.path(), [0u8; 32], &params).unwrap();

    assert_eq!(a.seeds, b.seeds);
    assert_eq!(a.accum.buf, b.accum.buf);
}

#[test]
fn single_window_target_is_hit() {
    let dir = tempdir().unwrap();
    let (target, num_stages) = parse_target("DEADBEEF").unwrap();

    let solution = solve(dir.path(), target, &small_params(num_stages, 1024)).unwrap();

    assert!(!solution.seeds.is_empty());
    assert_eq!(solution.accum.buf[..4], [0xEF, 0xBE, 0xAD, 0xDE]);
    assert_eq!(digest_sum(&solution.seeds).buf, solution.accum.buf);
}

// Two progressive windows need tens of millions of hashes; run with
// `cargo test --release -- --ignored`.
#[test]
#[ignore]
fn progressive_refinement_extends_solution() {
    let dir = tempdir().unwrap();
    let (target, num_stages) = parse_target("DEADBEEFCAFEBABE").unwrap();
    assert_eq!(num_stages, 2);

    let solution = solve(dir.path(), target, &small_params(2, 1 << 20)).unwrap();

    assert!(!solution.seeds.is_empty());
    assert_eq!(solution.accum.buf[..8], target[..8]);
    assert_eq!(digest_sum(&solution.seeds).buf, solution.accum.buf);
}
