//! Question generators.
//!
//! Both generators take a caller-supplied `Rng` so rounds can be replayed
//! deterministically from a seed. Generation always terminates: distractor
//! sampling is bounded, and exhausted sampling falls back to the smallest
//! unused positive integers so a question always carries exactly four
//! distinct options.

pub mod arithmetic;
pub mod counting;

/// Number of answer options per question, the correct one included.
pub const OPTION_COUNT: usize = 4;

/// Bounded attempts for preferred-range distractor sampling.
const MAX_SAMPLE_ATTEMPTS: u32 = 50;

/// Terminal fallback: top up `options` to [`OPTION_COUNT`] with the
/// smallest positive integers not already present.
fn fill_missing(options: &mut Vec<u32>) {
    let mut candidate = 1u32;
    while options.len() < OPTION_COUNT {
        if !options.contains(&candidate) {
            options.push(candidate);
        }
        candidate += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_missing_skips_present_values() {
        let mut options = vec![1, 3];
        fill_missing(&mut options);
        assert_eq!(options, vec![1, 3, 2, 4]);
    }

    #[test]
    fn fill_missing_on_empty() {
        let mut options = Vec::new();
        fill_missing(&mut options);
        assert_eq!(options, vec![1, 2, 3, 4]);
    }
}
