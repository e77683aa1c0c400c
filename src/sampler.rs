//! Uniform batch index selection by rejection sampling.

use rand::Rng;

use crate::error::{MnemosyneError, Result};

/// Draw `batch_size` distinct indices uniformly from `0..len`, skipping the
/// pending set.
///
/// Each draw is rejected if it hit a pending slot or a slot already chosen in
/// this batch; sampling is with replacement across calls, without replacement
/// within one. `batch_size == len - pending.len()` is the largest request
/// that can terminate, and exactly exhausts the eligible set; anything larger
/// is reported as starvation before the loop runs.
///
/// The linear membership scans keep the loop allocation-free; they are cheap
/// because `pending` has at most `n - 1` entries and batches stay small
/// relative to the buffer.
pub fn draw_batch<R: Rng>(
    rng: &mut R,
    len: usize,
    pending: &[usize],
    batch_size: usize,
) -> Result<Vec<usize>> {
    let eligible = len - pending.len();
    if batch_size > eligible {
        return Err(MnemosyneError::SamplerStarvation {
            requested: batch_size,
            eligible,
        });
    }

    let mut chosen = Vec::with_capacity(batch_size);
    while chosen.len() < batch_size {
        let index = rng.gen_range(0..len);

        if pending.contains(&index) || chosen.contains(&index) {
            continue;
        }

        chosen.push(index);
    }

    Ok(chosen)
}
