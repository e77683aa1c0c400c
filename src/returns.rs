//! Discounted n-step return computation.
//!
//! A recorded transition holds a single-step reward. Exactly `n` steps after
//! it is recorded, the buffer folds the window of `n` consecutive transitions
//! starting at it into one aggregated transition whose reward is the
//! discounted sum over the window. Folding is a pure computation here; the
//! buffer performs the in-place write.

use serde::{Deserialize, Serialize};

use crate::replay_buffer::Transition;

/// Precomputed powers of the discount factor, `gamma^0` through `gamma^n`.
///
/// Built once at construction so the per-step fold and the bootstrap term
/// never recompute exponentials.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscountTable {
    gamma: f32,
    powers: Vec<f32>,
}

impl DiscountTable {
    pub fn new(gamma: f32, horizon: usize) -> Self {
        let powers = (0..=horizon).map(|i| gamma.powi(i as i32)).collect();
        DiscountTable { gamma, powers }
    }

    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Number of steps folded into one aggregated transition.
    pub fn horizon(&self) -> usize {
        self.powers.len() - 1
    }

    /// `gamma^i` for `i` within `0..=horizon`.
    pub fn power(&self, i: usize) -> f32 {
        self.powers[i]
    }

    /// `gamma^n`, the discount applied to the bootstrapped tail value.
    pub fn bootstrap(&self) -> f32 {
        self.powers[self.powers.len() - 1]
    }
}

/// Fold the window `[start, start + horizon)` of `slots` into one aggregated
/// transition.
///
/// The reward is `sum(gamma^i * reward_i)` over the window, truncated
/// immediately after the first terminal step. `done` and `next_state` come
/// from the last step included in the sum; `state` and `action` are copied
/// unchanged from the transition at `start`. With `horizon == 1` this is a
/// pass-through and the aggregated transition equals the raw one.
///
/// Indices wrap modulo `slots.len()`; the caller guarantees the window holds
/// the `horizon` most recently recorded transitions.
pub fn n_step_return(
    slots: &[Transition],
    start: usize,
    horizon: usize,
    table: &DiscountTable,
) -> Transition {
    let first = &slots[start];
    let mut folded = Transition {
        state: first.state.clone(),
        action: first.action,
        reward: 0.0,
        next_state: first.next_state.clone(),
        done: first.done,
    };

    for offset in 0..horizon {
        let step = &slots[(start + offset) % slots.len()];
        folded.done = step.done;
        folded.next_state = step.next_state.clone();
        folded.reward += table.power(offset) * step.reward;

        if step.done {
            break;
        }
    }

    folded
}
