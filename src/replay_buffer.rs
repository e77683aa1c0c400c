use ndarray::Array1;
use rand::thread_rng;
use serde::{Deserialize, Serialize};

use crate::error::{MnemosyneError, Result};
use crate::returns::{n_step_return, DiscountTable};
use crate::sampler;

/// One recorded environment interaction step.
///
/// Raw when recorded; rewritten in place with its n-step aggregated form once
/// the buffer has seen the `n - 1` transitions that follow it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Fixed-capacity circular experience buffer with lazy n-step aggregation.
///
/// Writes advance a cursor modulo the capacity and overwrite the oldest slot
/// once the buffer is full. After every write, once at least `n` transitions
/// exist, the slot written `n` steps ago is folded in place into its n-step
/// form. The `n - 1` slots written after it still hold raw single-step data
/// ("pending") and are excluded from sampling until their own fold; during
/// warm-up (fewer than `n` transitions) nothing is eligible.
#[derive(Clone, Serialize, Deserialize)]
pub struct NStepReplayBuffer {
    slots: Vec<Transition>,
    capacity: usize,
    cursor: usize,
    horizon: usize,
    discount: DiscountTable,
    pending: Vec<usize>,
}

impl NStepReplayBuffer {
    /// Create a buffer with the given capacity, aggregation horizon `n`, and
    /// discount factor.
    ///
    /// Fails fast on misconfiguration rather than clamping: `horizon` must be
    /// at least 1, `capacity` must hold at least one full window, and `gamma`
    /// must lie in `[0, 1)`.
    pub fn new(capacity: usize, horizon: usize, gamma: f32) -> Result<Self> {
        if horizon < 1 {
            return Err(MnemosyneError::invalid_parameter(
                "horizon",
                "must be at least 1",
            ));
        }
        if capacity < horizon {
            return Err(MnemosyneError::invalid_parameter(
                "capacity",
                "must be at least the aggregation horizon",
            ));
        }
        if !(0.0..1.0).contains(&gamma) {
            return Err(MnemosyneError::invalid_parameter(
                "gamma",
                "must lie in [0, 1)",
            ));
        }

        Ok(NStepReplayBuffer {
            slots: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            horizon,
            discount: DiscountTable::new(gamma, horizon),
            pending: Vec::with_capacity(horizon.saturating_sub(1)),
        })
    }

    /// Record a raw transition.
    ///
    /// Always accepts: once full the buffer overwrites the oldest slot. When
    /// at least `horizon` transitions exist, folds the slot written `horizon`
    /// steps ago into its n-step form and recomputes the pending set. The
    /// pending set covers the whole tail of the window even when the fold
    /// truncated early at a terminal step, because those slots still hold raw
    /// data awaiting their own fold.
    pub fn record(&mut self, transition: Transition) {
        if self.slots.len() < self.capacity {
            self.slots.push(transition);
        } else {
            self.slots[self.cursor] = transition;
        }
        self.cursor = (self.cursor + 1) % self.capacity;

        if self.slots.len() < self.horizon {
            return;
        }

        let start = (self.cursor + self.capacity - self.horizon) % self.capacity;
        let folded = n_step_return(&self.slots, start, self.horizon, &self.discount);
        self.slots[start] = folded;

        self.pending.clear();
        for offset in 1..self.horizon {
            self.pending.push((start + offset) % self.capacity);
        }
    }

    /// Draw `batch_size` distinct eligible indices uniformly at random.
    ///
    /// Starvation (`batch_size` exceeding the eligible count) is reported
    /// before any drawing happens; the rejection loop itself cannot spin
    /// indefinitely.
    pub fn sample(&self, batch_size: usize) -> Result<Vec<usize>> {
        if self.slots.len() < self.horizon {
            return Err(MnemosyneError::SamplerStarvation {
                requested: batch_size,
                eligible: 0,
            });
        }
        let mut rng = thread_rng();
        sampler::draw_batch(&mut rng, self.slots.len(), &self.pending, batch_size)
    }

    /// Constant-time access to the transition in a slot.
    pub fn get(&self, index: usize) -> &Transition {
        &self.slots[index]
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of finalized slots a batch may be drawn from.
    ///
    /// Zero during warm-up: before the first fold every slot is raw even
    /// though the pending set has not been populated yet.
    pub fn eligible_len(&self) -> usize {
        if self.slots.len() < self.horizon {
            0
        } else {
            self.slots.len() - self.pending.len()
        }
    }

    /// Slots holding raw, not-yet-folded transitions.
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn discount(&self) -> &DiscountTable {
        &self.discount
    }

    /// Save a snapshot of the buffer to disk.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load a buffer snapshot from disk.
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(bincode::deserialize(&data)?)
    }
}
