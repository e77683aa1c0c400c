use crate::error::{MnemosyneError, Result};
use crate::replay_buffer::NStepReplayBuffer;

/// Builder for NStepReplayBuffer
pub struct NStepReplayBufferBuilder {
    capacity: Option<usize>,
    horizon: Option<usize>,
    gamma: f32,
}

impl NStepReplayBufferBuilder {
    pub fn new() -> Self {
        NStepReplayBufferBuilder {
            capacity: None,
            horizon: None,
            gamma: 0.99,
        }
    }

    /// Set the capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Set the aggregation horizon `n`
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Set the discount factor
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Build the replay buffer
    pub fn build(self) -> Result<NStepReplayBuffer> {
        let capacity = self.capacity.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "capacity".to_string(),
            reason: "Capacity not specified".to_string(),
        })?;

        let horizon = self.horizon.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "horizon".to_string(),
            reason: "Horizon not specified".to_string(),
        })?;

        NStepReplayBuffer::new(capacity, horizon, self.gamma)
    }
}

impl Default for NStepReplayBufferBuilder {
    fn default() -> Self {
        Self::new()
    }
}
