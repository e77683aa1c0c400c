use crate::error::{MnemosyneError, Result};
use crate::estimator::ValueEstimator;
use crate::replay_buffer::NStepReplayBuffer;
use crate::trainer::NStepTrainer;

/// Builder for NStepTrainer
///
/// Required: the online estimator, `horizon`, `state_size`, and
/// `num_actions`. The target estimator defaults to a clone of the online
/// one. Remaining knobs default to the usual replay-learner settings:
/// capacity 10000, warm-up threshold 100, batch size 32, gamma 0.99,
/// epsilon 1.0, target sync every 1000 steps, plain (non-double) targets.
pub struct NStepTrainerBuilder<E> {
    online: Option<E>,
    target: Option<E>,
    capacity: usize,
    horizon: Option<usize>,
    gamma: f32,
    batch_size: usize,
    min_experience: usize,
    state_size: Option<usize>,
    num_actions: Option<usize>,
    epsilon: f32,
    double_dqn: bool,
    target_sync_period: usize,
}

impl<E: ValueEstimator + Clone> NStepTrainerBuilder<E> {
    pub fn new() -> Self {
        NStepTrainerBuilder {
            online: None,
            target: None,
            capacity: 10000,
            horizon: None,
            gamma: 0.99,
            batch_size: 32,
            min_experience: 100,
            state_size: None,
            num_actions: None,
            epsilon: 1.0,
            double_dqn: false,
            target_sync_period: 1000,
        }
    }

    /// Set the online estimator
    pub fn online(mut self, online: E) -> Self {
        self.online = Some(online);
        self
    }

    /// Set the target estimator (defaults to a clone of the online one)
    pub fn target(mut self, target: E) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the buffer capacity
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
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

    /// Set the training batch size
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the warm-up threshold: training is a no-op below it
    pub fn min_experience(mut self, min_experience: usize) -> Self {
        self.min_experience = min_experience;
        self
    }

    /// Set the state vector length
    pub fn state_size(mut self, state_size: usize) -> Self {
        self.state_size = Some(state_size);
        self
    }

    /// Set the number of discrete actions
    pub fn num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = Some(num_actions);
        self
    }

    /// Set the initial exploration rate
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Use the double-DQN target rule
    pub fn double_dqn(mut self, double_dqn: bool) -> Self {
        self.double_dqn = double_dqn;
        self
    }

    /// Set how many training steps pass between target refreshes
    pub fn target_sync_period(mut self, period: usize) -> Self {
        self.target_sync_period = period;
        self
    }

    /// Build the trainer
    pub fn build(self) -> Result<NStepTrainer<E>> {
        let online = self.online.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "online".to_string(),
            reason: "Online estimator not specified".to_string(),
        })?;

        let horizon = self.horizon.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "horizon".to_string(),
            reason: "Horizon not specified".to_string(),
        })?;

        let state_size = self.state_size.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "state_size".to_string(),
            reason: "State size not specified".to_string(),
        })?;

        let num_actions = self.num_actions.ok_or_else(|| MnemosyneError::InvalidParameter {
            name: "num_actions".to_string(),
            reason: "Number of actions not specified".to_string(),
        })?;

        if state_size == 0 {
            return Err(MnemosyneError::invalid_parameter(
                "state_size",
                "must be at least 1",
            ));
        }
        if num_actions == 0 {
            return Err(MnemosyneError::invalid_parameter(
                "num_actions",
                "must be at least 1",
            ));
        }
        if self.batch_size == 0 {
            return Err(MnemosyneError::invalid_parameter(
                "batch_size",
                "must be at least 1",
            ));
        }
        if self.target_sync_period == 0 {
            return Err(MnemosyneError::invalid_parameter(
                "target_sync_period",
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(MnemosyneError::invalid_parameter(
                "epsilon",
                "must lie in [0, 1]",
            ));
        }

        if horizon == 0 {
            return Err(MnemosyneError::invalid_parameter(
                "horizon",
                "must be at least 1",
            ));
        }

        // The first Ready train must find enough finalized slots: the n - 1
        // newest slots are always pending.
        if self.min_experience < self.batch_size + horizon - 1 {
            return Err(MnemosyneError::invalid_parameter(
                "min_experience",
                "must be at least batch_size + horizon - 1 so a full batch is eligible",
            ));
        }
        if self.min_experience > self.capacity {
            return Err(MnemosyneError::invalid_parameter(
                "min_experience",
                "cannot exceed capacity",
            ));
        }

        // Validates horizon >= 1, capacity >= horizon, gamma in [0, 1).
        let buffer = NStepReplayBuffer::new(self.capacity, horizon, self.gamma)?;

        let target = self.target.unwrap_or_else(|| online.clone());

        Ok(NStepTrainer::from_parts(
            buffer,
            online,
            target,
            self.batch_size,
            self.min_experience,
            state_size,
            num_actions,
            self.epsilon,
            self.double_dqn,
            self.target_sync_period,
        ))
    }
}

impl<E: ValueEstimator + Clone> Default for NStepTrainerBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
