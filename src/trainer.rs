use ndarray::{Array2, ArrayView1, Axis};
use rand::{rngs::ThreadRng, Rng};

use crate::builders::NStepTrainerBuilder;
use crate::error::Result;
use crate::estimator::ValueEstimator;
use crate::metrics::MetricsTracker;
use crate::replay_buffer::{NStepReplayBuffer, Transition};

/// Value-learning trainer over an n-step replay buffer.
///
/// Owns the buffer plus an online and a target estimator, and exposes the two
/// operations a driving loop needs: `record` for every environment step and
/// `train` on whatever cadence the driver chooses. Bootstrapped targets use
/// the target estimator and are discounted by `gamma^n`, since each sampled
/// reward is already an n-step discounted sum.
///
/// The trainer is Idle until the buffer holds `min_experience` transitions
/// and Ready from then on; `train` while Idle is a silent no-op, mirroring
/// the usual warm-up semantics of replay-based learners.
///
/// # Example
///
/// ```rust,ignore
/// let mut trainer = NStepTrainer::builder()
///     .online(estimator)
///     .horizon(3)
///     .state_size(4)
///     .num_actions(2)
///     .build()?;
///
/// loop {
///     let action = trainer.act(state.view());
///     let (reward, done, next_state) = env.step(action);
///     trainer.record(Transition { state, action, reward, next_state, done });
///     trainer.train()?;
/// }
/// ```
pub struct NStepTrainer<E: ValueEstimator + Clone> {
    buffer: NStepReplayBuffer,
    online: E,
    target: E,
    batch_size: usize,
    min_experience: usize,
    state_size: usize,
    num_actions: usize,
    epsilon: f32,
    double_dqn: bool,
    target_sync_period: usize,
    train_steps: usize,
    metrics: MetricsTracker,
    rng: ThreadRng,
}

impl<E: ValueEstimator + Clone> NStepTrainer<E> {
    pub fn builder() -> NStepTrainerBuilder<E> {
        NStepTrainerBuilder::new()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        buffer: NStepReplayBuffer,
        online: E,
        target: E,
        batch_size: usize,
        min_experience: usize,
        state_size: usize,
        num_actions: usize,
        epsilon: f32,
        double_dqn: bool,
        target_sync_period: usize,
    ) -> Self {
        NStepTrainer {
            buffer,
            online,
            target,
            batch_size,
            min_experience,
            state_size,
            num_actions,
            epsilon,
            double_dqn,
            target_sync_period,
            train_steps: 0,
            metrics: MetricsTracker::default(),
            rng: rand::thread_rng(),
        }
    }

    /// Record one environment step into the replay buffer.
    pub fn record(&mut self, transition: Transition) {
        self.buffer.record(transition);
    }

    /// Select an action for a state using an epsilon-greedy policy over the
    /// online estimator's predictions.
    pub fn act(&mut self, state: ArrayView1<f32>) -> usize {
        if self.rng.gen::<f32>() < self.epsilon {
            return self.rng.gen_range(0..self.num_actions);
        }

        let batch = state.insert_axis(Axis(0));
        let q_values = self.online.predict(batch);
        let row = q_values.row(0);

        self.metrics
            .record_q_value(row.fold(f32::NEG_INFINITY, |max, &v| max.max(v)));

        row.iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    /// Run one training step.
    ///
    /// Returns `Ok(None)` without touching the estimators while Idle. When
    /// Ready: samples a batch, seeds the target matrix with the online
    /// estimator's own predictions so untaken actions carry no error signal,
    /// overwrites the taken-action column with `reward` for terminal
    /// transitions or `reward + gamma^n * max_next` otherwise, and updates
    /// the online estimator. The reported loss is the mean squared deviation
    /// between the target matrix and the seeded predictions.
    pub fn train(&mut self) -> Result<Option<f32>> {
        if self.buffer.len() < self.min_experience {
            return Ok(None);
        }

        let indices = self.buffer.sample(self.batch_size)?;

        // Gather the batch in index order.
        let mut states = Array2::zeros((self.batch_size, self.state_size));
        let mut next_states = Array2::zeros((self.batch_size, self.state_size));
        for (row, &index) in indices.iter().enumerate() {
            let transition = self.buffer.get(index);
            states.row_mut(row).assign(&transition.state);
            next_states.row_mut(row).assign(&transition.next_state);
        }

        let max_next = self.next_state_values(&next_states);

        // The online estimator's last predict before update must be the
        // current-state batch: update trains against those activations.
        let current_q = self.online.predict(states.view());
        let mut targets = current_q.clone();

        let bootstrap = self.buffer.discount().bootstrap();
        for (row, &index) in indices.iter().enumerate() {
            let transition = self.buffer.get(index);
            targets[[row, transition.action]] = if transition.done {
                transition.reward
            } else {
                transition.reward + bootstrap * max_next[row]
            };
        }

        let loss = (&targets - &current_q)
            .mapv(|v| v * v)
            .mean()
            .unwrap_or(f32::INFINITY);

        self.online.update(targets.view());

        self.train_steps += 1;
        if self.train_steps % self.target_sync_period == 0 {
            self.sync_target();
        }

        self.metrics.record_loss(loss);
        Ok(Some(loss))
    }

    /// Per-row value of the best next action, from the target estimator.
    fn next_state_values(&mut self, next_states: &Array2<f32>) -> Vec<f32> {
        if self.double_dqn {
            // Double DQN: the online estimator selects the action, the target
            // estimator evaluates it.
            let online_next = self.online.predict(next_states.view());
            let target_next = self.target.predict(next_states.view());

            (0..self.batch_size)
                .map(|row| {
                    let best = online_next
                        .row(row)
                        .iter()
                        .enumerate()
                        .max_by(|(_, a), (_, b)| {
                            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
                        })
                        .map(|(idx, _)| idx)
                        .unwrap_or(0);
                    target_next[[row, best]]
                })
                .collect()
        } else {
            let target_next = self.target.predict(next_states.view());

            (0..self.batch_size)
                .map(|row| {
                    target_next
                        .row(row)
                        .fold(f32::NEG_INFINITY, |max, &v| max.max(v))
                })
                .collect()
        }
    }

    /// Refresh the target estimator from the online one.
    pub fn sync_target(&mut self) {
        self.target = self.online.clone();
    }

    /// Update the exploration rate, clamped to `[0, 1]`.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.max(0.0).min(1.0);
        self.metrics.record_epsilon(self.epsilon);
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Number of transitions currently stored.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Whether the warm-up threshold has been reached.
    pub fn is_ready(&self) -> bool {
        self.buffer.len() >= self.min_experience
    }

    /// Training steps completed so far.
    pub fn train_steps(&self) -> usize {
        self.train_steps
    }

    pub fn buffer(&self) -> &NStepReplayBuffer {
        &self.buffer
    }

    pub fn online(&self) -> &E {
        &self.online
    }

    pub fn target(&self) -> &E {
        &self.target
    }

    pub fn metrics(&self) -> &MetricsTracker {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut MetricsTracker {
        &mut self.metrics
    }
}
