use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Bounded histories of the signals the training core produces.
///
/// Estimator internals are opaque to this crate, so there are no gradient or
/// weight statistics here; everything below is observable from the replay
/// protocol itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    /// Monitoring loss per training step
    pub losses: VecDeque<f32>,

    /// Total reward per episode
    pub episode_rewards: VecDeque<f32>,

    /// Steps per episode
    pub episode_lengths: VecDeque<usize>,

    /// Greedy Q-value estimates observed while acting
    pub q_values: VecDeque<f32>,

    /// Exploration rate over time
    pub epsilons: VecDeque<f32>,
}

impl TrainingMetrics {
    pub fn new(history_size: usize) -> Self {
        TrainingMetrics {
            losses: VecDeque::with_capacity(history_size),
            episode_rewards: VecDeque::with_capacity(history_size),
            episode_lengths: VecDeque::with_capacity(history_size),
            q_values: VecDeque::with_capacity(history_size),
            epsilons: VecDeque::with_capacity(history_size),
        }
    }
}

fn push_bounded<T>(history: &mut VecDeque<T>, limit: usize, value: T) {
    if history.len() >= limit {
        history.pop_front();
    }
    history.push_back(value);
}

fn recent_mean(history: &VecDeque<f32>, window: usize) -> Option<f32> {
    if history.is_empty() {
        return None;
    }
    let n = window.min(history.len());
    let sum: f32 = history.iter().rev().take(n).sum();
    Some(sum / n as f32)
}

/// Accumulates training metrics with a fixed history bound.
pub struct MetricsTracker {
    metrics: TrainingMetrics,
    history_size: usize,
    current_episode_reward: f32,
    current_episode_length: usize,
    episode_count: usize,
    total_steps: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: TrainingMetrics::new(history_size),
            history_size,
            current_episode_reward: 0.0,
            current_episode_length: 0,
            episode_count: 0,
            total_steps: 0,
        }
    }

    pub fn record_loss(&mut self, loss: f32) {
        push_bounded(&mut self.metrics.losses, self.history_size, loss);
    }

    pub fn record_q_value(&mut self, q_value: f32) {
        push_bounded(&mut self.metrics.q_values, self.history_size, q_value);
    }

    pub fn record_epsilon(&mut self, epsilon: f32) {
        push_bounded(&mut self.metrics.epsilons, self.history_size, epsilon);
    }

    /// Reset the per-episode accumulators
    pub fn start_episode(&mut self) {
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
    }

    /// Account one environment step within the current episode
    pub fn step(&mut self, reward: f32) {
        self.current_episode_reward += reward;
        self.current_episode_length += 1;
        self.total_steps += 1;
    }

    /// Close the current episode and commit its totals to the history
    pub fn end_episode(&mut self) {
        push_bounded(
            &mut self.metrics.episode_rewards,
            self.history_size,
            self.current_episode_reward,
        );
        push_bounded(
            &mut self.metrics.episode_lengths,
            self.history_size,
            self.current_episode_length,
        );
        self.episode_count += 1;
    }

    pub fn metrics(&self) -> &TrainingMetrics {
        &self.metrics
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Mean loss over the most recent `window` training steps
    pub fn avg_loss(&self, window: usize) -> Option<f32> {
        recent_mean(&self.metrics.losses, window)
    }

    /// Mean reward over the most recent `window` episodes
    pub fn avg_episode_reward(&self, window: usize) -> Option<f32> {
        recent_mean(&self.metrics.episode_rewards, window)
    }

    /// Drop all history and counters
    pub fn clear(&mut self) {
        self.metrics = TrainingMetrics::new(self.history_size);
        self.current_episode_reward = 0.0;
        self.current_episode_length = 0;
        self.episode_count = 0;
        self.total_steps = 0;
    }

    /// Save metrics to a JSON file
    pub fn save(&self, path: &str) -> crate::error::Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from a JSON file
    pub fn load(&mut self, path: &str) -> crate::error::Result<()> {
        let data = std::fs::read_to_string(path)?;
        self.metrics = serde_json::from_str(&data)?;
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
