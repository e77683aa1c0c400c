/***
# Grid Navigation

* The agent learns to navigate from a starting position to a goal position in a 5x5 grid
* State: 25-dimensional one-hot encoded vector representing the agent's position
* Actions: 4 possible moves (up, down, left, right)
* Rewards: -1 for each step, +10 for reaching the goal, -5 for hitting walls
* Episode ends when the agent reaches the goal or after 50 steps
* Value estimation: a plain linear model over the one-hot state, trained
  against the trainer's n-step bootstrapped targets
***/

use mnemosyne::estimator::ValueEstimator;
use mnemosyne::replay_buffer::Transition;
use mnemosyne::trainer::NStepTrainer;
use ndarray::{Array2, ArrayView2};

const GRID_SIZE: usize = 5;
const STATE_SIZE: usize = GRID_SIZE * GRID_SIZE;
const ACTION_SIZE: usize = 4;
const LEARNING_RATE: f32 = 0.05;
const EPSILON_DECAY: f32 = 0.995;
const EPSILON_MIN: f32 = 0.01;
const GAMMA: f32 = 0.95;
const HORIZON: usize = 3;
const CAPACITY: usize = 10000;
const BATCH_SIZE: usize = 32;
const MIN_EXPERIENCE: usize = 200;
const TARGET_SYNC_PERIOD: usize = 100;
const EPISODES: usize = 500;
const MAX_STEPS: usize = 50;

/// Linear action-value model: one weight column per action over the one-hot
/// grid encoding. Trains on the batch of its latest predict call.
#[derive(Clone)]
struct LinearEstimator {
    weights: Array2<f32>,
    last_states: Option<Array2<f32>>,
}

impl LinearEstimator {
    fn new() -> Self {
        LinearEstimator {
            weights: Array2::zeros((STATE_SIZE, ACTION_SIZE)),
            last_states: None,
        }
    }
}

impl ValueEstimator for LinearEstimator {
    fn predict(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        self.last_states = Some(states.to_owned());
        states.dot(&self.weights)
    }

    fn update(&mut self, targets: ArrayView2<f32>) {
        let states = self
            .last_states
            .as_ref()
            .expect("update without a preceding predict");
        let predictions = states.dot(&self.weights);
        let gradient = states.t().dot(&(&predictions - &targets));
        self.weights = &self.weights - &(gradient * (LEARNING_RATE / states.nrows() as f32));
    }
}

#[derive(Clone)]
struct GridWorld {
    agent_pos: (usize, usize),
    goal_pos: (usize, usize),
    steps: usize,
}

impl GridWorld {
    fn new() -> Self {
        Self {
            agent_pos: (0, 0),  // Start at top-left
            goal_pos: (4, 4),   // Goal at bottom-right
            steps: 0,
        }
    }

    fn get_state(&self) -> ndarray::Array1<f32> {
        let mut state = ndarray::Array1::zeros(STATE_SIZE);
        let index = self.agent_pos.0 * GRID_SIZE + self.agent_pos.1;
        state[index] = 1.0;
        state
    }

    fn step(&mut self, action: usize) -> (f32, bool) {
        self.steps += 1;

        let new_pos = match action {
            0 => (self.agent_pos.0.saturating_sub(1), self.agent_pos.1), // Up
            1 => ((self.agent_pos.0 + 1).min(GRID_SIZE - 1), self.agent_pos.1), // Down
            2 => (self.agent_pos.0, self.agent_pos.1.saturating_sub(1)), // Left
            3 => (self.agent_pos.0, (self.agent_pos.1 + 1).min(GRID_SIZE - 1)), // Right
            _ => panic!("Invalid action"),
        };

        let reward = if new_pos == self.agent_pos {
            -5.0  // Hit a wall
        } else if new_pos == self.goal_pos {
            10.0  // Reached goal
        } else {
            -1.0  // Normal step
        };

        self.agent_pos = new_pos;
        let done = self.agent_pos == self.goal_pos || self.steps >= MAX_STEPS;

        (reward, done)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Training Grid Navigation Agent ({}-step returns)...", HORIZON);
    let start_time = std::time::Instant::now();

    let mut trainer = NStepTrainer::builder()
        .online(LinearEstimator::new())
        .horizon(HORIZON)
        .gamma(GAMMA)
        .capacity(CAPACITY)
        .batch_size(BATCH_SIZE)
        .min_experience(MIN_EXPERIENCE)
        .target_sync_period(TARGET_SYNC_PERIOD)
        .state_size(STATE_SIZE)
        .num_actions(ACTION_SIZE)
        .epsilon(1.0)
        .build()?;

    let mut epsilon = 1.0f32;

    for episode in 0..EPISODES {
        let mut env = GridWorld::new();
        let mut state = env.get_state();
        trainer.metrics_mut().start_episode();

        loop {
            let action = trainer.act(state.view());
            let (reward, done) = env.step(action);
            let next_state = env.get_state();

            trainer.metrics_mut().step(reward);
            trainer.record(Transition {
                state: state.clone(),
                action,
                reward,
                next_state: next_state.clone(),
                done,
            });
            trainer.train()?;

            state = next_state;
            if done {
                break;
            }
        }

        trainer.metrics_mut().end_episode();
        epsilon = (epsilon * EPSILON_DECAY).max(EPSILON_MIN);
        trainer.set_epsilon(epsilon);

        if (episode + 1) % 50 == 0 {
            let avg_reward = trainer.metrics().avg_episode_reward(50).unwrap_or(0.0);
            let avg_loss = trainer.metrics().avg_loss(100).unwrap_or(0.0);
            println!(
                "Episode {:4} | avg reward {:7.2} | avg loss {:8.4} | epsilon {:.3}",
                episode + 1,
                avg_reward,
                avg_loss,
                epsilon
            );
        }
    }

    println!(
        "Done: {} episodes, {} training steps in {:.1?}",
        trainer.metrics().episode_count(),
        trainer.train_steps(),
        start_time.elapsed()
    );

    Ok(())
}
