use mnemosyne::estimator::ValueEstimator;
use mnemosyne::replay_buffer::{NStepReplayBuffer, Transition};
use mnemosyne::trainer::NStepTrainer;
use ndarray::{Array1, Array2, ArrayView2};

/// Least-squares linear value estimator over raw state features.
///
/// Keeps the batch from its latest predict call and trains against it on
/// update, which is exactly the contract the trainer assumes.
#[derive(Clone)]
struct LinearEstimator {
    weights: Array2<f32>,
    learning_rate: f32,
    last_states: Option<Array2<f32>>,
}

impl LinearEstimator {
    fn new(state_size: usize, num_actions: usize, learning_rate: f32) -> Self {
        LinearEstimator {
            weights: Array2::zeros((state_size, num_actions)),
            learning_rate,
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
        self.weights = &self.weights - &(gradient * (self.learning_rate / states.nrows() as f32));
    }
}

/// A one-dimensional corridor: start in the middle, +1 for reaching the
/// right end (terminal), a small penalty per step, left end is terminal
/// with no reward.
struct Corridor {
    position: usize,
    cells: usize,
}

impl Corridor {
    fn new(cells: usize) -> Self {
        Corridor {
            position: cells / 2,
            cells,
        }
    }

    fn reset(&mut self) -> Array1<f32> {
        self.position = self.cells / 2;
        self.observe()
    }

    fn observe(&self) -> Array1<f32> {
        let mut state = Array1::zeros(self.cells);
        state[self.position] = 1.0;
        state
    }

    fn step(&mut self, action: usize) -> (f32, bool, Array1<f32>) {
        if action == 1 {
            self.position += 1;
        } else {
            self.position = self.position.saturating_sub(1);
        }

        let done = self.position == 0 || self.position == self.cells - 1;
        let reward = if self.position == self.cells - 1 {
            1.0
        } else {
            -0.01
        };
        (reward, done, self.observe())
    }
}

#[test]
fn test_end_to_end_training_loop() {
    let cells = 7;
    let mut env = Corridor::new(cells);
    let mut trainer = NStepTrainer::builder()
        .online(LinearEstimator::new(cells, 2, 0.05))
        .horizon(3)
        .gamma(0.9)
        .capacity(500)
        .batch_size(16)
        .min_experience(64)
        .target_sync_period(25)
        .state_size(cells)
        .num_actions(2)
        .epsilon(1.0)
        .build()
        .unwrap();

    let episodes = 60;
    for episode in 0..episodes {
        let mut state = env.reset();
        trainer.metrics_mut().start_episode();

        for _ in 0..50 {
            let action = trainer.act(state.view());
            let (reward, done, next_state) = env.step(action);

            trainer.metrics_mut().step(reward);
            trainer.record(Transition {
                state: state.clone(),
                action,
                reward,
                next_state: next_state.clone(),
                done,
            });
            trainer.train().unwrap();

            state = next_state;
            if done {
                break;
            }
        }

        trainer.metrics_mut().end_episode();
        trainer.set_epsilon(1.0 - episode as f32 / episodes as f32);
    }

    assert!(trainer.is_ready());
    assert!(trainer.train_steps() > 0);
    assert_eq!(trainer.metrics().episode_count(), episodes);

    let avg_loss = trainer.metrics().avg_loss(50).unwrap();
    assert!(avg_loss.is_finite());
}

#[test]
fn test_ready_transition_happens_exactly_at_threshold() {
    let mut trainer = NStepTrainer::builder()
        .online(LinearEstimator::new(2, 2, 0.1))
        .horizon(2)
        .capacity(100)
        .batch_size(4)
        .min_experience(10)
        .state_size(2)
        .num_actions(2)
        .build()
        .unwrap();

    for i in 0..10 {
        assert!(!trainer.is_ready());
        assert!(trainer.train().unwrap().is_none());
        trainer.record(Transition {
            state: ndarray::array![i as f32, 0.0],
            action: 0,
            reward: 0.0,
            next_state: ndarray::array![i as f32 + 1.0, 0.0],
            done: false,
        });
    }

    // Once Ready, the trainer never drops back to Idle.
    assert!(trainer.is_ready());
    assert!(trainer.train().unwrap().is_some());
    assert!(trainer.is_ready());
}

#[test]
fn test_buffer_snapshot_survives_a_session_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("replay.bin");
    let path = path.to_str().unwrap();

    let mut buffer = NStepReplayBuffer::new(50, 3, 0.9).unwrap();
    for i in 0..20 {
        buffer.record(Transition {
            state: ndarray::array![i as f32],
            action: i % 2,
            reward: 1.0,
            next_state: ndarray::array![i as f32 + 1.0],
            done: i % 7 == 6,
        });
    }
    buffer.save(path).unwrap();

    let mut restored = NStepReplayBuffer::load(path).unwrap();
    assert_eq!(restored.len(), 20);
    assert_eq!(restored.pending(), buffer.pending());

    // Sampling and recording pick up where the previous session stopped.
    let batch = restored.sample(8).unwrap();
    assert_eq!(batch.len(), 8);
    restored.record(Transition {
        state: ndarray::array![20.0],
        action: 0,
        reward: 1.0,
        next_state: ndarray::array![21.0],
        done: false,
    });
    assert_eq!(restored.len(), 21);
}
