//! # Mnemosyne - N-Step Experience Replay Training Core
//!
//! Mnemosyne is the value-learning core of a reinforcement-learning system:
//! a fixed-capacity circular experience buffer that lazily folds raw
//! one-step transitions into discounted n-step returns, and the training
//! protocol that turns sampled batches into bootstrapped targets for an
//! opaque value estimator.
//!
//! ## Key Features
//!
//! - **N-step returns**: each stored transition is rewritten in place with
//!   the discounted sum of the `n` rewards that followed it, truncated at
//!   episode boundaries
//! - **Pending-slot tracking**: the `n - 1` most recent slots still hold raw
//!   data and are never sampled
//! - **Rejection-sampling batches**: unique, uniformly drawn indices with
//!   starvation detected up front instead of an unbounded retry loop
//! - **Opaque estimators**: any backend that can score a state batch and
//!   train against a target matrix plugs in through a two-method trait
//! - **Fail-fast configuration**: builders validate every parameter at
//!   construction time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mnemosyne::replay_buffer::Transition;
//! use mnemosyne::trainer::NStepTrainer;
//!
//! let mut trainer = NStepTrainer::builder()
//!     .online(estimator)
//!     .horizon(3)
//!     .state_size(4)
//!     .num_actions(2)
//!     .build()?;
//!
//! // Driving loop: record every step, train on your own cadence.
//! let action = trainer.act(state.view());
//! trainer.record(Transition { state, action, reward, next_state, done });
//! trainer.train()?;
//! ```
//!
//! ## Module Organization
//!
//! - [`builders`] - Builder patterns with construction-time validation
//! - [`error`] - Error types and result handling
//! - [`estimator`] - The value-estimator interface the trainer drives
//! - [`metrics`] - Training metrics and tracking
//! - [`replay_buffer`] - The n-step aggregating circular buffer
//! - [`returns`] - Discount tables and the n-step return fold
//! - [`sampler`] - Batch index selection
//! - [`trainer`] - The training-step state machine

pub mod builders;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod replay_buffer;
pub mod returns;
pub mod sampler;
pub mod trainer;

#[cfg(test)]
mod tests;
