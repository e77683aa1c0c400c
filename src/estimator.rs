//! Interface to the value estimators the trainer drives.

use ndarray::{Array2, ArrayView2};

/// A batched action-value estimator.
///
/// The trainer treats the online and target estimators as opaque: any numeric
/// backend works as long as it can score a batch of states and train against
/// a target matrix. Rows are batch entries, columns are actions.
///
/// `update` trains against the activations of this estimator's most recent
/// `predict` call, so the trainer always issues `predict` on the batch it is
/// about to correct immediately before `update`.
pub trait ValueEstimator {
    /// Predicted Q-values for a batch of states, one row per state and one
    /// column per action.
    fn predict(&mut self, states: ArrayView2<f32>) -> Array2<f32>;

    /// Train towards a target matrix shaped like the previous `predict`
    /// output.
    fn update(&mut self, targets: ArrayView2<f32>);
}
