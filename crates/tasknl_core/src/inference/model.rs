//! Contracts for the external intent/slot model collaborators.

use crate::model::label::LabelTable;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;

/// Collaborator failure while loading a model or running inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    Load { dir: String, message: String },
    Inference(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load { dir, message } => write!(f, "failed to load model from `{dir}`: {message}"),
            Self::Inference(message) => write!(f, "model inference failed: {message}"),
        }
    }
}

impl Error for ModelError {}

/// Top-1 intent classification.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentPrediction {
    /// Raw action label as emitted by the classifier.
    pub action: String,
    /// Top-1 probability in `[0, 1]`.
    pub confidence: f64,
}

/// Per-token slot predictions aligned 1:1 with character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotPrediction {
    pub offsets: Vec<(usize, usize)>,
    pub label_ids: Vec<u32>,
}

/// Sequence classifier producing the command action.
pub trait IntentModel: Send + Sync {
    fn classify(&self, text: &str) -> Result<IntentPrediction, ModelError>;
}

/// Token classifier producing BIO label ids.
pub trait SlotModel: Send + Sync {
    fn predict(&self, text: &str) -> Result<SlotPrediction, ModelError>;

    /// Id -> tag table matching this model's output layer.
    fn label_table(&self) -> &LabelTable;
}

/// Loads model handles from a model directory.
///
/// Injected into [`crate::inference::cache::ModelCache`] so tests can supply
/// fake models without process-wide state.
pub trait ModelLoader: Send + Sync {
    fn load_intent(&self, dir: &Path) -> Result<Arc<dyn IntentModel>, ModelError>;
    fn load_slots(&self, dir: &Path) -> Result<Arc<dyn SlotModel>, ModelError>;
}
