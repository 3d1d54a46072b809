//! Text -> command use-case.
//!
//! # Responsibility
//! - Run the intent and slot collaborators, decode spans and assemble.
//! - Offer the rule-only path that feeds the same assembler.
//!
//! # Invariants
//! - Contract violations from the slot model fail the call before assembly.
//! - No confidence threshold is applied; callers own acceptance policy.

use crate::config::InterpreterConfig;
use crate::inference::cache::ModelCache;
use crate::inference::model::{ModelError, ModelLoader};
use crate::model::command::{Action, Command};
use crate::service::assembler::CommandAssembler;
use crate::slots::decoder::{decode_spans, DecodeError};
use crate::slots::heuristic::HeuristicSlotTagger;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Interpretation failure. Ordinary parse misses are never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    Model(ModelError),
    Decode(DecodeError),
    UnknownAction(String),
}

impl Display for InterpretError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "slot model output rejected: {err}"),
            Self::UnknownAction(value) => write!(f, "classifier returned unknown action `{value}`"),
        }
    }
}

impl Error for InterpretError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Decode(err) => Some(err),
            Self::UnknownAction(_) => None,
        }
    }
}

impl From<ModelError> for InterpretError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<DecodeError> for InterpretError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

/// Model-backed command interpreter.
pub struct CommandInterpreter<L: ModelLoader> {
    config: InterpreterConfig,
    models: ModelCache<L>,
}

impl<L: ModelLoader> CommandInterpreter<L> {
    pub fn new(config: InterpreterConfig, loader: L) -> Self {
        Self {
            config,
            models: ModelCache::new(loader),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelCache<L> {
        &self.models
    }

    /// Interprets `text`, resolving relative dates against the local date.
    pub fn interpret(&self, text: &str) -> Result<Command, InterpretError> {
        self.interpret_with(text, &CommandAssembler::for_today())
    }

    /// Interprets `text` with a caller-provided assembler.
    pub fn interpret_with(
        &self,
        text: &str,
        assembler: &CommandAssembler,
    ) -> Result<Command, InterpretError> {
        let intent = self.models.intent(&self.config.intent_dir)?.classify(text)?;
        let action = Action::parse(&intent.action).ok_or_else(|| {
            warn!(
                "event=interpret module=service status=error reason=unknown_action text_len={}",
                text.chars().count()
            );
            InterpretError::UnknownAction(intent.action.clone())
        })?;

        let slot_model = self.models.slots(&self.config.slots_dir)?;
        let prediction = slot_model.predict(text)?;
        let spans = decode_spans(
            text,
            &prediction.offsets,
            &prediction.label_ids,
            slot_model.label_table(),
        )
        .inspect_err(|err| {
            warn!(
                "event=interpret module=service status=error reason=decode error={}",
                err
            )
        })?;

        debug!(
            "event=interpret module=service status=ok path=model action={} spans={} text_len={}",
            action,
            spans.len(),
            text.chars().count()
        );
        Ok(assembler.assemble(text, action, intent.confidence, &spans))
    }
}

/// Rule-only interpretation feeding heuristic spans to the assembler.
///
/// `action` and `confidence` still come from the caller's classifier.
pub fn interpret_heuristic(
    text: &str,
    action: Action,
    confidence: f64,
    assembler: &CommandAssembler,
) -> Command {
    let spans = HeuristicSlotTagger::new().tag(text);
    debug!(
        "event=interpret module=service status=ok path=heuristic action={} spans={} text_len={}",
        action,
        spans.len(),
        text.chars().count()
    );
    assembler.assemble(text, action, confidence, &spans)
}
