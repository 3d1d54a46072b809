//! BIO token predictions -> character spans.
//!
//! # Responsibility
//! - Validate the sequence-labeling collaborator's output contract.
//! - Merge per-token tags into labeled character spans.
//!
//! # Invariants
//! - Contract violations are rejected before any span is produced.
//! - Zero-width tokens (special/padding) never open, close or extend a span.
//! - Any tag sequence decodes without panicking; all-`O` yields no spans.

use crate::model::label::{BioTag, EntityKind, LabelTable};
use crate::model::span::{char_len, Span};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural violation of the model-output contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    LengthMismatch {
        offsets: usize,
        predictions: usize,
    },
    UnknownLabelId {
        position: usize,
        id: u32,
    },
    InvalidOffset {
        position: usize,
        start: usize,
        end: usize,
        text_len: usize,
    },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch {
                offsets,
                predictions,
            } => write!(
                f,
                "offsets ({offsets}) and predictions ({predictions}) must have the same length"
            ),
            Self::UnknownLabelId { position, id } => {
                write!(f, "label id {id} at token {position} is not in the label table")
            }
            Self::InvalidOffset {
                position,
                start,
                end,
                text_len,
            } => write!(
                f,
                "token {position} offset ({start}, {end}) is invalid for text of {text_len} chars"
            ),
        }
    }
}

impl Error for DecodeError {}

#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    kind: EntityKind,
    start: usize,
    end: usize,
}

/// Decodes per-token label ids into spans over `text`.
///
/// `offsets[i]` is the character range of token `i` and `predictions[i]` its
/// label id. An `I-` tag that does not continue the open span's entity starts
/// a new span; an `I-` tag with no open span is ignored.
///
/// # Errors
/// Rejects the whole prediction before decoding when:
/// - `offsets` and `predictions` differ in length ([`DecodeError::LengthMismatch`]),
/// - a label id is missing from `labels` ([`DecodeError::UnknownLabelId`]),
/// - an offset is reversed or ends past the text ([`DecodeError::InvalidOffset`]).
pub fn decode_spans(
    text: &str,
    offsets: &[(usize, usize)],
    predictions: &[u32],
    labels: &LabelTable,
) -> Result<Vec<Span>, DecodeError> {
    let tags = validate_tokens(text, offsets, predictions, labels)?;

    let mut spans = Vec::new();
    let mut current: Option<OpenSpan> = None;

    for (&(start, end), tag) in offsets.iter().zip(tags) {
        if start == end {
            continue;
        }
        current = match (tag, current) {
            (BioTag::Outside, open) => {
                close(text, open, &mut spans);
                None
            }
            (BioTag::Begin(kind), open) => {
                close(text, open, &mut spans);
                Some(OpenSpan { kind, start, end })
            }
            (BioTag::Inside(kind), Some(open)) if open.kind != kind => {
                close(text, Some(open), &mut spans);
                Some(OpenSpan { kind, start, end })
            }
            (BioTag::Inside(_), Some(open)) => Some(OpenSpan { end, ..open }),
            (BioTag::Inside(_), None) => None,
        };
    }
    close(text, current, &mut spans);

    Ok(spans)
}

fn validate_tokens(
    text: &str,
    offsets: &[(usize, usize)],
    predictions: &[u32],
    labels: &LabelTable,
) -> Result<Vec<BioTag>, DecodeError> {
    if offsets.len() != predictions.len() {
        return Err(DecodeError::LengthMismatch {
            offsets: offsets.len(),
            predictions: predictions.len(),
        });
    }

    let text_len = char_len(text);
    offsets
        .iter()
        .zip(predictions)
        .enumerate()
        .map(|(position, (&(start, end), &id))| {
            if start > end || end > text_len {
                return Err(DecodeError::InvalidOffset {
                    position,
                    start,
                    end,
                    text_len,
                });
            }
            labels
                .get(id)
                .ok_or(DecodeError::UnknownLabelId { position, id })
        })
        .collect()
}

fn close(text: &str, open: Option<OpenSpan>, spans: &mut Vec<Span>) {
    if let Some(open) = open {
        if let Some(span) = Span::from_source(text, open.start, open.end, open.kind) {
            spans.push(span);
        }
    }
}
