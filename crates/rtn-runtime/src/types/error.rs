use std::fmt::{self, Display};

/// Every error this crate can report, from grammar loading through to a
/// failed or resource-exhausted parse.
///
/// Mirrors the single-enum-per-crate convention used elsewhere in this
/// codebase (`RadlrError`/`SherpaError`): one flat sum type rather than a
/// tree of `thiserror` wrapper types per module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
  /// The grammar file could not be parsed into a [`crate::types::Grammar`].
  GrammarLoad { reason: String },

  /// No RTN transition, GLA transition, or IntFA transition applied at
  /// `offset`, and no final state could absorb the input either.
  ParseFailed { offset: usize, reason: String },

  /// A configured bound (`max_stack_depth` or `max_token_buffer_len`) was
  /// exceeded while driving the parse.
  ResourceLimitExceeded { limit: &'static str, value: usize, max: usize },

  /// An internal invariant the grammar compiler is expected to guarantee
  /// did not hold (e.g. a final GLA state with more than one selector).
  /// Indicates a bug in the grammar compiler or in this engine, not a
  /// malformed input.
  Internal(String),
}

impl Display for RuntimeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::GrammarLoad { reason } => write!(f, "grammar load error: {reason}"),
      Self::ParseFailed { offset, reason } => write!(f, "parse failed at offset {offset}: {reason}"),
      Self::ResourceLimitExceeded { limit, value, max } => {
        write!(f, "resource limit `{limit}` exceeded: {value} > {max}")
      }
      Self::Internal(msg) => write!(f, "internal invariant violation: {msg}"),
    }
  }
}

impl std::error::Error for RuntimeError {}

impl RuntimeError {
  /// Construct an [`RuntimeError::Internal`], additionally panicking in
  /// debug builds so invariant violations surface immediately during
  /// development instead of propagating as an ordinary error.
  #[track_caller]
  pub(crate) fn internal(msg: impl Into<String>) -> Self {
    let msg = msg.into();
    #[cfg(debug_assertions)]
    {
      debug_assert!(false, "internal invariant violation: {msg}");
    }
    Self::Internal(msg)
  }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
