use super::{
  grammar::{GlaId, IntFaId, RtnId, StateId},
  parse_value::SlotRecord,
};

/// An RTN frame mid-transition: which outgoing transition of the frame's
/// current state the frame committed to, recorded so that when the pushed
/// child frame returns, this frame knows where to advance and which slot (if
/// any) to store the child's result in.
#[derive(Debug, Clone, Copy)]
pub struct PendingTransition {
  pub transition_index: u32,
}

/// A frame for one in-progress RTN call.
#[derive(Debug, Clone)]
pub struct RtnFrame {
  pub rtn:     RtnId,
  pub state:   StateId,
  pub pending: Option<PendingTransition>,
  pub slots:   SlotRecord,
  /// Absolute input offset at which this frame was pushed.
  pub start_offset: usize,
}

/// A frame for one in-progress GLA lookahead run.
#[derive(Debug, Clone)]
pub struct GlaFrame {
  pub gla:   GlaId,
  pub state: StateId,
  /// Absolute input offset at which this lookahead run began.
  pub start_offset: usize,
  /// How many terminals from the front of the token buffer this run has
  /// already folded into a transition. Not part of the reference data
  /// model either, for the same reason `IntFaFrame::cursor` isn't: the GLA
  /// needs to know how far into the (monotonically growing) buffered
  /// lookahead it has read, distinct from how much of it the RTN has
  /// consumed.
  pub examined: usize,
}

/// A frame for one in-progress IntFA lex attempt.
#[derive(Debug, Clone)]
pub struct IntFaFrame {
  pub intfa: IntFaId,
  pub state: StateId,
  /// Absolute input offset at which this lex attempt began.
  pub start_offset: usize,
  /// The read head: how far this attempt has advanced past `start_offset`.
  /// Not listed as separate state in the reference data model (which folds
  /// it into "the current state"), but needed here since a DFA state alone
  /// doesn't carry its input position.
  pub cursor: usize,
  /// The `(offset, state)` of the most recent final state entered, used to
  /// reconstruct the longest match once no further transition applies.
  pub last_match: Option<(usize, StateId)>,
}

impl IntFaFrame {
  pub fn new(intfa: IntFaId, start_offset: usize) -> Self {
    Self { intfa, state: super::grammar::IntFa::START, start_offset, cursor: start_offset, last_match: None }
  }
}

/// One element of the parse stack: a three-variant tagged union, exactly as
/// wide as its largest member. Dispatch is a dense `match` on the variant --
/// frames are never boxed as trait objects.
#[derive(Debug, Clone)]
pub enum Frame {
  Rtn(RtnFrame),
  Gla(GlaFrame),
  IntFa(IntFaFrame),
}

impl Frame {
  pub fn as_rtn(&self) -> Option<&RtnFrame> {
    match self {
      Self::Rtn(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_rtn_mut(&mut self) -> Option<&mut RtnFrame> {
    match self {
      Self::Rtn(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_gla(&self) -> Option<&GlaFrame> {
    match self {
      Self::Gla(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_gla_mut(&mut self) -> Option<&mut GlaFrame> {
    match self {
      Self::Gla(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_intfa(&self) -> Option<&IntFaFrame> {
    match self {
      Self::IntFa(f) => Some(f),
      _ => None,
    }
  }

  pub fn as_intfa_mut(&mut self) -> Option<&mut IntFaFrame> {
    match self {
      Self::IntFa(f) => Some(f),
      _ => None,
    }
  }
}
