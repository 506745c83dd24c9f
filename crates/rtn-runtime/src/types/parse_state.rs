use std::{collections::VecDeque, sync::Arc};

use super::{
  callback::{Callback, CallbackRegistry},
  config::ParserConfig,
  frame::{Frame, RtnFrame},
  grammar::Grammar,
  input_buffer::InputBuffer,
  parse_value::SlotRecord,
  token::Token,
};

/// The terminal status a finished `parse` call reports. Parse failures and
/// resource-limit violations are *not* represented here -- they are fatal
/// and surface as `Err(RuntimeError)` instead (see [crate::RuntimeError]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
  /// Forward progress stalled on exhausted input; call `parse` again with
  /// more bytes (and/or `eof = true`) to resume.
  Ok,
  /// A callback requested cancellation.
  Cancelled,
  /// The start-symbol frame popped at EOF: the parse is complete.
  Eof,
}

/// The result of one `parse` call: a status plus how many bytes of the
/// buffer passed in were fully consumed and may be discarded by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOutcome {
  pub status:   ParseStatus,
  pub consumed: usize,
}

/// The full resumable state of an in-progress parse. Owned single-threaded
/// by its caller; not safe to share or mutate from multiple contexts (hence
/// no `Sync` impl is provided, deliberately).
pub struct ParseState {
  pub(crate) grammar: Arc<Grammar>,
  pub(crate) config:  ParserConfig,

  /// Ordered sequence of frames; the last element is the top of the stack.
  pub(crate) stack: Vec<Frame>,

  /// Terminals already lexed (by a GLA, or pushed back by a frame that
  /// found they belonged to its caller) but not yet consumed by an RTN
  /// transition commit. Peeked from the front at decision points; only
  /// dequeued when a transition actually commits to one.
  pub(crate) token_buffer: VecDeque<Token>,

  pub(crate) input: InputBuffer,

  pub(crate) callbacks: CallbackRegistry,

  /// The absolute input offset the parse has reached: the end of the last
  /// terminal actually lexed (as opposed to merely examined). Frames
  /// pushed from this point record it as their own `start_offset`.
  pub(crate) offset: usize,

  /// The start symbol's slot record, filled in once its frame pops at EOF.
  pub(crate) result: Option<SlotRecord>,
}

impl ParseState {
  /// Allocates a parse state for `grammar`, initialised and ready to
  /// receive input for the grammar's start symbol (RTN index 0).
  pub fn new(grammar: &Arc<Grammar>) -> Self {
    let mut state = Self {
      grammar: grammar.clone(),
      config: ParserConfig::default(),
      stack: Vec::new(),
      token_buffer: VecDeque::new(),
      input: InputBuffer::new(ParserConfig::default().initial_buffer_capacity),
      callbacks: CallbackRegistry::new(),
      offset: 0,
      result: None,
    };
    state.reinit();
    state
  }

  pub fn with_config(grammar: &Arc<Grammar>, config: ParserConfig) -> Self {
    let mut state = Self {
      grammar: grammar.clone(),
      config,
      stack: Vec::new(),
      token_buffer: VecDeque::new(),
      input: InputBuffer::new(config.initial_buffer_capacity),
      callbacks: CallbackRegistry::new(),
      offset: 0,
      result: None,
    };
    state.reinit();
    state
  }

  /// Rebinds this state to `grammar` and resets it for a fresh parse,
  /// discarding any callbacks registered against the previous grammar.
  /// Provided for API parity with the original `alloc_parse_state` +
  /// `init_parse_state` split (§6): where `new` allocates and initialises in
  /// one step, `init` lets a state allocated once be bound to a grammar (or
  /// rebound to a different one) without reallocating its `ParseState` shell.
  pub fn init(&mut self, grammar: &Arc<Grammar>) {
    self.grammar = grammar.clone();
    self.callbacks = CallbackRegistry::new();
    self.reinit();
  }

  /// Re-initialises this state for a fresh parse against the same grammar,
  /// without reallocating the callback registry. Equivalent to a freshly
  /// constructed state fed the same input from scratch.
  pub fn reinit(&mut self) {
    self.stack.clear();
    self.token_buffer.clear();
    self.input = InputBuffer::new(self.config.initial_buffer_capacity);
    self.offset = 0;
    self.result = None;

    let start_rtn = super::grammar::RtnId::from(0u32);
    let rtn = self.grammar.rtn(start_rtn);
    self.stack.push(Frame::Rtn(RtnFrame {
      rtn: start_rtn,
      state: super::grammar::Rtn::START,
      pending: None,
      slots: SlotRecord::new(start_rtn, rtn.num_slots),
      start_offset: 0,
    }));
  }

  /// Registers a completion callback for the RTN named `rtn_name`. Fires,
  /// in registration order among callbacks for that name, every time that
  /// RTN's frame pops.
  pub fn register_callback(
    &mut self,
    rtn_name: impl Into<String>,
    callback: Callback,
    user_data: Box<dyn std::any::Any>,
  ) {
    self.callbacks.register(rtn_name, callback, user_data);
  }

  pub fn grammar(&self) -> &Arc<Grammar> {
    &self.grammar
  }

  pub fn config(&self) -> &ParserConfig {
    &self.config
  }

  /// The absolute offset of the parse cursor: the end of the last terminal
  /// actually lexed.
  pub fn offset(&self) -> usize {
    self.offset
  }

  /// Whether the parse stack is currently empty (only true after the parse
  /// has fully completed and the start frame has popped).
  pub fn is_done(&self) -> bool {
    self.stack.is_empty()
  }

  /// Takes the start symbol's completed slot record, if the parse has
  /// reached EOF. `None` before completion, or if already taken.
  pub fn take_result(&mut self) -> Option<SlotRecord> {
    self.result.take()
  }

  /// The slot record of the start symbol's frame, while the parse is still
  /// in progress.
  pub(crate) fn start_frame(&self) -> Option<&RtnFrame> {
    self.stack.first().and_then(Frame::as_rtn)
  }
}

/// Teardown helper provided for API parity with the C interface's
/// `free_parse_state`. `ParseState`'s fields are all ordinary owned
/// collections, so this is equivalent to (and implemented as) `drop`.
pub fn free_parse_state(state: ParseState) {
  drop(state)
}
