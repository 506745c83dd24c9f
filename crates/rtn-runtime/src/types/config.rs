/// Resource bounds and tunables for a [crate::ParseState], modeled on this
/// codebase's `ParserConfig`. Copied into the [crate::ParseState] at
/// `init`/`reinit` time, so changing a shared `ParserConfig` after a state
/// has been initialised has no effect on that state.
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
  /// Upper bound on the number of frames (RTN + GLA + IntFA combined) the
  /// parse stack may hold at once. Exceeding this is reported as
  /// [crate::RuntimeError::ResourceLimitExceeded] rather than allowed to
  /// grow the stack without bound.
  pub max_stack_depth: usize,

  /// Upper bound on the number of terminals the token buffer may hold
  /// while a GLA is lexing ahead. LL(k) grammars never approach this;
  /// LL(*) grammars with pathological lookahead can, and are expected to
  /// fail fast rather than consume unbounded memory.
  pub max_token_buffer_len: usize,

  /// Initial capacity reserved for the sliding input buffer, in bytes.
  /// Purely a performance tunable -- the buffer grows geometrically past
  /// this as needed.
  pub initial_buffer_capacity: usize,
}

impl Default for ParserConfig {
  fn default() -> Self {
    Self { max_stack_depth: 4096, max_token_buffer_len: 1024, initial_buffer_capacity: 4096 }
  }
}

impl ParserConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
    self.max_stack_depth = depth;
    self
  }

  pub fn with_max_token_buffer_len(mut self, len: usize) -> Self {
    self.max_token_buffer_len = len;
    self
  }

  pub fn with_initial_buffer_capacity(mut self, cap: usize) -> Self {
    self.initial_buffer_capacity = cap;
    self
  }
}
