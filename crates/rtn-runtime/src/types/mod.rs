//! The data model: the immutable [Grammar] an engine runs against, and the
//! resumable [ParseState] an engine drives forward.

mod callback;
mod config;
mod error;
mod frame;
mod grammar;
mod input_buffer;
mod parse_state;
mod parse_value;
mod token;

pub use callback::{Callback, CallbackSignal, CompletionView};
pub use config::ParserConfig;
pub use error::{RuntimeError, RuntimeResult};
pub use frame::{Frame, GlaFrame, IntFaFrame, PendingTransition, RtnFrame};
pub use grammar::{
  Gla, GlaId, GlaState, GlaTransition, Grammar, IntFa, IntFaId, IntFaState, IntFaTransition,
  Lookahead, Rtn, RtnId, RtnTransition, RtnTransitionLabel, SlotAssignment, StateId, StrId,
  StringPool,
};
pub use input_buffer::InputBuffer;
pub use parse_state::{free_parse_state, ParseOutcome, ParseState, ParseStatus};
pub use parse_value::{NonterminalRef, ParseValue, SlotRecord, TerminalRef, USERDATA_WIDTH};
pub use token::Token;
