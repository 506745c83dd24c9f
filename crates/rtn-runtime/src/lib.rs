//! The incremental parsing engine driven by a precompiled grammar.
//!
//! A [`Grammar`] bundles three interlocking automata -- an [`IntFa`] per
//! terminal, a [`Gla`] per lookahead-driven [`Rtn`] state, and the `Rtn`s
//! themselves -- and is loaded once, shared read-only (`Arc<Grammar>`)
//! across however many concurrent parses need it. A [`ParseState`] is the
//! resumable state of one such parse: feed it bytes through [`parse`] and
//! it drives the grammar's start symbol to completion, firing registered
//! callbacks as rules complete and leaving a [`SlotRecord`] tree behind.
//!
//! Suspension is implicit: `parse` returns [`types::ParseStatus::Ok`]
//! whenever the buffer runs out before the parse is actually done, and
//! resumes exactly where it left off the next time it's called with more
//! bytes. This is what makes the engine usable against a streamed source
//! without ever buffering the whole input.
//!
//! This crate is the runtime only -- it has no opinion on how a `Grammar`
//! was produced. [`loader::load_grammar`] deserializes the binary grammar
//! format; building the grammar compiler that emits that format is out of
//! scope here.

pub mod debug;
pub mod engine;
pub mod loader;
pub mod types;

pub use engine::parse;
pub use loader::{free_grammar, load_grammar};
pub use types::{
  free_parse_state, Callback, CallbackSignal, CompletionView, Gla, GlaId, Grammar, IntFa, IntFaId,
  NonterminalRef, ParseOutcome, ParseState, ParseStatus, ParseValue, ParserConfig, Rtn, RtnId,
  RuntimeError, RuntimeResult, SlotRecord, StrId, TerminalRef,
};
