//! Debug-only tracing of stack pushes/pops and engine transitions.
//!
//! Mirrors this codebase's own convention (see `hctk`'s
//! `debug::debug_items`): plain functions called directly from the engine
//! at points of interest, gated behind the `auto_print_errors` feature
//! rather than a logging facade -- this is a tracing aid for developing
//! and debugging grammars and the engine itself, not an end-user facing
//! observability surface (the latter is process glue, out of scope per
//! spec §1).

use crate::types::{Frame, Grammar};

#[cfg(feature = "auto_print_errors")]
pub fn trace_push(grammar: &Grammar, frame: &Frame) {
  eprintln!("push: {}", describe(grammar, frame));
}

#[cfg(not(feature = "auto_print_errors"))]
#[inline(always)]
pub fn trace_push(_grammar: &Grammar, _frame: &Frame) {}

#[cfg(feature = "auto_print_errors")]
pub fn trace_pop(grammar: &Grammar, frame: &Frame) {
  eprintln!("pop:  {}", describe(grammar, frame));
}

#[cfg(not(feature = "auto_print_errors"))]
#[inline(always)]
pub fn trace_pop(_grammar: &Grammar, _frame: &Frame) {}

#[cfg(feature = "auto_print_errors")]
pub fn trace_error(err: &crate::RuntimeError) {
  eprintln!("parse error: {err}");
}

#[cfg(not(feature = "auto_print_errors"))]
#[inline(always)]
pub fn trace_error(_err: &crate::RuntimeError) {}

#[cfg(feature = "auto_print_errors")]
fn describe(grammar: &Grammar, frame: &Frame) -> String {
  match frame {
    Frame::Rtn(f) => format!("Rtn({}) state={} offset={}", grammar.str(grammar.rtn(f.rtn).name), f.state, f.start_offset),
    Frame::Gla(f) => format!("Gla(#{}) state={} offset={}", f.gla.index(), f.state, f.start_offset),
    Frame::IntFa(f) => format!("IntFa(#{}) state={} offset={}", f.intfa.index(), f.state, f.start_offset),
  }
}
