//! The GLA engine (spec §4.2): terminal-level lookahead used to choose
//! between an `RtnState`'s outgoing transitions, or to accept it as final.

use crate::types::{Frame, Grammar, GlaState, ParseState};
use crate::{debug, RuntimeError, RuntimeResult};

use super::rtn::{commit_rtn_transition, perform_rtn_pop};
use super::StepResult;

/// Dispatches on the state of the `Gla` frame currently on top of the
/// stack. A `NonFinal` state either follows a transition keyed by a
/// terminal it has already examined, or lexes one more; a `Final` state
/// resolves its selector and pops itself, handing control back to the
/// now-exposed `Rtn` frame beneath it.
pub(super) fn handle_gla_top(grammar: &Grammar, state: &mut ParseState) -> RuntimeResult<StepResult> {
  let frame = state.stack.last().and_then(Frame::as_gla).ok_or_else(|| {
    RuntimeError::internal("handle_gla_top called with a non-Gla frame on top")
  })?;
  let gla = grammar.gla(frame.gla);
  let gstate = gla.state(frame.state);

  match gstate {
    GlaState::NonFinal { intfa, transitions } => {
      if state.token_buffer.len() > frame.examined {
        let tok = state.token_buffer[frame.examined];
        let dest = transitions.iter().find(|t| t.terminal == tok.name).map(|t| t.dest);
        let Some(dest) = dest else {
          return Err(RuntimeError::ParseFailed {
            offset: tok.offset,
            reason: "no GLA transition for the lexed terminal".to_string(),
          });
        };
        let frame = state.stack.last_mut().and_then(Frame::as_gla_mut).unwrap();
        frame.examined += 1;
        frame.state = dest;
        Ok(StepResult::Continue)
      } else {
        let intfa = *intfa;
        let start = state.offset;
        let frame = Frame::IntFa(crate::types::IntFaFrame::new(intfa, start));
        debug::trace_push(grammar, &frame);
        state.stack.push(frame);
        Ok(StepResult::Continue)
      }
    }

    GlaState::Final { selectors } => {
      if selectors.len() != 1 {
        return Err(RuntimeError::internal("final GLA state with selector count != 1"));
      }
      let selector = selectors[0];
      if let Some(top) = state.stack.last() {
        debug::trace_pop(grammar, top);
      }
      state.stack.pop();
      if selector == 0 {
        perform_rtn_pop(grammar, state)
      } else {
        commit_rtn_transition(grammar, state, (selector - 1) as usize)
      }
    }
  }
}
