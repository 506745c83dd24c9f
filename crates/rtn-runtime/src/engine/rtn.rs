//! The RTN interpreter (spec §4.3): dispatch on the current state's
//! lookahead kind, commit transitions, and pop completed frames back into
//! their caller.

use crate::types::{
  Frame, Grammar, ParseState, ParseValue, RtnTransitionLabel, SlotRecord, Token,
};
use crate::{debug, RuntimeError, RuntimeResult};

use super::StepResult;

/// Dispatches on the state of the `Rtn` frame currently on top of the
/// stack. Called only when that frame has no pending transition -- i.e. it
/// is genuinely deciding what to do next, not waiting on a child.
pub(super) fn handle_rtn_top(grammar: &Grammar, state: &mut ParseState) -> RuntimeResult<StepResult> {
  let frame = state.stack.last().and_then(Frame::as_rtn).ok_or_else(|| {
    RuntimeError::internal("handle_rtn_top called with a non-Rtn frame on top")
  })?;
  let rtn = grammar.rtn(frame.rtn);
  let rstate = rtn.state(frame.state);

  match rstate.lookahead {
    crate::types::Lookahead::Neither => {
      if !rstate.is_final {
        return Err(RuntimeError::internal("non-final RTN state with no outgoing transitions"));
      }
      // A `Neither` state never lexes anything, so nothing naturally stops
      // the start frame from popping the instant it's reached. Gate the
      // start-frame pop on EOF exactly as the `IntFa` branch above does --
      // otherwise trailing input past a structurally-final start state would
      // be silently dropped instead of reported.
      if state.stack.len() == 1 {
        if state.input.has_byte_at(state.offset) {
          return Err(RuntimeError::ParseFailed {
            offset: state.offset,
            reason: "unexpected trailing input".to_string(),
          });
        }
        if !state.input.is_eof() {
          return Ok(StepResult::NeedMoreInput);
        }
      }
      perform_rtn_pop(grammar, state)
    }

    crate::types::Lookahead::Gla(gla_id) => {
      let frame = Frame::Gla(crate::types::GlaFrame {
        gla: gla_id,
        state: crate::types::Gla::START,
        start_offset: state.offset,
        examined: 0,
      });
      debug::trace_push(grammar, &frame);
      state.stack.push(frame);
      Ok(StepResult::Continue)
    }

    crate::types::Lookahead::IntFa(intfa_id) => {
      if let Some(tok) = state.token_buffer.front().copied() {
        process_rtn_terminal(grammar, state, tok)
      } else if state.stack.len() == 1
        && rstate.is_final
        && state.input.is_eof()
        && !state.input.has_byte_at(state.offset)
      {
        perform_rtn_pop(grammar, state)
      } else {
        let frame = Frame::IntFa(crate::types::IntFaFrame::new(intfa_id, state.offset));
        debug::trace_push(grammar, &frame);
        state.stack.push(frame);
        Ok(StepResult::Continue)
      }
    }
  }
}

/// Handles a terminal that's either freshly lexed for this frame or sitting
/// at the front of the token buffer (because a GLA lexed it, or because a
/// child frame peeked it and found it belonged to us instead).
pub(super) fn process_rtn_terminal(
  grammar: &Grammar,
  state: &mut ParseState,
  tok: Token,
) -> RuntimeResult<StepResult> {
  let frame = state.stack.last().and_then(Frame::as_rtn).ok_or_else(|| {
    RuntimeError::internal("process_rtn_terminal called with a non-Rtn frame on top")
  })?;
  let rtn = grammar.rtn(frame.rtn);
  let rstate = rtn.state(frame.state);

  let found = rstate.transitions.iter().position(|t| {
    matches!(t.label, RtnTransitionLabel::Terminal(name) if name == tok.name)
  });

  if let Some(idx) = found {
    return commit_rtn_transition(grammar, state, idx);
  }

  if !rstate.is_final {
    return Err(RuntimeError::ParseFailed {
      offset: tok.offset,
      reason: "no transition matches the lexed terminal".to_string(),
    });
  }

  if state.stack.len() > 1 {
    let parent_idx = state.stack.len() - 2;
    let parent = state.stack[parent_idx].as_rtn().ok_or_else(|| {
      RuntimeError::internal("parent of an Rtn frame was not itself an Rtn frame")
    })?;
    // The parent is mid-transition on the call that produced us; what it
    // expects next is governed by the state that call *lands on*, not the
    // state it was dispatched from.
    let pending = parent.pending.ok_or_else(|| {
      RuntimeError::internal("parent of an Rtn frame was not mid-transition")
    })?;
    let prtn = grammar.rtn(parent.rtn);
    let parent_transition = *prtn
      .state(parent.state)
      .transitions
      .get(pending.transition_index as usize)
      .ok_or_else(|| RuntimeError::internal("pending transition index out of range"))?;
    let dest_state = prtn.state(parent_transition.dest);
    let accepted = dest_state.transitions.iter().any(|t| {
      matches!(t.label, RtnTransitionLabel::Terminal(name) if name == tok.name)
    });
    if accepted {
      // Leave `tok` in the buffer un-dequeued; the parent consumes it once
      // this frame pops.
      perform_rtn_pop(grammar, state)
    } else {
      Err(RuntimeError::ParseFailed {
        offset: tok.offset,
        reason: "unexpected token: not accepted by this rule or its caller".to_string(),
      })
    }
  } else {
    // Start symbol, no caller to hand the token to: there is real input
    // left over after what should have been a complete parse.
    Err(RuntimeError::ParseFailed { offset: tok.offset, reason: "unexpected trailing input".to_string() })
  }
}

/// Commits to outgoing transition `idx` of the current top `Rtn` frame's
/// state. A terminal transition dequeues its terminal from the buffer and
/// advances in place; a nonterminal transition pushes a child frame and
/// leaves this frame `pending` until that child pops.
pub(super) fn commit_rtn_transition(
  grammar: &Grammar,
  state: &mut ParseState,
  idx: usize,
) -> RuntimeResult<StepResult> {
  let (rtn_id, cur_state) = {
    let frame = state.stack.last().and_then(Frame::as_rtn).ok_or_else(|| {
      RuntimeError::internal("commit_rtn_transition called with a non-Rtn frame on top")
    })?;
    (frame.rtn, frame.state)
  };
  let rtn = grammar.rtn(rtn_id);
  let transition = *rtn
    .state(cur_state)
    .transitions
    .get(idx)
    .ok_or_else(|| RuntimeError::internal("transition index out of range"))?;

  match transition.label {
    RtnTransitionLabel::Terminal(_name) => {
      let tok = state
        .token_buffer
        .pop_front()
        .ok_or_else(|| RuntimeError::internal("expected a buffered terminal to commit"))?;
      state.offset = state.offset.max(tok.end());
      let frame = state.stack.last_mut().and_then(Frame::as_rtn_mut).unwrap();
      frame.state = transition.dest;
      if let Some(slot) = transition.slot {
        frame.slots.set(slot.slot_num, ParseValue::Terminal(crate::types::TerminalRef {
          offset: tok.offset,
          len: tok.len,
        }));
      }
      Ok(StepResult::Continue)
    }

    RtnTransitionLabel::Nonterminal(target_rtn) => {
      {
        let frame = state.stack.last_mut().and_then(Frame::as_rtn_mut).unwrap();
        frame.pending = Some(crate::types::PendingTransition { transition_index: idx as u32 });
      }
      let target = grammar.rtn(target_rtn);
      let frame = Frame::Rtn(crate::types::RtnFrame {
        rtn: target_rtn,
        state: crate::types::Rtn::START,
        pending: None,
        slots: SlotRecord::new(target_rtn, target.num_slots),
        start_offset: state.offset,
      });
      debug::trace_push(grammar, &frame);
      state.stack.push(frame);
      Ok(StepResult::Continue)
    }
  }
}

/// Pops the `Rtn` frame on top of the stack -- it has either reached a
/// `Neither`-lookahead final state, or a GLA accepted it as final, or (for
/// the start symbol only) input genuinely ran out. Fires every registered
/// callback for its RTN name, then either records the final result (start
/// symbol) or hands the slot record back to the caller frame.
pub(super) fn perform_rtn_pop(grammar: &Grammar, state: &mut ParseState) -> RuntimeResult<StepResult> {
  let top = state.stack.last().ok_or_else(|| {
    RuntimeError::internal("perform_rtn_pop called with an empty stack")
  })?;
  debug::trace_pop(grammar, top);
  let child = match state.stack.pop() {
    Some(Frame::Rtn(f)) => f,
    _ => return Err(RuntimeError::internal("perform_rtn_pop called with a non-Rtn frame on top")),
  };

  let rtn_name = grammar.str(grammar.rtn(child.rtn).name).to_string();
  let signal = {
    let view = crate::types::CompletionView { grammar, slots: &child.slots };
    state.callbacks.fire(&rtn_name, &view)
  };
  let cancelled = signal == crate::types::CallbackSignal::Cancel;

  if state.stack.is_empty() {
    state.result = Some(child.slots);
    return Ok(if cancelled { StepResult::Cancelled } else { StepResult::Eof });
  }

  let parent = state.stack.last_mut().and_then(Frame::as_rtn_mut).ok_or_else(|| {
    RuntimeError::internal("parent of a popped Rtn frame was not itself an Rtn frame")
  })?;
  let pending = parent
    .pending
    .take()
    .ok_or_else(|| RuntimeError::internal("parent frame was not mid-transition"))?;
  let prtn = grammar.rtn(parent.rtn);
  let transition = *prtn
    .state(parent.state)
    .transitions
    .get(pending.transition_index as usize)
    .ok_or_else(|| RuntimeError::internal("pending transition index out of range"))?;

  parent.state = transition.dest;
  if let Some(slot) = transition.slot {
    parent.slots.set(slot.slot_num, ParseValue::Nonterminal(Box::new(child.slots)));
  }

  Ok(if cancelled { StepResult::Cancelled } else { StepResult::Continue })
}
