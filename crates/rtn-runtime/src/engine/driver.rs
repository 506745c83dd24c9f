//! The parse driver (spec §4.4): the public entry point, stepping whichever
//! frame is on top of the stack until input runs out, the parse completes,
//! or a callback cancels it.

use crate::types::{Frame, Grammar, ParseOutcome, ParseState, ParseStatus};
use crate::RuntimeResult;

use super::gla::handle_gla_top;
use super::intfa::{lex_terminal, LexOutcome};
use super::rtn::handle_rtn_top;
use super::StepResult;

/// Feeds `buf` into `state`'s input window (latching `eof` if set) and
/// drives the parse forward as far as it will go: until the top frame is an
/// `IntFa` frame that has run out of buffered bytes, until the start symbol
/// pops, or until a callback cancels. Call again with more bytes (and/or
/// `eof = true`) to resume a `ParseStatus::Ok` result.
pub fn parse(grammar: &Grammar, state: &mut ParseState, buf: &[u8], eof: bool) -> RuntimeResult<ParseOutcome> {
  let call_start = state.input.end_offset();
  state.input.feed(buf, eof);

  loop {
    if let Err(e) = check_resource_bounds(state) {
      crate::debug::trace_error(&e);
      return Err(e);
    }

    if state.stack.is_empty() {
      return Ok(ParseOutcome { status: ParseStatus::Eof, consumed: buf.len() });
    }

    let step_result = match step(grammar, state) {
      Ok(r) => r,
      Err(e) => {
        crate::debug::trace_error(&e);
        return Err(e);
      }
    };

    match step_result {
      StepResult::Continue => continue,

      StepResult::NeedMoreInput => {
        let keep_from = retained_from(state);
        state.input.discard_before(keep_from);
        let consumed = keep_from.saturating_sub(call_start).min(buf.len());
        return Ok(ParseOutcome { status: ParseStatus::Ok, consumed });
      }

      StepResult::Eof => {
        let keep_from = retained_from(state);
        state.input.discard_before(keep_from);
        return Ok(ParseOutcome { status: ParseStatus::Eof, consumed: buf.len() });
      }

      StepResult::Cancelled => {
        let keep_from = retained_from(state);
        state.input.discard_before(keep_from);
        let consumed = keep_from.saturating_sub(call_start).min(buf.len());
        return Ok(ParseOutcome { status: ParseStatus::Cancelled, consumed });
      }
    }
  }
}

fn check_resource_bounds(state: &ParseState) -> RuntimeResult<()> {
  if state.stack.len() > state.config.max_stack_depth {
    return Err(crate::RuntimeError::ResourceLimitExceeded {
      limit: "max_stack_depth",
      value: state.stack.len(),
      max: state.config.max_stack_depth,
    });
  }
  if state.token_buffer.len() > state.config.max_token_buffer_len {
    return Err(crate::RuntimeError::ResourceLimitExceeded {
      limit: "max_token_buffer_len",
      value: state.token_buffer.len(),
      max: state.config.max_token_buffer_len,
    });
  }
  Ok(())
}

/// The earliest offset any frame still on the stack requires the input
/// buffer to retain. Only an in-flight `IntFa` frame ever needs to re-read
/// bytes it has already examined (to reconstruct the longest match); every
/// other frame only remembers offsets as metadata, not as bytes to revisit.
fn retained_from(state: &ParseState) -> usize {
  match state.stack.last() {
    Some(Frame::IntFa(f)) => f.start_offset,
    _ => state.offset,
  }
}

/// Advances the parse by exactly one unit of work, dispatching on whichever
/// frame is on top of the stack.
fn step(grammar: &Grammar, state: &mut ParseState) -> RuntimeResult<StepResult> {
  match state.stack.last() {
    Some(Frame::IntFa(_)) => handle_intfa_top(grammar, state),
    Some(Frame::Gla(_)) => handle_gla_top(grammar, state),
    Some(Frame::Rtn(_)) => handle_rtn_top(grammar, state),
    None => Ok(StepResult::Eof),
  }
}

/// Runs one [lex_terminal] attempt for the `IntFa` frame on top of the
/// stack, using the ignore set of the nearest enclosing `Rtn` frame. On a
/// match, pops the frame and hands the token to whichever frame is
/// underneath -- a `Gla` frame appends it to the token buffer and follows a
/// transition; an `Rtn` frame processes it directly as its own lookahead.
fn handle_intfa_top(grammar: &Grammar, state: &mut ParseState) -> RuntimeResult<StepResult> {
  let owner_ignore = {
    let depth = state.stack.len();
    let owner_idx = match state.stack.get(depth - 2) {
      Some(Frame::Gla(_)) => depth.checked_sub(3),
      Some(Frame::Rtn(_)) => Some(depth - 2),
      _ => None,
    };
    let owner_idx = owner_idx.ok_or_else(|| {
      crate::RuntimeError::internal("IntFa frame had no enclosing Rtn frame to take an ignore set from")
    })?;
    let owner = state.stack[owner_idx].as_rtn().ok_or_else(|| {
      crate::RuntimeError::internal("IntFa frame's nearest enclosing frame was not an Rtn frame")
    })?;
    grammar.rtn(owner.rtn).ignore.clone()
  };

  let frame = state.stack.last_mut().and_then(Frame::as_intfa_mut).unwrap();
  let outcome = lex_terminal(grammar, &owner_ignore, frame, &state.input)?;

  match outcome {
    LexOutcome::NeedMoreInput => Ok(StepResult::NeedMoreInput),
    LexOutcome::Matched(tok) => {
      if let Some(top) = state.stack.last() {
        crate::debug::trace_pop(grammar, top);
      }
      state.stack.pop();
      state.offset = state.offset.max(tok.end());

      match state.stack.last() {
        Some(Frame::Gla(_)) => {
          // The owning GLA picks this up next time it's dispatched: it
          // compares buffer length against its own `examined` count.
          state.token_buffer.push_back(tok);
          Ok(StepResult::Continue)
        }
        Some(Frame::Rtn(_)) => {
          // `commit_rtn_transition`'s terminal branch always dequeues from
          // the token buffer, whether the terminal arrived via a GLA or (as
          // here) directly from the Rtn frame's own IntFa dispatch -- so it
          // has to land in the buffer before we hand it off.
          state.token_buffer.push_back(tok);
          super::rtn::process_rtn_terminal(grammar, state, tok)
        }
        _ => Err(crate::RuntimeError::internal(
          "IntFa frame popped onto neither a Gla nor an Rtn frame",
        )),
      }
    }
  }
}
