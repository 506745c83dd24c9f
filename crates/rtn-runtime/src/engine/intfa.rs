//! The IntFA engine (spec §4.1): longest-match byte-level lexing.

use crate::types::{Grammar, IntFaFrame, InputBuffer, RuntimeError, RuntimeResult, StrId, Token};

/// The result of attempting to lex one terminal.
pub enum LexOutcome {
  /// A terminal was matched. The frame this was run against should be
  /// discarded; lexing resumes (if needed) from `token.end()`.
  Matched(Token),
  /// The buffer was exhausted but EOF has not been signalled. The frame
  /// must be preserved verbatim and the caller must return `ParseStatus::Ok`
  /// up to the driver.
  NeedMoreInput,
}

/// Advances `frame` as far as the currently available input allows,
/// implementing the maximal-munch algorithm of spec §4.1. Internal to a
/// single lex attempt -- does not know about ignore sets; see
/// [lex_terminal] for the ignore-aware wrapper the RTN and GLA engines
/// actually call.
fn step(grammar: &Grammar, frame: &mut IntFaFrame, input: &InputBuffer) -> RuntimeResult<LexOutcome> {
  let intfa = grammar.intfa(frame.intfa);

  loop {
    match input.byte_at(frame.cursor) {
      Some(byte) => {
        let state = intfa.state(frame.state);
        match state.find_transition(byte) {
          Some(t) => {
            frame.cursor += 1;
            frame.state = t.dest;
            if intfa.state(frame.state).final_terminal.is_some() {
              frame.last_match = Some((frame.cursor, frame.state));
            }
          }
          None => return finalize(frame, intfa, false),
        }
      }
      None if input.is_eof() => return finalize(frame, intfa, true),
      None => return Ok(LexOutcome::NeedMoreInput),
    }
  }
}

fn finalize(
  frame: &IntFaFrame,
  intfa: &crate::types::IntFa,
  at_eof: bool,
) -> RuntimeResult<LexOutcome> {
  if let Some((end, state)) = frame.last_match {
    let name = intfa.state(state).final_terminal.expect("last_match only set on final states");
    return Ok(LexOutcome::Matched(Token { name, offset: frame.start_offset, len: end - frame.start_offset }));
  }

  if at_eof && frame.cursor == frame.start_offset {
    if let Some(name) = intfa.state(crate::types::IntFa::START).final_terminal {
      return Ok(LexOutcome::Matched(Token { name, offset: frame.start_offset, len: 0 }));
    }
  }

  Err(RuntimeError::ParseFailed {
    offset: frame.start_offset,
    reason: "unexpected input: no terminal matched".to_string(),
  })
}

/// Lexes the next terminal starting at `frame`, silently discarding and
/// re-lexing past any terminal whose name is in `ignore`. This is the entry
/// point the RTN (§4.3) and GLA (§4.2) engines use; both need the ignore
/// set of the enclosing RTN applied the same way.
pub fn lex_terminal(
  grammar: &Grammar,
  ignore: &[StrId],
  frame: &mut IntFaFrame,
  input: &InputBuffer,
) -> RuntimeResult<LexOutcome> {
  loop {
    match step(grammar, frame, input)? {
      LexOutcome::NeedMoreInput => return Ok(LexOutcome::NeedMoreInput),
      LexOutcome::Matched(tok) if ignore.contains(&tok.name) => {
        // A zero-length ignored match would spin forever; the grammar
        // compiler is expected never to mark an epsilon terminal ignorable.
        if tok.len == 0 {
          return Err(RuntimeError::internal(
            "zero-length terminal marked as ignored would not consume input",
          ));
        }
        *frame = IntFaFrame::new(frame.intfa, tok.end());
      }
      LexOutcome::Matched(tok) => return Ok(LexOutcome::Matched(tok)),
    }
  }
}
