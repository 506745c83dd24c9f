//! Deserializes the binary grammar block format (spec §6) into the
//! immutable, arena-indexed [`Grammar`] the engine runs against.
//!
//! The grammar *compiler* that emits this format, and the precise on-disk
//! framing it uses, are out of scope for this crate (spec §1) -- only the
//! loader's existence and its resulting in-memory shape are. This reader
//! therefore picks one concrete, fixed-order serialization of the block
//! format the spec describes (string table, then IntFA blocks, then GLA
//! blocks, then RTN blocks, each length-prefixed) rather than the
//! "records in any order" framing a real compiler's writer might choose;
//! any compiler targeting this engine can be made to emit this ordering,
//! or this loader adapted to a different one, without touching the engine
//! itself. Everything here mirrors the array/string interning convention
//! this codebase's `ParserDatabase` uses for its own compiled tables.

use std::io::{self, Read};

use crate::types::{
  Gla, GlaId, GlaState, GlaTransition, Grammar, IntFa, IntFaId, IntFaState, IntFaTransition,
  Lookahead, Rtn, RtnId, RtnState, RtnTransition, RtnTransitionLabel, SlotAssignment, StrId,
};
use crate::{RuntimeError, RuntimeResult};

/// Sentinel written in place of a string/slot index to mean "none" -- the
/// loader's rendition of the source format's `NULL`/`0` sentinels for
/// optional indices.
const NONE_INDEX: u32 = u32::MAX;

/// Reads `grammar` (produced by an external grammar compiler) and returns
/// the loaded, arena-indexed [`Grammar`]. Every string and automaton index
/// embedded in the file is resolved and bounds-checked before this
/// returns -- a `Grammar` that successfully loads never panics on a
/// dangling index during parsing.
pub fn load_grammar(source: &mut impl Read) -> RuntimeResult<Grammar> {
  let mut r = ByteReader { inner: source };
  let mut grammar = Grammar::new();

  let string_count = r.read_u32()?;
  for _ in 0..string_count {
    let s = r.read_string()?;
    grammar.strings.intern(s);
  }

  let intfa_count = r.read_u32()?;
  for _ in 0..intfa_count {
    grammar.intfas.push(read_intfa(&mut r)?);
  }

  let gla_count = r.read_u32()?;
  for _ in 0..gla_count {
    grammar.glas.push(read_gla(&mut r)?);
  }

  let rtn_count = r.read_u32()?;
  for _ in 0..rtn_count {
    grammar.rtns.push(read_rtn(&mut r)?);
  }

  validate(&grammar)?;
  Ok(grammar)
}

/// Teardown helper provided for API parity with the C interface's
/// `free_grammar`. A loaded [`Grammar`] owns nothing but ordinary Rust
/// collections, so this is (and is implemented as) `drop`.
pub fn free_grammar(grammar: Grammar) {
  drop(grammar)
}

fn read_intfa(r: &mut ByteReader<impl Read>) -> RuntimeResult<IntFa> {
  let state_count = r.read_u32()?;
  let mut states = Vec::with_capacity(state_count as usize);
  for _ in 0..state_count {
    let final_terminal = r.read_optional_index()?.map(StrId::from);
    let transition_count = r.read_u32()?;
    let mut transitions = Vec::with_capacity(transition_count as usize);
    for _ in 0..transition_count {
      let ch_low = r.read_u8()?;
      let ch_high = r.read_u8()?;
      let dest = r.read_u32()?;
      transitions.push(IntFaTransition { ch_low, ch_high, dest });
    }
    states.push(IntFaState { final_terminal, transitions });
  }
  Ok(IntFa { states })
}

fn read_gla(r: &mut ByteReader<impl Read>) -> RuntimeResult<Gla> {
  let state_count = r.read_u32()?;
  let mut states = Vec::with_capacity(state_count as usize);
  for _ in 0..state_count {
    let is_final = r.read_u8()? != 0;
    if is_final {
      let selector_count = r.read_u32()?;
      let mut selectors = Vec::with_capacity(selector_count as usize);
      for _ in 0..selector_count {
        selectors.push(r.read_u32()?);
      }
      states.push(GlaState::Final { selectors });
    } else {
      let intfa = IntFaId::from(r.read_u32()?);
      let transition_count = r.read_u32()?;
      let mut transitions = Vec::with_capacity(transition_count as usize);
      for _ in 0..transition_count {
        let terminal = StrId::from(r.read_u32()?);
        let dest = r.read_u32()?;
        transitions.push(GlaTransition { terminal, dest });
      }
      states.push(GlaState::NonFinal { intfa, transitions });
    }
  }
  Ok(Gla { states })
}

fn read_rtn(r: &mut ByteReader<impl Read>) -> RuntimeResult<Rtn> {
  let name = StrId::from(r.read_u32()?);
  let num_slots = r.read_u32()?;

  let ignore_count = r.read_u32()?;
  let mut ignore = Vec::with_capacity(ignore_count as usize);
  for _ in 0..ignore_count {
    ignore.push(StrId::from(r.read_u32()?));
  }

  let state_count = r.read_u32()?;
  let mut states = Vec::with_capacity(state_count as usize);
  for _ in 0..state_count {
    let is_final = r.read_u8()? != 0;
    let lookahead_kind = r.read_u8()?;
    let automaton_idx = r.read_u32()?;
    let lookahead = match lookahead_kind {
      0 => Lookahead::IntFa(IntFaId::from(automaton_idx)),
      1 => Lookahead::Gla(GlaId::from(automaton_idx)),
      2 => Lookahead::Neither,
      other => {
        return Err(RuntimeError::GrammarLoad { reason: format!("unknown lookahead kind tag {other}") })
      }
    };

    let transition_count = r.read_u32()?;
    let mut transitions = Vec::with_capacity(transition_count as usize);
    for _ in 0..transition_count {
      let kind = r.read_u8()?;
      let label_raw = r.read_u32()?;
      let dest = r.read_u32()?;
      let slot_name = r.read_optional_index()?.map(StrId::from);
      let slot_num = r.read_u32()?;
      let label = match kind {
        0 => RtnTransitionLabel::Terminal(StrId::from(label_raw)),
        1 => RtnTransitionLabel::Nonterminal(RtnId::from(label_raw)),
        other => {
          return Err(RuntimeError::GrammarLoad { reason: format!("unknown transition kind tag {other}") })
        }
      };
      let slot = slot_name.map(|slot_name| SlotAssignment { slot_name, slot_num });
      transitions.push(RtnTransition { label, dest, slot });
    }

    states.push(RtnState { is_final, lookahead, transitions });
  }

  Ok(Rtn { name, num_slots, ignore, states })
}

/// Bounds-checks every string and automaton index a loaded grammar
/// contains, so that a successfully loaded grammar can never cause the
/// engine to index out of range. Catches dangling indices left by a
/// malformed or truncated grammar file (spec §7, "grammar load error").
fn validate(g: &Grammar) -> RuntimeResult<()> {
  let check_str = |id: StrId| -> RuntimeResult<()> {
    if id.index() >= g.strings.len() {
      return Err(RuntimeError::GrammarLoad { reason: format!("dangling string index {}", id.index()) });
    }
    Ok(())
  };

  for intfa in &g.intfas {
    for state in &intfa.states {
      if let Some(t) = state.final_terminal {
        check_str(t)?;
      }
      for t in &state.transitions {
        if (t.dest as usize) >= intfa.states.len() {
          return Err(RuntimeError::GrammarLoad { reason: format!("dangling IntFA state index {}", t.dest) });
        }
      }
    }
  }

  for gla in &g.glas {
    for state in &gla.states {
      match state {
        GlaState::NonFinal { intfa, transitions } => {
          if intfa.index() >= g.intfas.len() {
            return Err(RuntimeError::GrammarLoad { reason: format!("dangling IntFA index {}", intfa.index()) });
          }
          for t in transitions {
            check_str(t.terminal)?;
            if (t.dest as usize) >= gla.states.len() {
              return Err(RuntimeError::GrammarLoad { reason: format!("dangling GLA state index {}", t.dest) });
            }
          }
        }
        GlaState::Final { selectors } => {
          if selectors.is_empty() {
            return Err(RuntimeError::GrammarLoad { reason: "final GLA state with no selectors".to_string() });
          }
        }
      }
    }
  }

  for rtn in &g.rtns {
    check_str(rtn.name)?;
    for ignore in &rtn.ignore {
      check_str(*ignore)?;
    }
    for state in &rtn.states {
      match state.lookahead {
        Lookahead::IntFa(id) if id.index() >= g.intfas.len() => {
          return Err(RuntimeError::GrammarLoad { reason: format!("dangling IntFA index {}", id.index()) });
        }
        Lookahead::Gla(id) if id.index() >= g.glas.len() => {
          return Err(RuntimeError::GrammarLoad { reason: format!("dangling GLA index {}", id.index()) });
        }
        Lookahead::Neither if !state.is_final => {
          return Err(RuntimeError::GrammarLoad {
            reason: "non-final RTN state with no lookahead and no transitions".to_string(),
          });
        }
        _ => {}
      }
      for t in &state.transitions {
        match t.label {
          RtnTransitionLabel::Terminal(id) => check_str(id)?,
          RtnTransitionLabel::Nonterminal(id) => {
            if id.index() >= g.rtns.len() {
              return Err(RuntimeError::GrammarLoad { reason: format!("dangling RTN index {}", id.index()) });
            }
          }
        }
        if (t.dest as usize) >= rtn.states.len() {
          return Err(RuntimeError::GrammarLoad { reason: format!("dangling RTN state index {}", t.dest) });
        }
        if let Some(slot) = t.slot {
          check_str(slot.slot_name)?;
          if slot.slot_num >= rtn.num_slots {
            return Err(RuntimeError::GrammarLoad {
              reason: format!("slot number {} out of range for {} slots", slot.slot_num, rtn.num_slots),
            });
          }
        }
      }
    }
  }

  Ok(())
}

/// A thin little-endian cursor over the grammar file's byte stream. Kept
/// deliberately dependency-free -- this codebase's runtime-facing crates
/// (`radlr-rust-runtime`, `radlr-core`) carry no third-party serialization
/// dependency either, reaching for manual reads over pulling in a codec
/// crate for a single internal format.
struct ByteReader<'a, R: Read> {
  inner: &'a mut R,
}

impl<'a, R: Read> ByteReader<'a, R> {
  fn read_u8(&mut self) -> RuntimeResult<u8> {
    let mut buf = [0u8; 1];
    self.fill(&mut buf)?;
    Ok(buf[0])
  }

  fn read_u32(&mut self) -> RuntimeResult<u32> {
    let mut buf = [0u8; 4];
    self.fill(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
  }

  /// Reads a `u32` index, translating the file's `NONE_INDEX` sentinel to
  /// `None`.
  fn read_optional_index(&mut self) -> RuntimeResult<Option<u32>> {
    let raw = self.read_u32()?;
    Ok(if raw == NONE_INDEX { None } else { Some(raw) })
  }

  fn read_string(&mut self) -> RuntimeResult<String> {
    let len = self.read_u32()? as usize;
    let mut buf = vec![0u8; len];
    self.fill(&mut buf)?;
    String::from_utf8(buf).map_err(|e| RuntimeError::GrammarLoad { reason: format!("invalid utf8 string: {e}") })
  }

  fn fill(&mut self, buf: &mut [u8]) -> RuntimeResult<()> {
    self.inner.read_exact(buf).map_err(|e| match e.kind() {
      io::ErrorKind::UnexpectedEof => {
        RuntimeError::GrammarLoad { reason: "unexpected end of grammar file".to_string() }
      }
      _ => RuntimeError::GrammarLoad { reason: format!("i/o error reading grammar file: {e}") },
    })
  }
}
