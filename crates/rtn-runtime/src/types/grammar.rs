use std::sync::Arc;

macro_rules! indexed_id {
  ($id_type:ident) => {
    #[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
    pub struct $id_type(pub(crate) u32);

    impl $id_type {
      pub fn index(&self) -> usize {
        self.0 as usize
      }
    }

    impl From<u32> for $id_type {
      fn from(value: u32) -> Self {
        Self(value)
      }
    }

    impl From<usize> for $id_type {
      fn from(value: usize) -> Self {
        Self(value as u32)
      }
    }
  };
}

/// A key into a [Grammar]'s [StringPool]. Used for terminal names, nonterminal
/// (RTN) names, and slot names alike -- all three namespaces share the one
/// pool.
indexed_id!(StrId);

/// A key into a [Grammar]'s `rtns` array.
indexed_id!(RtnId);

/// A key into a [Grammar]'s `glas` array.
indexed_id!(GlaId);

/// A key into a [Grammar]'s `intfas` array.
indexed_id!(IntFaId);

/// A key into an automaton's own `states` array. States of different
/// automata are never compared against each other, so this is not namespaced
/// by automaton kind.
pub type StateId = u32;

/// The string pool backing a [Grammar]: every terminal, nonterminal, and slot
/// name referenced anywhere in the grammar is interned here once, and
/// referred to everywhere else by [StrId].
#[derive(Debug, Default)]
pub struct StringPool {
  strings: Vec<Arc<str>>,
}

impl StringPool {
  pub fn new() -> Self {
    Self::default()
  }

  /// Interns `s`, returning its id. Does not deduplicate -- the loader is
  /// expected to have already deduplicated strings in the source file, and
  /// re-scanning on every intern would make loading quadratic.
  pub fn intern(&mut self, s: impl Into<Arc<str>>) -> StrId {
    let id = StrId(self.strings.len() as u32);
    self.strings.push(s.into());
    id
  }

  pub fn get(&self, id: StrId) -> &str {
    &self.strings[id.index()]
  }

  pub fn len(&self) -> usize {
    self.strings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.strings.is_empty()
  }
}

/// A single byte-range edge of an [IntFa].
#[derive(Debug, Clone, Copy)]
pub struct IntFaTransition {
  pub ch_low:  u8,
  pub ch_high: u8,
  pub dest:    StateId,
}

impl IntFaTransition {
  #[inline]
  pub fn matches(&self, byte: u8) -> bool {
    byte >= self.ch_low && byte <= self.ch_high
  }
}

/// One state of an [IntFa]. If `final_terminal` is set, entering this state
/// constitutes a valid (if not necessarily maximal) match for that terminal.
#[derive(Debug, Clone, Default)]
pub struct IntFaState {
  pub final_terminal: Option<StrId>,
  pub transitions:     Vec<IntFaTransition>,
}

impl IntFaState {
  /// Transitions of a single state are disjoint, so at most one can match.
  pub fn find_transition(&self, byte: u8) -> Option<&IntFaTransition> {
    self.transitions.iter().find(|t| t.matches(byte))
  }
}

/// A byte-level DFA: the lexer underneath both the RTN's terminal-driven
/// states and the GLA's per-state lexing step.
#[derive(Debug, Clone, Default)]
pub struct IntFa {
  pub states: Vec<IntFaState>,
}

impl IntFa {
  pub const START: StateId = 0;

  pub fn state(&self, id: StateId) -> &IntFaState {
    &self.states[id as usize]
  }
}

/// An outgoing edge of a [GlaState::NonFinal], keyed by the terminal just
/// lexed.
#[derive(Debug, Clone)]
pub struct GlaTransition {
  pub terminal: StrId,
  pub dest:     StateId,
}

/// One state of a [Gla].
#[derive(Debug, Clone)]
pub enum GlaState {
  /// Lex one more terminal with `intfa`, then follow the transition in
  /// `transitions` keyed by that terminal's name.
  NonFinal { intfa: IntFaId, transitions: Vec<GlaTransition> },
  /// Chooses an outgoing RTN transition. `selectors` is always length 1 in
  /// the deterministic grammars this engine targets; 0 means "return from
  /// the enclosing RTN", k>0 means "take RTN transition k-1".
  Final { selectors: Vec<u32> },
}

impl GlaState {
  pub fn is_final(&self) -> bool {
    matches!(self, GlaState::Final { .. })
  }
}

/// A terminal-level DFA layered atop one or more [IntFa]s, used by a
/// lookahead-driven RTN state to disambiguate its outgoing transitions.
#[derive(Debug, Clone, Default)]
pub struct Gla {
  pub states: Vec<GlaState>,
}

impl Gla {
  pub const START: StateId = 0;

  pub fn state(&self, id: StateId) -> &GlaState {
    &self.states[id as usize]
  }
}

/// What kind of lookahead, if any, an [RtnState] uses to choose its outgoing
/// transition.
#[derive(Debug, Clone, Copy)]
pub enum Lookahead {
  /// Lex exactly one terminal via this IntFA and match it against the
  /// state's outgoing terminal transitions.
  IntFa(IntFaId),
  /// Run this GLA to choose a transition, or to accept this state as final.
  Gla(GlaId),
  /// No outgoing edges; the state must be final.
  Neither,
}

/// The label of an [RtnTransition]: either a terminal to match, or a
/// nonterminal (another RTN) to recurse into.
#[derive(Debug, Clone, Copy)]
pub enum RtnTransitionLabel {
  Terminal(StrId),
  Nonterminal(RtnId),
}

/// Where a transition's match, if any, is recorded in the producing frame's
/// slot record.
#[derive(Debug, Clone, Copy)]
pub struct SlotAssignment {
  pub slot_name: StrId,
  pub slot_num:  u32,
}

/// A single outgoing edge of an [RtnState].
#[derive(Debug, Clone, Copy)]
pub struct RtnTransition {
  pub label: RtnTransitionLabel,
  pub dest:  StateId,
  pub slot:  Option<SlotAssignment>,
}

/// One state of an [Rtn].
#[derive(Debug, Clone)]
pub struct RtnState {
  pub is_final:   bool,
  pub lookahead:  Lookahead,
  pub transitions: Vec<RtnTransition>,
}

/// A Recursive Transition Network: the compiled form of one grammar rule.
#[derive(Debug, Clone)]
pub struct Rtn {
  pub name:      StrId,
  pub num_slots: u32,
  /// Terminals that are silently discarded wherever they appear while
  /// parsing this rule, whether lexed directly by the RTN or on its behalf
  /// by a GLA.
  pub ignore:    Vec<StrId>,
  pub states:    Vec<RtnState>,
}

impl Rtn {
  pub const START: StateId = 0;

  pub fn state(&self, id: StateId) -> &RtnState {
    &self.states[id as usize]
  }

  pub fn ignores(&self, terminal: StrId) -> bool {
    self.ignore.contains(&terminal)
  }
}

/// The fully loaded, immutable grammar: a string pool plus the arenas of
/// RTNs, GLAs, and IntFAs it references by index. Shared read-only across
/// every [crate::ParseState] parsing against it.
#[derive(Debug, Default)]
pub struct Grammar {
  pub strings: StringPool,
  pub rtns:    Vec<Rtn>,
  pub glas:    Vec<Gla>,
  pub intfas:  Vec<IntFa>,
}

impl Grammar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn rtn(&self, id: RtnId) -> &Rtn {
    &self.rtns[id.index()]
  }

  pub fn gla(&self, id: GlaId) -> &Gla {
    &self.glas[id.index()]
  }

  pub fn intfa(&self, id: IntFaId) -> &IntFa {
    &self.intfas[id.index()]
  }

  pub fn str(&self, id: StrId) -> &str {
    self.strings.get(id)
  }

  /// Finds the RTN named `name`. A linear scan over the grammar's rules --
  /// acceptable given the rule counts real grammars have, matching this
  /// codebase's preference for simple linear structures (e.g.
  /// [crate::types::CallbackRegistry]) over premature indexing.
  pub fn rtn_by_name(&self, name: &str) -> Option<RtnId> {
    self.rtns.iter().position(|r| self.strings.get(r.name) == name).map(RtnId::from)
  }
}
