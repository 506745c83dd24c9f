//! Hand-built grammars used by the integration tests in this directory.
//!
//! There is no grammar compiler in this workspace, so these are assembled
//! directly from the public [rtn_runtime::types] structs rather than
//! round-tripped through [rtn_runtime::load_grammar]. The loader's own
//! round-trip coverage lives in `src/loader.rs`.

#![allow(dead_code)]

use rtn_runtime::types::{
  Gla, GlaId, GlaState, GlaTransition, Grammar, IntFa, IntFaId, IntFaState, IntFaTransition,
  Lookahead, Rtn, RtnId, RtnState, RtnTransition, RtnTransitionLabel, SlotAssignment, StrId,
};

/// `S -> '(' S ')' | ε`. Slot 0 of a non-epsilon match holds the nested `S`.
pub struct ParensGrammar {
  pub grammar: Grammar,
}

pub fn parens_grammar() -> ParensGrammar {
  let mut g = Grammar::new();
  let s_name = g.strings.intern("S");
  let lparen = g.strings.intern("LPAREN");
  let rparen = g.strings.intern("RPAREN");
  let child_slot = g.strings.intern("child");

  // One IntFA recognizing '(' and ')' as two distinct terminals.
  let paren_intfa = g.intfas.len();
  g.intfas.push(IntFa {
    states: vec![
      IntFaState {
        final_terminal: None,
        transitions: vec![
          IntFaTransition { ch_low: b'(', ch_high: b'(', dest: 1 },
          IntFaTransition { ch_low: b')', ch_high: b')', dest: 2 },
        ],
      },
      IntFaState { final_terminal: Some(lparen), transitions: vec![] },
      IntFaState { final_terminal: Some(rparen), transitions: vec![] },
    ],
  });
  let paren_intfa = IntFaId::from(paren_intfa as u32);

  // A GLA whose start state is immediately final: it never needs to lex
  // anything, it just always commits to the sole outgoing transition of
  // whichever RTN state invokes it. RTN transitions targeting a nonterminal
  // are only ever taken through a GLA selector, even when there's only one
  // transition to choose from.
  let commit_gla = g.glas.len();
  g.glas.push(Gla { states: vec![GlaState::Final { selectors: vec![1] }] });
  let commit_gla = GlaId::from(commit_gla as u32);

  let s_id = RtnId::from(0u32);
  g.rtns.push(Rtn {
    name: s_name,
    num_slots: 1,
    ignore: vec![],
    states: vec![
      // 0: decide between recursing (on '(') or accepting empty.
      RtnState {
        is_final: true,
        lookahead: Lookahead::IntFa(paren_intfa),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(lparen),
          dest: 1,
          slot: None,
        }],
      },
      // 1: always call S.
      RtnState {
        is_final: false,
        lookahead: Lookahead::Gla(commit_gla),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Nonterminal(s_id),
          dest: 2,
          slot: Some(SlotAssignment { slot_name: child_slot, slot_num: 0 }),
        }],
      },
      // 2: expect the closing paren.
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(paren_intfa),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(rparen),
          dest: 3,
          slot: None,
        }],
      },
      // 3: done.
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  ParensGrammar { grammar: g }
}

/// `Pair -> NUM NUM`, skipping runs of spaces between them.
pub struct PairGrammar {
  pub grammar: Grammar,
}

pub fn pair_grammar() -> PairGrammar {
  let mut g = Grammar::new();
  let pair_name = g.strings.intern("Pair");
  let num = g.strings.intern("NUM");
  let ws = g.strings.intern("WS");
  let first = g.strings.intern("first");
  let second = g.strings.intern("second");

  let intfa_id = g.intfas.len();
  g.intfas.push(IntFa {
    states: vec![
      IntFaState {
        final_terminal: None,
        transitions: vec![
          IntFaTransition { ch_low: b'0', ch_high: b'9', dest: 1 },
          IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 },
        ],
      },
      IntFaState {
        final_terminal: Some(num),
        transitions: vec![IntFaTransition { ch_low: b'0', ch_high: b'9', dest: 1 }],
      },
      IntFaState {
        final_terminal: Some(ws),
        transitions: vec![IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 }],
      },
    ],
  });
  let intfa_id = IntFaId::from(intfa_id as u32);

  g.rtns.push(Rtn {
    name: pair_name,
    num_slots: 2,
    ignore: vec![ws],
    states: vec![
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(num),
          dest: 1,
          slot: Some(SlotAssignment { slot_name: first, slot_num: 0 }),
        }],
      },
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(num),
          dest: 2,
          slot: Some(SlotAssignment { slot_name: second, slot_num: 1 }),
        }],
      },
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  PairGrammar { grammar: g }
}

/// `Start -> AB | AC`, where `AB` is `'a' 'b'` and `AC` is `'a' 'c'`. Choosing
/// between them requires looking two terminals ahead before committing to
/// either nonterminal, which is exactly what a GLA is for.
pub struct DisambiguationGrammar {
  pub grammar: Grammar,
  pub start: RtnId,
  pub ab: RtnId,
  pub ac: RtnId,
}

pub fn disambiguation_grammar() -> DisambiguationGrammar {
  let mut g = Grammar::new();
  let start_name = g.strings.intern("Start");
  let ab_name = g.strings.intern("AB");
  let ac_name = g.strings.intern("AC");
  let a = g.strings.intern("A");
  let b = g.strings.intern("B");
  let c = g.strings.intern("C");
  let first = g.strings.intern("first");
  let second = g.strings.intern("second");
  let child = g.strings.intern("child");

  let intfa_id = g.intfas.len();
  g.intfas.push(IntFa {
    states: vec![
      IntFaState {
        final_terminal: None,
        transitions: vec![
          IntFaTransition { ch_low: b'a', ch_high: b'a', dest: 1 },
          IntFaTransition { ch_low: b'b', ch_high: b'b', dest: 2 },
          IntFaTransition { ch_low: b'c', ch_high: b'c', dest: 3 },
        ],
      },
      IntFaState { final_terminal: Some(a), transitions: vec![] },
      IntFaState { final_terminal: Some(b), transitions: vec![] },
      IntFaState { final_terminal: Some(c), transitions: vec![] },
    ],
  });
  let intfa_id = IntFaId::from(intfa_id as u32);

  // Looks ahead through both terminals before choosing which child rule to
  // call; `Start` itself never lexes directly.
  let gla_id = g.glas.len();
  g.glas.push(Gla {
    states: vec![
      GlaState::NonFinal { intfa: intfa_id, transitions: vec![GlaTransition { terminal: a, dest: 1 }] },
      GlaState::NonFinal {
        intfa: intfa_id,
        transitions: vec![
          GlaTransition { terminal: b, dest: 2 },
          GlaTransition { terminal: c, dest: 3 },
        ],
      },
      GlaState::Final { selectors: vec![1] }, // take Start's transition 0 (AB)
      GlaState::Final { selectors: vec![2] }, // take Start's transition 1 (AC)
    ],
  });
  let gla_id = GlaId::from(gla_id as u32);

  // `Start` must land at `RtnId::from(0u32)`: the engine's start symbol is
  // hardcoded to RTN index 0 (`ParseState::reinit`), so it has to be pushed
  // first, with `ab`/`ac` referenced forward by id.
  let start = RtnId::from(0u32);
  let ab = RtnId::from(1u32);
  let ac = RtnId::from(2u32);

  g.rtns.push(Rtn {
    name: start_name,
    num_slots: 1,
    ignore: vec![],
    states: vec![
      RtnState {
        is_final: false,
        lookahead: Lookahead::Gla(gla_id),
        transitions: vec![
          RtnTransition {
            label: RtnTransitionLabel::Nonterminal(ab),
            dest: 1,
            slot: Some(SlotAssignment { slot_name: child, slot_num: 0 }),
          },
          RtnTransition {
            label: RtnTransitionLabel::Nonterminal(ac),
            dest: 1,
            slot: Some(SlotAssignment { slot_name: child, slot_num: 0 }),
          },
        ],
      },
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  g.rtns.push(Rtn {
    name: ab_name,
    num_slots: 2,
    ignore: vec![],
    states: vec![
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(a),
          dest: 1,
          slot: Some(SlotAssignment { slot_name: first, slot_num: 0 }),
        }],
      },
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(b),
          dest: 2,
          slot: Some(SlotAssignment { slot_name: second, slot_num: 1 }),
        }],
      },
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  g.rtns.push(Rtn {
    name: ac_name,
    num_slots: 2,
    ignore: vec![],
    states: vec![
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(a),
          dest: 1,
          slot: Some(SlotAssignment { slot_name: first, slot_num: 0 }),
        }],
      },
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(intfa_id),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(c),
          dest: 2,
          slot: Some(SlotAssignment { slot_name: second, slot_num: 1 }),
        }],
      },
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  DisambiguationGrammar { grammar: g, start, ab, ac }
}

/// Helper for assertions: resolves a string id through the grammar.
pub fn name_of(grammar: &Grammar, id: StrId) -> &str {
  grammar.str(id)
}

/// `E -> T '+' T '+' T; T -> NUM`, the spec's LL(1) arithmetic scenario. The
/// repetition is unrolled to a fixed three terms rather than modeled as a
/// general Kleene star: a self-recursive tail rule would need to pop on raw
/// EOF from a non-start frame, which this engine only allows for the start
/// symbol (spec §4.3's "or EOF at top-level" clause). `with_ignore` adds `WS`
/// to `E`'s ignore set and to both IntFAs, so the same grammar can be run
/// against spaced and unspaced input.
pub struct ArithmeticGrammar {
  pub grammar: Grammar,
}

pub fn arithmetic_grammar(with_ignore: bool) -> ArithmeticGrammar {
  let mut g = Grammar::new();
  let e_name = g.strings.intern("E");
  let t_name = g.strings.intern("T");
  let num = g.strings.intern("NUM");
  let plus = g.strings.intern("PLUS");
  let ws = g.strings.intern("WS");
  let t0 = g.strings.intern("t0");
  let t1 = g.strings.intern("t1");
  let t2 = g.strings.intern("t2");
  let value = g.strings.intern("value");

  // Digit runs, with an optional WS branch alongside the digit branch so the
  // ignore-skip loop in `lex_terminal` has something to discard.
  let num_intfa = IntFaId::from(g.intfas.len() as u32);
  let mut num_transitions = vec![IntFaTransition { ch_low: b'0', ch_high: b'9', dest: 1 }];
  if with_ignore {
    num_transitions.push(IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 });
  }
  let mut num_states = vec![
    IntFaState { final_terminal: None, transitions: num_transitions },
    IntFaState {
      final_terminal: Some(num),
      transitions: vec![IntFaTransition { ch_low: b'0', ch_high: b'9', dest: 1 }],
    },
  ];
  if with_ignore {
    num_states.push(IntFaState {
      final_terminal: Some(ws),
      transitions: vec![IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 }],
    });
  }
  g.intfas.push(IntFa { states: num_states });

  // '+', with the same optional WS branch.
  let plus_intfa = IntFaId::from(g.intfas.len() as u32);
  let mut plus_transitions = vec![IntFaTransition { ch_low: b'+', ch_high: b'+', dest: 1 }];
  if with_ignore {
    plus_transitions.push(IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 });
  }
  let mut plus_states = vec![
    IntFaState { final_terminal: None, transitions: plus_transitions },
    IntFaState { final_terminal: Some(plus), transitions: vec![] },
  ];
  if with_ignore {
    plus_states.push(IntFaState {
      final_terminal: Some(ws),
      transitions: vec![IntFaTransition { ch_low: b' ', ch_high: b' ', dest: 2 }],
    });
  }
  g.intfas.push(IntFa { states: plus_states });

  // Unconditionally commits to whichever single transition invoked it --
  // every nonterminal call below has exactly one outgoing transition, so one
  // shared GLA suffices (mirrors `parens_grammar`'s `commit_gla`).
  let commit_gla = GlaId::from(g.glas.len() as u32);
  g.glas.push(Gla { states: vec![GlaState::Final { selectors: vec![1] }] });

  // The engine's start symbol is always RTN index 0 (`ParseState::reinit`),
  // so `E` -- the rule this grammar is meant to be parsed as -- must be
  // pushed first, exactly as `parens_grammar`'s `S` and `pair_grammar`'s
  // `Pair` are. `T` is pushed second and referenced forward by id.
  let t_id = RtnId::from(1u32);

  let e_ignore = if with_ignore { vec![ws] } else { vec![] };
  g.rtns.push(Rtn {
    name: e_name,
    num_slots: 3,
    ignore: e_ignore,
    states: vec![
      // 0: call T, store at slot 0.
      RtnState {
        is_final: false,
        lookahead: Lookahead::Gla(commit_gla),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Nonterminal(t_id),
          dest: 1,
          slot: Some(SlotAssignment { slot_name: t0, slot_num: 0 }),
        }],
      },
      // 1: expect '+'.
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(plus_intfa),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(plus),
          dest: 2,
          slot: None,
        }],
      },
      // 2: call T, store at slot 1.
      RtnState {
        is_final: false,
        lookahead: Lookahead::Gla(commit_gla),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Nonterminal(t_id),
          dest: 3,
          slot: Some(SlotAssignment { slot_name: t1, slot_num: 1 }),
        }],
      },
      // 3: expect '+'.
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(plus_intfa),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(plus),
          dest: 4,
          slot: None,
        }],
      },
      // 4: call T, store at slot 2.
      RtnState {
        is_final: false,
        lookahead: Lookahead::Gla(commit_gla),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Nonterminal(t_id),
          dest: 5,
          slot: Some(SlotAssignment { slot_name: t2, slot_num: 2 }),
        }],
      },
      // 5: done.
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  // T is the frame that actually lexes each NUM, so it -- not E -- needs
  // `WS` in its own ignore set: `handle_intfa_top` resolves the ignore set
  // from the nearest enclosing `Rtn` frame, which for a NUM lex is T.
  let t_ignore = if with_ignore { vec![ws] } else { vec![] };
  g.rtns.push(Rtn {
    name: t_name,
    num_slots: 1,
    ignore: t_ignore,
    states: vec![
      RtnState {
        is_final: false,
        lookahead: Lookahead::IntFa(num_intfa),
        transitions: vec![RtnTransition {
          label: RtnTransitionLabel::Terminal(num),
          dest: 1,
          slot: Some(SlotAssignment { slot_name: value, slot_num: 0 }),
        }],
      },
      RtnState { is_final: true, lookahead: Lookahead::Neither, transitions: vec![] },
    ],
  });

  ArithmeticGrammar { grammar: g }
}
