use super::grammar::RtnId;

/// The inline byte width of a [ParseValue::UserData] cell. Userdata is
/// always a fixed-size blob written in place -- no heap pointer is stored
/// inside a slot cell.
pub const USERDATA_WIDTH: usize = 16;

/// A `(offset, length)` reference into the input a terminal was matched
/// from. Offsets are absolute, not relative to any buffer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TerminalRef {
  pub offset: usize,
  pub len:    usize,
}

impl TerminalRef {
  pub fn end(&self) -> usize {
    self.offset + self.len
  }
}

/// A completed child RTN's result, one per [crate::SlotRecord] "nonterminal"
/// cell. Boxed so that a [ParseValue] doesn't balloon to the size of its
/// largest possible subtree -- `SlotRecord`s nest arbitrarily deep for
/// recursive grammars.
pub type NonterminalRef = Box<SlotRecord>;

/// One cell of a [SlotRecord]: empty, a lexed terminal, a completed child
/// rule, or an opaque blob a callback chose to stash there.
#[derive(Debug, Clone, Default)]
pub enum ParseValue {
  #[default]
  Empty,
  Terminal(TerminalRef),
  Nonterminal(NonterminalRef),
  UserData([u8; USERDATA_WIDTH]),
}

impl ParseValue {
  pub fn as_terminal(&self) -> Option<TerminalRef> {
    match self {
      Self::Terminal(t) => Some(*t),
      _ => None,
    }
  }

  pub fn as_nonterminal(&self) -> Option<&SlotRecord> {
    match self {
      Self::Nonterminal(n) => Some(n),
      _ => None,
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Empty)
  }
}

/// The result of completing one RTN call: a reference to the RTN that
/// produced it, plus the fixed-size array of parse values declared by that
/// RTN's `num_slots`.
#[derive(Debug, Clone)]
pub struct SlotRecord {
  pub rtn:   RtnId,
  pub slots: Vec<ParseValue>,
}

impl SlotRecord {
  pub fn new(rtn: RtnId, num_slots: u32) -> Self {
    Self { rtn, slots: vec![ParseValue::Empty; num_slots as usize] }
  }

  pub fn set(&mut self, slot_num: u32, value: ParseValue) {
    self.slots[slot_num as usize] = value;
  }

  pub fn get(&self, slot_num: u32) -> &ParseValue {
    &self.slots[slot_num as usize]
  }
}

// `Vec<ParseValue>` needs `ParseValue: Clone`, which it is, but
// `vec![ParseValue::Empty; n]` additionally requires the element be cheaply
// cloneable -- `ParseValue::Empty` never allocates, so this is fine.
