use std::any::Any;

use super::{grammar::Grammar, parse_value::SlotRecord};

/// Returned by a callback to request that `parse` either keep going or stop
/// immediately with `CANCELLED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackSignal {
  Continue,
  Cancel,
}

/// What a completion callback is allowed to see: the grammar (to resolve
/// string ids) and the slot record of the RTN that just completed. This is
/// narrower than "the whole parse state" -- the spec requires that callbacks
/// "must not otherwise mutate parse state" beyond their own user data, and a
/// read-only view enforces that statically instead of by convention.
pub struct CompletionView<'a> {
  pub grammar: &'a Grammar,
  pub slots:   &'a SlotRecord,
}

/// A registered completion callback. Boxed as `FnMut` rather than `Fn` since
/// callbacks commonly accumulate into their user data.
pub type Callback = Box<dyn FnMut(&CompletionView, &mut dyn Any) -> CallbackSignal>;

struct CallbackEntry {
  rtn_name: String,
  callback: Callback,
  user_data: Box<dyn Any>,
}

/// An ordered list of completion callbacks keyed by RTN name. A linear scan
/// per completion is acceptable given the small registration counts typical
/// of a grammar's semantic actions -- this mirrors the simple linear
/// registries this codebase uses elsewhere (e.g. its journal/report
/// registries) over a premature hash index.
#[derive(Default)]
pub struct CallbackRegistry {
  entries: Vec<CallbackEntry>,
}

impl CallbackRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(
    &mut self,
    rtn_name: impl Into<String>,
    callback: Callback,
    user_data: Box<dyn Any>,
  ) {
    self.entries.push(CallbackEntry { rtn_name: rtn_name.into(), callback, user_data });
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Fires every callback registered for `rtn_name`, in registration order.
  /// Stops (but still reports) the first `Cancel`.
  pub fn fire(&mut self, rtn_name: &str, view: &CompletionView) -> CallbackSignal {
    let mut signal = CallbackSignal::Continue;
    for entry in self.entries.iter_mut().filter(|e| e.rtn_name == rtn_name) {
      if (entry.callback)(view, entry.user_data.as_mut()) == CallbackSignal::Cancel {
        signal = CallbackSignal::Cancel;
        break;
      }
    }
    signal
  }
}

impl std::fmt::Debug for CallbackRegistry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CallbackRegistry").field("len", &self.entries.len()).finish()
  }
}
