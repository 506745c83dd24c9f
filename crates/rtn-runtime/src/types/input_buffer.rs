/// A sliding window over the underlying byte source. `base_offset` is the
/// absolute offset of `data[0]`; bytes before it have already been consumed
/// and discarded. Growth is geometric (matching this codebase's dynamic
/// array convention) so repeated small `feed` calls stay amortised O(1).
#[derive(Debug, Default)]
pub struct InputBuffer {
  data:        Vec<u8>,
  base_offset: usize,
  eof:         bool,
}

impl InputBuffer {
  pub fn new(initial_capacity: usize) -> Self {
    Self { data: Vec::with_capacity(initial_capacity), base_offset: 0, eof: false }
  }

  /// Appends newly-received bytes to the window and updates the EOF flag.
  /// `eof` latches true: once the source has signalled end of input it
  /// cannot un-signal it.
  pub fn feed(&mut self, buf: &[u8], eof: bool) {
    if self.data.capacity() < self.data.len() + buf.len() {
      self.data.reserve(buf.len().max(self.data.capacity()));
    }
    self.data.extend_from_slice(buf);
    self.eof = self.eof || eof;
  }

  pub fn is_eof(&self) -> bool {
    self.eof
  }

  /// Absolute offset one past the last byte currently available.
  pub fn end_offset(&self) -> usize {
    self.base_offset + self.data.len()
  }

  pub fn base_offset(&self) -> usize {
    self.base_offset
  }

  /// The byte at absolute offset `offset`, or `None` if it has not arrived
  /// yet (or has already been discarded -- callers never ask for that).
  pub fn byte_at(&self, offset: usize) -> Option<u8> {
    offset.checked_sub(self.base_offset).and_then(|rel| self.data.get(rel)).copied()
  }

  pub fn has_byte_at(&self, offset: usize) -> bool {
    self.byte_at(offset).is_some()
  }

  /// Drops every byte strictly before `offset` from the window. The caller
  /// (the [crate::engine::driver]) guarantees no in-flight frame still
  /// references a discarded byte.
  pub fn discard_before(&mut self, offset: usize) {
    if offset <= self.base_offset {
      return;
    }
    let drop_count = (offset - self.base_offset).min(self.data.len());
    self.data.drain(0..drop_count);
    self.base_offset += drop_count;
  }

  pub fn slice(&self, start: usize, end: usize) -> &[u8] {
    &self.data[start - self.base_offset..end - self.base_offset]
  }
}
