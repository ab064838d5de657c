//! Framebuffer attachments.

use std::ops::BitOr;

/// Set of framebuffer attachments to clear.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct BufferAttachments(u32);

impl BufferAttachments {
  /// The color attachment.
  pub const COLOR: BufferAttachments = BufferAttachments(1 << 0);

  /// The depth attachment.
  pub const DEPTH: BufferAttachments = BufferAttachments(1 << 1);

  /// Whether all the attachments in `other` are in `self`.
  pub fn contains(self, other: BufferAttachments) -> bool {
    self.0 & other.0 == other.0
  }
}

impl BitOr for BufferAttachments {
  type Output = BufferAttachments;

  fn bitor(self, rhs: BufferAttachments) -> Self::Output {
    BufferAttachments(self.0 | rhs.0)
  }
}
