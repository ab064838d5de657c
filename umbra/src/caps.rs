//! Backend capabilities.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Optional features a backend might support.
///
/// This is a small bit set; combine flags with `|`.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Features(u32);

impl Features {
  /// No optional feature.
  pub const NONE: Features = Features(0);

  /// GPU timer queries are available.
  pub const TIMERS: Features = Features(1 << 0);

  /// Whether all the flags in `other` are set in `self`.
  pub fn contains(self, other: Features) -> bool {
    self.0 & other.0 == other.0
  }

  /// Whether no flag is set.
  pub fn is_empty(self) -> bool {
    self.0 == 0
  }
}

impl BitOr for Features {
  type Output = Features;

  fn bitor(self, rhs: Features) -> Self::Output {
    Features(self.0 | rhs.0)
  }
}

impl BitOrAssign for Features {
  fn bitor_assign(&mut self, rhs: Features) {
    self.0 |= rhs.0;
  }
}

impl fmt::Debug for Features {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    let mut set = f.debug_set();

    if self.contains(Features::TIMERS) {
      set.entry(&"TIMERS");
    }

    set.finish()
  }
}

/// Capabilities of a backend, as reported once it’s been created.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Caps {
  /// Optional features.
  pub features: Features,
  /// Maximum width and height of a texture, in texels.
  pub max_texture_size: usize,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn features_combine() {
    let mut feats = Features::NONE;
    assert!(feats.is_empty());
    assert!(!feats.contains(Features::TIMERS));

    feats |= Features::TIMERS;
    assert!(feats.contains(Features::TIMERS));
    assert_eq!(Features::NONE | Features::TIMERS, feats);
  }

  #[test]
  fn features_debug() {
    assert_eq!(format!("{:?}", Features::TIMERS), "{\"TIMERS\"}");
    assert_eq!(format!("{:?}", Features::NONE), "{}");
  }
}
