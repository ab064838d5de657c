//! Blending factors.
//!
//! Given two pixels *src* (source) and *dst* (destination), each one is multiplied by a
//! blending factor before being added together. *src* is the pixel being computed, and *dst* is
//! the pixel already stored in the framebuffer.

/// Blending factors. Pixel data are multiplied by these factors to achieve several effects.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum BlendFactor {
  /// `1 * color = color`
  One,
  /// `(1 - srcA) * color`
  OneMinusSrcAlpha,
  /// `0 * color = 0`
  Zero,
  /// `dst * color`
  DstColor,
}
