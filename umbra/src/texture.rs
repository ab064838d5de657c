//! Texture formats and sampling filters.

/// Storage class of a texture.
///
/// Backends resolve each class to the best native storage format they can render to, so the same
/// class might end up with different native formats on different drivers.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum TextureFormat {
  /// Floating point texture, renderable. Might be single-channel.
  Float,
  /// 8-bit sRGB color with linear alpha.
  SRGB,
  /// Single-channel 8-bit texture, typically used as a coverage or alpha mask.
  Alpha,
}

/// Filter used when sampling a texture.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum TextureFilter {
  /// Nearest texel.
  Nearest,
  /// Linear interpolation of the neighboring texels.
  Linear,
}
