//! Depth test related features.

/// Depth comparison to perform while depth testing. `a` is the incoming fragment’s depth and `b`
/// is the fragment’s depth that is already stored.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum DepthFunc {
  /// Depth test succeeds if `a > b`.
  Greater,
  /// Depth test succeeds if `a >= b`.
  GreaterOrEqual,
}
