//! Primitive modes.

/// Primitive mode used when submitting vertices.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum DrawMode {
  /// Each vertex after the first two forms a triangle with the two preceding ones.
  TriangleStrip,
  /// Every three vertices form an independent triangle.
  Triangles,
}
