//! Buffer kinds.

/// What a buffer is going to be used for.
///
/// The kind is fixed at creation: a backend might pick a completely different storage depending
/// on it (for instance, uniform buffers can be emulated in host memory).
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum BufferType {
  /// Index buffer, holding 16-bit indices.
  Indices,
  /// Vertex buffer.
  Vertices,
  /// Uniform buffer, feeding a program’s uniform block.
  Uniforms,
}
