//! Contract violations between an encoder and the backend.
//!
//! Those aren’t errors a caller is expected to recover from: they mean the encoder asked for
//! something the backend was never able to do (drawing without an input layout, uploading into
//! an immutable buffer, …). Operations that can break a contract panic with the matching
//! [`InvariantViolation`] message; some of them also have a `try_` form returning it instead.

use std::error;
use std::fmt;
use umbra::{BlendFactor, BufferType, DataType, DepthFunc, DrawMode, TextureFilter, TextureFormat};

/// A broken contract between the caller and the backend.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvariantViolation {
  /// Upload into a buffer created with initial, immutable content.
  ImmutableBuffer,
  /// Upload of more bytes than the buffer was created with.
  BufferOverflow {
    /// Length of the payload.
    len: usize,
    /// Size of the buffer.
    capacity: usize,
  },
  /// A buffer of the wrong kind was used.
  WrongBufferType {
    /// Kind the operation requires.
    expected: BufferType,
    /// Kind of the buffer.
    found: BufferType,
  },
  /// A uniform buffer is smaller than the uniform block it feeds.
  UniformBufferTooSmall {
    /// Size of the buffer.
    got: usize,
    /// Size of the uniform block.
    need: usize,
  },
  /// Draw without a current input layout.
  NoInputLayout,
  /// Draw without a current vertex buffer.
  NoVertexBuffer,
  /// Texture unit beyond the shadowed ones.
  TextureUnitOutOfRange {
    /// Requested unit.
    unit: usize,
    /// Number of shadowed units.
    units: usize,
  },
  /// Pixel upload into the nil texture.
  NilTexture,
  /// Pixel data whose length doesn’t match a tightly packed RGBA image.
  UnsupportedStride {
    /// Length of the pixel data.
    len: usize,
    /// Expected length.
    expected: usize,
  },
  /// Uniform lying (partially) outside its uniform buffer.
  UniformOutOfBounds {
    /// Offset of the uniform.
    offset: usize,
    /// Size of the uniform in bytes.
    size: usize,
    /// Size of the uniform buffer.
    len: usize,
  },
  /// Draw range the native API can’t address.
  DrawRangeOverflow {
    /// First vertex or index.
    off: usize,
    /// Number of vertices or indices.
    count: usize,
  },
  /// Texture format the backend can’t express.
  UnsupportedTextureFormat(TextureFormat),
  /// Texture filter the backend can’t express.
  UnsupportedTextureFilter(TextureFilter),
  /// Buffer type the backend can’t express.
  UnsupportedBufferType(BufferType),
  /// Blend factor the backend can’t express.
  UnsupportedBlendFactor(BlendFactor),
  /// Depth function the backend can’t express.
  UnsupportedDepthFunc(DepthFunc),
  /// Primitive mode the backend can’t express.
  UnsupportedDrawMode(DrawMode),
  /// Vertex attribute type the backend can’t express.
  UnsupportedDataType(DataType),
}

impl InvariantViolation {
  /// Log the violation and abort the current operation by panicking.
  #[track_caller]
  pub fn raise(self) -> ! {
    log::error!("invariant violation: {}", self);
    panic!("{}", self)
  }
}

impl fmt::Display for InvariantViolation {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      InvariantViolation::ImmutableBuffer => f.write_str("immutable buffer"),
      InvariantViolation::BufferOverflow { len, capacity } => write!(
        f,
        "buffer size overflow (len = {}, capacity = {})",
        len, capacity
      ),
      InvariantViolation::WrongBufferType { expected, found } => {
        write!(f, "not a {:?} buffer (found {:?})", expected, found)
      }
      InvariantViolation::UniformBufferTooSmall { got, need } => {
        write!(f, "uniform buffer too small, got {} need {}", got, need)
      }
      InvariantViolation::NoInputLayout => f.write_str("no input layout is current"),
      InvariantViolation::NoVertexBuffer => f.write_str("no vertex buffer is bound"),
      InvariantViolation::TextureUnitOutOfRange { unit, units } => write!(
        f,
        "texture unit {} out of range ({} units available)",
        unit, units
      ),
      InvariantViolation::NilTexture => f.write_str("cannot upload into the nil texture"),
      InvariantViolation::UnsupportedStride { len, expected } => write!(
        f,
        "unsupported stride (got {} bytes, expected {})",
        len, expected
      ),
      InvariantViolation::UniformOutOfBounds { offset, size, len } => write!(
        f,
        "uniform at offset {} ({} bytes) overflows uniform buffer of {} bytes",
        offset, size, len
      ),
      InvariantViolation::DrawRangeOverflow { off, count } => write!(
        f,
        "draw range out of reach (offset {}, count {})",
        off, count
      ),
      InvariantViolation::UnsupportedTextureFormat(t) => {
        write!(f, "unsupported texture format: {:?}", t)
      }
      InvariantViolation::UnsupportedTextureFilter(t) => {
        write!(f, "unsupported texture filter: {:?}", t)
      }
      InvariantViolation::UnsupportedBufferType(t) => write!(f, "unsupported buffer type: {:?}", t),
      InvariantViolation::UnsupportedBlendFactor(t) => {
        write!(f, "unsupported blend factor: {:?}", t)
      }
      InvariantViolation::UnsupportedDepthFunc(t) => write!(f, "unsupported depth func: {:?}", t),
      InvariantViolation::UnsupportedDrawMode(t) => write!(f, "unsupported draw mode: {:?}", t),
      InvariantViolation::UnsupportedDataType(t) => write!(f, "unsupported data type: {:?}", t),
    }
  }
}

impl error::Error for InvariantViolation {}
