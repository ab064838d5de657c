//! GPU buffers.
//!
//! Vertex and index buffers are backed by native buffer objects. Uniform buffers don’t exist on
//! OpenGL ES 2.0, so they are emulated: their content lives in host memory and is pushed to the
//! individual uniforms of a program right before it draws (see [`Program`]).
//!
//! [`Program`]: crate::shader::Program

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use umbra::BufferType;

use crate::api::consts;
use crate::api::{BufferId, Gl};
use crate::state::GLState;
use crate::violation::InvariantViolation;

#[derive(Debug)]
pub(crate) enum Storage {
  /// Native buffer object, bound to the given target.
  Native { handle: BufferId, target: u32 },
  /// Host memory shadow of an emulated uniform buffer.
  Emulated(RefCell<Vec<u8>>),
}

#[derive(Debug)]
pub(crate) struct BufferRepr {
  ty: BufferType,
  storage: Storage,
  size: usize,
  immutable: Cell<bool>,
  version: Cell<u64>,
}

impl BufferRepr {
  pub(crate) fn ty(&self) -> BufferType {
    self.ty
  }

  pub(crate) fn size(&self) -> usize {
    self.size
  }

  pub(crate) fn version(&self) -> u64 {
    self.version.get()
  }

  /// Content of an emulated buffer.
  pub(crate) fn host_bytes(&self) -> Option<Ref<'_, Vec<u8>>> {
    match self.storage {
      Storage::Emulated(ref bytes) => Some(bytes.borrow()),
      Storage::Native { .. } => None,
    }
  }

  pub(crate) fn handle(&self) -> BufferId {
    match self.storage {
      Storage::Native { handle, .. } => handle,
      Storage::Emulated(_) => BufferId::NONE,
    }
  }
}

/// A buffer of bytes, typed by what it’ll be used for.
#[derive(Debug)]
pub struct Buffer<G>
where
  G: Gl,
{
  pub(crate) repr: Rc<BufferRepr>,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for Buffer<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    if let Storage::Native { handle, .. } = self.repr.storage {
      let mut state = self.state.borrow_mut();

      state.forget_buffer(handle);
      state.ctx().delete_buffer(handle);
    }
  }
}

impl<G> Buffer<G>
where
  G: Gl,
{
  pub(crate) fn new(
    state: &Rc<RefCell<GLState<G>>>,
    ty: BufferType,
    size: usize,
  ) -> Result<Self, InvariantViolation> {
    let storage = match ty {
      BufferType::Vertices => Storage::Native {
        handle: state.borrow().ctx().create_buffer(),
        target: consts::ARRAY_BUFFER,
      },

      BufferType::Indices => Storage::Native {
        handle: state.borrow().ctx().create_buffer(),
        target: consts::ELEMENT_ARRAY_BUFFER,
      },

      BufferType::Uniforms => Storage::Emulated(RefCell::new(vec![0; size])),

      _ => return Err(InvariantViolation::UnsupportedBufferType(ty)),
    };

    let repr = BufferRepr {
      ty,
      storage,
      size,
      immutable: Cell::new(false),
      version: Cell::new(0),
    };

    Ok(Buffer {
      repr: Rc::new(repr),
      state: state.clone(),
    })
  }

  /// Create a buffer holding `data` forever.
  pub(crate) fn new_immutable(
    state: &Rc<RefCell<GLState<G>>>,
    ty: BufferType,
    data: &[u8],
  ) -> Result<Self, InvariantViolation> {
    let buffer = Self::new(state, ty, data.len())?;
    buffer.try_upload(data)?;
    buffer.repr.immutable.set(true);

    Ok(buffer)
  }

  /// What the buffer is used for.
  pub fn ty(&self) -> BufferType {
    self.repr.ty
  }

  /// Size in bytes the buffer was created with.
  pub fn size(&self) -> usize {
    self.repr.size
  }

  /// Whether the buffer was created with immutable content.
  pub fn is_immutable(&self) -> bool {
    self.repr.immutable.get()
  }

  /// Number of successful uploads so far.
  pub fn version(&self) -> u64 {
    self.repr.version()
  }

  /// Replace the content of the buffer, starting at its first byte.
  ///
  /// # Panics
  ///
  /// Panics if the buffer is immutable or if `data` is larger than the buffer.
  pub fn upload(&self, data: &[u8]) {
    self.try_upload(data).unwrap_or_else(|v| v.raise())
  }

  /// Replace the content of the buffer, starting at its first byte.
  ///
  /// The buffer is left untouched when the upload is rejected.
  pub fn try_upload(&self, data: &[u8]) -> Result<(), InvariantViolation> {
    let repr = &self.repr;

    if repr.immutable.get() {
      return Err(InvariantViolation::ImmutableBuffer);
    }

    if data.len() > repr.size {
      return Err(InvariantViolation::BufferOverflow {
        len: data.len(),
        capacity: repr.size,
      });
    }

    repr.version.set(repr.version.get() + 1);

    match repr.storage {
      Storage::Native { handle, target } => {
        let state = self.state.borrow();
        state.ctx().bind_buffer(target, handle);
        state.ctx().buffer_data(target, data, consts::STATIC_DRAW);
      }

      Storage::Emulated(ref bytes) => {
        bytes.borrow_mut()[..data.len()].copy_from_slice(data);
      }
    }

    Ok(())
  }

  /// Use this buffer as the source of vertex attributes for the next draws.
  ///
  /// `stride` and `offset` are in bytes. Nothing is sent down until a draw happens.
  ///
  /// # Panics
  ///
  /// Panics if this is not a vertex buffer.
  pub fn bind_vertex(&self, stride: usize, offset: usize) {
    self.expect_ty(BufferType::Vertices);
    self
      .state
      .borrow_mut()
      .bind_vertex_buffer(self.repr.handle(), stride, offset);
  }

  /// Use this buffer as the source of indices for the next indexed draws.
  ///
  /// # Panics
  ///
  /// Panics if this is not an index buffer.
  pub fn bind_index(&self) {
    self.expect_ty(BufferType::Indices);
    self
      .state
      .borrow()
      .ctx()
      .bind_buffer(consts::ELEMENT_ARRAY_BUFFER, self.repr.handle());
  }

  /// Destroy the buffer.
  pub fn release(self) {}

  fn expect_ty(&self, expected: BufferType) {
    if self.repr.ty != expected {
      InvariantViolation::WrongBufferType {
        expected,
        found: self.repr.ty,
      }
      .raise()
    }
  }
}
