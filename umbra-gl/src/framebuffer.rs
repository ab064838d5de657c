//! Framebuffers.

use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use crate::api::consts;
use crate::api::{FramebufferId, Gl};
use crate::state::GLState;
use crate::texture::Texture;

/// Framebuffer error.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FramebufferError {
  /// The framebuffer can’t be rendered to.
  Incomplete {
    /// Status returned by `glCheckFramebufferStatus`.
    status: u32,
    /// Pending native error code.
    error: u32,
  },
}

impl fmt::Display for FramebufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      FramebufferError::Incomplete { status, error } => write!(
        f,
        "incomplete framebuffer, status = 0x{:x}, err = {}",
        status, error
      ),
    }
  }
}

impl error::Error for FramebufferError {}

/// A framebuffer, either created by the backend or the one the context came with.
#[derive(Debug)]
pub struct Framebuffer<G>
where
  G: Gl,
{
  handle: FramebufferId,
  // the default framebuffer belongs to the windowing system
  owned: bool,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for Framebuffer<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    if self.owned {
      self.state.borrow().ctx().delete_framebuffer(self.handle);
    }
  }
}

impl<G> Framebuffer<G>
where
  G: Gl,
{
  pub(crate) fn new(state: &Rc<RefCell<GLState<G>>>) -> Self {
    let handle = state.borrow().ctx().create_framebuffer();

    Framebuffer {
      handle,
      owned: true,
      state: state.clone(),
    }
  }

  pub(crate) fn new_default(state: &Rc<RefCell<GLState<G>>>, handle: FramebufferId) -> Self {
    Framebuffer {
      handle,
      owned: false,
      state: state.clone(),
    }
  }

  /// Native handle.
  pub fn handle(&self) -> FramebufferId {
    self.handle
  }

  /// Render into this framebuffer.
  pub fn bind(&self) {
    self
      .state
      .borrow()
      .ctx()
      .bind_framebuffer(consts::FRAMEBUFFER, self.handle);
  }

  /// Bind the framebuffer and attach `texture` as its color attachment.
  pub fn bind_texture(&self, texture: &Texture<G>) {
    self.bind();
    self.state.borrow().ctx().framebuffer_texture_2d(
      consts::FRAMEBUFFER,
      consts::COLOR_ATTACHMENT0,
      consts::TEXTURE_2D,
      texture.handle,
      0,
    );
  }

  /// Check whether the currently bound framebuffer can be rendered to.
  pub fn is_complete(&self) -> Result<(), FramebufferError> {
    let state = self.state.borrow();
    let status = state.ctx().check_framebuffer_status(consts::FRAMEBUFFER);

    if status == consts::FRAMEBUFFER_COMPLETE {
      Ok(())
    } else {
      Err(FramebufferError::Incomplete {
        status,
        error: state.ctx().get_error(),
      })
    }
  }

  /// Bind the framebuffer and discard the content of its color attachment.
  pub fn invalidate(&self) {
    self.bind();
    self
      .state
      .borrow()
      .ctx()
      .invalidate_framebuffer(consts::FRAMEBUFFER, consts::COLOR_ATTACHMENT0);
  }

  /// Destroy the framebuffer. Releasing the default framebuffer does nothing.
  pub fn release(self) {}
}
