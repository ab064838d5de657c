//! 2D textures.

use std::cell::RefCell;
use std::rc::Rc;

use umbra::TextureFilter;

use crate::api::consts;
use crate::api::{Gl, TextureId};
use crate::format::TextureTriple;
use crate::state::GLState;
use crate::violation::InvariantViolation;

/// A 2D texture, clamped to its edges.
///
/// The nil texture has no native object at all. Binding it unbinds whatever texture was bound to
/// the unit.
#[derive(Debug)]
pub struct Texture<G>
where
  G: Gl,
{
  pub(crate) handle: TextureId,
  // storage settings; none for the nil texture
  triple: Option<TextureTriple>,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for Texture<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    if self.handle.is_some() {
      let mut state = self.state.borrow_mut();

      state.forget_texture(self.handle);
      state.ctx().delete_texture(self.handle);
    }
  }
}

impl<G> Texture<G>
where
  G: Gl,
{
  pub(crate) fn new(
    state: &Rc<RefCell<GLState<G>>>,
    triple: TextureTriple,
    width: u32,
    height: u32,
    min_filter: TextureFilter,
    mag_filter: TextureFilter,
  ) -> Result<Self, InvariantViolation> {
    let min_filter = filter_to_glenum(min_filter)?;
    let mag_filter = filter_to_glenum(mag_filter)?;

    let mut st = state.borrow_mut();
    let handle = st.ctx().create_texture();
    st.bind_texture_for_update(handle);

    let ctx = st.ctx();
    ctx.tex_parameter_i(consts::TEXTURE_2D, consts::TEXTURE_MAG_FILTER, mag_filter);
    ctx.tex_parameter_i(consts::TEXTURE_2D, consts::TEXTURE_MIN_FILTER, min_filter);
    ctx.tex_parameter_i(
      consts::TEXTURE_2D,
      consts::TEXTURE_WRAP_S,
      consts::CLAMP_TO_EDGE as i32,
    );
    ctx.tex_parameter_i(
      consts::TEXTURE_2D,
      consts::TEXTURE_WRAP_T,
      consts::CLAMP_TO_EDGE as i32,
    );
    ctx.tex_image_2d(
      consts::TEXTURE_2D,
      0,
      triple.internal_format,
      width as i32,
      height as i32,
      triple.format,
      triple.ty,
      None,
    );

    Ok(Texture {
      handle,
      triple: Some(triple),
      state: state.clone(),
    })
  }

  pub(crate) fn nil(state: &Rc<RefCell<GLState<G>>>) -> Self {
    Texture {
      handle: TextureId::NONE,
      triple: None,
      state: state.clone(),
    }
  }

  /// Whether this is the nil texture.
  pub fn is_nil(&self) -> bool {
    !self.handle.is_some()
  }

  /// Native storage settings; `None` for the nil texture.
  pub fn triple(&self) -> Option<TextureTriple> {
    self.triple
  }

  /// Bind the texture to a texture unit.
  ///
  /// # Panics
  ///
  /// Panics if `unit` is beyond the number of texture units the backend was configured with.
  pub fn bind(&self, unit: usize) {
    self
      .state
      .borrow_mut()
      .bind_texture(unit, self.handle)
      .unwrap_or_else(|v| v.raise())
  }

  /// Replace the whole texture with tightly packed RGBA pixels, resizing it to `width` × `height`.
  ///
  /// # Panics
  ///
  /// Panics on the nil texture or if `pixels` is not exactly `width * height * 4` bytes long.
  pub fn upload(&self, width: u32, height: u32, pixels: &[u8]) {
    self
      .try_upload(width, height, pixels)
      .unwrap_or_else(|v| v.raise())
  }

  /// Fallible version of [`Texture::upload`].
  pub fn try_upload(
    &self,
    width: u32,
    height: u32,
    pixels: &[u8],
  ) -> Result<(), InvariantViolation> {
    let triple = self.triple.ok_or(InvariantViolation::NilTexture)?;
    let expected = width as usize * height as usize * 4;

    if pixels.len() != expected {
      return Err(InvariantViolation::UnsupportedStride {
        len: pixels.len(),
        expected,
      });
    }

    let mut state = self.state.borrow_mut();
    state.bind_texture_for_update(self.handle);
    state.ctx().tex_image_2d(
      consts::TEXTURE_2D,
      0,
      triple.internal_format,
      width as i32,
      height as i32,
      triple.format,
      triple.ty,
      Some(pixels),
    );

    Ok(())
  }

  /// Destroy the texture.
  pub fn release(self) {}
}

fn filter_to_glenum(filter: TextureFilter) -> Result<i32, InvariantViolation> {
  match filter {
    TextureFilter::Nearest => Ok(consts::NEAREST as i32),
    TextureFilter::Linear => Ok(consts::LINEAR as i32),
    _ => Err(InvariantViolation::UnsupportedTextureFilter(filter)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::mock::{Call, MockGl};

  const RGBA8: TextureTriple =
    TextureTriple::new(consts::RGBA, consts::RGBA, consts::UNSIGNED_BYTE);

  fn state() -> (MockGl, Rc<RefCell<GLState<MockGl>>>) {
    let gl = MockGl::gles3();
    (gl.clone(), Rc::new(RefCell::new(GLState::new(gl, 2))))
  }

  #[test]
  fn creation_specifies_storage() {
    let (gl, state) = state();

    let texture = Texture::new(
      &state,
      RGBA8,
      4,
      2,
      TextureFilter::Linear,
      TextureFilter::Nearest,
    )
    .unwrap();

    assert_eq!(
      gl.calls(),
      vec![
        Call::CreateTexture(texture.handle),
        Call::ActiveTexture(consts::TEXTURE0),
        Call::BindTexture(consts::TEXTURE_2D, texture.handle),
        Call::TexParameter(
          consts::TEXTURE_2D,
          consts::TEXTURE_MAG_FILTER,
          consts::NEAREST as i32
        ),
        Call::TexParameter(
          consts::TEXTURE_2D,
          consts::TEXTURE_MIN_FILTER,
          consts::LINEAR as i32
        ),
        Call::TexParameter(
          consts::TEXTURE_2D,
          consts::TEXTURE_WRAP_S,
          consts::CLAMP_TO_EDGE as i32
        ),
        Call::TexParameter(
          consts::TEXTURE_2D,
          consts::TEXTURE_WRAP_T,
          consts::CLAMP_TO_EDGE as i32
        ),
        Call::TexImage2D {
          internal_format: consts::RGBA as i32,
          width: 4,
          height: 2,
          format: consts::RGBA,
          ty: consts::UNSIGNED_BYTE,
          pixels: None,
        },
      ]
    );
  }

  #[test]
  fn upload_uses_unit_zero() {
    let (gl, state) = state();
    let texture = Texture::new(
      &state,
      RGBA8,
      1,
      1,
      TextureFilter::Nearest,
      TextureFilter::Nearest,
    )
    .unwrap();
    let other = Texture::new(
      &state,
      RGBA8,
      1,
      1,
      TextureFilter::Nearest,
      TextureFilter::Nearest,
    )
    .unwrap();
    other.bind(1);
    gl.clear_calls();

    texture.upload(1, 2, &[0xff; 8]);

    assert_eq!(
      gl.calls(),
      vec![
        Call::ActiveTexture(consts::TEXTURE0),
        Call::BindTexture(consts::TEXTURE_2D, texture.handle),
        Call::TexImage2D {
          internal_format: consts::RGBA as i32,
          width: 1,
          height: 2,
          format: consts::RGBA,
          ty: consts::UNSIGNED_BYTE,
          pixels: Some(vec![0xff; 8]),
        },
      ]
    );
  }

  #[test]
  fn upload_requires_packed_rgba() {
    let (gl, state) = state();
    let texture = Texture::new(
      &state,
      RGBA8,
      2,
      2,
      TextureFilter::Nearest,
      TextureFilter::Nearest,
    )
    .unwrap();
    gl.clear_calls();

    assert_eq!(
      texture.try_upload(2, 2, &[0; 12]),
      Err(InvariantViolation::UnsupportedStride {
        len: 12,
        expected: 16,
      })
    );
    assert!(gl.calls().is_empty());
  }

  #[test]
  fn nil_texture() {
    let (gl, state) = state();
    let nil = Texture::nil(&state);

    assert!(nil.is_nil());
    assert_eq!(nil.triple(), None);
    assert_eq!(nil.try_upload(0, 0, &[]), Err(InvariantViolation::NilTexture));

    nil.bind(0);
    nil.release();
    assert_eq!(
      gl.calls(),
      vec![
        Call::ActiveTexture(consts::TEXTURE0),
        Call::BindTexture(consts::TEXTURE_2D, TextureId::NONE),
      ]
    );
  }

  #[test]
  fn released_texture_is_forgotten() {
    let (gl, state) = state();
    let texture = Texture::new(
      &state,
      RGBA8,
      1,
      1,
      TextureFilter::Nearest,
      TextureFilter::Nearest,
    )
    .unwrap();
    let handle = texture.handle;

    texture.bind(0);
    texture.release();
    gl.clear_calls();

    // whatever gets that handle next must really be bound
    state.borrow_mut().bind_texture(0, handle).unwrap();
    assert_eq!(gl.calls(), vec![Call::BindTexture(consts::TEXTURE_2D, handle)]);
  }

  #[test]
  #[should_panic(expected = "texture unit")]
  fn unit_out_of_range() {
    let (_, state) = state();
    Texture::nil(&state).bind(2);
  }
}
