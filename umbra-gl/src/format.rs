//! Texture storage negotiation.
//!
//! OpenGL ES 2.0 drivers disagree wildly on which texture formats can be rendered to. Neither the
//! version string, the extension list nor the format itself reliably predicts whether a
//! framebuffer with such a texture attached will be complete. The only way to know is to try:
//! floating point formats are validated by attaching a scratch texture to a scratch framebuffer
//! and asking the driver.

use std::error;
use std::fmt;

use crate::api::consts;
use crate::api::{FramebufferId, Gl, TextureId};
use crate::version::{Extensions, GlVersion};

/// Settings for a `glTexImage2D` call: internal format, pixel transfer format and component type.
///
/// The transfer format must always match the internal format on OpenGL ES 2.0, so a texture
/// keeps its triple around to re-specify its storage on upload.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct TextureTriple {
  /// Internal (storage) format.
  pub internal_format: i32,
  /// Pixel transfer format.
  pub format: u32,
  /// Component type.
  pub ty: u32,
}

impl TextureTriple {
  /// Create a triple.
  pub const fn new(internal_format: u32, format: u32, ty: u32) -> Self {
    TextureTriple {
      internal_format: internal_format as i32,
      format,
      ty,
    }
  }
}

impl fmt::Display for TextureTriple {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(
      f,
      "(0x{:x}, 0x{:x}, 0x{:x})",
      self.internal_format, self.format, self.ty
    )
  }
}

/// A candidate that failed validation, along with the framebuffer status it yielded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Attempt {
  /// Tried triple.
  pub triple: TextureTriple,
  /// Status returned by `glCheckFramebufferStatus`.
  pub status: u32,
}

impl fmt::Display for Attempt {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}: 0x{:x}", self.triple, self.status)
  }
}

/// Texture format negotiation failure.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FormatError {
  /// No floating point format is renderable. Contains every attempted candidate.
  NoFloatFormat(Vec<Attempt>),
  /// No sRGB format is available.
  NoSrgbFormat,
}

impl fmt::Display for FormatError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      FormatError::NoFloatFormat(attempts) => {
        f.write_str("floating point fbos not supported (attempted [")?;

        for (i, attempt) in attempts.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }

          write!(f, "{}", attempt)?;
        }

        f.write_str("])")
      }

      FormatError::NoSrgbFormat => f.write_str("no sRGB texture formats found"),
    }
  }
}

impl error::Error for FormatError {}

/// Candidate floating point triples, in priority order.
pub(crate) fn float_candidates(version: GlVersion, exts: &Extensions) -> Vec<TextureTriple> {
  let mut triples = Vec::new();

  if version.major >= 3 {
    triples.push(TextureTriple::new(
      consts::R16F,
      consts::RED,
      consts::HALF_FLOAT,
    ));
  }

  if exts.has("GL_OES_texture_half_float") && exts.has("GL_EXT_color_buffer_half_float") {
    // single channel first, then 4 channels
    triples.push(TextureTriple::new(
      consts::LUMINANCE,
      consts::LUMINANCE,
      consts::HALF_FLOAT_OES,
    ));
    triples.push(TextureTriple::new(
      consts::RGBA,
      consts::RGBA,
      consts::HALF_FLOAT_OES,
    ));
  }

  if exts.has("GL_OES_texture_float") || exts.has("GL_EXT_color_buffer_float") {
    triples.push(TextureTriple::new(consts::RGBA, consts::RGBA, consts::FLOAT));
  }

  triples
}

/// Scratch texture and framebuffer used to validate candidates.
///
/// Both objects are deleted and the previously bound framebuffer is restored when the probe is
/// dropped, whatever the outcome of the negotiation.
struct Probe<'a, G>
where
  G: Gl,
{
  ctx: &'a G,
  texture: TextureId,
  framebuffer: FramebufferId,
  previous_framebuffer: FramebufferId,
}

impl<'a, G> Probe<'a, G>
where
  G: Gl,
{
  fn new(ctx: &'a G) -> Self {
    let texture = ctx.create_texture();
    ctx.bind_texture(consts::TEXTURE_2D, texture);
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
    ctx.tex_parameter_i(
      consts::TEXTURE_2D,
      consts::TEXTURE_MAG_FILTER,
      consts::NEAREST as i32,
    );
    ctx.tex_parameter_i(
      consts::TEXTURE_2D,
      consts::TEXTURE_MIN_FILTER,
      consts::NEAREST as i32,
    );

    let framebuffer = ctx.create_framebuffer();
    let previous_framebuffer = FramebufferId(ctx.get_integer(consts::FRAMEBUFFER_BINDING) as u32);
    ctx.bind_framebuffer(consts::FRAMEBUFFER, framebuffer);

    Probe {
      ctx,
      texture,
      framebuffer,
      previous_framebuffer,
    }
  }

  /// Allocate storage with `triple` and return the resulting framebuffer status.
  fn try_triple(&self, triple: TextureTriple, size: i32) -> u32 {
    self.ctx.tex_image_2d(
      consts::TEXTURE_2D,
      0,
      triple.internal_format,
      size,
      size,
      triple.format,
      triple.ty,
      None,
    );
    self.ctx.framebuffer_texture_2d(
      consts::FRAMEBUFFER,
      consts::COLOR_ATTACHMENT0,
      consts::TEXTURE_2D,
      self.texture,
      0,
    );

    self.ctx.check_framebuffer_status(consts::FRAMEBUFFER)
  }
}

impl<'a, G> Drop for Probe<'a, G>
where
  G: Gl,
{
  fn drop(&mut self) {
    self
      .ctx
      .bind_framebuffer(consts::FRAMEBUFFER, self.previous_framebuffer);
    self.ctx.delete_framebuffer(self.framebuffer);
    self.ctx.delete_texture(self.texture);
  }
}

/// Find the first floating point triple the driver can actually render to.
pub(crate) fn float_triple_for<G>(
  ctx: &G,
  version: GlVersion,
  exts: &Extensions,
  probe_size: u32,
) -> Result<TextureTriple, FormatError>
where
  G: Gl,
{
  let candidates = float_candidates(version, exts);
  let probe = Probe::new(ctx);
  let mut attempts = Vec::new();

  for triple in candidates {
    let status = probe.try_triple(triple, probe_size as i32);
    log::debug!("float format candidate {}: status 0x{:x}", triple, status);

    if status == consts::FRAMEBUFFER_COMPLETE {
      return Ok(triple);
    }

    attempts.push(Attempt { triple, status });
  }

  Err(FormatError::NoFloatFormat(attempts))
}

/// sRGB color with linear alpha.
pub(crate) fn srgba_triple_for(
  version: GlVersion,
  exts: &Extensions,
) -> Result<TextureTriple, FormatError> {
  if version.major >= 3 {
    Ok(TextureTriple::new(
      consts::SRGB8_ALPHA8,
      consts::RGBA,
      consts::UNSIGNED_BYTE,
    ))
  } else if exts.has("GL_EXT_sRGB") {
    Ok(TextureTriple::new(
      consts::SRGB_ALPHA_EXT,
      consts::SRGB_ALPHA_EXT,
      consts::UNSIGNED_BYTE,
    ))
  } else {
    Err(FormatError::NoSrgbFormat)
  }
}

/// Single-channel 8-bit textures.
pub(crate) fn alpha_triple_for(version: GlVersion) -> TextureTriple {
  if version.major >= 3 {
    TextureTriple::new(consts::R8, consts::RED, consts::UNSIGNED_BYTE)
  } else {
    // R8 and RED don’t exist on OpenGL ES 2.0
    TextureTriple::new(consts::LUMINANCE, consts::LUMINANCE, consts::UNSIGNED_BYTE)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::mock::{Call, MockGl};

  const R16F: TextureTriple = TextureTriple::new(consts::R16F, consts::RED, consts::HALF_FLOAT);
  const LUMINANCE_HALF: TextureTriple =
    TextureTriple::new(consts::LUMINANCE, consts::LUMINANCE, consts::HALF_FLOAT_OES);
  const RGBA_HALF: TextureTriple =
    TextureTriple::new(consts::RGBA, consts::RGBA, consts::HALF_FLOAT_OES);
  const RGBA_FLOAT: TextureTriple = TextureTriple::new(consts::RGBA, consts::RGBA, consts::FLOAT);

  const ALL_FLOAT_EXTS: &str = "GL_OES_texture_half_float GL_EXT_color_buffer_half_float \
                                GL_OES_texture_float";

  fn as_tuple(t: TextureTriple) -> (i32, u32, u32) {
    (t.internal_format, t.format, t.ty)
  }

  #[test]
  fn candidates_priority_order() {
    let exts = Extensions::parse(ALL_FLOAT_EXTS);

    assert_eq!(
      float_candidates(GlVersion::new(3, 0), &exts),
      vec![R16F, LUMINANCE_HALF, RGBA_HALF, RGBA_FLOAT]
    );
    assert_eq!(
      float_candidates(GlVersion::new(2, 0), &exts),
      vec![LUMINANCE_HALF, RGBA_HALF, RGBA_FLOAT]
    );
  }

  #[test]
  fn half_float_needs_both_extensions() {
    let exts = Extensions::parse("GL_OES_texture_half_float GL_EXT_color_buffer_float");
    assert_eq!(
      float_candidates(GlVersion::new(2, 0), &exts),
      vec![RGBA_FLOAT]
    );
  }

  #[test]
  fn first_renderable_candidate_wins() {
    let gl = MockGl::new("OpenGL ES 3.0", ALL_FLOAT_EXTS);
    gl.set_renderable(&[as_tuple(RGBA_HALF), as_tuple(RGBA_FLOAT)]);
    let exts = Extensions::parse(ALL_FLOAT_EXTS);

    for _ in 0..3 {
      assert_eq!(
        float_triple_for(&gl, GlVersion::new(3, 0), &exts, 256),
        Ok(RGBA_HALF)
      );
    }
  }

  #[test]
  fn no_renderable_candidate_lists_attempts() {
    let gl = MockGl::new("OpenGL ES 2.0", "GL_OES_texture_float");
    gl.set_renderable(&[]);
    let exts = Extensions::parse("GL_OES_texture_float");

    let err = float_triple_for(&gl, GlVersion::new(2, 0), &exts, 256).unwrap_err();
    assert_eq!(
      err,
      FormatError::NoFloatFormat(vec![Attempt {
        triple: RGBA_FLOAT,
        status: consts::FRAMEBUFFER_UNSUPPORTED,
      }])
    );
    assert_eq!(
      err.to_string(),
      "floating point fbos not supported (attempted [(0x1908, 0x1908, 0x1406): 0x8cdd])"
    );
  }

  #[test]
  fn no_candidate_at_all() {
    let gl = MockGl::new("OpenGL ES 2.0", "");
    let err = float_triple_for(&gl, GlVersion::new(2, 0), &Extensions::default(), 256);
    assert_eq!(err, Err(FormatError::NoFloatFormat(Vec::new())));
  }

  #[test]
  fn probe_releases_scratch_objects() {
    let gl = MockGl::new("OpenGL ES 3.0", "");
    gl.set_bound_framebuffer(42);
    gl.set_renderable(&[]);

    let _ = float_triple_for(&gl, GlVersion::new(3, 0), &Extensions::default(), 16);

    let calls = gl.calls();
    let texture = calls.iter().find_map(|c| match c {
      Call::CreateTexture(t) => Some(*t),
      _ => None,
    });
    let framebuffer = calls.iter().find_map(|c| match c {
      Call::CreateFramebuffer(f) => Some(*f),
      _ => None,
    });

    let texture = texture.unwrap();
    let framebuffer = framebuffer.unwrap();
    assert!(calls.contains(&Call::DeleteTexture(texture)));
    assert!(calls.contains(&Call::DeleteFramebuffer(framebuffer)));
    assert_eq!(
      calls
        .iter()
        .filter(|c| matches!(c, Call::BindFramebuffer(..)))
        .last(),
      Some(&Call::BindFramebuffer(FramebufferId(42)))
    );
    assert!(calls.iter().any(|c| matches!(
      c,
      Call::TexImage2D {
        width: 16,
        height: 16,
        pixels: None,
        ..
      }
    )));
  }

  #[test]
  fn srgb_selection() {
    let none = Extensions::default();
    let srgb = Extensions::parse("GL_EXT_sRGB");

    assert_eq!(
      srgba_triple_for(GlVersion::new(3, 0), &none),
      Ok(TextureTriple::new(
        consts::SRGB8_ALPHA8,
        consts::RGBA,
        consts::UNSIGNED_BYTE
      ))
    );
    assert_eq!(
      srgba_triple_for(GlVersion::new(2, 0), &srgb),
      Ok(TextureTriple::new(
        consts::SRGB_ALPHA_EXT,
        consts::SRGB_ALPHA_EXT,
        consts::UNSIGNED_BYTE
      ))
    );
    assert_eq!(
      srgba_triple_for(GlVersion::new(2, 0), &none),
      Err(FormatError::NoSrgbFormat)
    );
  }

  #[test]
  fn alpha_selection() {
    assert_eq!(
      alpha_triple_for(GlVersion::new(3, 1)),
      TextureTriple::new(consts::R8, consts::RED, consts::UNSIGNED_BYTE)
    );
    assert_eq!(
      alpha_triple_for(GlVersion::new(2, 0)),
      TextureTriple::new(consts::LUMINANCE, consts::LUMINANCE, consts::UNSIGNED_BYTE)
    );
  }
}
