//! The backend, entry point of the crate.

use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use umbra::{
  BlendFactor, BufferAttachments, BufferType, Caps, DepthFunc, DrawMode, Features, InputDesc,
  ShaderSources, TextureFilter, TextureFormat,
};

use crate::api::consts;
use crate::api::{FramebufferId, Gl};
use crate::buffer::Buffer;
use crate::format::{self, FormatError, TextureTriple};
use crate::framebuffer::Framebuffer;
use crate::query::Timer;
use crate::shader::{Program, ProgramError};
use crate::state::GLState;
use crate::texture::Texture;
use crate::version::{Extensions, GlVersion, VersionError};
use crate::vertex::{InputLayout, InputLayoutError};
use crate::violation::InvariantViolation;

/// Backend options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BackendOpt {
  probe_size: u32,
  texture_units: usize,
}

impl Default for BackendOpt {
  /// Defaults:
  ///
  /// - `probe_size` set to `256`.
  /// - `texture_units` set to `2`.
  fn default() -> Self {
    BackendOpt {
      probe_size: 256,
      texture_units: 2,
    }
  }
}

impl BackendOpt {
  /// Edge size, in texels, of the scratch texture used to validate floating point formats.
  #[inline]
  pub fn set_probe_size(self, probe_size: u32) -> Self {
    BackendOpt { probe_size, ..self }
  }

  /// Get the probe size.
  #[inline]
  pub fn probe_size(&self) -> u32 {
    self.probe_size
  }

  /// Number of texture units whose bindings are tracked. At least one unit is always tracked.
  #[inline]
  pub fn set_texture_units(self, texture_units: usize) -> Self {
    BackendOpt {
      texture_units: texture_units.max(1),
      ..self
    }
  }

  /// Get the number of tracked texture units.
  #[inline]
  pub fn texture_units(&self) -> usize {
    self.texture_units
  }
}

/// Error that might occur while creating a [`Backend`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BackendError {
  /// The version string couldn’t be understood.
  Version(VersionError),
  /// A texture format class has no usable native format.
  Format(FormatError),
}

impl fmt::Display for BackendError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      BackendError::Version(ref e) => write!(f, "backend version error: {}", e),
      BackendError::Format(ref e) => write!(f, "backend format error: {}", e),
    }
  }
}

impl error::Error for BackendError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      BackendError::Version(e) => Some(e),
      BackendError::Format(e) => Some(e),
    }
  }
}

impl From<VersionError> for BackendError {
  fn from(e: VersionError) -> Self {
    BackendError::Version(e)
  }
}

impl From<FormatError> for BackendError {
  fn from(e: FormatError) -> Self {
    BackendError::Format(e)
  }
}

/// State-tracking OpenGL backend.
///
/// The backend owns the native context. Every resource it creates shares the backend’s view of
/// the native binding state, so redundant binds are skipped wherever they come from.
///
/// The native state is assumed to be left alone between [`Backend::begin_frame`] and
/// [`Backend::end_frame`]. Outside of a frame, anyone can change it: the next frame starts by
/// forgetting everything the backend believes is bound.
#[derive(Debug)]
pub struct Backend<G>
where
  G: Gl,
{
  state: Rc<RefCell<GLState<G>>>,
  version: GlVersion,
  extensions: Extensions,
  caps: Caps,
  float_triple: TextureTriple,
  alpha_triple: TextureTriple,
  srgb_triple: TextureTriple,
  default_framebuffer: FramebufferId,
}

impl<G> Backend<G>
where
  G: Gl,
{
  /// Create a backend with default options on the current context.
  pub fn new(ctx: G) -> Result<Self, BackendError> {
    Self::with_options(ctx, BackendOpt::default())
  }

  /// Create a backend on the current context.
  ///
  /// This probes the driver version and extensions, and negotiates native texture formats.
  pub fn with_options(ctx: G, opt: BackendOpt) -> Result<Self, BackendError> {
    let extensions = Extensions::parse(&ctx.get_string(consts::EXTENSIONS));
    let version = GlVersion::parse(&ctx.get_string(consts::VERSION))?;

    let float_triple = format::float_triple_for(&ctx, version, &extensions, opt.probe_size())?;
    let srgb_triple = format::srgba_triple_for(version, &extensions)?;
    let alpha_triple = format::alpha_triple_for(version);

    let default_framebuffer = FramebufferId(ctx.get_integer(consts::FRAMEBUFFER_BINDING) as u32);

    let mut features = Features::NONE;
    if extensions.has("GL_EXT_disjoint_timer_query")
      || extensions.has("GL_EXT_disjoint_timer_query_webgl2")
    {
      features |= Features::TIMERS;
    }

    let caps = Caps {
      features,
      max_texture_size: ctx.get_integer(consts::MAX_TEXTURE_SIZE).max(0) as usize,
    };

    log::info!(
      "OpenGL ES {}: float format {}, sRGB format {}, alpha format {}",
      version,
      float_triple,
      srgb_triple,
      alpha_triple
    );
    log::info!("{:?}", caps);

    let state = GLState::new(ctx, opt.texture_units());

    Ok(Backend {
      state: Rc::new(RefCell::new(state)),
      version,
      extensions,
      caps,
      float_triple,
      alpha_triple,
      srgb_triple,
      default_framebuffer,
    })
  }

  /// Version of the driver.
  pub fn version(&self) -> GlVersion {
    self.version
  }

  /// Extensions advertised by the driver.
  pub fn extensions(&self) -> &Extensions {
    &self.extensions
  }

  /// Capabilities of the backend.
  pub fn caps(&self) -> &Caps {
    &self.caps
  }

  /// Native format of [`TextureFormat::Float`] textures.
  pub fn float_triple(&self) -> TextureTriple {
    self.float_triple
  }

  /// Native format of [`TextureFormat::SRGB`] textures.
  pub fn srgb_triple(&self) -> TextureTriple {
    self.srgb_triple
  }

  /// Native format of [`TextureFormat::Alpha`] textures.
  pub fn alpha_triple(&self) -> TextureTriple {
    self.alpha_triple
  }

  /// Start a frame.
  ///
  /// Everything the backend knows about the native state is forgotten: the next binds will all
  /// go down to the driver, even the ones that look redundant.
  pub fn begin_frame(&mut self) {
    self.state.borrow_mut().reset();
  }

  /// End a frame, leaving the first texture unit active.
  pub fn end_frame(&mut self) {
    self.state.borrow_mut().settle();
  }

  /// Whether timer queries measured since the last check are meaningful.
  ///
  /// The GPU might have been interrupted (power saving, context switch, …) in which case timers
  /// return garbage.
  pub fn is_time_continuous(&self) -> bool {
    self
      .state
      .borrow()
      .ctx()
      .get_integer(consts::GPU_DISJOINT_EXT)
      == consts::FALSE as i32
  }

  /// Create a GPU timer. Requires [`Features::TIMERS`].
  pub fn new_timer(&mut self) -> Timer<G> {
    Timer::new(&self.state)
  }

  /// Create a texture with uninitialized content.
  ///
  /// # Panics
  ///
  /// Panics if the format or one of the filters is not supported.
  pub fn new_texture(
    &mut self,
    format: TextureFormat,
    width: u32,
    height: u32,
    min_filter: TextureFilter,
    mag_filter: TextureFilter,
  ) -> Texture<G> {
    self
      .try_new_texture(format, width, height, min_filter, mag_filter)
      .unwrap_or_else(|v| v.raise())
  }

  /// Fallible version of [`Backend::new_texture`].
  pub fn try_new_texture(
    &mut self,
    format: TextureFormat,
    width: u32,
    height: u32,
    min_filter: TextureFilter,
    mag_filter: TextureFilter,
  ) -> Result<Texture<G>, InvariantViolation> {
    let triple = match format {
      TextureFormat::Float => self.float_triple,
      TextureFormat::SRGB => self.srgb_triple,
      TextureFormat::Alpha => self.alpha_triple,
      _ => return Err(InvariantViolation::UnsupportedTextureFormat(format)),
    };

    Texture::new(&self.state, triple, width, height, min_filter, mag_filter)
  }

  /// The nil texture: binding it to a unit unbinds that unit.
  pub fn nil_texture(&self) -> Texture<G> {
    Texture::nil(&self.state)
  }

  /// Create a zeroed buffer of `size` bytes.
  ///
  /// # Panics
  ///
  /// Panics if the buffer type is not supported.
  pub fn new_buffer(&mut self, ty: BufferType, size: usize) -> Buffer<G> {
    Buffer::new(&self.state, ty, size).unwrap_or_else(|v| v.raise())
  }

  /// Create a buffer holding `data`, which can’t be changed afterwards.
  ///
  /// # Panics
  ///
  /// Panics if the buffer type is not supported.
  pub fn new_immutable_buffer(&mut self, ty: BufferType, data: &[u8]) -> Buffer<G> {
    Buffer::new_immutable(&self.state, ty, data).unwrap_or_else(|v| v.raise())
  }

  /// Create a framebuffer with no attachment.
  pub fn new_framebuffer(&mut self) -> Framebuffer<G> {
    Framebuffer::new(&self.state)
  }

  /// The framebuffer that was bound when the backend was created.
  pub fn default_framebuffer(&self) -> Framebuffer<G> {
    Framebuffer::new_default(&self.state, self.default_framebuffer)
  }

  /// Create the input layout feeding the vertex shader `vs`.
  ///
  /// `layout` describes each input of `vs`, in the same order.
  pub fn new_input_layout(
    &mut self,
    vs: &ShaderSources,
    layout: &[InputDesc],
  ) -> Result<InputLayout<G>, InputLayoutError> {
    InputLayout::new(&self.state, vs, layout)
  }

  /// Compile and link a program.
  pub fn new_program(
    &mut self,
    vs: &ShaderSources,
    fs: &ShaderSources,
  ) -> Result<Program<G>, ProgramError> {
    Program::new(&self.state, vs, fs)
  }

  /// Enable or disable depth testing.
  pub fn set_depth_test(&mut self, enabled: bool) {
    self.state.borrow_mut().set_depth_test(enabled);
  }

  /// Enable or disable writes to the depth buffer.
  pub fn set_depth_mask(&mut self, mask: bool) {
    self.state.borrow_mut().set_depth_mask(mask);
  }

  /// Set the depth comparison function.
  ///
  /// # Panics
  ///
  /// Panics if the function is not supported.
  pub fn set_depth_func(&mut self, func: DepthFunc) {
    self
      .state
      .borrow_mut()
      .set_depth_func(func)
      .unwrap_or_else(|v| v.raise())
  }

  /// Enable or disable blending.
  pub fn set_blend(&mut self, enabled: bool) {
    self.state.borrow_mut().set_blending(enabled);
  }

  /// Set the source and destination blending factors.
  ///
  /// # Panics
  ///
  /// Panics if a factor is not supported.
  pub fn set_blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
    self
      .state
      .borrow_mut()
      .set_blend_func(src, dst)
      .unwrap_or_else(|v| v.raise())
  }

  /// Set the viewport.
  pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
    self.state.borrow_mut().set_viewport([x, y, width, height]);
  }

  /// Set the color used to clear the color attachment.
  pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
    self.state.borrow_mut().set_clear_color([r, g, b, a]);
  }

  /// Set the value used to clear the depth attachment.
  pub fn set_clear_depth(&mut self, depth: f32) {
    self.state.borrow_mut().set_clear_depth(depth);
  }

  /// Clear attachments of the bound framebuffer.
  pub fn clear(&mut self, attachments: BufferAttachments) {
    let mut mask = 0;

    if attachments.contains(BufferAttachments::COLOR) {
      mask |= consts::COLOR_BUFFER_BIT;
    }

    if attachments.contains(BufferAttachments::DEPTH) {
      mask |= consts::DEPTH_BUFFER_BIT;
    }

    self.state.borrow().ctx().clear(mask);
  }

  /// Draw `count` vertices, with indices read from the bound index buffer.
  ///
  /// `off` is expressed in 16-bit indices.
  ///
  /// # Panics
  ///
  /// Panics if no input layout or vertex buffer is bound, or if the uniforms of the current
  /// program can’t be pushed down.
  pub fn draw_elements(&mut self, mode: DrawMode, off: usize, count: usize) {
    self
      .try_draw_elements(mode, off, count)
      .unwrap_or_else(|v| v.raise())
  }

  /// Fallible version of [`Backend::draw_elements`].
  pub fn try_draw_elements(
    &mut self,
    mode: DrawMode,
    off: usize,
    count: usize,
  ) -> Result<(), InvariantViolation> {
    let mode = draw_mode_to_glenum(mode)?;
    // byte offset of the first 16-bit index
    let (count, offset) = i32::try_from(count)
      .ok()
      .zip(off.checked_mul(2))
      .ok_or(InvariantViolation::DrawRangeOverflow { off, count })?;
    let mut state = self.state.borrow_mut();

    state.prepare_draw()?;
    state
      .ctx()
      .draw_elements(mode, count, consts::UNSIGNED_SHORT, offset);

    Ok(())
  }

  /// Draw `count` vertices, starting at vertex `off`.
  ///
  /// # Panics
  ///
  /// Panics if no input layout or vertex buffer is bound, or if the uniforms of the current
  /// program can’t be pushed down.
  pub fn draw_arrays(&mut self, mode: DrawMode, off: usize, count: usize) {
    self
      .try_draw_arrays(mode, off, count)
      .unwrap_or_else(|v| v.raise())
  }

  /// Fallible version of [`Backend::draw_arrays`].
  pub fn try_draw_arrays(
    &mut self,
    mode: DrawMode,
    off: usize,
    count: usize,
  ) -> Result<(), InvariantViolation> {
    let mode = draw_mode_to_glenum(mode)?;
    let (first, count) = i32::try_from(off)
      .ok()
      .zip(i32::try_from(count).ok())
      .ok_or(InvariantViolation::DrawRangeOverflow { off, count })?;
    let mut state = self.state.borrow_mut();

    state.prepare_draw()?;
    state.ctx().draw_arrays(mode, first, count);

    Ok(())
  }
}

fn draw_mode_to_glenum(mode: DrawMode) -> Result<u32, InvariantViolation> {
  match mode {
    DrawMode::TriangleStrip => Ok(consts::TRIANGLE_STRIP),
    DrawMode::Triangles => Ok(consts::TRIANGLES),
    _ => Err(InvariantViolation::UnsupportedDrawMode(mode)),
  }
}
