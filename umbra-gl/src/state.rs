//! Graphics state.

use std::marker::PhantomData;
use std::rc::Rc;

use umbra::{BlendFactor, DataType, DepthFunc};

use crate::api::consts;
use crate::api::{BufferId, Gl, TextureId};
use crate::shader::ProgramRepr;
use crate::vertex::LayoutRepr;
use crate::violation::InvariantViolation;

/// Cached value.
///
/// A cached value is used to prevent issuing costly GPU commands if we know the target value is
/// already set to what the command tries to set. An empty cache is always invalid, which is how
/// the next command is forced to run after the native state may have been altered behind our back.
#[derive(Debug)]
pub(crate) struct Cached<T>(Option<T>)
where
  T: PartialEq;

impl<T> Cached<T>
where
  T: PartialEq,
{
  /// A cache holding nothing yet.
  pub(crate) fn empty() -> Self {
    Cached(None)
  }

  /// Explicitly invalidate the value.
  pub(crate) fn invalidate(&mut self) {
    self.0 = None;
  }

  pub(crate) fn set(&mut self, value: T) {
    self.0 = Some(value);
  }

  /// Check if the cached value is invalid regarding a value.
  ///
  /// A non-cached value is always invalid whatever the compared value. If a value is already
  /// cached, then it’s invalid if it’s not equal ([`PartialEq`]) to the input value.
  pub(crate) fn is_invalid(&self, new_val: &T) -> bool {
    match &self.0 {
      Some(ref t) => t != new_val,
      _ => true,
    }
  }

  /// Invalidate the value if it’s currently `value`.
  pub(crate) fn forget(&mut self, value: &T) {
    if !self.is_invalid(value) {
      self.invalidate();
    }
  }
}

/// Vertex buffer to source attributes from on the next draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct VertexBinding {
  pub(crate) buffer: BufferId,
  pub(crate) stride: usize,
  pub(crate) offset: usize,
}

/// The graphics state.
///
/// This type owns the native context and shadows its binding state. Every state-changing
/// command goes through it, so that commands that wouldn’t change anything are skipped.
#[derive(Debug)]
pub(crate) struct GLState<G> {
  _phantom: PhantomData<*const ()>, // !Send and !Sync
  ctx: G,

  // number of enabled vertex attribute arrays
  nattr: usize,

  // objects
  program: Option<Rc<ProgramRepr>>,
  current_texture_unit: Cached<u32>,
  bound_textures: Vec<Cached<TextureId>>,

  // lazy vertex input state, only pushed down on draw
  layout: Option<Rc<LayoutRepr>>,
  vertex_buffer: Option<VertexBinding>,

  // pipeline
  depth_test: Cached<bool>,
  depth_mask: Cached<bool>,
  depth_func: Cached<u32>,
  blending: Cached<bool>,
  blend_funcs: Cached<(u32, u32)>,
  viewport: Cached<[i32; 4]>,
  clear_color: Cached<[f32; 4]>,
  clear_depth: Cached<f32>,
}

impl<G> GLState<G>
where
  G: Gl,
{
  /// Wrap a context whose state is unknown.
  pub(crate) fn new(ctx: G, texture_units: usize) -> Self {
    GLState {
      _phantom: PhantomData,
      ctx,
      nattr: 0,
      program: None,
      current_texture_unit: Cached::empty(),
      bound_textures: (0..texture_units).map(|_| Cached::empty()).collect(),
      layout: None,
      vertex_buffer: None,
      depth_test: Cached::empty(),
      depth_mask: Cached::empty(),
      depth_func: Cached::empty(),
      blending: Cached::empty(),
      blend_funcs: Cached::empty(),
      viewport: Cached::empty(),
      clear_color: Cached::empty(),
      clear_depth: Cached::empty(),
    }
  }

  pub(crate) fn ctx(&self) -> &G {
    &self.ctx
  }

  /// Forget everything: the native state may have been changed by someone else.
  pub(crate) fn reset(&mut self) {
    self.nattr = 0;
    self.program = None;
    self.current_texture_unit.invalidate();

    for texture in &mut self.bound_textures {
      texture.invalidate();
    }

    self.layout = None;
    self.vertex_buffer = None;

    self.depth_test.invalidate();
    self.depth_mask.invalidate();
    self.depth_func.invalidate();
    self.blending.invalidate();
    self.blend_funcs.invalidate();
    self.viewport.invalidate();
    self.clear_color.invalidate();
    self.clear_depth.invalidate();
  }

  /// Leave the first texture unit active, whatever the shadow says.
  pub(crate) fn settle(&mut self) {
    self.ctx.active_texture(consts::TEXTURE0);
    self.current_texture_unit.set(0);
  }

  fn set_texture_unit(&mut self, unit: u32) {
    if self.current_texture_unit.is_invalid(&unit) {
      self.ctx.active_texture(consts::TEXTURE0 + unit);
      self.current_texture_unit.set(unit);
    }
  }

  /// Bind a 2D texture to a texture unit.
  ///
  /// Nothing reaches the native API when the texture is already bound to that unit, not even a
  /// unit switch. Use [`GLState::bind_texture_for_update`] before specifying the texture.
  pub(crate) fn bind_texture(
    &mut self,
    unit: usize,
    texture: TextureId,
  ) -> Result<(), InvariantViolation> {
    let units = self.bound_textures.len();

    if unit >= units {
      return Err(InvariantViolation::TextureUnitOutOfRange { unit, units });
    }

    if self.bound_textures[unit].is_invalid(&texture) {
      self.set_texture_unit(unit as u32);
      self.ctx.bind_texture(consts::TEXTURE_2D, texture);
      self.bound_textures[unit].set(texture);
    } else {
      log::trace!("texture {:?} already bound to unit {}", texture, unit);
    }

    Ok(())
  }

  /// Bind a 2D texture to the first unit and leave that unit active, so that the texture can be
  /// specified right after.
  pub(crate) fn bind_texture_for_update(&mut self, texture: TextureId) {
    self.set_texture_unit(0);

    if self.bound_textures[0].is_invalid(&texture) {
      self.ctx.bind_texture(consts::TEXTURE_2D, texture);
      self.bound_textures[0].set(texture);
    }
  }

  /// Forget about a texture that is about to be deleted.
  pub(crate) fn forget_texture(&mut self, texture: TextureId) {
    for bound in &mut self.bound_textures {
      bound.forget(&texture);
    }
  }

  /// Make a program current and reconcile the enabled vertex attribute arrays with it.
  pub(crate) fn use_program(&mut self, program: &Rc<ProgramRepr>) {
    if self.is_current_program(program) {
      log::trace!("program {:?} already in use", program.handle());
    } else {
      self.ctx.use_program(program.handle());
      self.program = Some(program.clone());
    }

    self.enable_vertex_arrays(program.nattr());
  }

  fn enable_vertex_arrays(&mut self, n: usize) {
    // enable the newly required ones
    for i in self.nattr..n {
      self.ctx.enable_vertex_attrib_array(i as u32);
    }

    // disable the ones we don’t need anymore
    for i in n..self.nattr {
      self.ctx.disable_vertex_attrib_array(i as u32);
    }

    self.nattr = n;
  }

  fn is_current_program(&self, program: &Rc<ProgramRepr>) -> bool {
    matches!(self.program, Some(ref current) if Rc::ptr_eq(current, program))
  }

  /// Forget about a program that is about to be deleted.
  pub(crate) fn forget_program(&mut self, program: &Rc<ProgramRepr>) {
    if self.is_current_program(program) {
      self.program = None;
    }
  }

  pub(crate) fn bind_layout(&mut self, layout: &Rc<LayoutRepr>) {
    self.layout = Some(layout.clone());
  }

  pub(crate) fn forget_layout(&mut self, layout: &Rc<LayoutRepr>) {
    if matches!(self.layout, Some(ref current) if Rc::ptr_eq(current, layout)) {
      self.layout = None;
    }
  }

  pub(crate) fn bind_vertex_buffer(&mut self, buffer: BufferId, stride: usize, offset: usize) {
    self.vertex_buffer = Some(VertexBinding {
      buffer,
      stride,
      offset,
    });
  }

  /// Forget about a buffer that is about to be deleted.
  pub(crate) fn forget_buffer(&mut self, buffer: BufferId) {
    if matches!(self.vertex_buffer, Some(binding) if binding.buffer == buffer) {
      self.vertex_buffer = None;
    }
  }

  /// Push the lazy vertex input state down and flush the uniforms of the current program.
  pub(crate) fn prepare_draw(&mut self) -> Result<(), InvariantViolation> {
    let layout = self.layout.clone().ok_or(InvariantViolation::NoInputLayout)?;
    let binding = self.vertex_buffer.ok_or(InvariantViolation::NoVertexBuffer)?;

    self.ctx.bind_buffer(consts::ARRAY_BUFFER, binding.buffer);

    for (location, desc) in layout.inputs() {
      let ty = match desc.ty {
        DataType::Float => consts::FLOAT,
        DataType::Short => consts::SHORT,
        ty => return Err(InvariantViolation::UnsupportedDataType(ty)),
      };

      self.ctx.vertex_attrib_pointer(
        location,
        desc.size as i32,
        ty,
        false,
        binding.stride as i32,
        binding.offset + desc.offset,
      );
    }

    if let Some(ref program) = self.program {
      program.update_uniforms(&self.ctx)?;
    }

    Ok(())
  }

  pub(crate) fn set_depth_test(&mut self, enabled: bool) {
    if self.depth_test.is_invalid(&enabled) {
      if enabled {
        self.ctx.enable(consts::DEPTH_TEST);
      } else {
        self.ctx.disable(consts::DEPTH_TEST);
      }

      self.depth_test.set(enabled);
    }
  }

  pub(crate) fn set_depth_mask(&mut self, mask: bool) {
    if self.depth_mask.is_invalid(&mask) {
      self.ctx.depth_mask(mask);
      self.depth_mask.set(mask);
    }
  }

  pub(crate) fn set_depth_func(&mut self, func: DepthFunc) -> Result<(), InvariantViolation> {
    let func = depth_func_to_glenum(func)?;

    if self.depth_func.is_invalid(&func) {
      self.ctx.depth_func(func);
      self.depth_func.set(func);
    }

    Ok(())
  }

  pub(crate) fn set_blending(&mut self, enabled: bool) {
    if self.blending.is_invalid(&enabled) {
      if enabled {
        self.ctx.enable(consts::BLEND);
      } else {
        self.ctx.disable(consts::BLEND);
      }

      self.blending.set(enabled);
    }
  }

  pub(crate) fn set_blend_func(
    &mut self,
    src: BlendFactor,
    dst: BlendFactor,
  ) -> Result<(), InvariantViolation> {
    let funcs = (blend_factor_to_glenum(src)?, blend_factor_to_glenum(dst)?);

    if self.blend_funcs.is_invalid(&funcs) {
      self.ctx.blend_func(funcs.0, funcs.1);
      self.blend_funcs.set(funcs);
    }

    Ok(())
  }

  pub(crate) fn set_viewport(&mut self, viewport: [i32; 4]) {
    if self.viewport.is_invalid(&viewport) {
      self
        .ctx
        .viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport.set(viewport);
    }
  }

  pub(crate) fn set_clear_color(&mut self, clear_color: [f32; 4]) {
    if self.clear_color.is_invalid(&clear_color) {
      self.ctx.clear_color(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color.set(clear_color);
    }
  }

  pub(crate) fn set_clear_depth(&mut self, depth: f32) {
    if self.clear_depth.is_invalid(&depth) {
      self.ctx.clear_depthf(depth);
      self.clear_depth.set(depth);
    }
  }
}

fn depth_func_to_glenum(func: DepthFunc) -> Result<u32, InvariantViolation> {
  match func {
    DepthFunc::Greater => Ok(consts::GREATER),
    DepthFunc::GreaterOrEqual => Ok(consts::GEQUAL),
    _ => Err(InvariantViolation::UnsupportedDepthFunc(func)),
  }
}

fn blend_factor_to_glenum(factor: BlendFactor) -> Result<u32, InvariantViolation> {
  match factor {
    BlendFactor::One => Ok(consts::ONE),
    BlendFactor::OneMinusSrcAlpha => Ok(consts::ONE_MINUS_SRC_ALPHA),
    BlendFactor::Zero => Ok(consts::ZERO),
    BlendFactor::DstColor => Ok(consts::DST_COLOR),
    _ => Err(InvariantViolation::UnsupportedBlendFactor(factor)),
  }
}
