//! Shader programs.

mod uniform;

use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use umbra::{DataType, ShaderSources};

use crate::api::consts;
use crate::api::{Gl, ProgramId, ShaderId};
use crate::buffer::Buffer;
use crate::state::GLState;
use crate::violation::InvariantViolation;

use self::uniform::UniformTracker;

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that a [`Program`] can generate.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A shader stage failed to compile.
  CompilationFailed {
    /// Stage that failed.
    stage: StageType,
    /// Compiler log.
    log: String,
  },
  /// Program link failed. You can inspect the reason by looking at the contained `String`.
  LinkFailed(String),
  /// A uniform of a uniform block isn’t active in the linked program.
  UniformNotFound(String),
  /// A uniform of a uniform block whose type or component count can’t be emulated.
  UnsupportedUniform {
    /// Name of the uniform.
    name: String,
    /// Component type.
    ty: DataType,
    /// Number of components.
    size: usize,
  },
  /// A uniform lying (partially) outside its uniform block.
  UniformOutOfBounds {
    /// Name of the uniform.
    name: String,
    /// Offset of the uniform in the block.
    offset: usize,
    /// Size of the uniform in bytes.
    size: usize,
    /// Declared size of the block.
    block_size: usize,
  },
  /// A vertex input is declared at a location that is out of range or already taken.
  AttributeLocation {
    /// Name of the input.
    name: String,
    /// Declared location.
    location: u32,
  },
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      ProgramError::CompilationFailed { stage, ref log } => {
        write!(f, "{} compilation error: {}", stage, log)
      }

      ProgramError::LinkFailed(ref log) => write!(f, "shader program failed to link: {}", log),

      ProgramError::UniformNotFound(ref name) => write!(f, "uniform {} not found", name),

      ProgramError::UnsupportedUniform { ref name, ty, size } => write!(
        f,
        "unsupported uniform data type or size for {} ({:?} x {})",
        name, ty, size
      ),

      ProgramError::UniformOutOfBounds {
        ref name,
        offset,
        size,
        block_size,
      } => write!(
        f,
        "uniform {} at offset {} ({} bytes) overflows its block of {} bytes",
        name, offset, size, block_size
      ),

      ProgramError::AttributeLocation { ref name, location } => write!(
        f,
        "vertex input {} has an invalid or duplicate location {}",
        name, location
      ),
    }
  }
}

impl error::Error for ProgramError {}

/// A compiled shader stage, deleted once linked (or not).
struct Stage<'a, G>
where
  G: Gl,
{
  ctx: &'a G,
  handle: ShaderId,
}

impl<'a, G> Drop for Stage<'a, G>
where
  G: Gl,
{
  fn drop(&mut self) {
    self.ctx.delete_shader(self.handle);
  }
}

impl<'a, G> Stage<'a, G>
where
  G: Gl,
{
  fn new(ctx: &'a G, ty: StageType, src: &str) -> Result<Self, ProgramError> {
    let shader_ty = match ty {
      StageType::VertexShader => consts::VERTEX_SHADER,
      StageType::FragmentShader => consts::FRAGMENT_SHADER,
    };

    let stage = Stage {
      ctx,
      handle: ctx.create_shader(shader_ty),
    };

    ctx.shader_source(stage.handle, src);
    ctx.compile_shader(stage.handle);

    if ctx.get_shader_i(stage.handle, consts::COMPILE_STATUS) == consts::FALSE as i32 {
      return Err(ProgramError::CompilationFailed {
        stage: ty,
        log: ctx.get_shader_info_log(stage.handle),
      });
    }

    Ok(stage)
  }
}

#[derive(Debug)]
pub(crate) struct ProgramRepr {
  handle: ProgramId,
  // number of vertex attributes
  nattr: usize,
  vertex_uniforms: RefCell<UniformTracker>,
  fragment_uniforms: RefCell<UniformTracker>,
}

impl ProgramRepr {
  pub(crate) fn handle(&self) -> ProgramId {
    self.handle
  }

  pub(crate) fn nattr(&self) -> usize {
    self.nattr
  }

  /// Push the content of both uniform buffers down, if they changed.
  pub(crate) fn update_uniforms<G>(&self, ctx: &G) -> Result<(), InvariantViolation>
  where
    G: Gl,
  {
    self.vertex_uniforms.borrow_mut().update(ctx)?;
    self.fragment_uniforms.borrow_mut().update(ctx)
  }
}

/// A linked shader program.
///
/// Programs read their uniforms from emulated uniform buffers: attach one per stage with
/// [`Program::set_vertex_uniforms`] and [`Program::set_fragment_uniforms`], and the content will
/// be pushed to the native uniforms right before the next draw using this program, only if it
/// changed.
#[derive(Debug)]
pub struct Program<G>
where
  G: Gl,
{
  pub(crate) repr: Rc<ProgramRepr>,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for Program<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    let mut state = self.state.borrow_mut();

    state.forget_program(&self.repr);
    state.ctx().delete_program(self.repr.handle);
  }
}

impl<G> Program<G>
where
  G: Gl,
{
  pub(crate) fn new(
    state: &Rc<RefCell<GLState<G>>>,
    vs: &ShaderSources,
    fs: &ShaderSources,
  ) -> Result<Self, ProgramError> {
    let attribs = attrib_names(vs)?;

    let repr = {
      let st = state.borrow();
      let ctx = st.ctx();
      let handle = link(ctx, vs, fs, &attribs)?;

      let trackers = UniformTracker::setup(ctx, handle, &vs.uniforms).and_then(|vertex| {
        UniformTracker::setup(ctx, handle, &fs.uniforms).map(|fragment| (vertex, fragment))
      });

      match trackers {
        Ok((vertex, fragment)) => ProgramRepr {
          handle,
          nattr: attribs.len(),
          vertex_uniforms: RefCell::new(vertex),
          fragment_uniforms: RefCell::new(fragment),
        },

        Err(e) => {
          ctx.delete_program(handle);
          return Err(e);
        }
      }
    };

    let program = Program {
      repr: Rc::new(repr),
      state: state.clone(),
    };

    program.bind();

    // samplers read from fixed texture units
    let st = state.borrow();
    for tex in vs.textures.iter().chain(&fs.textures) {
      let location = st.ctx().get_uniform_location(program.repr.handle, &tex.name);

      if location.is_valid() {
        st.ctx().uniform_1i(location, tex.binding as i32);
      } else {
        log::warn!(
          "texture uniform {} is inactive in program {}/{}",
          tex.name,
          vs.name,
          fs.name
        );
      }
    }
    drop(st);

    Ok(program)
  }

  /// Make this program current.
  ///
  /// Vertex attribute arrays `0..n` are left enabled, where `n` is the number of vertex inputs of
  /// the program, and the other ones are disabled.
  pub fn bind(&self) {
    self.state.borrow_mut().use_program(&self.repr);
  }

  /// Number of vertex inputs.
  pub fn nattr(&self) -> usize {
    self.repr.nattr
  }

  /// Feed the uniform block of the vertex stage from `buffer`.
  ///
  /// # Panics
  ///
  /// Panics if `buffer` is not a uniform buffer or is smaller than the uniform block.
  pub fn set_vertex_uniforms(&self, buffer: &Buffer<G>) {
    self
      .repr
      .vertex_uniforms
      .borrow_mut()
      .set_buffer(buffer.repr.clone())
      .unwrap_or_else(|v| v.raise())
  }

  /// Feed the uniform block of the fragment stage from `buffer`.
  ///
  /// # Panics
  ///
  /// Panics if `buffer` is not a uniform buffer or is smaller than the uniform block.
  pub fn set_fragment_uniforms(&self, buffer: &Buffer<G>) {
    self
      .repr
      .fragment_uniforms
      .borrow_mut()
      .set_buffer(buffer.repr.clone())
      .unwrap_or_else(|v| v.raise())
  }

  /// Destroy the program.
  pub fn release(self) {}
}

/// Names of the vertex inputs, indexed by location.
fn attrib_names(vs: &ShaderSources) -> Result<Vec<&str>, ProgramError> {
  let mut names = vec![None; vs.inputs.len()];

  for input in &vs.inputs {
    match names.get_mut(input.location as usize) {
      Some(slot) if slot.is_none() => *slot = Some(input.name.as_str()),

      _ => {
        return Err(ProgramError::AttributeLocation {
          name: input.name.clone(),
          location: input.location,
        })
      }
    }
  }

  // every slot is filled: there are as many locations as inputs, all distinct
  Ok(names.into_iter().flatten().collect())
}

/// Compile both stages and link them, with vertex inputs bound to their locations.
fn link<G>(
  ctx: &G,
  vs: &ShaderSources,
  fs: &ShaderSources,
  attribs: &[&str],
) -> Result<ProgramId, ProgramError>
where
  G: Gl,
{
  let vertex = Stage::new(ctx, StageType::VertexShader, &vs.glsl100es)?;
  let fragment = Stage::new(ctx, StageType::FragmentShader, &fs.glsl100es)?;

  let handle = ctx.create_program();
  ctx.attach_shader(handle, vertex.handle);
  ctx.attach_shader(handle, fragment.handle);

  for (location, name) in attribs.iter().enumerate() {
    ctx.bind_attrib_location(handle, location as u32, name);
  }

  ctx.link_program(handle);

  if ctx.get_program_i(handle, consts::LINK_STATUS) == consts::FALSE as i32 {
    let log = ctx.get_program_info_log(handle);
    ctx.delete_program(handle);

    return Err(ProgramError::LinkFailed(log));
  }

  Ok(handle)
}
