//! Native graphics API.
//!
//! The backend never calls into OpenGL directly: every primitive goes through the [`Gl`] trait,
//! which mirrors the OpenGL ES 2.0 entry points the backend needs, one method per call. Object
//! handles are wrapped in newtypes so that a texture can’t be bound as a buffer by mistake.
//!
//! Handles follow the OpenGL convention: the value `0` is never a valid object and is used to
//! unbind a target.

pub mod consts;
#[cfg(feature = "gl")]
mod fns;
#[cfg(test)]
pub(crate) mod mock;

#[cfg(feature = "gl")]
pub use self::fns::GlFns;

macro_rules! handles {
  ($( $(#[$attr:meta])* $name:ident ),* $(,)?) => {
    $(
      $(#[$attr])*
      #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
      pub struct $name(pub u32);

      impl $name {
        /// The null object.
        pub const NONE: $name = $name(0);

        /// Whether this handle refers to an actual object.
        pub fn is_some(self) -> bool {
          self.0 != 0
        }
      }
    )*
  }
}

handles! {
  /// Texture object.
  TextureId,
  /// Buffer object.
  BufferId,
  /// Framebuffer object.
  FramebufferId,
  /// Program object.
  ProgramId,
  /// Shader object.
  ShaderId,
  /// Query object.
  QueryId,
}

/// Uniform location in a linked program.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct UniformId(pub i32);

impl UniformId {
  /// Location returned for names that don’t match any active uniform.
  pub const INVALID: UniformId = UniformId(-1);

  /// Whether the location matches an active uniform.
  pub fn is_valid(self) -> bool {
    self.0 >= 0
  }
}

/// OpenGL ES 2.0 primitives consumed by the backend.
///
/// Implementors forward each method to the matching native call; they don’t cache, validate or
/// reorder anything. `GLenum` parameters take the raw values from [`consts`].
pub trait Gl {
  /// `glGetString`.
  fn get_string(&self, name: u32) -> String;
  /// `glGetIntegerv` for a single value.
  fn get_integer(&self, pname: u32) -> i32;
  /// `glGetError`.
  fn get_error(&self) -> u32;

  /// `glEnable`.
  fn enable(&self, cap: u32);
  /// `glDisable`.
  fn disable(&self, cap: u32);
  /// `glDepthMask`.
  fn depth_mask(&self, mask: bool);
  /// `glDepthFunc`.
  fn depth_func(&self, func: u32);
  /// `glBlendFunc`.
  fn blend_func(&self, sfactor: u32, dfactor: u32);
  /// `glViewport`.
  fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
  /// `glClear`.
  fn clear(&self, mask: u32);
  /// `glClearColor`.
  fn clear_color(&self, r: f32, g: f32, b: f32, a: f32);
  /// `glClearDepthf`.
  fn clear_depthf(&self, depth: f32);

  /// `glGenTextures` for a single texture.
  fn create_texture(&self) -> TextureId;
  /// `glDeleteTextures` for a single texture.
  fn delete_texture(&self, texture: TextureId);
  /// `glActiveTexture`.
  fn active_texture(&self, unit: u32);
  /// `glBindTexture`.
  fn bind_texture(&self, target: u32, texture: TextureId);
  /// `glTexParameteri`.
  fn tex_parameter_i(&self, target: u32, pname: u32, param: i32);
  /// `glTexImage2D`; `None` pixels only allocates storage.
  #[allow(clippy::too_many_arguments)]
  fn tex_image_2d(
    &self,
    target: u32,
    level: i32,
    internal_format: i32,
    width: i32,
    height: i32,
    format: u32,
    ty: u32,
    pixels: Option<&[u8]>,
  );

  /// `glGenBuffers` for a single buffer.
  fn create_buffer(&self) -> BufferId;
  /// `glDeleteBuffers` for a single buffer.
  fn delete_buffer(&self, buffer: BufferId);
  /// `glBindBuffer`.
  fn bind_buffer(&self, target: u32, buffer: BufferId);
  /// `glBufferData`.
  fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

  /// `glGenFramebuffers` for a single framebuffer.
  fn create_framebuffer(&self) -> FramebufferId;
  /// `glDeleteFramebuffers` for a single framebuffer.
  fn delete_framebuffer(&self, framebuffer: FramebufferId);
  /// `glBindFramebuffer`.
  fn bind_framebuffer(&self, target: u32, framebuffer: FramebufferId);
  /// `glFramebufferTexture2D`.
  fn framebuffer_texture_2d(
    &self,
    target: u32,
    attachment: u32,
    tex_target: u32,
    texture: TextureId,
    level: i32,
  );
  /// `glCheckFramebufferStatus`.
  fn check_framebuffer_status(&self, target: u32) -> u32;
  /// `glInvalidateFramebuffer` for a single attachment.
  fn invalidate_framebuffer(&self, target: u32, attachment: u32);

  /// `glCreateShader`.
  fn create_shader(&self, ty: u32) -> ShaderId;
  /// `glShaderSource` with a single string.
  fn shader_source(&self, shader: ShaderId, source: &str);
  /// `glCompileShader`.
  fn compile_shader(&self, shader: ShaderId);
  /// `glGetShaderiv`.
  fn get_shader_i(&self, shader: ShaderId, pname: u32) -> i32;
  /// `glGetShaderInfoLog`.
  fn get_shader_info_log(&self, shader: ShaderId) -> String;
  /// `glDeleteShader`.
  fn delete_shader(&self, shader: ShaderId);

  /// `glCreateProgram`.
  fn create_program(&self) -> ProgramId;
  /// `glAttachShader`.
  fn attach_shader(&self, program: ProgramId, shader: ShaderId);
  /// `glBindAttribLocation`.
  fn bind_attrib_location(&self, program: ProgramId, index: u32, name: &str);
  /// `glLinkProgram`.
  fn link_program(&self, program: ProgramId);
  /// `glGetProgramiv`.
  fn get_program_i(&self, program: ProgramId, pname: u32) -> i32;
  /// `glGetProgramInfoLog`.
  fn get_program_info_log(&self, program: ProgramId) -> String;
  /// `glDeleteProgram`.
  fn delete_program(&self, program: ProgramId);
  /// `glUseProgram`.
  fn use_program(&self, program: ProgramId);

  /// `glGetUniformLocation`.
  fn get_uniform_location(&self, program: ProgramId, name: &str) -> UniformId;
  /// `glUniform1i`.
  fn uniform_1i(&self, location: UniformId, v: i32);
  /// `glUniform1f`.
  fn uniform_1f(&self, location: UniformId, v0: f32);
  /// `glUniform2f`.
  fn uniform_2f(&self, location: UniformId, v0: f32, v1: f32);
  /// `glUniform3f`.
  fn uniform_3f(&self, location: UniformId, v0: f32, v1: f32, v2: f32);
  /// `glUniform4f`.
  fn uniform_4f(&self, location: UniformId, v0: f32, v1: f32, v2: f32, v3: f32);

  /// `glEnableVertexAttribArray`.
  fn enable_vertex_attrib_array(&self, index: u32);
  /// `glDisableVertexAttribArray`.
  fn disable_vertex_attrib_array(&self, index: u32);
  /// `glVertexAttribPointer` with an offset into the bound array buffer.
  fn vertex_attrib_pointer(
    &self,
    index: u32,
    size: i32,
    ty: u32,
    normalized: bool,
    stride: i32,
    offset: usize,
  );
  /// `glDrawArrays`.
  fn draw_arrays(&self, mode: u32, first: i32, count: i32);
  /// `glDrawElements` with an offset into the bound element array buffer.
  fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: usize);

  /// `glGenQueries` for a single query.
  fn create_query(&self) -> QueryId;
  /// `glDeleteQueries` for a single query.
  fn delete_query(&self, query: QueryId);
  /// `glBeginQuery`.
  fn begin_query(&self, target: u32, query: QueryId);
  /// `glEndQuery`.
  fn end_query(&self, target: u32);
  /// `glGetQueryObjectuiv`.
  fn get_query_object_u(&self, query: QueryId, pname: u32) -> u32;
}
