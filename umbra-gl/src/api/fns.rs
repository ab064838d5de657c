//! [`Gl`] on top of the `gl` crate’s global function pointers.

use gl::types::*;
use std::ffi::{CStr, CString};
use std::marker::PhantomData;
use std::os::raw::{c_char, c_void};
use std::ptr;

use crate::api::consts;
use crate::api::{BufferId, FramebufferId, Gl, ProgramId, QueryId, ShaderId, TextureId, UniformId};

/// OpenGL functions loaded by the `gl` crate.
///
/// The `gl` crate stores function pointers globally; only one context can be driven per process
/// and it must be current on the calling thread.
#[derive(Debug)]
pub struct GlFns {
  _phantom: PhantomData<*const ()>, // !Send and !Sync
}

impl GlFns {
  /// Load the function pointers with `loader` (typically the windowing library’s
  /// `get_proc_address`).
  ///
  /// # Unsafety
  ///
  /// A context must be current on the calling thread, and stay current as long as the returned
  /// object is used.
  pub unsafe fn load_with<F>(loader: F) -> Self
  where
    F: FnMut(&'static str) -> *const c_void,
  {
    gl::load_with(loader);
    GlFns {
      _phantom: PhantomData,
    }
  }

  fn extensions_indexed(&self) -> String {
    unsafe {
      let mut count: GLint = 0;
      gl::GetIntegerv(consts::NUM_EXTENSIONS, &mut count);

      (0..count.max(0) as GLuint)
        .filter_map(|i| from_gl_str(gl::GetStringi(consts::EXTENSIONS, i)))
        .collect::<Vec<_>>()
        .join(" ")
    }
  }
}

unsafe fn from_gl_str(s: *const GLubyte) -> Option<String> {
  if s.is_null() {
    None
  } else {
    Some(
      CStr::from_ptr(s as *const c_char)
        .to_string_lossy()
        .into_owned(),
    )
  }
}

// Interior NUL bytes can’t cross the FFI boundary; they’re dropped, which makes the native call
// fail the same way an unknown name would.
fn to_c_string(s: &str) -> CString {
  CString::new(s.replace('\0', "")).unwrap_or_default()
}

fn info_log(len: GLint, read: impl FnOnce(GLsizei, *mut GLsizei, *mut GLchar)) -> String {
  let mut log = vec![0u8; len.max(1) as usize];
  let mut written: GLsizei = 0;

  read(log.len() as GLsizei, &mut written, log.as_mut_ptr() as *mut GLchar);
  log.truncate(written.max(0) as usize);

  String::from_utf8_lossy(&log).into_owned()
}

impl Gl for GlFns {
  fn get_string(&self, name: GLenum) -> String {
    match unsafe { from_gl_str(gl::GetString(name)) } {
      Some(s) => s,
      // core profiles only expose extensions through the indexed query
      None if name == consts::EXTENSIONS => self.extensions_indexed(),
      None => String::new(),
    }
  }

  fn get_integer(&self, pname: GLenum) -> i32 {
    let mut v: GLint = 0;
    unsafe { gl::GetIntegerv(pname, &mut v) };
    v
  }

  fn get_error(&self) -> u32 {
    unsafe { gl::GetError() }
  }

  fn enable(&self, cap: GLenum) {
    unsafe { gl::Enable(cap) }
  }

  fn disable(&self, cap: GLenum) {
    unsafe { gl::Disable(cap) }
  }

  fn depth_mask(&self, mask: bool) {
    unsafe { gl::DepthMask(mask as GLboolean) }
  }

  fn depth_func(&self, func: GLenum) {
    unsafe { gl::DepthFunc(func) }
  }

  fn blend_func(&self, sfactor: GLenum, dfactor: GLenum) {
    unsafe { gl::BlendFunc(sfactor, dfactor) }
  }

  fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
    unsafe { gl::Viewport(x, y, width, height) }
  }

  fn clear(&self, mask: GLbitfield) {
    unsafe { gl::Clear(mask) }
  }

  fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
    unsafe { gl::ClearColor(r, g, b, a) }
  }

  fn clear_depthf(&self, depth: f32) {
    unsafe { gl::ClearDepthf(depth) }
  }

  fn create_texture(&self) -> TextureId {
    let mut handle: GLuint = 0;
    unsafe { gl::GenTextures(1, &mut handle) };
    TextureId(handle)
  }

  fn delete_texture(&self, texture: TextureId) {
    unsafe { gl::DeleteTextures(1, &texture.0) }
  }

  fn active_texture(&self, unit: GLenum) {
    unsafe { gl::ActiveTexture(unit) }
  }

  fn bind_texture(&self, target: GLenum, texture: TextureId) {
    unsafe { gl::BindTexture(target, texture.0) }
  }

  fn tex_parameter_i(&self, target: GLenum, pname: GLenum, param: i32) {
    unsafe { gl::TexParameteri(target, pname, param) }
  }

  fn tex_image_2d(
    &self,
    target: GLenum,
    level: i32,
    internal_format: i32,
    width: i32,
    height: i32,
    format: GLenum,
    ty: GLenum,
    pixels: Option<&[u8]>,
  ) {
    let data = pixels.map_or(ptr::null(), |p| p.as_ptr() as *const c_void);

    unsafe {
      gl::TexImage2D(
        target,
        level,
        internal_format,
        width,
        height,
        0,
        format,
        ty,
        data,
      )
    }
  }

  fn create_buffer(&self) -> BufferId {
    let mut handle: GLuint = 0;
    unsafe { gl::GenBuffers(1, &mut handle) };
    BufferId(handle)
  }

  fn delete_buffer(&self, buffer: BufferId) {
    unsafe { gl::DeleteBuffers(1, &buffer.0) }
  }

  fn bind_buffer(&self, target: GLenum, buffer: BufferId) {
    unsafe { gl::BindBuffer(target, buffer.0) }
  }

  fn buffer_data(&self, target: GLenum, data: &[u8], usage: GLenum) {
    unsafe {
      gl::BufferData(
        target,
        data.len() as GLsizeiptr,
        data.as_ptr() as *const c_void,
        usage,
      )
    }
  }

  fn create_framebuffer(&self) -> FramebufferId {
    let mut handle: GLuint = 0;
    unsafe { gl::GenFramebuffers(1, &mut handle) };
    FramebufferId(handle)
  }

  fn delete_framebuffer(&self, framebuffer: FramebufferId) {
    unsafe { gl::DeleteFramebuffers(1, &framebuffer.0) }
  }

  fn bind_framebuffer(&self, target: GLenum, framebuffer: FramebufferId) {
    unsafe { gl::BindFramebuffer(target, framebuffer.0) }
  }

  fn framebuffer_texture_2d(
    &self,
    target: GLenum,
    attachment: GLenum,
    tex_target: GLenum,
    texture: TextureId,
    level: i32,
  ) {
    unsafe { gl::FramebufferTexture2D(target, attachment, tex_target, texture.0, level) }
  }

  fn check_framebuffer_status(&self, target: GLenum) -> u32 {
    unsafe { gl::CheckFramebufferStatus(target) }
  }

  fn invalidate_framebuffer(&self, target: GLenum, attachment: GLenum) {
    unsafe { gl::InvalidateFramebuffer(target, 1, &attachment) }
  }

  fn create_shader(&self, ty: GLenum) -> ShaderId {
    ShaderId(unsafe { gl::CreateShader(ty) })
  }

  fn shader_source(&self, shader: ShaderId, source: &str) {
    let src = to_c_string(source);
    let src_ptr = src.as_ptr();

    unsafe { gl::ShaderSource(shader.0, 1, &src_ptr, ptr::null()) }
  }

  fn compile_shader(&self, shader: ShaderId) {
    unsafe { gl::CompileShader(shader.0) }
  }

  fn get_shader_i(&self, shader: ShaderId, pname: GLenum) -> i32 {
    let mut v: GLint = 0;
    unsafe { gl::GetShaderiv(shader.0, pname, &mut v) };
    v
  }

  fn get_shader_info_log(&self, shader: ShaderId) -> String {
    let len = self.get_shader_i(shader, consts::INFO_LOG_LENGTH);
    info_log(len, |size, written, log| unsafe {
      gl::GetShaderInfoLog(shader.0, size, written, log)
    })
  }

  fn delete_shader(&self, shader: ShaderId) {
    unsafe { gl::DeleteShader(shader.0) }
  }

  fn create_program(&self) -> ProgramId {
    ProgramId(unsafe { gl::CreateProgram() })
  }

  fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
    unsafe { gl::AttachShader(program.0, shader.0) }
  }

  fn bind_attrib_location(&self, program: ProgramId, index: u32, name: &str) {
    let name = to_c_string(name);
    unsafe { gl::BindAttribLocation(program.0, index, name.as_ptr()) }
  }

  fn link_program(&self, program: ProgramId) {
    unsafe { gl::LinkProgram(program.0) }
  }

  fn get_program_i(&self, program: ProgramId, pname: GLenum) -> i32 {
    let mut v: GLint = 0;
    unsafe { gl::GetProgramiv(program.0, pname, &mut v) };
    v
  }

  fn get_program_info_log(&self, program: ProgramId) -> String {
    let len = self.get_program_i(program, consts::INFO_LOG_LENGTH);
    info_log(len, |size, written, log| unsafe {
      gl::GetProgramInfoLog(program.0, size, written, log)
    })
  }

  fn delete_program(&self, program: ProgramId) {
    unsafe { gl::DeleteProgram(program.0) }
  }

  fn use_program(&self, program: ProgramId) {
    unsafe { gl::UseProgram(program.0) }
  }

  fn get_uniform_location(&self, program: ProgramId, name: &str) -> UniformId {
    let name = to_c_string(name);
    UniformId(unsafe { gl::GetUniformLocation(program.0, name.as_ptr()) })
  }

  fn uniform_1i(&self, location: UniformId, v: i32) {
    unsafe { gl::Uniform1i(location.0, v) }
  }

  fn uniform_1f(&self, location: UniformId, v0: f32) {
    unsafe { gl::Uniform1f(location.0, v0) }
  }

  fn uniform_2f(&self, location: UniformId, v0: f32, v1: f32) {
    unsafe { gl::Uniform2f(location.0, v0, v1) }
  }

  fn uniform_3f(&self, location: UniformId, v0: f32, v1: f32, v2: f32) {
    unsafe { gl::Uniform3f(location.0, v0, v1, v2) }
  }

  fn uniform_4f(&self, location: UniformId, v0: f32, v1: f32, v2: f32, v3: f32) {
    unsafe { gl::Uniform4f(location.0, v0, v1, v2, v3) }
  }

  fn enable_vertex_attrib_array(&self, index: u32) {
    unsafe { gl::EnableVertexAttribArray(index) }
  }

  fn disable_vertex_attrib_array(&self, index: u32) {
    unsafe { gl::DisableVertexAttribArray(index) }
  }

  fn vertex_attrib_pointer(
    &self,
    index: u32,
    size: i32,
    ty: GLenum,
    normalized: bool,
    stride: i32,
    offset: usize,
  ) {
    unsafe {
      gl::VertexAttribPointer(
        index,
        size,
        ty,
        normalized as GLboolean,
        stride,
        offset as *const c_void,
      )
    }
  }

  fn draw_arrays(&self, mode: GLenum, first: i32, count: i32) {
    unsafe { gl::DrawArrays(mode, first, count) }
  }

  fn draw_elements(&self, mode: GLenum, count: i32, ty: GLenum, offset: usize) {
    unsafe { gl::DrawElements(mode, count, ty, offset as *const c_void) }
  }

  fn create_query(&self) -> QueryId {
    let mut handle: GLuint = 0;
    unsafe { gl::GenQueries(1, &mut handle) };
    QueryId(handle)
  }

  fn delete_query(&self, query: QueryId) {
    unsafe { gl::DeleteQueries(1, &query.0) }
  }

  fn begin_query(&self, target: GLenum, query: QueryId) {
    unsafe { gl::BeginQuery(target, query.0) }
  }

  fn end_query(&self, target: GLenum) {
    unsafe { gl::EndQuery(target) }
  }

  fn get_query_object_u(&self, query: QueryId, pname: GLenum) -> u32 {
    let mut v: GLuint = 0;
    unsafe { gl::GetQueryObjectuiv(query.0, pname, &mut v) };
    v
  }
}
