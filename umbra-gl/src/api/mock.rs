//! Recording implementation of [`Gl`] for tests.
//!
//! Every call is appended to a shared log. Clones share the same log and configuration, so a test
//! keeps one clone around to inspect what the backend did with the other.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::api::consts;
use crate::api::{BufferId, FramebufferId, Gl, ProgramId, QueryId, ShaderId, TextureId, UniformId};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
  Enable(u32),
  Disable(u32),
  DepthMask(bool),
  DepthFunc(u32),
  BlendFunc(u32, u32),
  Viewport(i32, i32, i32, i32),
  Clear(u32),
  ClearColor(f32, f32, f32, f32),
  ClearDepth(f32),
  CreateTexture(TextureId),
  DeleteTexture(TextureId),
  ActiveTexture(u32),
  BindTexture(u32, TextureId),
  TexParameter(u32, u32, i32),
  TexImage2D {
    internal_format: i32,
    width: i32,
    height: i32,
    format: u32,
    ty: u32,
    pixels: Option<Vec<u8>>,
  },
  CreateBuffer(BufferId),
  DeleteBuffer(BufferId),
  BindBuffer(u32, BufferId),
  BufferData(u32, Vec<u8>),
  CreateFramebuffer(FramebufferId),
  DeleteFramebuffer(FramebufferId),
  BindFramebuffer(FramebufferId),
  FramebufferTexture2D(TextureId),
  InvalidateFramebuffer(u32),
  CreateShader(u32, ShaderId),
  DeleteShader(ShaderId),
  CreateProgram(ProgramId),
  AttachShader(ProgramId, ShaderId),
  BindAttribLocation(u32, String),
  LinkProgram(ProgramId),
  DeleteProgram(ProgramId),
  UseProgram(ProgramId),
  Uniform1i(UniformId, i32),
  Uniform1f(UniformId, f32),
  Uniform2f(UniformId, f32, f32),
  Uniform3f(UniformId, f32, f32, f32),
  Uniform4f(UniformId, f32, f32, f32, f32),
  EnableVertexAttribArray(u32),
  DisableVertexAttribArray(u32),
  VertexAttribPointer {
    index: u32,
    size: i32,
    ty: u32,
    stride: i32,
    offset: usize,
  },
  DrawArrays(u32, i32, i32),
  DrawElements(u32, i32, u32, usize),
  CreateQuery(QueryId),
  DeleteQuery(QueryId),
  BeginQuery(u32, QueryId),
  EndQuery(u32),
}

impl Call {
  pub(crate) fn is_uniform_upload(&self) -> bool {
    matches!(
      self,
      Call::Uniform1f(..) | Call::Uniform2f(..) | Call::Uniform3f(..) | Call::Uniform4f(..)
    )
  }
}

#[derive(Debug)]
struct Inner {
  calls: RefCell<Vec<Call>>,
  next_handle: Cell<u32>,
  version: String,
  extensions: String,
  integers: RefCell<HashMap<u32, i32>>,
  // (internal format, format, type) triples the driver can render to; `None` accepts anything
  renderable: RefCell<Option<Vec<(i32, u32, u32)>>>,
  last_tex_image: Cell<Option<(i32, u32, u32)>>,
  bound_framebuffer: Cell<u32>,
  uniforms: RefCell<HashMap<String, i32>>,
  inactive_uniforms: RefCell<HashSet<String>>,
  compile_failure: RefCell<Option<String>>,
  link_failure: RefCell<Option<String>>,
  query_ready: Cell<bool>,
  query_result: Cell<u32>,
}

#[derive(Clone, Debug)]
pub(crate) struct MockGl {
  inner: Rc<Inner>,
}

impl MockGl {
  pub(crate) fn new(version: &str, extensions: &str) -> Self {
    let inner = Inner {
      calls: RefCell::new(Vec::new()),
      next_handle: Cell::new(1),
      version: version.to_owned(),
      extensions: extensions.to_owned(),
      integers: RefCell::new(HashMap::new()),
      renderable: RefCell::new(None),
      last_tex_image: Cell::new(None),
      bound_framebuffer: Cell::new(0),
      uniforms: RefCell::new(HashMap::new()),
      inactive_uniforms: RefCell::new(HashSet::new()),
      compile_failure: RefCell::new(None),
      link_failure: RefCell::new(None),
      query_ready: Cell::new(false),
      query_result: Cell::new(0),
    };

    MockGl {
      inner: Rc::new(inner),
    }
  }

  /// An OpenGL ES 3.0 context with timer queries.
  pub(crate) fn gles3() -> Self {
    Self::new("OpenGL ES 3.0 Mock", "GL_EXT_disjoint_timer_query GL_EXT_sRGB")
  }

  pub(crate) fn set_integer(&self, pname: u32, value: i32) {
    self.inner.integers.borrow_mut().insert(pname, value);
  }

  /// Pretend `framebuffer` is bound, e.g. the window-system framebuffer.
  pub(crate) fn set_bound_framebuffer(&self, framebuffer: u32) {
    self.inner.bound_framebuffer.set(framebuffer);
  }

  pub(crate) fn set_renderable(&self, triples: &[(i32, u32, u32)]) {
    *self.inner.renderable.borrow_mut() = Some(triples.to_vec());
  }

  pub(crate) fn set_inactive_uniform(&self, name: &str) {
    self.inner.inactive_uniforms.borrow_mut().insert(name.to_owned());
  }

  pub(crate) fn fail_compilation(&self, log: &str) {
    *self.inner.compile_failure.borrow_mut() = Some(log.to_owned());
  }

  pub(crate) fn fail_link(&self, log: &str) {
    *self.inner.link_failure.borrow_mut() = Some(log.to_owned());
  }

  pub(crate) fn set_query_result(&self, ready: bool, nanos: u32) {
    self.inner.query_ready.set(ready);
    self.inner.query_result.set(nanos);
  }

  pub(crate) fn calls(&self) -> Vec<Call> {
    self.inner.calls.borrow().clone()
  }

  pub(crate) fn clear_calls(&self) {
    self.inner.calls.borrow_mut().clear();
  }

  pub(crate) fn count<F>(&self, pred: F) -> usize
  where
    F: Fn(&Call) -> bool,
  {
    self.inner.calls.borrow().iter().filter(|c| pred(c)).count()
  }

  /// Location the mock handed out for a uniform name, if it’s been asked for.
  pub(crate) fn uniform(&self, name: &str) -> Option<UniformId> {
    self.inner.uniforms.borrow().get(name).copied().map(UniformId)
  }

  fn record(&self, call: Call) {
    self.inner.calls.borrow_mut().push(call);
  }

  fn next_handle(&self) -> u32 {
    let h = self.inner.next_handle.get();
    self.inner.next_handle.set(h + 1);
    h
  }
}

impl Gl for MockGl {
  fn get_string(&self, name: u32) -> String {
    match name {
      consts::VERSION => self.inner.version.clone(),
      consts::EXTENSIONS => self.inner.extensions.clone(),
      _ => String::new(),
    }
  }

  fn get_integer(&self, pname: u32) -> i32 {
    if pname == consts::FRAMEBUFFER_BINDING {
      return self.inner.bound_framebuffer.get() as i32;
    }

    self.inner.integers.borrow().get(&pname).copied().unwrap_or(0)
  }

  fn get_error(&self) -> u32 {
    consts::NO_ERROR
  }

  fn enable(&self, cap: u32) {
    self.record(Call::Enable(cap));
  }

  fn disable(&self, cap: u32) {
    self.record(Call::Disable(cap));
  }

  fn depth_mask(&self, mask: bool) {
    self.record(Call::DepthMask(mask));
  }

  fn depth_func(&self, func: u32) {
    self.record(Call::DepthFunc(func));
  }

  fn blend_func(&self, sfactor: u32, dfactor: u32) {
    self.record(Call::BlendFunc(sfactor, dfactor));
  }

  fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
    self.record(Call::Viewport(x, y, width, height));
  }

  fn clear(&self, mask: u32) {
    self.record(Call::Clear(mask));
  }

  fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
    self.record(Call::ClearColor(r, g, b, a));
  }

  fn clear_depthf(&self, depth: f32) {
    self.record(Call::ClearDepth(depth));
  }

  fn create_texture(&self) -> TextureId {
    let id = TextureId(self.next_handle());
    self.record(Call::CreateTexture(id));
    id
  }

  fn delete_texture(&self, texture: TextureId) {
    self.record(Call::DeleteTexture(texture));
  }

  fn active_texture(&self, unit: u32) {
    self.record(Call::ActiveTexture(unit));
  }

  fn bind_texture(&self, target: u32, texture: TextureId) {
    self.record(Call::BindTexture(target, texture));
  }

  fn tex_parameter_i(&self, target: u32, pname: u32, param: i32) {
    self.record(Call::TexParameter(target, pname, param));
  }

  fn tex_image_2d(
    &self,
    _target: u32,
    _level: i32,
    internal_format: i32,
    width: i32,
    height: i32,
    format: u32,
    ty: u32,
    pixels: Option<&[u8]>,
  ) {
    self
      .inner
      .last_tex_image
      .set(Some((internal_format, format, ty)));

    self.record(Call::TexImage2D {
      internal_format,
      width,
      height,
      format,
      ty,
      pixels: pixels.map(|p| p.to_vec()),
    });
  }

  fn create_buffer(&self) -> BufferId {
    let id = BufferId(self.next_handle());
    self.record(Call::CreateBuffer(id));
    id
  }

  fn delete_buffer(&self, buffer: BufferId) {
    self.record(Call::DeleteBuffer(buffer));
  }

  fn bind_buffer(&self, target: u32, buffer: BufferId) {
    self.record(Call::BindBuffer(target, buffer));
  }

  fn buffer_data(&self, target: u32, data: &[u8], _usage: u32) {
    self.record(Call::BufferData(target, data.to_vec()));
  }

  fn create_framebuffer(&self) -> FramebufferId {
    let id = FramebufferId(self.next_handle());
    self.record(Call::CreateFramebuffer(id));
    id
  }

  fn delete_framebuffer(&self, framebuffer: FramebufferId) {
    self.record(Call::DeleteFramebuffer(framebuffer));
  }

  fn bind_framebuffer(&self, _target: u32, framebuffer: FramebufferId) {
    self.inner.bound_framebuffer.set(framebuffer.0);
    self.record(Call::BindFramebuffer(framebuffer));
  }

  fn framebuffer_texture_2d(
    &self,
    _target: u32,
    _attachment: u32,
    _tex_target: u32,
    texture: TextureId,
    _level: i32,
  ) {
    self.record(Call::FramebufferTexture2D(texture));
  }

  fn check_framebuffer_status(&self, _target: u32) -> u32 {
    let renderable = self.inner.renderable.borrow();

    match (renderable.as_ref(), self.inner.last_tex_image.get()) {
      (None, _) => consts::FRAMEBUFFER_COMPLETE,
      (Some(triples), Some(triple)) if triples.contains(&triple) => consts::FRAMEBUFFER_COMPLETE,
      (Some(_), Some(_)) => consts::FRAMEBUFFER_UNSUPPORTED,
      (Some(_), None) => consts::FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
    }
  }

  fn invalidate_framebuffer(&self, _target: u32, attachment: u32) {
    self.record(Call::InvalidateFramebuffer(attachment));
  }

  fn create_shader(&self, ty: u32) -> ShaderId {
    let id = ShaderId(self.next_handle());
    self.record(Call::CreateShader(ty, id));
    id
  }

  fn shader_source(&self, _shader: ShaderId, _source: &str) {}

  fn compile_shader(&self, _shader: ShaderId) {}

  fn get_shader_i(&self, _shader: ShaderId, pname: u32) -> i32 {
    match pname {
      consts::COMPILE_STATUS => self.inner.compile_failure.borrow().is_none() as i32,
      _ => 0,
    }
  }

  fn get_shader_info_log(&self, _shader: ShaderId) -> String {
    self.inner.compile_failure.borrow().clone().unwrap_or_default()
  }

  fn delete_shader(&self, shader: ShaderId) {
    self.record(Call::DeleteShader(shader));
  }

  fn create_program(&self) -> ProgramId {
    let id = ProgramId(self.next_handle());
    self.record(Call::CreateProgram(id));
    id
  }

  fn attach_shader(&self, program: ProgramId, shader: ShaderId) {
    self.record(Call::AttachShader(program, shader));
  }

  fn bind_attrib_location(&self, _program: ProgramId, index: u32, name: &str) {
    self.record(Call::BindAttribLocation(index, name.to_owned()));
  }

  fn link_program(&self, program: ProgramId) {
    self.record(Call::LinkProgram(program));
  }

  fn get_program_i(&self, _program: ProgramId, pname: u32) -> i32 {
    match pname {
      consts::LINK_STATUS => self.inner.link_failure.borrow().is_none() as i32,
      _ => 0,
    }
  }

  fn get_program_info_log(&self, _program: ProgramId) -> String {
    self.inner.link_failure.borrow().clone().unwrap_or_default()
  }

  fn delete_program(&self, program: ProgramId) {
    self.record(Call::DeleteProgram(program));
  }

  fn use_program(&self, program: ProgramId) {
    self.record(Call::UseProgram(program));
  }

  fn get_uniform_location(&self, _program: ProgramId, name: &str) -> UniformId {
    if self.inner.inactive_uniforms.borrow().contains(name) {
      return UniformId::INVALID;
    }

    let mut uniforms = self.inner.uniforms.borrow_mut();
    let next = uniforms.len() as i32;
    UniformId(*uniforms.entry(name.to_owned()).or_insert(next))
  }

  fn uniform_1i(&self, location: UniformId, v: i32) {
    self.record(Call::Uniform1i(location, v));
  }

  fn uniform_1f(&self, location: UniformId, v0: f32) {
    self.record(Call::Uniform1f(location, v0));
  }

  fn uniform_2f(&self, location: UniformId, v0: f32, v1: f32) {
    self.record(Call::Uniform2f(location, v0, v1));
  }

  fn uniform_3f(&self, location: UniformId, v0: f32, v1: f32, v2: f32) {
    self.record(Call::Uniform3f(location, v0, v1, v2));
  }

  fn uniform_4f(&self, location: UniformId, v0: f32, v1: f32, v2: f32, v3: f32) {
    self.record(Call::Uniform4f(location, v0, v1, v2, v3));
  }

  fn enable_vertex_attrib_array(&self, index: u32) {
    self.record(Call::EnableVertexAttribArray(index));
  }

  fn disable_vertex_attrib_array(&self, index: u32) {
    self.record(Call::DisableVertexAttribArray(index));
  }

  fn vertex_attrib_pointer(
    &self,
    index: u32,
    size: i32,
    ty: u32,
    _normalized: bool,
    stride: i32,
    offset: usize,
  ) {
    self.record(Call::VertexAttribPointer {
      index,
      size,
      ty,
      stride,
      offset,
    });
  }

  fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
    self.record(Call::DrawArrays(mode, first, count));
  }

  fn draw_elements(&self, mode: u32, count: i32, ty: u32, offset: usize) {
    self.record(Call::DrawElements(mode, count, ty, offset));
  }

  fn create_query(&self) -> QueryId {
    let id = QueryId(self.next_handle());
    self.record(Call::CreateQuery(id));
    id
  }

  fn delete_query(&self, query: QueryId) {
    self.record(Call::DeleteQuery(query));
  }

  fn begin_query(&self, target: u32, query: QueryId) {
    self.record(Call::BeginQuery(target, query));
  }

  fn end_query(&self, target: u32) {
    self.record(Call::EndQuery(target));
  }

  fn get_query_object_u(&self, _query: QueryId, pname: u32) -> u32 {
    match pname {
      consts::QUERY_RESULT_AVAILABLE => self.inner.query_ready.get() as u32,
      consts::QUERY_RESULT => self.inner.query_result.get(),
      _ => 0,
    }
  }
}
