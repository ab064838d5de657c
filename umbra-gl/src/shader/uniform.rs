//! Uniform buffer emulation.
//!
//! A [`UniformTracker`] knows where every uniform of a shader stage lives inside the stage’s
//! logical uniform block, and which (emulated) uniform buffer currently feeds that block. The
//! buffer content is pushed to the native uniforms lazily, exactly once per buffer change.

use std::rc::Rc;

use umbra::{BufferType, DataType, UniformLocation, UniformsReflection};

use crate::api::{Gl, ProgramId, UniformId};
use crate::buffer::BufferRepr;
use crate::shader::ProgramError;
use crate::violation::InvariantViolation;

#[derive(Clone, Debug, Eq, PartialEq)]
struct TrackedUniform {
  location: UniformId,
  offset: usize,
  ty: DataType,
  size: usize,
}

#[derive(Debug)]
pub(crate) struct UniformTracker {
  uniforms: Vec<TrackedUniform>,
  // size in bytes of the uniform block
  size: usize,
  buffer: Option<Rc<BufferRepr>>,
  // buffer version last pushed down; None forces the next update
  version: Option<u64>,
}

impl UniformTracker {
  /// Resolve the native location of every uniform of a block.
  ///
  /// Only 1 to 4 float vectors lying entirely inside the block can be emulated; anything else is
  /// rejected here so that [`UniformTracker::update`] never stops halfway.
  pub(crate) fn setup<G>(
    ctx: &G,
    program: ProgramId,
    reflection: &UniformsReflection,
  ) -> Result<Self, ProgramError>
  where
    G: Gl,
  {
    let uniforms = reflection
      .locations
      .iter()
      .map(|uniform| track_uniform(ctx, program, uniform, reflection.size))
      .collect::<Result<_, _>>()?;

    Ok(UniformTracker {
      uniforms,
      size: reflection.size,
      buffer: None,
      version: None,
    })
  }

  /// Feed the uniform block from `buffer`.
  pub(crate) fn set_buffer(&mut self, buffer: Rc<BufferRepr>) -> Result<(), InvariantViolation> {
    if buffer.ty() != BufferType::Uniforms {
      return Err(InvariantViolation::WrongBufferType {
        expected: BufferType::Uniforms,
        found: buffer.ty(),
      });
    }

    if buffer.size() < self.size {
      return Err(InvariantViolation::UniformBufferTooSmall {
        got: buffer.size(),
        need: self.size,
      });
    }

    self.buffer = Some(buffer);
    self.version = None;

    Ok(())
  }

  /// Push the buffer content down if it changed since the last time.
  ///
  /// Every value is read before the first one is pushed: either all uniforms are updated or none
  /// is.
  pub(crate) fn update<G>(&mut self, ctx: &G) -> Result<(), InvariantViolation>
  where
    G: Gl,
  {
    let buffer = match self.buffer {
      Some(ref buffer) if self.version != Some(buffer.version()) => buffer,
      _ => return Ok(()),
    };

    let data = buffer
      .host_bytes()
      .ok_or(InvariantViolation::UnsupportedBufferType(buffer.ty()))?;

    let values = self
      .uniforms
      .iter()
      .map(|uniform| read_floats(uniform, &data))
      .collect::<Result<Vec<_>, _>>()?;

    for (uniform, v) in self.uniforms.iter().zip(values) {
      match uniform.size {
        1 => ctx.uniform_1f(uniform.location, v[0]),
        2 => ctx.uniform_2f(uniform.location, v[0], v[1]),
        3 => ctx.uniform_3f(uniform.location, v[0], v[1], v[2]),
        _ => ctx.uniform_4f(uniform.location, v[0], v[1], v[2], v[3]),
      }
    }

    self.version = Some(buffer.version());

    Ok(())
  }
}

fn track_uniform<G>(
  ctx: &G,
  program: ProgramId,
  uniform: &UniformLocation,
  block_size: usize,
) -> Result<TrackedUniform, ProgramError>
where
  G: Gl,
{
  if uniform.ty != DataType::Float || !(1..=4).contains(&uniform.size) {
    return Err(ProgramError::UnsupportedUniform {
      name: uniform.name.clone(),
      ty: uniform.ty,
      size: uniform.size,
    });
  }

  let len = uniform.size * uniform.ty.size();
  match uniform.offset.checked_add(len) {
    Some(end) if end <= block_size => (),
    _ => {
      return Err(ProgramError::UniformOutOfBounds {
        name: uniform.name.clone(),
        offset: uniform.offset,
        size: len,
        block_size,
      })
    }
  }

  let location = ctx.get_uniform_location(program, &uniform.name);

  if !location.is_valid() {
    return Err(ProgramError::UniformNotFound(uniform.name.clone()));
  }

  Ok(TrackedUniform {
    location,
    offset: uniform.offset,
    ty: uniform.ty,
    size: uniform.size,
  })
}

fn read_floats(uniform: &TrackedUniform, data: &[u8]) -> Result<[f32; 4], InvariantViolation> {
  let len = uniform.size * uniform.ty.size();
  let bytes = data
    .get(uniform.offset..uniform.offset + len)
    .ok_or(InvariantViolation::UniformOutOfBounds {
      offset: uniform.offset,
      size: len,
      len: data.len(),
    })?;

  let mut v = [0.; 4];
  for (component, chunk) in v.iter_mut().zip(bytes.chunks_exact(4)) {
    *component = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
  }

  Ok(v)
}
