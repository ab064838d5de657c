//! Vertex input layouts.
//!
//! An input layout tells how the vertex inputs of a vertex shader are laid out in a vertex
//! buffer. Binding one is lazy: the attribute pointers are only set up on the next draw, once the
//! vertex buffer is known as well.

use std::cell::RefCell;
use std::error;
use std::fmt;
use std::rc::Rc;

use umbra::{InputDesc, ShaderSources};

use crate::api::Gl;
use crate::state::GLState;

/// Mismatch between a vertex shader and the layout supposed to feed it.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InputLayoutError {
  /// The number of inputs doesn’t match.
  InputCount {
    /// Number of inputs the shader declares.
    expected: usize,
    /// Number of inputs of the layout.
    got: usize,
  },
  /// The number of components of an input doesn’t match.
  InputSize {
    /// Index of the input.
    index: usize,
    /// Name of the input in the shader.
    name: String,
    /// Number of components the shader declares.
    expected: usize,
    /// Number of components of the layout.
    got: usize,
  },
}

impl fmt::Display for InputLayoutError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      InputLayoutError::InputCount { expected, got } => {
        write!(f, "got {} inputs, expected {}", got, expected)
      }

      InputLayoutError::InputSize {
        index,
        ref name,
        expected,
        got,
      } => write!(
        f,
        "data size mismatch for {:?} (input {}): got {} expected {}",
        name, index, got, expected
      ),
    }
  }
}

impl error::Error for InputLayoutError {}

#[derive(Debug)]
pub(crate) struct LayoutRepr {
  // (attribute location, descriptor) pairs, in shader declaration order
  inputs: Vec<(u32, InputDesc)>,
}

impl LayoutRepr {
  pub(crate) fn inputs(&self) -> impl Iterator<Item = (u32, InputDesc)> + '_ {
    self.inputs.iter().copied()
  }
}

/// Vertex input layout.
#[derive(Debug)]
pub struct InputLayout<G>
where
  G: Gl,
{
  pub(crate) repr: Rc<LayoutRepr>,
  state: Rc<RefCell<GLState<G>>>,
}

impl<G> Drop for InputLayout<G>
where
  G: Gl,
{
  fn drop(&mut self) {
    self.state.borrow_mut().forget_layout(&self.repr);
  }
}

impl<G> InputLayout<G>
where
  G: Gl,
{
  pub(crate) fn new(
    state: &Rc<RefCell<GLState<G>>>,
    vs: &ShaderSources,
    layout: &[InputDesc],
  ) -> Result<Self, InputLayoutError> {
    if vs.inputs.len() != layout.len() {
      return Err(InputLayoutError::InputCount {
        expected: vs.inputs.len(),
        got: layout.len(),
      });
    }

    for (index, (input, desc)) in vs.inputs.iter().zip(layout).enumerate() {
      if input.size != desc.size {
        return Err(InputLayoutError::InputSize {
          index,
          name: input.name.clone(),
          expected: input.size,
          got: desc.size,
        });
      }
    }

    let inputs = vs
      .inputs
      .iter()
      .zip(layout)
      .map(|(input, desc)| (input.location, *desc))
      .collect();

    Ok(InputLayout {
      repr: Rc::new(LayoutRepr { inputs }),
      state: state.clone(),
    })
  }

  /// Use this layout for the next draws.
  pub fn bind(&self) {
    self.state.borrow_mut().bind_layout(&self.repr);
  }

  /// Destroy the layout.
  pub fn release(self) {}
}
