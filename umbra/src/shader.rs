//! Shader metadata.
//!
//! Shader source code is opaque to backends. What they need instead is a description of what the
//! shader declares: its vertex inputs, the layout of its uniform block and its texture samplers.
//! That description is usually generated offline, along with the sources themselves.

/// Scalar type of a vertex input component or of a uniform component.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum DataType {
  /// 32-bit IEEE-754 float.
  Float,
  /// 16-bit signed integer.
  Short,
}

impl DataType {
  /// Size in bytes of a single component of this type.
  pub fn size(self) -> usize {
    match self {
      DataType::Float => 4,
      DataType::Short => 2,
    }
  }
}

/// A vertex input declared by a vertex shader.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputLocation {
  /// Name of the attribute in the shader source.
  pub name: String,
  /// Attribute location the input is bound to.
  pub location: u32,
  /// Component type.
  pub ty: DataType,
  /// Number of components (1 to 4).
  pub size: usize,
}

/// How a vertex input is laid out in a vertex buffer.
///
/// Input descriptors are paired one-to-one, in order, with the [`InputLocation`]s of the vertex
/// shader they feed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InputDesc {
  /// Component type.
  pub ty: DataType,
  /// Number of components (1 to 4).
  pub size: usize,
  /// Offset in bytes of the first component, relative to the start of a vertex.
  pub offset: usize,
}

/// Location of a single uniform inside a shader stage’s logical uniform block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UniformLocation {
  /// Name of the uniform, as the native API knows it.
  pub name: String,
  /// Component type.
  pub ty: DataType,
  /// Number of components.
  pub size: usize,
  /// Offset in bytes of the uniform inside the block.
  pub offset: usize,
}

/// Layout of a shader stage’s uniform block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UniformsReflection {
  /// Every uniform of the block, in declaration order.
  pub locations: Vec<UniformLocation>,
  /// Size in bytes of the whole block.
  pub size: usize,
}

/// A texture sampler declared by a shader, and the texture unit it reads from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextureBinding {
  /// Name of the sampler uniform.
  pub name: String,
  /// Texture unit.
  pub binding: u32,
}

/// Source code and reflection metadata of a single shader stage.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ShaderSources {
  /// Human-readable name, used in diagnostics.
  pub name: String,
  /// GLSL source code targetting the oldest supported profile (GLSL ES 1.00).
  pub glsl100es: String,
  /// Vertex inputs; empty for fragment shaders.
  pub inputs: Vec<InputLocation>,
  /// Uniform block layout.
  pub uniforms: UniformsReflection,
  /// Texture samplers.
  pub textures: Vec<TextureBinding>,
}
