//! # umbra
//!
//! Backend-neutral vocabulary shared between a render-command encoder and the graphics backends
//! that execute its commands.
//!
//! This crate doesn’t issue a single GPU command. It only defines the types both sides agree on:
//!
//! - [`Caps`] and [`Features`], describing what a backend can do once it’s been created.
//! - The small enums used to create and configure resources: [`TextureFormat`],
//!   [`TextureFilter`], [`BufferType`], [`DrawMode`], [`BlendFactor`], [`DepthFunc`],
//!   [`BufferAttachments`].
//! - Shader metadata in [`shader`]: shader sources are opaque strings, but backends need to know
//!   which vertex inputs, uniforms and texture samplers a shader declares, and where uniforms
//!   live inside their logical uniform block.
//!
//! Backend crates, such as `umbra-gl`, map these types onto native API calls.

#![deny(missing_docs)]

pub mod blending;
pub mod buffer;
pub mod caps;
pub mod depth_test;
pub mod framebuffer;
pub mod shader;
pub mod tess;
pub mod texture;

pub use crate::blending::BlendFactor;
pub use crate::buffer::BufferType;
pub use crate::caps::{Caps, Features};
pub use crate::depth_test::DepthFunc;
pub use crate::framebuffer::BufferAttachments;
pub use crate::shader::{
  DataType, InputDesc, InputLocation, ShaderSources, TextureBinding, UniformLocation,
  UniformsReflection,
};
pub use crate::tess::DrawMode;
pub use crate::texture::{TextureFilter, TextureFormat};
