//! State-tracking OpenGL backend for umbra.
//!
//! This crate drives an immediate-mode graphics API with global, mutable binding state (OpenGL
//! ES 2.0 and anything newer) behind the small command interface described in [umbra]: create
//! textures, buffers, programs and framebuffers, bind them, draw.
//!
//! Three things happen under the hood:
//!
//! - Redundant state changes are eliminated. Every binding goes through a shadow of the native
//!   binding state, so asking for what is already bound is free.
//! - Uniform buffers are emulated. The oldest supported profile has no uniform buffer objects, so
//!   uniform buffers live in host memory and their content is pushed to individual uniforms right
//!   before a draw, exactly once per change.
//! - Texture formats are negotiated. At startup, the version and extension strings are probed
//!   and candidate floating point formats are validated by actually rendering into them.
//!
//! The native API itself is abstracted by the [`Gl`] trait. With the default `gl` feature,
//! [`GlFns`] implements it on top of the [gl](https://crates.io/crates/gl) crate.

pub mod api;
pub mod backend;
pub mod buffer;
pub mod format;
pub mod framebuffer;
pub mod query;
pub mod shader;
mod state;
pub mod texture;
pub mod version;
pub mod vertex;
pub mod violation;

pub use crate::backend::{Backend, BackendError, BackendOpt};
pub use crate::buffer::Buffer;
pub use crate::format::{FormatError, TextureTriple};
pub use crate::framebuffer::{Framebuffer, FramebufferError};
#[cfg(feature = "gl")]
pub use crate::api::GlFns;
pub use crate::api::Gl;
pub use crate::query::Timer;
pub use crate::shader::{Program, ProgramError, StageType};
pub use crate::texture::Texture;
pub use crate::version::{Extensions, GlVersion, VersionError};
pub use crate::vertex::{InputLayout, InputLayoutError};
pub use crate::violation::InvariantViolation;
