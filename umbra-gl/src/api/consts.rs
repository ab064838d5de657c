//! Raw OpenGL enum values.
//!
//! Only the values the backend uses are listed. Some of them come from OpenGL ES 2.0 extensions
//! and aren’t part of desktop core profiles.

pub const FALSE: u32 = 0;
pub const TRUE: u32 = 1;
pub const NO_ERROR: u32 = 0;

// strings and limits
pub const VERSION: u32 = 0x1F02;
pub const EXTENSIONS: u32 = 0x1F03;
pub const NUM_EXTENSIONS: u32 = 0x821D;
pub const MAX_TEXTURE_SIZE: u32 = 0x0D33;

// capabilities
pub const DEPTH_TEST: u32 = 0x0B71;
pub const BLEND: u32 = 0x0BE2;

// depth functions
pub const GREATER: u32 = 0x0204;
pub const GEQUAL: u32 = 0x0206;

// blending factors
pub const ZERO: u32 = 0;
pub const ONE: u32 = 1;
pub const ONE_MINUS_SRC_ALPHA: u32 = 0x0303;
pub const DST_COLOR: u32 = 0x0306;

// clear mask
pub const DEPTH_BUFFER_BIT: u32 = 0x0100;
pub const COLOR_BUFFER_BIT: u32 = 0x4000;

// primitives
pub const TRIANGLES: u32 = 0x0004;
pub const TRIANGLE_STRIP: u32 = 0x0005;

// data types
pub const UNSIGNED_BYTE: u32 = 0x1401;
pub const SHORT: u32 = 0x1402;
pub const UNSIGNED_SHORT: u32 = 0x1403;
pub const FLOAT: u32 = 0x1406;
pub const HALF_FLOAT: u32 = 0x140B;
pub const HALF_FLOAT_OES: u32 = 0x8D61;

// textures
pub const TEXTURE_2D: u32 = 0x0DE1;
pub const TEXTURE0: u32 = 0x84C0;
pub const TEXTURE_MAG_FILTER: u32 = 0x2800;
pub const TEXTURE_MIN_FILTER: u32 = 0x2801;
pub const TEXTURE_WRAP_S: u32 = 0x2802;
pub const TEXTURE_WRAP_T: u32 = 0x2803;
pub const NEAREST: u32 = 0x2600;
pub const LINEAR: u32 = 0x2601;
pub const CLAMP_TO_EDGE: u32 = 0x812F;

// pixel formats
pub const RED: u32 = 0x1903;
pub const RGBA: u32 = 0x1908;
pub const LUMINANCE: u32 = 0x1909;
pub const R8: u32 = 0x8229;
pub const R16F: u32 = 0x822D;
pub const SRGB_ALPHA_EXT: u32 = 0x8C42;
pub const SRGB8_ALPHA8: u32 = 0x8C43;

// buffers
pub const ARRAY_BUFFER: u32 = 0x8892;
pub const ELEMENT_ARRAY_BUFFER: u32 = 0x8893;
pub const STATIC_DRAW: u32 = 0x88E4;

// framebuffers
pub const FRAMEBUFFER: u32 = 0x8D40;
pub const FRAMEBUFFER_BINDING: u32 = 0x8CA6;
pub const COLOR_ATTACHMENT0: u32 = 0x8CE0;
pub const FRAMEBUFFER_COMPLETE: u32 = 0x8CD5;
pub const FRAMEBUFFER_INCOMPLETE_ATTACHMENT: u32 = 0x8CD6;
pub const FRAMEBUFFER_UNSUPPORTED: u32 = 0x8CDD;

// shaders
pub const FRAGMENT_SHADER: u32 = 0x8B30;
pub const VERTEX_SHADER: u32 = 0x8B31;
pub const COMPILE_STATUS: u32 = 0x8B81;
pub const LINK_STATUS: u32 = 0x8B82;
pub const INFO_LOG_LENGTH: u32 = 0x8B84;

// queries
pub const QUERY_RESULT: u32 = 0x8866;
pub const QUERY_RESULT_AVAILABLE: u32 = 0x8867;
pub const TIME_ELAPSED_EXT: u32 = 0x88BF;
pub const GPU_DISJOINT_EXT: u32 = 0x8FBB;
