//! Driver version and extensions.

use std::error;
use std::fmt;

/// OpenGL ES version of the running driver.
///
/// Desktop OpenGL versions are taken as-is; WebGL versions are mapped onto the OpenGL ES version
/// they are based on (WebGL 1 is OpenGL ES 2, WebGL 2 is OpenGL ES 3).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GlVersion {
  /// Major version.
  pub major: u32,
  /// Minor version.
  pub minor: u32,
}

impl GlVersion {
  /// Create a version from its components.
  pub const fn new(major: u32, minor: u32) -> Self {
    GlVersion { major, minor }
  }

  /// Parse the string returned by `glGetString(GL_VERSION)`.
  ///
  /// The recognized forms are, in order:
  ///
  /// - `"OpenGL ES <major>.<minor> <vendor-specific>"`;
  /// - `"WebGL <major>.<minor> <vendor-specific>"`;
  /// - `"<major>.<minor><vendor-specific>"` (desktop OpenGL).
  pub fn parse(version: &str) -> Result<Self, VersionError> {
    let parsed = if let Some(rest) = version.strip_prefix("OpenGL ES ") {
      parse_major_minor(rest)
    } else if let Some(rest) = version.strip_prefix("WebGL ") {
      parse_major_minor(rest).map(|v| GlVersion::new(v.major + 1, v.minor))
    } else {
      parse_major_minor(version)
    };

    parsed.ok_or_else(|| VersionError::new(version))
  }
}

impl fmt::Display for GlVersion {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

// Parse a leading "<major>.<minor>" and ignore whatever follows the minor number.
fn parse_major_minor(s: &str) -> Option<GlVersion> {
  let (major, rest) = s.split_once('.')?;
  let minor_len = rest
    .find(|c: char| !c.is_ascii_digit())
    .unwrap_or(rest.len());

  let major = major.parse().ok()?;
  let minor = rest[..minor_len].parse().ok()?;

  Some(GlVersion::new(major, minor))
}

/// Unrecognized version string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VersionError {
  version: String,
}

impl VersionError {
  fn new(version: impl Into<String>) -> Self {
    VersionError {
      version: version.into(),
    }
  }

  /// The version string that couldn’t be parsed.
  pub fn version(&self) -> &str {
    &self.version
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "failed to parse OpenGL ES version ({})", self.version)
  }
}

impl error::Error for VersionError {}

/// Extensions advertised by the driver.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Extensions {
  names: Vec<String>,
}

impl Extensions {
  /// Split the space-separated string returned by `glGetString(GL_EXTENSIONS)`.
  pub fn parse(extensions: &str) -> Self {
    Extensions {
      names: extensions.split_whitespace().map(str::to_owned).collect(),
    }
  }

  /// Whether an extension is advertised. Names must match exactly.
  pub fn has(&self, name: &str) -> bool {
    self.names.iter().any(|n| n == name)
  }

  /// Iterate over the advertised extensions.
  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.names.iter().map(String::as_str)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_gles() {
    assert_eq!(
      GlVersion::parse("OpenGL ES 2.0 build 1.8@905891"),
      Ok(GlVersion::new(2, 0))
    );
    assert_eq!(
      GlVersion::parse("OpenGL ES 3.2 V@415.0"),
      Ok(GlVersion::new(3, 2))
    );
  }

  #[test]
  fn parse_webgl() {
    assert_eq!(
      GlVersion::parse("WebGL 1.0 (OpenGL ES 2.0 Chromium)"),
      Ok(GlVersion::new(2, 0))
    );
    assert_eq!(GlVersion::parse("WebGL 2.0"), Ok(GlVersion::new(3, 0)));
  }

  #[test]
  fn parse_desktop() {
    assert_eq!(
      GlVersion::parse("4.6.0 NVIDIA 470.57.02"),
      Ok(GlVersion::new(4, 6))
    );
    assert_eq!(
      GlVersion::parse("3.3 (Core Profile) Mesa 21.0.3"),
      Ok(GlVersion::new(3, 3))
    );
  }

  #[test]
  fn parse_garbage() {
    let err = GlVersion::parse("Direct3D 11").unwrap_err();
    assert_eq!(err.version(), "Direct3D 11");
    assert_eq!(
      err.to_string(),
      "failed to parse OpenGL ES version (Direct3D 11)"
    );

    assert!(GlVersion::parse("").is_err());
    assert!(GlVersion::parse("OpenGL ES x.0").is_err());
  }

  #[test]
  fn extensions_match_exactly() {
    let exts = Extensions::parse("GL_OES_texture_half_float  GL_EXT_sRGB\n");

    assert!(exts.has("GL_EXT_sRGB"));
    assert!(exts.has("GL_OES_texture_half_float"));
    assert!(!exts.has("GL_OES_texture_half_float_linear"));
    assert!(!exts.has(""));
    assert_eq!(exts.iter().count(), 2);
  }
}
