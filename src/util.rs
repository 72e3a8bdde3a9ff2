//! Small utility helpers used across modules.

use std::path::Path;

/// File base name without its final extension.
/// This is the challenge name, i.e. the namespace for identifiers
/// ("levels/intro.enc" and "levels/intro.md" both map to "intro").
pub fn basename_from_path(path: &Path) -> String {
  path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn strips_directory_and_extension() {
    assert_eq!(basename_from_path(Path::new("levels/intro.md")), "intro");
    assert_eq!(basename_from_path(Path::new("intro.enc")), "intro");
    assert_eq!(basename_from_path(Path::new("intro")), "intro");
    // Only the last extension goes.
    assert_eq!(basename_from_path(Path::new("a/b/c.tar.gz")), "c.tar");
  }
}
