// sri_manifest/src/core/path.rs

//! Derives the relative key under which a record's digest is stored.

use std::path::{Component, Path};

/// Returns `path` relative to `root`, with every separator written as `/`.
///
/// Both paths are normalized lexically first (`.` is dropped, `..` pops the
/// previous component). Components of `root` that are not shared with `path`
/// become `..` segments. No filesystem access is performed.
pub fn relative_path(root: &Path, path: &Path) -> String {
  let root_parts = normalized_components(root);
  let path_parts = normalized_components(path);

  let common = root_parts
    .iter()
    .zip(path_parts.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut segments: Vec<&str> = Vec::with_capacity(root_parts.len() - common + path_parts.len() - common);
  segments.extend(std::iter::repeat("..").take(root_parts.len() - common));
  segments.extend(path_parts[common..].iter().map(|part| part.as_str()));

  segments.join("/").replace('\\', "/")
}

fn normalized_components(path: &Path) -> Vec<String> {
  let mut parts: Vec<String> = Vec::new();
  // Number of leading prefix/root markers, which `..` can never pop.
  let mut anchored = 0;

  for component in path.components() {
    match component {
      Component::Prefix(prefix) => {
        parts.push(prefix.as_os_str().to_string_lossy().into_owned());
        anchored += 1;
      }
      Component::RootDir => {
        parts.push("/".to_string());
        anchored += 1;
      }
      Component::CurDir => {}
      Component::ParentDir => {
        if parts.len() > anchored && parts.last().map_or(false, |last| last != "..") {
          parts.pop();
        } else if anchored == 0 {
          parts.push("..".to_string());
        }
      }
      Component::Normal(segment) => parts.push(segment.to_string_lossy().into_owned()),
    }
  }
  parts
}
