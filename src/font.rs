//! Font store lookup.
//!
//! The font store is a flat directory of `.ttf` files named in lowercase
//! after the family names callers pass. Filesystem IO happens only here;
//! the render path works from the resolved path.

use std::path::{Path, PathBuf};

use crate::error::{TypeinkError, TypeinkResult};

/// A validated font directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontDir {
    dir: PathBuf,
}

impl FontDir {
    /// Fails unless `dir` exists and is a directory.
    pub fn new(dir: impl Into<PathBuf>) -> TypeinkResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(TypeinkError::config(format!(
                "font directory '{}' does not exist",
                dir.display()
            )));
        }
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Resolve the first candidate (fallback appended last) whose
    /// normalized name has a `.ttf` file in the store.
    pub fn resolve<S: AsRef<str>>(
        &self,
        candidates: &[S],
        fallback: Option<&str>,
    ) -> Option<PathBuf> {
        for name in candidates.iter().map(AsRef::as_ref).chain(fallback) {
            let file = self.dir.join(format!("{}.ttf", normalize(name)));
            if file.is_file() {
                tracing::debug!(font = name, path = %file.display(), "resolved font");
                return Some(file);
            }
            tracing::trace!(font = name, "font candidate not present");
        }
        None
    }

    /// Lowercase stems of the `.ttf` files present, sorted.
    pub fn available(&self) -> TypeinkResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("ttf")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Strip surrounding quotes and whitespace, lowercase.
fn normalize(name: &str) -> String {
    name.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "typeink_{name}_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn normalize_strips_quotes_and_case() {
        assert_eq!(normalize("  \"Faruma\"  "), "faruma");
        assert_eq!(normalize("'A Waheed'"), "a waheed");
        assert_eq!(normalize("MvTyper"), "mvtyper");
    }

    #[test]
    fn new_rejects_missing_directory() {
        let err = FontDir::new("/nonexistent/typeink-fonts").unwrap_err();
        assert!(err.to_string().contains("config error:"));
    }

    #[test]
    fn resolve_picks_first_existing_candidate() {
        let tmp = temp_dir("resolve_first");
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("bar.ttf"), b"stub").unwrap();
        std::fs::write(tmp.join("baz.ttf"), b"stub").unwrap();

        let dir = FontDir::new(&tmp).unwrap();
        let hit = dir.resolve(&["Foo", "Bar"], Some("Baz")).unwrap();
        assert_eq!(hit, tmp.join("bar.ttf"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn resolve_falls_back_then_gives_up() {
        let tmp = temp_dir("resolve_fallback");
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("default.ttf"), b"stub").unwrap();

        let dir = FontDir::new(&tmp).unwrap();
        let hit = dir.resolve(&["Arial"], Some("Default")).unwrap();
        assert_eq!(hit, tmp.join("default.ttf"));
        assert_eq!(dir.resolve(&["Arial"], Some("Helvetica")), None);
        assert_eq!(dir.resolve(&[] as &[&str], None), None);

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn resolve_normalizes_quoted_names() {
        let tmp = temp_dir("resolve_quoted");
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("faruma.ttf"), b"stub").unwrap();

        let dir = FontDir::new(&tmp).unwrap();
        let hit = dir.resolve(&[" \"Faruma\" "], None).unwrap();
        assert_eq!(hit, tmp.join("faruma.ttf"));

        std::fs::remove_dir_all(&tmp).ok();
    }

    #[test]
    fn available_lists_sorted_stems() {
        let tmp = temp_dir("available");
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("b.ttf"), b"stub").unwrap();
        std::fs::write(tmp.join("a.ttf"), b"stub").unwrap();
        std::fs::write(tmp.join("notes.txt"), b"stub").unwrap();

        let dir = FontDir::new(&tmp).unwrap();
        assert_eq!(dir.available().unwrap(), vec!["a", "b"]);

        std::fs::remove_dir_all(&tmp).ok();
    }
}
