//! Backtrace path normalization.
//!
//! Binaries built inside a container compile from a build directory such as
//! `/src/`, so captured file paths lose the repository location. The
//! normalizer strips the build directory and re-roots the path under the
//! configured repository prefix.

use crate::notice::types::StackFrame;

/// Rewrites captured frames into repository-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacktraceNormalizer {
    source_path_prefix: Option<String>,
    build_root: String,
}

impl BacktraceNormalizer {
    pub fn new(source_path_prefix: Option<String>, build_root: impl Into<String>) -> Self {
        Self {
            source_path_prefix: source_path_prefix.filter(|p| !p.is_empty()),
            build_root: build_root.into(),
        }
    }

    /// Normalize a single frame.
    ///
    /// Without a prefix the frame is returned unchanged.
    pub fn normalize(&self, frame: &StackFrame) -> StackFrame {
        let Some(prefix) = &self.source_path_prefix else {
            return frame.clone();
        };

        let relative = self.strip_build_root(&frame.file);

        StackFrame {
            file: join_path(prefix, relative),
            line: frame.line,
            function: frame.function.clone(),
        }
    }

    /// Strip `build_root` only when it ends at a path component boundary.
    fn strip_build_root<'a>(&self, file: &'a str) -> &'a str {
        if self.build_root.is_empty() {
            return file;
        }
        match file.strip_prefix(self.build_root.as_str()) {
            Some(rest) if self.build_root.ends_with('/') || rest.is_empty() || rest.starts_with('/') => rest,
            _ => file,
        }
    }
}

fn join_path(prefix: &str, relative: &str) -> String {
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let relative = relative.strip_prefix('/').unwrap_or(relative);
    format!("{}/{}", prefix, relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(file: &str) -> StackFrame {
        StackFrame::new(file, 42, "Query")
    }

    #[test]
    fn test_strips_build_root() {
        let normalizer = BacktraceNormalizer::new(Some("github.com/org/app".into()), "/src/");
        let out = normalizer.normalize(&frame("/src/app/db.go"));

        assert_eq!(out.file, "github.com/org/app/app/db.go");
        assert_eq!(out.line, 42);
        assert_eq!(out.function, "Query");
    }

    #[test]
    fn test_no_prefix_passes_through() {
        let normalizer = BacktraceNormalizer::new(None, "/src/");
        assert_eq!(normalizer.normalize(&frame("/src/app/db.go")), frame("/src/app/db.go"));

        let empty = BacktraceNormalizer::new(Some(String::new()), "/src/");
        assert_eq!(empty.normalize(&frame("/src/app/db.go")), frame("/src/app/db.go"));
    }

    #[test]
    fn test_missing_build_root_is_noop() {
        let normalizer = BacktraceNormalizer::new(Some("github.com/org/app".into()), "/src/");

        let relative = normalizer.normalize(&frame("src/hook/layer.rs"));
        assert_eq!(relative.file, "github.com/org/app/src/hook/layer.rs");

        let elsewhere = normalizer.normalize(&frame("/home/build/lib.rs"));
        assert_eq!(elsewhere.file, "github.com/org/app/home/build/lib.rs");
    }

    #[test]
    fn test_build_root_matches_whole_components() {
        let normalizer = BacktraceNormalizer::new(Some("github.com/org/app".into()), "/src");

        assert_eq!(
            normalizer.normalize(&frame("/srcfoo/x.go")).file,
            "github.com/org/app/srcfoo/x.go"
        );
        assert_eq!(
            normalizer.normalize(&frame("/src/app/db.go")).file,
            "github.com/org/app/app/db.go"
        );
    }

    #[test]
    fn test_trailing_slash_not_doubled() {
        let normalizer = BacktraceNormalizer::new(Some("github.com/org/app/".into()), "/src/");
        assert_eq!(
            normalizer.normalize(&frame("/src/main.rs")).file,
            "github.com/org/app/main.rs"
        );
    }

    #[test]
    fn test_empty_path() {
        let normalizer = BacktraceNormalizer::new(Some("repo".into()), "/src/");
        assert_eq!(normalizer.normalize(&frame("")).file, "repo/");
    }
}
