//! Path history stack anchored at the browser's base path.

use std::path::Path;

/// Immutable stack of visited directories.
///
/// The bottom entry is always the base path and the stack is never empty,
/// so [`current`](Self::current) is always defined. Every mutation returns
/// a **new** `PathHistory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathHistory {
    base: String,
    stack: Vec<String>,
}

impl PathHistory {
    /// Creates a history containing only `base`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            stack: vec![base.clone()],
            base,
        }
    }

    /// Pushes `path` as the new current directory. Returns a new `PathHistory`.
    pub fn push(&self, path: impl Into<String>) -> Self {
        let mut stack = self.stack.clone();
        stack.push(path.into());
        Self {
            base: self.base.clone(),
            stack,
        }
    }

    /// Pops the current directory. Returns the new history and the path to
    /// navigate to, or `None` when already at the bottom or when the target
    /// would leave the base path.
    pub fn go_back(&self) -> Option<(Self, String)> {
        if self.stack.len() <= 1 {
            return None;
        }
        let mut stack = self.stack.clone();
        stack.pop();
        let target = stack.last()?.clone();
        if !is_within(&self.base, &target) {
            tracing::warn!(base = %self.base, %target, "refusing to navigate above base path");
            return None;
        }
        Some((
            Self {
                base: self.base.clone(),
                stack,
            },
            target,
        ))
    }

    /// The directory on top of the stack.
    pub fn current(&self) -> &str {
        self.stack.last().map_or(self.base.as_str(), String::as_str)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Number of entries, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// Bottom-to-top view of the stack.
    pub fn paths(&self) -> &[String] {
        &self.stack
    }
}

/// `true` if `path` equals `base` or is nested below it, compared by
/// path components (so `/rootx` is not inside `/root`).
pub fn is_within(base: &str, path: &str) -> bool {
    Path::new(path).starts_with(Path::new(base))
}

/// Path of `current` relative to `base` for display: `/` for the base
/// itself, `/sub/dir` for nested paths, and `current` unchanged otherwise.
pub fn relative_path(base: &str, current: &str) -> String {
    match Path::new(current).strip_prefix(Path::new(base)) {
        Ok(rest) if rest.as_os_str().is_empty() => "/".to_string(),
        Ok(rest) => format!("/{}", rest.to_string_lossy()),
        Err(_) => current.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_history_holds_only_base() {
        let history = PathHistory::new("/root");
        assert_eq!(history.current(), "/root");
        assert_eq!(history.depth(), 1);
        assert!(!history.can_go_back());
    }

    #[test]
    fn push_sets_current() {
        let history = PathHistory::new("/root").push("/root/src");
        assert_eq!(history.current(), "/root/src");
        assert_eq!(history.depth(), 2);
        assert!(history.can_go_back());
    }

    #[test]
    fn push_does_not_mutate_original() {
        let history = PathHistory::new("/root");
        let _pushed = history.push("/root/src");
        assert_eq!(history.depth(), 1);
    }

    #[test]
    fn go_back_at_base_is_none() {
        let history = PathHistory::new("/root");
        assert!(history.go_back().is_none());
        assert_eq!(history.current(), "/root");
    }

    #[test]
    fn go_back_returns_previous_path() {
        let history = PathHistory::new("/root").push("/root/a").push("/root/a/b");

        let (history, path) = history.go_back().unwrap();
        assert_eq!(path, "/root/a");
        assert_eq!(history.current(), "/root/a");

        let (history, path) = history.go_back().unwrap();
        assert_eq!(path, "/root");
        assert_eq!(history.paths(), ["/root".to_string()]);

        assert!(history.go_back().is_none());
    }

    #[test]
    fn go_back_refuses_target_outside_base() {
        // A search hit outside the base, then another hop.
        let history = PathHistory::new("/root").push("/elsewhere").push("/elsewhere/x");
        assert!(history.go_back().is_none());
        assert_eq!(history.current(), "/elsewhere/x");
        assert_eq!(history.depth(), 3);
    }

    #[test]
    fn stack_is_never_empty() {
        let mut history = PathHistory::new("/root").push("/root/a");
        while let Some((next, _)) = history.go_back() {
            history = next;
        }
        assert_eq!(history.depth(), 1);
        assert_eq!(history.current(), "/root");
    }

    #[test]
    fn is_within_compares_components() {
        assert!(is_within("/root", "/root"));
        assert!(is_within("/root", "/root/a/b"));
        assert!(!is_within("/root", "/rootx"));
        assert!(!is_within("/root", "/"));
    }

    #[test]
    fn relative_path_for_display() {
        assert_eq!(relative_path("/root", "/root"), "/");
        assert_eq!(relative_path("/root", "/root/src/bin"), "/src/bin");
        assert_eq!(relative_path("/root", "/other"), "/other");
    }
}
