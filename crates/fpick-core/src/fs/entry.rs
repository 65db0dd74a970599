//! File entry representation.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single file or directory entry as reported by a provider.
///
/// `FileEntry` is an immutable snapshot: create new instances via
/// [`FileEntry::new`] or [`FileEntry::from_metadata`] rather than mutating
/// existing ones. Directory sizes are reported as `0`.
///
/// # Examples
///
/// ```
/// use fpick_core::FileEntry;
///
/// let entry = FileEntry::new("/root/src/main.rs", "main.rs", false, 120);
/// assert_eq!(entry.extension(), Some("rs"));
/// assert!(!entry.is_directory());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    path: String,
    name: String,
    is_directory: bool,
    #[serde(default)]
    size: u64,
    #[serde(default)]
    extension: Option<String>,
}

/// Coarse classification of an entry, used by hosts to pick an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    Code,
    Text,
    Image,
    Other,
}

const CODE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "py", "rs", "go", "java", "cpp", "c", "h",
];
const TEXT_EXTENSIONS: &[&str] = &[
    "md", "txt", "json", "yaml", "yml", "toml", "xml", "html", "css",
];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

impl FileEntry {
    /// Creates an entry from its parts. The extension is derived from `name`.
    ///
    /// Directories never carry an extension and always have size `0`.
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        is_directory: bool,
        size: u64,
    ) -> Self {
        let name = name.into();
        let extension = if is_directory {
            None
        } else {
            extension_of(&name)
        };
        Self {
            path: path.into(),
            name,
            is_directory,
            size: if is_directory { 0 } else { size },
            extension,
        }
    }

    /// Creates an entry from a local path and its metadata.
    ///
    /// The name is re-composed to NFC so that names stored decomposed on
    /// disk (macOS) compare and render like their typed form.
    pub fn from_metadata(path: &Path, metadata: &std::fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| crate::nfc_string(&n.to_string_lossy()))
            .unwrap_or_default();
        Self::new(
            path.to_string_lossy().into_owned(),
            name,
            metadata.is_dir(),
            metadata.len(),
        )
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the file or directory name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Classifies the entry by its (lower-cased) extension.
    pub fn kind(&self) -> EntryKind {
        if self.is_directory {
            return EntryKind::Directory;
        }
        let Some(ext) = self.extension.as_deref().map(str::to_lowercase) else {
            return EntryKind::Other;
        };
        if CODE_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Code
        } else if TEXT_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Text
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            EntryKind::Image
        } else {
            EntryKind::Other
        }
    }

    /// An entry is well-formed when both its path and name are non-empty.
    pub(crate) fn is_well_formed(&self) -> bool {
        !self.path.trim().is_empty() && !self.name.is_empty()
    }
}

fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn new_derives_extension() {
        let entry = FileEntry::new("/root/b.txt", "b.txt", false, 120);
        assert_eq!(entry.extension(), Some("txt"));
        assert_eq!(entry.size(), 120);
        assert_eq!(entry.path(), "/root/b.txt");
    }

    #[test]
    fn directory_has_no_extension_and_zero_size() {
        let entry = FileEntry::new("/root/lib.d", "lib.d", true, 4096);
        assert!(entry.is_directory());
        assert_eq!(entry.extension(), None);
        assert_eq!(entry.size(), 0, "directory size should always be 0");
    }

    #[test]
    fn dotfile_has_no_extension() {
        let entry = FileEntry::new("/root/.env", ".env", false, 3);
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn trailing_dot_has_no_extension() {
        let entry = FileEntry::new("/root/weird.", "weird.", false, 3);
        assert_eq!(entry.extension(), None);
    }

    #[test]
    fn kind_classifies_by_extension() {
        assert_eq!(FileEntry::new("/a", "a", true, 0).kind(), EntryKind::Directory);
        assert_eq!(FileEntry::new("/m.RS", "m.RS", false, 1).kind(), EntryKind::Code);
        assert_eq!(FileEntry::new("/r.md", "r.md", false, 1).kind(), EntryKind::Text);
        assert_eq!(FileEntry::new("/p.png", "p.png", false, 1).kind(), EntryKind::Image);
        assert_eq!(FileEntry::new("/z.zip", "z.zip", false, 1).kind(), EntryKind::Other);
        assert_eq!(FileEntry::new("/Makefile", "Makefile", false, 1).kind(), EntryKind::Other);
    }

    #[test]
    fn from_metadata_regular_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("test.txt");
        fs::write(&file_path, "hello").unwrap();

        let metadata = fs::metadata(&file_path).unwrap();
        let entry = FileEntry::from_metadata(&file_path, &metadata);

        assert_eq!(entry.name(), "test.txt");
        assert_eq!(entry.size(), 5);
        assert!(!entry.is_directory());
        assert_eq!(entry.path(), file_path.to_string_lossy());
    }

    #[test]
    fn from_metadata_directory() {
        let tmp = TempDir::new().unwrap();
        let dir_path = tmp.path().join("subdir");
        fs::create_dir(&dir_path).unwrap();
        fs::write(dir_path.join("a.txt"), "data").unwrap();

        let metadata = fs::metadata(&dir_path).unwrap();
        let entry = FileEntry::from_metadata(&dir_path, &metadata);

        assert_eq!(entry.name(), "subdir");
        assert!(entry.is_directory());
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn from_metadata_unicode_name() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("한글파일.txt");
        fs::write(&file_path, "내용").unwrap();

        let metadata = fs::metadata(&file_path).unwrap();
        let entry = FileEntry::from_metadata(&file_path, &metadata);

        assert_eq!(entry.name(), "한글파일.txt");
    }

    #[test]
    fn deserializes_provider_payload() {
        let json = r#"{"path":"/root/a","name":"a","is_directory":true,"size":0,"extension":null}"#;
        let entry: FileEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry, FileEntry::new("/root/a", "a", true, 0));
    }

    #[test]
    fn well_formed_requires_path_and_name() {
        assert!(FileEntry::new("/a", "a", false, 0).is_well_formed());
        assert!(!FileEntry::new("", "a", false, 0).is_well_formed());
        assert!(!FileEntry::new("/a", "", false, 0).is_well_formed());
    }
}
