//! Byte-stream providers for file-backed resources.
//!
//! The resolver asks a [`StreamProvider`] for each candidate resource path.
//! "Not found" is an expected answer (`Ok(None)`) and lets resolution move
//! on; any other failure aborts the resolution.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::sync::Arc;

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::{trace, warn};

/// Readable stream handed back by a provider.
pub type ResourceStream = Box<dyn Read + Send>;

/// Source of resource bytes addressed by `/`-separated paths.
#[cfg_attr(test, mockall::automock)]
pub trait StreamProvider: Send + Sync {
    /// Open `resource_path`.
    ///
    /// `force_fresh` asks the provider to bypass any transport-level cache so
    /// a reload observes the current bytes.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for failures other than a missing resource.
    fn open(&self, resource_path: &str, force_fresh: bool) -> io::Result<Option<ResourceStream>>;
}

impl<T: StreamProvider + ?Sized> StreamProvider for Arc<T> {
    fn open(&self, resource_path: &str, force_fresh: bool) -> io::Result<Option<ResourceStream>> {
        (**self).open(resource_path, force_fresh)
    }
}

impl<T: StreamProvider + ?Sized> StreamProvider for &T {
    fn open(&self, resource_path: &str, force_fresh: bool) -> io::Result<Option<ResourceStream>> {
        (**self).open(resource_path, force_fresh)
    }
}

/// Provider searching an ordered list of root directories.
///
/// The first root containing the resource wins, mirroring a class-path
/// search. Paths that try to leave a root (`..`, absolute paths) are treated
/// as missing.
///
/// ```no_run
/// use bundlekit_common::{DirectoryProvider, StreamProvider};
///
/// let provider = DirectoryProvider::new(["resources", "overlay"]);
/// let stream = provider.open("message_ja.properties", false)?;
/// assert!(stream.is_some());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryProvider {
    roots: Vec<Utf8PathBuf>,
}

impl DirectoryProvider {
    /// Create a provider over `roots`, searched in order.
    #[must_use]
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// The search roots in order.
    #[must_use]
    pub fn roots(&self) -> &[Utf8PathBuf] {
        &self.roots
    }

    fn is_contained(resource_path: &Utf8Path) -> bool {
        resource_path
            .components()
            .all(|component| matches!(component, Utf8Component::Normal(_) | Utf8Component::CurDir))
    }
}

impl StreamProvider for DirectoryProvider {
    fn open(&self, resource_path: &str, force_fresh: bool) -> io::Result<Option<ResourceStream>> {
        let relative = Utf8Path::new(resource_path);
        if !Self::is_contained(relative) {
            warn!(
                target: "bundle::provider",
                "refusing resource path `{resource_path}` outside the search roots",
            );
            return Ok(None);
        }

        for root in &self.roots {
            let candidate = root.join(relative);
            match File::open(&candidate) {
                Ok(file) => {
                    if !file.metadata()?.is_file() {
                        continue;
                    }
                    trace!(
                        target: "bundle::provider",
                        "opened {candidate} (fresh: {force_fresh})",
                    );
                    return Ok(Some(Box::new(BufReader::new(file))));
                }
                Err(error) if error.kind() == io::ErrorKind::NotFound => {}
                Err(error) => return Err(error),
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temporary path is not UTF-8: {}", path.display()))
    }

    fn read_all(stream: Option<ResourceStream>) -> String {
        let mut contents = String::new();
        stream
            .expect("resource should exist")
            .read_to_string(&mut contents)
            .expect("stream should be readable");
        contents
    }

    #[test]
    fn first_root_containing_the_resource_wins() {
        let first = TempDir::new().expect("temp dir");
        let second = TempDir::new().expect("temp dir");
        fs::write(second.path().join("message.properties"), "from=second").expect("write");
        fs::write(first.path().join("message.properties"), "from=first").expect("write");

        let provider = DirectoryProvider::new([utf8_root(&first), utf8_root(&second)]);
        let stream = provider.open("message.properties", false).expect("open");

        assert_eq!(read_all(stream), "from=first");
    }

    #[test]
    fn missing_resources_are_not_errors() {
        let root = TempDir::new().expect("temp dir");
        let provider = DirectoryProvider::new([utf8_root(&root)]);

        let stream = provider.open("absent.properties", true).expect("open");

        assert!(stream.is_none());
    }

    #[test]
    fn nested_paths_resolve_under_roots() {
        let root = TempDir::new().expect("temp dir");
        fs::create_dir_all(root.path().join("org/example")).expect("mkdir");
        fs::write(root.path().join("org/example/strings.xml"), "<properties/>").expect("write");

        let provider = DirectoryProvider::new([utf8_root(&root)]);
        let stream = provider.open("org/example/strings.xml", false).expect("open");

        assert_eq!(read_all(stream), "<properties/>");
    }

    #[test]
    fn escaping_paths_are_treated_as_missing() {
        let root = TempDir::new().expect("temp dir");
        let provider = DirectoryProvider::new([utf8_root(&root)]);

        assert!(provider.open("../secret.properties", false).expect("open").is_none());
        assert!(provider.open("/etc/passwd", false).expect("open").is_none());
    }

    #[test]
    fn directories_are_skipped() {
        let root = TempDir::new().expect("temp dir");
        fs::create_dir_all(root.path().join("message.properties")).expect("mkdir");
        let provider = DirectoryProvider::new([utf8_root(&root)]);

        assert!(provider.open("message.properties", false).expect("open").is_none());
    }
}
