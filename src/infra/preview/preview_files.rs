use crate::core::customization::PreviewTheme;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The dark and light preview images for one customization.
///
/// Both live in a private temp directory under the preview root, removed
/// when this value is dropped: on confirm, cancel, timeout or error alike.
pub struct PreviewFiles {
    dir: TempDir,
}

impl PreviewFiles {
    pub fn create_in(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let dir = tempfile::Builder::new()
            .prefix("rolecolor-")
            .tempdir_in(root)?;
        Ok(Self { dir })
    }

    pub fn path(&self, theme: PreviewTheme) -> PathBuf {
        self.dir.path().join(theme.file_name())
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
