use std::fs::{self, File};
use std::io::{ErrorKind, Read, Result};
use std::path::{Path, PathBuf};

const TEMP_PREFIX: &str = ".tmp-";

pub struct TmpFile {
    file: File,
    path: PathBuf,
}

impl TmpFile {
    pub fn create_in(temp_dir: impl AsRef<Path>) -> Result<Self> {
        let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
            .take(10)
            .collect();
        let path = temp_dir
            .as_ref()
            .join(format!("{TEMP_PREFIX}{suffix}"));
        let file = File::create(&path)?;
        Ok(Self { file, path })
    }
}

impl std::io::Write for &TmpFile {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (&self.file).write(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (&self.file).flush()
    }
}

impl Drop for TmpFile {
    fn drop(&mut self) {
        // Already renamed into place when the swap succeeded.
        let _ = fs::remove_file(&self.path);
    }
}

/// A file whose content is only ever replaced as a whole.
///
/// Writers prepare the new content in a [`TmpFile`] next to the target and
/// rename it over the target, so readers observe either the previous
/// content or the new one, never a mix of both.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct AtomicFile {
    path: PathBuf,
}

impl AtomicFile {
    /// Touches nothing on disk: the parent directory is created by the
    /// first [`make_temp`](Self::make_temp).
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.parent().is_none() {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                "`path` must have a parent directory",
            ));
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        // Checked in `new`.
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Read the whole content. `Ok(None)` means nothing has been written
    /// yet (or the file was removed).
    pub fn load(&self) -> Result<Option<Vec<u8>>> {
        match File::open(&self.path) {
            Ok(mut file) => {
                let mut buf = vec![];
                file.read_to_end(&mut buf)?;
                Ok(Some(buf))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn make_temp(&self) -> Result<TmpFile> {
        fs::create_dir_all(self.directory())?;
        TmpFile::create_in(self.directory())
    }

    /// Replace the content of the file with the content of `new`.
    ///
    /// There is no version check: the last replacement wins.
    pub fn replace(&self, new: TmpFile) -> Result<()> {
        new.file.sync_data()?;
        fs::rename(&new.path, &self.path)?;
        log::trace!("replaced {}", self.path.display());
        Ok(())
    }

    /// Remove the file. Removing a file that doesn't exist is not an error.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempdir::TempDir;

    #[test]
    fn reading_creates_no_directory() {
        let dir = TempDir::new("atomic_lazy_dir").unwrap();
        let nested = dir.path().join("state");
        let file = AtomicFile::new(nested.join("value.json")).unwrap();

        assert_eq!(file.load().unwrap(), None);
        file.remove().unwrap();
        assert!(!nested.exists());

        crate::atomic::write(&file, b"1").unwrap();
        assert_eq!(file.load().unwrap().unwrap(), b"1".to_vec());
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new("atomic_missing").unwrap();
        let file = AtomicFile::new(dir.path().join("value.json")).unwrap();
        assert_eq!(file.load().unwrap(), None);
    }

    #[test]
    fn temp_files_do_not_outlive_replace() {
        let dir = TempDir::new("atomic_replace").unwrap();
        let root = dir.path();
        let file = AtomicFile::new(root.join("value.json")).unwrap();
        for i in 0..5 {
            let temp = file.make_temp().unwrap();
            (&temp)
                .write_all(format!("Version {i}").as_bytes())
                .unwrap();
            file.replace(temp).unwrap();
        }

        assert_eq!(file.load().unwrap().unwrap(), b"Version 4".to_vec());
        let entries = fs::read_dir(root).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn dropped_temp_leaves_content_untouched() {
        let dir = TempDir::new("atomic_abort").unwrap();
        let file = AtomicFile::new(dir.path().join("value.json")).unwrap();
        let temp = file.make_temp().unwrap();
        (&temp).write_all(b"first").unwrap();
        file.replace(temp).unwrap();

        let temp = file.make_temp().unwrap();
        (&temp).write_all(b"half-writ").unwrap();
        drop(temp);

        assert_eq!(file.load().unwrap().unwrap(), b"first".to_vec());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new("atomic_remove").unwrap();
        let file = AtomicFile::new(dir.path().join("value.json")).unwrap();
        file.remove().unwrap();
        let temp = file.make_temp().unwrap();
        (&temp).write_all(b"x").unwrap();
        file.replace(temp).unwrap();
        file.remove().unwrap();
        assert_eq!(file.load().unwrap(), None);
    }
}
