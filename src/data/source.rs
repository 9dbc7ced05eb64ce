use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// UploadedFile – the upload boundary
// ---------------------------------------------------------------------------

/// A file handed over by the host: a name used for format sniffing and a
/// readable byte source. The loader borrows it for one call and never keeps it.
pub trait UploadedFile {
    /// Declared filename, e.g. `ventas.csv`.
    fn name(&self) -> &str;

    /// Read the full content.
    fn read(&mut self) -> io::Result<Vec<u8>>;
}

/// An upload already held in memory.
#[derive(Debug, Clone)]
pub struct MemoryFile {
    name: String,
    bytes: Vec<u8>,
}

impl MemoryFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl UploadedFile for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}

/// A file on disk, as picked from the native file dialog.
#[derive(Debug, Clone)]
pub struct PathFile {
    path: PathBuf,
    name: String,
}

impl PathFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }
}

impl UploadedFile for PathFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> io::Result<Vec<u8>> {
        std::fs::read(&self.path)
    }
}
