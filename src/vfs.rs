//! Virtual filesystem seam.
//!
//! The engine never touches the filesystem directly: everything goes through
//! [`FileSource`], which hands back line-oriented [`FileHandle`]s. Production
//! code uses [`DiskFileSource`]; tests and embedders can use
//! [`MemFileSource`] to script exact file contents.
//!
//! Open failures are reported as `None`, not errors. The callers in this
//! crate all treat an unopenable file as "nothing to show".

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

use bitflags::bitflags;
use tracing::debug;

bitflags! {
    /// Open intent flags, mirroring the boot-loader file layer's open types.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Caller only needs metadata (name/size), not bulk content.
        const GET_SIZE      = 1 << 0;
        /// Bypass transparent decompression filters.
        const NO_DECOMPRESS = 1 << 1;
        /// Sequential line-oriented read, pager style.
        const CAT           = 1 << 2;
    }
}

/// An open file: size, a current read offset, and line-oriented reads.
pub trait FileHandle {
    fn name(&self) -> &str;
    fn size(&self) -> u64;
    /// Current byte offset of the read cursor.
    fn offset(&self) -> u64;
    /// Reset the read cursor to the start of the file.
    fn rewind(&mut self);
    /// Read one line without its trailing newline. `None` at end of file.
    fn read_line(&mut self) -> Option<String>;

    fn is_eof(&self) -> bool {
        self.offset() >= self.size()
    }
}

/// Opens paths into [`FileHandle`]s. Failure yields no handle.
pub trait FileSource {
    fn open(&self, path: &str, flags: OpenFlags) -> Option<Box<dyn FileHandle>>;

    /// Convenience: slurp a whole file as text (used for sourcing rule
    /// scripts). `None` if the file cannot be opened.
    fn read_to_string(&self, path: &str) -> Option<String> {
        let mut handle = self.open(path, OpenFlags::CAT)?;
        let mut out = String::new();
        while let Some(line) = handle.read_line() {
            out.push_str(&line);
            out.push('\n');
        }
        Some(out)
    }
}

// ---------------------------------------------------------------------------
// Disk-backed implementation
// ---------------------------------------------------------------------------

/// Real-filesystem [`FileSource`].
///
/// Paths of the form `(label)/rest` are translated through a mount map so
/// the engine's device-labelled command strings resolve against ordinary
/// directories. Unlabelled paths are opened as-is.
#[derive(Debug, Default)]
pub struct DiskFileSource {
    mounts: HashMap<String, std::path::PathBuf>,
}

impl DiskFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a device label so `(label)/x` opens `<dir>/x`.
    pub fn mount(&mut self, label: impl Into<String>, dir: impl Into<std::path::PathBuf>) {
        self.mounts.insert(label.into(), dir.into());
    }

    fn translate(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix('(')?;
        let (label, tail) = rest.split_once(')')?;
        let dir = self.mounts.get(label)?;
        Some(format!("{}{}", dir.display(), tail))
    }
}

struct DiskHandle {
    name: String,
    size: u64,
    offset: u64,
    reader: BufReader<File>,
}

impl FileSource for DiskFileSource {
    fn open(&self, path: &str, flags: OpenFlags) -> Option<Box<dyn FileHandle>> {
        let resolved = self.translate(path);
        let path = resolved.as_deref().unwrap_or(path);
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                debug!(path, error = %e, "open failed");
                return None;
            }
        };
        let size = file.metadata().ok().map(|m| m.len()).unwrap_or(0);
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());
        debug!(path, size, ?flags, "opened file");
        Some(Box::new(DiskHandle {
            name,
            size,
            offset: 0,
            reader: BufReader::new(file),
        }))
    }
}

impl FileHandle for DiskHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn offset(&self) -> u64 {
        self.offset
    }

    fn rewind(&mut self) {
        if self.reader.seek(SeekFrom::Start(0)).is_ok() {
            self.offset = 0;
        }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) | Err(_) => None,
            Ok(n) => {
                self.offset += n as u64;
                while buf.ends_with('\n') || buf.ends_with('\r') {
                    buf.pop();
                }
                Some(buf)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory [`FileSource`] keyed by exact path string.
#[derive(Debug, Default)]
pub struct MemFileSource {
    files: HashMap<String, Vec<u8>>,
}

impl MemFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }
}

struct MemHandle {
    name: String,
    data: Vec<u8>,
    offset: usize,
}

impl FileSource for MemFileSource {
    fn open(&self, path: &str, _flags: OpenFlags) -> Option<Box<dyn FileHandle>> {
        let data = self.files.get(path)?.clone();
        let name = path.rsplit('/').next().unwrap_or(path).to_string();
        Some(Box::new(MemHandle {
            name,
            data,
            offset: 0,
        }))
    }
}

impl FileHandle for MemHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn offset(&self) -> u64 {
        self.offset as u64
    }

    fn rewind(&mut self) {
        self.offset = 0;
    }

    fn read_line(&mut self) -> Option<String> {
        if self.offset >= self.data.len() {
            return None;
        }
        let rest = &self.data[self.offset..];
        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(nl) => (&rest[..nl], nl + 1),
            None => (rest, rest.len()),
        };
        self.offset += consumed;
        let mut text = String::from_utf8_lossy(line).into_owned();
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mem_read_lines_and_offset() {
        let mut src = MemFileSource::new();
        src.insert("/f.txt", "one\ntwo\nthree");
        let mut h = src.open("/f.txt", OpenFlags::CAT).unwrap();
        assert_eq!(h.size(), 13);
        assert_eq!(h.read_line().as_deref(), Some("one"));
        assert_eq!(h.offset(), 4);
        assert_eq!(h.read_line().as_deref(), Some("two"));
        assert_eq!(h.read_line().as_deref(), Some("three"));
        assert!(h.is_eof());
        assert_eq!(h.read_line(), None);
    }

    #[test]
    fn test_mem_rewind() {
        let mut src = MemFileSource::new();
        src.insert("/f.txt", "a\nb\n");
        let mut h = src.open("/f.txt", OpenFlags::CAT).unwrap();
        h.read_line();
        h.read_line();
        assert!(h.is_eof());
        h.rewind();
        assert_eq!(h.offset(), 0);
        assert_eq!(h.read_line().as_deref(), Some("a"));
    }

    #[test]
    fn test_mem_missing_file_yields_no_handle() {
        let src = MemFileSource::new();
        assert!(src.open("/absent", OpenFlags::GET_SIZE).is_none());
    }

    #[test]
    fn test_read_to_string_joins_lines() {
        let mut src = MemFileSource::new();
        src.insert("/s", "set x=1\nunset y");
        assert_eq!(
            src.read_to_string("/s").as_deref(),
            Some("set x=1\nunset y\n")
        );
    }

    #[test]
    fn test_disk_open_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "hello").unwrap();
        writeln!(f, "world").unwrap();

        let src = DiskFileSource::new();
        let mut h = src
            .open(path.to_str().unwrap(), OpenFlags::GET_SIZE | OpenFlags::NO_DECOMPRESS)
            .unwrap();
        assert_eq!(h.name(), "notes.txt");
        assert_eq!(h.size(), 12);
        assert_eq!(h.read_line().as_deref(), Some("hello"));
        assert_eq!(h.read_line().as_deref(), Some("world"));
        assert_eq!(h.read_line(), None);
    }

    #[test]
    fn test_disk_open_missing_is_none() {
        let src = DiskFileSource::new();
        assert!(src.open("/definitely/not/here", OpenFlags::CAT).is_none());
    }

    #[test]
    fn test_disk_mount_label_translation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("boot/grub/rules")).unwrap();
        std::fs::write(dir.path().join("boot/grub/rules/check"), "set x=1\n").unwrap();

        let mut src = DiskFileSource::new();
        src.mount("hd0,1", dir.path());
        let mut h = src
            .open("(hd0,1)/boot/grub/rules/check", OpenFlags::CAT)
            .unwrap();
        assert_eq!(h.read_line().as_deref(), Some("set x=1"));
    }

    #[test]
    fn test_disk_unknown_label_is_none() {
        let src = DiskFileSource::new();
        assert!(src.open("(hd9)/anything", OpenFlags::CAT).is_none());
    }
}
