use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::log_writer::LogWriter;

/// Configuration for size-based log file rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    pub path: PathBuf,
    pub max_file_size: u64,
    pub max_files: u32,
    pub rotate_on_open: bool,
}

/// A log file that rotates once it would grow past `max_file_size`.
///
/// The live file keeps its name; backups are `stem.1.ext` (newest) to `stem.N.ext`
/// (oldest) with `N = max_files`. With `max_files == 0` the live file is truncated instead.
pub struct RotatingFile {
    path: PathBuf,
    max_file_size: u64,
    max_files: u32,
    current_file: BufWriter<File>,
    current_size: u64,
}

impl RotatingFile {
    pub fn new(config: RotationConfig) -> Result<Self, io::Error> {
        if config.max_file_size == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "max_file_size must be at least 1 byte",
            ));
        }
        if let Some(parent) = config.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if config.rotate_on_open && fs::metadata(&config.path).is_ok_and(|m| m.len() > 0) {
            rotate_files(&config.path, config.max_files)?;
        }
        let (current_file, current_size) = open_append(&config.path)?;
        Ok(Self {
            path: config.path,
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            current_file,
            current_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0 && self.current_size + incoming > self.max_file_size
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.current_file.flush()?;
        rotate_files(&self.path, self.max_files)?;
        let (file, size) = open_append(&self.path)?;
        self.current_file = file;
        self.current_size = size;
        Ok(())
    }
}

impl LogWriter for RotatingFile {
    fn regular(&mut self, line: &str) -> io::Result<()> {
        let incoming = line.len() as u64 + 1;
        if self.should_rotate(incoming) {
            self.rotate()?;
        }
        writeln!(self.current_file, "{line}")?;
        self.current_size += incoming;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.current_file.flush()
    }
}

/// Path of backup number `index` for `base`; index 0 is `base` itself.
pub fn rotated_path(base: &Path, index: u32) -> PathBuf {
    if index == 0 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match base.extension() {
        Some(extension) => format!("{stem}.{index}.{}", extension.to_string_lossy()),
        None => format!("{stem}.{index}"),
    };
    base.with_file_name(name)
}

fn rotate_files(base: &Path, max_files: u32) -> io::Result<()> {
    if max_files == 0 {
        return File::create(base).map(drop);
    }
    let oldest = rotated_path(base, max_files);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..max_files).rev() {
        let source = rotated_path(base, index);
        if source.exists() {
            fs::rename(&source, rotated_path(base, index + 1))?;
        }
    }
    if base.exists() {
        fs::rename(base, rotated_path(base, 1))?;
    }
    Ok(())
}

fn open_append(path: &Path) -> Result<(BufWriter<File>, u64), io::Error> {
    let file = File::options().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok((BufWriter::new(file), size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: PathBuf, max_file_size: u64, max_files: u32) -> RotationConfig {
        RotationConfig {
            path,
            max_file_size,
            max_files,
            rotate_on_open: false,
        }
    }

    #[test]
    fn test_rotated_path() {
        let base = Path::new("/var/log/app.log");
        assert_eq!(rotated_path(base, 0), PathBuf::from("/var/log/app.log"));
        assert_eq!(rotated_path(base, 2), PathBuf::from("/var/log/app.2.log"));
        assert_eq!(
            rotated_path(Path::new("logs/app"), 1),
            PathBuf::from("logs/app.1")
        );
    }

    #[test]
    fn test_rejects_zero_size() {
        let dir = tempfile::tempdir().unwrap();
        let result = RotatingFile::new(config(dir.path().join("app.log"), 0, 3));
        assert_eq!(
            result.err().map(|e| e.kind()),
            Some(io::ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/app.log");
        let mut writer = RotatingFile::new(config(path.clone(), 1024, 3)).unwrap();
        writer.regular("hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "hello\n");
    }

    #[test]
    fn test_size_rotation_keeps_max_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        // every line is 9 bytes with its newline, two lines per file
        let mut writer = RotatingFile::new(config(path.clone(), 20, 2)).unwrap();
        for i in 0..8 {
            writer.regular(&format!("line-{i:03}")).unwrap();
        }
        writer.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "line-006\nline-007\n"
        );
        assert_eq!(
            fs::read_to_string(rotated_path(&path, 1)).unwrap(),
            "line-004\nline-005\n"
        );
        assert_eq!(
            fs::read_to_string(rotated_path(&path, 2)).unwrap(),
            "line-002\nline-003\n"
        );
        assert!(!rotated_path(&path, 3).exists());
    }

    #[test]
    fn test_oversized_line_goes_to_fresh_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFile::new(config(path.clone(), 8, 1)).unwrap();
        writer.regular("a very long line").unwrap();
        writer.regular("next").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "next\n");
        assert_eq!(
            fs::read_to_string(rotated_path(&path, 1)).unwrap(),
            "a very long line\n"
        );
    }

    #[test]
    fn test_rotate_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut writer = RotatingFile::new(RotationConfig {
            rotate_on_open: true,
            ..config(path.clone(), 1024, 3)
        })
        .unwrap();
        writer.regular("this run").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "this run\n");
        assert_eq!(
            fs::read_to_string(rotated_path(&path, 1)).unwrap(),
            "previous run\n"
        );
    }

    #[test]
    fn test_append_without_rotate_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let mut writer = RotatingFile::new(config(path.clone(), 1024, 3)).unwrap();
        writer.regular("this run").unwrap();
        writer.flush().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous run\nthis run\n"
        );
        assert!(!rotated_path(&path, 1).exists());
    }

    #[test]
    fn test_zero_max_files_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFile::new(config(path.clone(), 10, 0)).unwrap();
        writer.regular("first!!!").unwrap();
        writer.regular("second!!").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second!!\n");
        assert!(!rotated_path(&path, 1).exists());
    }
}
