use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{ArcGisError, Result};
use crate::io::ExportedFile;

/// Receives rendered documents, e.g. to save or offer them for download.
pub trait ExportSink {
    /// Store `file` and return the name it was stored under.
    fn save(&mut self, file: ExportedFile) -> Result<String>;
}

/// Collects documents in memory.
impl ExportSink for Vec<ExportedFile> {
    fn save(&mut self, file: ExportedFile) -> Result<String> {
        let filename = file.filename.clone();
        self.push(file);
        Ok(filename)
    }
}

/// Writes each document to a file named after it inside a directory.
///
/// Filenames come from layer names chosen by the server, so path separators are replaced and
/// the result must name a plain file directly inside the directory. A name already written by
/// this sink gets a `_1`, `_2`, ... suffix.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: HashSet<String>,
}

impl DirectorySink {
    /// Write into `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: HashSet::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unique_name(&self, filename: &str) -> String {
        if !self.written.contains(filename) {
            return filename.to_string();
        }
        let (stem, extension) = match filename.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (filename, None),
        };
        (1..)
            .map(|n| match extension {
                Some(extension) => format!("{stem}_{n}.{extension}"),
                None => format!("{stem}_{n}"),
            })
            .find(|candidate| !self.written.contains(candidate))
            .unwrap_or_else(|| filename.to_string())
    }
}

/// Replace characters that would let a filename leave its directory.
fn plain_filename(filename: &str) -> Result<String> {
    let name: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let mut components = Path::new(&name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name),
        _ => Err(ArcGisError::Format(format!(
            "Cannot save export as {filename:?}"
        ))),
    }
}

impl ExportSink for DirectorySink {
    fn save(&mut self, file: ExportedFile) -> Result<String> {
        let filename = self.unique_name(&plain_filename(&file.filename)?);
        let path = self.dir.join(&filename);
        if path.parent() != Some(self.dir.as_path()) {
            return Err(ArcGisError::Format(format!(
                "Cannot save export as {:?}",
                file.filename
            )));
        }
        fs::write(&path, file.contents)?;
        debug!(path = %path.display(), mime_type = file.mime_type, "wrote export");
        self.written.insert(filename.clone());
        Ok(filename)
    }
}

#[cfg(test)]
mod test {
    use tempfile::TempDir;

    use super::*;

    fn kml(filename: &str, contents: &str) -> ExportedFile {
        ExportedFile {
            filename: filename.to_string(),
            mime_type: "application/vnd.google-earth.kml+xml",
            contents: contents.to_string(),
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn directory_sink_writes_files() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp.path()).unwrap();
        let saved = sink.save(kml("Trees.kml", "<kml/>")).unwrap();

        assert_eq!(saved, "Trees.kml");
        assert_eq!(fs::read_to_string(temp.path().join("Trees.kml")).unwrap(), "<kml/>");
    }

    #[test]
    fn creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("nested").join("out");
        let mut sink = DirectorySink::new(&out).unwrap();
        sink.save(kml("Trees.kml", "<kml/>")).unwrap();
        assert_eq!(entries(&out), ["Trees.kml"]);
    }

    #[test]
    fn names_stay_inside_directory() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let mut sink = DirectorySink::new(&out).unwrap();

        assert_eq!(sink.save(kml("../escaped.kml", "a")).unwrap(), ".._escaped.kml");
        assert_eq!(sink.save(kml("/etc/passwd.kml", "b")).unwrap(), "_etc_passwd.kml");
        assert_eq!(sink.save(kml("Roads/Highways.kml", "c")).unwrap(), "Roads_Highways.kml");
        assert_eq!(sink.save(kml(r"C:\temp\x.kml", "d")).unwrap(), "C__temp_x.kml");

        assert_eq!(entries(temp.path()), ["out"]);
        assert_eq!(
            entries(&out),
            [".._escaped.kml", "C__temp_x.kml", "Roads_Highways.kml", "_etc_passwd.kml"]
        );
    }

    #[test]
    fn rejects_names_without_a_file() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp.path()).unwrap();
        for name in ["", ".", ".."] {
            let err = sink.save(kml(name, "x")).unwrap_err();
            assert!(matches!(err, ArcGisError::Format(_)), "{name:?}");
        }
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let temp = TempDir::new().unwrap();
        let mut sink = DirectorySink::new(temp.path()).unwrap();

        assert_eq!(sink.save(kml("Trees.kml", "first")).unwrap(), "Trees.kml");
        assert_eq!(sink.save(kml("Trees.kml", "second")).unwrap(), "Trees_1.kml");
        assert_eq!(sink.save(kml("Trees.kml", "third")).unwrap(), "Trees_2.kml");
        assert_eq!(sink.save(kml("Trees_1.kml", "fourth")).unwrap(), "Trees_1_1.kml");

        assert_eq!(fs::read_to_string(temp.path().join("Trees.kml")).unwrap(), "first");
        assert_eq!(fs::read_to_string(temp.path().join("Trees_1.kml")).unwrap(), "second");
        assert_eq!(entries(temp.path()).len(), 4);
    }
}
