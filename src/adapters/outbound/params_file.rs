use crate::common::ParamsError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A line-oriented `key=value` parameter file owned by an external tool.
pub struct ParamsFile {
    path: PathBuf,
}

impl ParamsFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrite every line whose key matches an override; all other lines pass
    /// through byte for byte. Keys absent from the file are not added.
    /// Returns the number of rewritten lines.
    pub fn apply(&self, overrides: &[(String, String)]) -> Result<usize, ParamsError> {
        if overrides.is_empty() {
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| ParamsError::Read {
            path: self.path.clone(),
            source,
        })?;

        let mut rewritten = 0;
        let mut output = String::with_capacity(content.len());
        for line in content.split_inclusive('\n') {
            let key = line.split_once('=').map(|(k, _)| k.trim());
            match key.and_then(|k| overrides.iter().find(|(o, _)| o == k)) {
                Some((k, v)) => {
                    let ending = &line[line.trim_end_matches(['\r', '\n']).len()..];
                    output.push_str(&format!("{}={}{}", k, v, ending));
                    rewritten += 1;
                }
                None => output.push_str(line),
            }
        }

        for (key, _) in overrides {
            if !content
                .lines()
                .any(|l| l.split_once('=').map(|(k, _)| k.trim()) == Some(key.as_str()))
            {
                debug!(key = %key, path = %self.path.display(), "override key not present in file");
            }
        }

        fs::write(&self.path, output).map_err(|source| ParamsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), rewritten, "parameter file updated");
        Ok(rewritten)
    }

    /// Replace the live file with a pristine backup copy.
    pub fn restore<P: AsRef<Path>>(&self, backup: P) -> Result<(), ParamsError> {
        let backup = backup.as_ref();
        let pristine = fs::read(backup).map_err(|source| ParamsError::Read {
            path: backup.to_path_buf(),
            source,
        })?;
        fs::write(&self.path, pristine).map_err(|source| ParamsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "parameter file restored from backup");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_matching_keys_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.py");
        fs::write(&path, "# env params\nwidth=30\nheight = 30\nseed=7\nseeds_extra=1\n").unwrap();

        let file = ParamsFile::new(&path);
        let count = file
            .apply(&[
                ("width".to_string(), "40".to_string()),
                ("seed".to_string(), "1".to_string()),
                ("missing".to_string(), "x".to_string()),
            ])
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# env params\nwidth=40\nheight = 30\nseed=1\nseeds_extra=1\n"
        );
    }

    #[test]
    fn restore_copies_the_backup_over() {
        let dir = tempfile::tempdir().unwrap();
        let live = dir.path().join("params.py");
        let backup = dir.path().join("backup.py");
        fs::write(&live, "width=99\n").unwrap();
        fs::write(&backup, "width=30\n").unwrap();

        ParamsFile::new(&live).restore(&backup).unwrap();
        assert_eq!(fs::read_to_string(&live).unwrap(), "width=30\n");
    }

    #[test]
    fn line_endings_are_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.py");
        fs::write(&path, "height=30\r\nwidth=30").unwrap();

        ParamsFile::new(&path)
            .apply(&[
                ("height".to_string(), "20".to_string()),
                ("width".to_string(), "40".to_string()),
            ])
            .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "height=20\r\nwidth=40");
    }

    #[test]
    fn restore_separates_read_and_write_failures() {
        let dir = tempfile::tempdir().unwrap();
        let backup = dir.path().join("backup.py");
        fs::write(&backup, "width=30\n").unwrap();

        let missing_backup = ParamsFile::new(dir.path().join("params.py"))
            .restore(dir.path().join("absent.py"))
            .unwrap_err();
        assert!(matches!(missing_backup, ParamsError::Read { path, .. } if path.ends_with("absent.py")));

        let unwritable = ParamsFile::new(dir.path().join("no_such_dir").join("params.py"))
            .restore(&backup)
            .unwrap_err();
        assert!(matches!(unwritable, ParamsError::Write { path, .. } if path.ends_with("params.py")));
    }

    #[test]
    fn missing_file_is_an_error() {
        let file = ParamsFile::new("/nonexistent/params.py");
        let err = file
            .apply(&[("width".to_string(), "1".to_string())])
            .unwrap_err();
        assert!(matches!(err, ParamsError::Read { .. }));
    }
}
