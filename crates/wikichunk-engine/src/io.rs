use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid corpus directory: {0}")]
    InvalidCorpusDir(String),
}

/// Read a markup source file and return its content.
///
/// Invalid UTF-8 surfaces as an IO error; encoding failures abort the
/// run rather than degrading.
pub fn read_file(path: &Path) -> Result<String, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(IoError::Io)
}

/// Scan for markup source files (`.wiki`, `.txt`) in the corpus directory
pub fn scan_wiki_files(corpus_root: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !corpus_root.exists() {
        return Err(IoError::InvalidCorpusDir(
            "corpus directory not found".to_string(),
        ));
    }

    let mut files = Vec::new();
    scan_directory_recursive(corpus_root, &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), IoError> {
    let entries = fs::read_dir(dir).map_err(IoError::Io)?;

    for entry in entries {
        let entry = entry.map_err(IoError::Io)?;
        let path = entry.path();

        if path.is_dir() {
            scan_directory_recursive(&path, files)?;
        } else if let Some(ext) = path.extension()
            && (ext == "wiki" || ext == "txt")
        {
            files.push(path);
        }
    }

    Ok(())
}

pub fn validate_corpus_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidCorpusDir(
            "Directory does not exist".to_string(),
        ));
    }

    Ok(())
}
