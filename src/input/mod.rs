pub mod delimited;
pub mod json;

use anyhow::Result;
use std::{fmt::Display, path::PathBuf};

use self::{delimited::parse_delimited, json::parse_json};

#[derive(PartialEq, Clone, Debug)]
pub enum FileType {
    Json,
    Delimited,
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Json => write!(f, "JSON"),
            FileType::Delimited => write!(f, "DELIMITED"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InputFile {
    pub path: PathBuf,
    pub file_type: FileType,
}

impl Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {{ path: {} }}", self.file_type, self.path.display())
    }
}

pub fn match_file(path: PathBuf) -> InputFile {
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let file_type = if is_json {
        FileType::Json
    } else {
        FileType::Delimited
    };
    InputFile { path, file_type }
}

/// Reads the vectors held by `file`, one per row.
pub fn load(file: InputFile) -> Result<Vec<Vec<f64>>> {
    let content = std::fs::read_to_string(&file.path)?;
    let vectors = match file.file_type {
        FileType::Json => parse_json(&content)?,
        FileType::Delimited => parse_delimited(&content)?,
    };
    info!("loaded {} vectors from {}", vectors.len(), file);
    Ok(vectors)
}
