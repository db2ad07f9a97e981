use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};

/// Recorded frames, one JSON array of portrayals per line.
///
/// Lines are kept raw and parsed when shown, so a malformed line only costs
/// that one frame.
#[derive(Debug, Default)]
pub struct FrameSource {
    frames: Vec<String>,
}

impl FrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("cannot open frames file {}", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("cannot read frames file {}", path.display()))
    }

    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut frames = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            frames.push(trimmed.to_string());
        }
        Ok(Self { frames })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.frames.get(index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let src = "# step 0\n[]\n\n  [{\"Shape\":\"circle\",\"x\":0.5,\"y\":0.5,\"r\":2}]  \n";
        let frames = FrameSource::from_reader(src.as_bytes()).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.get(0), Some("[]"));
        assert!(frames.get(1).unwrap().starts_with("[{"));
        assert_eq!(frames.get(2), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FrameSource::open(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(format!("{err:#}").contains("cannot open frames file"));
    }
}
