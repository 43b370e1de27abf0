use crate::error::ScanError;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// The table giving meaning to the numeric class ids that come out of the network.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassNames {
    names: Vec<String>,
}

impl ClassNames {
    pub fn new(names: Vec<String>) -> Self {
        ClassNames { names }
    }

    /// Reads a file with one class name per line. Blank lines are kept so ids stay aligned.
    pub fn from_file(filepath: &Path) -> Result<Self, ScanError> {
        let io_error = |source| ScanError::Io {
            path: filepath.to_path_buf(),
            source,
        };
        let file = File::open(filepath).map_err(io_error)?;
        let names = BufReader::new(file)
            .lines()
            .map(|line| line.map(|name| name.trim().to_string()))
            .collect::<Result<Vec<String>, _>>()
            .map_err(io_error)?;
        Ok(ClassNames { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name for `class_id`, falling back to the id itself when the table has no entry.
    pub fn resolve(&self, class_id: usize) -> Cow<'_, str> {
        match self.names.get(class_id) {
            Some(name) if !name.is_empty() => Cow::Borrowed(name),
            _ => Cow::Owned(class_id.to_string()),
        }
    }
}
