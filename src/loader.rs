//! This module provides the `MachineLoader` struct, responsible for loading machine descriptions
//! from files and strings.

use crate::parser::parse;
use crate::types::{Machine, MachineError};
use std::fs;
use std::path::{Path, PathBuf};

/// The file extension of machine descriptions.
pub const MACHINE_EXTENSION: &str = "tm";

/// `MachineLoader` is a utility struct for loading machine descriptions.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a single machine from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Machine)` if the file is successfully read and parsed into a `Machine`.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid description.
    pub fn load_machine(path: &Path) -> Result<Machine, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        parse(&content)
    }

    /// Loads a single machine from the provided string content.
    pub fn load_machine_from_string(content: &str) -> Result<Machine, MachineError> {
        parse(content)
    }

    /// Loads every `.tm` file in `directory`, sorted by path.
    ///
    /// Directories and files with other extensions are skipped. Each element of the result is
    /// either the loaded machine with its path, or the error that prevented loading it.
    pub fn load_machines(directory: &Path) -> Vec<Result<(PathBuf, Machine), MachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut paths = Vec::new();
        let mut results = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => results.push(Err(MachineError::FileError(format!(
                    "Failed to read directory entry: {}",
                    e
                )))),
            }
        }

        paths.retain(|path| {
            !path.is_dir() && path.extension().is_some_and(|ext| ext == MACHINE_EXTENSION)
        });
        paths.sort();

        results.extend(
            paths
                .into_iter()
                .map(|path| Self::load_machine(&path).map(|machine| (path, machine))),
        );
        results
    }
}
