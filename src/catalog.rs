use crate::types::{Machine, MachineError};

use tracing::warn;

// Built-in sample machines
const MACHINE_TEXTS: [(&str, &str); 4] = [
    ("single-step", include_str!("../machines/single-step.tm")),
    ("copy-symbol", include_str!("../machines/copy-symbol.tm")),
    ("swap-pair", include_str!("../machines/swap-pair.tm")),
    ("match-counters", include_str!("../machines/match-counters.tm")),
];

/// A parsed built-in machine.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub text: &'static str,
    pub machine: Machine,
}

lazy_static::lazy_static! {
    pub static ref MACHINES: Vec<CatalogEntry> = MACHINE_TEXTS
        .iter()
        .filter_map(|&(name, text)| match crate::parser::parse(text) {
            Ok(machine) => Some(CatalogEntry { name, text, machine }),
            Err(e) => {
                warn!(name, error = %e, "failed to parse built-in machine");
                None
            }
        })
        .collect();
}

pub struct MachineCatalog;

impl MachineCatalog {
    /// Get the number of available machines
    pub fn get_machine_count() -> usize {
        MACHINES.len()
    }

    /// Get the names of all available machines, in catalog order
    pub fn get_machine_names() -> Vec<&'static str> {
        MACHINES.iter().map(|entry| entry.name).collect()
    }

    /// Get a machine by its index
    pub fn get_machine_by_index(index: usize) -> Result<Machine, MachineError> {
        MACHINES
            .get(index)
            .map(|entry| entry.machine.clone())
            .ok_or_else(|| MachineError::FileError(format!("Machine index {} out of range", index)))
    }

    /// Get a machine by its name
    pub fn get_machine_by_name(name: &str) -> Result<Machine, MachineError> {
        Self::find(name).map(|entry| entry.machine.clone())
    }

    /// Get the original text of a machine by its name
    pub fn get_machine_text_by_name(name: &str) -> Result<&'static str, MachineError> {
        Self::find(name).map(|entry| entry.text)
    }

    fn find(name: &str) -> Result<&'static CatalogEntry, MachineError> {
        MACHINES
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| MachineError::FileError(format!("Machine '{}' not found", name)))
    }
}
