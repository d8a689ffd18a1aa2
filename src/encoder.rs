//! This module renders machines for the consumer side: back into the `.tm` text format, or
//! as JSON.

use crate::types::{Machine, State};

/// Encodes a machine in the `.tm` text format.
///
/// Machines read by [`crate::parser::parse`] encode back to an equivalent description.
/// Generated states and wrapped symbols are written with their `Display` forms, which the
/// parser does not read back.
pub fn encode(machine: &Machine) -> String {
    let mut lines = vec![
        format!("input: {}", join(&machine.input_alphabet, ", ")),
        format!("start: {}", join_states(&machine.start)),
        format!("access: {}", join_states(&machine.access)),
        "commands:".to_string(),
    ];

    lines.extend(
        machine
            .commands
            .iter()
            .map(|command| format!("  {command}")),
    );

    lines.join("\n") + "\n"
}

/// Encodes a machine as pretty-printed JSON.
pub fn to_json(machine: &Machine) -> serde_json::Result<String> {
    serde_json::to_string_pretty(machine)
}

fn join<'a, T>(items: impl IntoIterator<Item = &'a T>, separator: &str) -> String
where
    T: ToString + 'a,
{
    items
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

fn join_states(states: &[State]) -> String {
    join(states, " | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MachineCatalog;
    use crate::parser::parse;
    use crate::pipeline::symmetrize;

    #[test]
    fn test_encode_single_step() {
        let machine = MachineCatalog::get_machine_by_name("single-step").unwrap();

        assert_eq!(
            encode(&machine),
            "input: a\nstart: q0\naccess: q1\ncommands:\n  (_, q0, _) -> (a, q1, _)\n"
        );
    }

    #[test]
    fn test_encode_parses_back() {
        let machine = MachineCatalog::get_machine_by_name("match-counters").unwrap();
        assert_eq!(parse(&encode(&machine)).unwrap(), machine);
    }

    #[test]
    fn test_encode_generated_states() {
        let machine = MachineCatalog::get_machine_by_name("single-step").unwrap();
        let encoded = encode(&symmetrize(&machine).unwrap());

        assert!(encoded.contains("start: q0 | q0'"));
        assert!(encoded.contains("t1#0"));
        assert!(encoded.contains("a'"));
    }

    #[test]
    fn test_to_json() {
        let machine = MachineCatalog::get_machine_by_name("single-step").unwrap();
        let json = to_json(&machine).unwrap();

        let decoded: Machine = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, machine);
    }
}
