pub mod label;
pub mod names;

pub use label::{LabelQuery, parse_slot_label_response};
pub use names::{canonical_name, from_wire_slot, to_wire_slot};

use std::fmt;

#[derive(Debug, thiserror::Error)]
#[error("Unknown slot: {0}")]
pub struct UnknownSlot(pub u8);

/// A device slot as reported by a label query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub number: u8,
    pub name: &'static str,
    pub label: String,
}

impl Slot {
    pub fn new(number: u8, label: impl Into<String>) -> Result<Self, UnknownSlot> {
        Ok(Self {
            number,
            name: canonical_name(number)?,
            label: label.into(),
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.label.is_empty() { "<empty>" } else { &self.label };
        write!(f, "Slot {}: {label}", self.name)
    }
}

/// One line per key slot in canonical order, unreported slots as empty.
pub fn key_label_lines(slots: &[Slot]) -> Vec<String> {
    names::KEY_SLOTS
        .map(|number| match slots.iter().find(|s| s.number == number) {
            Some(slot) => slot.to_string(),
            None => Slot::new(number, "").map(|s| s.to_string()).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_label_lines_in_canonical_order() {
        let slots = vec![Slot::new(29, "ssh").unwrap(), Slot::new(26, "backup").unwrap()];
        let lines = key_label_lines(&slots);
        assert_eq!(lines.len(), 36);
        assert_eq!(lines[0], "Slot RSA Key 1: <empty>");
        assert_eq!(lines[1], "Slot RSA Key 2: backup");
        assert_eq!(lines[4], "Slot ECC Key 1: ssh");
        assert_eq!(lines[35], "Slot ECC Key 32: <empty>");
    }
}
