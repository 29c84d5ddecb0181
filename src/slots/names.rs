use super::UnknownSlot;

pub const PASSWORD_SLOTS: std::ops::RangeInclusive<u8> = 1..=12;
pub const KEY_SLOTS: std::ops::RangeInclusive<u8> = 25..=60;

const SLOT_NAMES: [&str; 12] = [
    "1a", "2a", "3a", "4a", "5a", "6a", "1b", "2b", "3b", "4b", "5b", "6b",
];

const KEY_NAMES: [&str; 36] = [
    "RSA Key 1", "RSA Key 2", "RSA Key 3", "RSA Key 4",
    "ECC Key 1", "ECC Key 2", "ECC Key 3", "ECC Key 4",
    "ECC Key 5", "ECC Key 6", "ECC Key 7", "ECC Key 8",
    "ECC Key 9", "ECC Key 10", "ECC Key 11", "ECC Key 12",
    "ECC Key 13", "ECC Key 14", "ECC Key 15", "ECC Key 16",
    "ECC Key 17", "ECC Key 18", "ECC Key 19", "ECC Key 20",
    "ECC Key 21", "ECC Key 22", "ECC Key 23", "ECC Key 24",
    "ECC Key 25", "ECC Key 26", "ECC Key 27", "ECC Key 28",
    "ECC Key 29", "ECC Key 30", "ECC Key 31", "ECC Key 32",
];

pub fn canonical_name(slot: u8) -> Result<&'static str, UnknownSlot> {
    match slot {
        1..=12 => Ok(SLOT_NAMES[(slot - 1) as usize]),
        25..=60 => Ok(KEY_NAMES[(slot - 25) as usize]),
        _ => Err(UnknownSlot(slot)),
    }
}

/// The device numbers password slots with a gap: logical 10..=12 live at 16..=18.
pub fn to_wire_slot(slot: u8) -> u8 {
    if slot >= 10 { slot.saturating_add(6) } else { slot }
}

pub fn from_wire_slot(wire: u8) -> u8 {
    if wire >= 16 { wire - 6 } else { wire }
}
