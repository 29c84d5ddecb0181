use super::{
    Slot,
    names::{KEY_SLOTS, PASSWORD_SLOTS, from_wire_slot},
};

/// Which label listing a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelQuery {
    Passwords,
    Keys,
}

impl LabelQuery {
    pub fn response_count(self) -> usize {
        match self {
            Self::Passwords => 12,
            Self::Keys => 36,
        }
    }
}

/// Decode one `"<slot byte>|<label>"` response.
///
/// Out-of-range or malformed responses return `None`; the device pads
/// unused entries with markers outside the queried range.
pub fn parse_slot_label_response(raw: &str, query: LabelQuery) -> Option<Slot> {
    let (number, label) = raw.split_once('|')?;
    let mut chars = number.chars();
    let wire = u8::try_from(chars.next()? as u32).ok()?;
    if chars.next().is_some() {
        return None;
    }

    let number = match query {
        LabelQuery::Passwords => from_wire_slot(wire),
        LabelQuery::Keys => wire,
    };
    let range = match query {
        LabelQuery::Passwords => PASSWORD_SLOTS,
        LabelQuery::Keys => KEY_SLOTS,
    };
    if !range.contains(&number) {
        tracing::trace!(wire, ?query, "dropping out-of-range label response");
        return None;
    }
    Slot::new(number, label).ok()
}
