use super::{FrameError, types::*};
use crate::error::Result;
use crate::hid::{REPORT_SIZE, Report, Transport};

/// How each chunk of a large payload is prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing {
    /// `[255 | len]` then up to 58 payload bytes.
    Headerless,
    /// `[slot, 255 | len]` then up to 57 payload bytes.
    Slot(u8),
    /// `[slot, key_type]` then up to 57 payload bytes. There is no final
    /// marker: the device stops once it has the byte count implied by the
    /// key type, so this is only valid for key uploads of a known size.
    SlotKeyType { slot: u8, key_type: u8 },
}

impl Addressing {
    fn chunk_size(self) -> usize {
        match self {
            Self::Headerless => MAX_LARGE_PAYLOAD_SIZE,
            Self::Slot(_) | Self::SlotKeyType { .. } => MAX_ADDRESSED_PAYLOAD_SIZE,
        }
    }

    fn prefix(self, chunk_len: usize) -> Vec<u8> {
        // A final chunk that fills the whole budget still carries 255.
        let marker = if chunk_len < self.chunk_size() {
            chunk_len as u8
        } else {
            CONTINUATION
        };
        match self {
            Self::Headerless => vec![marker],
            Self::Slot(slot) => vec![slot, marker],
            Self::SlotKeyType { slot, key_type } => vec![slot, key_type],
        }
    }
}

/// Build one command report.
///
/// A slot id of 0 is indistinguishable from "no slot" on the wire and is
/// never written, so slot 0 cannot be addressed.
pub fn encode_report(
    message: Option<MessageKind>,
    slot_id: Option<u8>,
    field: Option<MessageField>,
    payload: &[u8],
) -> Result<Report, FrameError> {
    let mut raw = Vec::with_capacity(REPORT_SIZE);
    raw.extend_from_slice(&MESSAGE_HEADER);
    if let Some(msg) = message {
        raw.push(msg.code());
    }
    if let Some(slot) = slot_id.filter(|&s| s != 0) {
        raw.push(slot);
    }
    if let Some(field) = field {
        raw.push(field.code());
    }
    raw.extend_from_slice(payload);

    if raw.len() > REPORT_SIZE {
        return Err(FrameError::PayloadTooLarge(raw.len()));
    }

    let mut report = [0u8; REPORT_SIZE];
    report[..raw.len()].copy_from_slice(&raw);
    tracing::trace!(msg = ?message, slot = ?slot_id, field = ?field, len = payload.len(), "encoded report");
    Ok(report)
}

/// Split `payload` into ordered reports under the given addressing policy.
/// An empty payload produces no reports.
pub fn chunk_reports(
    message: Option<MessageKind>,
    addressing: Addressing,
    payload: &[u8],
) -> Result<Vec<Report>, FrameError> {
    let message = message.ok_or(FrameError::MissingMessageKind)?;
    payload
        .chunks(addressing.chunk_size())
        .map(|chunk| {
            let mut body = addressing.prefix(chunk.len());
            body.extend_from_slice(chunk);
            encode_report(Some(message), None, None, &body)
        })
        .collect()
}

/// Chunk `payload` and write every report in order. Returns the number of
/// reports written. Nothing is retried here.
pub fn send_chunked<T: Transport>(
    transport: &mut T,
    message: Option<MessageKind>,
    addressing: Addressing,
    payload: &[u8],
) -> Result<usize> {
    let reports = chunk_reports(message, addressing, payload)?;
    tracing::debug!(msg = ?message, ?addressing, len = payload.len(), chunks = reports.len(), "sending chunked message");
    for report in &reports {
        transport.write(report)?;
    }
    Ok(reports.len())
}
