pub mod collect;
pub mod packet;
pub mod types;

pub use collect::{AssembledResponse, ResponseCollector};
pub use packet::{Addressing, chunk_reports, encode_report, send_chunked};

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Payload too large: {0} bytes do not fit in a 64 byte report")]
    PayloadTooLarge(usize),
    #[error("Empty payload: nothing to send")]
    EmptyPayload,
    #[error("Missing message kind")]
    MissingMessageKind,
}
