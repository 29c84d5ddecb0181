#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Device unavailable after {attempts} connect attempt(s): {source}")]
    DeviceUnavailable {
        attempts: u32,
        #[source]
        source: crate::hid::TransportError,
    },
    #[error("Session is not connected")]
    NotConnected,
    #[error("Framing: {0}")]
    Frame(#[from] crate::wire::FrameError),
    #[error("HID: {0}")]
    Transport(#[from] crate::hid::TransportError),
    #[error("Partial response: {received} of {expected} part(s)")]
    PartialResponse {
        expected: usize,
        received: usize,
        data: Vec<u8>,
    },
    #[error("{0}")]
    UnknownSlot(#[from] crate::slots::UnknownSlot),
    #[error("Slot {0} is not a key slot")]
    NotAKeySlot(u8),
    #[error("Slot {0} is not a password slot")]
    NotAPasswordSlot(u8),
    #[error("Failed to read signature from device")]
    SignatureUnavailable,
    #[error("Failed to read public key from device")]
    PublicKeyUnavailable,
    #[error("Failed to read decrypted data from device")]
    DecryptionUnavailable,
    #[error("Confirmation: {0}")]
    Confirmation(#[from] crate::up::ConfirmError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
