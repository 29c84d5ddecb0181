pub mod report;

#[cfg(feature = "usb")]
pub mod device;

pub use report::{REPORT_SIZE, Report, strip_padding};

#[cfg(feature = "usb")]
pub use device::{UsbConnector, UsbTransport};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to open device: {0}")]
    Open(String),
    #[error("HID read error: {0}")]
    Read(String),
    #[error("HID write error: {0}")]
    Write(String),
    #[error("Short write: {0} of 64 bytes")]
    ShortWrite(usize),
}

/// Byte-oriented, fixed report size link to the device.
pub trait Transport {
    /// Write one full report.
    fn write(&mut self, report: &Report) -> Result<(), TransportError>;

    /// Read at most `max` bytes. An empty vector means nothing arrived
    /// before `timeout_ms` elapsed.
    fn read(&mut self, max: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError>;

    fn set_nonblocking(&mut self, _nonblocking: bool) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Opens a fresh transport to the device. Called once per connect attempt.
pub trait Connector {
    type Transport: Transport;

    fn open(&mut self) -> Result<Self::Transport, TransportError>;
}
