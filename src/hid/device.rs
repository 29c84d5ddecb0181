use hidapi::{HidApi, HidDevice};

use super::{Connector, REPORT_SIZE, Report, Transport, TransportError};

/// Opens the first HID device matching a vendor/product pair.
pub struct UsbConnector {
    vendor_id: u16,
    product_id: u16,
}

impl UsbConnector {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self { vendor_id, product_id }
    }
}

impl Connector for UsbConnector {
    type Transport = UsbTransport;

    fn open(&mut self) -> Result<UsbTransport, TransportError> {
        let api = HidApi::new().map_err(|e| TransportError::Open(e.to_string()))?;
        let device = api
            .open(self.vendor_id, self.product_id)
            .map_err(|e| TransportError::Open(e.to_string()))?;
        tracing::debug!(
            vendor = format!("{:#06x}", self.vendor_id),
            product = format!("{:#06x}", self.product_id),
            "HID device opened"
        );
        Ok(UsbTransport { _api: api, device })
    }
}

pub struct UsbTransport {
    _api: HidApi,
    device: HidDevice,
}

impl Transport for UsbTransport {
    fn write(&mut self, report: &Report) -> Result<(), TransportError> {
        // The report goes out verbatim; the device firmware reads the 0xFF
        // header where hidapi expects a report id.
        let written = self
            .device
            .write(report)
            .map_err(|e| TransportError::Write(e.to_string()))?;
        if written < REPORT_SIZE {
            return Err(TransportError::ShortWrite(written));
        }
        tracing::trace!("HID tx 64 bytes");
        Ok(())
    }

    fn read(&mut self, max: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
        let mut buf = vec![0u8; max];
        let len = self
            .device
            .read_timeout(&mut buf, timeout_ms)
            .map_err(|e| TransportError::Read(e.to_string()))?;
        buf.truncate(len);
        tracing::trace!(len, "HID rx");
        Ok(buf)
    }

    fn set_nonblocking(&mut self, nonblocking: bool) -> Result<(), TransportError> {
        self.device
            .set_blocking_mode(!nonblocking)
            .map_err(|e| TransportError::Open(e.to_string()))
    }
}
