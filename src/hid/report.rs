pub const REPORT_SIZE: usize = 64;

/// One outbound HID report. Always fully populated, unused bytes are zero.
pub type Report = [u8; REPORT_SIZE];

/// Trailing zero bytes are report padding, never payload.
pub fn strip_padding(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &data[..end]
}
