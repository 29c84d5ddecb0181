use std::time::Duration;

/// Delays, timeouts and retry budgets of one session.
///
/// Defaults follow how long the device actually takes: RSA-4096 signing can
/// need around nine seconds before the first part shows up.
#[derive(Debug, Clone)]
pub struct Timing {
    pub connect_attempts: u32,
    pub connect_retry_delay: Duration,
    /// Before flushing stale reports ahead of a confirming operation.
    pub pre_flush_delay: Duration,
    /// After the flush, before the request goes out.
    pub settle_delay: Duration,
    pub flush_read_timeout_ms: i32,
    pub max_flush_reads: usize,
    pub labels_settle: Duration,
    pub key_labels_settle: Duration,
    pub pubkey_request_delay: Duration,
    pub string_read_timeout_ms: i32,
    pub part_read_timeout_ms: i32,
    pub part_attempts: usize,
    pub first_part_interval: Duration,
    pub first_part_attempts: usize,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            connect_attempts: 5,
            connect_retry_delay: Duration::from_millis(1500),
            pre_flush_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            flush_read_timeout_ms: 100,
            max_flush_reads: 64,
            labels_settle: Duration::from_millis(200),
            key_labels_settle: Duration::from_millis(400),
            pubkey_request_delay: Duration::from_secs(1),
            string_read_timeout_ms: 2000,
            part_read_timeout_ms: 100,
            part_attempts: 10,
            first_part_interval: Duration::from_millis(500),
            first_part_attempts: 60,
        }
    }
}

impl Timing {
    /// No sleeps and short budgets, for simulated devices.
    pub fn immediate() -> Self {
        Self {
            connect_retry_delay: Duration::ZERO,
            pre_flush_delay: Duration::ZERO,
            settle_delay: Duration::ZERO,
            flush_read_timeout_ms: 0,
            labels_settle: Duration::ZERO,
            key_labels_settle: Duration::ZERO,
            pubkey_request_delay: Duration::ZERO,
            string_read_timeout_ms: 0,
            part_read_timeout_ms: 0,
            first_part_interval: Duration::ZERO,
            first_part_attempts: 5,
            ..Self::default()
        }
    }
}
