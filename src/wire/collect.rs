use std::time::Duration;

use crate::error::{Error, Result};
use crate::hid::{REPORT_SIZE, Transport, strip_padding};

/// Concatenation of the parts of a multi-report response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledResponse {
    pub data: Vec<u8>,
    pub parts_expected: usize,
    pub parts_received: usize,
}

impl AssembledResponse {
    fn new(parts_expected: usize) -> Self {
        Self {
            data: Vec::with_capacity(parts_expected * REPORT_SIZE),
            parts_expected,
            parts_received: 0,
        }
    }

    /// Start an assembly whose first part was already read.
    pub fn with_first(first: Vec<u8>, parts_expected: usize) -> Self {
        let mut assembled = Self::new(parts_expected);
        assembled.data = first;
        assembled.parts_received = 1;
        assembled
    }

    pub fn is_complete(&self) -> bool {
        self.parts_received == self.parts_expected
    }

    /// Append the parts of a follow-up assembly.
    pub fn extend(&mut self, rest: AssembledResponse) {
        self.data.extend_from_slice(&rest.data);
        self.parts_received += rest.parts_received;
    }

    /// The assembled bytes, or `PartialResponse` carrying whatever arrived.
    pub fn into_complete(self) -> Result<Vec<u8>> {
        if self.is_complete() {
            return Ok(self.data);
        }
        Err(Error::PartialResponse {
            expected: self.parts_expected,
            received: self.parts_received,
            data: self.data,
        })
    }
}

/// Reads inbound reports off a borrowed transport.
pub struct ResponseCollector<'a, T: Transport> {
    transport: &'a mut T,
}

impl<'a, T: Transport> ResponseCollector<'a, T> {
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// One report with its zero padding removed. Empty on timeout.
    pub fn read_one(&mut self, timeout_ms: i32) -> Result<Vec<u8>> {
        let raw = self.transport.read(REPORT_SIZE, timeout_ms)?;
        let data = strip_padding(&raw).to_vec();
        tracing::trace!(len = data.len(), "read report");
        Ok(data)
    }

    /// One report as text, one char per byte.
    pub fn read_string(&mut self, timeout_ms: i32) -> Result<String> {
        Ok(self.read_one(timeout_ms)?.iter().map(|&b| b as char).collect())
    }

    /// Read until a full 64-byte report arrives, at most `max_attempts` reads.
    pub fn read_part(&mut self, timeout_ms: i32, max_attempts: usize) -> Result<Option<Vec<u8>>> {
        for attempt in 1..=max_attempts {
            let raw = self.transport.read(REPORT_SIZE, timeout_ms)?;
            if raw.len() == REPORT_SIZE {
                return Ok(Some(raw));
            }
            tracing::trace!(attempt, len = raw.len(), "short read, part not ready");
        }
        Ok(None)
    }

    /// Read `part_count` parts in arrival order. A part that never arrives
    /// contributes nothing and leaves the assembly incomplete.
    pub fn read_assembled(
        &mut self,
        part_count: usize,
        timeout_ms: i32,
        max_attempts_per_part: usize,
    ) -> Result<AssembledResponse> {
        let mut assembled = AssembledResponse::new(part_count);
        for part in 0..part_count {
            match self.read_part(timeout_ms, max_attempts_per_part)? {
                Some(data) => {
                    assembled.data.extend_from_slice(&data);
                    assembled.parts_received += 1;
                }
                None => tracing::warn!(part, attempts = max_attempts_per_part, "response part missing"),
            }
        }
        Ok(assembled)
    }

    /// Poll for the first non-empty report. The device can take several
    /// seconds (RSA-4096) before it answers.
    pub fn poll_first(
        &mut self,
        attempts: usize,
        interval: Duration,
        timeout_ms: i32,
    ) -> Result<Option<Vec<u8>>> {
        for attempt in 1..=attempts {
            std::thread::sleep(interval);
            let raw = self.transport.read(REPORT_SIZE, timeout_ms)?;
            if !raw.is_empty() {
                tracing::debug!(attempt, len = raw.len(), "first response part received");
                return Ok(Some(raw));
            }
        }
        Ok(None)
    }

    /// Discard buffered reports until a read comes back empty. Returns the
    /// number of reports dropped.
    pub fn drain(&mut self, timeout_ms: i32, max_reads: usize) -> Result<usize> {
        let mut dropped = 0;
        while dropped < max_reads {
            if self.read_one(timeout_ms)?.is_empty() {
                break;
            }
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, "flushed stale reports");
        }
        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hid::{Report, TransportError};
    use std::collections::VecDeque;

    struct Scripted(VecDeque<Vec<u8>>);

    impl Transport for Scripted {
        fn write(&mut self, _report: &Report) -> Result<(), TransportError> {
            Ok(())
        }

        fn read(&mut self, max: usize, _timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
            let mut next = self.0.pop_front().unwrap_or_default();
            next.truncate(max);
            Ok(next)
        }
    }

    #[test]
    fn test_read_one_strips_padding() {
        let mut report = vec![0u8; 64];
        report[..3].copy_from_slice(b"abc");
        let mut t = Scripted(VecDeque::from([report]));
        assert_eq!(ResponseCollector::new(&mut t).read_one(10).unwrap(), b"abc");
    }

    #[test]
    fn test_read_part_retries_short_reads() {
        let mut t = Scripted(VecDeque::from([vec![], vec![1, 2], vec![9u8; 64]]));
        let part = ResponseCollector::new(&mut t).read_part(10, 10).unwrap();
        assert_eq!(part, Some(vec![9u8; 64]));
    }

    #[test]
    fn test_read_part_gives_up() {
        let mut t = Scripted(VecDeque::new());
        assert_eq!(ResponseCollector::new(&mut t).read_part(10, 3).unwrap(), None);
    }

    #[test]
    fn test_drain_is_bounded() {
        let mut t = Scripted(vec![vec![1u8]; 100].into());
        assert_eq!(ResponseCollector::new(&mut t).drain(10, 16).unwrap(), 16);
    }

    #[test]
    fn test_into_complete_reports_partial() {
        let assembled = AssembledResponse::with_first(vec![1u8; 64], 8);
        let res = assembled.into_complete();
        assert!(matches!(
            res,
            Err(Error::PartialResponse { expected: 8, received: 1, ref data }) if data.len() == 64
        ));
    }
}
