#![allow(dead_code)]

use okhid::hid::{Connector, REPORT_SIZE, Report, Transport, TransportError};
use okhid::up::{ConfirmError, ConfirmPrompt, Confirmer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

#[derive(Default)]
pub struct DeviceState {
    pub written: Vec<Report>,
    /// Readable right now. An empty entry reads as a timeout.
    pub readable: VecDeque<Vec<u8>>,
    /// Moved into `readable` on the next write.
    pub replies: VecDeque<Vec<u8>>,
    pub reads: usize,
    pub nonblocking: bool,
}

/// Scripted stand-in for the token. Clones share state, so a test can keep a
/// handle after the session takes ownership of the transport.
#[derive(Clone, Default)]
pub struct SimDevice(pub Rc<RefCell<DeviceState>>);

impl SimDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_readable(&self, data: Vec<u8>) {
        self.0.borrow_mut().readable.push_back(data);
    }

    pub fn reply_on_write(&self, data: Vec<u8>) {
        self.0.borrow_mut().replies.push_back(data);
    }

    pub fn written(&self) -> Vec<Report> {
        self.0.borrow().written.clone()
    }
}

impl Transport for SimDevice {
    fn write(&mut self, report: &Report) -> Result<(), TransportError> {
        let mut state = self.0.borrow_mut();
        state.written.push(*report);
        let replies: Vec<_> = state.replies.drain(..).collect();
        state.readable.extend(replies);
        Ok(())
    }

    fn read(&mut self, max: usize, _timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
        let mut state = self.0.borrow_mut();
        state.reads += 1;
        let mut next = state.readable.pop_front().unwrap_or_default();
        next.truncate(max);
        Ok(next)
    }

    fn set_nonblocking(&mut self, nonblocking: bool) -> Result<(), TransportError> {
        self.0.borrow_mut().nonblocking = nonblocking;
        Ok(())
    }
}

/// Hands out the same simulated device after `failures` failed opens.
pub struct SimConnector {
    pub device: SimDevice,
    pub failures: u32,
    pub opens: u32,
}

impl SimConnector {
    pub fn new(device: SimDevice) -> Self {
        Self { device, failures: 0, opens: 0 }
    }
}

impl Connector for SimConnector {
    type Transport = SimDevice;

    fn open(&mut self) -> Result<SimDevice, TransportError> {
        self.opens += 1;
        if self.opens <= self.failures {
            return Err(TransportError::Open("device busy".into()));
        }
        Ok(self.device.clone())
    }
}

/// Records what the operator was shown and when.
pub struct ScriptedConfirmer {
    pub device: SimDevice,
    pub answer: Result<(), ConfirmError>,
    pub shown: Vec<[u8; 3]>,
    pub writes_when_shown: Vec<usize>,
    pub writes_when_confirmed: Vec<usize>,
    pub timeouts: Vec<Option<Duration>>,
}

impl ScriptedConfirmer {
    pub fn accepting(device: &SimDevice) -> Self {
        Self {
            device: device.clone(),
            answer: Ok(()),
            shown: Vec::new(),
            writes_when_shown: Vec::new(),
            writes_when_confirmed: Vec::new(),
            timeouts: Vec::new(),
        }
    }
}

impl Confirmer for ScriptedConfirmer {
    fn show_challenge(&mut self, prompt: &ConfirmPrompt) {
        self.shown.push(prompt.code.0);
        self.writes_when_shown.push(self.device.written().len());
    }

    fn wait_for_confirmation(
        &mut self,
        _prompt: &ConfirmPrompt,
        timeout: Option<Duration>,
    ) -> Result<(), ConfirmError> {
        self.writes_when_confirmed.push(self.device.written().len());
        self.timeouts.push(timeout);
        match &self.answer {
            Ok(()) => Ok(()),
            Err(ConfirmError::Timeout) => Err(ConfirmError::Timeout),
            Err(_) => Err(ConfirmError::Denied),
        }
    }
}

/// A 64-byte inbound report holding `data` followed by zero padding.
pub fn padded(data: &[u8]) -> Vec<u8> {
    let mut report = vec![0u8; REPORT_SIZE];
    report[..data.len()].copy_from_slice(data);
    report
}

pub fn label_report(wire_slot: u8, label: &str) -> Vec<u8> {
    let mut data = vec![wire_slot, b'|'];
    data.extend_from_slice(label.as_bytes());
    padded(&data)
}

pub fn full_part(fill: u8) -> Vec<u8> {
    vec![fill; REPORT_SIZE]
}
