pub mod timing;

pub use timing::Timing;

use std::time::Duration;

use crate::error::{Error, Result};
use crate::hid::{Connector, Transport, TransportError};
use crate::slots::{
    LabelQuery, Slot, canonical_name,
    names::{KEY_SLOTS, PASSWORD_SLOTS},
    parse_slot_label_response, to_wire_slot,
};
use crate::up::{self, Confirmer, derive_challenge, prompt};
use crate::wire::{
    Addressing, AssembledResponse, FrameError, ResponseCollector, encode_report, send_chunked,
    types::{KEY_LABELS_SELECTOR, KeyType, LARGE_RESPONSE_PARTS, MessageField, MessageKind},
};

/// Reports the device sends back after a wipe.
const WIPE_ACK_REPORTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Connected,
    Busy,
}

/// Exclusive owner of one device connection. Every operation takes
/// `&mut self`, so reports of two operations can never interleave.
pub struct Session<T: Transport> {
    transport: Option<T>,
    state: SessionState,
    timing: Timing,
    confirm_timeout: Option<Duration>,
}

impl<T: Transport> Session<T> {
    pub fn new(timing: Timing) -> Self {
        Self {
            transport: None,
            state: SessionState::Disconnected,
            timing,
            confirm_timeout: None,
        }
    }

    /// Bound the wait for the operator to enter the challenge code.
    pub fn with_confirm_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn connect<C>(&mut self, connector: &mut C) -> Result<()>
    where
        C: Connector<Transport = T>,
    {
        self.close();
        self.state = SessionState::Connecting;
        let attempts = self.timing.connect_attempts.max(1);
        let mut last_err = None;
        for attempt in 1..=attempts {
            match open_nonblocking(connector) {
                Ok(transport) => {
                    self.transport = Some(transport);
                    self.state = SessionState::Connected;
                    tracing::info!(attempt, "connected");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(attempt, "connect failed: {e}");
                    last_err = Some(e);
                    if attempt < attempts {
                        std::thread::sleep(self.timing.connect_retry_delay);
                    }
                }
            }
        }
        self.state = SessionState::Disconnected;
        Err(Error::DeviceUnavailable {
            attempts,
            source: last_err.unwrap_or_else(|| TransportError::Open("no attempt made".into())),
        })
    }

    /// Release the transport. Later operations fail with `NotConnected`.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::info!("session closed");
        }
        self.state = SessionState::Disconnected;
    }

    fn with_transport<R>(
        &mut self,
        op: &'static str,
        f: impl FnOnce(&mut T, &Timing) -> Result<R>,
    ) -> Result<R> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        self.state = SessionState::Busy;
        tracing::debug!(op, "operation start");
        let res = f(transport, &self.timing);
        self.state = SessionState::Connected;
        if let Err(e) = &res {
            tracing::debug!(op, "operation failed: {e}");
        }
        res
    }

    /// Whether the device reports itself as initialized.
    pub fn initialized(&mut self) -> Result<bool> {
        self.with_transport("initialized", |transport, timing| {
            let reply = ResponseCollector::new(transport).read_string(timing.string_read_timeout_ms)?;
            Ok(reply == "INITIALIZED")
        })
    }

    /// Drop reports left buffered by an earlier exchange.
    pub fn flush(&mut self) -> Result<()> {
        self.with_transport("flush", flush_stale)
    }

    pub fn get_labels(&mut self) -> Result<Vec<Slot>> {
        self.with_transport("get_labels", |transport, timing| {
            let report = encode_report(Some(MessageKind::GetLabels), None, None, &[])?;
            transport.write(&report)?;
            std::thread::sleep(timing.labels_settle);
            read_labels(transport, timing, LabelQuery::Passwords)
        })
    }

    pub fn get_key_labels(&mut self) -> Result<Vec<Slot>> {
        self.with_transport("get_key_labels", |transport, timing| {
            let report =
                encode_report(Some(MessageKind::GetLabels), Some(KEY_LABELS_SELECTOR), None, &[])?;
            transport.write(&report)?;
            std::thread::sleep(timing.key_labels_settle);
            read_labels(transport, timing, LabelQuery::Keys)
        })
    }

    /// Set one field of a password slot. Returns the device's acknowledgement.
    pub fn set_slot(&mut self, slot: u8, field: MessageField, value: &[u8]) -> Result<String> {
        let wire = password_wire_slot(slot)?;
        self.with_transport("set_slot", |transport, timing| {
            let report = encode_report(Some(MessageKind::SetSlot), Some(wire), Some(field), value)?;
            tracing::debug!(slot, wire, ?field, "set slot");
            transport.write(&report)?;
            ResponseCollector::new(transport).read_string(timing.string_read_timeout_ms)
        })
    }

    /// Wipe a password slot. Returns the non-empty acknowledgements.
    pub fn wipe_slot(&mut self, slot: u8) -> Result<Vec<String>> {
        let wire = password_wire_slot(slot)?;
        self.with_transport("wipe_slot", |transport, timing| {
            let report = encode_report(Some(MessageKind::WipeSlot), Some(wire), None, &[])?;
            tracing::debug!(slot, wire, "wipe slot");
            transport.write(&report)?;
            let mut collector = ResponseCollector::new(transport);
            let mut acks = Vec::new();
            for _ in 0..WIPE_ACK_REPORTS {
                let ack = collector.read_string(timing.string_read_timeout_ms)?;
                if !ack.is_empty() {
                    acks.push(ack);
                }
            }
            Ok(acks)
        })
    }

    /// Upload a private key. The device stops reading once it has the
    /// number of bytes implied by `key_type`.
    pub fn set_private_key(&mut self, slot: u8, key_type: KeyType, key: &[u8]) -> Result<usize> {
        key_slot_name(slot)?;
        self.with_transport("set_private_key", |transport, _| {
            let addressing = Addressing::SlotKeyType { slot, key_type: key_type.code() };
            send_chunked(transport, Some(MessageKind::SetPriv), addressing, key)
        })
    }

    /// Sign `payload` with a key slot after the operator confirms the
    /// challenge code on the device.
    pub fn sign(
        &mut self,
        slot: u8,
        payload: &[u8],
        confirmer: &mut dyn Confirmer,
    ) -> Result<Vec<u8>> {
        let name = key_slot_name(slot)?;
        reject_empty(payload)?;
        let confirm_timeout = self.confirm_timeout;
        self.with_transport("sign", |transport, timing| {
            flush_stale(transport, timing)?;
            let prompt = prompt::sign_prompt(name, derive_challenge(payload));
            confirmer.show_challenge(&prompt);
            send_chunked(transport, Some(MessageKind::SignChallenge), Addressing::Slot(slot), payload)?;
            up::require_confirmation(confirmer, &prompt, confirm_timeout)?;
            read_large_response(transport, timing, Error::SignatureUnavailable)
        })
    }

    /// Decrypt `ciphertext` with a key slot. The device answers in a single
    /// report, returned as read.
    pub fn decrypt(
        &mut self,
        slot: u8,
        ciphertext: &[u8],
        confirmer: &mut dyn Confirmer,
    ) -> Result<Vec<u8>> {
        let name = key_slot_name(slot)?;
        reject_empty(ciphertext)?;
        let confirm_timeout = self.confirm_timeout;
        self.with_transport("decrypt", |transport, timing| {
            flush_stale(transport, timing)?;
            let prompt = prompt::decrypt_prompt(name, derive_challenge(ciphertext));
            confirmer.show_challenge(&prompt);
            send_chunked(transport, Some(MessageKind::Decrypt), Addressing::Slot(slot), ciphertext)?;
            up::require_confirmation(confirmer, &prompt, confirm_timeout)?;
            ResponseCollector::new(transport)
                .poll_first(timing.first_part_attempts, timing.first_part_interval, timing.part_read_timeout_ms)?
                .ok_or(Error::DecryptionUnavailable)
        })
    }

    pub fn get_public_key(&mut self, slot: u8) -> Result<Vec<u8>> {
        key_slot_name(slot)?;
        self.with_transport("get_public_key", |transport, timing| {
            flush_stale(transport, timing)?;
            let report = encode_report(Some(MessageKind::GetPubKey), None, None, &[slot])?;
            transport.write(&report)?;
            std::thread::sleep(timing.pubkey_request_delay);
            read_large_response(transport, timing, Error::PublicKeyUnavailable)
        })
    }
}

fn open_nonblocking<C: Connector>(connector: &mut C) -> Result<C::Transport, TransportError> {
    let mut transport = connector.open()?;
    transport.set_nonblocking(true)?;
    Ok(transport)
}

/// Zero chunks would reach the device, so there is nothing to confirm.
fn reject_empty(payload: &[u8]) -> Result<()> {
    if payload.is_empty() {
        return Err(FrameError::EmptyPayload.into());
    }
    Ok(())
}

fn password_wire_slot(slot: u8) -> Result<u8> {
    if !PASSWORD_SLOTS.contains(&slot) {
        return Err(Error::NotAPasswordSlot(slot));
    }
    Ok(to_wire_slot(slot))
}

fn key_slot_name(slot: u8) -> Result<&'static str> {
    if !KEY_SLOTS.contains(&slot) {
        return Err(Error::NotAKeySlot(slot));
    }
    Ok(canonical_name(slot)?)
}

fn read_labels<T: Transport>(transport: &mut T, timing: &Timing, query: LabelQuery) -> Result<Vec<Slot>> {
    let mut collector = ResponseCollector::new(transport);
    let mut slots = Vec::with_capacity(query.response_count());
    for _ in 0..query.response_count() {
        let raw = collector.read_string(timing.string_read_timeout_ms)?;
        if let Some(slot) = parse_slot_label_response(&raw, query) {
            slots.push(slot);
        }
    }
    slots.sort_by_key(|s| s.number);
    Ok(slots)
}

/// Drop whatever the device left buffered from an earlier exchange.
fn flush_stale<T: Transport>(transport: &mut T, timing: &Timing) -> Result<()> {
    std::thread::sleep(timing.pre_flush_delay);
    ResponseCollector::new(transport).drain(timing.flush_read_timeout_ms, timing.max_flush_reads)?;
    std::thread::sleep(timing.settle_delay);
    Ok(())
}

/// First part through its own poll loop, then the remaining parts under the
/// per-part retry policy.
fn read_large_response<T: Transport>(
    transport: &mut T,
    timing: &Timing,
    unavailable: Error,
) -> Result<Vec<u8>> {
    let mut collector = ResponseCollector::new(transport);
    let first = collector
        .poll_first(timing.first_part_attempts, timing.first_part_interval, timing.part_read_timeout_ms)?
        .ok_or(unavailable)?;
    let mut assembled = AssembledResponse::with_first(first, LARGE_RESPONSE_PARTS);
    assembled.extend(collector.read_assembled(
        LARGE_RESPONSE_PARTS - 1,
        timing.part_read_timeout_ms,
        timing.part_attempts,
    )?);
    tracing::debug!(
        parts = assembled.parts_received,
        len = assembled.data.len(),
        "large response collected"
    );
    assembled.into_complete()
}
