use super::{ConfirmError, challenge::ChallengeCode};
use std::io::BufRead;
use std::sync::mpsc;
use std::time::Duration;

pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
    pub code: ChallengeCode,
}

pub fn sign_prompt(slot_name: &str, code: ChallengeCode) -> ConfirmPrompt {
    ConfirmPrompt {
        title: "okhid".to_string(),
        description: format!(
            "Sign with {slot_name}\n\nEnter the challenge code on the device: {code}\n\nPress OK once it is entered."
        ),
        code,
    }
}

pub fn decrypt_prompt(slot_name: &str, code: ChallengeCode) -> ConfirmPrompt {
    ConfirmPrompt {
        title: "okhid".to_string(),
        description: format!(
            "Decrypt with {slot_name}\n\nEnter the challenge code on the device: {code}\n\nPress OK once it is entered."
        ),
        code,
    }
}

/// Local side of the operator confirmation.
pub trait Confirmer {
    /// Show the digits before the request goes out.
    fn show_challenge(&mut self, prompt: &ConfirmPrompt);

    /// Block until the operator says the code was entered on the device.
    fn wait_for_confirmation(
        &mut self,
        prompt: &ConfirmPrompt,
        timeout: Option<Duration>,
    ) -> Result<(), ConfirmError>;
}

/// Prints the digits and waits for ENTER on stdin.
#[derive(Debug, Default)]
pub struct ConsoleConfirmer;

impl Confirmer for ConsoleConfirmer {
    fn show_challenge(&mut self, prompt: &ConfirmPrompt) {
        println!("{}", challenge_banner(prompt, "and press ENTER here"));
    }

    fn wait_for_confirmation(
        &mut self,
        _prompt: &ConfirmPrompt,
        timeout: Option<Duration>,
    ) -> Result<(), ConfirmError> {
        let (tx, rx) = mpsc::channel();
        // Stays blocked on stdin after a timeout until the process exits.
        std::thread::spawn(move || {
            let _ = tx.send(read_enter(std::io::stdin().lock()));
        });
        match timeout {
            Some(t) => rx.recv_timeout(t).map_err(|_| ConfirmError::Timeout)?,
            None => rx.recv().map_err(|_| ConfirmError::Denied)?,
        }
    }
}

/// Text shown before the request goes out, ending with the digits.
pub fn challenge_banner(prompt: &ConfirmPrompt, action: &str) -> String {
    format!(
        "You should see your device blink 3 times\n\
         Please enter the 3 digit challenge code on the device ({action})\n{}",
        prompt.code
    )
}

/// One line from the operator. End of input is never a confirmation.
fn read_enter(mut input: impl BufRead) -> Result<(), ConfirmError> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => Err(ConfirmError::Denied),
        Ok(_) => Ok(()),
        Err(e) => Err(ConfirmError::Io(e.to_string())),
    }
}

/// Asks through a pinentry confirmation dialog.
#[derive(Debug)]
pub struct PinentryConfirmer {
    binary: String,
}

impl PinentryConfirmer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Confirmer for PinentryConfirmer {
    fn show_challenge(&mut self, prompt: &ConfirmPrompt) {
        eprintln!("{}", challenge_banner(prompt, "then press Entered"));
        tracing::info!(code = %prompt.code, "challenge code");
    }

    fn wait_for_confirmation(
        &mut self,
        prompt: &ConfirmPrompt,
        timeout: Option<Duration>,
    ) -> Result<(), ConfirmError> {
        let mut dialog = pinentry::ConfirmationDialog::with_binary(&self.binary)
            .ok_or_else(|| ConfirmError::Io(format!("pinentry binary not found: {}", self.binary)))?;
        dialog
            .with_title(&prompt.title)
            .with_ok("Entered")
            .with_cancel("Abort");
        if let Some(t) = timeout {
            dialog.with_timeout(t.as_secs().clamp(1, u16::MAX as u64) as u16);
        }
        match dialog.confirm(&prompt.description) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ConfirmError::Denied),
            Err(e) => Err(ConfirmError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::up::ChallengeCode;

    #[test]
    fn test_end_of_input_does_not_confirm() {
        assert!(matches!(read_enter(std::io::empty()), Err(ConfirmError::Denied)));
    }

    #[test]
    fn test_enter_confirms() {
        assert!(read_enter(std::io::Cursor::new(b"\n".to_vec())).is_ok());
        assert!(read_enter(std::io::Cursor::new(b"ok".to_vec())).is_ok());
    }

    #[test]
    fn test_banner_ends_with_digits() {
        let prompt = sign_prompt("ECC Key 1", ChallengeCode([2, 4, 1]));
        let banner = challenge_banner(&prompt, "then press Entered");
        assert!(banner.ends_with("\n2 4 1"), "{banner}");
        assert!(prompt.description.contains("2 4 1"));
    }
}
