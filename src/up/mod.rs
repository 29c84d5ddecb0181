pub mod challenge;
pub mod prompt;

pub use challenge::{ChallengeCode, derive_challenge};
pub use prompt::{ConfirmPrompt, Confirmer, ConsoleConfirmer, PinentryConfirmer};

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfirmError {
    #[error("operator did not confirm in time")]
    Timeout,
    #[error("operator aborted the confirmation")]
    Denied,
    #[error("confirmation I/O: {0}")]
    Io(String),
}

pub(crate) fn require_confirmation(
    confirmer: &mut dyn Confirmer,
    prompt: &ConfirmPrompt,
    timeout: Option<Duration>,
) -> Result<(), ConfirmError> {
    confirmer.wait_for_confirmation(prompt, timeout)?;
    tracing::debug!("operator confirmed challenge");
    Ok(())
}
