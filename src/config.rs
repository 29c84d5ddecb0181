use std::time::Duration;

pub const VENDOR_ID: u16 = 0x16C0;
pub const PRODUCT_ID: u16 = 0x0486;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmMode {
    /// Print the challenge code and wait for ENTER.
    Console,
    /// Ask through a pinentry confirmation dialog.
    Pinentry,
}

#[derive(clap::Parser, Debug, Clone)]
#[command(name = "okhid", about = "Talk to an OnlyKey-style token over HID")]
pub struct Config {
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[arg(long, default_value_t = VENDOR_ID, value_parser = parse_u16)]
    pub vendor_id: u16,
    #[arg(long, default_value_t = PRODUCT_ID, value_parser = parse_u16)]
    pub product_id: u16,
    #[arg(long, value_enum, default_value = "console")]
    pub confirm: ConfirmMode,
    #[arg(long, default_value = "pinentry")]
    pub pinentry: String,
    /// Seconds to wait for the challenge code to be entered. 0 waits forever.
    #[arg(long, default_value_t = 120)]
    pub confirm_timeout: u64,
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn confirm_timeout(&self) -> Option<Duration> {
        (self.confirm_timeout > 0).then(|| Duration::from_secs(self.confirm_timeout))
    }
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Check whether the device reports INITIALIZED.
    Status,
    /// List password slot labels.
    Labels,
    /// List RSA/ECC key labels.
    KeyLabels,
    /// Set one field of a password slot.
    SetSlot {
        slot: u8,
        field: crate::wire::types::MessageField,
        value: String,
    },
    /// Wipe every field of a password slot.
    WipeSlot { slot: u8 },
    /// Sign a hex-encoded digest with a key slot.
    Sign { slot: u8, data: String },
    /// Decrypt a hex-encoded ciphertext with a key slot.
    Decrypt { slot: u8, data: String },
    /// Fetch the public key of a key slot.
    Pubkey { slot: u8 },
    /// Upload a hex-encoded private key to a key slot.
    SetKey {
        slot: u8,
        key_type: crate::wire::types::KeyType,
        data: String,
    },
}

fn parse_u16(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid id '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_sign_command() {
        let cfg = Config::parse_from(["okhid", "-vv", "sign", "29", "deadbeef"]);
        assert_eq!(cfg.verbose, 2);
        assert_eq!(cfg.vendor_id, VENDOR_ID);
        assert!(matches!(cfg.command, Command::Sign { slot: 29, ref data } if data == "deadbeef"));
        assert_eq!(cfg.confirm_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_parse_hex_ids_and_field() {
        let cfg = Config::parse_from([
            "okhid", "--vendor-id", "0x1209", "--confirm-timeout", "0",
            "set-slot", "10", "password", "hunter2",
        ]);
        assert_eq!(cfg.vendor_id, 0x1209);
        assert_eq!(cfg.confirm_timeout(), None);
        assert!(matches!(
            cfg.command,
            Command::SetSlot { slot: 10, field: crate::wire::types::MessageField::Password, .. }
        ));
    }
}
