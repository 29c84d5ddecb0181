pub const MESSAGE_HEADER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Payload budget of one report in headerless chunking:
/// 64 - 4 header - 1 message - 1 length/continuation byte.
pub const MAX_LARGE_PAYLOAD_SIZE: usize = 58;
/// One more byte goes to the slot id in the addressed schemes.
pub const MAX_ADDRESSED_PAYLOAD_SIZE: usize = MAX_LARGE_PAYLOAD_SIZE - 1;

/// Marker byte meaning "more chunks follow".
pub const CONTINUATION: u8 = 0xFF;

/// Parts in a signature or public-key response (512 bytes).
pub const LARGE_RESPONSE_PARTS: usize = 8;

/// Slot value that asks GetLabels for key labels instead of password slots.
pub const KEY_LABELS_SELECTOR: u8 = 107;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    SetPin = 0xE1,
    SetSdPin = 0xE2,
    SetPdPin = 0xE3,
    SetTime = 0xE4,
    GetLabels = 0xE5,
    SetSlot = 0xE6,
    WipeSlot = 0xE7,
    SetU2fPriv = 0xE8,
    WipeU2fPriv = 0xE9,
    SetU2fCert = 0xEA,
    WipeU2fCert = 0xEB,
    GetPubKey = 0xEC,
    SignChallenge = 0xED,
    WipePriv = 0xEE,
    SetPriv = 0xEF,
    Decrypt = 0xF0,
    Restore = 0xF1,
}

impl MessageKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageField {
    Label = 1,
    Username = 2,
    NextKey2 = 3,
    Delay2 = 4,
    Password = 5,
    NextKey3 = 6,
    Delay3 = 7,
    TfaType = 8,
    TotpKey = 9,
    YubiAuth = 10,
    IdleTimeout = 11,
    WipeMode = 12,
    KeyTypeSpeed = 13,
    KeyLayout = 14,
    Url = 15,
    NextKey1 = 16,
    Delay1 = 17,
}

impl MessageField {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::str::FromStr for MessageField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.to_ascii_lowercase().as_str() {
            "label" => Self::Label,
            "username" => Self::Username,
            "nextkey2" => Self::NextKey2,
            "delay2" => Self::Delay2,
            "password" => Self::Password,
            "nextkey3" => Self::NextKey3,
            "delay3" => Self::Delay3,
            "tfatype" => Self::TfaType,
            "totpkey" => Self::TotpKey,
            "yubiauth" => Self::YubiAuth,
            "idletimeout" => Self::IdleTimeout,
            "wipemode" => Self::WipeMode,
            "keytypespeed" => Self::KeyTypeSpeed,
            "keylayout" => Self::KeyLayout,
            "url" => Self::Url,
            "nextkey1" => Self::NextKey1,
            "delay1" => Self::Delay1,
            other => return Err(format!("unknown slot field '{other}'")),
        };
        Ok(field)
    }
}

/// Key algorithm byte sent with private key uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyType {
    Ed25519 = 1,
    P256 = 2,
    Secp256k1 = 3,
}

impl KeyType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::str::FromStr for KeyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ed25519" => Ok(Self::Ed25519),
            "p256" => Ok(Self::P256),
            "secp256k1" => Ok(Self::Secp256k1),
            other => Err(format!("unknown key type '{other}'")),
        }
    }
}
