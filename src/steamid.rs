//! SteamID bit layout and its textual forms.
//!
//! A Steam64 packs, from the low bits up: a 32-bit account number, a 20-bit
//! instance, a 4-bit account type and an 8-bit universe. Every displayed
//! form is derived from those fields.

use std::fmt;
use std::str::FromStr;

const ACCOUNT_ID_MASK: u64 = 0xFFFF_FFFF;
const INSTANCE_MASK: u64 = 0x000F_FFFF;
const DESKTOP_INSTANCE: u32 = 1;
const PUBLIC_UNIVERSE: u8 = 1;
const CHAT_CLAN_FLAG: u32 = (INSTANCE_MASK as u32 + 1) >> 1;
const CHAT_LOBBY_FLAG: u32 = (INSTANCE_MASK as u32 + 1) >> 2;

/// Account type stored in bits 52..56.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountType {
    Invalid,
    Individual,
    Multiseat,
    GameServer,
    AnonGameServer,
    Pending,
    ContentServer,
    Clan,
    Chat,
    ConsoleUser,
    AnonUser,
}

impl AccountType {
    fn from_bits(bits: u8) -> Self {
        match bits {
            1 => AccountType::Individual,
            2 => AccountType::Multiseat,
            3 => AccountType::GameServer,
            4 => AccountType::AnonGameServer,
            5 => AccountType::Pending,
            6 => AccountType::ContentServer,
            7 => AccountType::Clan,
            8 => AccountType::Chat,
            9 => AccountType::ConsoleUser,
            10 => AccountType::AnonUser,
            _ => AccountType::Invalid,
        }
    }

    /// Letter used in the Steam3 rendering.
    pub fn type_char(&self) -> char {
        match self {
            AccountType::Individual => 'U',
            AccountType::Multiseat => 'M',
            AccountType::GameServer => 'G',
            AccountType::AnonGameServer => 'A',
            AccountType::Pending => 'P',
            AccountType::ContentServer => 'C',
            AccountType::Clan => 'g',
            AccountType::Chat => 'T',
            AccountType::AnonUser => 'a',
            AccountType::Invalid | AccountType::ConsoleUser => 'I',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SteamId(u64);

impl SteamId {
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn account_id(&self) -> u32 {
        (self.0 & ACCOUNT_ID_MASK) as u32
    }

    /// Short id shown as "SteamID"; the 32-bit account number.
    pub fn id(&self) -> u32 {
        self.account_id()
    }

    pub fn instance(&self) -> u32 {
        ((self.0 >> 32) & INSTANCE_MASK) as u32
    }

    pub fn account_type(&self) -> AccountType {
        AccountType::from_bits(((self.0 >> 52) & 0xF) as u8)
    }

    pub fn universe(&self) -> u8 {
        (self.0 >> 56) as u8
    }

    pub fn is_public_individual(&self) -> bool {
        self.universe() == PUBLIC_UNIVERSE && self.account_type() == AccountType::Individual
    }

    pub fn as_steam2(&self) -> String {
        let id = self.account_id();
        format!("STEAM_{}:{}:{}", self.universe(), id & 1, id >> 1)
    }

    pub fn as_steam3(&self) -> String {
        let account_type = self.account_type();
        let instance = match account_type {
            AccountType::AnonGameServer | AccountType::Multiseat => Some(self.instance()),
            AccountType::Individual if self.instance() != DESKTOP_INSTANCE => {
                Some(self.instance())
            }
            _ => None,
        };
        let type_char = match account_type {
            AccountType::Chat if self.instance() & CHAT_CLAN_FLAG != 0 => 'c',
            AccountType::Chat if self.instance() & CHAT_LOBBY_FLAG != 0 => 'L',
            _ => account_type.type_char(),
        };
        let mut rendered = format!(
            "[{}:{}:{}",
            type_char,
            self.universe(),
            self.account_id()
        );
        if let Some(instance) = instance {
            rendered.push_str(&format!(":{}", instance));
        }
        rendered.push(']');
        rendered
    }

    /// Labelled lines printed by `resolve-identity`.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("AccountID", self.account_id().to_string()),
            ("SteamID", self.id().to_string()),
            ("Steam2 ID", self.as_steam2()),
            ("Steam3 ID", self.as_steam3()),
            ("Steam64", self.0.to_string()),
        ]
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SteamId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(SteamId)
    }
}
