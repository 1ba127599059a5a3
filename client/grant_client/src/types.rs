//! # Value types
//!
//! Primitive aliases shared by the domain model, the method registry and the
//! transport boundary.
//!
//! ## Wire forms
//!
//! | Type          | Rust repr   | JSON form                       |
//! |---------------|-------------|---------------------------------|
//! | [`AccountId`] | `String`    | `"alice.near"`                  |
//! | [`Amount`]    | `u128`      | `"1000000000000000000000000"`   |
//! | [`Gas`]       | `u64`       | `30000000000000`                |
//! | [`Timestamp`] | `u32`       | `1652797280` (seconds)          |
//! | [`PublicKey`] | curve+bytes | `"ed25519:<base58>"`            |
//! | [`Base64Args`]| `Vec<u8>`   | `"eyJ2b3RlcyI6NX0="`            |
//!
//! Token amounts never pass through a float. The yocto → NEAR conversion in
//! [`Amount::to_near_string`] is for display only and is done on integers.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ClientError, Result};

/// Identifier of a round, assigned sequentially by the contract.
pub type RoundId = u64;

/// Round length in seconds.
pub type Duration = u32;

// ── AccountId ────────────────────────────────────────────────────────

pub const MIN_ACCOUNT_ID_LEN: usize = 2;
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Validated account identifier.
///
/// Parts are separated by `.`; each part is runs of `[a-z0-9]` joined by a single
/// `-` or `_`. Comparison is plain case-sensitive string equality.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if Self::is_valid(&id) {
            Ok(Self(id))
        } else {
            Err(ClientError::InvalidAccountId(id))
        }
    }

    pub fn is_valid(id: &str) -> bool {
        if id.len() < MIN_ACCOUNT_ID_LEN || id.len() > MAX_ACCOUNT_ID_LEN {
            return false;
        }
        // Leading separator is rejected by starting "after" one.
        let mut last_was_separator = true;
        for c in id.bytes() {
            let is_separator = match c {
                b'a'..=b'z' | b'0'..=b'9' => false,
                b'-' | b'_' | b'.' => true,
                _ => return false,
            };
            if is_separator && last_was_separator {
                return false;
            }
            last_was_separator = is_separator;
        }
        !last_was_separator
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl FromStr for AccountId {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Amount ───────────────────────────────────────────────────────────

/// Number of yocto units in one NEAR.
pub const ONE_NEAR: u128 = 1_000_000_000_000_000_000_000_000;
const NEAR_DECIMALS: usize = 24;

/// Non-negative 128-bit token amount in yocto units.
///
/// Serialized as a decimal string; a JSON number is rejected on input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Self = Self(0);

    pub const fn from_yocto(raw: u128) -> Self {
        Self(raw)
    }

    /// Whole NEAR to yocto. `None` on overflow.
    pub fn from_near(near: u128) -> Option<Self> {
        near.checked_mul(ONE_NEAR).map(Self)
    }

    pub const fn as_yocto(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: u128) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Render as NEAR with `decimals` fractional digits, truncating.
    pub fn to_near_string(&self, decimals: usize) -> String {
        let whole = self.0 / ONE_NEAR;
        if decimals == 0 {
            return whole.to_string();
        }
        let frac = format!("{:0width$}", self.0 % ONE_NEAR, width = NEAR_DECIMALS);
        let decimals = decimals.min(NEAR_DECIMALS);
        format!("{whole}.{}", &frac[..decimals])
    }
}

impl FromStr for Amount {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientError::InvalidAmount(s.to_string()));
        }
        s.parse::<u128>()
            .map(Self)
            .map_err(|_| ClientError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Gas ──────────────────────────────────────────────────────────────

/// Computation budget attached to a change call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gas(u64);

pub const ONE_TGAS: u64 = 1_000_000_000_000;

/// Budget used when a change call does not name one. Large enough for the
/// heaviest grant method (`vote`, which may also schedule a refund transfer).
pub const DEFAULT_FUNCTION_CALL_GAS: Gas = Gas(30 * ONE_TGAS);

impl Gas {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// `tgas` teragas, saturating at `u64::MAX` gas (about 18446 TGas).
    pub const fn from_tgas(tgas: u64) -> Self {
        Self(tgas.saturating_mul(ONE_TGAS))
    }

    pub const fn checked_from_tgas(tgas: u64) -> Option<Self> {
        match tgas.checked_mul(ONE_TGAS) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl FromStr for Gas {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Display for Gas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Timestamp ────────────────────────────────────────────────────────

/// Seconds since the Unix epoch, as recorded by the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const fn from_secs(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_secs(&self) -> u32 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::from(self.0), 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}", self.0),
        }
    }
}

// ── PublicKey ────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCurve {
    Ed25519,
    Secp256k1,
}

impl KeyCurve {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
        }
    }

    fn key_len(&self) -> usize {
        match self {
            Self::Ed25519 => 32,
            Self::Secp256k1 => 64,
        }
    }
}

/// Public key in `<curve>:<base58>` form. A bare base58 string is read as ed25519.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    curve: KeyCurve,
    data: Vec<u8>,
}

impl PublicKey {
    pub fn curve(&self) -> KeyCurve {
        self.curve
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FromStr for PublicKey {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        let (curve, encoded) = match s.split_once(':') {
            Some(("ed25519", rest)) => (KeyCurve::Ed25519, rest),
            Some(("secp256k1", rest)) => (KeyCurve::Secp256k1, rest),
            Some((other, _)) => {
                return Err(ClientError::InvalidPublicKey(format!(
                    "unknown curve {other:?}"
                )))
            }
            None => (KeyCurve::Ed25519, s),
        };
        let data = bs58::decode(encoded)
            .into_vec()
            .map_err(|e| ClientError::InvalidPublicKey(e.to_string()))?;
        if data.len() != curve.key_len() {
            return Err(ClientError::InvalidPublicKey(format!(
                "{} key must be {} bytes, got {}",
                curve.prefix(),
                curve.key_len(),
                data.len()
            )));
        }
        Ok(Self { curve, data })
    }
}

impl TryFrom<String> for PublicKey {
    type Error = ClientError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.curve.prefix(),
            bs58::encode(&self.data).into_string()
        )
    }
}

// ── Base64Args ───────────────────────────────────────────────────────

/// Serialized method arguments as carried inside an action.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Base64Args(Vec<u8>);

impl Base64Args {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(&self.0)
    }
}

impl Serialize for Base64Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Base64Args {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        STANDARD
            .decode(s.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}
