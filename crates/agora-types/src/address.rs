use crate::error::TypesError;
use bech32::{Bech32m, Hrp};
use std::fmt;
use std::str::FromStr;

/// 20-byte account address identifying a governance actor.
///
/// Derived as the first 20 bytes of `blake3(ed25519_pubkey)`. Displays as
/// Bech32m with the `agora` prefix; parses from that form or from 0x-hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Self = Self([0u8; 20]);
    pub const LEN: usize = 20;

    /// Bech32m human-readable prefix
    pub const BECH32_HRP: &'static str = "agora";

    fn hrp() -> Hrp {
        Hrp::parse_unchecked(Self::BECH32_HRP)
    }

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, TypesError> {
        let bytes: [u8; Self::LEN] = slice
            .try_into()
            .map_err(|_| TypesError::InvalidAddressLength(slice.len()))?;
        Ok(Self(bytes))
    }

    /// Derive an address from 32 ed25519 public key bytes.
    pub fn from_public_key(pubkey: &[u8; 32]) -> Self {
        let digest = blake3::hash(pubkey);
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&digest.as_bytes()[..Self::LEN]);
        Self(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self == &Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded =
            bech32::encode::<Bech32m>(Self::hrp(), &self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x{})", hex::encode(self.0))
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            let bytes = hex::decode(digits)?;
            return Self::from_slice(&bytes);
        }

        let (hrp, data) =
            bech32::decode(s).map_err(|e| TypesError::Bech32Error(e.to_string()))?;
        if hrp != Self::hrp() {
            return Err(TypesError::WrongAddressPrefix {
                expected: Self::BECH32_HRP,
                got: hrp.to_string(),
            });
        }
        Self::from_slice(&data)
    }
}
