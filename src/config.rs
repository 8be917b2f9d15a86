//! Codec configuration.
//!
//! Only LZW has tunable behaviour. The config is plain data so callers can
//! load it from whatever format they already use; both sides of a stream must
//! agree on it, since none of it is written into the payload.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Narrowest code width that still leaves room beyond the 256 singletons.
pub const MIN_CODE_BITS: u8 = 9;

/// Widest code width; codes are stored in 16-bit fields.
pub const MAX_CODE_BITS: u8 = 16;

/// What the LZW dictionary does once every code is assigned.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// **Default:** stop learning. Existing entries stay usable for the rest
    /// of the stream.
    #[default]
    Freeze,

    /// Drop back to the 256 singleton entries right after the insertion that
    /// fills the dictionary. Adapts to data whose statistics drift.
    Reset,
}

/// LZW dictionary settings.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LzwConfig {
    /// Dictionary holds at most `1 << max_code_bits` entries.
    pub max_code_bits: u8,
    /// Behaviour at capacity.
    pub overflow: OverflowPolicy,
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self {
            max_code_bits: MAX_CODE_BITS,
            overflow: OverflowPolicy::Freeze,
        }
    }
}

impl LzwConfig {
    /// Check the code width is usable.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if `max_code_bits` is outside
    /// [`MIN_CODE_BITS`]..=[`MAX_CODE_BITS`].
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CODE_BITS..=MAX_CODE_BITS).contains(&self.max_code_bits) {
            return Err(Error::InvalidConfig(format!(
                "max_code_bits must be in {}..={}, got {}",
                MIN_CODE_BITS, MAX_CODE_BITS, self.max_code_bits
            )));
        }
        Ok(())
    }

    /// Dictionary capacity in entries.
    pub fn max_entries(&self) -> usize {
        1usize << self.max_code_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_full_width_freeze() {
        let config = LzwConfig::default();
        assert_eq!(config.max_entries(), 65536);
        assert_eq!(config.overflow, OverflowPolicy::Freeze);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bounds() {
        for bits in [0u8, 8, 17, 32] {
            let config = LzwConfig {
                max_code_bits: bits,
                ..LzwConfig::default()
            };
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LzwConfig = serde_json::from_str(r#"{"overflow": "reset"}"#).unwrap();
        assert_eq!(config.max_code_bits, MAX_CODE_BITS);
        assert_eq!(config.overflow, OverflowPolicy::Reset);

        let config: LzwConfig = serde_json::from_str(r#"{"max_code_bits": 12}"#).unwrap();
        assert_eq!(config.max_entries(), 4096);
        assert_eq!(config.overflow, OverflowPolicy::Freeze);
    }
}
