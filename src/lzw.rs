//! Lempel-Ziv-Welch dictionary coding.
//!
//! Both sides start from the 256 single-byte strings and learn one new string
//! per emitted code: the matched string extended by the byte that ended the
//! match. The decoder sees the codes in the same order and so rebuilds the same
//! dictionary one step behind the encoder, without it ever being transmitted.
//!
//! Codes are written as big-endian 16-bit fields. The dictionary is bounded by
//! [`LzwConfig::max_entries`]; what happens when it fills is set by
//! [`OverflowPolicy`].

use std::collections::HashMap;

use crate::config::{LzwConfig, OverflowPolicy};
use crate::error::{Error, Result};
use crate::Codec;

/// First code assigned to a learned string.
const FIRST_CODE: usize = 256;

/// LZW code stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LzwArtifact {
    /// Concatenated big-endian 16-bit codes.
    pub payload: Vec<u8>,
}

impl LzwArtifact {
    /// Number of codes in the payload.
    pub fn code_count(&self) -> usize {
        self.payload.len() / 2
    }
}

/// LZW coding as a [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LzwCodec {
    config: LzwConfig,
}

impl LzwCodec {
    /// Codec with 16-bit codes and a frozen dictionary at capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with explicit dictionary settings.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if the config fails validation.
    pub fn with_config(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Settings in use.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}

impl Codec for LzwCodec {
    type Artifact = LzwArtifact;

    fn encode(&self, input: &[u8]) -> Result<LzwArtifact> {
        let Some((&first, rest)) = input.split_first() else {
            return Ok(LzwArtifact::default());
        };
        let max_entries = self.config.max_entries();

        // (prefix code, next byte) -> code of the extended string.
        let mut dict: HashMap<(u16, u8), u16> = HashMap::with_capacity(4096);
        let mut next_code = FIRST_CODE;
        let mut payload = Vec::with_capacity(input.len());
        let mut current = first as u16;

        for &b in rest {
            if let Some(&code) = dict.get(&(current, b)) {
                current = code;
                continue;
            }

            payload.extend_from_slice(&current.to_be_bytes());
            if next_code < max_entries {
                dict.insert((current, b), next_code as u16);
                next_code += 1;
                if next_code == max_entries {
                    match self.config.overflow {
                        OverflowPolicy::Freeze => {
                            log::trace!("lzw encode: dictionary frozen at {} entries", next_code);
                        }
                        OverflowPolicy::Reset => {
                            log::trace!("lzw encode: dictionary reset at {} entries", next_code);
                            dict.clear();
                            next_code = FIRST_CODE;
                        }
                    }
                }
            }
            current = b as u16;
        }
        payload.extend_from_slice(&current.to_be_bytes());

        log::debug!(
            "lzw encode: {} bytes -> {} codes",
            input.len(),
            payload.len() / 2
        );
        Ok(LzwArtifact { payload })
    }

    fn decode(&self, artifact: &LzwArtifact) -> Result<Vec<u8>> {
        let data = &artifact.payload;
        if data.len() % 2 != 0 {
            return Err(Error::TruncatedStream("odd-length lzw payload"));
        }
        let mut codes = data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        let Some(first) = codes.next() else {
            return Ok(Vec::new());
        };
        let max_entries = self.config.max_entries();

        let mut dict: Vec<Vec<u8>> = Vec::with_capacity(4096);
        dict.extend((0..=255u8).map(|b| vec![b]));

        let mut old = dict
            .get(first as usize)
            .cloned()
            .ok_or(Error::LzwInvalidCode {
                code: first,
                next_code: FIRST_CODE,
            })?;
        let mut out = Vec::with_capacity(data.len() * 2);
        out.extend_from_slice(&old);

        for code in codes {
            let next_code = dict.len();
            let entry = if (code as usize) < next_code {
                dict[code as usize].clone()
            } else if code as usize == next_code && next_code < max_entries {
                // The string being defined by this very step.
                let mut s = old.clone();
                s.push(old[0]);
                s
            } else {
                return Err(Error::LzwInvalidCode { code, next_code });
            };
            out.extend_from_slice(&entry);

            if next_code < max_entries {
                let mut learned = old;
                learned.push(entry[0]);
                dict.push(learned);
                if dict.len() == max_entries && self.config.overflow == OverflowPolicy::Reset {
                    log::trace!("lzw decode: dictionary reset at {} entries", max_entries);
                    dict.truncate(FIRST_CODE);
                }
            }
            old = entry;
        }

        log::debug!(
            "lzw decode: {} codes -> {} bytes",
            artifact.code_count(),
            out.len()
        );
        Ok(out)
    }
}
