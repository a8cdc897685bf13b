//! Process token gating every disclosing or mutating route.

use std::fmt;

use anyhow::{Result, anyhow};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

#[derive(Clone)]
pub struct ProcessToken(String);

impl ProcessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// SHA-256 hex digest of 32 bytes from the OS CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut seed = [0u8; 32];
        getrandom::getrandom(&mut seed).map_err(|e| anyhow!("OS random source unavailable: {e}"))?;
        Ok(Self(format!("{:x}", Sha256::digest(seed))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a caller-supplied token.
    pub fn verify(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl fmt::Debug for ProcessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ProcessToken(***)")
    }
}
