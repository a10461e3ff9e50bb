//! Pipeline configuration.

/// Default upload ceiling: 5 MiB.
pub const DEFAULT_MAX_SIZE: u64 = 5 * 1024 * 1024;

/// Whether the leading-byte signature check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum SignatureCheck {
    /// Payloads must start with the magic bytes of their declared type.
    #[default]
    Enforced,
    /// Signatures are not inspected. Meant for test deployments only.
    Disabled,
}

/// Configuration for an [`crate::UploadPipeline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct UploadConfig {
    /// Largest accepted payload, in bytes.
    pub max_size: u64,
    /// Signature check mode.
    pub signature_check: SignatureCheck,
}

impl UploadConfig {
    /// Create a config with the given limits.
    #[must_use]
    pub const fn new(max_size: u64, signature_check: SignatureCheck) -> Self {
        Self { max_size, signature_check }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, SignatureCheck::Enforced)
    }
}
