//! The four-stage upload check and stored-name generation.
//!
//! Stages run in a fixed order and stop at the first failure:
//! path safety, type allow-list, size bound, signature.

use uuid::Uuid;

use crate::{AllowedType, RejectReason, SignatureCheck, UploadConfig, UploadRejection};

/// Outcome of a validated upload.
pub type UploadResult = Result<Accepted, UploadRejection>;

/// An upload that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Accepted {
    /// Random token joined to the original file name.
    pub stored_name: String,
    /// Payload length in bytes.
    pub size: u64,
}

/// Validates uploads against a fixed [`UploadConfig`].
#[derive(Debug, Clone, Default)]
pub struct UploadPipeline {
    config: UploadConfig,
}

impl UploadPipeline {
    #[must_use]
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Limits this pipeline enforces.
    #[must_use]
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Run the name and type checks and open a size-bounded upload.
    ///
    /// # Errors
    /// Returns a rejection with [`RejectReason::InvalidPath`] or
    /// [`RejectReason::InvalidType`].
    pub fn begin(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<PendingUpload, UploadRejection> {
        if !is_safe_name(file_name) {
            return Err(UploadRejection::new(RejectReason::InvalidPath));
        }
        let kind = AllowedType::from_mime(content_type)
            .ok_or_else(|| UploadRejection::new(RejectReason::InvalidType))?;
        Ok(PendingUpload {
            config: self.config,
            file_name: file_name.to_owned(),
            kind,
            payload: Vec::new(),
        })
    }

    /// Validate a fully buffered upload.
    ///
    /// # Errors
    /// Returns the rejection of the first failing stage.
    pub fn validate(&self, file_name: &str, content_type: &str, payload: &[u8]) -> UploadResult {
        let mut pending = self.begin(file_name, content_type)?;
        pending.push(payload)?;
        pending.finish()
    }
}

/// An upload whose name and type were accepted and whose bytes are arriving.
#[derive(Debug)]
pub struct PendingUpload {
    config: UploadConfig,
    file_name: String,
    kind: AllowedType,
    payload: Vec<u8>,
}

impl PendingUpload {
    /// Append a chunk of the payload.
    ///
    /// Nothing is buffered once the ceiling would be exceeded, so callers can
    /// stop reading the body as soon as this fails.
    ///
    /// # Errors
    /// Returns a rejection with [`RejectReason::TooLarge`].
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), UploadRejection> {
        let total = byte_len(&self.payload).saturating_add(byte_len(chunk));
        if total > self.config.max_size {
            return Err(UploadRejection::new(RejectReason::TooLarge));
        }
        self.payload.extend_from_slice(chunk);
        Ok(())
    }

    /// Run the signature check and derive the stored name.
    ///
    /// # Errors
    /// Returns a rejection with [`RejectReason::ContentMismatch`] unless the
    /// signature check is disabled.
    pub fn finish(self) -> UploadResult {
        if self.config.signature_check == SignatureCheck::Enforced
            && !self.kind.matches(&self.payload)
        {
            return Err(UploadRejection::new(RejectReason::ContentMismatch));
        }
        Ok(Accepted {
            stored_name: format!("{}_{}", Uuid::new_v4().simple(), self.file_name),
            size: byte_len(&self.payload),
        })
    }

    /// Bytes received so far.
    #[must_use]
    pub fn size(&self) -> u64 {
        byte_len(&self.payload)
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains(['/', '\\'])
}

fn byte_len(bytes: &[u8]) -> u64 {
    u64::try_from(bytes.len()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn png_payload(len: usize) -> Vec<u8> {
        let mut bytes = PNG.to_vec();
        bytes.resize(len.max(PNG.len()), 0);
        bytes
    }

    fn reason(result: &UploadResult) -> Option<RejectReason> {
        result.as_ref().err().map(|r| r.reason)
    }

    #[test]
    fn unsafe_names_reject_as_invalid_path() {
        let pipeline = UploadPipeline::default();
        for name in ["../../evil.pdf", "dir/file.png", "dir\\file.png", "..", ""] {
            let result = pipeline.validate(name, "image/png", &png_payload(16));
            assert_eq!(reason(&result), Some(RejectReason::InvalidPath), "name '{name}'");
        }
    }

    #[test]
    fn path_check_runs_before_type_check() {
        let pipeline = UploadPipeline::default();
        let result = pipeline.validate("../notes.txt", "text/plain", b"hello");
        assert_eq!(reason(&result), Some(RejectReason::InvalidPath));
    }

    #[test]
    fn type_check_runs_before_size_check() {
        let pipeline = UploadPipeline::new(UploadConfig::new(4, SignatureCheck::Enforced));
        let result = pipeline.validate("fake.txt", "text/plain", b"NOT_A_PNG");
        assert_eq!(reason(&result), Some(RejectReason::InvalidType));
    }

    #[test]
    fn size_check_runs_before_signature_check() {
        let pipeline = UploadPipeline::new(UploadConfig::new(8, SignatureCheck::Enforced));
        let result = pipeline.validate("big.png", "image/png", b"definitely not a png");
        assert_eq!(reason(&result), Some(RejectReason::TooLarge));
    }

    #[test]
    fn payload_at_exact_limit_is_accepted() {
        let pipeline = UploadPipeline::new(UploadConfig::new(32, SignatureCheck::Enforced));
        let result = pipeline.validate("edge.png", "image/png", &png_payload(32));
        assert_eq!(result.map(|a| a.size).ok(), Some(32));
    }

    #[test]
    fn mismatched_signature_rejects_when_enforced() {
        let pipeline = UploadPipeline::default();
        let result = pipeline.validate("test.png", "image/png", b"PNG\0\0\0");
        assert_eq!(reason(&result), Some(RejectReason::ContentMismatch));
    }

    #[test]
    fn disabled_signature_check_accepts_unsigned_payload() {
        let pipeline = UploadPipeline::new(UploadConfig::new(1024, SignatureCheck::Disabled));
        let result = pipeline.validate("test.png", "image/png", b"PNG\0\0\0");
        assert!(result.is_ok(), "signature must not be inspected: {result:?}");
    }

    #[test]
    fn accepted_name_keeps_original_behind_random_token() {
        let pipeline = UploadPipeline::default();
        let accepted = match pipeline.validate("photo.png", "image/png", &png_payload(100)) {
            Ok(a) => a,
            Err(e) => panic!("unexpected rejection: {e}"),
        };
        assert_ne!(accepted.stored_name, "photo.png");
        assert!(accepted.stored_name.ends_with("_photo.png"), "got {}", accepted.stored_name);
        let token = accepted.stored_name.trim_end_matches("_photo.png");
        assert_eq!(token.len(), 32, "token must be a simple uuid");
        assert_eq!(accepted.size, 100);
    }

    #[test]
    fn two_accepted_uploads_get_distinct_names() {
        let pipeline = UploadPipeline::default();
        let a = pipeline.validate("a.png", "image/png", PNG).map(|a| a.stored_name).ok();
        let b = pipeline.validate("a.png", "image/png", PNG).map(|a| a.stored_name).ok();
        assert!(a.is_some() && b.is_some());
        assert_ne!(a, b);
    }

    #[test]
    fn streaming_push_stops_at_ceiling() {
        let pipeline = UploadPipeline::new(UploadConfig::new(10, SignatureCheck::Enforced));
        let mut pending = match pipeline.begin("s.png", "image/png") {
            Ok(p) => p,
            Err(e) => panic!("unexpected rejection: {e}"),
        };
        assert!(pending.push(PNG).is_ok());
        assert_eq!(pending.size(), 8);
        let err = match pending.push(b"xyz") {
            Ok(()) => panic!("push past ceiling accepted"),
            Err(e) => e,
        };
        assert_eq!(err.reason, RejectReason::TooLarge);
        assert_eq!(pending.size(), 8, "rejected chunk must not be buffered");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest::proptest! {
            #[test]
            fn proptest_names_with_separators_always_rejected(
                prefix in "[a-z]{0,8}",
                sep in prop_oneof![Just("/"), Just("\\"), Just("..")],
                suffix in "[a-z.]{0,8}",
                payload in proptest::collection::vec(any::<u8>(), 0..64usize),
            ) {
                let name = format!("{prefix}{sep}{suffix}");
                let result = UploadPipeline::default().validate(&name, "application/pdf", &payload);
                prop_assert_eq!(reason(&result), Some(RejectReason::InvalidPath));
            }

            #[test]
            fn proptest_signed_pdf_under_limit_accepted_with_exact_size(
                name in "[a-z]{1,12}\\.pdf",
                body in proptest::collection::vec(any::<u8>(), 0..256usize),
            ) {
                let mut payload = b"%PDF-".to_vec();
                payload.extend_from_slice(&body);
                let accepted =
                    UploadPipeline::default().validate(&name, "application/pdf", &payload);
                let accepted = match accepted {
                    Ok(a) => a,
                    Err(e) => return Err(TestCaseError::fail(format!("rejected: {e}"))),
                };
                prop_assert_eq!(accepted.size, byte_len(&payload));
                let suffix = format!("_{name}");
                prop_assert!(accepted.stored_name.ends_with(&suffix));
            }
        }
    }
}
