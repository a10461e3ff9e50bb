//! Fuzz target: the upload validation pipeline.
//!
//! The input is split into a file name, a content type and a payload.
//! Accepted uploads must have a safe original name and an exact size.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wish_upload::{RejectReason, UploadPipeline};

fuzz_target!(|data: &[u8]| {
    let mut parts = data.splitn(3, |b| *b == 0);
    let (Some(name), Some(content_type)) = (parts.next(), parts.next()) else {
        return;
    };
    let payload = parts.next().unwrap_or_default();
    let name = String::from_utf8_lossy(name);
    let content_type = String::from_utf8_lossy(content_type);

    let unsafe_name = name.is_empty() || name.contains("..") || name.contains(['/', '\\']);
    match UploadPipeline::default().validate(&name, &content_type, payload) {
        Ok(accepted) => {
            assert!(!unsafe_name, "unsafe name '{name}' was accepted");
            assert_eq!(accepted.size, payload.len() as u64);
            assert!(accepted.stored_name.ends_with(&*name));
        }
        Err(rejection) => {
            if unsafe_name {
                assert_eq!(rejection.reason, RejectReason::InvalidPath);
            }
        }
    }
});
