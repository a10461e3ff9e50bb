//! Content-type allow-list and the magic numbers that identify each type.

use std::fmt;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// A content type uploads may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AllowedType {
    /// `image/png`
    Png,
    /// `application/pdf`
    Pdf,
}

impl AllowedType {
    /// Every allow-listed type.
    pub const ALL: [Self; 2] = [Self::Png, Self::Pdf];

    /// Match a declared `Content-Type` value against the allow-list.
    ///
    /// Parameters such as `; charset=binary` are ignored and the essence is
    /// compared ASCII case-insensitively.
    #[must_use]
    pub fn from_mime(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or_default().trim();
        Self::ALL.into_iter().find(|t| t.mime().eq_ignore_ascii_case(essence))
    }

    /// Canonical MIME name.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }

    /// Leading bytes every payload of this type must start with.
    #[must_use]
    pub const fn signature(self) -> &'static [u8] {
        match self {
            Self::Png => PNG_SIGNATURE,
            Self::Pdf => PDF_SIGNATURE,
        }
    }

    /// Return `true` if `payload` starts with this type's signature.
    #[must_use]
    pub fn matches(self, payload: &[u8]) -> bool {
        payload.starts_with(self.signature())
    }
}

impl fmt::Display for AllowedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
