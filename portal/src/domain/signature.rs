//! Captured e-signatures for lease documents.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::{Value, json};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

/// Rejected signature capture.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    /// Blank signer name.
    #[error("signer name must not be empty")]
    EmptySignerName,
    /// Nothing was drawn.
    #[error("signature image is empty")]
    EmptyImage,
    /// Image bytes lack the PNG signature.
    #[error("signature image must be a PNG")]
    NotPng,
    /// The signer did not tick the acknowledgement.
    #[error("signature must be acknowledged before submitting")]
    NotAcknowledged,
}

/// Signature drawn on the signing pad, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureCapture {
    signer_name: String,
    image: Vec<u8>,
    signed_at: DateTime<Utc>,
}

impl SignatureCapture {
    /// Accept a rendered PNG of the signature. The signer must have ticked
    /// the agreement box.
    pub fn new(
        signer_name: &str,
        png: Vec<u8>,
        acknowledged: bool,
        clock: &dyn Clock,
    ) -> Result<Self, SignatureError> {
        let signer_name = signer_name.trim();
        if signer_name.is_empty() {
            return Err(SignatureError::EmptySignerName);
        }
        if png.is_empty() {
            return Err(SignatureError::EmptyImage);
        }
        if !png.starts_with(&PNG_MAGIC) {
            return Err(SignatureError::NotPng);
        }
        if !acknowledged {
            return Err(SignatureError::NotAcknowledged);
        }
        Ok(Self {
            signer_name: signer_name.to_owned(),
            image: png,
            signed_at: clock.utc(),
        })
    }

    /// Signer's typed name.
    #[must_use]
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// `data:` URL embedding the PNG.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.image))
    }

    /// Body for the sign-document endpoint.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "signature": self.data_url(),
            "signerName": self.signer_name,
            "signedAt": self.signed_at.to_rfc3339(),
            "agreedToTerms": true,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::test_support::MutableClock;

    #[fixture]
    fn clock() -> MutableClock {
        MutableClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 15, 30, 0).single().expect("time"))
    }

    fn png(extra: &[u8]) -> Vec<u8> {
        PNG_MAGIC.iter().chain(extra).copied().collect()
    }

    #[rstest]
    fn payload_embeds_png_as_data_url(clock: MutableClock) {
        let capture = SignatureCapture::new(" Morgan Lee ", png(b"IHDR"), true, &clock)
            .expect("capture");
        let payload = capture.to_payload();

        assert_eq!(payload["signerName"], "Morgan Lee");
        assert_eq!(payload["signedAt"], "2026-10-19T15:30:00+00:00");
        let url = payload["signature"].as_str().expect("string");
        let encoded = url
            .strip_prefix("data:image/png;base64,")
            .expect("png data url");
        assert_eq!(STANDARD.decode(encoded).expect("base64"), png(b"IHDR"));
    }

    #[rstest]
    #[case::blank_name("  ", png(b""), true, SignatureError::EmptySignerName)]
    #[case::no_image("Morgan", Vec::new(), true, SignatureError::EmptyImage)]
    #[case::jpeg("Morgan", vec![0xff, 0xd8, 0xff, 0xe0], true, SignatureError::NotPng)]
    #[case::unticked("Morgan", png(b""), false, SignatureError::NotAcknowledged)]
    fn rejects_incomplete_captures(
        clock: MutableClock,
        #[case] name: &str,
        #[case] image: Vec<u8>,
        #[case] acknowledged: bool,
        #[case] expected: SignatureError,
    ) {
        let err = SignatureCapture::new(name, image, acknowledged, &clock).expect_err("rejected");
        assert_eq!(err, expected);
    }
}
