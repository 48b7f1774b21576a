use alloc::string::{String, ToString};
use core::fmt::{self, Display, Write as _};

use crate::amount::{Amount, AmountError};
use crate::crc::{Crc16, Crc16FromHexError};
use crate::proxy::{Proxy, ProxyClassifyError};
use crate::tlv::TlvWriter;

mod tag {
    pub(super) const PAYLOAD_FORMAT_INDICATOR: &str = "00";
    pub(super) const POI_METHOD: &str = "01";
    pub(super) const MERCHANT_ACCOUNT: &str = "29";
    pub(super) const MERCHANT_CATEGORY: &str = "52";
    pub(super) const CURRENCY: &str = "53";
    pub(super) const AMOUNT: &str = "54";
    pub(super) const COUNTRY: &str = "58";

    // sub-tags of the merchant account field
    pub(super) const MERCHANT_AID: &str = "00";
    pub(super) const MERCHANT_PROXY: &str = "01";
}

/// EMV merchant-presented QR, version 01
const PAYLOAD_FORMAT_EMV_V1: &str = "01";
/// Static QR, reusable across transactions
const POI_METHOD_STATIC: &str = "11";
/// PromptPay credit transfer application ID
const AID_PROMPTPAY_CREDIT_TRANSFER: &str = "A000000677010111";
const MERCHANT_CATEGORY_UNSPECIFIED: &str = "0000";
/// ISO 4217 numeric code for Thai Baht
const CURRENCY_THB: &str = "764";
const COUNTRY_TH: &str = "TH";

/// A PromptPay EMV QR payload
///
/// Holds a classified [`Proxy`] and an optional [`Amount`];
/// [`QrPayload::encode`] produces the flat TLV string, CRC trailer
/// included, ready to be handed to a QR matrix encoder.
///
/// Without an amount the QR is "static": the payer enters the amount
/// in their banking app.
#[derive(Debug, Clone, PartialEq)]
pub struct QrPayload {
    proxy: Proxy,
    amount: Option<Amount>,
}

impl QrPayload {
    #[must_use]
    pub fn new(proxy: Proxy) -> Self {
        Self {
            proxy,
            amount: None,
        }
    }

    #[must_use]
    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn proxy(&self) -> &Proxy {
        &self.proxy
    }

    #[must_use]
    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// Encode the payload.
    ///
    /// Fields are emitted in the conventional order
    /// `00, 01, 29, 52, 53, [54], 58, 63`; readers parse by tag, but
    /// reference generators and their test vectors all use this order.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut writer = TlvWriter::new();
        writer.field(tag::PAYLOAD_FORMAT_INDICATOR, PAYLOAD_FORMAT_EMV_V1);
        writer.field(tag::POI_METHOD, POI_METHOD_STATIC);

        let mut merchant_account = TlvWriter::new();
        merchant_account.field(tag::MERCHANT_AID, AID_PROMPTPAY_CREDIT_TRANSFER);
        merchant_account.field(tag::MERCHANT_PROXY, &self.proxy.merchant_account_value());
        writer.field(tag::MERCHANT_ACCOUNT, merchant_account.as_str());

        writer.field(tag::MERCHANT_CATEGORY, MERCHANT_CATEGORY_UNSPECIFIED);
        writer.field(tag::CURRENCY, CURRENCY_THB);

        if let Some(amount) = self.amount {
            writer.field(tag::AMOUNT, &amount.to_string());
        }

        writer.field(tag::COUNTRY, COUNTRY_TH);

        let mut payload = writer.into_string();
        // tag 63 with its fixed length of 4; the checksum covers both
        payload.push_str("6304");
        let crc = Crc16::compute(payload.as_bytes());
        write!(payload, "{crc}").expect("write CRC trailer");

        payload
    }
}

impl Display for QrPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Generate a PromptPay payload from a raw identifier.
///
/// `identifier` is classified as a Thai mobile number or national ID.
/// `amount` follows the reference generator's contract: `None`, zero,
/// negative and non-finite values all mean "payer enters the amount"
/// and omit the amount field entirely.
///
/// # Errors
///
/// It returns an error if `identifier` fails classification or the
/// amount is too large to encode.
pub fn generate(identifier: &str, amount: Option<f64>) -> Result<String, GenerateError> {
    let proxy = Proxy::classify(identifier)?;
    let mut payload = QrPayload::new(proxy);

    if let Some(baht) = amount {
        match Amount::new(baht) {
            Ok(amount) => payload = payload.with_amount(amount),
            Err(AmountError::NotFinite | AmountError::NotPositive) => {}
            Err(err @ AmountError::TooLarge) => return Err(err.into()),
        }
    }

    Ok(payload.encode())
}

/// Verify the CRC trailer of an EMV QR payload.
///
/// Checks that `payload` ends with a `6304XXXX` CRC field and that
/// recomputing the checksum over everything before the hex digits
/// reproduces the trailer. Useful for validating scanned payloads
/// before parsing them further.
///
/// The payload must be pure ASCII; see [`Crc16`] for why.
///
/// # Errors
///
/// It returns an error if the trailer is missing or malformed, or if
/// the checksum does not match.
pub fn verify_checksum(payload: &str) -> Result<(), VerifyChecksumError> {
    if !payload.is_ascii() {
        return Err(VerifyChecksumError::NotAscii);
    }

    let Some(covered_len) = payload.len().checked_sub(4) else {
        return Err(VerifyChecksumError::MissingChecksum);
    };
    let (covered, trailer_hex) = payload.split_at(covered_len);
    if !covered.ends_with("6304") {
        return Err(VerifyChecksumError::MissingChecksum);
    }

    let expected = Crc16::from_hex(trailer_hex)?;
    if Crc16::compute(covered.as_bytes()) != expected {
        return Err(VerifyChecksumError::BadCrc);
    }

    Ok(())
}

/// An error encountered while generating a payload
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The identifier is not a usable PromptPay proxy
    #[error(transparent)]
    Proxy(#[from] ProxyClassifyError),
    /// The amount cannot be encoded
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// An error encountered while verifying a payload's CRC trailer
#[derive(Debug, thiserror::Error)]
pub enum VerifyChecksumError {
    /// The payload contains non-ASCII characters
    #[error("payload contains non-ASCII characters")]
    NotAscii,
    /// The payload does not end with a `63` CRC field
    #[error("payload does not end with a CRC field")]
    MissingChecksum,
    /// The trailer is not 4 uppercase hex digits
    #[error(transparent)]
    InvalidTrailer(#[from] Crc16FromHexError),
    /// The recomputed checksum does not match the trailer
    #[error("CRC mismatch")]
    BadCrc,
}

#[cfg(test)]
mod tests {
    use claims::{assert_matches, assert_ok, assert_ok_eq};

    use super::{generate, verify_checksum, GenerateError, QrPayload, VerifyChecksumError};
    use crate::{Amount, Proxy};

    #[test]
    fn phone_payload_without_amount() {
        assert_ok_eq!(
            generate("0812345678", None),
            "00020101021129370016A000000677010111011300668123456785204000053037645802TH630474B5"
        );
    }

    #[test]
    fn phone_payload_with_amount() {
        assert_ok_eq!(
            generate("0812345678", Some(100.5)),
            "00020101021129370016A000000677010111011300668123456785204000053037645406100.505802TH6304ACCB"
        );
    }

    #[test]
    fn national_id_payload() {
        assert_ok_eq!(
            generate("1111111111119", None),
            "00020101021129370016A000000677010111011311111111111195204000053037645802TH6304B779"
        );
        assert_ok_eq!(
            generate("1111111111119", Some(42.42)),
            "00020101021129370016A00000067701011101131111111111119520400005303764540542.425802TH630459D1"
        );
    }

    #[test]
    fn non_positive_amounts_are_omitted() {
        let without_amount = generate("0812345678", None).unwrap();

        assert_ok_eq!(generate("0812345678", Some(0.0)), without_amount.as_str());
        assert_ok_eq!(generate("0812345678", Some(-5.0)), without_amount.as_str());
        assert_ok_eq!(generate("0812345678", Some(f64::NAN)), without_amount.as_str());
        assert!(!without_amount.contains("5406"));
    }

    #[test]
    fn oversized_amount_is_an_error() {
        assert_matches!(
            generate("0812345678", Some(1e12)),
            Err(GenerateError::Amount(_))
        );
    }

    #[test]
    fn invalid_identifier_is_an_error() {
        assert_matches!(generate("0712345678", None), Err(GenerateError::Proxy(_)));
        assert_matches!(generate("", None), Err(GenerateError::Proxy(_)));
    }

    #[test]
    fn builder_and_generate_agree() {
        let payload = QrPayload::new(Proxy::classify("081-234-5678").unwrap())
            .with_amount(Amount::new(100.5).unwrap());

        assert_ok_eq!(generate("0812345678", Some(100.5)), payload.encode());
        assert_eq!(payload.encode(), payload.to_string());
    }

    #[test]
    fn generated_payloads_verify() {
        for (identifier, amount) in [
            ("0812345678", None),
            ("0812345678", Some(100.5)),
            ("0699999999", None),
            ("1111111111119", Some(7.0)),
        ] {
            let payload = generate(identifier, amount).unwrap();
            assert_ok!(verify_checksum(&payload));
        }
    }

    #[test]
    fn corrupted_payloads_fail_verification() {
        let mut payload = generate("0812345678", None).unwrap();
        // flip one digit of the proxy
        payload.replace_range(44..45, "9");
        assert_matches!(verify_checksum(&payload), Err(VerifyChecksumError::BadCrc));

        assert_matches!(
            verify_checksum(""),
            Err(VerifyChecksumError::MissingChecksum)
        );
        assert_matches!(
            verify_checksum("000201"),
            Err(VerifyChecksumError::MissingChecksum)
        );
        assert_matches!(
            verify_checksum("00020163041234"),
            Err(VerifyChecksumError::BadCrc)
        );
        assert_matches!(
            verify_checksum("0002016304wxyz"),
            Err(VerifyChecksumError::InvalidTrailer(_))
        );
        assert_matches!(
            verify_checksum("สวัสดี"),
            Err(VerifyChecksumError::NotAscii)
        );
    }
}
