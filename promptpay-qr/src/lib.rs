//! Sans-IO generator for PromptPay EMV QR payloads.
//!
//! PromptPay is Thailand's interbank proxy-based payment scheme: a payee is
//! addressed by a proxy (mobile number or national ID) rather than an account
//! number. A PromptPay QR code is an EMV QR payload, a flat string of
//! Tag-Length-Value fields terminated by a CRC-16/CCITT-FALSE trailer.
//!
//! This crate only produces and verifies the payload *string*. Rendering it
//! into a scannable image is left to any QR matrix encoder.
//!
//! ```
//! use promptpay_qr::{Amount, Proxy, QrPayload};
//!
//! let proxy = Proxy::classify("081-234-5678").unwrap();
//! let payload = QrPayload::new(proxy)
//!     .with_amount(Amount::new(100.5).unwrap())
//!     .encode();
//! assert!(payload.starts_with("000201"));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use self::amount::Amount;
pub use self::crc::Crc16;
pub use self::payload::{generate, verify_checksum, QrPayload};
pub use self::proxy::{is_valid_national_id, is_valid_phone_number, NationalId, PhoneNumber, Proxy};

mod amount;
mod crc;
mod payload;
mod proxy;
mod tlv;

pub mod error {
    pub use super::amount::AmountError;
    pub use super::crc::Crc16FromHexError;
    pub use super::payload::{GenerateError, VerifyChecksumError};
    pub use super::proxy::{
        NationalIdValidateError, PhoneNumberValidateError, ProxyClassifyError,
    };
}
