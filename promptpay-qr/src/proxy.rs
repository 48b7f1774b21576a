use alloc::string::String;
use core::{
    fmt::{self, Display},
    ops::Deref,
    str::FromStr,
};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A Thai mobile number usable as a PromptPay proxy
///
/// `PhoneNumber` contains a string that is guaranteed to
/// meet the following requirements:
///
/// * The value is exactly 10 ASCII decimal digits
/// * The value starts with `06`, `08` or `09`
///
/// Whitespace and hyphen separators are stripped during
/// construction, so `"081-234-5678"` and `"0812345678"`
/// produce the same `PhoneNumber`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The proxy value carried inside the merchant account field.
    ///
    /// The leading `0` is replaced by the `0066` country-code prefix,
    /// yielding 13 characters.
    pub(crate) fn merchant_account_value(&self) -> String {
        let mut value = String::with_capacity(13);
        value.push_str("0066");
        value.push_str(&self.0[1..]);
        value
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = PhoneNumberValidateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let digits = strip_separators(value);
        validate_phone_number(&digits)?;
        Ok(Self(digits))
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberValidateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneNumberValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for PhoneNumber {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.try_into().map_err(de::Error::custom)
    }
}

/// A Thai national identification number usable as a PromptPay proxy
///
/// `NationalId` contains a string that is guaranteed to
/// meet the following requirements:
///
/// * The value is exactly 13 ASCII decimal digits
/// * The 13th digit is the mod-11 weighted check digit
///   of the first 12
///
/// Unlike [`PhoneNumber`], no separator stripping is performed:
/// the value must already be the bare 13 digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NationalId(String);

impl NationalId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl TryFrom<&str> for NationalId {
    type Error = NationalIdValidateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        validate_national_id(value)?;
        Ok(Self(String::from(value)))
    }
}

impl TryFrom<String> for NationalId {
    type Error = NationalIdValidateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_national_id(&value)?;
        Ok(Self(value))
    }
}

impl FromStr for NationalId {
    type Err = NationalIdValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl AsRef<str> for NationalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Deref for NationalId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl Serialize for NationalId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NationalId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.try_into().map_err(de::Error::custom)
    }
}

/// A classified PromptPay proxy
///
/// PromptPay addresses the payee by a proxy rather than an account
/// number. [`Proxy::classify`] tries [`PhoneNumber`] first and falls
/// back to [`NationalId`]; the two never overlap since a phone number
/// normalizes to 10 digits and a national ID is always 13.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proxy {
    Phone(PhoneNumber),
    NationalId(NationalId),
}

impl Proxy {
    /// Classify a raw identifier as a phone number or a national ID.
    ///
    /// # Errors
    ///
    /// It returns an error if `raw` is neither a valid Thai mobile
    /// number nor a valid Thai national ID.
    pub fn classify(raw: &str) -> Result<Self, ProxyClassifyError> {
        if let Ok(phone) = PhoneNumber::try_from(raw) {
            return Ok(Self::Phone(phone));
        }

        match NationalId::try_from(raw) {
            Ok(id) => Ok(Self::NationalId(id)),
            Err(_) => Err(ProxyClassifyError),
        }
    }

    /// The normalized digits, without the country-code transform.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Phone(phone) => phone.as_str(),
            Self::NationalId(id) => id.as_str(),
        }
    }

    pub(crate) fn merchant_account_value(&self) -> String {
        match self {
            Self::Phone(phone) => phone.merchant_account_value(),
            Self::NationalId(id) => String::from(id.as_str()),
        }
    }
}

impl Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Proxy {
    type Err = ProxyClassifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::classify(s)
    }
}

impl From<PhoneNumber> for Proxy {
    fn from(value: PhoneNumber) -> Self {
        Self::Phone(value)
    }
}

impl From<NationalId> for Proxy {
    fn from(value: NationalId) -> Self {
        Self::NationalId(value)
    }
}

impl Serialize for Proxy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Proxy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::classify(&s).map_err(de::Error::custom)
    }
}

/// Whether `raw` is a valid Thai mobile number.
///
/// Thin wrapper over [`PhoneNumber::try_from`] for callers that
/// only need the yes/no answer.
#[must_use]
pub fn is_valid_phone_number(raw: &str) -> bool {
    PhoneNumber::try_from(raw).is_ok()
}

/// Whether `raw` is a valid Thai national ID.
///
/// Thin wrapper over [`NationalId::try_from`] for callers that
/// only need the yes/no answer.
#[must_use]
pub fn is_valid_national_id(raw: &str) -> bool {
    NationalId::try_from(raw).is_ok()
}

/// An error encountered while validating [`PhoneNumber`]
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum PhoneNumberValidateError {
    /// The value contains a character that is not a decimal digit
    #[error("phone number contains a non-digit character")]
    IllegalCharacter,
    /// The value does not have exactly 10 digits
    #[error("phone number must be exactly 10 digits")]
    Length,
    /// The value does not start with a Thai mobile prefix
    #[error("phone number must start with 06, 08 or 09")]
    Prefix,
}

/// An error encountered while validating [`NationalId`]
#[derive(Debug, thiserror::Error)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub enum NationalIdValidateError {
    /// The value does not have exactly 13 characters
    #[error("national ID must be exactly 13 digits")]
    Length,
    /// The value contains a character that is not a decimal digit
    #[error("national ID contains a non-digit character")]
    IllegalCharacter,
    /// The 13th digit does not match the weighted checksum
    #[error("national ID check digit mismatch")]
    BadCheckDigit,
}

/// An error encountered while classifying [`Proxy`]
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[cfg_attr(test, derive(PartialEq, Eq))]
#[error("identifier is neither a valid Thai mobile number nor a valid national ID")]
pub struct ProxyClassifyError;

fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !c.is_whitespace() && c != '-')
        .collect()
}

fn validate_phone_number(digits: &str) -> Result<(), PhoneNumberValidateError> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PhoneNumberValidateError::IllegalCharacter);
    }

    if digits.len() != 10 {
        return Err(PhoneNumberValidateError::Length);
    }

    if !matches!(&digits[..2], "06" | "08" | "09") {
        return Err(PhoneNumberValidateError::Prefix);
    }

    Ok(())
}

fn validate_national_id(id: &str) -> Result<(), NationalIdValidateError> {
    if id.len() != 13 {
        return Err(NationalIdValidateError::Length);
    }

    if !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NationalIdValidateError::IllegalCharacter);
    }

    let digits = id.as_bytes();

    // The first 12 digits are weighted 13 down to 2.
    let sum = digits[..12]
        .iter()
        .zip((2..=13u32).rev())
        .map(|(&b, weight)| u32::from(b - b'0') * weight)
        .sum::<u32>();
    let check_digit = (11 - sum % 11) % 10;

    if u32::from(digits[12] - b'0') != check_digit {
        return Err(NationalIdValidateError::BadCheckDigit);
    }

    Ok(())
}
