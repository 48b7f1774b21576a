use alloc::string::String;

/// The length field is two decimal digits, so a value may carry at
/// most 99 characters.
pub(crate) const MAX_VALUE_LEN: usize = 99;

/// Accumulates `tag ++ length ++ value` fields into a flat string.
///
/// Tags are two-digit numeric literals from the EMV field catalog and
/// are not validated here. Values longer than [`MAX_VALUE_LEN`] are a
/// caller bug; the bound is checked in debug builds only.
#[derive(Debug, Default)]
pub(crate) struct TlvWriter {
    buf: String,
}

impl TlvWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn field(&mut self, tag: &str, value: &str) {
        debug_assert_eq!(2, tag.len(), "tag {tag:?} must be two digits");
        debug_assert!(
            value.len() <= MAX_VALUE_LEN,
            "value of tag {tag:?} exceeds the two-digit length field"
        );

        self.buf.push_str(tag);
        self.push_len(value.len());
        self.buf.push_str(value);
    }

    fn push_len(&mut self, len: usize) {
        // the modulo keeps the conversion infallible even if the
        // debug precondition was violated
        let len = u8::try_from(len % 100).unwrap();
        self.buf.push(char::from(b'0' + len / 10));
        self.buf.push(char::from(b'0' + len % 10));
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.buf
    }

    pub(crate) fn into_string(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::TlvWriter;

    #[test]
    fn fields_accumulate_in_call_order() {
        let mut writer = TlvWriter::new();
        writer.field("00", "01");
        writer.field("58", "TH");
        assert_eq!("0002015802TH", writer.as_str());
    }

    #[test]
    fn length_is_zero_padded() {
        let mut writer = TlvWriter::new();
        writer.field("00", "");
        writer.field("29", "A000000677010111");
        assert_eq!("00002916A000000677010111", writer.into_string());
    }
}
