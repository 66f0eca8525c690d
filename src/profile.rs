use std::fmt;
use std::str::FromStr;

/// Decides whether a column value is written at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Present unless NULL.
    NotNull,
    /// Present unless NULL, zero, or empty.
    Truthy,
}

/// How a present value becomes element text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextConversion {
    /// Natural decimal form for numbers, text unchanged. Text and blobs
    /// must be valid UTF-8.
    Minimal,
    /// One formatter for everything; text and blobs are decoded lossily.
    Generic,
}

/// What the serializer does with a character the output cannot carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingPolicy {
    /// Fail the run.
    Strict,
    /// Emit a numeric character reference (`&#NNNN;`).
    CharRef,
}

/// Target encoding of the rendered document.
///
/// The declaration carries no `encoding` attribute, so only encodings a
/// parser reads correctly as UTF-8 are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Ascii,
}

impl Encoding {
    pub fn can_represent(self, c: char) -> bool {
        match self {
            Encoding::Utf8 => true,
            Encoding::Ascii => c.is_ascii(),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Ascii => "ascii",
        })
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "ascii" | "us-ascii" => Ok(Encoding::Ascii),
            other => Err(format!("unsupported encoding '{other}'")),
        }
    }
}

/// Everything that differs between the contacts and messages exports.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Source table, matched case-sensitively against the catalog
    pub table: String,
    pub root_tag: String,
    pub record_tag: String,
    pub presence: Presence,
    pub conversion: TextConversion,
    pub on_unencodable: EncodingPolicy,
    pub encoding: Encoding,
    /// Strip leading and trailing whitespace from the rendered document
    pub trim_output: bool,
}

impl Profile {
    /// `Contact` table: NULLs dropped, failures on unencodable text.
    pub fn contacts() -> Self {
        Self {
            table: "Contact".to_string(),
            root_tag: "contacts".to_string(),
            record_tag: "contact".to_string(),
            presence: Presence::NotNull,
            conversion: TextConversion::Minimal,
            on_unencodable: EncodingPolicy::Strict,
            encoding: Encoding::Utf8,
            trim_output: false,
        }
    }

    /// `messages` table: zero and empty values dropped along with NULLs,
    /// unencodable characters written as character references.
    pub fn messages() -> Self {
        Self {
            table: "messages".to_string(),
            root_tag: "messages".to_string(),
            record_tag: "message".to_string(),
            presence: Presence::Truthy,
            conversion: TextConversion::Generic,
            on_unencodable: EncodingPolicy::CharRef,
            encoding: Encoding::Utf8,
            trim_output: true,
        }
    }

    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoding_names() {
        assert_eq!("UTF-8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("utf_8".parse::<Encoding>(), Ok(Encoding::Utf8));
        assert_eq!("ascii".parse::<Encoding>(), Ok(Encoding::Ascii));
        assert!("ebcdic".parse::<Encoding>().is_err());
        // single-byte output would not match the UTF-8 default of the declaration
        assert!("latin-1".parse::<Encoding>().is_err());
    }

    #[test]
    fn representable_sets() {
        assert!(Encoding::Utf8.can_represent('€'));
        assert!(!Encoding::Ascii.can_represent('é'));
    }

    #[test]
    fn profiles_diverge() {
        let contacts = Profile::contacts();
        let messages = Profile::messages();
        assert_eq!(contacts.presence, Presence::NotNull);
        assert_eq!(messages.presence, Presence::Truthy);
        assert_eq!(contacts.on_unencodable, EncodingPolicy::Strict);
        assert_eq!(messages.on_unencodable, EncodingPolicy::CharRef);
        assert!(!contacts.trim_output && messages.trim_output);
    }
}
