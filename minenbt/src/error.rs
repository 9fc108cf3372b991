//! Contains the Error and Result type used throughout the crate.
use crate::Kind;

/// An error from reading, writing or editing NBT.
///
/// Decoding and encoding errors abort the whole operation. A type mismatch from
/// editing a tree leaves the tree unchanged, so callers can branch on
/// [`Error::kind`] and carry on. Compound operations on a tag that is not a
/// compound are not errors at all; they return `None` or hand the child back.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    msg: String,
    kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The source or destination could not be opened, read or written. This
    /// includes a file that is not valid gzip.
    Io,

    /// Input ended before a required field was completely read.
    Truncated,

    /// A tag discriminant outside of the known kinds, or an End tag where a
    /// named tag was required.
    InvalidTag(u8),

    /// A length prefix that cannot be valid, eg negative.
    InvalidLength(i64),

    /// Expected unicode data but was not valid. Contained bytes are the
    /// invalid data.
    Nonunicode(Vec<u8>),

    /// Lists and compounds were nested deeper than the decoder allows.
    TooDeep,

    /// A name, string or array is too long to be represented in NBT.
    TooLong,

    /// A value of one kind was used where another was required.
    TypeMismatch { expected: Kind, found: Kind },

    /// The root of the data was not a compound.
    NoRootCompound(Kind),
}

/// Convenience type for Result.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get the kind of error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// True if the input ran out part way through the data.
    pub fn is_truncated(&self) -> bool {
        matches!(self.kind, ErrorKind::Truncated)
    }

    pub(crate) fn io(msg: String) -> Self {
        Self {
            msg: format!("io error: {}", msg),
            kind: ErrorKind::Io,
        }
    }

    pub(crate) fn truncated() -> Self {
        Self {
            msg: "eof: unexpectedly ran out of input".into(),
            kind: ErrorKind::Truncated,
        }
    }

    pub(crate) fn invalid_tag(t: u8) -> Self {
        Self {
            msg: format!("invalid nbt tag value: {}", t),
            kind: ErrorKind::InvalidTag(t),
        }
    }

    pub(crate) fn unexpected_end() -> Self {
        Self {
            msg: "invalid nbt: end tag outside of a compound".into(),
            kind: ErrorKind::InvalidTag(Kind::End as u8),
        }
    }

    pub(crate) fn invalid_length(len: i64) -> Self {
        Self {
            msg: format!("invalid nbt length: {}", len),
            kind: ErrorKind::InvalidLength(len),
        }
    }

    pub(crate) fn nonunicode(d: &[u8]) -> Self {
        Self {
            msg: format!(
                "invalid nbt string: nonunicode: {}",
                String::from_utf8_lossy(d)
            ),
            kind: ErrorKind::Nonunicode(d.to_vec()),
        }
    }

    pub(crate) fn too_deep(max: usize) -> Self {
        Self {
            msg: format!("invalid nbt: nested deeper than {} levels", max),
            kind: ErrorKind::TooDeep,
        }
    }

    pub(crate) fn too_long(what: &str, len: usize) -> Self {
        Self {
            msg: format!("{} too long for nbt: {}", what, len),
            kind: ErrorKind::TooLong,
        }
    }

    pub(crate) fn type_mismatch(expected: Kind, found: Kind) -> Self {
        Self {
            msg: format!("expected {}, found {}", expected, found),
            kind: ErrorKind::TypeMismatch { expected, found },
        }
    }

    pub(crate) fn no_root_compound(found: Kind) -> Self {
        Self {
            msg: format!("invalid nbt: root is {}, not a compound", found),
            kind: ErrorKind::NoRootCompound(found),
        }
    }
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.msg)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Self {
                msg: format!("eof: {}", e),
                kind: ErrorKind::Truncated,
            },
            _ => Self {
                msg: format!("io error: {}", e),
                kind: ErrorKind::Io,
            },
        }
    }
}
