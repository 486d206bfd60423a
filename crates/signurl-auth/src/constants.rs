//! Protocol constants shared by signing and verification.
//!
//! Signing and verification both read their separators from here.

/// Name of the query parameter carrying the metadata and signature.
pub const SIGNED_PARAM: &str = "signed";

/// Connector used when the URL has no query component yet.
pub const QUERY_BEGIN: char = '?';

/// Connector used when the URL already carries query parameters.
pub const QUERY_APPEND: char = '&';

/// Marks the end of the encoded metadata; the signature token follows it.
pub const TERMINATOR: char = ';';

/// Separates `key` from `value` inside the decoded metadata blob.
pub const METADATA_PAIR_SEPARATOR: char = ':';

/// Separates `key:value` pairs inside the decoded metadata blob.
pub const METADATA_FIELD_DELIMITER: char = ';';

/// Metadata key for the expiry timestamp (epoch seconds).
pub const KEY_EXPIRES: &str = "e";

/// Metadata key for the allowed HTTP method.
pub const KEY_METHOD: &str = "m";

/// Metadata key for the random nonce.
pub const KEY_NONCE: &str = "r";

/// Trailing path separator rejected on input URLs.
pub const URL_SEPARATOR: char = '/';

/// Default time-to-live in seconds.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// PBKDF2 iteration count.
pub const ITERATION_COUNT: u32 = 10_000;

/// Length of the derived key in bytes (the hex token is twice as long).
pub const DERIVED_KEY_LENGTH: usize = 32;

/// Exclusive upper bound for generated nonces.
pub const MAX_NONCE_VALUE: u64 = 10_000_000_000;
