use std::io;

use thiserror::Error;

/// A directive value that could not be converted to its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Not a valid IP address or network literal.
    #[error("invalid IP address `{0}`")]
    Ip(String),
    /// Not a valid integer, or an out-of-range prefix length.
    #[error("invalid number `{0}`")]
    Number(String),
    /// An `iface` line named an address family other than `inet`/`inet6`.
    #[error("unknown address family `{0}`")]
    Family(String),
    /// An `iface` line named an address source other than
    /// `dhcp`/`static`/`loopback`/`manual`.
    #[error("unknown address source `{0}`")]
    Source(String),
    /// A directive was truncated before its required argument.
    #[error("missing argument for `{0}`")]
    Missing(String),
}

/// Errors raised while reading, parsing, or writing an interfaces file.
///
/// Parse errors are fatal to the whole parse call: the first error wins and
/// no partial model is returned. I/O errors are propagated unchanged and
/// never retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A malformed directive value at the given 1-based source line.
    #[error("line {line}: {source}")]
    Syntax { line: usize, source: ValueError },
    /// A detail directive encountered outside an active interface block.
    #[error("line {line}: directive outside an interface block: `{text}`")]
    Context { line: usize, text: String },
}
