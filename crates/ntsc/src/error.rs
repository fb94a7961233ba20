#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A table or buffer of `bytes` could not be allocated.
    OutOfMemory { bytes: usize },
    UnknownPreset(String),
}

impl std::error::Error for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::OutOfMemory { bytes } => write!(f, "unable to allocate {bytes} bytes"),
            Error::UnknownPreset(name) => write!(
                f,
                "unknown preset '{name}', expected one of composite, svideo, rgb, monochrome"
            ),
        }
    }
}

/// Allocates `len` copies of `value`, reporting allocation failure as
/// [`Error::OutOfMemory`] instead of aborting.
pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, Error> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
        bytes: len.saturating_mul(std::mem::size_of::<T>()),
    })?;
    buf.resize(len, value);

    Ok(buf)
}
