#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Ntsc(ntsc::Error),
    /// A loaded frame didn't hold exactly `expected` pixels.
    FrameSize { expected: usize, actual: usize },
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Ntsc(err) => Some(err),
            Error::FrameSize { .. } => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Ntsc(err) => write!(f, "ntsc: {err}"),
            Error::FrameSize { expected, actual } => {
                write!(f, "expected frame of {expected} pixels, got {actual}")
            }
        }
    }
}

impl From<ntsc::Error> for Error {
    fn from(value: ntsc::Error) -> Self {
        Error::Ntsc(value)
    }
}
