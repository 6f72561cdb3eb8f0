/// Broad failure category, used by callers (and tests) that need to branch on
/// the cause rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing/unreadable file or malformed matrix JSON.
    Load,
    /// Invalid settings (epsilon, thread count, ...).
    Config,
    /// Zero-length model or space set.
    EmptyInput,
    /// The anchor model transform has no inverse.
    SingularAnchor,
    /// The flattened index space overflows or exceeds the configured cap.
    WorkSpaceTooLarge,
    /// The search was aborted before the join point.
    Cancelled,
    /// Writing results or datasets failed.
    Io,
}

impl ErrorKind {
    fn default_exit_code(self) -> u8 {
        match self {
            ErrorKind::Load | ErrorKind::Config | ErrorKind::Io => 2,
            ErrorKind::EmptyInput => 3,
            ErrorKind::SingularAnchor | ErrorKind::WorkSpaceTooLarge => 4,
            ErrorKind::Cancelled => 130,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            exit_code: kind.default_exit_code(),
            kind,
            message: message.into(),
        }
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Load, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
