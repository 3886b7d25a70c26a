use shellrig_backup::BackupError;
use shellrig_platform::PathsError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
    Backup(BackupError),
    Paths(PathsError),
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Io { kind, message } => write!(f, "{kind}: {message}"),
            Self::Backup(error) => write!(f, "{error}"),
            Self::Paths(error) => write!(f, "{error}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<std::io::Error> for AppErrorDetail {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

impl From<BackupError> for AppErrorDetail {
    fn from(value: BackupError) -> Self {
        Self::Backup(value)
    }
}

impl From<PathsError> for AppErrorDetail {
    fn from(value: PathsError) -> Self {
        Self::Paths(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    UnknownShell {
        name: String,
    },
    NoShellSelected,
    ArchiveNotFound {
        name: String,
    },
    NoBackups {
        category: Option<String>,
    },
    EnvironmentUnavailable {
        reason: AppErrorDetail,
    },
    OperationFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn unknown_shell(name: impl Into<String>) -> Self {
        Self::UnknownShell { name: name.into() }
    }

    pub fn archive_not_found(name: impl Into<String>) -> Self {
        Self::ArchiveNotFound { name: name.into() }
    }

    pub fn no_backups(category: Option<&str>) -> Self {
        Self::NoBackups {
            category: category.map(str::to_string),
        }
    }

    pub fn environment_unavailable(reason: impl Into<AppErrorDetail>) -> Self {
        Self::EnvironmentUnavailable {
            reason: reason.into(),
        }
    }

    pub fn operation_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OperationFailed {
            operation,
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::operation_failed("Writing output", error)
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownShell { name } => write!(f, "Unknown shell: {name}"),
            Self::NoShellSelected => write!(
                f,
                "No shell selected; pass --shell or set default_shell in the settings file"
            ),
            Self::ArchiveNotFound { name } => write!(f, "No backup named {name}"),
            Self::NoBackups { category: None } => write!(f, "No backups found"),
            Self::NoBackups {
                category: Some(category),
            } => write!(f, "No {category} backups found"),
            Self::EnvironmentUnavailable { reason } => write!(f, "{reason}"),
            Self::OperationFailed { operation, details } => {
                write!(f, "{operation} failed: {details}")
            }
        }
    }
}

impl std::error::Error for AppError {}
