//! Top-level error type for the filter probe.

/// How the probe process ends. The discriminants are the process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    /// Every case was probed. Mismatches do not change the status.
    Success = 0,
    /// Configuration or output failures.
    Failure = 1,
    /// The library could not allocate a write structure.
    CreateWriteStruct = 2,
    /// The library could not allocate an info structure.
    CreateInfoStruct = 3,
    /// The library reported an error it cannot continue from.
    LibraryError = 4,
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status as u8)
    }
}

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `png_create_write_struct` returned null.
    #[error("could not create the png write structure")]
    CreateWriteStruct,
    /// `png_create_info_struct` returned null.
    #[error("could not create the png info structure")]
    CreateInfoStruct,
    /// The settings could not be loaded.
    #[error("could not load the probe settings: {0}")]
    Config(#[from] config::ConfigError),
    /// The binary was built without a library to probe.
    #[error("no library was linked; rebuild with `--features libpng`")]
    NoLibraryLinked,
    /// Writing the report failed.
    #[error("could not write the report: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The exit status the process ends with when this error stops a run.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Error::CreateWriteStruct => ExitStatus::CreateWriteStruct,
            Error::CreateInfoStruct => ExitStatus::CreateInfoStruct,
            Error::Config(_) | Error::NoLibraryLinked | Error::Io(_) => ExitStatus::Failure,
        }
    }
}
