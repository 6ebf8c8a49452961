use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocError>;

#[derive(Error, Debug)]
pub enum LocError {
    #[error("{} is not a valid Git repository", .0.display())]
    InvalidRepository(PathBuf),
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("{tool} exited with {status}: {stderr}")]
    ExternalToolFailure {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("Failed to run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to move output into place: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for LocError {
    fn from(err: gix::open::Error) -> Self {
        LocError::Git(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for LocError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        LocError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for LocError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        LocError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for LocError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        LocError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for LocError {
    fn from(err: gix::objs::decode::Error) -> Self {
        LocError::ObjectDecode(Box::new(err))
    }
}
