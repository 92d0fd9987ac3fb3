mod caller;
mod io;
mod parser;

pub use caller::CallerError;
pub use io::IoError;
pub use parser::ParserError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Caller(#[from] CallerError),
}

pub type Result<T> = std::result::Result<T, Error>;
