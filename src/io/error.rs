use std::io;
use thiserror::Error;

/// IO-level errors for CSV report output
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed");
        let wrapped = IoError::from(io_err);

        match wrapped {
            IoError::Io(_) => {}
            _ => panic!("Expected Io error variant"),
        }
        assert!(
            IoError::from(io::Error::new(io::ErrorKind::Other, "x"))
                .to_string()
                .starts_with("IO error")
        );
    }
}
