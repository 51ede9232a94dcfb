use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid grid size '{0}'. Expected an integer such as '4096' or a power such as '2^12'.")]
    InvalidGridSize(String),

    #[error("Grid size '{0}' is too large.")]
    GridSizeOverflow(String),
}

/// Parses a grid size written either as a plain integer or as `base^exponent`.
pub fn parse_ng(input: &str) -> Result<usize, ParseError> {
    let text = input.trim();
    let invalid = || ParseError::InvalidGridSize(input.to_string());

    match text.split_once('^') {
        Some((base, exponent)) => {
            let base: usize = base.trim().parse().map_err(|_| invalid())?;
            let exponent: u32 = exponent.trim().parse().map_err(|_| invalid())?;
            base.checked_pow(exponent)
                .ok_or_else(|| ParseError::GridSizeOverflow(input.to_string()))
        }
        None => text.parse().map_err(|_| invalid()),
    }
}
