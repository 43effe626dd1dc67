use std::{error::Error, fmt, num::ParseIntError, str::FromStr};

use screamporium_core::GridPos;

/// Delimiter between the palette hotkey and the target cell.
const HOTKEY_DELIMITER: char = '@';
/// Delimiter between the column and row of the target cell.
const COORD_DELIMITER: char = ',';

/// Scripted placement passed on the command line as `KEY@X,Y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PlaceRequest {
    /// Palette hotkey selecting the block.
    pub(crate) hotkey: char,
    /// Anchor cell of the placement.
    pub(crate) cell: GridPos,
}

impl FromStr for PlaceRequest {
    type Err = PlaceRequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PlaceRequestError::Empty);
        }

        let (hotkey, cell) = trimmed
            .split_once(HOTKEY_DELIMITER)
            .ok_or(PlaceRequestError::MissingCell)?;
        let mut symbols = hotkey.chars();
        let hotkey = match (symbols.next(), symbols.next()) {
            (Some(symbol), None) => symbol,
            _ => return Err(PlaceRequestError::InvalidHotkey(hotkey.to_owned())),
        };

        let (x, y) = cell
            .split_once(COORD_DELIMITER)
            .ok_or_else(|| PlaceRequestError::InvalidCell(cell.to_owned()))?;
        let x = x.trim().parse::<i32>().map_err(PlaceRequestError::InvalidCoordinate)?;
        let y = y.trim().parse::<i32>().map_err(PlaceRequestError::InvalidCoordinate)?;

        Ok(Self {
            hotkey,
            cell: GridPos::new(x, y),
        })
    }
}

/// Errors that can occur while parsing placement requests.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PlaceRequestError {
    /// The argument was empty.
    Empty,
    /// No `@` separated the hotkey from the cell.
    MissingCell,
    /// The hotkey was not exactly one character.
    InvalidHotkey(String),
    /// The cell was not written as `X,Y`.
    InvalidCell(String),
    /// A coordinate was not an integer.
    InvalidCoordinate(ParseIntError),
}

impl fmt::Display for PlaceRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "placement request was empty"),
            Self::MissingCell => write!(f, "placement request must look like KEY@X,Y"),
            Self::InvalidHotkey(hotkey) => {
                write!(f, "hotkey '{hotkey}' must be a single character")
            }
            Self::InvalidCell(cell) => write!(f, "cell '{cell}' must look like X,Y"),
            Self::InvalidCoordinate(error) => write!(f, "could not parse coordinate: {error}"),
        }
    }
}

impl Error for PlaceRequestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidCoordinate(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hotkey_and_cell() {
        let request: PlaceRequest = " 2@12,-3 ".parse().expect("request parses");
        assert_eq!(
            request,
            PlaceRequest {
                hotkey: '2',
                cell: GridPos::new(12, -3),
            }
        );
    }

    #[test]
    fn rejects_malformed_requests() {
        assert_eq!("".parse::<PlaceRequest>(), Err(PlaceRequestError::Empty));
        assert_eq!(
            "1-3,4".parse::<PlaceRequest>(),
            Err(PlaceRequestError::MissingCell)
        );
        assert_eq!(
            "12@3,4".parse::<PlaceRequest>(),
            Err(PlaceRequestError::InvalidHotkey("12".to_owned()))
        );
        assert_eq!(
            "1@34".parse::<PlaceRequest>(),
            Err(PlaceRequestError::InvalidCell("34".to_owned()))
        );
        assert!(matches!(
            "1@a,4".parse::<PlaceRequest>(),
            Err(PlaceRequestError::InvalidCoordinate(_))
        ));
    }
}
