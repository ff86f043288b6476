use std::{fmt, str::FromStr};

use thiserror::Error;

pub mod facelets;
pub mod notation;
pub mod turns;

pub use facelets::{Color, CubeState, Face, FaceGrid};
pub use notation::{Direction, Move, MoveBase, Token, UnknownMove, parse_algorithm};
pub use turns::{apply, apply_notation};

/// The number of layers along each edge of the cube
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CubeOrder(usize);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeOrderError {
    #[error("A cube needs at least {min} layers but {0} were requested", min = CubeOrder::MIN)]
    TooSmall(usize),
    #[error("Could not read a cube order from {0:?}, expected something like `3` or `3x3`")]
    Unparsable(String),
}

impl CubeOrder {
    pub const MIN: usize = 2;

    /// Create a cube order, rejecting anything that would not have two layers
    ///
    /// # Errors
    ///
    /// If `layers` is less than `CubeOrder::MIN`
    pub const fn new(layers: usize) -> Result<CubeOrder, CubeOrderError> {
        if layers < Self::MIN {
            Err(CubeOrderError::TooSmall(layers))
        } else {
            Ok(CubeOrder(layers))
        }
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Index of the last row or column of a face
    #[must_use]
    pub const fn last(self) -> usize {
        self.0 - 1
    }

    /// The layer that slice moves turn. Even cubes have two center layers and
    /// this picks the one with the larger index.
    #[must_use]
    pub const fn middle(self) -> usize {
        self.0 / 2
    }

    /// Whether M, E and S have a layer to act on
    #[must_use]
    pub const fn has_slices(self) -> bool {
        self.0 >= 3
    }

    /// Whether wide moves reach a second layer
    #[must_use]
    pub const fn has_inner_layer(self) -> bool {
        self.0 > 2
    }
}

impl TryFrom<usize> for CubeOrder {
    type Error = CubeOrderError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        CubeOrder::new(value)
    }
}

impl FromStr for CubeOrder {
    type Err = CubeOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || CubeOrderError::Unparsable(s.to_owned());
        let s = s.trim();

        let layers = match s.split_once(['x', 'X']) {
            Some((rows, cols)) => {
                let rows = rows.trim().parse::<usize>().map_err(|_| unparsable())?;
                let cols = cols.trim().parse::<usize>().map_err(|_| unparsable())?;
                if rows != cols {
                    return Err(unparsable());
                }
                rows
            }
            None => s.parse::<usize>().map_err(|_| unparsable())?,
        };

        CubeOrder::new(layers)
    }
}

impl fmt::Display for CubeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.0, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_orders() {
        assert_eq!("3".parse::<CubeOrder>().unwrap().get(), 3);
        assert_eq!("4x4".parse::<CubeOrder>().unwrap().get(), 4);
        assert_eq!(" 5X5 ".parse::<CubeOrder>().unwrap().get(), 5);
        assert_eq!("12".parse::<CubeOrder>().unwrap().to_string(), "12x12");

        assert_eq!(
            "3x4".parse::<CubeOrder>(),
            Err(CubeOrderError::Unparsable("3x4".to_owned()))
        );
        assert!(matches!(
            "cube".parse::<CubeOrder>(),
            Err(CubeOrderError::Unparsable(_))
        ));
        assert_eq!("1x1".parse::<CubeOrder>(), Err(CubeOrderError::TooSmall(1)));
        assert_eq!(CubeOrder::try_from(0), Err(CubeOrderError::TooSmall(0)));
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            CubeOrderError::TooSmall(1).to_string(),
            "A cube needs at least 2 layers but 1 were requested"
        );
        assert_eq!(
            CubeOrderError::Unparsable("3x4".to_owned()).to_string(),
            "Could not read a cube order from \"3x4\", expected something like `3` or `3x3`"
        );
    }

    #[test]
    fn middle_layers() {
        let pocket = CubeOrder::new(2).unwrap();
        assert!(!pocket.has_slices());
        assert!(!pocket.has_inner_layer());

        let cube3 = CubeOrder::new(3).unwrap();
        assert_eq!(cube3.middle(), 1);
        assert_eq!(cube3.last(), 2);
        assert!(cube3.has_slices());

        // Even cubes settle on the lower of their two center layers
        assert_eq!(CubeOrder::new(4).unwrap().middle(), 2);
        assert_eq!(CubeOrder::new(5).unwrap().middle(), 2);
    }
}
