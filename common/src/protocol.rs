use serde::{Deserialize, Serialize};

use crate::models::{BoardSize, Density, Dots, StatusValue, SweptValue};

/// Board dimensions, either explicit or one of the menu presets.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum BoardSpec {
    Explicit { width: usize, height: usize },
    Preset { size: BoardSize },
}

impl BoardSpec {
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Self::Explicit { width, height } => (width, height),
            Self::Preset { size } => size.dimensions(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ConfigureRequest {
    #[serde(flatten)]
    pub board: BoardSpec,
    pub density: Density,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateResponse {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct BoardResponse {
    pub status: StatusValue,
    /// Mines minus flags, zero before a board is configured.
    pub mines_left: isize,
    pub dots: Dots,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SweptResponse {
    pub swept: SweptValue,
    pub status: StatusValue,
    pub mines_left: isize,
    pub dots: Dots,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AckResponse {
    pub ok: bool,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidDimension,
    OutOfBounds,
    GameOver,
    InvalidState,
    UnknownSession,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}
