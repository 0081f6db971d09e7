//! Cutting-marker layout math.
//!
//! Lays pattern pieces onto a marker sheet of fixed width by simple
//! row-wrapping: pieces are placed left to right in submission order, and a
//! new row starts when the next piece does not fit the remaining width. This
//! mirrors how a cutter chalks a quick marker by hand; it is a visual aid,
//! not a nesting optimizer, so pieces are never rotated or reordered.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One pattern piece to place, `count` times.
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct PieceSpec {
    pub label: String,
    pub width: f64,
    pub length: f64,
    pub count: u32,
}

/// Marker planning request.
#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct MarkerRequest {
    pub sheet_width: f64,
    /// Available sheet length; layouts that run past it are rejected.
    /// Omit for an open-ended roll.
    pub sheet_length: Option<f64>,
    pub pieces: Vec<PieceSpec>,
}

/// A placed piece: `x` across the sheet width, `y` along its length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Placement {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub length: f64,
}

/// Computed marker layout.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarkerLayout {
    pub sheet_width: f64,
    pub placements: Vec<Placement>,
    pub row_count: usize,
    /// Sheet length consumed by all rows.
    pub used_length: f64,
    /// Sum of the areas of the placed pieces.
    pub piece_area: f64,
    /// `sheet_width * used_length`.
    pub marker_area: f64,
    /// `piece_area / marker_area`, in 0..=1.
    pub efficiency: f64,
}

#[derive(Debug, PartialEq)]
pub enum MarkerError {
    NonPositiveSheetWidth,
    NonPositiveSheetLength,
    NoPieces,
    /// Piece has a zero or negative dimension or a zero count.
    BadPiece(String),
    /// Piece is wider than the sheet and can never be placed.
    PieceTooWide(String),
    /// The layout runs past the available sheet length.
    SheetLengthExceeded { used_length: f64, sheet_length: f64 },
}

impl std::fmt::Display for MarkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkerError::NonPositiveSheetWidth => write!(f, "sheet width must be positive"),
            MarkerError::NonPositiveSheetLength => write!(f, "sheet length must be positive"),
            MarkerError::NoPieces => write!(f, "at least one piece is required"),
            MarkerError::BadPiece(label) => {
                write!(f, "piece '{}' has a non-positive dimension or zero count", label)
            }
            MarkerError::PieceTooWide(label) => {
                write!(f, "piece '{}' is wider than the sheet", label)
            }
            MarkerError::SheetLengthExceeded { used_length, sheet_length } => write!(
                f,
                "layout needs {} of sheet length but only {} is available",
                used_length, sheet_length
            ),
        }
    }
}

impl std::error::Error for MarkerError {}

/// Plan a marker layout for the given sheet and pieces.
pub fn plan_marker(
    sheet_width: f64,
    sheet_length: Option<f64>,
    pieces: &[PieceSpec],
) -> Result<MarkerLayout, MarkerError> {
    if sheet_width <= 0.0 {
        return Err(MarkerError::NonPositiveSheetWidth);
    }
    if let Some(length) = sheet_length {
        if length <= 0.0 {
            return Err(MarkerError::NonPositiveSheetLength);
        }
    }
    if pieces.is_empty() {
        return Err(MarkerError::NoPieces);
    }
    for piece in pieces {
        if piece.width <= 0.0 || piece.length <= 0.0 || piece.count == 0 {
            return Err(MarkerError::BadPiece(piece.label.clone()));
        }
        if piece.width > sheet_width {
            return Err(MarkerError::PieceTooWide(piece.label.clone()));
        }
    }

    let mut placements = Vec::new();
    let mut cursor_x = 0.0_f64;
    let mut cursor_y = 0.0_f64;
    let mut row_height = 0.0_f64;
    let mut row_count = 1_usize;
    let mut piece_area = 0.0_f64;

    for piece in pieces {
        for _ in 0..piece.count {
            if cursor_x + piece.width > sheet_width {
                // Wrap to the next row.
                cursor_y += row_height;
                cursor_x = 0.0;
                row_height = 0.0;
                row_count += 1;
            }
            placements.push(Placement {
                label: piece.label.clone(),
                x: cursor_x,
                y: cursor_y,
                width: piece.width,
                length: piece.length,
            });
            cursor_x += piece.width;
            row_height = row_height.max(piece.length);
            piece_area += piece.width * piece.length;
        }
    }

    let used_length = cursor_y + row_height;
    if let Some(length) = sheet_length {
        if used_length > length {
            return Err(MarkerError::SheetLengthExceeded { used_length, sheet_length: length });
        }
    }
    let marker_area = sheet_width * used_length;
    let efficiency = if marker_area > 0.0 { piece_area / marker_area } else { 0.0 };

    Ok(MarkerLayout {
        sheet_width,
        placements,
        row_count,
        used_length,
        piece_area,
        marker_area,
        efficiency,
    })
}
