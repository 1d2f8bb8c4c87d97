//! Sliding piece (bishop, rook, queen) move generation.

use crate::attacks::{BISHOP_DIRECTIONS, QUEEN_DIRECTIONS, ROOK_DIRECTIONS, ray_attacks};
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal moves for a `color` slider of `kind` on `src`.
///
/// Each ray ends at the first occupied square, which is kept only when it
/// holds an enemy piece.
pub(super) fn gen_slider(pos: &Position, src: Square, kind: PieceKind, color: Color, list: &mut MoveList) {
    let directions: &[(i8, i8)] = match kind {
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Rook => &ROOK_DIRECTIONS,
        _ => &QUEEN_DIRECTIONS,
    };
    super::push_targets(pos, src, color, ray_attacks(pos, src, directions), list);
}
