//! Attack oracle: which squares a piece hits, and whether a square is attacked.
//!
//! Attack sets never include castling, so castling legality can be built on
//! top of this module without recursion.

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

/// Knight jump offsets as `(file, rank)` deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Orthogonal ray directions.
pub(crate) const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Diagonal ray directions.
pub(crate) const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// All eight directions, for queens and kings.
pub(crate) const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (0, -1),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// The two diagonal-forward squares of a `color` pawn on `sq`, regardless
/// of what stands there.
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    let dir = color.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(|file_delta| sq.offset(file_delta, dir))
        .collect()
}

/// Squares a knight on `sq` jumps to.
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_OFFSETS
        .into_iter()
        .filter_map(|(df, dr)| sq.offset(df, dr))
        .collect()
}

/// Squares adjacent to `sq`.
pub fn king_attacks(sq: Square) -> Bitboard {
    QUEEN_DIRECTIONS
        .into_iter()
        .filter_map(|(df, dr)| sq.offset(df, dr))
        .collect()
}

/// Walk each direction from `sq` until the edge or the first occupied
/// square, which is included whatever its color.
pub fn ray_attacks(pos: &Position, sq: Square, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(df, dr) in directions {
        let mut cursor = sq;
        while let Some(next) = cursor.offset(df, dr) {
            attacks |= next.bitboard();
            if pos.is_occupied(next) {
                break;
            }
            cursor = next;
        }
    }
    attacks
}

/// Squares attacked by `piece` standing on `sq`.
///
/// For pieces other than pawns this is the raw, non-castling move set plus
/// any friendly piece the move set stops at.
pub fn piece_attacks(pos: &Position, sq: Square, piece: Piece) -> Bitboard {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(piece.color, sq),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => ray_attacks(pos, sq, &BISHOP_DIRECTIONS),
        PieceKind::Rook => ray_attacks(pos, sq, &ROOK_DIRECTIONS),
        PieceKind::Queen => ray_attacks(pos, sq, &QUEEN_DIRECTIONS),
        PieceKind::King => king_attacks(sq),
    }
}

/// The pieces of `by_color` that attack `sq`.
pub fn attackers(pos: &Position, sq: Square, by_color: Color) -> Bitboard {
    pos.pieces_of(by_color)
        .filter(|&(from, piece)| piece_attacks(pos, from, piece).contains(sq))
        .map(|(from, _)| from)
        .collect()
}

/// Return `true` if any piece of `by_color` attacks `sq`.
pub fn is_attacked(pos: &Position, sq: Square, by_color: Color) -> bool {
    pos.pieces_of(by_color)
        .any(|(from, piece)| piece_attacks(pos, from, piece).contains(sq))
}
