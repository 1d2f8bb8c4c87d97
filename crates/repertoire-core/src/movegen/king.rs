//! King move and castling generation.

use crate::attacks::{is_attacked, king_attacks};
use crate::castle_rights::CastleSide;
use crate::chess_move::Move;
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal king moves, plus castling when `allow_castling`.
///
/// Castling is fully checked here: the right must be held, king and rook
/// must be on their home squares, the squares between them empty, and no
/// square on the king's path (start, crossed, destination) attacked.
pub(super) fn gen_king(pos: &Position, src: Square, color: Color, allow_castling: bool, list: &mut MoveList) {
    super::push_targets(pos, src, color, king_attacks(src), list);

    if !allow_castling || src != CastleSide::king_home(color) {
        return;
    }

    let them = color.flip();
    let rank = color.back_rank();
    for side in CastleSide::ALL {
        if !pos.castling().has(color, side) {
            continue;
        }
        if pos.piece_on(side.rook_home(color)) != Some(Piece::new(PieceKind::Rook, color)) {
            continue;
        }
        let path_clear = side
            .between()
            .iter()
            .all(|&file| !pos.is_occupied(Square::new(rank, file)));
        if !path_clear {
            continue;
        }
        let path_safe = side
            .king_path()
            .iter()
            .all(|&file| !is_attacked(pos, Square::new(rank, file), them));
        if path_safe {
            list.push(Move::new_castle(src, side.king_destination(color)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn castles(fen: &str, color: Color) -> Vec<Move> {
        let pos: Position = fen.parse().unwrap();
        let mut list = MoveList::new();
        gen_king(&pos, CastleSide::king_home(color), color, true, &mut list);
        list.as_slice().iter().copied().filter(|mv| mv.is_castle()).collect()
    }

    #[test]
    fn both_sides_when_clear() {
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", Color::White);
        assert_eq!(moves.len(), 2);
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", Color::Black);
        assert!(moves.contains(&Move::new_castle(Square::E8, Square::G8)));
        assert!(moves.contains(&Move::new_castle(Square::E8, Square::C8)));
    }

    #[test]
    fn not_through_attacked_square() {
        // Bishop on a6 covers f1.
        let moves = castles("4k3/8/b7/8/8/8/8/R3K2R w KQ - 0 1", Color::White);
        assert_eq!(moves, vec![Move::new_castle(Square::E1, Square::C1)]);
    }

    #[test]
    fn not_out_of_check() {
        let moves = castles("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1", Color::White);
        assert!(moves.is_empty());
    }

    #[test]
    fn b_file_may_be_attacked_but_not_occupied() {
        // Rook on b8 covers b1 only; queen side castling stays legal.
        let moves = castles("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1", Color::White);
        assert_eq!(moves, vec![Move::new_castle(Square::E1, Square::C1)]);
        let moves = castles("4k3/8/8/8/8/8/8/RN2K3 w Q - 0 1", Color::White);
        assert!(moves.is_empty());
    }

    #[test]
    fn needs_right_and_rook() {
        assert!(castles("4k3/8/8/8/8/8/8/R3K2R w - - 0 1", Color::White).is_empty());
        assert!(castles("4k3/8/8/8/8/8/8/4K2R w Q - 0 1", Color::White).is_empty());
    }

    #[test]
    fn disabled_castling_yields_only_steps() {
        let pos: Position = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let mut list = MoveList::new();
        gen_king(&pos, Square::E1, Color::White, false, &mut list);
        assert_eq!(list.len(), 5);
        assert!(list.as_slice().iter().all(|mv| !mv.is_castle()));
    }
}
