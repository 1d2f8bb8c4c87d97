//! Pawn move generation.

use crate::attacks::pawn_attacks;
use crate::chess_move::Move;
use crate::color::Color;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal moves for a `color` pawn on `src`.
pub(super) fn gen_pawn(pos: &Position, src: Square, color: Color, list: &mut MoveList) {
    let dir = color.pawn_direction();

    // --- Pushes ---
    if let Some(one) = src.offset(0, dir) {
        if !pos.is_occupied(one) {
            list.push(Move::new(src, one));
            if src.rank() == color.pawn_rank() {
                if let Some(two) = one.offset(0, dir) {
                    if !pos.is_occupied(two) {
                        list.push(Move::new_double_push(src, two));
                    }
                }
            }
        }
    }

    // --- Captures, including onto the en passant target ---
    for dst in pawn_attacks(color, src).squares() {
        if pos.is_color(dst, color.flip()) {
            list.push(Move::new_capture(src, dst));
        } else if pos.en_passant() == Some(dst) && !pos.is_occupied(dst) {
            list.push(Move::new_en_passant(src, dst));
        }
    }
}
