//! Move execution via copy-make.
//!
//! [`Position::make_move`] is real application: it completes promotions,
//! flips the side to move and advances the counters. [`Position::simulate`]
//! is the probe used by the legality filter: pieces, castling rights and the
//! en passant target change, the side to move does not.

use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, PromotionPiece};
use crate::color::Color;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;

impl Position {
    /// Return `true` if `mv` takes a pawn to its last rank.
    pub fn is_promotion(&self, mv: Move) -> bool {
        match self.piece_on(mv.source()) {
            Some(piece) => piece.kind == PieceKind::Pawn && mv.dest().rank() == piece.color.promotion_rank(),
            None => false,
        }
    }

    /// Apply a move and return the resulting position. `self` is not modified.
    ///
    /// A pawn reaching the last rank becomes `promotion`, or a queen when no
    /// piece is given. If the source square is empty the position is
    /// returned unchanged.
    pub fn make_move(&self, mv: Move, promotion: Option<PromotionPiece>) -> Position {
        let Some(moving) = self.piece_on(mv.source()) else {
            return *self;
        };
        let mut pos = *self;
        let captured = pos.apply_placement(mv, moving);

        if self.is_promotion(mv) {
            let kind = promotion.unwrap_or(PromotionPiece::Queen).to_piece_kind();
            pos.put(mv.dest(), Piece::new(kind, moving.color));
        }

        if moving.kind == PieceKind::Pawn || captured {
            pos.set_halfmove_clock(0);
        } else {
            pos.set_halfmove_clock(self.halfmove_clock().saturating_add(1));
        }
        if moving.color == Color::Black {
            pos.set_fullmove_number(self.fullmove_number().saturating_add(1));
        }
        pos.set_side_to_move(moving.color.flip());
        pos
    }

    /// Apply a move to a scratch copy for legality probing.
    ///
    /// The side to move is left as it was and a promoting pawn stays a pawn;
    /// neither affects whether the mover's king is attacked.
    pub fn simulate(&self, mv: Move) -> Position {
        let Some(moving) = self.piece_on(mv.source()) else {
            return *self;
        };
        let mut pos = *self;
        pos.apply_placement(mv, moving);
        pos
    }

    /// Move the pieces, maintain castling rights, and recompute the en
    /// passant target. Returns `true` if a piece was captured.
    fn apply_placement(&mut self, mv: Move, moving: Piece) -> bool {
        let src = mv.source();
        let dst = mv.dest();
        let color = moving.color;
        let mut captured = false;

        // En passant: a pawn moving diagonally onto the empty target square
        // removes the pawn that passed it.
        if moving.kind == PieceKind::Pawn
            && self.en_passant() == Some(dst)
            && !self.is_occupied(dst)
            && src.file() != dst.file()
        {
            if let Some(passed) = dst.offset(0, -color.pawn_direction()) {
                captured = self.take(passed).is_some();
            }
        }

        match mv.castle_side() {
            Some(side) => {
                self.take(src);
                let rook = self.take(side.rook_home(color));
                self.put(side.king_destination(color), moving);
                if let Some(rook) = rook {
                    self.put(side.rook_destination(color), rook);
                }
            }
            None => {
                self.take(src);
                captured |= self.take(dst).is_some();
                self.put(dst, moving);
            }
        }

        self.set_castling(revoke_rights(self.castling(), mv, moving));

        let double_step = moving.kind == PieceKind::Pawn && src.rank().index().abs_diff(dst.rank().index()) == 2;
        self.set_en_passant(if double_step { src.offset(0, color.pawn_direction()) } else { None });

        captured
    }
}

/// Castling rights after `mv`: a king move drops both of its side's rights,
/// and any move from or onto a rook's home corner drops the right tied to
/// that corner, whoever moved.
fn revoke_rights(rights: CastleRights, mv: Move, moving: Piece) -> CastleRights {
    let mut rights = rights;
    if moving.kind == PieceKind::King {
        rights = rights.revoke_color(moving.color);
    }
    for corner in [mv.source(), mv.dest()] {
        if let Some((color, side)) = CastleRights::for_rook_home(corner) {
            rights = rights.revoke(color, side);
        }
    }
    rights
}
