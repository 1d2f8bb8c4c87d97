//! Standard Algebraic Notation for moves.

use crate::castle_rights::CastleSide;
use crate::chess_move::{Move, PromotionPiece};
use crate::error::BoardError;
use crate::movegen::legal_moves_of_piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;

/// Encode `mv`, played from `pre`, in SAN.
///
/// `pre` is only read: disambiguation is evaluated against it and the check
/// suffix against a copy with the move (and `promotion`, if any) applied.
pub fn san(pre: &Position, mv: Move, promotion: Option<PromotionPiece>) -> Result<String, BoardError> {
    let Some(piece) = pre.piece_on(mv.source()) else {
        return Ok(mv.to_string());
    };
    let from = mv.source();
    let to = mv.dest();

    let mut text = match mv.castle_side() {
        Some(CastleSide::KingSide) => String::from("O-O"),
        Some(CastleSide::QueenSide) => String::from("O-O-O"),
        None => {
            let mut text = String::new();
            let is_capture = pre.is_color(to, piece.color.flip())
                || (piece.kind == PieceKind::Pawn && from.file() != to.file());

            match piece.kind.san_letter() {
                Some(letter) => {
                    text.push(letter);
                    text.push_str(&disambiguation(pre, mv)?);
                }
                None if is_capture => text.push(from.file().to_char()),
                None => {}
            }
            if is_capture {
                text.push('x');
            }
            text.push_str(&to.to_string());
            if pre.is_promotion(mv) {
                let choice = promotion.unwrap_or(PromotionPiece::Queen);
                text.push('=');
                text.push(choice.to_piece_kind().fen_char().to_ascii_uppercase());
            }
            text
        }
    };

    let after = pre.make_move(mv, promotion);
    let them = piece.color.flip();
    if after.is_checkmate(them)? {
        text.push('#');
    } else if after.is_check(them)? {
        text.push('+');
    }
    Ok(text)
}

/// The origin qualifier needed to tell `mv` apart from moves of other
/// same-kind, same-color pieces that can also reach its destination.
///
/// The file is preferred; the rank is used when another candidate shares
/// the file, and both when candidates share each.
fn disambiguation(pre: &Position, mv: Move) -> Result<String, BoardError> {
    let from = mv.source();
    let Some(piece) = pre.piece_on(from) else {
        return Ok(String::new());
    };

    let mut rivals = Vec::new();
    for (sq, other) in pre.pieces_of(piece.color) {
        if sq == from || other.kind != piece.kind {
            continue;
        }
        let reaches = legal_moves_of_piece(pre, sq)?
            .as_slice()
            .iter()
            .any(|candidate| candidate.dest() == mv.dest());
        if reaches {
            rivals.push(sq);
        }
    }

    if rivals.is_empty() {
        return Ok(String::new());
    }
    let shares_file = rivals.iter().any(|sq| sq.file() == from.file());
    let shares_rank = rivals.iter().any(|sq| sq.rank() == from.rank());
    // With rivals on both the file and the rank, only the full square is
    // unambiguous; the rank alone would still match the rank-sharing rival.
    Ok(match (shares_file, shares_rank) {
        (false, _) => from.file().to_char().to_string(),
        (true, false) => from.rank().to_char().to_string(),
        (true, true) => from.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::san;
    use crate::chess_move::PromotionPiece;
    use crate::movegen::find_move;
    use crate::position::Position;
    use crate::square::Square;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    /// SAN of each move in turn, starting from `fen`.
    fn line(fen: &str, moves: &[&str]) -> Vec<String> {
        let mut pos: Position = fen.parse().unwrap();
        let mut out = Vec::new();
        for coords in moves {
            let (from, to) = coords.split_once('-').unwrap();
            let mv = find_move(&pos, sq(from), sq(to)).unwrap().unwrap();
            out.push(san(&pos, mv, None).unwrap());
            pos = pos.make_move(mv, None);
        }
        out
    }

    fn one(fen: &str, coords: &str) -> String {
        line(fen, &[coords]).remove(0)
    }

    #[test]
    fn known_opening() {
        let sans = line(crate::fen::STARTING_FEN, &["e2-e4", "e7-e5", "g1-f3"]);
        assert_eq!(sans, ["e4", "e5", "Nf3"]);
    }

    #[test]
    fn captures() {
        let sans = line(crate::fen::STARTING_FEN, &["e2-e4", "d7-d5", "e4-d5", "d8-d5", "b1-c3"]);
        assert_eq!(sans, ["e4", "d5", "exd5", "Qxd5", "Nc3"]);
    }

    #[test]
    fn en_passant_is_a_pawn_capture() {
        let sans = line(crate::fen::STARTING_FEN, &["e2-e4", "a7-a6", "e4-e5", "d7-d5", "e5-d6"]);
        assert_eq!(sans[4], "exd6");
    }

    #[test]
    fn file_disambiguation() {
        // Knights on b1 and f3 can both reach d2.
        let fen = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1";
        assert_eq!(one(fen, "b1-d2"), "Nbd2");
        assert_eq!(one(fen, "f3-d2"), "Nfd2");
    }

    #[test]
    fn rank_disambiguation() {
        // Rooks on a1 and a5 share the file.
        let fen = "4k3/8/8/R7/8/8/8/R3K3 w - - 0 1";
        assert_eq!(one(fen, "a1-a3"), "R1a3");
        assert_eq!(one(fen, "a5-a3"), "R5a3");
    }

    #[test]
    fn full_square_disambiguation() {
        // Queens on a1, a3 and c1 all reach b2.
        let fen = "4k3/8/8/8/8/Q7/8/Q1Q1K3 w - - 0 1";
        assert_eq!(one(fen, "a1-b2"), "Qa1b2");
        assert_eq!(one(fen, "c1-b2"), "Qcb2");
    }

    #[test]
    fn pinned_rival_needs_no_disambiguation() {
        // The c3 knight is pinned by the bishop on a5, so only the g1 knight reaches e2.
        let fen = "4k3/8/8/b7/8/2N5/8/4K1N1 w - - 0 1";
        assert_eq!(one(fen, "g1-e2"), "Ne2");
    }

    #[test]
    fn castling_notation() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        assert_eq!(one(fen, "e1-g1"), "O-O");
        assert_eq!(one(fen, "e1-c1"), "O-O-O");
        // Castling into check gets the suffix as well.
        assert_eq!(one("5k2/8/8/8/8/8/8/4K2R w K - 0 1", "e1-g1"), "O-O+");
    }

    #[test]
    fn check_and_mate_suffixes() {
        let moves = ["f2-f3", "e7-e5", "g2-g4", "d8-h4"];
        let sans = line(crate::fen::STARTING_FEN, &moves);
        assert_eq!(sans, ["f3", "e5", "g4", "Qh4#"]);
        let check = line(crate::fen::STARTING_FEN, &["e2-e4", "f7-f6", "d1-h5"]);
        assert_eq!(check[2], "Qh5+");
    }

    #[test]
    fn promotion_suffix_uses_choice() {
        let pre: Position = "4k3/1P6/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = find_move(&pre, sq("b7"), sq("b8")).unwrap().unwrap();
        assert_eq!(san(&pre, mv, Some(PromotionPiece::Queen)).unwrap(), "b8=Q+");
        assert_eq!(san(&pre, mv, Some(PromotionPiece::Knight)).unwrap(), "b8=N");
        assert_eq!(san(&pre, mv, Some(PromotionPiece::Rook)).unwrap(), "b8=R+");
    }

    #[test]
    fn encoding_leaves_position_untouched() {
        let pre: Position = "4k3/8/8/8/8/5N2/8/1N2K3 w - - 0 1".parse().unwrap();
        let before = pre;
        let mv = find_move(&pre, sq("b1"), sq("d2")).unwrap().unwrap();
        san(&pre, mv, None).unwrap();
        assert_eq!(pre, before);
    }
}
