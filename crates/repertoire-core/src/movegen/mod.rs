//! Move generation and the legality filter.
//!
//! Per-piece generators produce pseudo-legal moves. A move is legal when
//! the mover's king is not attacked on a simulated copy of the position.

mod king;
mod knights;
mod pawns;
mod sliders;

use crate::attacks::is_attacked;
use crate::bitboard::Bitboard;
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece_kind::PieceKind;
use crate::position::Position;
use crate::square::Square;

use self::king::gen_king;
use self::knights::gen_knight;
use self::pawns::gen_pawn;
use self::sliders::gen_slider;

/// Stack-allocated buffer for generated moves. Capacity 256 covers the theoretical max of 218.
pub struct MoveList {
    moves: [Move; 256],
    len: u16,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: [Move::NULL; 256],
            len: 0,
        }
    }

    /// Push a move onto the list.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!((self.len as usize) < 256);
        self.moves[self.len as usize] = mv;
        self.len += 1;
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len as usize]
    }

    /// Destination squares of all moves in the list.
    pub fn destinations(&self) -> Bitboard {
        self.as_slice().iter().map(|mv| mv.dest()).collect()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// Push a quiet move or capture for every target not held by `color`.
fn push_targets(pos: &Position, src: Square, color: Color, targets: Bitboard, list: &mut MoveList) {
    for dst in targets.squares() {
        match pos.piece_on(dst) {
            None => list.push(Move::new(src, dst)),
            Some(piece) if piece.color != color => list.push(Move::new_capture(src, dst)),
            Some(_) => {}
        }
    }
}

/// Generate pseudo-legal moves for whatever piece stands on `src`.
///
/// An empty square yields no moves. Castling is only considered when
/// `allow_castling` is set.
pub fn pseudo_legal_moves(pos: &Position, src: Square, allow_castling: bool) -> MoveList {
    let mut list = MoveList::new();
    let Some(piece) = pos.piece_on(src) else {
        return list;
    };
    match piece.kind {
        PieceKind::Pawn => gen_pawn(pos, src, piece.color, &mut list),
        PieceKind::Knight => gen_knight(pos, src, piece.color, &mut list),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            gen_slider(pos, src, piece.kind, piece.color, &mut list)
        }
        PieceKind::King => gen_king(pos, src, piece.color, allow_castling, &mut list),
    }
    list
}

/// Return `true` if `mv` leaves its mover's king unattacked.
///
/// The move is applied to a scratch copy; `pos` itself is never touched.
fn keeps_king_safe(pos: &Position, mv: Move, color: Color) -> Result<bool, BoardError> {
    let after = pos.simulate(mv);
    let king_sq = after.king_square(color)?;
    Ok(!is_attacked(&after, king_sq, color.flip()))
}

/// Legal moves of the piece on `src`, whichever color it is.
///
/// Used where a side other than the one to move must be examined, such as
/// checkmate tests and disambiguation.
pub(crate) fn legal_moves_of_piece(pos: &Position, src: Square) -> Result<MoveList, BoardError> {
    let mut legal = MoveList::new();
    let Some(piece) = pos.piece_on(src) else {
        return Ok(legal);
    };
    for &mv in &pseudo_legal_moves(pos, src, true) {
        if keeps_king_safe(pos, mv, piece.color)? {
            legal.push(mv);
        }
    }
    Ok(legal)
}

/// Legal moves of the piece on `src`.
///
/// Returns an empty list when `src` is empty or holds a piece of the side
/// not to move.
pub fn legal_moves(pos: &Position, src: Square) -> Result<MoveList, BoardError> {
    if !pos.is_color(src, pos.side_to_move()) {
        return Ok(MoveList::new());
    }
    legal_moves_of_piece(pos, src)
}

/// Every legal move of `color`'s pieces.
pub fn all_legal_moves(pos: &Position, color: Color) -> Result<MoveList, BoardError> {
    let mut all = MoveList::new();
    for (src, _) in pos.pieces_of(color) {
        for &mv in &legal_moves_of_piece(pos, src)? {
            all.push(mv);
        }
    }
    Ok(all)
}

/// Return `true` if `color` has at least one legal move.
pub(crate) fn has_legal_move(pos: &Position, color: Color) -> Result<bool, BoardError> {
    for (src, _) in pos.pieces_of(color) {
        if !legal_moves_of_piece(pos, src)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Destination squares of the legal moves of the piece on `src`.
pub fn legal_destinations(pos: &Position, src: Square) -> Result<Bitboard, BoardError> {
    Ok(legal_moves(pos, src)?.destinations())
}

/// Find the legal move `from`→`to` for the side to move, if there is one.
pub fn find_move(pos: &Position, from: Square, to: Square) -> Result<Option<Move>, BoardError> {
    Ok(legal_moves(pos, from)?
        .as_slice()
        .iter()
        .copied()
        .find(|mv| mv.dest() == to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    #[test]
    fn starting_position_20_moves() {
        let start = Position::starting_position();
        let moves = all_legal_moves(&start, Color::White).unwrap();
        assert_eq!(moves.len(), 20, "starting position should have 20 legal moves, got {}", moves.len());
        assert_eq!(all_legal_moves(&start, Color::Black).unwrap().len(), 20);
    }

    #[test]
    fn kiwipete_move_count() {
        let kiwipete = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_eq!(all_legal_moves(&kiwipete, Color::White).unwrap().len(), 48);
    }

    #[test]
    fn side_not_to_move_gets_nothing() {
        let start = Position::starting_position();
        assert!(legal_moves(&start, sq("e7")).unwrap().is_empty());
        assert!(legal_moves(&start, sq("e4")).unwrap().is_empty());
        assert_eq!(legal_moves_of_piece(&start, sq("e7")).unwrap().len(), 2);
    }

    #[test]
    fn pinned_knight_zero_moves() {
        // King on e1, knight on e2, rook on e8: the knight is pinned along the e-file.
        let board = pos("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        assert_eq!(legal_moves(&board, sq("e2")).unwrap().len(), 0, "pinned knight should have 0 moves");
    }

    #[test]
    fn check_must_be_answered() {
        // Rook on e8 checks the king on e1; only blocks and king steps remain.
        let board = pos("4r2k/8/8/8/8/8/3B4/4K3 w - - 0 1");
        let moves = all_legal_moves(&board, Color::White).unwrap();
        let bishop: Vec<_> = moves.as_slice().iter().filter(|mv| mv.source() == sq("d2")).collect();
        assert_eq!(bishop.len(), 1);
        assert_eq!(bishop[0].dest(), sq("e3"));
    }

    #[test]
    fn king_cannot_step_into_attack() {
        let board = pos("4k3/8/8/8/8/8/r7/4K3 w - - 0 1");
        let dests = legal_destinations(&board, sq("e1")).unwrap();
        assert_eq!(dests, Bitboard::from_iter([sq("d1"), sq("f1")]));
    }

    #[test]
    fn en_passant_discovered_check_illegal() {
        // bxc6 would expose the king on a5 to the rook on h5.
        let board = pos("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1");
        let moves = legal_moves(&board, sq("b5")).unwrap();
        assert!(moves.as_slice().iter().all(|mv| !mv.is_en_passant()));
    }

    #[test]
    fn find_move_matches_pair() {
        let start = Position::starting_position();
        let mv = find_move(&start, sq("e2"), sq("e4")).unwrap().unwrap();
        assert!(mv.is_double_push());
        assert_eq!(find_move(&start, sq("e2"), sq("e5")).unwrap(), None);
        assert_eq!(find_move(&start, sq("e7"), sq("e5")).unwrap(), None);
    }

    #[test]
    fn simulate_restore_purity() {
        let fens = [
            crate::fen::STARTING_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1",
            "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 20",
        ];
        for fen in fens {
            let board = pos(fen);
            let before = board;
            for src in Square::all() {
                let _ = legal_moves(&board, src).unwrap();
                let _ = legal_moves_of_piece(&board, src).unwrap();
            }
            assert_eq!(board, before, "legality probing changed {fen}");
            assert_eq!(board.to_string(), fen);
        }
    }
}
