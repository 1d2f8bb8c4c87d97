//! Move descriptors, promotion choices, and coordinate move text.

use std::fmt;

use crate::castle_rights::CastleSide;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const SRC_MASK: u16 = 0x003F;
const DST_MASK: u16 = 0x0FC0;
const CAPTURE_BIT: u16 = 0x1000;
const KIND_MASK: u16 = 0x6000;
const DST_SHIFT: u32 = 6;
const KIND_SHIFT: u32 = 13;

/// The category of a generated move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Any ordinary move or capture.
    Normal = 0,
    /// A pawn double step; it creates an en-passant target.
    DoublePush = 1,
    /// A pawn capturing onto the en-passant target.
    EnPassant = 2,
    /// King and rook castling together.
    Castling = 3,
}

impl MoveKind {
    const fn bits(self) -> u16 {
        (self as u16) << KIND_SHIFT
    }
}

/// A move descriptor as produced by the generator, packed into 16 bits.
///
/// ```text
/// bits  0-5:  source square
/// bits  6-11: destination square
/// bit   12:   capture (informational)
/// bits 13-14: move kind (Normal, DoublePush, EnPassant, Castling)
/// ```
///
/// Promotion is not part of the descriptor: a pawn reaching the last rank
/// is resolved after the fact with a [`PromotionPiece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Empty-slot sentinel (a1→a1). Never generated.
    pub const NULL: Move = Move(0);

    const fn pack(source: Square, dest: Square, kind: MoveKind, capture: bool) -> Move {
        let capture = if capture { CAPTURE_BIT } else { 0 };
        Move((source.index() as u16) | ((dest.index() as u16) << DST_SHIFT) | capture | kind.bits())
    }

    /// A quiet move onto an empty square.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, MoveKind::Normal, false)
    }

    /// A move that captures the piece standing on `dest`.
    pub const fn new_capture(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, MoveKind::Normal, true)
    }

    /// A pawn double step.
    pub const fn new_double_push(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, MoveKind::DoublePush, false)
    }

    /// An en-passant capture onto the target square `dest`.
    pub const fn new_en_passant(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, MoveKind::EnPassant, true)
    }

    /// A castling move, given by the king's source and destination.
    pub const fn new_castle(king_src: Square, king_dst: Square) -> Move {
        Move::pack(king_src, king_dst, MoveKind::Castling, false)
    }

    /// The origin square.
    pub fn source(self) -> Square {
        Square::from_index((self.0 & SRC_MASK) as u8).unwrap_or(Square::A1)
    }

    /// The destination square.
    pub fn dest(self) -> Square {
        Square::from_index(((self.0 & DST_MASK) >> DST_SHIFT) as u8).unwrap_or(Square::A1)
    }

    /// The move category.
    pub const fn kind(self) -> MoveKind {
        match (self.0 & KIND_MASK) >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::DoublePush,
            2 => MoveKind::EnPassant,
            _ => MoveKind::Castling,
        }
    }

    /// Return `true` if the move removes an enemy piece.
    pub const fn is_capture(self) -> bool {
        self.0 & CAPTURE_BIT != 0
    }

    /// Return `true` for a pawn double step.
    pub const fn is_double_push(self) -> bool {
        matches!(self.kind(), MoveKind::DoublePush)
    }

    /// Return `true` for an en-passant capture.
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), MoveKind::EnPassant)
    }

    /// Return `true` for castling.
    pub const fn is_castle(self) -> bool {
        matches!(self.kind(), MoveKind::Castling)
    }

    /// The castling side, if this is a castling move.
    pub fn castle_side(self) -> Option<CastleSide> {
        if self.is_castle() {
            CastleSide::from_king_destination(self.dest())
        } else {
            None
        }
    }

    /// Return `true` if this is the empty-slot sentinel.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The move's `from-to` coordinate form.
    pub fn coords(self) -> CoordMove {
        CoordMove::new(self.source(), self.dest())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coords())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} kind={:?}", self, self.kind())?;
        if self.is_capture() {
            write!(f, " capture")?;
        }
        write!(f, ")")
    }
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    /// All choices, in the order they are usually offered.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    /// The piece kind placed on the promotion square.
    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    /// Parse a piece letter (`q`, `r`, `b`, `n`, any case).
    pub fn from_char(c: char) -> Option<PromotionPiece> {
        match c.to_ascii_lowercase() {
            'q' => Some(PromotionPiece::Queen),
            'r' => Some(PromotionPiece::Rook),
            'b' => Some(PromotionPiece::Bishop),
            'n' => Some(PromotionPiece::Knight),
            _ => None,
        }
    }

    /// Lowercase letter, as stored with a recorded line.
    pub const fn to_char(self) -> char {
        self.to_piece_kind().fen_char()
    }
}

impl fmt::Display for PromotionPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A move in `<from>-<to>` coordinate form, as stored in histories and
/// saved lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordMove {
    pub from: Square,
    pub to: Square,
}

impl CoordMove {
    /// Create a coordinate move.
    pub const fn new(from: Square, to: Square) -> CoordMove {
        CoordMove { from, to }
    }

    /// Parse `e2-e4` (or `e2e4`). Malformed text yields `None`.
    pub fn parse(s: &str) -> Option<CoordMove> {
        let s = s.trim();
        let (from, to) = match s.split_once('-') {
            Some(parts) => parts,
            None if s.len() == 4 && s.is_ascii() => s.split_at(2),
            None => return None,
        };
        Some(CoordMove::new(Square::from_algebraic(from)?, Square::from_algebraic(to)?))
    }
}

impl fmt::Display for CoordMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}
