//! Castling rights and the fixed board geometry of castling.

use std::fmt;

use crate::color::Color;
use crate::error::FenError;
use crate::file::File;
use crate::square::Square;

/// Which side of the board to castle toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    /// Both sides, king side first.
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    /// File the king lands on.
    pub const fn king_file(self) -> File {
        match self {
            CastleSide::KingSide => File::FileG,
            CastleSide::QueenSide => File::FileC,
        }
    }

    /// File the rook starts on.
    pub const fn rook_home_file(self) -> File {
        match self {
            CastleSide::KingSide => File::FileH,
            CastleSide::QueenSide => File::FileA,
        }
    }

    /// File the rook lands on.
    pub const fn rook_file(self) -> File {
        match self {
            CastleSide::KingSide => File::FileF,
            CastleSide::QueenSide => File::FileD,
        }
    }

    /// Classify a king destination; `None` unless it is the g- or c-file.
    pub fn from_king_destination(dest: Square) -> Option<CastleSide> {
        match dest.file() {
            File::FileG => Some(CastleSide::KingSide),
            File::FileC => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    /// The king's home square for `color`.
    pub const fn king_home(color: Color) -> Square {
        Square::new(color.back_rank(), File::FileE)
    }

    /// Where the king ends up.
    pub const fn king_destination(self, color: Color) -> Square {
        Square::new(color.back_rank(), self.king_file())
    }

    /// The rook's home corner.
    pub const fn rook_home(self, color: Color) -> Square {
        Square::new(color.back_rank(), self.rook_home_file())
    }

    /// Where the rook ends up.
    pub const fn rook_destination(self, color: Color) -> Square {
        Square::new(color.back_rank(), self.rook_file())
    }

    /// Squares between king and rook; all must be empty.
    pub fn between(self) -> &'static [File] {
        match self {
            CastleSide::KingSide => &[File::FileF, File::FileG],
            CastleSide::QueenSide => &[File::FileB, File::FileC, File::FileD],
        }
    }

    /// Squares the king stands on, crosses, or lands on; none may be attacked.
    pub fn king_path(self) -> &'static [File] {
        match self {
            CastleSide::KingSide => &[File::FileE, File::FileF, File::FileG],
            CastleSide::QueenSide => &[File::FileE, File::FileD, File::FileC],
        }
    }
}

/// Four independent castling flags: bit 0 = White king side, 1 = White
/// queen side, 2 = Black king side, 3 = Black queen side.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastleRights(u8);

impl CastleRights {
    /// No castling rights.
    pub const NONE: CastleRights = CastleRights(0);
    /// All castling rights (the starting position).
    pub const ALL: CastleRights = CastleRights(0b1111);

    const fn bit(color: Color, side: CastleSide) -> u8 {
        let shift = color.index() * 2
            + match side {
                CastleSide::KingSide => 0,
                CastleSide::QueenSide => 1,
            };
        1 << shift
    }

    /// Return `true` if `color` may still castle toward `side`.
    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::bit(color, side) != 0
    }

    /// Return the rights with one flag set.
    #[inline]
    pub const fn grant(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 | Self::bit(color, side))
    }

    /// Return the rights with one flag cleared.
    #[inline]
    pub const fn revoke(self, color: Color, side: CastleSide) -> CastleRights {
        CastleRights(self.0 & !Self::bit(color, side))
    }

    /// Return the rights with both of `color`'s flags cleared.
    #[inline]
    pub const fn revoke_color(self, color: Color) -> CastleRights {
        self.revoke(color, CastleSide::KingSide)
            .revoke(color, CastleSide::QueenSide)
    }

    /// Return `true` if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The right tied to a rook standing on its home corner `sq`, if `sq`
    /// is one of the four corners.
    pub fn for_rook_home(sq: Square) -> Option<(Color, CastleSide)> {
        Color::ALL.into_iter().find_map(|color| {
            CastleSide::ALL
                .into_iter()
                .find(|side| side.rook_home(color) == sq)
                .map(|side| (color, side))
        })
    }

    /// Parse the FEN castling field (`"KQkq"`, `"Kq"`, `"-"`, ...).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        s.chars().try_fold(CastleRights::NONE, |rights, c| {
            let (color, side) = match c {
                'K' => (Color::White, CastleSide::KingSide),
                'Q' => (Color::White, CastleSide::QueenSide),
                'k' => (Color::Black, CastleSide::KingSide),
                'q' => (Color::Black, CastleSide::QueenSide),
                _ => return Err(FenError::InvalidCastlingChar { character: c }),
            };
            Ok(rights.grant(color, side))
        })
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        let flags = [
            (Color::White, CastleSide::KingSide, 'K'),
            (Color::White, CastleSide::QueenSide, 'Q'),
            (Color::Black, CastleSide::KingSide, 'k'),
            (Color::Black, CastleSide::QueenSide, 'q'),
        ];
        for (color, side, c) in flags {
            if self.has(color, side) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({self})")
    }
}
