//! FEN parsing and serialization for [`Position`].

use std::fmt;
use std::str::FromStr;

use crate::attacks::is_attacked;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::{BoardError, FenError};
use crate::file::File;
use crate::piece::Piece;
use crate::position::Position;
use crate::rank::Rank;
use crate::square::Square;

/// The FEN string for the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl FromStr for Position {
    type Err = FenError;

    /// Parse a FEN string. The two move counters may be omitted, in which
    /// case they default to `0 1`.
    fn from_str(fen: &str) -> Result<Position, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 6 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::WrongRankCount { found: ranks.len() });
        }

        let mut pos = Position::empty();

        // FEN lists rank 8 first.
        for (rank_index, (rank_str, rank)) in ranks.iter().zip(Rank::ALL.into_iter().rev()).enumerate() {
            let mut file_index: u8 = 0;
            for c in rank_str.chars() {
                if let Some(digit) = c.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(FenError::InvalidPieceChar { character: c });
                    }
                    file_index += digit as u8;
                    if file_index > 8 {
                        return Err(FenError::BadRankLength {
                            rank_index,
                            length: file_index as usize,
                        });
                    }
                    continue;
                }
                let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                let file = File::from_index(file_index).ok_or(FenError::BadRankLength {
                    rank_index,
                    length: file_index as usize + 1,
                })?;
                pos.put(Square::new(rank, file), piece);
                file_index += 1;
            }
            if file_index != 8 {
                return Err(FenError::BadRankLength {
                    rank_index,
                    length: file_index as usize,
                });
            }
        }

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                });
            }
        };
        pos.set_side_to_move(side_to_move);
        pos.set_castling(CastleRights::from_fen(fields[2])?);

        let en_passant = match fields[3] {
            "-" => None,
            text => Some(Square::from_algebraic(text).ok_or_else(|| FenError::InvalidEnPassant {
                found: text.to_string(),
            })?),
        };
        pos.set_en_passant(en_passant);

        if fields.len() == 6 {
            pos.set_halfmove_clock(parse_counter(fields[4], "halfmove clock")?);
            pos.set_fullmove_number(parse_counter(fields[5], "fullmove number")?);
        }

        pos.validate()?;
        let waiting = side_to_move.flip();
        if is_attacked(&pos, pos.king_square(waiting)?, side_to_move) {
            return Err(BoardError::OpponentInCheck.into());
        }
        Ok(pos)
    }
}

fn parse_counter(text: &str, field: &'static str) -> Result<u16, FenError> {
    text.parse::<u16>().map_err(|_| FenError::InvalidMoveCounter {
        field,
        found: text.to_string(),
    })
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_count = 0u8;
            for file in File::ALL {
                match self.piece_on(Square::new(rank, file)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            write!(f, "{empty_count}")?;
                            empty_count = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty_count += 1,
                }
            }
            if empty_count > 0 {
                write!(f, "{empty_count}")?;
            }
            if rank != Rank::Rank1 {
                write!(f, "/")?;
            }
        }

        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}
