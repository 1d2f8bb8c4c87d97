//! Chess rules for recording and replaying opening lines: positions, legal
//! move generation, move execution, terminal states, and SAN.

mod attacks;
mod bitboard;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod file;
mod game;
mod make_move;
mod movegen;
mod piece;
mod piece_kind;
mod position;
mod rank;
mod san;
mod square;
mod status;

pub use attacks::{attackers, is_attacked};
pub use bitboard::Bitboard;
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{CoordMove, Move, MoveKind, PromotionPiece};
pub use color::Color;
pub use error::{BoardError, FenError, PlayError};
pub use fen::STARTING_FEN;
pub use file::File;
pub use game::{Game, MoveOutcome, PendingPromotion, Snapshot};
pub use movegen::{MoveList, all_legal_moves, find_move, legal_destinations, legal_moves, pseudo_legal_moves};
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use position::{Position, PrettyPosition};
pub use rank::Rank;
pub use san::san;
pub use square::Square;
pub use status::GameStatus;
