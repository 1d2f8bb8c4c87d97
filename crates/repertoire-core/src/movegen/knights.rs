//! Knight move generation.

use crate::attacks::knight_attacks;
use crate::color::Color;
use crate::position::Position;
use crate::square::Square;

use super::MoveList;

/// Generate pseudo-legal moves for a `color` knight on `src`.
pub(super) fn gen_knight(pos: &Position, src: Square, color: Color, list: &mut MoveList) {
    super::push_targets(pos, src, color, knight_attacks(src), list);
}
