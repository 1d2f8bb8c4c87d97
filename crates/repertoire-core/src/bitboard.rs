//! Square sets packed into a 64-bit integer, one bit per square.
//!
//! Used for the highlight sets the rules engine hands to a renderer
//! (legal destinations, checking pieces) and for cheap membership tests.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

use crate::square::Square;

/// A set of squares (LERF bit mapping).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

impl Bitboard {
    /// The empty set.
    pub const EMPTY: Bitboard = Bitboard(0);

    /// Create a set from raw bits.
    #[inline]
    pub const fn new(bits: u64) -> Bitboard {
        Bitboard(bits)
    }

    /// Return the underlying bits.
    #[inline]
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Return `true` if no square is in the set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of squares in the set.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Return `true` if `sq` is in the set.
    #[inline]
    pub const fn contains(self, sq: Square) -> bool {
        (self.0 & (1u64 << sq.index())) != 0
    }

    /// Return the set with `sq` added.
    #[inline]
    pub const fn with(self, sq: Square) -> Bitboard {
        Bitboard(self.0 | (1u64 << sq.index()))
    }

    /// Pop the lowest square, returning it and the remaining set.
    #[inline]
    pub const fn pop_lsb(self) -> Option<(Square, Bitboard)> {
        if self.0 == 0 {
            None
        } else {
            match Square::from_index(self.0.trailing_zeros() as u8) {
                Some(sq) => Some((sq, Bitboard(self.0 & (self.0 - 1)))),
                None => None,
            }
        }
    }

    /// Iterate over the squares in ascending index order.
    pub fn squares(self) -> impl Iterator<Item = Square> {
        let mut rest = self;
        std::iter::from_fn(move || {
            let (sq, next) = rest.pop_lsb()?;
            rest = next;
            Some(sq)
        })
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(Bitboard::EMPTY, Bitboard::with)
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    #[inline]
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    #[inline]
    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.squares()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Bitboard;
    use crate::square::Square;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn collect_and_iterate_in_index_order() {
        let set: Bitboard = [sq("h8"), sq("a1"), sq("e4")].into_iter().collect();
        assert_eq!(set.count(), 3);
        let order: Vec<Square> = set.squares().collect();
        assert_eq!(order, vec![sq("a1"), sq("e4"), sq("h8")]);
    }

    #[test]
    fn membership() {
        let set = Bitboard::EMPTY.with(sq("d5"));
        assert!(set.contains(sq("d5")));
        assert!(!set.contains(sq("d4")));
        assert!(Bitboard::EMPTY.is_empty());
        assert!((set & !set).is_empty());
    }

    #[test]
    fn debug_lists_squares() {
        let set = Bitboard::EMPTY.with(sq("c3")).with(sq("b1"));
        assert_eq!(format!("{set:?}"), "{Square(b1), Square(c3)}");
    }
}
