//! Bag module - 7-bag piece sequencing
//!
//! Implements the "7-bag" randomization used in modern falling-block games.
//! Each bag holds one of each piece kind, shuffled. The queue is the
//! concatenation of successive bags and always keeps at least
//! [`QUEUE_LOOKAHEAD`] entries materialized, so a repeat of any kind is never
//! more than 12 draws away.

use std::collections::VecDeque;

use crate::rng::{index_up_to, RandomSource};
use crate::types::{PieceKind, NEXT_PREVIEW, QUEUE_LOOKAHEAD};

/// A freshly shuffled permutation of all seven kinds
///
/// Fisher-Yates from the last index down, swapping with a uniform index in `0..=i`.
/// Consumes exactly six values from `source`.
pub fn shuffled_bag(source: &mut impl RandomSource) -> [PieceKind; PieceKind::LEN] {
    let mut bag = PieceKind::ALL;
    for i in (1..bag.len()).rev() {
        let j = index_up_to(source, i);
        bag.swap(i, j);
    }
    bag
}

/// Upcoming pieces, front first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PieceQueue {
    pieces: VecDeque<PieceKind>,
}

impl PieceQueue {
    /// An empty queue; callers fill it through [`ensure_lookahead`](Self::ensure_lookahead)
    pub fn new() -> Self {
        Self {
            pieces: VecDeque::with_capacity(PieceKind::LEN * 3),
        }
    }

    /// A queue already holding the default lookahead
    pub fn filled(source: &mut impl RandomSource) -> Self {
        let mut queue = Self::new();
        queue.ensure_lookahead(source, QUEUE_LOOKAHEAD);
        queue
    }

    /// Append whole shuffled bags until at least `minimum` pieces are queued
    ///
    /// Existing entries keep their order.
    pub fn ensure_lookahead(&mut self, source: &mut impl RandomSource, minimum: usize) {
        while self.pieces.len() < minimum {
            self.pieces.extend(shuffled_bag(source));
        }
    }

    /// Pop the front piece, refilling first so the queue can never run dry
    pub fn take_next(&mut self, source: &mut impl RandomSource) -> PieceKind {
        self.ensure_lookahead(source, QUEUE_LOOKAHEAD);
        loop {
            if let Some(kind) = self.pieces.pop_front() {
                return kind;
            }
            self.ensure_lookahead(source, 1);
        }
    }

    /// The next pieces shown to the player
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied().take(NEXT_PREVIEW)
    }

    /// All materialized pieces
    pub fn iter(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.pieces.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl FromIterator<PieceKind> for PieceQueue {
    fn from_iter<T: IntoIterator<Item = PieceKind>>(iter: T) -> Self {
        Self {
            pieces: iter.into_iter().collect(),
        }
    }
}
