//! RNG module - injectable uniform random source
//!
//! The sequencer never reaches for global randomness. Everything that shuffles
//! takes a `&mut impl RandomSource`, so a seeded or scripted source makes piece
//! order fully reproducible.
//!
//! Provides a simple LCG for deterministic sessions and an adapter for any
//! `rand` generator.

use rand::{Rng as _, RngCore};

/// A generator of uniform values in `[0, 1)`
///
/// Implementations must advance their state on every call.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Current internal state (usable as a seed to continue the sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl RandomSource for SimpleRng {
    fn next_unit(&mut self) -> f64 {
        // High 24 bits have the longest period in an LCG.
        f64::from(self.next_u32() >> 8) / f64::from(1u32 << 24)
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Adapter exposing any `rand` generator as a [`RandomSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Uniform index in `0..=max` drawn from one `next_unit` value
pub fn index_up_to(source: &mut impl RandomSource, max: usize) -> usize {
    let scaled = (source.next_unit() * (max + 1) as f64).floor();
    (scaled as usize).min(max)
}
