//! The seeded generator behind every random draw.
//!
//! Origin/destination sampling, smart labels, start times and Boltzmann
//! route choice all take a `&mut SimRng`.  Nothing reads ambient randomness:
//! one seed plus one configuration reproduces the same population and the
//! same travel times.
//!
//! The generator draws in call order, so it is owned by a single thread.
//! The base and smart runs each construct their own from `SimConfig::seed`.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// The wrapped generator, for `rand` distributions
    /// (`Normal::sample`, `WeightedIndex::sample`).
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Bernoulli draw; `p` outside [0, 1] is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform pick from `items`, `None` when empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.0)
    }
}
