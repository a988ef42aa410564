use crate::Generator;
use linklet_core::ShortCode;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The 62-character alphanumeric alphabet generated codes are drawn from.
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes.
pub const DEFAULT_LENGTH: usize = 6;

/// Generates codes whose characters are drawn independently and uniformly
/// from [`ALPHABET`].
#[derive(Debug)]
pub struct RandomGenerator {
    rng: Mutex<StdRng>,
    length: usize,
}

impl RandomGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed, producing a reproducible sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            length: DEFAULT_LENGTH,
        }
    }

    /// Overrides the code length. The length is clamped to what a
    /// [`ShortCode`] accepts.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length.clamp(
            linklet_core::shortcode::MIN_LENGTH,
            linklet_core::shortcode::MAX_LENGTH,
        );
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let mut rng = self.rng.lock();
        let code: String = (0..self.length)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        ShortCode::new_unchecked(code)
    }
}
