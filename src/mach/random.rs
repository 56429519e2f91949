use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// ## Random numbers for `rand` and `srand()`
///
/// A 32-bit mixing sequence fed by 15-bit draws. Every backend reads the
/// same sequence scaled by its own number of fraction bits.

#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
    rand_num: u32,
    set: bool,
    srand_called: bool,
}

impl Random {
    pub fn new(seed: u64) -> Random {
        Random {
            rng: StdRng::seed_from_u64(seed),
            rand_num: 0,
            set: false,
            srand_called: false,
        }
    }

    /// Seeds from the wall clock.
    pub fn from_clock() -> Random {
        Random::new(chrono::Utc::now().timestamp_millis() as u64)
    }

    fn rand15(&mut self) -> u32 {
        self.rng.gen_range(0..0x8000)
    }

    fn advance(&mut self) {
        let mixed = (self.rand_num << 15).wrapping_add(self.rand15());
        self.rand_num = mixed ^ self.rand_num;
    }

    /// Marks the sequence as seeded and warms it up.
    pub fn seed_time(&mut self) {
        self.set = true;
        for _ in 0..3 {
            self.advance();
        }
    }

    /// Reseeds from the integer parts of a value. A sequence that was
    /// already seeded keeps its state and only mixes the new seed in.
    pub fn srand(&mut self, lx: i64, ly: i64) {
        if !self.set {
            self.rand_num = (lx ^ ly) as u32;
        }
        let seed = self.rand_num ^ (self.rand_num >> 16);
        self.rng = StdRng::seed_from_u64(seed as u64);
        self.set = true;
        self.srand_called = true;
        for _ in 0..3 {
            self.advance();
        }
    }

    pub fn srand_called(&self) -> bool {
        self.srand_called
    }

    /// Next value in `[0, 1)` as a complex pair.
    pub fn draw(&mut self, bitshift: u32) -> (f64, f64) {
        self.advance();
        let x = self.next_part(bitshift);
        self.advance();
        let y = self.next_part(bitshift);
        (x, y)
    }

    fn next_part(&self, bitshift: u32) -> f64 {
        let bitshift = bitshift.max(1).min(31);
        let n = self.rand_num >> (32 - bitshift);
        n as f64 / (1u64 << bitshift) as f64
    }
}
