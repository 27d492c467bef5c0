use rand::RngCore;

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

/// Linear congruential generator used by the WFC generator.
///
/// Its output depends on nothing but the seed, so a given seed always
/// replays the same layout on every platform. The period is at most
/// 233 280 draws, which is plenty for choosing among a few hundred cells
/// and is not meant for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    /// Creates a generator from any integer seed. Seeds are reduced modulo
    /// the LCG modulus, so `seed` and `seed + 233280` are equivalent.
    pub fn new(seed: i64) -> Self {
        let state = i128::from(seed).rem_euclid(i128::from(MODULUS));
        Self {
            // `rem_euclid` keeps the value in `0..MODULUS`.
            state: u64::try_from(state).unwrap_or(0),
        }
    }

    /// Returns the next value in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as f64 / MODULUS as f64
    }

    /// Returns an index in `0..max`, or `0` when `max` is zero.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn next_index(&mut self, max: usize) -> usize {
        let index = (self.next_f64() * max as f64).floor() as usize;
        index.min(max.saturating_sub(1))
    }

    /// Picks one element uniformly. Consumes a draw even for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        let index = self.next_index(items.len());
        items.get(index)
    }
}

impl RngCore for SeededRandom {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let high = u64::from(self.next_u32());
        let low = u64::from(self.next_u32());
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn first_draws_follow_the_recurrence() {
        let mut rng = SeededRandom::new(42);
        // (42 * 9301 + 49297) % 233280 = 206_659
        assert!((rng.next_f64() - 206_659.0 / 233_280.0).abs() < 1e-12);
        // (206659 * 9301 + 49297) % 233280
        let expected = (206_659_u64 * 9301 + 49297) % 233_280;
        assert!((rng.next_f64() - expected as f64 / 233_280.0).abs() < 1e-12);
    }

    #[test]
    fn seeds_are_reduced_modulo() {
        let mut a = SeededRandom::new(7);
        let mut b = SeededRandom::new(7 + 233_280);
        let mut c = SeededRandom::new(7 - 233_280);
        for _ in 0..16 {
            let x = a.next_f64();
            assert_eq!(x.to_bits(), b.next_f64().to_bits());
            assert_eq!(x.to_bits(), c.next_f64().to_bits());
        }
    }

    #[test]
    fn next_index_stays_in_range() {
        let mut rng = SeededRandom::new(-5);
        for max in 1..50 {
            assert!(rng.next_index(max) < max);
        }
        assert_eq!(rng.next_index(0), 0);
        assert!(rng.choose::<u8>(&[]).is_none());
    }

    #[test]
    fn works_as_rand_rng() {
        let mut rng = SeededRandom::new(1234);
        for _ in 0..100 {
            let value = rng.gen_range(4..=9);
            assert!((4..=9).contains(&value));
        }
        let mut bytes = [0u8; 7];
        rng.fill_bytes(&mut bytes);
    }
}
