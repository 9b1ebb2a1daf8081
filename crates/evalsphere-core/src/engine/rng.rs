//! Deterministic randomness for synthetic results.
//!
//! The synthesizer keys a `mulberry32` generator off a 32-bit FNV-1a hash of
//! the agent/test configuration, so identical inputs always reproduce
//! identical reports. Both pieces are pure functions over `u32` state; the
//! arithmetic matches the canvas UI's generator bit for bit (the hash walks
//! UTF-16 code units, and every step wraps at 32 bits).

/// 32-bit FNV-1a hash over the UTF-16 code units of `input`.
pub fn seed_from_key(input: &str) -> u32 {
    let mut h: u32 = 2166136261;
    for unit in input.encode_utf16() {
        h ^= unit as u32;
        h = h.wrapping_mul(16777619);
    }
    h
}

/// One mulberry32 step: returns a draw in `[0, 1)` and the advanced state.
pub fn mulberry32_next(state: u32) -> (f64, u32) {
    let state = state.wrapping_add(0x6D2B79F5);
    let mut t = state;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let draw = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (draw, state)
}

/// Stateful convenience wrapper over [`mulberry32_next`].
#[derive(Debug, Clone, Copy)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn from_key(key: &str) -> Self {
        Self::new(seed_from_key(key))
    }

    pub fn next_f64(&mut self) -> f64 {
        let (draw, state) = mulberry32_next(self.state);
        self.state = state;
        draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(seed_from_key(""), 2166136261);
        assert_eq!(seed_from_key("a"), 0xe40c292c);
        assert_eq!(seed_from_key("foobar"), 0xbf9cf968);
    }

    #[test]
    fn test_fnv1a_walks_utf16_code_units() {
        // One BMP unit and one surrogate pair (two units).
        assert_eq!(seed_from_key("\u{00e9}"), 1812687940);
        assert_eq!(seed_from_key("\u{1F600}"), 3409036472);
    }

    #[test]
    fn test_fnv1a_of_report_keys() {
        assert_eq!(seed_from_key("1|4|Accuracy,Bias"), 2868866);
        assert_eq!(seed_from_key("2|0|"), 17432103);
    }

    #[test]
    fn test_mulberry32_reference_sequence() {
        let mut rng = Mulberry32::new(42);
        assert_eq!(rng.next_f64(), 0.6011037519201636);
        assert_eq!(rng.next_f64(), 0.44829055899754167);
        assert_eq!(rng.next_f64(), 0.8524657934904099);

        let (first, _) = mulberry32_next(0);
        assert_eq!(first, 0.26642920868471265);
    }

    #[test]
    fn test_step_function_matches_wrapper() {
        let mut rng = Mulberry32::from_key("1|4|Accuracy,Bias");
        let mut state = seed_from_key("1|4|Accuracy,Bias");
        for _ in 0..16 {
            let (draw, next) = mulberry32_next(state);
            state = next;
            assert_eq!(rng.next_f64(), draw);
        }
    }

    #[test]
    fn test_draws_stay_in_unit_interval() {
        let mut rng = Mulberry32::new(u32::MAX);
        for _ in 0..1000 {
            let draw = rng.next_f64();
            assert!((0.0..1.0).contains(&draw));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Mulberry32::new(7);
        let mut b = Mulberry32::new(8);
        let seq_a: Vec<f64> = (0..8).map(|_| a.next_f64()).collect();
        let seq_b: Vec<f64> = (0..8).map(|_| b.next_f64()).collect();
        assert_ne!(seq_a, seq_b);
    }
}
