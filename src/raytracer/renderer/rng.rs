/// 32-bit integer mix used to derive per-path seeds.
#[inline]
pub fn hash_u32(mut a: u32) -> u32 {
    a = a.wrapping_add(0x7ed55d16).wrapping_add(a << 12);
    a = (a ^ 0xc761c23c) ^ (a >> 19);
    a = a.wrapping_add(0x165667b1).wrapping_add(a << 5);
    a = a.wrapping_add(0xd3a2646c) ^ (a << 9);
    a = a.wrapping_add(0xfd7046c5).wrapping_add(a << 3);
    (a ^ 0xb55a4f09) ^ (a >> 16)
}

const BOUNCE_DOMAIN: u32 = 0x9e37_79b9;
const CAMERA_DOMAIN: u32 = 0x85eb_ca6b;

/// Folds each key field through the hash in turn, so no field can spill
/// into another's bits. The pixel lands in the low word on its own.
fn stream_seed(domain: u32, iteration: u32, depth: u32, pixel_index: u32) -> u64 {
    let high = hash_u32(hash_u32(hash_u32(domain) ^ iteration) ^ depth);
    let low = hash_u32(high ^ pixel_index);
    ((high as u64) << 32) | low as u64
}

/// PCG stream owned by a single path for a single bounce.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self(seed);
        rng.next_u32();
        rng
    }

    /// Independent stream for `(iteration, pixel, depth)`.
    pub fn for_path(iteration: u32, pixel_index: u32, depth: u32) -> Self {
        Self::new(stream_seed(BOUNCE_DOMAIN, iteration, depth, pixel_index))
    }

    /// Stream for jitter and lens samples, disjoint from every bounce stream.
    pub fn for_camera(iteration: u32, pixel_index: u32) -> Self {
        Self::new(stream_seed(CAMERA_DOMAIN, iteration, 0, pixel_index))
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.0;
        self.0 = old.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let xorshifted = (((old >> 18) ^ old) >> 27) as u32;
        let rot = (old >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform in [0, 1).
    pub fn next(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let mut rng = Rng::new(42);
        for _ in 0..10_000 {
            let x = rng.next();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_streams_are_reproducible() {
        let a: Vec<u32> = {
            let mut r = Rng::for_path(3, 1234, 2);
            (0..8).map(|_| r.next_u32()).collect()
        };
        let b: Vec<u32> = {
            let mut r = Rng::for_path(3, 1234, 2);
            (0..8).map(|_| r.next_u32()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn test_streams_differ_per_key() {
        let first = |i, p, d| Rng::for_path(i, p, d).next_u32();
        let base = first(3, 1234, 2);
        assert_ne!(base, first(4, 1234, 2));
        assert_ne!(base, first(3, 1235, 2));
        assert_ne!(base, first(3, 1234, 3));
    }

    fn sequence(mut rng: Rng) -> Vec<u32> {
        (0..4).map(|_| rng.next_u32()).collect()
    }

    #[test]
    fn test_wide_keys_do_not_alias() {
        assert_ne!(sequence(Rng::for_path(5, 77, 0)), sequence(Rng::for_path(5, 77, 512)));
        assert_ne!(sequence(Rng::for_path(1 << 22, 77, 0)), sequence(Rng::for_path(0, 77, 1)));
        assert_ne!(
            sequence(Rng::for_path(u32::MAX, 77, 0)),
            sequence(Rng::for_path(0x7f_ffff, 77, 1))
        );
        assert_ne!(sequence(Rng::for_path(3, 1, 0)), sequence(Rng::for_path(3, 0, 1)));
    }

    #[test]
    fn test_camera_stream_is_separate() {
        for depth in [0, 1, 1023, u32::MAX] {
            assert_ne!(sequence(Rng::for_camera(3, 77)), sequence(Rng::for_path(3, 77, depth)));
        }
    }
}
