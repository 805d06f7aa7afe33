use crate::common::{NonZeroUInt, UInt};
use rand::Rng;

/// A source of die faces.
pub trait Roller {
    /// Rolls one die, returning a face in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_step_roller_wraps() {
        let d6 = NonZeroUInt::new(6).unwrap();
        let mut roller = StepRoller::new(5, 1);
        let faces: Vec<_> = (0..4).map(|_| roller.roll(d6)).collect();
        assert_eq!(faces, vec![5, 6, 1, 2]);
    }

    #[test]
    fn test_rng_stays_in_range() {
        let d4 = NonZeroUInt::new(4).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let face = Roller::roll(&mut rng, d4);
            assert!((1..=4).contains(&face));
        }
    }
}
