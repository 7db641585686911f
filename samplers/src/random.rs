//! Random Sampler.

use strata_core::geometry::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;
use strata_core::rng::*;
use strata_core::sampler::*;

/// Implements a sampler that uses a PRNG to generate uniformly random
/// samples.
pub struct RandomSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Optional seed for the random number generator.
    pub fn new(samples_per_pixel: usize, seed: Option<u64>) -> Self {
        Self {
            data: SamplerData::new(samples_per_pixel),
            rng: match seed {
                Some(s) => RNG::new(s),
                None => RNG::default(),
            },
        }
    }
}

impl Sampler for RandomSampler {
    /// Returns a shared reference to the underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    /// Returns a mutable reference to the underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    /// Generates a new instance of an initial `Sampler` for use by a
    /// rendering thread.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(Self::new(self.data.samples_per_pixel, Some(seed)))
    }

    /// Returns the sample value for the next dimension of the current sample
    /// vector.
    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    /// Returns the sample value for the next two dimensions of the current
    /// sample vector.
    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
    }
}

impl From<(&ParamSet, Bounds2i)> for RandomSampler {
    /// Create a `RandomSampler` from given parameter set and sample bounds.
    ///
    /// * `p` - A tuple containing parameter set and sample bounds.
    fn from(p: (&ParamSet, Bounds2i)) -> Self {
        let (params, _sample_bounds) = p;
        let samples_per_pixel = params.find_one_int("pixelsamples", 4) as usize;
        Self::new(samples_per_pixel, None)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloned_samplers_with_same_seed_agree() {
        let base = RandomSampler::new(4, None);
        let mut a = base.clone_sampler(11);
        let mut b = base.clone_sampler(11);
        for _ in 0..32 {
            assert_eq!(a.get_1d(), b.get_1d());
        }
    }

    #[test]
    fn sample_counting() {
        let mut sampler = RandomSampler::new(2, Some(1));
        sampler.start_pixel(&Point2i::new(0, 0));
        assert!(sampler.start_next_sample());
        assert!(!sampler.start_next_sample());
        assert!(sampler.set_sample_number(1));
        assert!(!sampler.set_sample_number(2));
    }
}
