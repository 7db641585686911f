//! Homogeneous Medium

use strata_core::geometry::*;
use strata_core::interaction::MediumInteraction;
use strata_core::medium::*;
use strata_core::pbrt::*;
use strata_core::sampler::*;
use strata_core::spectrum::*;

/// Implements a homogeneous medium representing a region of space with
/// constant σa and σs values throughout its extent.
pub struct HomogeneousMedium {
    /// Scattering coefficient `σs` is the probability of an out-scattering
    /// event occurring per unit distance.
    sigma_s: Spectrum,

    /// Total reduction in radiance due to absorption and out-scattering
    /// `σt = σs + σa`, where the absorption cross section `σa` is the
    /// probability density that light is absorbed per unit distance.
    sigma_t: Spectrum,

    /// The asymmetry parameter for the Henyey-Greenstein phase function.
    g: Float,
}

impl HomogeneousMedium {
    /// Create a new `HomogeneousMedium`.
    ///
    /// * `sigma_a` - Absorption cross section `σa`.
    /// * `sigma_s` - Scattering coefficient `σs`.
    /// * `g`       - The asymmetry parameter for the Henyey-Greenstein phase
    ///               function.
    pub fn new(sigma_a: Spectrum, sigma_s: Spectrum, g: Float) -> Self {
        Self {
            sigma_s,
            sigma_t: sigma_s + sigma_a,
            g,
        }
    }
}

impl Medium for HomogeneousMedium {
    /// Returns the beam transmittance along a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> Spectrum {
        (-self.sigma_t * min(ray.t_max * ray.d.length(), Float::MAX)).exp()
    }

    /// Samples a medium scattering interaction along a world-space ray.
    ///
    /// NOTE: Calling code needs to assign this medium on the returned
    /// interaction's medium interface, as `Self` cannot produce an
    /// `ArcMedium` pointing at itself.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>) {
        // Sample a channel and distance along the ray.
        let channel = min(
            (sampler.get_1d() * SPECTRUM_SAMPLES as Float) as usize,
            SPECTRUM_SAMPLES - 1,
        );
        let dist = -(1.0 - sampler.get_1d()).ln() / self.sigma_t[channel];
        let t = min(dist / ray.d.length(), ray.t_max);
        let sampled_medium = t < ray.t_max;

        let mi = if sampled_medium {
            let phase = PhaseFunction::HenyeyGreenstein(HenyeyGreenstein::new(self.g));
            Some(MediumInteraction::new(ray.at(t), -ray.d, ray.time, None, phase))
        } else {
            None
        };

        // Compute the transmittance and sampling density.
        let tr = (-self.sigma_t * min(t, Float::MAX) * ray.d.length()).exp();

        // Return the weighting factor for scattering from a homogeneous
        // medium.
        let density = if sampled_medium { self.sigma_t * tr } else { tr };

        let mut pdf = 0.0;
        for i in 0..SPECTRUM_SAMPLES {
            pdf += density[i];
        }
        pdf *= 1.0 / SPECTRUM_SAMPLES as Float;
        if pdf == 0.0 {
            debug_assert!(tr.is_black());
            pdf = 1.0;
        }

        let s = if sampled_medium {
            tr * self.sigma_s / pdf
        } else {
            tr / pdf
        };

        (s, mi)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::sampler::SamplerData;

    /// A sampler that plays back a fixed sequence of 1-D values.
    struct SequenceSampler {
        data: SamplerData,
        values: Vec<Float>,
        next: usize,
    }

    impl SequenceSampler {
        fn new(values: Vec<Float>) -> Self {
            Self {
                data: SamplerData::new(1),
                values,
                next: 0,
            }
        }
    }

    impl Sampler for SequenceSampler {
        fn get_data(&self) -> &SamplerData {
            &self.data
        }

        fn get_data_mut(&mut self) -> &mut SamplerData {
            &mut self.data
        }

        fn clone_sampler(&self, _seed: u64) -> Box<dyn Sampler> {
            Box::new(Self::new(self.values.clone()))
        }

        fn get_1d(&mut self) -> Float {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }

        fn get_2d(&mut self) -> Point2f {
            Point2f::new(self.get_1d(), self.get_1d())
        }
    }

    #[test]
    fn transmittance_follows_beer_lambert() {
        let medium = HomogeneousMedium::new(Spectrum::new(0.5), Spectrum::new(0.5), 0.0);
        let mut sampler = SequenceSampler::new(vec![0.5]);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 3.0, 0.0, None);
        let tr = medium.tr(&ray, &mut sampler);
        let expected = (-1.0_f32 * 3.0).exp();
        assert!((tr[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn sample_past_t_max_returns_no_interaction() {
        let medium = HomogeneousMedium::new(Spectrum::new(0.01), Spectrum::new(0.01), 0.0);
        // A u2 close to one pushes the sampled distance far beyond t_max in
        // this thin medium.
        let mut sampler = SequenceSampler::new(vec![0.0, 0.999]);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 1.0, 0.0, None);
        let (weight, mi) = medium.sample(&ray, &mut sampler);
        assert!(mi.is_none());
        assert!(!weight.is_black());
    }

    #[test]
    fn sample_inside_medium_returns_interaction() {
        let medium = HomogeneousMedium::new(Spectrum::new(1.0), Spectrum::new(4.0), 0.0);
        // The dense medium keeps the sampled distance well inside t_max.
        let mut sampler = SequenceSampler::new(vec![0.0, 0.9]);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), 10.0, 0.0, None);
        let (weight, mi) = medium.sample(&ray, &mut sampler);
        let mi = mi.expect("expected a medium interaction");
        assert!(mi.hit.p.z > 0.0 && mi.hit.p.z < 10.0);
        assert!(!weight.is_black());
    }
}
