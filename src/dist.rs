use rand::prelude::*;
use rand_distr::Exp;

/// A stateless sampler parameterised by the run's uniform source.
///
/// Every size draw and routing decision in a simulation consumes the
/// same `StdRng` in a fixed order, so a run is fully determined by its
/// seed. Arrival samplers use the same type; the sampled value is then
/// interpreted as an inter-arrival time.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Dist {
    /// Exponential with rate `mu`, mean `1/mu`.
    Exp(f64),
    /// Uniform on `[a, b)`.
    Uniform(f64, f64),
    /// Bounded Pareto on `[k, p]` with shape `alpha`.
    BoundedPareto(f64, f64, f64),
    /// 1 with probability `p`, else 0.
    Bernoulli(f64),
    /// Two-branch hyperexponential: rate `low_mu` with probability
    /// `prob_low`, rate `high_mu` otherwise.
    Hyperexp(f64, f64, f64),
}

impl Dist {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Dist::Exp(mu) => Exp::new(*mu).unwrap().sample(rng),
            Dist::Uniform(a, b) => a + (b - a) * rng.gen::<f64>(),
            Dist::BoundedPareto(k, p, alpha) => {
                let c = k.powf(*alpha) / (1.0 - (k / p).powf(*alpha));
                (-rng.gen::<f64>() / c + k.powf(-alpha)).powf(-1.0 / alpha)
            }
            Dist::Bernoulli(p) => {
                if rng.gen::<f64>() <= *p {
                    1.0
                } else {
                    0.0
                }
            }
            Dist::Hyperexp(low_mu, high_mu, prob_low) => {
                let mu = if rng.gen::<f64>() < *prob_low {
                    low_mu
                } else {
                    high_mu
                };
                Exp::new(*mu).unwrap().sample(rng)
            }
        }
    }

    pub fn mean(&self) -> f64 {
        use Dist::*;
        match self {
            Exp(mu) => 1.0 / mu,
            Uniform(a, b) => (a + b) / 2.0,
            BoundedPareto(k, p, alpha) => {
                let c = k.powf(*alpha) / (1.0 - (k / p).powf(*alpha));
                if (alpha - 1.0).abs() < 1e-12 {
                    c * (p / k).ln()
                } else {
                    c * alpha / (alpha - 1.0) * (k.powf(1.0 - alpha) - p.powf(1.0 - alpha))
                }
            }
            Bernoulli(p) => *p,
            Hyperexp(low_mu, high_mu, prob_low) => prob_low / low_mu + (1.0 - prob_low) / high_mu,
        }
    }

    /// Second moment, needed for Pollaczek-Khinchine style checks.
    pub fn second_moment(&self) -> f64 {
        use Dist::*;
        match self {
            Exp(mu) => 2.0 / (mu * mu),
            Uniform(a, b) => (a * a + a * b + b * b) / 3.0,
            BoundedPareto(k, p, alpha) => {
                let c = k.powf(*alpha) / (1.0 - (k / p).powf(*alpha));
                if (alpha - 2.0).abs() < 1e-12 {
                    c * 2.0 * (p / k).ln()
                } else {
                    c * alpha / (alpha - 2.0) * (k.powf(2.0 - alpha) - p.powf(2.0 - alpha))
                }
            }
            Bernoulli(p) => *p,
            Hyperexp(low_mu, high_mu, prob_low) => {
                2.0 * prob_low / (low_mu * low_mu) + 2.0 * (1.0 - prob_low) / (high_mu * high_mu)
            }
        }
    }
}
