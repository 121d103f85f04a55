use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::DevoError;

/// Acceptance policy deciding whether a trial replaces its incumbent.
///
/// [`deny`](Self::deny) returns `true` to keep the incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenialStrategy {
    /// Standard DE selection: only strict improvements are accepted.
    #[default]
    Greedy,
    /// Metropolis-Hastings acceptance for a chi-square-like fitness, accepting
    /// with probability `min(1, exp((old - new) / 2))`.
    Metropolis,
}

impl DenialStrategy {
    /// Decides whether the trial with `new_fitness` is rejected in favour of
    /// the incumbent with `old_fitness`.
    pub fn deny<R: Rng + ?Sized>(&self, old_fitness: f64, new_fitness: f64, rng: &mut R) -> bool {
        match self {
            DenialStrategy::Greedy => greedy_denial(old_fitness, new_fitness),
            DenialStrategy::Metropolis => metropolis_denial(old_fitness, new_fitness, rng),
        }
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            DenialStrategy::Greedy => "greedy",
            DenialStrategy::Metropolis => "metropolis",
        }
    }
}

/// Denies unless the trial is strictly better; ties keep the incumbent.
pub fn greedy_denial(old_fitness: f64, new_fitness: f64) -> bool {
    new_fitness >= old_fitness
}

/// Denies when `exp((old - new) / 2)` does not exceed a uniform draw in
/// `[0, 1)`. Any trial at least as good as the incumbent is accepted.
pub fn metropolis_denial<R: Rng + ?Sized>(old_fitness: f64, new_fitness: f64, rng: &mut R) -> bool {
    let dt = ((old_fitness - new_fitness) / 2.0).exp();
    dt <= rng.random::<f64>()
}

impl fmt::Display for DenialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DenialStrategy {
    type Err = DevoError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(DenialStrategy::Greedy),
            "metropolis" | "mcmc" => Ok(DenialStrategy::Metropolis),
            _ => Err(DevoError::UnknownStrategy {
                kind: "denial",
                name: s.to_string(),
            }),
        }
    }
}
