use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rand::Rng;

use crate::error::DevoError;
use crate::trial_parent::trial_parent;
use crate::trial_sp95::trial_sp95;
use crate::trial_sp97::trial_sp97;

/// Trial (mutation + crossover) generation strategy.
///
/// Every variant builds one trial per individual from the current population,
/// the weighting factor F and the crossover constant CR. `Sp97` and `Sp95`
/// need at least 4 individuals, `Parent` at least 3; with fewer the donor
/// draw never terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialStrategy {
    /// rand/1/bin (Storn & Price 1997): three random donors, binomial
    /// crossover with one forced dimension.
    #[default]
    Sp97,
    /// rand/1/exp (Storn & Price 1995): three random donors, one contiguous
    /// (cyclic) block of dimensions whose length is geometric in CR.
    Sp95,
    /// rand/1/bin anchored on the individual itself; only the difference
    /// vector is random. Meant for DE-MCMC with Metropolis acceptance.
    Parent,
}

impl TrialStrategy {
    /// Builds the NP x D trial population for `population`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        population: &Array2<f64>,
        f: f64,
        cr: f64,
        rng: &mut R,
    ) -> Array2<f64> {
        let npop = population.nrows();
        let mut trials = Array2::<f64>::zeros(population.raw_dim());
        for i in 0..npop {
            let trial = match self {
                TrialStrategy::Sp97 => trial_sp97(i, population, f, cr, rng),
                TrialStrategy::Sp95 => trial_sp95(i, population, f, cr, rng),
                TrialStrategy::Parent => trial_parent(i, population, f, cr, rng),
            };
            trials.row_mut(i).assign(&trial);
        }
        trials
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            TrialStrategy::Sp97 => "sp97",
            TrialStrategy::Sp95 => "sp95",
            TrialStrategy::Parent => "parent",
        }
    }
}

impl fmt::Display for TrialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrialStrategy {
    type Err = DevoError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let t = s.to_lowercase();
        match t.as_str() {
            "sp97" | "rand1bin" | "rand-1-bin" | "rand_1_bin" => Ok(TrialStrategy::Sp97),
            "sp95" | "rand1exp" | "rand-1-exp" | "rand_1_exp" => Ok(TrialStrategy::Sp95),
            "parent" | "self" | "mcmc" => Ok(TrialStrategy::Parent),
            _ => Err(DevoError::UnknownStrategy {
                kind: "trial",
                name: s.to_string(),
            }),
        }
    }
}
