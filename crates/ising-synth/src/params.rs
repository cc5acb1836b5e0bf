//! Adiabatic sweep parameters.
//!
//! The sweep evolves a transverse-field Ising chain of `n` spins from
//! coupling 0 towards `J`, in `L` nominal steps spread over total time `T`,
//! with `Jmax` setting the coupling reached after all `L` steps.
//!
//! # Example
//!
//! ```rust
//! use ising_synth::params::IsingParams;
//!
//! let params = IsingParams::new(4, 1.0, 2.0, 2400, 240.1);
//! params.validate().unwrap();
//! assert_eq!(params.register_size().unwrap(), 3);
//! assert_eq!(params.step_count().unwrap(), 1200);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};

/// Parameters of one compressed adiabatic sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IsingParams {
    /// Chain length n.
    pub n: usize,
    /// Target coupling J.
    pub j: f64,
    /// Coupling reached after the full schedule, Jmax.
    pub j_max: f64,
    /// Nominal number of steps L.
    pub steps: usize,
    /// Total evolution time T.
    pub total_time: f64,
}

impl IsingParams {
    /// Bundle the sweep parameters. Nothing is checked until [`validate`](Self::validate).
    pub fn new(n: usize, j: f64, j_max: f64, steps: usize, total_time: f64) -> Self {
        Self {
            n,
            j,
            j_max,
            steps,
            total_time,
        }
    }

    /// Same sweep with a different target coupling.
    #[must_use]
    pub fn with_j(mut self, j: f64) -> Self {
        self.j = j;
        self
    }

    /// Check every configuration constraint.
    pub fn validate(&self) -> SynthResult<()> {
        register_size(self.n)?;
        if self.steps == 0 {
            return Err(SynthError::InvalidSteps(0));
        }
        for (name, value) in [
            ("J", self.j),
            ("Jmax", self.j_max),
            ("T", self.total_time),
        ] {
            if !value.is_finite() {
                return Err(SynthError::NonFiniteParameter { name, value });
            }
        }
        if self.j_max == 0.0 {
            return Err(SynthError::ZeroFieldMax);
        }
        step_count(self.j, self.j_max, self.steps)?;
        Ok(())
    }

    /// Register size `m = floor(log2(n)) + 1`.
    pub fn register_size(&self) -> SynthResult<u32> {
        register_size(self.n)
    }

    /// Time step `dt = T / (L + 1)`.
    pub fn dt(&self) -> f64 {
        time_step(self.total_time, self.steps)
    }

    /// Number of emitted steps `LJ = floor(J·L / Jmax)`.
    pub fn step_count(&self) -> SynthResult<usize> {
        step_count(self.j, self.j_max, self.steps)
    }
}

/// Register size `m = floor(log2(n)) + 1` for a chain of `n` spins.
pub fn register_size(n: usize) -> SynthResult<u32> {
    if n == 0 {
        return Err(SynthError::InvalidChainLength(0));
    }
    Ok(n.ilog2() + 1)
}

/// Time step `dt = T / (L + 1)`.
pub fn time_step(total_time: f64, steps: usize) -> f64 {
    total_time / (steps as f64 + 1.0)
}

/// Step count `LJ = floor(J·L / Jmax)`, bounded to `0 ..= L`.
pub fn step_count(j: f64, j_max: f64, steps: usize) -> SynthResult<usize> {
    if j_max == 0.0 {
        return Err(SynthError::ZeroFieldMax);
    }
    let raw = (j * steps as f64 / j_max).floor();
    if !raw.is_finite() {
        return Err(SynthError::NonFiniteParameter {
            name: "J",
            value: j,
        });
    }
    if raw < 0.0 {
        return Err(SynthError::NegativeStepCount { j, j_max });
    }
    let step_count = raw as usize;
    if step_count > steps {
        return Err(SynthError::StepCountExceedsSchedule { step_count, steps });
    }
    Ok(step_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_size() {
        assert_eq!(register_size(1).unwrap(), 1);
        assert_eq!(register_size(2).unwrap(), 2);
        assert_eq!(register_size(3).unwrap(), 2);
        assert_eq!(register_size(4).unwrap(), 3);
        assert_eq!(register_size(7).unwrap(), 3);
        assert_eq!(register_size(8).unwrap(), 4);
        assert_eq!(register_size(1024).unwrap(), 11);
        assert!(matches!(
            register_size(0),
            Err(SynthError::InvalidChainLength(0))
        ));
    }

    #[test]
    fn test_step_count_reference_values() {
        assert_eq!(step_count(1.0, 2.0, 2400).unwrap(), 1200);
        assert_eq!(step_count(0.1, 2.0, 200).unwrap(), 10);
        assert_eq!(step_count(0.0, 2.0, 200).unwrap(), 0);
        assert_eq!(step_count(2.0, 2.0, 200).unwrap(), 200);
    }

    #[test]
    fn test_step_count_bounds() {
        assert!(matches!(
            step_count(3.0, 2.0, 100),
            Err(SynthError::StepCountExceedsSchedule {
                step_count: 150,
                steps: 100
            })
        ));
        assert!(matches!(
            step_count(-1.0, 2.0, 100),
            Err(SynthError::NegativeStepCount { .. })
        ));
        // Both negative: the ratio is positive.
        assert_eq!(step_count(-1.0, -2.0, 100).unwrap(), 50);
    }

    #[test]
    fn test_time_step() {
        assert_eq!(time_step(240.1, 2400), 240.1 / 2401.0);
        assert!((time_step(240.1, 2400) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_time_step_at_largest_schedule() {
        let params = IsingParams::new(4, 0.0, 2.0, usize::MAX, 1.0);
        params.validate().unwrap();
        let dt = params.dt();
        assert!(dt.is_finite());
        assert!(dt > 0.0);
        assert_eq!(time_step(240.1, usize::MAX), 240.1 / (usize::MAX as f64 + 1.0));
    }

    #[test]
    fn test_validate_rejects_bad_configuration() {
        let ok = IsingParams::new(4, 1.0, 2.0, 10, 1.0);
        assert!(ok.validate().is_ok());

        let mut bad = ok;
        bad.n = 0;
        assert!(matches!(bad.validate(), Err(SynthError::InvalidChainLength(0))));

        let mut bad = ok;
        bad.steps = 0;
        assert!(matches!(bad.validate(), Err(SynthError::InvalidSteps(0))));

        let mut bad = ok;
        bad.j_max = 0.0;
        assert!(matches!(bad.validate(), Err(SynthError::ZeroFieldMax)));

        let mut bad = ok;
        bad.total_time = f64::INFINITY;
        assert!(matches!(
            bad.validate(),
            Err(SynthError::NonFiniteParameter { name: "T", .. })
        ));
    }

    #[test]
    fn test_params_deserialize() {
        let json = r#"{"n": 4, "j": 1.0, "j_max": 2.0, "steps": 2400, "total_time": 240.1}"#;
        let params: IsingParams = serde_json::from_str(json).unwrap();
        assert_eq!(params, IsingParams::new(4, 1.0, 2.0, 2400, 240.1));

        let unknown = r#"{"n": 4, "j": 1.0, "j_max": 2.0, "steps": 1, "total_time": 1.0, "x": 1}"#;
        assert!(serde_json::from_str::<IsingParams>(unknown).is_err());
    }
}
