//! Per-step rotation schedule of the adiabatic sweep.
//!
//! For a fixed `(J, Jmax, L, T)`:
//!
//! - `dt = T / (L + 1)`
//! - field angle `θ₀ = -4·dt`, applied as `Ry(θ₀)` in every step
//! - `LJ = floor(J·L / Jmax)` steps
//! - step `l` couples with `J_l = Jmax·l / L` through the literal matrix
//!   `[[cos φ_l, -sin φ_l], [sin φ_l, cos φ_l]]`, `φ_l = 2·J_l·dt`
//!
//! Everything here is a pure function of the parameters.

use ising_ir::RealUnitary2;

use crate::error::SynthResult;
use crate::params::IsingParams;

/// Parameters of a single sweep step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRotation {
    /// Step index `l`.
    pub index: usize,
    /// Coupling `J_l`.
    pub coupling: f64,
    /// Coupling angle `φ_l`.
    pub phi: f64,
    /// The coupling rotation `R_l`.
    pub unitary: RealUnitary2,
}

/// Deterministic schedule of field and coupling rotations.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationScheduler {
    j_max: f64,
    steps: usize,
    dt: f64,
    step_count: usize,
}

impl RotationScheduler {
    /// Build the schedule for validated parameters.
    pub fn new(params: &IsingParams) -> SynthResult<Self> {
        params.validate()?;
        Ok(Self {
            j_max: params.j_max,
            steps: params.steps,
            dt: params.dt(),
            step_count: params.step_count()?,
        })
    }

    /// Time step `dt`.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of steps `LJ` the sweep emits.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Field angle `θ₀ = -4·dt`.
    pub fn theta0(&self) -> f64 {
        -4.0 * self.dt
    }

    /// The field rotation `Ry(θ₀)`, identical in every step.
    pub fn field_rotation(&self) -> RealUnitary2 {
        RealUnitary2::ry(self.theta0())
    }

    /// Coupling rotation for step `l`.
    pub fn step(&self, l: usize) -> StepRotation {
        let coupling = self.j_max * l as f64 / self.steps as f64;
        let phi = 2.0 * coupling * self.dt;
        StepRotation {
            index: l,
            coupling,
            phi,
            unitary: RealUnitary2::planar(phi),
        }
    }

    /// Steps `0..LJ` in emission order.
    pub fn steps(&self) -> impl ExactSizeIterator<Item = StepRotation> + '_ {
        (0..self.step_count).map(move |l| self.step(l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_is_identity() {
        let sched = RotationScheduler::new(&IsingParams::new(4, 1.0, 2.0, 100, 10.1)).unwrap();
        let first = sched.step(0);
        assert_eq!(first.phi, 0.0);
        assert_eq!(first.unitary, RealUnitary2::IDENTITY);
    }

    #[test]
    fn test_field_rotation_angle() {
        let sched = RotationScheduler::new(&IsingParams::new(2, 1.0, 2.0, 9, 1.0)).unwrap();
        assert_eq!(sched.dt(), 0.1);
        assert!((sched.theta0() + 0.4).abs() < 1e-15);
        let [[c, s_neg], [s, _]] = *sched.field_rotation().rows();
        assert!((c - 0.2f64.cos()).abs() < 1e-15);
        assert!((s - (-0.2f64).sin()).abs() < 1e-15);
        assert_eq!(s_neg, -s);
    }

    #[test]
    fn test_step_angle() {
        let sched = RotationScheduler::new(&IsingParams::new(4, 1.0, 2.0, 10, 10.9)).unwrap();
        let step = sched.step(5);
        assert_eq!(step.coupling, 1.0);
        assert!((step.phi - 2.0 * 10.9 / 11.0).abs() < 1e-12);
        assert_eq!(sched.steps().len(), 5);
    }
}
