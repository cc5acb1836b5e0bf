//! Simulator backend implementation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

use ising_ir::{GateSequence, QubitId};

use crate::error::{SimError, SimResult};
use crate::statevector::{MeasurementOutcome, Statevector};

/// Default register limit, about 16 MB of amplitudes.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Outcome histogram keyed by bitstring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts(FxHashMap<String, u64>);

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` occurrences of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, count: u64) {
        *self.0.entry(bitstring.into()).or_insert(0) += count;
    }

    /// Occurrences of `bitstring`, zero if never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.0.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of recorded shots.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Outcomes sorted by descending count, ties by bitstring.
    pub fn sorted(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<_> = self.0.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

/// Final state and measurement record of one stochastic run.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// State after the last operation.
    pub state: Statevector,
    /// Measurement outcomes in execution order.
    pub measurements: Vec<MeasurementOutcome>,
}

impl Trajectory {
    /// Measurement record as a bitstring, or `None` if nothing was measured.
    pub fn record(&self) -> Option<String> {
        if self.measurements.is_empty() {
            return None;
        }
        Some(
            self.measurements
                .iter()
                .map(|m| if m.value { '1' } else { '0' })
                .collect(),
        )
    }
}

/// Local statevector backend for [`GateSequence`]s.
///
/// Stochastic bit flips and measurements are sampled from an RNG seeded with
/// [`with_seed`](Self::with_seed), or from entropy when no seed is set.
#[derive(Debug, Clone)]
pub struct SimulatorBackend {
    /// Maximum number of qubits supported.
    max_qubits: u32,
    /// Seed for reproducible runs.
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }

    /// Override the register limit.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Seed the backend RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configured register limit.
    pub fn max_qubits(&self) -> u32 {
        self.max_qubits
    }

    /// A fresh RNG for one batch of runs.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    fn validate(&self, seq: &GateSequence) -> SimResult<()> {
        let num_qubits = seq.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                num_qubits,
                max: self.max_qubits,
            });
        }
        for op in seq {
            if let Some(qubit) = op.qubits().into_iter().find(|q| q.0 >= num_qubits) {
                return Err(SimError::QubitOutOfRange {
                    qubit,
                    num_qubits,
                    op: op.name(),
                });
            }
        }
        Ok(())
    }

    /// Execute `seq` once from `|0…0⟩`, drawing randomness from `rng`.
    #[instrument(level = "debug", skip(self, seq, rng), fields(name = seq.name(), ops = seq.len()))]
    pub fn run_trajectory<R: Rng>(&self, seq: &GateSequence, rng: &mut R) -> SimResult<Trajectory> {
        self.validate(seq)?;
        let mut state = Statevector::new(seq.num_qubits());
        let mut measurements = vec![];
        for op in seq {
            if let Some(outcome) = state.apply(op, rng)? {
                measurements.push(outcome);
            }
        }
        Ok(Trajectory {
            state,
            measurements,
        })
    }

    /// Execute `seq` once with the backend's own RNG.
    pub fn run(&self, seq: &GateSequence) -> SimResult<Trajectory> {
        self.run_trajectory(seq, &mut self.rng())
    }

    /// Sample `shots` runs into a histogram.
    ///
    /// Each shot records its measurement outcomes in order. A sequence
    /// without measurements is read out on the whole register, qubit 0 first.
    #[instrument(skip(self, seq), fields(name = seq.name()))]
    pub fn sample_counts(&self, seq: &GateSequence, shots: u32) -> SimResult<Counts> {
        let start = Instant::now();
        let mut rng = self.rng();
        let mut counts = Counts::new();

        for shot in 0..shots {
            let trajectory = self.run_trajectory(seq, &mut rng)?;
            let bitstring = match trajectory.record() {
                Some(record) => record,
                None => {
                    let outcome = trajectory.state.sample(&mut rng);
                    trajectory.state.outcome_to_bitstring(outcome)
                }
            };
            counts.insert(bitstring, 1);

            if shot > 0 && shot % 1000 == 0 {
                debug!("Completed {} shots", shot);
            }
        }

        debug!("Sampling completed in {:?}", start.elapsed());
        Ok(counts)
    }

    /// Per-qubit magnetization averaged over `trajectories` runs.
    ///
    /// Each run draws its own stochastic bit flips, so the average
    /// approximates the mixed-state expectation.
    #[instrument(skip(self, seq), fields(name = seq.name()))]
    pub fn mean_magnetization(&self, seq: &GateSequence, trajectories: u32) -> SimResult<Vec<f64>> {
        if trajectories == 0 {
            return Err(SimError::NoTrajectories);
        }
        let mut rng = self.rng();
        let mut sums = vec![0.0; seq.num_qubits() as usize];
        for _ in 0..trajectories {
            let trajectory = self.run_trajectory(seq, &mut rng)?;
            for (q, sum) in QubitId::range(seq.num_qubits()).zip(&mut sums) {
                *sum += trajectory.state.magnetization(q)?;
            }
        }
        Ok(sums
            .into_iter()
            .map(|s| s / f64::from(trajectories))
            .collect())
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ising_ir::{RealUnitary2, SequenceBuilder};

    fn bell() -> GateSequence {
        let mut builder = SequenceBuilder::new("bell", 2);
        builder
            .h(QubitId(0))
            .unwrap()
            .mc_unitary(RealUnitary2::PAULI_X, [QubitId(0)], QubitId(1))
            .unwrap();
        builder.finish()
    }

    #[test]
    fn test_simulator_bell_state() {
        let backend = SimulatorBackend::new().with_seed(1);
        let counts = backend.sample_counts(&bell(), 1000).unwrap();

        assert_eq!(counts.total(), 1000);
        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[test]
    fn test_measurement_record_keys_counts() {
        let mut builder = bell().into_builder();
        builder.measure(QubitId(1), "b").unwrap();
        let seq = builder.finish();
        let counts = SimulatorBackend::new().with_seed(5).sample_counts(&seq, 200).unwrap();
        assert_eq!(counts.get("0") + counts.get("1"), 200);
        assert!(counts.get("0") > 0 && counts.get("1") > 0);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let mut builder = SequenceBuilder::new("flip", 3);
        for q in QubitId::range(3) {
            builder.bit_flip(q, 0.5).unwrap();
        }
        let seq = builder.finish();
        let backend = SimulatorBackend::new().with_seed(42);
        assert_eq!(
            backend.sample_counts(&seq, 100).unwrap(),
            backend.sample_counts(&seq, 100).unwrap()
        );
    }

    #[test]
    fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::new().with_max_qubits(5);
        let seq = SequenceBuilder::new("test", 10).finish();
        let result = backend.run(&seq);

        assert!(matches!(
            result,
            Err(SimError::TooManyQubits {
                num_qubits: 10,
                max: 5
            })
        ));
    }

    #[test]
    fn test_deserialized_sequence_is_checked() {
        let json = r#"{"name":"bad","num_qubits":1,"ops":[{"kind":"hadamard","qubit":3}]}"#;
        let seq: GateSequence = serde_json::from_str(json).unwrap();
        assert!(matches!(
            SimulatorBackend::new().run(&seq),
            Err(SimError::QubitOutOfRange { op: "h", .. })
        ));
    }

    #[test]
    fn test_mean_magnetization_requires_trajectories() {
        assert!(matches!(
            SimulatorBackend::new().mean_magnetization(&bell(), 0),
            Err(SimError::NoTrajectories)
        ));
        let mags = SimulatorBackend::new().mean_magnetization(&bell(), 3).unwrap();
        assert!(mags.iter().all(|m| m.abs() < 1e-12));
    }
}
