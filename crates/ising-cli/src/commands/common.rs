//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use console::style;
use serde::Deserialize;

use ising_adapter_sim::Counts;
use ising_synth::IsingParams;

/// Parameters used when neither a config file nor a flag sets them:
/// the half sweep `n = 4, J = 1, Jmax = 2, L = 2400, T = 240.1`.
pub const DEFAULT_PARAMS: IsingParams = IsingParams {
    n: 4,
    j: 1.0,
    j_max: 2.0,
    steps: 2400,
    total_time: 240.1,
};

/// Output format shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Sweep parameters from flags, optionally layered over a config file.
#[derive(Debug, Clone, Default, Args)]
pub struct ParamArgs {
    /// YAML or JSON file with any of n, j, j_max, steps, total_time
    #[arg(short, long)]
    pub config: Option<String>,

    /// Chain length n
    #[arg(short = 'n', long = "spins")]
    pub n: Option<usize>,

    /// Target coupling J
    #[arg(long)]
    pub j: Option<f64>,

    /// Coupling reached after the full schedule, Jmax
    #[arg(long)]
    pub j_max: Option<f64>,

    /// Nominal number of steps L
    #[arg(long)]
    pub steps: Option<usize>,

    /// Total evolution time T
    #[arg(long = "time")]
    pub total_time: Option<f64>,
}

/// Any subset of the sweep parameters, as read from a config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamFile {
    pub n: Option<usize>,
    pub j: Option<f64>,
    pub j_max: Option<f64>,
    pub steps: Option<usize>,
    pub total_time: Option<f64>,
}

impl ParamFile {
    fn apply(&self, params: &mut IsingParams) {
        if let Some(n) = self.n {
            params.n = n;
        }
        if let Some(j) = self.j {
            params.j = j;
        }
        if let Some(j_max) = self.j_max {
            params.j_max = j_max;
        }
        if let Some(steps) = self.steps {
            params.steps = steps;
        }
        if let Some(total_time) = self.total_time {
            params.total_time = total_time;
        }
    }
}

impl From<&ParamArgs> for ParamFile {
    fn from(args: &ParamArgs) -> Self {
        Self {
            n: args.n,
            j: args.j,
            j_max: args.j_max,
            steps: args.steps,
            total_time: args.total_time,
        }
    }
}

/// Parse a config file body. `.json` is read as JSON, anything else as YAML.
pub fn parse_param_file(source: &str, path: &Path) -> Result<ParamFile> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(source)
            .with_context(|| format!("Invalid JSON config: {}", path.display())),
        _ => serde_yaml_ng::from_str(source)
            .with_context(|| format!("Invalid YAML config: {}", path.display())),
    }
}

/// Load a config file.
pub fn load_param_file(path: &str) -> Result<ParamFile> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    parse_param_file(&source, path_obj)
}

/// Defaults, then the config file, then flags. The result is validated.
pub fn resolve_params(args: &ParamArgs) -> Result<IsingParams> {
    let mut params = DEFAULT_PARAMS;
    if let Some(path) = &args.config {
        load_param_file(path)?.apply(&mut params);
    }
    ParamFile::from(args).apply(&mut params);
    params
        .validate()
        .with_context(|| format!("Invalid parameters {params:?}"))?;
    Ok(params)
}

/// Print the resolved parameters as a header line.
pub fn print_params(params: &IsingParams) {
    println!(
        "  n = {}, J = {}, Jmax = {}, L = {}, T = {}",
        style(params.n).yellow(),
        style(params.j).yellow(),
        style(params.j_max).yellow(),
        style(params.steps).yellow(),
        style(params.total_time).yellow()
    );
}

/// Print a shot histogram in a table format.
pub fn print_counts(counts: &Counts) {
    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        counts.total()
    );

    let sorted = counts.sorted();
    let total = counts.total() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = *count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_set() {
        let params = resolve_params(&ParamArgs::default()).unwrap();
        assert_eq!(params, DEFAULT_PARAMS);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = ParamArgs {
            n: Some(8),
            steps: Some(200),
            total_time: Some(20.1),
            ..ParamArgs::default()
        };
        let params = resolve_params(&args).unwrap();
        assert_eq!(params.n, 8);
        assert_eq!(params.steps, 200);
        assert_eq!(params.j, 1.0);
    }

    #[test]
    fn test_yaml_and_json_configs() {
        let yaml = parse_param_file("n: 16\nj: 0.5\n", Path::new("sweep.yaml")).unwrap();
        assert_eq!(yaml.n, Some(16));
        assert_eq!(yaml.j, Some(0.5));
        assert_eq!(yaml.steps, None);

        let json = parse_param_file(r#"{"steps": 100, "total_time": 10.1}"#, Path::new("p.json"))
            .unwrap();
        assert_eq!(json.steps, Some(100));

        assert!(parse_param_file("bogus: 1\n", Path::new("p.yml")).is_err());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let args = ParamArgs {
            j_max: Some(0.0),
            ..ParamArgs::default()
        };
        assert!(resolve_params(&args).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let args = ParamArgs {
            config: Some("/nonexistent/ising.yaml".into()),
            ..ParamArgs::default()
        };
        let err = resolve_params(&args).unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
