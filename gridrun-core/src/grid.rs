//! Sweep grid construction.
//!
//! Expands the configured value lists into the ordered plan of runs:
//! the epoch sweep first, then the batch sweep, then the learning-rate
//! sweep, each varying exactly one parameter while the other two stay
//! at their configured defaults.

use crate::config::SweepConfig;
use crate::types::ParamSet;

pub const EPOCH_SWEEP: &str = "Epoch Sweep";
pub const BATCH_SWEEP: &str = "Batch Sweep";
pub const LR_SWEEP: &str = "LR Sweep";

/// Expand the configured sweeps into the ordered list of planned runs.
///
/// An empty value list yields an empty sweep, not an error.
pub fn build_grid(config: &SweepConfig) -> Vec<ParamSet> {
    let mut plan = Vec::with_capacity(
        config.epochs.len() + config.batch_sizes.len() + config.learning_rates.len(),
    );

    for &epochs in &config.epochs {
        plan.push(ParamSet {
            label: EPOCH_SWEEP.to_string(),
            epochs,
            batch_size: config.default_batch_size,
            learning_rate: config.default_learning_rate,
        });
    }
    for &batch_size in &config.batch_sizes {
        plan.push(ParamSet {
            label: BATCH_SWEEP.to_string(),
            epochs: config.default_epochs,
            batch_size,
            learning_rate: config.default_learning_rate,
        });
    }
    for &learning_rate in &config.learning_rates {
        plan.push(ParamSet {
            label: LR_SWEEP.to_string(),
            epochs: config.default_epochs,
            batch_size: config.default_batch_size,
            learning_rate,
        });
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_has_thirteen_runs_in_sweep_order() {
        let plan = build_grid(&SweepConfig::default());
        assert_eq!(plan.len(), 13);

        let labels: Vec<&str> = plan.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(&labels[..5], &[EPOCH_SWEEP; 5]);
        assert_eq!(&labels[5..9], &[BATCH_SWEEP; 4]);
        assert_eq!(&labels[9..], &[LR_SWEEP; 4]);
    }

    #[test]
    fn test_epoch_sweep_holds_other_parameters_fixed() {
        let plan = build_grid(&SweepConfig::default());
        let epochs: Vec<u32> = plan[..5].iter().map(|p| p.epochs).collect();
        assert_eq!(epochs, vec![1, 3, 5, 10, 15]);
        for p in &plan[..5] {
            assert_eq!(p.batch_size, 64);
            assert_eq!(p.learning_rate, 0.01);
        }
    }

    #[test]
    fn test_batch_sweep_varies_only_batch_size() {
        let plan = build_grid(&SweepConfig::default());
        let batches: Vec<u32> = plan[5..9].iter().map(|p| p.batch_size).collect();
        assert_eq!(batches, vec![32, 64, 128, 256]);
        for p in &plan[5..9] {
            assert_eq!(p.epochs, 5);
            assert_eq!(p.learning_rate, 0.01);
        }
    }

    #[test]
    fn test_lr_sweep_varies_only_learning_rate() {
        let plan = build_grid(&SweepConfig::default());
        let rates: Vec<f64> = plan[9..].iter().map(|p| p.learning_rate).collect();
        assert_eq!(rates, vec![0.001, 0.005, 0.01, 0.05]);
        for p in &plan[9..] {
            assert_eq!(p.epochs, 5);
            assert_eq!(p.batch_size, 64);
        }
    }

    #[test]
    fn test_empty_value_list_yields_empty_sweep() {
        let config = SweepConfig {
            epochs: Vec::new(),
            ..SweepConfig::default()
        };
        let plan = build_grid(&config);
        assert_eq!(plan.len(), 8);
        assert!(plan.iter().all(|p| p.label != EPOCH_SWEEP));
    }

    #[test]
    fn test_fully_empty_config_yields_empty_plan() {
        let config = SweepConfig {
            epochs: Vec::new(),
            batch_sizes: Vec::new(),
            learning_rates: Vec::new(),
            ..SweepConfig::default()
        };
        assert!(build_grid(&config).is_empty());
    }
}
