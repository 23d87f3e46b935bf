//! Structured construction of the external job command.

use serde::Serialize;
use std::fmt;

use crate::config::LauncherConfig;
use crate::types::ParamSet;

/// A fully resolved external command: a program plus discrete argv entries.
///
/// Parameter values become their own argv entries. Nothing is ever
/// interpolated into a shell string, so values with spaces or shell
/// metacharacters cannot change the command's meaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl JobCommand {
    /// Resolve the launcher template and one parameter set into an argv.
    ///
    /// Layout: `<program> <args..> [image] <entrypoint..> <flags..>`.
    pub fn build(launcher: &LauncherConfig, params: &ParamSet) -> Self {
        let mut args = launcher.args.clone();
        if let Some(image) = &launcher.image {
            args.push(image.clone());
        }
        args.extend(launcher.entrypoint.iter().cloned());
        args.push(launcher.epochs_flag.clone());
        args.push(params.epochs.to_string());
        args.push(launcher.batch_size_flag.clone());
        args.push(params.batch_size.to_string());
        args.push(launcher.learning_rate_flag.clone());
        args.push(params.learning_rate.to_string());

        Self {
            program: launcher.program.clone(),
            args,
        }
    }
}

/// Space-joined rendering for logs and the plan listing. Display only;
/// execution always passes `program` and `args` separately.
impl fmt::Display for JobCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn params() -> ParamSet {
        ParamSet {
            label: "LR Sweep".into(),
            epochs: 5,
            batch_size: 64,
            learning_rate: 0.001,
        }
    }

    #[test]
    fn test_build_default_launcher() {
        let command = JobCommand::build(&LauncherConfig::default(), &params());
        assert_eq!(command.program, "docker");
        assert_eq!(
            command.args,
            vec![
                "run",
                "--rm",
                "mnist",
                "python",
                "-u",
                "main.py",
                "--epochs",
                "5",
                "--batch-size",
                "64",
                "--lr",
                "0.001",
            ]
        );
    }

    #[test]
    fn test_build_without_image() {
        let launcher = LauncherConfig {
            program: "./train.sh".into(),
            args: Vec::new(),
            image: None,
            entrypoint: Vec::new(),
            ..LauncherConfig::default()
        };
        let command = JobCommand::build(&launcher, &params());
        assert_eq!(command.program, "./train.sh");
        assert_eq!(
            command.args,
            vec!["--epochs", "5", "--batch-size", "64", "--lr", "0.001"]
        );
    }

    #[test]
    fn test_parameters_stay_discrete_arguments() {
        let launcher = LauncherConfig {
            image: Some("img; rm -rf /".into()),
            ..LauncherConfig::default()
        };
        let command = JobCommand::build(&launcher, &params());
        // The whole string is one argv entry, not something a shell parses.
        assert!(command.args.contains(&"img; rm -rf /".to_string()));
    }

    #[test]
    fn test_display_joins_argv() {
        let command = JobCommand::build(&LauncherConfig::default(), &params());
        assert_eq!(
            command.to_string(),
            "docker run --rm mnist python -u main.py --epochs 5 --batch-size 64 --lr 0.001"
        );
    }
}
