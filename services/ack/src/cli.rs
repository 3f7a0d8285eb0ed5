use clap::Parser;
use missive_ack::acknowledgement::TemplateDirectory;
use missive_ack::config::{AppConfig, TelemetryConfig};
use missive_ack::error::AppError;
use missive_ack::pipeline::{PipelineCoordinator, RunReport};
use missive_ack::telemetry;
use missive_ack::verification::{HttpVerificationClient, MissiveVerifier};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "missive-ack",
    about = "Verify a nominal missive and write its acknowledgement",
    version
)]
struct Cli {
    /// Missive to verify
    #[arg(long = "in", value_name = "PATH")]
    input: Option<PathBuf>,
    /// Where the acknowledgement is written
    #[arg(long = "out", value_name = "PATH")]
    output: Option<PathBuf>,
    /// Configuration file (defaults to conf/missive-ack.env when present)
    #[arg(long = "conf", value_name = "PATH")]
    conf: Option<PathBuf>,
}

const LEGACY_FLAGS: [&str; 3] = ["in", "out", "conf"];

/// Rewrites `-in`, `-out` and `-conf` (optionally `=value`) to their
/// double-dash form; everything else passes through untouched.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let legacy = arg.to_str().and_then(|text| {
                let flag = text.strip_prefix('-')?;
                if flag.starts_with('-') {
                    return None;
                }
                let name = flag.split_once('=').map_or(flag, |(name, _)| name);
                LEGACY_FLAGS
                    .iter()
                    .any(|legacy| *legacy == name)
                    .then(|| OsString::from(format!("-{text}")))
            });
            legacy.unwrap_or(arg)
        })
        .collect()
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    let config = match AppConfig::load(cli.conf.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            if telemetry::init(&TelemetryConfig::default()).is_ok() {
                error!(error = %err, "configuration could not be loaded");
            }
            return Err(err.into());
        }
    };
    telemetry::init(&config.telemetry)?;

    let Some(input) = cli.input else {
        error!("no missive given, expected -in <path>");
        return Err(AppError::MissingArgument("in"));
    };
    let Some(output) = cli.output else {
        error!("no destination given, expected -out <path>");
        return Err(AppError::MissingArgument("out"));
    };

    let template_name = config.template.require_name().map_err(|err| {
        error!(error = %err, "acknowledgement template is not configured");
        err
    })?;

    let client = HttpVerificationClient::from_config(&config.authority).map_err(|err| {
        error!(error = %err, "unable to prepare validation authority client");
        err
    })?;

    let coordinator = PipelineCoordinator::new(
        MissiveVerifier::new(client),
        TemplateDirectory::new(&config.template.directory),
        template_name,
    );

    match coordinator.run(&input, &output)? {
        RunReport::Ineligible { kind } => {
            info!(message_type = kind.label(), "nothing to acknowledge");
        }
        RunReport::Persisted { outcome, output } => match serde_json::to_string(&outcome) {
            Ok(record) => info!(
                output = %output.display(),
                outcome = %record,
                "acknowledgement complete"
            ),
            Err(err) => warn!(
                output = %output.display(),
                outcome = %outcome.summary(),
                error = %err,
                "acknowledgement complete, outcome record unavailable"
            ),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn legacy_single_dash_flags_are_rewritten() {
        let normalized = normalize_args(args(&[
            "missive-ack",
            "-in",
            "missive.xml",
            "-out=ack.xml",
            "--conf",
            "conf/custom.env",
            "-v",
        ]));
        assert_eq!(
            normalized,
            args(&[
                "missive-ack",
                "--in",
                "missive.xml",
                "--out=ack.xml",
                "--conf",
                "conf/custom.env",
                "-v",
            ])
        );
    }

    #[test]
    fn parses_normalized_arguments() {
        let cli = Cli::parse_from(normalize_args(args(&[
            "missive-ack",
            "-in",
            "missive.xml",
            "-out",
            "ack.xml",
        ])));
        assert_eq!(cli.input, Some(PathBuf::from("missive.xml")));
        assert_eq!(cli.output, Some(PathBuf::from("ack.xml")));
        assert_eq!(cli.conf, None);
    }
}
