use std::path::PathBuf;
use std::process::ExitCode;

use cfg_if::cfg_if;
use clap::Parser;
use clap::ValueEnum;
use filter_probe::config::Settings;
use filter_probe::error::Error;
use filter_probe::error::ExitStatus;
use filter_probe::probe::Summary;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Probes how libpng stores filter selectors and prints a comparison table.
#[derive(Debug, Parser)]
#[clap(name = "filter-probe", version)]
struct ProbeArgs {
    /// Optional path to a TOML configuration file. Settings not given there
    /// or through `PROBE_*` environment variables use the build defaults.
    #[clap(short = 'c', long, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty")]
    output_format: LogOutputFormat,
}

fn main() -> ExitCode {
    let args = ProbeArgs::parse();

    let pretty = matches!(args.output_format, LogOutputFormat::Pretty);
    filter_probe::logging::setup_logging("warn,filter_probe=info", pretty);

    match run(args.config) {
        Ok(_) => ExitStatus::Success.into(),
        Err(error) => {
            let status = error.exit_status();
            tracing::error!(%error, exit_code = status as u8, "the probe could not complete");
            status.into()
        }
    }
}

fn run(config: Option<PathBuf>) -> Result<Summary, Error> {
    let settings = Settings::new(config)?;
    tracing::debug!(?settings, version = filter_probe::VERSION, "loaded settings");

    probe_linked(settings)
}

cfg_if! {
    if #[cfg(any(feature = "libpng", feature = "testing"))] {
        fn probe_linked(settings: Settings) -> Result<Summary, Error> {
            use filter_probe::library::Linked;
            use filter_probe::library::SELF_TEST;
            use filter_probe::probe::Probe;

            let summary = Probe::<Linked>::new(settings, Box::new(std::io::stdout())).run()?;
            if SELF_TEST {
                tracing::warn!(
                    cases = summary.cases,
                    "self-test finished against the in-process model; no library was observed"
                );
            }
            Ok(summary)
        }
    } else {
        fn probe_linked(_: Settings) -> Result<Summary, Error> {
            Err(Error::NoLibraryLinked)
        }
    }
}
