use clap::{CommandFactory, Parser};
use clap_complete::generate;
use report_compare::cli::{commands, Cli, Commands, Verbosity};
use report_compare::config::Config;
use report_compare::output::OutputConfig;
use report_compare::ui::formatter::Formatter;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn initialize_tracing(verbosity: Verbosity) {
    let log_level = verbosity.to_log_level();
    let fallback_filter = format!("report_compare={}", log_level);

    let use_json = std::env::var("REPORT_COMPARE_JSON").is_ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback_filter.into());

    if use_json {
        let json_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    initialize_tracing(verbosity);

    let config = Config::load_or_default(cli.config.as_deref());
    OutputConfig::configure(cli.no_unicode || config.output.no_unicode.unwrap_or(false));
    Formatter::configure_colors_from_env();

    let result = match cli.command {
        Commands::Compare(mut args) => {
            args.merge_config(&config);
            commands::compare(args, &config)
        }
        Commands::Plan(mut args) => {
            args.merge_config(&config);
            commands::plan(args, &config)
        }
        Commands::Completions(args) => {
            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "report-compare", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(err) = &result {
        tracing::debug!(error = %err, "Command failed");
    }
    result
}
