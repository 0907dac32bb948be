//! seo-lint CLI
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use seo_lint::{Cli, Commands, commands};
use seo_lint_core::alignment::ProblemSolutionAligner;
use seo_lint_core::audit::AuditOptions;
use seo_lint_core::config::ConfigLoader;
use seo_lint_core::lsi::LsiIntegrator;
use tracing::debug;

mod observability;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if cli.version_only {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // arg_required_else_help ensures we have --version-only or a subcommand
    let Some(command) = cli.command else {
        return Ok(());
    };

    if let Some(ref dir) = cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = camino::Utf8PathBuf::try_from(cwd).map_err(|e| {
        anyhow::anyhow!(
            "current directory is not valid UTF-8: {}",
            e.into_path_buf().display()
        )
    })?;
    let mut loader = ConfigLoader::new().with_project_search(&cwd);
    if let Some(ref config_path) = cli.config {
        let config_path = camino::Utf8PathBuf::try_from(config_path.clone()).map_err(|e| {
            anyhow::anyhow!(
                "config path is not valid UTF-8: {}",
                e.into_path_buf().display()
            )
        })?;
        loader = loader.with_file(&config_path);
    }
    let (config, config_sources) = loader.load().context("failed to load configuration")?;

    let obs_config = observability::ObservabilityConfig::from_env_with_overrides(
        config
            .log_dir
            .as_ref()
            .map(|dir| dir.as_std_path().to_path_buf()),
    );
    let log_level = cli.log_level.unwrap_or(config.log_level);
    let env_filter = observability::env_filter(cli.quiet, cli.verbose, log_level.as_str());
    let _guard = observability::init_observability(&obs_config, env_filter)
        .context("failed to initialize logging/tracing")?;

    debug!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        json = cli.json,
        color = ?cli.color,
        chdir = ?cli.chdir,
        "CLI initialized"
    );

    let max_input = config.input_limit();

    // Execute command
    let result = match command {
        Commands::Keywords(args) => commands::keywords::cmd_keywords(
            args,
            cli.json,
            &config.keyword_density,
            max_input,
        ),
        Commands::Precision(args) => config
            .precision
            .engine()
            .context("invalid precision configuration")
            .and_then(|engine| {
                commands::precision::cmd_precision(
                    args,
                    cli.json,
                    &engine,
                    config.precision.min_score,
                    max_input,
                )
            }),
        Commands::Lsi(args) => {
            let integrator = LsiIntegrator::new(config.lsi.clone());
            commands::lsi::cmd_lsi(args, cli.json, &integrator, max_input)
        }
        Commands::Align(args) => ProblemSolutionAligner::from_config(&config.alignment)
            .context("invalid alignment configuration")
            .and_then(|aligner| commands::align::cmd_align(args, cli.json, &aligner, max_input)),
        Commands::Links(args) => {
            commands::links::cmd_links(args, cli.json, &config.links, max_input)
        }
        Commands::BrokenLinks(args) => tokio::runtime::Runtime::new()
            .context("failed to create async runtime for link checking")
            .and_then(|rt| {
                rt.block_on(commands::broken_links::cmd_broken_links(
                    args,
                    cli.json,
                    cli.quiet,
                    &config.broken_links,
                    max_input,
                ))
            }),
        Commands::Analyze(args) => AuditOptions::from_config(&config)
            .context("invalid analyzer configuration")
            .and_then(|options| {
                commands::analyze::cmd_analyze(args, cli.json, options, max_input)
            }),
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &config_sources),
        #[cfg(feature = "mcp")]
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()
                .context("failed to create async runtime for MCP server")?;
            rt.block_on(commands::serve::cmd_serve(args, max_input, config))
        }
    };
    if let Err(ref err) = result {
        tracing::error!(error = %err, "fatal error");
    }
    result
}
