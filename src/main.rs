use clap::Parser;
use miette::Result;
use qid::cli::{commands, Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let global = cli.global;
    match cli.command {
        Commands::Inspect(args) => commands::inspect::run(args, &global),
        Commands::Failures(args) => commands::failures::run(args, &global),
        Commands::Compare(args) => commands::compare::run(args, &global),
        Commands::Ranges(args) => commands::ranges::run(args, &global),
        Commands::Summary(args) => commands::summary::run(args, &global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}

/// Logs go to stderr; `QID_LOG` takes precedence over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "qid=debug",
        _ => "qid=trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("QID_LOG").unwrap_or_else(|_| default_level.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
