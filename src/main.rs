use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use web_cleaner::ProjectLayout;

#[derive(Parser, Debug)]
#[command(
    name = "web-cleaner",
    version,
    author,
    about = "Strip comments and console.log calls from a web project",
    long_about = "Copies PROJECT_DIR/public into PROJECT_DIR/cleaned.\n\n\
    .js files lose their console.log(...) calls and // and /* */ comments; \
    .html and .css files lose /* */ and <!-- --> comments. Every other file \
    is copied unchanged.\n\n\
    USAGE EXAMPLES:\n  \
      # Clean the project in the current directory\n  \
      web-cleaner\n\n  \
      # Clean another project and write the result elsewhere\n  \
      web-cleaner ./my-site --out /tmp/my-site-clean\n\n  \
      # See what would happen\n  \
      web-cleaner ./my-site --dry-run -v"
)]
struct Cli {
    /// Project folder containing a `public` directory
    #[arg(default_value = ".", value_name = "PROJECT_DIR")]
    project: PathBuf,

    /// Output directory (defaults to PROJECT_DIR/cleaned)
    #[arg(short, long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Dry run (don't write files)
    #[arg(long)]
    dry_run: bool,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let mut layout = ProjectLayout::from_project_dir(&cli.project)?;
    if let Some(out) = cli.out {
        layout = layout.with_output_dir(out);
    }

    let config = layout
        .config(cli.dry_run)
        .context("Failed to build configuration")?;

    let stats = web_cleaner::run(config).context("Cleaning failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        stats.print_summary();
        if !stats.dry_run {
            println!(
                "Cleaned project has been saved to: {}",
                layout.output_dir.display()
            );
        }
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::new("web_cleaner=info"),
        1 => EnvFilter::new("web_cleaner=debug"),
        _ => EnvFilter::new("web_cleaner=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
