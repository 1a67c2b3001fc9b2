//! topicqr command line entrypoint

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use topicqr::output::{confirmation_line, render_report};
use topicqr::{Generator, Result, TopicEntry, TopicQrConfig, logging};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "topicqr",
    version,
    about = "Generate topic QR codes with a centered logo"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to topicqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Logo image pasted onto every code
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Directory receiving the generated PNG files
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// URL the `?topic=` query is appended to
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Topic to generate as LABEL=SUFFIX; repeat to build the list (replaces configured topics)
    #[arg(long = "topic", value_name = "LABEL=SUFFIX")]
    topics: Vec<TopicEntry>,

    /// Skip decoding each code after the logo is pasted
    #[arg(long)]
    no_verify: bool,

    /// Output the run report as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Generation aborted");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = TopicQrConfig::load(cli.config.as_deref())?;

    if let Some(logo) = cli.logo {
        config.logo_path = logo;
    }
    if let Some(output) = cli.output {
        config.output_folder = output;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if !cli.topics.is_empty() {
        config.topics = cli.topics;
    }
    if cli.no_verify {
        config.verify = false;
    }

    logging::init(&config.logging)?;
    info!(
        logo = %config.logo_path.display(),
        output = %config.output_folder.display(),
        topics = config.topics.len(),
        "Starting topicqr"
    );

    let generator = Generator::setup(&config)?;

    if cli.json {
        let report = generator.run(&config.base_url, &config.topics)?;
        let rendered = render_report(&report)?;
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        let report = generator.run_with(&config.base_url, &config.topics, |code| {
            println!("{}", confirmation_line(code));
        })?;
        if let Some(summary) = render_report(&report)?.human.last() {
            println!("{summary}");
        }
    }

    Ok(())
}
