mod cli;

use anyhow::Context;
use kindle::report::Report;
use kindle::{source, target};
use std::path::Path;

fn main() {
    use clap::Parser;
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_env("KINDLE_LOG"))
        .with_writer(std::io::stderr)
        .init();

    for new_path in cli.directory.iter() {
        match new_path.canonicalize() {
            Err(e) => {
                eprintln!(
                    "Failed to resolve path for -C/--directory {}\n{}",
                    new_path.display(),
                    e
                );
                std::process::exit(1);
            }
            Ok(cwd) => {
                if let Err(err) = std::env::set_current_dir(&cwd) {
                    eprintln!("Failed to set work directory to {}\n{}", cwd.display(), err,);
                    std::process::exit(1);
                }

                tracing::info!(directory=%cwd.display(), "Changed working directory");
            }
        }
    }

    if let Err(e) = translate(&cli) {
        for error in e.chain() {
            eprintln!("{error}")
        }
        std::process::exit(1);
    }
}

fn translate(cli: &cli::Cli) -> anyhow::Result<()> {
    let input = load(cli.input.as_deref())?;
    let document: source::Config = serde_yaml::from_str(&input).context("Failed to parse document")?;

    // schema validation is left to the consumer of the generated document
    let validator = |_: &target::Config| Report::default();
    let (translated, _, mut report) =
        kindle::config::translate_validated(&document, &cli.translate_options(), &validator);

    report.sort();
    eprint!("{report}");

    anyhow::ensure!(
        !cli.strict || report.is_empty(),
        "Translation produced warnings and --strict is set"
    );
    let translated = translated.context("Translation failed")?;

    output(cli.output.as_deref(), cli.pretty, &translated)
}

fn load(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        None => Ok(std::io::read_to_string(std::io::stdin())?),
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn output(path: Option<&Path>, pretty: bool, value: &target::Config) -> anyhow::Result<()> {
    let mut rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    rendered.push('\n');

    match path {
        None => print!("{rendered}"),
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
    }

    Ok(())
}
