use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

use pagesmith::attachment::Attachment;
use pagesmith::form::PromptForm;
use pagesmith::{Config, PagesmithService};

const USAGE: &str = "usage: generate_page [--file PATH] [--out PATH] [PROMPT...]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    prompt: String,
    file: Option<PathBuf>,
    out: Option<PathBuf>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut words = Vec::new();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-f" | "--file" => {
                let path = iter.next().ok_or_else(|| anyhow!("--file needs a path\n{USAGE}"))?;
                parsed.file = Some(PathBuf::from(path));
            }
            "-o" | "--out" => {
                let path = iter.next().ok_or_else(|| anyhow!("--out needs a path\n{USAGE}"))?;
                parsed.out = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(anyhow!(USAGE)),
            _ => words.push(arg),
        }
    }

    parsed.prompt = words.join(" ");
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Minimal stderr tracing so stdout carries only the page
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = Config::load();
    let service = PagesmithService::new(&config)?;

    let mut form = PromptForm::new();
    form.set_prompt(args.prompt);
    if let Some(path) = &args.file {
        let attachment = Attachment::from_path(path, service.max_upload_bytes())
            .with_context(|| format!("Failed to attach {}", path.display()))?;
        form.attach(attachment);
    }

    let html = service.submit(&mut form).await?;

    match &args.out {
        Some(path) => {
            tokio::fs::write(path, &html)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {} bytes to {}", html.len(), path.display());
        }
        None => println!("{html}"),
    }
    Ok(())
}
