use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use mazimo_editor_core::{
    DecoratedBlock, Document, EditorConfig, EditorSession, InitialContent, to_plain_text,
};
use miette::{IntoDiagnostic, Result};

mod script;

use script::parse_script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Block texts joined by newlines
    Plain,
    /// Document JSON
    Json,
    /// Block types with their highlighted leaves
    Tokens,
}

#[derive(Parser)]
#[command(version, about = "Mazimo - replay keystrokes against the auto-markdown editor", long_about = None)]
struct Cli {
    /// Keystrokes to replay, e.g. `#<space>Title<enter>body`
    script: String,

    /// Editor configuration JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed document JSON file
    #[arg(long, conflicts_with = "text")]
    seed: Option<PathBuf>,

    /// Seed plain text, one block per line
    #[arg(long)]
    text: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Plain)]
    format: Format,

    /// Print every change notification
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    init_miette();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).into_diagnostic()?;
            EditorConfig::from_json(&json)?
        }
        None => EditorConfig::default(),
    };
    let mut session = match (&cli.seed, cli.text) {
        (Some(path), _) => {
            let json = std::fs::read_to_string(path).into_diagnostic()?;
            let document = Document::from_json(&json)?;
            EditorSession::with_document(config, document)
        }
        (None, Some(text)) => {
            config = config.with_initial_content(InitialContent::Text(text));
            EditorSession::new(config)?
        }
        (None, None) => EditorSession::new(config)?,
    };

    if cli.verbose {
        session.on_change(|payload| match serde_json::to_string(payload) {
            Ok(json) => println!("change {}: {json}", payload.kind()),
            Err(err) => tracing::warn!(%err, "could not serialize change"),
        });
    }

    session.focus();
    let keys = parse_script(&cli.script);
    tracing::debug!(keys = keys.len(), "replaying script");
    for key in &keys {
        session.press_key(key);
    }

    match cli.format {
        Format::Plain => println!("{}", to_plain_text(session.document())),
        Format::Json => println!("{}", session.document().to_json()?),
        Format::Tokens => {
            for block in session.decorated_blocks() {
                println!("{}", render_block(&block));
            }
        }
    }

    Ok(())
}

fn render_block(block: &DecoratedBlock) -> String {
    let leaves: Vec<String> = block
        .leaves
        .iter()
        .map(|leaf| {
            let marks: Vec<&str> = leaf.marks.iter().map(|m| m.kind()).collect();
            if marks.is_empty() {
                format!("{:?}", leaf.text)
            } else {
                format!("{:?}[{}]", leaf.text, marks.join(","))
            }
        })
        .collect();
    format!("{}: {}", block.kind, leaves.join(" "))
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(script: &str) -> EditorSession {
        let mut session = EditorSession::new(EditorConfig::full()).unwrap();
        for key in parse_script(script) {
            session.press_key(&key);
        }
        session
    }

    #[test]
    fn test_replay_heading_and_body() {
        let session = replay("#<space>Title<enter>body");
        let rendered: Vec<String> = session.decorated_blocks().iter().map(render_block).collect();
        insta::assert_snapshot!(rendered.join("\n"), @r#"
        heading1: "Title"
        paragraph: "body"
        "#);
    }

    #[test]
    fn test_render_marks() {
        let session = replay("a **b**");
        let rendered = render_block(&session.decorated_blocks()[0]);
        insta::assert_snapshot!(rendered, @r#"paragraph: "a " "**"[bold,punctuation] "b"[bold] "**"[bold,punctuation]"#);
    }
}
