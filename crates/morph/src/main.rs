mod outline;
mod tree;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use morph_errors::Renderer;
use morph_project::{
    AstNode as _, IndentationText, ManipulationSettings, Project, QuoteKind, SourceFile,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Inspect TypeScript declarations")]
struct Options {
    /// Indentation of printed blocks.
    #[arg(long, global = true, value_enum, default_value_t = Indent::Four)]
    indent: Indent,
    /// Quotes around printed module specifiers.
    #[arg(long, global = true, value_enum, default_value_t = Quote::Double)]
    quote: Quote,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prints the syntax tree with its comments.
    Tree { path: Utf8PathBuf },
    /// Reports parse errors.
    Check { paths: Vec<Utf8PathBuf> },
    /// Prints the declarations of each file with their types.
    Outline { paths: Vec<Utf8PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum Indent {
    Two,
    Four,
    Eight,
    Tab,
}

impl From<Indent> for IndentationText {
    fn from(indent: Indent) -> Self {
        match indent {
            Indent::Two => Self::TwoSpaces,
            Indent::Four => Self::FourSpaces,
            Indent::Eight => Self::EightSpaces,
            Indent::Tab => Self::Tab,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Quote {
    Double,
    Single,
}

impl From<Quote> for QuoteKind {
    fn from(quote: Quote) -> Self {
        match quote {
            Quote::Double => Self::Double,
            Quote::Single => Self::Single,
        }
    }
}

fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true).with_level(true))
        .with(EnvFilter::from_default_env())
        .init();
}

fn add<'p>(project: &'p Project, path: &Utf8Path) -> anyhow::Result<SourceFile<'p>> {
    project.add_source_file_at_path(path).with_context(|| format!("failed to read `{path}`"))
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let options = Options::parse();
    let project = Project::with_settings(ManipulationSettings {
        indentation: options.indent.into(),
        quote: options.quote.into(),
        ..ManipulationSettings::default()
    });

    match options.command {
        Command::Tree { path } => {
            let file = add(&project, &path)?;
            println!("{}", tree::render(file.syntax())?);
        }
        Command::Check { paths } => {
            let renderer = Renderer::styled();
            let mut errors = 0;

            for path in &paths {
                let file = add(&project, path)?;
                let text = file.full_text()?;
                let diagnostics = file.diagnostics()?;
                tracing::debug!(%path, count = diagnostics.len(), "checked file");

                for diagnostic in &diagnostics {
                    eprintln!("{}", diagnostic.render(&renderer, path.as_str(), &text));
                }
                errors += diagnostics.len();
            }

            if errors > 0 {
                anyhow::bail!("found {errors} syntax error(s)");
            }
        }
        Command::Outline { paths } => {
            for path in &paths {
                add(&project, path)?;
            }
            // Files are loaded together so imports resolve across them.
            for file in project.source_files() {
                println!("// {}", file.file_path()?);
                println!("{}", outline::render(file)?);
            }
        }
    }

    Ok(())
}
