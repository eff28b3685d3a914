mod fs_model;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use jem_config::{init_tracing, load_for_workspace};
use jem_memento::{decode, encode, try_parse, Element, HandlePath, MementoTokenizer, NodeKind};
use serde::Serialize;

use crate::fs_model::{FsElement, FsModel};

#[derive(Parser)]
#[command(name = "jem", version, about = "Encode, decode and inspect Java element mementos")]
struct Cli {
    /// Workspace root holding the project directories (defaults to current directory)
    #[arg(long, global = true, default_value = ".")]
    workspace: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON handle path (a list of nodes) into its memento
    Encode(EncodeArgs),
    /// Decode a memento and resolve it against the workspace on disk
    Decode(MementoArgs),
    /// Print the raw tokens of a memento
    Tokens(MementoArgs),
    /// Check that a memento is well formed and canonical
    Check(MementoArgs),
}

#[derive(Args)]
struct EncodeArgs {
    /// JSON file to read, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,
}

#[derive(Args)]
struct MementoArgs {
    memento: String,
    /// Emit JSON suitable for scripting
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let (config, config_path) = load_for_workspace(&cli.workspace)?;
    init_tracing(&config.logging);
    if let Some(path) = &config_path {
        tracing::debug!(target: "jem.cli", path = %path.display(), "using config file");
    }

    match cli.command {
        Command::Encode(args) => {
            let text = read_input(&args.input)?;
            let path: HandlePath =
                serde_json::from_str(&text).context("input is not a valid handle path")?;
            println!("{}", encode(&path));
            Ok(0)
        }
        Command::Decode(args) => {
            let model = FsModel::new(config.workspace_root(&cli.workspace), &config);
            let Some(element) = decode(&args.memento, &model, &model) else {
                eprintln!("not a memento: {}", args.memento);
                return Ok(1);
            };
            let report = DecodeReport::new(&element, &model);
            let exit = if report.exists { 0 } else { 1 };
            print_output(&report, args.json)?;
            Ok(exit)
        }
        Command::Tokens(args) => {
            let tokens: Vec<_> = MementoTokenizer::new(&args.memento)
                .map(|token| TokenReport {
                    offset: token.offset,
                    sigil: token.sigil.map(|s| s.as_str()),
                    raw: token.raw.to_owned(),
                    text: token.unescaped().ok(),
                })
                .collect();
            print_output(&tokens, args.json)?;
            Ok(0)
        }
        Command::Check(args) => {
            let report = CheckReport::new(&args.memento);
            let exit = if report.canonical { 0 } else { 1 };
            print_output(&report, args.json)?;
            Ok(exit)
        }
    }
}

fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))
}

#[derive(Debug, Serialize)]
struct DecodeReport {
    memento: String,
    kind: NodeKind,
    exists: bool,
    /// On-disk location of the deepest element that exists.
    location: Option<String>,
    /// Memento of the deepest element that exists.
    existing_ancestor: Option<String>,
    path: HandlePath,
}

impl DecodeReport {
    fn new(element: &Element<FsElement>, model: &FsModel<'_>) -> Self {
        // Walk the prefixes again to find how far the model resolved.
        let mut deepest = None;
        for prefix in element.path().prefixes() {
            match decode(&prefix.memento(), model, model) {
                Some(found) if found.exists() => deepest = Some(found),
                _ => break,
            }
        }
        Self {
            memento: element.memento(),
            kind: element.kind(),
            exists: element.exists(),
            location: deepest
                .as_ref()
                .and_then(|found| found.live())
                .map(FsElement::location),
            existing_ancestor: deepest.map(|found| found.memento()),
            path: element.path().clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenReport {
    offset: usize,
    sigil: Option<&'static str>,
    raw: String,
    /// Unescaped payload; absent when the payload has a dangling escape.
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    memento: String,
    valid: bool,
    canonical: bool,
    /// Canonical form of the decoded prefix.
    canonical_form: Option<String>,
    error: Option<String>,
}

impl CheckReport {
    fn new(memento: &str) -> Self {
        match try_parse(memento) {
            Ok(path) => {
                let canonical_form = path.memento();
                Self {
                    memento: memento.to_owned(),
                    valid: true,
                    canonical: canonical_form == memento,
                    canonical_form: Some(canonical_form),
                    error: None,
                }
            }
            Err(err) => Self {
                memento: memento.to_owned(),
                valid: false,
                canonical: false,
                canonical_form: None,
                error: Some(err.to_string()),
            },
        }
    }
}

fn print_output<T: Serialize + 'static>(value: &T, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
        return Ok(());
    }

    // Human output for key types. Everything else falls back to pretty JSON.
    let any = value as &dyn std::any::Any;
    if let Some(report) = any.downcast_ref::<DecodeReport>() {
        println!("{}", report.memento);
        println!("  kind: {:?}", report.kind);
        println!("  exists: {}", report.exists);
        if let Some(location) = &report.location {
            println!("  location: {location}");
        }
        if !report.exists {
            if let Some(ancestor) = &report.existing_ancestor {
                println!("  existing ancestor: {ancestor}");
            }
        }
    } else if let Some(tokens) = any.downcast_ref::<Vec<TokenReport>>() {
        for token in tokens {
            println!(
                "{:>4} {:<2} {}",
                token.offset,
                token.sigil.unwrap_or("?"),
                token.text.as_deref().unwrap_or(&token.raw)
            );
        }
    } else if let Some(report) = any.downcast_ref::<CheckReport>() {
        match (&report.error, &report.canonical_form) {
            (Some(error), _) => println!("invalid: {error}"),
            (None, Some(form)) if report.canonical => println!("canonical: {form}"),
            (None, Some(form)) => println!("not canonical, canonical form: {form}"),
            (None, None) => println!("invalid"),
        }
    } else {
        let out = serde_json::to_string_pretty(value)?;
        println!("{out}");
    }
    Ok(())
}
