//! docmark CLI - Render documentation comments to HTML or plain text
//!
//! Usage:
//!   dmcli [OPTIONS] [COMMAND] <FILE>
//!
//! Commands:
//!   html      Render the comment as an HTML fragment (default)
//!   text      Print the normalized comment text
//!   tokens    Show the token stream
//!   tree      Show the parse tree

use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use docmark_core::{lex, normalize, render_to_html, render_to_text, to_tree, Node, Token};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = env::args().collect();

    match run(&args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let config = parse_args(args)?;
    init_tracing(config.verbose);

    let source = read_input(&config.file)?;
    let split = docmark_core::split(&source);

    // Report any errors
    for error in split.errors.iter() {
        eprintln!("warning: {}", error);
    }
    debug!(file = %config.file, comments = split.lines.len(), "read comment");

    match config.command {
        Command::Html => cmd_html(&split.lines, &config),
        Command::Text => cmd_text(&split.lines, &config),
        Command::Tokens => cmd_tokens(&split.lines, &config),
        Command::Tree => cmd_tree(&split.lines, &config),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(file: &str) -> Result<String, String> {
    if file == "-" {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("failed to read stdin: {}", e))?;
        return Ok(input);
    }
    fs::read_to_string(file).map_err(|e| format!("failed to read '{}': {}", file, e))
}

#[derive(Debug)]
struct Config {
    command: Command,
    file: String,
    format: OutputFormat,
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Command {
    Html,
    Text,
    Tokens,
    Tree,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    let mut command = Command::Html;
    let mut format = OutputFormat::Text;
    let mut verbose = false;
    let mut file = None;

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            "-V" | "--version" => {
                println!("dmcli {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "-v" | "--verbose" => verbose = true,
            "-j" | "--json" => format = OutputFormat::Json,
            "html" => command = Command::Html,
            "text" => command = Command::Text,
            "tokens" => command = Command::Tokens,
            "tree" => command = Command::Tree,
            "-" => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => {
                if file.is_some() {
                    return Err("multiple files specified".to_string());
                }
                file = Some(arg.clone());
            }
        }
        i += 1;
    }

    let file = file.ok_or_else(|| "no input file specified".to_string())?;

    Ok(Config {
        command,
        file,
        format,
        verbose,
    })
}

fn print_help() {
    eprintln!(
        r#"dmcli - documentation comment renderer

USAGE:
    dmcli [OPTIONS] [COMMAND] <FILE>

    FILE holds the raw comment (// lines and /* */ blocks); use - for stdin.

COMMANDS:
    html        Render the comment as an HTML fragment (default)
    text        Print the normalized comment text
    tokens      Show the token stream
    tree        Show the parse tree

OPTIONS:
    -v, --verbose    Log pipeline details to stderr
    -j, --json       Output in JSON format
    -h, --help       Print help information
    -V, --version    Print version information

EXAMPLES:
    dmcli comment.txt           Render a comment to HTML
    dmcli text comment.txt      Print the comment as plain text
    dmcli -j tree comment.txt   Output the parse tree as JSON
    cat comment.txt | dmcli -   Render a comment read from stdin
"#
    );
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// Html / Text Commands
// =============================================================================

fn cmd_html(lines: &[&str], config: &Config) -> Result<(), String> {
    let html = render_to_html(lines);
    match config.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "html": html })),
        OutputFormat::Text => {
            print!("{}", html);
            Ok(())
        }
    }
}

fn cmd_text(lines: &[&str], config: &Config) -> Result<(), String> {
    let text = render_to_text(lines);
    match config.format {
        OutputFormat::Json => print_json(&serde_json::json!({ "text": text })),
        OutputFormat::Text => {
            println!("{}", text);
            Ok(())
        }
    }
}

// =============================================================================
// Tokens Command
// =============================================================================

#[derive(Serialize)]
struct JsonToken<'a> {
    kind: String,
    start: u32,
    end: u32,
    value: &'a str,
}

impl<'a> From<Token<'a>> for JsonToken<'a> {
    fn from(token: Token<'a>) -> Self {
        JsonToken {
            kind: format!("{:?}", token.kind),
            start: token.span.start,
            end: token.span.end,
            value: token.value,
        }
    }
}

fn cmd_tokens(lines: &[&str], config: &Config) -> Result<(), String> {
    let text = normalize(lines);

    match config.format {
        OutputFormat::Json => {
            let tokens: Vec<JsonToken> = lex(&text).map(JsonToken::from).collect();
            print_json(&tokens)
        }
        OutputFormat::Text => {
            for token in lex(&text) {
                println!(
                    "{:>5}..{:<5} {:<14} {:?}",
                    token.span.start,
                    token.span.end,
                    format!("{:?}", token.kind),
                    token.value
                );
            }
            Ok(())
        }
    }
}

// =============================================================================
// Tree Command
// =============================================================================

#[derive(Serialize)]
struct JsonNode<'a> {
    #[serde(rename = "type")]
    kind: String,
    pos: u32,
    #[serde(skip_serializing_if = "str::is_empty")]
    data: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    href: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'a>>,
}

fn convert_node<'a>(node: &'a Node<'_>) -> JsonNode<'a> {
    JsonNode {
        kind: format!("{:?}", node.kind),
        pos: node.pos,
        data: &node.data,
        href: &node.href,
        children: node.children.iter().map(convert_node).collect(),
    }
}

fn cmd_tree(lines: &[&str], config: &Config) -> Result<(), String> {
    let root = to_tree(lines);

    match config.format {
        OutputFormat::Json => print_json(&convert_node(&root)),
        OutputFormat::Text => {
            println!("Blocks: {}", root.children.len());
            for (i, block) in root.children.iter().enumerate() {
                println!();
                println!("[{}] {:?} @{}", i + 1, block.kind, block.pos);
                print_node(block, 1);
            }
            Ok(())
        }
    }
}

fn print_node(node: &Node<'_>, indent: usize) {
    let prefix = "  ".repeat(indent);

    if !node.data.is_empty() {
        println!("{}Content: {:?}", prefix, node.data);
    }
    if !node.href.is_empty() {
        println!("{}Href: {}", prefix, node.href);
    }
    for child in &node.children {
        println!("{}{:?} @{}", prefix, child.kind, child.pos);
        print_node(child, indent + 1);
    }
}
