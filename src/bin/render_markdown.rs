//! CLI tool to render Markdown as HTML or plain text.
//!
//! Usage:
//!   cargo run --bin render-markdown -- --input analysis.md
//!   echo "**bold** text" | cargo run --bin render-markdown -- --text

use std::env;
use std::io::{self, Read};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use test_history_bridge::markdown::{render_markdown, render_markdown_text};

fn main() {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut input: Option<String> = None;
    let mut plain_text = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => {
                i += 1;
                if i < args.len() {
                    input = Some(args[i].clone());
                } else {
                    eprintln!("Error: --input requires a file path");
                    print_usage();
                    std::process::exit(1);
                }
            }
            "--text" | "-t" => plain_text = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let content = match read_input(input.as_deref()) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input: {}", e);
            std::process::exit(1);
        }
    };

    if plain_text {
        println!("{}", render_markdown_text(&content));
    } else {
        print!("{}", render_markdown(&content));
    }
}

fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some("-") | None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: render-markdown [--input <file>] [--text]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --input, -i   Markdown file to read (default: stdin)");
    eprintln!("  --text, -t    Print plain text instead of HTML");
    eprintln!("  --help, -h    Show this help");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  render-markdown --input report.md > report.html");
    eprintln!("  echo \"**bold** text\" | render-markdown --text");
    eprintln!();
}
