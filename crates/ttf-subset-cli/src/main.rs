//! Demo binary: parses a TrueType font, prints its family name, and writes a subset covering
//! a fixed demo string to a fixed output path.

use std::{collections::BTreeSet, fs, path::PathBuf, process::ExitCode};

use clap::Parser;

/// Characters the demo subset is built from.
const DEMO_STRING: &str = "Hello, World!";
const OUTPUT_PATH: &str = "subset.ttf";

#[derive(Debug, Parser)]
#[command(about = "Parses a TTF/TTC font and writes a demo subset next to it")]
struct Args {
    /// Path to the input TrueType font (.ttf or .ttc).
    font_path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = fs::read(&args.font_path)
        .map_err(|err| format!("failed to read {}: {err}", args.font_path.display()))?;
    if bytes.is_empty() {
        return Err(format!("{} is empty", args.font_path.display()).into());
    }

    let font = ttf_subset::Font::new(&bytes)
        .map_err(|err| format!("{} is not a valid TrueType font: {err}", args.font_path.display()))?;

    println!("parsed {} successfully", args.font_path.display());
    match font.font_family() {
        Some(family) => println!("family: {family}"),
        None => println!("family: <unnamed>"),
    }

    let code_points: BTreeSet<char> = DEMO_STRING.chars().collect();
    let subset = font.subset(&code_points)?;
    if !subset.skipped_chars().is_empty() {
        log::warn!("characters not present in the font were skipped: {:?}", subset.skipped_chars());
    }

    let output = subset.to_truetype();
    fs::write(OUTPUT_PATH, output).map_err(|err| format!("failed to write {OUTPUT_PATH}: {err}"))?;
    println!("wrote {} glyphs to {OUTPUT_PATH}", subset.glyph_count());

    Ok(())
}
