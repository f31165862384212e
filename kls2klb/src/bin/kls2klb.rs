use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use kls2klb::convert_kls_to_klb;

#[derive(Parser, Debug)]
#[command(author, version, about = "KeyRouter Layout Script to Binary Converter", long_about = None)]
struct Args {
    /// Input KLS file path
    input: PathBuf,

    /// Output KLB file path (defaults to input with .klb extension)
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    // Determine output path
    let output_path = args.output.unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("klb");
        path
    });

    log::info!("Converting {} to {}", args.input.display(), output_path.display());

    convert_kls_to_klb(&args.input, &output_path)
        .with_context(|| format!("failed to compile {}", args.input.display()))?;

    Ok(())
}
