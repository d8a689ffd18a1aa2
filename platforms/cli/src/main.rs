use clap::{Parser, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tursym::{
    encode, normalize_and_symmetrize, symmetrize, to_json, Machine, MachineCatalog,
    MachineLoader,
};

/// Output format of the transformed machine.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Turns a multi-tape Turing machine into one with a symmetric transition relation.
#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
#[clap(after_help = "EXAMPLES:
  tursym-cli --machine machines/copy-symbol.tm --normalize
  tursym-cli --builtin single-step --format json
  RUST_LOG=debug tursym-cli --builtin swap-pair")]
struct Cli {
    /// The machine description file (.tm) to transform
    #[clap(short, long, conflicts_with = "builtin")]
    machine: Option<PathBuf>,

    /// The name of a built-in sample machine to transform
    #[clap(short, long)]
    builtin: Option<String>,

    /// List the built-in sample machines and exit
    #[clap(short, long)]
    list: bool,

    /// Wrap the machine with a control tape before symmetrizing
    #[clap(short, long)]
    normalize: bool,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn load(cli: &Cli) -> Result<Machine, Box<dyn Error>> {
    match (&cli.machine, &cli.builtin) {
        (Some(path), _) => Ok(MachineLoader::load_machine(path)?),
        (None, Some(name)) => Ok(MachineCatalog::get_machine_by_name(name)?),
        (None, None) => Err("one of --machine or --builtin is required".into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        for name in MachineCatalog::get_machine_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let machine = load(&cli)?;
    info!(
        tapes = machine.tape_count(),
        commands = machine.commands.len(),
        "loaded machine"
    );

    let result = if cli.normalize {
        normalize_and_symmetrize(&machine)?
    } else {
        symmetrize(&machine)?
    };

    match cli.format {
        Format::Text => print!("{}", encode(&result)),
        Format::Json => println!("{}", to_json(&result)?),
    }

    Ok(())
}
