//! Command-line argument definitions for `warden`.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand};

/// Validate British National Grid references and Warden tiles.
#[derive(Parser, Debug)]
#[command(name = "warden")]
#[command(version, about)]
#[command(long_about = concat!(
    "Validate British National Grid references and Warden tiles.\n\n",
    "Values are checked with the bngcentrepoint datatype using the settings in ",
    "warden.toml from the current directory, or the file named by --config. ",
    "Failure messages follow --locale, then WARDEN_LOCALE, then the configured ",
    "locale, falling back to en-GB.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Validate grid references:\n",
    "    $ warden validate SU1025169962 NT2700073000\n\n",
    "  Show the centre of a grid square as GeoJSON:\n",
    "    $ warden centre --json SU1025169962\n\n",
    "  Validate a tile against a resource model:\n",
    "    $ warden check-tile --model model.json --tile tile.json\n\n",
    "  List the registered datatypes and widgets:\n",
    "    $ warden list --plugins ./plugins\n\n",
    "EXIT STATUS:\n",
    "  0  every value is valid\n",
    "  1  at least one value failed validation\n",
    "  2  usage, configuration or I/O error",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file [default: ./warden.toml when present].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Locale for failure messages, such as `en-GB` or `cy`.
    #[arg(long, global = true, value_name = "TAG")]
    pub locale: Option<String>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate one or more grid references.
    Validate(ValidateArgs),

    /// Print the centre point of a grid reference.
    Centre(CentreArgs),

    /// Validate a tile document against a resource model.
    CheckTile(CheckTileArgs),

    /// List registered datatypes and widgets.
    List(ListArgs),
}

/// Arguments for the validate command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Grid references to validate.
    #[arg(required = true, value_name = "VALUE")]
    pub values: Vec<String>,
}

/// Arguments for the centre command.
#[derive(Args, Debug, Clone)]
pub struct CentreArgs {
    /// Print a GeoJSON point instead of plain coordinates.
    #[arg(long)]
    pub json: bool,

    /// Grid reference to locate.
    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Arguments for the check-tile command.
#[derive(Args, Debug, Clone)]
pub struct CheckTileArgs {
    /// Resource model JSON document.
    #[arg(long, value_name = "FILE")]
    pub model: Utf8PathBuf,

    /// Tile JSON document.
    #[arg(long, value_name = "FILE")]
    pub tile: Utf8PathBuf,

    /// Plugin directory with `widgets/` and `datatypes/` definitions
    /// [default: bundled plugins].
    #[arg(long, value_name = "DIR")]
    pub plugins: Option<Utf8PathBuf>,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,

    /// Plugin directory with `widgets/` and `datatypes/` definitions
    /// [default: bundled plugins].
    #[arg(long, value_name = "DIR")]
    pub plugins: Option<Utf8PathBuf>,
}
