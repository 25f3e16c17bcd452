//! Film thickness calculator command-line front end.
//!
//! ```sh
//! thickness calculate --binding 226.0 --film-material MoS2 --substrate-material MoS2 \
//!     --film-orbital Mo3d --substrate-orbital Mo3d --n-film 1 --n-substrate 1 \
//!     --i-film 100 --i-substrate 100
//! thickness add-material WS2 7.5 247.97
//! thickness orbitals
//! ```

mod commands;

use clap::Parser;
use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    commands::run(cli, &mut stdout.lock())
}
