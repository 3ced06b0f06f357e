use anyhow::Result;
use trashcleaner::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
