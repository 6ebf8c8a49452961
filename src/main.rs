use anyhow::Result;
use locplot::cli::Cli;
use locplot::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.execute()
}
