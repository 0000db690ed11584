mod cli;
mod config;
mod error;
mod fetch;
mod layout;
mod merge;
mod range;
mod request;
mod response;
mod sync;
mod table;

use std::process;

use clap::Parser;
use cli::{command, init_logging, Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Weather { range, api } => command::weather(range, api).await,
        Commands::Marine { range, api } => command::marine(range, api).await,
        Commands::Stations {
            network,
            stations,
            api,
        } => command::stations(*network, stations, api).await,
        Commands::Merge { dataset, data_dir } => command::merge(*dataset, data_dir),
        Commands::Sync {
            data_dir,
            checksum,
            storage,
        } => command::sync(data_dir, *checksum, storage).await,
    };

    match result {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
