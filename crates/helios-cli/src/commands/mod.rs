use anyhow::Result;

use crate::cli::Commands;

pub mod ensemble;
pub mod lcoe;

pub fn handle(command: &Commands) -> Result<()> {
    match command {
        Commands::Lcoe(args) => lcoe::handle(args),
        Commands::Ensemble(args) => ensemble::handle(args),
    }
}
