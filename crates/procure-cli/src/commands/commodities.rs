//! Commodities command - list the commodity-group vocabulary.

use clap::Args;

use procure_core::models::commodity::{self, COMMODITY_GROUPS};

/// Arguments for the commodities command.
#[derive(Args)]
pub struct CommoditiesArgs {
    /// Sort alphabetically, as shown in selection lists
    #[arg(long)]
    sorted: bool,
}

pub async fn run(args: CommoditiesArgs) -> anyhow::Result<()> {
    let groups = if args.sorted {
        commodity::sorted()
    } else {
        COMMODITY_GROUPS.to_vec()
    };

    for group in groups {
        println!("{}", group);
    }

    Ok(())
}
