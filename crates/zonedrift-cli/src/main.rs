//! zonedrift - detect abandoned DNS delegations before someone else does.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    zonedrift_cli::run().await
}
