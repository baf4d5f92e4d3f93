use clap::Subcommand;

use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::database::ensure_schema;

#[derive(Subcommand)]
pub enum SchemaCommands {
    #[command(about = "Create the catalog tables if they do not exist")]
    Init,
}

pub async fn handle(cmd: SchemaCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        SchemaCommands::Init => {
            let pool = connect().await?;
            ensure_schema(&pool).await?;
            output_success(&output_format, "Schema ready", None)
        }
    }
}
