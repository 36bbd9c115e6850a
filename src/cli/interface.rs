//! Interface command implementation.

use crate::cli::args::LotArgs;
use crate::core::models::LotContext;
use crate::core::workflow::PredictionWorkflow;
use crate::error::Result;
use crate::render::{self, InterfaceReport};
use crate::storage::ResolvedConfig;

/// Execute the interface command.
pub async fn execute(args: &LotArgs, config: &ResolvedConfig) -> Result<()> {
    config.interface.ensure_ready()?;

    let lot = LotContext::from(args);
    tracing::debug!(inslot = %lot.inslot, "Starting interface trigger");

    let workflow = PredictionWorkflow::from_config(config)?;
    let payload = workflow.trigger_interface(&lot).await?;

    let report = InterfaceReport::new(&lot, payload);
    let output = render::render_interface(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");
    Ok(())
}
