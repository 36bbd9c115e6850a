//! Predict command implementation.

use crate::cli::args::PredictArgs;
use crate::core::models::LotContext;
use crate::core::workflow::PredictionWorkflow;
use crate::error::Result;
use crate::render::{self, PredictionReport};
use crate::storage::ResolvedConfig;

/// Execute the predict command.
pub async fn execute(args: &PredictArgs, config: &ResolvedConfig) -> Result<()> {
    config.prediction.ensure_ready()?;

    let lot = LotContext::from(&args.lot);
    tracing::debug!(inslot = %lot.inslot, format = ?config.format, "Starting prediction");

    let workflow = PredictionWorkflow::from_config(config)?;
    let result = workflow.submit(&lot, &args.fines, &args.bulk).await?;

    let report = PredictionReport::new(&lot, result);
    let output = render::render_prediction(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");
    Ok(())
}
