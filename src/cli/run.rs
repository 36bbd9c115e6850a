//! Run command: predict, then trigger the interface, in one session.

use crate::cli::args::PredictArgs;
use crate::core::models::LotContext;
use crate::core::workflow::PredictionWorkflow;
use crate::error::Result;
use crate::render::{self, InterfaceReport, PredictionReport, RunReport};
use crate::storage::ResolvedConfig;

/// Execute the run command.
///
/// The interface is only triggered once a prediction has succeeded.
pub async fn execute(args: &PredictArgs, config: &ResolvedConfig) -> Result<()> {
    config.prediction.ensure_ready()?;
    config.interface.ensure_ready()?;

    let lot = LotContext::from(&args.lot);
    let workflow = PredictionWorkflow::from_config(config)?;

    let result = workflow.submit(&lot, &args.fines, &args.bulk).await?;
    let payload = workflow.trigger_interface(&lot).await?;
    tracing::debug!(
        inslot = %lot.inslot,
        prediction = %workflow.prediction_status(),
        interface = %workflow.interface_status(),
        "Run finished"
    );

    let report = RunReport {
        prediction: PredictionReport::new(&lot, result),
        interface: InterfaceReport::new(&lot, payload),
    };
    let output = render::render_run(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");
    workflow.logout();
    Ok(())
}
