//! Config command: show resolved settings with secrets masked.

use crate::error::Result;
use crate::render::{self, ConfigReport};
use crate::storage::ResolvedConfig;

/// Execute the config command.
///
/// Never fails because a service is not ready; readiness is part of the report.
pub fn execute(config: &ResolvedConfig) -> Result<()> {
    let report = ConfigReport::from(config);
    for service in report.services.iter().filter(|s| !s.ready) {
        tracing::warn!(service = %service.service, missing = ?service.missing, "Service not configured");
    }
    let output = render::render_config(&report, config.format, config.pretty, config.no_color)?;
    println!("{output}");
    Ok(())
}
