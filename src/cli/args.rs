//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::core::models::LotContext;

/// Sand prediction client - submit lot measurements and trigger the interface.
#[derive(Parser, Debug)]
#[command(name = "sandcalc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    // === Global flags ===
    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Prediction service base URL
    #[arg(long, value_name = "URL", global = true)]
    pub predict_endpoint: Option<String>,

    /// Interface service base URL
    #[arg(long, value_name = "URL", global = true)]
    pub interface_endpoint: Option<String>,

    /// Log level
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Emit JSONL logs to stderr
    #[arg(long, global = true)]
    pub json_output: bool,

    /// Verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Output format given on the command line, if any.
    #[must_use]
    pub fn requested_format(&self) -> Option<OutputFormat> {
        if self.json {
            Some(OutputFormat::Json)
        } else {
            self.format
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit fines/bulk measurements for a lot and show the prediction
    Predict(PredictArgs),

    /// Trigger the physical-data interface for a lot
    Interface(LotArgs),

    /// Predict, then trigger the interface, in one session
    Run(PredictArgs),

    /// Show the resolved configuration (secrets masked)
    Config,
}

/// Identifying fields of a lot.
#[derive(Args, Debug, Clone)]
pub struct LotArgs {
    /// Inspection lot number
    #[arg(long)]
    pub inslot: String,

    /// Batch number
    #[arg(long)]
    pub batch: String,

    /// Plant code
    #[arg(long)]
    pub plant: String,

    /// Material code
    #[arg(long)]
    pub material: String,

    /// Operation number
    #[arg(long)]
    pub operationno: String,

    /// Vendor code
    #[arg(long, default_value = "")]
    pub vendor: String,

    /// Receive date, YYYY.MM.DD
    #[arg(long, value_name = "DATE", default_value = "")]
    pub date_receive: String,

    /// Queue number
    #[arg(long, default_value = "")]
    pub queue: String,
}

impl From<&LotArgs> for LotContext {
    fn from(args: &LotArgs) -> Self {
        Self {
            queue: args.queue.clone(),
            date_receive: args.date_receive.clone(),
            inslot: args.inslot.clone(),
            batch: args.batch.clone(),
            plant: args.plant.clone(),
            material: args.material.clone(),
            vendor: args.vendor.clone(),
            operationno: args.operationno.clone(),
        }
    }
}

/// Arguments for `predict` and `run`.
#[derive(Args, Debug, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub lot: LotArgs,

    /// Fines measurement
    #[arg(long, allow_hyphen_values = true)]
    pub fines: String,

    /// Bulk measurement
    #[arg(long, allow_hyphen_values = true)]
    pub bulk: String,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    #[default]
    Human,
    /// JSON output
    Json,
}
