mod interpreter;
mod logging;
mod reader;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "cumunisp", version, about = "A small Lisp with S-Expressions and Q-Expressions")]
pub struct Args {
    /// Evaluate EXPR and exit instead of starting the REPL. May be given several times; all share one environment
    #[arg(short, long = "eval", value_name = "EXPR")]
    pub eval: Vec<String>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// History file of the REPL [default: $HOME/.cumunisp_history]
    #[arg(long, env = "CUMUNISP_HISTORY", value_name = "PATH")]
    pub history: Option<PathBuf>,

    /// Directory of the rolling log file [default: the system temp dir]
    #[arg(long, env = "CUMUNISP_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `cumunisp::interpreter=trace`
    #[arg(long, env = "CUMUNISP_LOG", default_value = "info", value_name = "FILTER")]
    pub log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let _guard = match logging::init(args.log_dir.as_deref(), &args.log_level) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("cumunisp: cannot set up logging: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("cumunisp {} starting", env!("CARGO_PKG_VERSION"));

    let output = if args.json { repl::Output::Json } else { repl::Output::Text };
    let result = match args.eval.is_empty() {
        true => repl::run(args.history.clone(), output),
        false => repl::run_batch(&args.eval, output),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            eprintln!("cumunisp: {}", e);
            ExitCode::FAILURE
        }
    }
}
