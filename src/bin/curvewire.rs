//! Command-line front end.
//!
//! ```text
//! curvewire <function> <start> <end> <points> [order]
//! ```
//!
//! `<function>` is a wire name such as `"Sine integral"` or its index 0-4.
//! Points go to stdout as `x<TAB>y` lines; logs go to stderr
//! (`RUST_LOG=debug` for frame-level detail). Set `CURVEWIRE_CONFIG` to a
//! JSON config file to override the pipe name and limits.

use std::process::ExitCode;

use curvewire_client::{Client, ClientConfig, CurvewireError, FunctionKind, RequestForm};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: curvewire <function> <start> <end> <points> [order]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CurvewireError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if !(4..=5).contains(&args.len()) {
        let names: Vec<_> = FunctionKind::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| format!("  {} = {}", i, k))
            .collect();
        return Err(CurvewireError::InvalidParameters(format!(
            "{}\nfunctions:\n{}",
            USAGE,
            names.join("\n")
        )));
    }

    let form = RequestForm {
        function: args[0].clone(),
        range_start: args[1].clone(),
        range_end: args[2].clone(),
        num_points: args[3].clone(),
        order: args.get(4).cloned().unwrap_or_default(),
    };
    let request = form.parse()?;

    let config = match std::env::var_os("CURVEWIRE_CONFIG") {
        Some(path) => ClientConfig::from_json_file(path)?,
        None => ClientConfig::default(),
    };

    let mut client = Client::connect(&config).await?;
    let result = client.compute(&request).await;
    if let Err(e) = client.disconnect().await {
        tracing::warn!("Disconnect failed: {}", e);
    }

    let reply = result?;
    if reply.frame.is_curve() {
        tracing::info!("{}: {} points", reply.label(), reply.frame.points().len());
        for (x, y) in reply.frame.points() {
            println!("{}\t{}", x, y);
        }
    } else {
        eprintln!("{}", reply.frame.tag());
    }
    Ok(())
}
