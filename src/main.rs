use std::process::ExitCode;

use dotenv::dotenv;
use log::debug;

use large_values_check::report::renderer_for;
use large_values_check::{build_client, finish_run, run_smoke_test, Constants, NodeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenv().ok();
    env_logger::init();

    let constants = Constants::large_values()?;
    debug!(
        "all_tokens={} deposit={} change={} max_output={}",
        constants.all_tokens,
        constants.deposit_amount,
        constants.change_amount,
        constants.max_output_value
    );

    let config = NodeConfig::from_env()?;
    let client = build_client(&config)?;
    let mut renderer = renderer_for(config.report_format);

    let outcome = run_smoke_test(&client, &config, &constants, renderer.as_mut()).await;
    if finish_run(renderer.as_mut(), outcome)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
