use clap::Parser;
use promptcanvas::{
    app,
    cli::Cli,
    logger::{self, LoggerConfig},
    Config,
};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let env_loaded = dotenv::dotenv().is_ok();

    let logger_config = if cli.verbose {
        LoggerConfig::verbose()
    } else {
        LoggerConfig::default()
    };
    if let Err(e) = logger::init_with_config(logger_config.with_json_output(cli.json_logs)) {
        eprintln!("{}", e);
    }
    if !env_loaded {
        log::debug!("No .env file found, using process environment");
    }

    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("{}", app::report_error(&e));
            return ExitCode::FAILURE;
        }
    };
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);

    let result = app::run(config, cli.prompt.as_deref(), cli.list_models).await;
    match &result {
        Ok(outcome) => log::debug!("Run finished: {:?}", outcome),
        Err(e) => eprintln!("{}", app::report_error(e)),
    }

    ExitCode::from(app::exit_status(&result))
}
