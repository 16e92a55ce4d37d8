use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::runtime;

use game_coordinator::{
    setup_tracing, verbosity_directive, AppError, AppResult, Coordinator, CoordinatorConfig,
    GameServiceClient,
};

#[derive(Parser)]
#[command(version, about)]
pub struct CommandLine {
    /// path to config file
    #[arg(short, long, default_value = "conf.toml")]
    pub conf: PathBuf,
    #[command(subcommand)]
    pub command: Option<Command>,
    /// log level (v: info, vv: debug, vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the service (default)
    Serve,
    /// Print the effective configuration as JSON
    PrintConfig,
    /// Send one request object to a running service and print the reply
    Call {
        /// request object, e.g. '{"task":"get_games_for_room","room_id":"r-1"}'
        request: String,
        /// service address, defaults to the configured port on localhost
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() -> AppResult<()> {
    let commandline = CommandLine::parse();
    let _guard = setup_tracing(verbosity_directive(commandline.verbose))?;

    let config = if commandline.conf.exists() {
        CoordinatorConfig::set_up_config(&commandline.conf)?
    } else {
        tracing::warn!(
            "config file {} not found, using defaults",
            commandline.conf.display()
        );
        CoordinatorConfig::default()
    };

    match commandline.command.unwrap_or(Command::Serve) {
        Command::Serve => Coordinator::new(Arc::new(config)).start(),
        Command::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Call { request, addr } => {
            let request: serde_json::Value = serde_json::from_str(&request)
                .map_err(|e| AppError::InvalidValue(format!("request is not json: {e}")))?;
            let addr = addr.unwrap_or_else(|| format!("127.0.0.1:{}", config.network.port));
            let client = GameServiceClient::new(addr).with_timeouts(
                config.network.read_timeout(),
                config.network.write_timeout(),
            );
            let rt = runtime::Builder::new_current_thread().enable_all().build()?;
            let reply = rt.block_on(client.call(&request))?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
            Ok(())
        }
    }
}
