//! Command dispatch: bridges CLI args -> `FilterSyncService` -> output formatting.

pub mod config_cmd;
pub mod connection;
pub mod devices;
pub mod gateway;
pub mod run;
pub mod util;

use wmac_config::Profile;
use wmac_core::{ConnectionProfile, FilterSyncService, RemoteSession};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// A configured terminal: the sync service plus the profile it came from.
///
/// Host and password are only resolved by [`Terminal::connect`], so
/// registry-only commands never detect the gateway or prompt.
pub struct Terminal<'a> {
    pub service: FilterSyncService<RemoteSession>,
    profile_name: String,
    profile: Profile,
    global: &'a GlobalOpts,
}

impl<'a> Terminal<'a> {
    pub fn open(global: &'a GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load(global)?;
        let (profile_name, profile) = config::active_profile(&cfg, global)?;
        let service = config::build_service(&cfg, &profile, global);
        Ok(Self {
            service,
            profile_name,
            profile,
            global,
        })
    }

    pub async fn connect(&self) -> Result<ConnectionProfile, CliError> {
        config::connection_profile(&self.profile_name, &self.profile, self.global).await
    }
}

pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let global = &cli.global;
    match cli.command {
        Command::Config(args) => config_cmd::handle(args, global).await,
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "wmac", &mut std::io::stdout());
            Ok(())
        }
        Command::Gateway => gateway::handle(global).await,
        Command::Devices(args) => devices::handle(&Terminal::open(global)?, args, global).await,
        Command::Run(args) => run::handle(&Terminal::open(global)?, args, global).await,
        Command::Connection(args) => {
            connection::handle(&Terminal::open(global)?, args, global).await
        }
    }
}
