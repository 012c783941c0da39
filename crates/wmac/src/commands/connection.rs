//! Connectivity check.

use owo_colors::OwoColorize;
use wmac_core::ConnectivityResult;

use crate::cli::{ConnectionArgs, ConnectionCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Terminal, util};

pub async fn handle(
    terminal: &Terminal<'_>,
    args: ConnectionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConnectionCommand::Test => {
            let profile = terminal.connect().await?;
            let result = util::with_spinner(
                global,
                "Testing connection",
                terminal.service.test_connection(&profile),
            )
            .await?;

            match result {
                ConnectivityResult::Connected => {
                    let c = &profile.credentials;
                    let message = result.message();
                    let message = if output::should_color(global.color) {
                        message.green().to_string()
                    } else {
                        message.to_owned()
                    };
                    output::print_output(
                        &format!("{}@{}:{}: {message}", c.user, c.host, c.port),
                        global.quiet,
                    );
                    Ok(())
                }
                ConnectivityResult::InvalidAddress => Err(CliError::Validation {
                    field: "host".into(),
                    reason: format!("{}: {}", result.message(), profile.credentials.host),
                }),
                ConnectivityResult::Failed(failure) => Err(CliError::ConnectionFailed {
                    message: result.message().to_owned(),
                    failure,
                }),
            }
        }
    }
}
