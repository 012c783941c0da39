//! Raw command passthrough.

use wmac_core::CoreError;

use crate::cli::{GlobalOpts, RunArgs};
use crate::error::CliError;
use crate::output;

use super::{Terminal, util};

pub async fn handle(terminal: &Terminal<'_>, args: RunArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let line = args.command.join(" ");
    let profile = terminal.connect().await?;
    let service = &terminal.service;

    let out = if args.raw {
        if !profile.is_complete() {
            return Err(CliError::IncompleteProfile);
        }
        let outcome = util::with_spinner(
            global,
            "Running command",
            service.executor().execute(&profile.credentials, &line),
        )
        .await
        .map_err(CoreError::from)?;
        outcome.into_result().map_err(CoreError::from)?
    } else {
        util::with_spinner(global, "Running command", service.run_raw(&profile, &line)).await?
    };

    output::print_output(out.trim_end(), global.quiet);
    Ok(())
}
