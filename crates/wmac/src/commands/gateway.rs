//! Default gateway lookup.

use wmac_core::detect_gateway;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let gateway = detect_gateway().await.ok_or(CliError::NoGateway)?;
    output::print_output(&gateway, global.quiet);
    Ok(())
}
