// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `raad ask` command implementation.

use raad_config::RaadConfig;
use raad_core::RaadError;

use crate::app::App;
use crate::shell::print_reply;

/// Runs one turn on a throwaway session and prints the answer to stdout.
pub async fn run_ask(
    config: RaadConfig,
    dataset: Option<&str>,
    question: &str,
) -> Result<(), RaadError> {
    let app = App::new(config)?;
    app.load_data()?;

    let mut session = app.session();
    if let Some(dataset) = dataset {
        session.select_dataset(dataset)?;
    }
    let reply = session.ask(question).await?;
    print_reply(&reply, false);
    Ok(())
}
