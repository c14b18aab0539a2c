// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `strig log` - Show the last poll log of a job

use anyhow::Result;
use clap::Args;
use std::path::Path;
use strig_storage::{read_log, DataLayout};

#[derive(Args)]
pub struct LogArgs {
    /// Job whose poll log to show
    pub job: String,
}

pub fn handle(args: LogArgs, config: &Path) -> Result<()> {
    let settings = crate::settings::load(config)?;
    let job = crate::settings::job(&settings, &args.job)?;
    let path = DataLayout::new(&settings.server.data_dir)
        .poll_log(&job.name, job.trigger.log_file_name());

    match read_log(&path)? {
        Some(contents) => print!("{}", contents),
        None => println!("No polling log for job {} yet", job.name),
    }
    Ok(())
}
