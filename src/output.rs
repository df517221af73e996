use std::io::{self, Write};

use serde::Serialize;

use crate::app::DashboardData;
use crate::domain::Collection;

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_catalog(catalog: &[Collection]) -> io::Result<()> {
        Self::print_json(&catalog)
    }

    pub fn print_snapshot(data: &DashboardData) -> io::Result<()> {
        Self::print_json(data)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl crate::app::ProgressSink for JsonOutput {
    fn event(&self, _event: crate::app::ProgressEvent) {}
}
