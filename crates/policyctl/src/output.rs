use serde::Serialize;
use std::io::{self, Write};

#[derive(clap::Args, Clone, Debug, Default)]
pub struct Output {
    /// How to format CLI output
    #[clap(global = true, short, long, value_enum)]
    pub output: Option<OutputType>,
}

#[derive(clap::ValueEnum, Debug, Copy, Clone, PartialEq, Default)]
pub enum OutputType {
    /// Format output as compact JSON, terminated by a newline
    Json,
    /// Format output as YAML
    #[default]
    Yaml,
}

impl Output {
    pub fn print(&self, item: &impl Serialize) -> anyhow::Result<()> {
        write(&mut io::stdout().lock(), self.output.unwrap_or_default(), item)
    }
}

pub fn write<W: Write>(w: &mut W, ty: OutputType, item: &impl Serialize) -> anyhow::Result<()> {
    match ty {
        OutputType::Json => serde_json::to_writer(&mut *w, item)?,
        OutputType::Yaml => serde_yaml::to_writer(&mut *w, item)?,
    }
    w.write_all(b"\n")?;
    Ok(())
}
