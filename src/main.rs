use anyhow::{bail, Result};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

fn main() -> Result<()> {
    init_tracing();

    // Parse arguments
    let args = std::env::args().collect::<Vec<_>>();
    match args.len() {
        0 | 1 => bail!("Missing <database path> and <command>"),
        2 => bail!("Missing <command>"),
        _ => {}
    }

    // Parse command and act accordingly
    let path = commands::resolve_table(&args[1])?;
    let command = &args[2];
    match command.as_str() {
        ".dbinfo" => commands::dbinfo(&path)?,
        ".fields" => commands::fields(&path)?,
        ".dump" => commands::dump(&path)?,
        ".find" => match &args[3..] {
            [field, value] => commands::find(&path, field, value)?,
            _ => bail!("Usage: .find <field> <value>"),
        },
        _ => bail!("Missing or invalid command passed: {}", command),
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
