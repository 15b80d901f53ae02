//! Configuration management commands.

use netdiag_core::Config;

use crate::{AppContext, ConfigAction};

pub fn handle(action: ConfigAction, ctx: &AppContext) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# Effective configuration");
            print!("{}", ctx.config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", Config::config_file().display());
        }
    }
    Ok(())
}
