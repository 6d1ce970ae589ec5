//! t00-SimpleWindow - Main Entry Point
//!
//! Opens a window on the UglyEngine host and exits when Escape is released.

use tracing::{error, info};

use ugly_core::LogConfig;
use ugly_host::{Application, ButtonAction, Context, Host, HostConfig, KeyCode};

/// Name of the button that stops the program.
const QUIT_BUTTON: &str = "quit";

struct SimpleWindow;

impl Application for SimpleWindow {
    fn name(&self) -> &str {
        "t00-SimpleWindow"
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        ctx.create_button(QUIT_BUTTON);
        ctx.bind_key_to_button(KeyCode::Escape, QUIT_BUTTON);
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) {
        if ctx.button_action(QUIT_BUTTON) == ButtonAction::Released {
            info!("Quit requested");
            ctx.quit();
        }
    }
}

fn main() {
    // Keep the guard alive so the log file is flushed on exit
    let log_guard = ugly_core::init_logging(&LogConfig::default());

    let mut host = Host::new(HostConfig::default());
    let code = match host.run(Some(Box::new(SimpleWindow))) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            e.exit_code()
        }
    };

    drop(log_guard);
    std::process::exit(code);
}
