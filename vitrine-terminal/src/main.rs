/// Vitrine Terminal - Showroom Demo
///
/// Renders the floor, bookshelf and perfume bottle as colored ASCII.
/// Usage: `vitrine-terminal [config.toml]`
/// Controls:
///   - Mouse drag / Arrow Keys: Orbit the camera
///   - Wheel / +/-: Zoom
///   - Space: Start or stop the bottle animation
///   - Q/ESC: Quit

use std::error::Error;
use vitrine_core::SceneConfig;
use vitrine_terminal::TerminalApp;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading scene configuration from {}", path);
            SceneConfig::load(&path)?
        }
        None => SceneConfig::default(),
    };

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Thank you for visiting Vitrine!");
    Ok(())
}
