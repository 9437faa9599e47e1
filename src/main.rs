use std::io;
use tracing::{info, warn};
use wavekit::{init_logging, Config, Console, SystemClipboard, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!("WaveKit {} (built {})", VERSION, BUILD_DATE);

    let config = Config::load_or_default().unwrap_or_else(|e| {
        warn!("Ignoring configuration: {}", e);
        Config::default()
    });

    let mut console = Console::new(config.editor_settings(), SystemClipboard::new());
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    console.run(&mut input, &mut output)?;

    Ok(())
}
