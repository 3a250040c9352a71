use orrery::config::OrreryConfig;
use orrery::engine::Engine;

const CONFIG_PATH: &str = "config/orrery.json";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("=== Orrery starting ===");
    let config = OrreryConfig::load_or_default(CONFIG_PATH);
    let engine = Engine::new(config)?;
    engine.run()?;
    log::info!("Engine shutdown complete.");
    Ok(())
}
