use log::info;

use microwot_rs::device::{DirStore, ExitRestart, PinBank};
use microwot_rs::{ServerConfig, ServerError, WotServer};

// Pin the "on" property drives.
const LED_PIN: u8 = 8;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ServerError> {
    let config = ServerConfig::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter()))
        .init();

    info!("Starting board...");
    info!("Serving documents from {}", config.document_root.display());

    let store = DirStore::new(&config.document_root);
    let device = config
        .properties
        .iter()
        .enumerate()
        .fold(PinBank::new(), |bank, (offset, name)| {
            bank.with_pin(name.as_str(), LED_PIN.saturating_add(offset as u8), false)
        });

    WotServer::new(config, store, device, ExitRestart::default())
        .run()
        .await
}
