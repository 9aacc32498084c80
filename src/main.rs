mod demo;
use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*};
use tabulated::consts::DEMO_CONFIG;
use mimalloc::MiMalloc;
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(DEMO_CONFIG.log_level)
        .with(fmt::layer()
            .without_time()
            .with_target(false)
            .with_thread_names(false))
        .try_init()?;
    Ok(())
}
fn main() -> Result<()> {
    init_logging()?;
    tracing::info!("demo_config: {:?}", *DEMO_CONFIG);
    demo::run(&DEMO_CONFIG)
}
