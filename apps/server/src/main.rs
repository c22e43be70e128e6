use anyhow::Context;
use folio::domain::config::ApiConfig;
use folio::kernel::config::load_config;
use folio_logger::Logger;
use folio_server::Server;

#[cfg(feature = "profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

#[folio_runtime::main(server)]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).init()?;

    // An explicit path must exist; otherwise `server.*` is optional.
    let cfg: ApiConfig =
        load_config(std::env::args().nth(1)).context("Critical: Configuration is malformed")?;

    Server::builder().config(cfg).build().await?.run().await
}
