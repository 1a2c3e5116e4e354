// Embassy framework imports
use embassy_executor::Executor;

// Other external crates
use anyhow::anyhow;
use static_cell::StaticCell;

// Local modules
mod sim;
mod store;

use speedo_core::{NmeaDecoder, Speedometer};

use crate::sim::{LogLink, LogUi, ReplaySerial};
use crate::store::FilePeerStore;

// Constants
const PEERS_FILE: &str = "peers.txt";

type App = Speedometer<ReplaySerial, NmeaDecoder, LogUi, FilePeerStore, LogLink>;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp_millis()
        .init();

    // fail early if the peer store exists but can't be read; absence
    // is fine and means an empty list
    {
        use speedo_traits::PeerStore;
        let mut store = FilePeerStore::new(PEERS_FILE);
        store
            .load()
            .map_err(|e| anyhow!("cannot read {}: {}", PEERS_FILE, e))?;
    }

    let app = Speedometer::new(
        ReplaySerial::from_fixture(),
        NmeaDecoder::new(),
        LogUi::new(),
        FilePeerStore::new(PEERS_FILE),
        LogLink::new(),
    );

    static EXECUTOR: StaticCell<Executor> = StaticCell::new();
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        let result = spawner.spawn(speedometer_task(app));
        if result.is_err() {
            log::warn!("failed to spawn speedometer task");
        }
    });
}

#[embassy_executor::task]
async fn speedometer_task(app: App) {
    app.run().await;
    // the loop only returns on a fault; fail-stop, no supervisor
    std::process::exit(1);
}
