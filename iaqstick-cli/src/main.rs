use clap::Parser;
use iaqstick_lib::IaqStick;
use std::error::Error;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Poll CO2/VOC readings from an iAQ Stick")]
struct Args {
    /// Polling interval in seconds
    #[arg(short, long, default_value_t = 10)]
    interval: u64,

    /// Number of readings to take (default: until interrupted)
    #[arg(short, long)]
    count: Option<u64>,

    /// Print readings as JSON records
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let mut stick = IaqStick::new().await?;
    info!("connected to iAQ Stick");

    let mut timer = interval(Duration::from_secs(args.interval.max(1)));
    let mut taken = 0u64;

    loop {
        tokio::select! {
            _ = timer.tick() => {
                stick.update().await;
                match stick.last_measurement() {
                    Some(m) if args.json => println!("{}", serde_json::to_string(m)?),
                    Some(m) => println!("{m}"),
                    None => warn!("no valid reading yet"),
                }
                taken += 1;
                if args.count.is_some_and(|count| taken >= count) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }

    stick.stop().await;
    Ok(())
}
