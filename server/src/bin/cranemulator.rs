//! Synthetic crane for exercising the installation without hardware.
//!
//! Sends a report with a random primary color at a fixed period, sweeping
//! the launch position across 0..1.
//!
//! Usage: cargo run --bin cranemulator -- [OPTIONS]
//!
//! Options:
//!   --addr ADDR      Installation UDP address (default: 127.0.0.1:8000)
//!   --seconds S      Seconds between reports (default: 1)
//!   --steps N        Position increment in percent (default: 5)
//!   --id ID          Crane id (default: 1)
//!   --seed N         Seed the color choice for a reproducible run
//!   --quiet          Don't print the reports

use crane_shared::report::CraneReport;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::net::UdpSocket;

const PRIMARIES: [[f64; 3]; 3] = [[255.0, 0.0, 0.0], [0.0, 255.0, 0.0], [0.0, 0.0, 255.0]];

struct Options {
    addr: String,
    seconds: f64,
    steps: u32,
    id: String,
    seed: Option<u64>,
    quiet: bool,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut options = Options {
            addr: "127.0.0.1:8000".to_string(),
            seconds: 1.0,
            steps: 5,
            id: "1".to_string(),
            seed: None,
            quiet: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--addr" => {
                    i += 1;
                    options.addr = args.get(i).cloned().unwrap_or(options.addr);
                }
                "--seconds" => {
                    i += 1;
                    options.seconds = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(1.0);
                }
                "--steps" => {
                    i += 1;
                    options.steps = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(5);
                }
                "--id" => {
                    i += 1;
                    options.id = args.get(i).cloned().unwrap_or(options.id);
                }
                "--seed" => {
                    i += 1;
                    options.seed = args.get(i).and_then(|s| s.parse().ok());
                }
                "--quiet" => options.quiet = true,
                "--help" | "-h" => {
                    println!("Usage: cranemulator [--addr ADDR] [--seconds S] [--steps N] [--id ID] [--seed N] [--quiet]");
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {}", other);
                    std::process::exit(2);
                }
            }
            i += 1;
        }

        if !options.seconds.is_finite() || options.seconds < 0.0 {
            options.seconds = 1.0;
        }
        options
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let options = Options::from_args();

    let mut rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(socket) => socket,
        Err(e) => {
            tracing::error!("Failed to open socket: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Crane {:?} reporting to {} every {}s",
        options.id,
        options.addr,
        options.seconds
    );

    let mut interval = tokio::time::interval(Duration::from_secs_f64(options.seconds.max(0.001)));
    let mut percent: u32 = 0;
    loop {
        interval.tick().await;

        let rgb = PRIMARIES.choose(&mut rng).copied().unwrap_or(PRIMARIES[0]);
        let report = CraneReport {
            sender_id: options.id.clone(),
            rgb,
            luminance: 0.5,
            position: percent as f64 / 100.0,
        };
        let line = report.encode();
        if let Err(e) = socket.send_to(line.as_bytes(), &options.addr).await {
            tracing::warn!("Send to {} failed: {}", options.addr, e);
        }
        if !options.quiet {
            println!("{}", line);
        }

        percent = (percent + options.steps % 100) % 100;
    }
}
