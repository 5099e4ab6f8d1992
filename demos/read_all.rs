use octosonar::{rpi, OctosonarConfig, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::{env, thread};

fn main() -> Result<()> {
    env_logger::init();

    let int_gpio = env::args()
        .nth(1)
        .and_then(|s| s.parse::<u8>().ok())
        .unwrap_or(25);

    println!("Opening Octosonar on I2C bus 1, INT on GPIO {}...", int_gpio);
    let mut sonar = match rpi::setup(OctosonarConfig::new(1, int_gpio)) {
        Ok(sonar) => sonar,
        Err(e) => {
            eprintln!("Error opening Octosonar: {}", e);
            eprintln!("Ensure I2C is enabled and the user may access /dev/i2c-1 and /dev/gpiomem.");
            return Err(e);
        }
    };
    println!("Echo timeout {:?}. Press Enter to stop.", sonar.timeout());

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut line = String::new();
            let _ = std::io::stdin().read_line(&mut line);
            running.store(false, Ordering::Relaxed);
        });
    }

    while running.load(Ordering::Relaxed) {
        let results: Vec<String> = sonar
            .sweep_cm()?
            .iter()
            .map(|d| match d {
                Some(cm) => format!("{:.1}", cm),
                None => "Timed out".to_string(),
            })
            .collect();
        println!("{:?}", results);
    }

    println!("Cleaning up and exiting.");
    sonar.cancel()
}
