use colored::Colorize;
use std::io::{self, Write};
use std::time::Instant;

/// One-line status for a slow step, e.g. running the plan or calling the model.
pub struct Spinner {
    enabled: bool,
    message: String,
    start_time: Instant,
}

impl Spinner {
    pub fn new(enabled: bool, message: &str) -> Self {
        let spinner = Self {
            enabled,
            message: message.to_string(),
            start_time: Instant::now(),
        };

        if enabled {
            eprint!("{}", format!("{}...", message).bright_black());
            io::stderr().flush().unwrap_or(());
        }

        spinner
    }

    pub fn succeed(self) {
        if self.enabled {
            let elapsed = self.start_time.elapsed();
            eprintln!(
                "\r{}",
                format!("{}... done in {:.1}s", self.message, elapsed.as_secs_f64()).bright_black()
            );
        }
    }

    pub fn fail(self) {
        if self.enabled {
            eprintln!("\r{}", format!("{}... failed", self.message).red());
        }
    }
}

/// Plain status line with no completion marker.
pub fn note(enabled: bool, message: &str) {
    if enabled {
        eprintln!("{}", message.bright_black());
    }
}
