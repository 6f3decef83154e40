//! Format a duration.

use runtimer_run_model::style::TimeFormat;
use runtimer_timing_core::format::format_time;

pub fn run(seconds: f64, format: Option<TimeFormat>) -> anyhow::Result<()> {
    match format {
        Some(format) => println!("{}", format_time(seconds, format)),
        None => {
            for format in TimeFormat::ALL {
                println!("{:<12} {}", format.key(), format_time(seconds, format));
            }
        }
    }
    Ok(())
}
