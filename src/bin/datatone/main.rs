//! datatone - play a day of readings through the default audio output
//!
//! Run with: cargo run --bin datatone [seed]

mod app;

use app::Player;
use color_eyre::eyre::WrapErr;
use datatone::{
    effects::{MetricsConfig, SeriesMetrics},
    wavetable::SampleSeries,
    EngineConfig,
};

/// A synthetic day: 288 five-minute readings with a slow daily swing,
/// two meal spikes and a little sensor noise.
fn demo_day() -> Vec<f64> {
    (0..288)
        .map(|i| {
            let t = i as f64 / 288.0;
            let daily = 25.0 * (std::f64::consts::TAU * t).sin();
            let spike = |center: f64| 70.0 * (-((t - center) / 0.03).powi(2)).exp();
            let noise = 6.0 * ((i * 7919 % 113) as f64 / 113.0 - 0.5);
            110.0 + daily + spike(0.35) + spike(0.75) + noise
        })
        .collect()
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg.parse().wrap_err_with(|| format!("seed {arg:?} is not a number"))?,
        None => 7,
    };

    let values = demo_day();
    let metrics = SeriesMetrics::from_values(&values, &MetricsConfig::default());
    let series = SampleSeries::new("demo day", values);

    Player::new(EngineConfig::default().with_user_volume(0.6))
        .layer(series)
        .randomize(metrics, seed)
        .arpeggio(&["C3", "G3", "C4", "D#4", "G4", "A#4"])
        .run()
}
