/*
 *  main.rs
 *
 *  travelboard - worth the squeeze
 *	(c) 2020-26 Stuart Hunter
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use log::{info, error, warn};
use env_logger::Env;
use tokio::time::MissedTickBehavior;

use tokio::signal::unix::{signal, SignalKind};

use travelboard::config::{self, Config};
use travelboard::constants::ICON_FRAME_UNITS;
use travelboard::display::{snapshot, Panel, PanelError, PanelState, TravelForecastPanel};
use travelboard::forecast::{ForecastSource, NwsClient};
use travelboard::mock::MockForecastSource;
use travelboard::pacer::DwellPacer;
use travelboard::svgimage::SvgIconSource;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// One activation: fetch, show, scroll through the dwell schedule.
async fn run_cycle(panel: &mut dyn Panel, snapshot_path: Option<&Path>) -> Result<(), PanelError> {
    panel.activate();
    match panel.get_data().await {
        PanelState::Ready => {}
        state => {
            warn!("{}: nothing to show ({:?}), holding", panel.name(), state);
            panel.deactivate();
            tokio::time::sleep(panel.timing().total_duration()).await;
            return Ok(());
        }
    }

    panel.show_canvas()?;
    let mut pacer = DwellPacer::new(panel.timing());
    let mut interval = tokio::time::interval(pacer.base_delay());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // first tick is immediate

    loop {
        interval.tick().await;
        let more = pacer.drive(panel);
        if pacer.counter() % ICON_FRAME_UNITS == 0 {
            panel.tick();
        }
        if !more {
            break;
        }
    }

    if let Some(path) = snapshot_path {
        snapshot::save_png(panel.canvas(), path)?;
    }
    panel.deactivate();
    Ok(())
}

async fn run<S: ForecastSource>(mut panel: TravelForecastPanel<S>, config: &Config) -> anyhow::Result<()> {
    let panel_cfg = config.panel.clone().unwrap_or_default();
    let cycles = panel_cfg.cycles;

    let shutdown = signal_handler();
    tokio::pin!(shutdown);

    let mut completed = 0u32;
    while cycles.is_none_or(|max| completed < max) {
        tokio::select! {
            res = &mut shutdown => {
                if let Err(e) = res {
                    error!("Signal handler failed: {}", e);
                }
                break;
            }
            res = run_cycle(&mut panel, panel_cfg.snapshot.as_deref()) => {
                if let Err(e) = res {
                    error!("Panel cycle failed: {}", e);
                }
            }
        }
        completed += 1;
    }

    panel.deactivate();
    info!("{} cycles completed, exiting", completed);
    Ok(())
}

#[tokio::main] // Requires the `tokio` runtime with `macros` and `rt-multi-thread` features
async fn main() -> anyhow::Result<()> {
    let config = config::load()?;

    let level = config.log_level.clone().unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();

    info!("This {} worth the Squeeze", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let catalog = config.catalog();
    let icons = Arc::new(SvgIconSource::new(config.icon_folder()));
    let base_delay = Duration::from_millis(config.base_delay_ms());
    info!("{} cities, {} units, {:?} per unit", catalog.len(), config.units(), base_delay);

    if config.demo() {
        info!("Demo mode - canned forecasts, no network");
        let source = MockForecastSource::demo(&catalog);
        let panel = TravelForecastPanel::new(catalog, source, icons)
            .with_units(config.units())
            .with_base_delay(base_delay);
        run(panel, &config).await
    } else {
        let source = NwsClient::new(config.forecast.as_ref())?;
        let panel = TravelForecastPanel::new(catalog, source, icons)
            .with_units(config.units())
            .with_base_delay(base_delay);
        run(panel, &config).await
    }
}
