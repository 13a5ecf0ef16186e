// PixelSynth host.
// • Live camera feeds one effect, chosen below at build time.
// • Mouse X/Y drive the effect's two controls.
// • S / Save: PNG snapshot. H / Help: controls overlay. E / Exit: notify
//   the companion server and close.

mod app;
mod camera;
mod config;
mod control;
mod draw;
mod effect;
mod effects;
mod error;
mod host;
mod lifecycle;
mod logging;
mod overlay;
mod shutdown;
mod snapshot;
mod types;
mod window;

use config::HostConfig;
use effects::{
    CircleHalftone, CrossHatch, EffectKind, LineHalftone, Pixelate, RgbSplit, RgbSplitGrid, SlitScan,
};
use error::Error;
use log::{debug, info};

const SELECTED_EFFECT: EffectKind = EffectKind::Pixelate;

fn main() -> Result<(), Error> {
    logging::init_logger();

    for kind in EffectKind::ALL {
        debug!("built with: {} - {}", kind.name(), kind.description());
    }
    info!("PixelSynth: {} - {}", SELECTED_EFFECT.name(), SELECTED_EFFECT.description());

    let config = HostConfig::default();
    match SELECTED_EFFECT {
        EffectKind::RgbSplit => app::run(config, RgbSplit),
        EffectKind::SlitScan => app::run(config, SlitScan),
        EffectKind::Pixelate => app::run(config, Pixelate),
        EffectKind::CircleHalftone => app::run(config, CircleHalftone),
        EffectKind::LineHalftone => app::run(config, LineHalftone),
        EffectKind::CrossHatch => app::run(config, CrossHatch),
        EffectKind::RgbSplitGrid => app::run(config, RgbSplitGrid),
    }
}
