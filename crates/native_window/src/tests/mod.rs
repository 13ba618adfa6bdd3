//! Cross-module scenario tests driving a [`WindowSystem`] through the headless host

mod input_dispatch;
mod threading;

use crate::config::{HeadlessConfig, SystemConfig};
use crate::platform::{HeadlessController, HeadlessPlatform};
use crate::WindowSystem;

/// An initialized system on a headless host with a manual clock
fn headless_system(headless: HeadlessConfig) -> (WindowSystem<HeadlessPlatform>, HeadlessController) {
    let (platform, controller) = HeadlessPlatform::new(&headless.with_manual_clock(true));
    let mut system = WindowSystem::new(platform, SystemConfig::default());
    system.initialize().unwrap();
    (system, controller)
}
