//! Headless demo application
//!
//! Drives the window system through a scripted session on the headless host:
//! a window is opened, the "user" types, clicks and scrolls, presses Escape,
//! and the loop exits once the close flag is set.
//!
//! Usage: `headless_demo [system.toml|system.ron] [headless.toml|headless.ron]`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use native_window::config::ConfigError;
use native_window::input::KeyboardLayout;
use native_window::prelude::*;

/// Scancode the headless host reports for Escape
const SCANCODE_ESCAPE: u16 = 0x35;
const SCANCODE_W: u16 = 0x0D;

/// Frames after which the scripted user gives up and closes the window
const MAX_FRAMES: u64 = 600;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn load_or_default<C: Config>(path: Option<String>) -> Result<C, ConfigError> {
    match path {
        Some(path) => {
            log::info!("Loading configuration from {path}");
            C::load_from_file(&path)
        }
        None => Ok(C::default()),
    }
}

/// Feed one frame's worth of scripted input into the host
fn script_frame(controller: &HeadlessController, window: WindowId, frame: u64) {
    match frame {
        1 => controller.text(window, "hello"),
        2..=4 => controller.key(window, SCANCODE_W, Action::Press),
        5 => controller.key(window, SCANCODE_W, Action::Release),
        6 => {
            controller.cursor(window, 320.0, 240.0);
            controller.mouse_button(window, 0, Action::Press);
        }
        7 => controller.mouse_button(window, 0, Action::Release),
        8 => controller.scroll(window, 0.0, -3.0),
        9 => controller.set_layout(KeyboardLayout::german()),
        10 => controller.text(window, "zürich"),
        11 => controller.key(window, SCANCODE_ESCAPE, Action::Press),
        MAX_FRAMES => controller.request_close(window),
        _ => {}
    }
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config: SystemConfig = load_or_default(args.next())?;
    let headless: HeadlessConfig = load_or_default::<HeadlessConfig>(args.next())?.with_manual_clock(true);
    config.validate()?;
    headless.validate()?;

    native_window::logging::init_with_level(&config.log_level);
    log::info!("Starting headless window demo");

    let (platform, controller) = HeadlessPlatform::new(&headless);
    let mut system = WindowSystem::new(platform, config);
    system.initialize()?;

    let window = system.create_window(640, 480, "Headless Demo")?;
    log::info!(
        "Window {:?}: {:?} logical, {:?} framebuffer",
        window,
        system.window_size(window),
        system.framebuffer_size(window)
    );

    let typed = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&typed);
    system.set_character_callback(
        window,
        Some(Box::new(move |_, c| {
            if let Ok(mut typed) = sink.lock() {
                typed.push(c);
            }
        })),
    );

    // Escape requests close from the key callback; flags are applied after the pump
    let escape = Arc::new(Mutex::new(false));
    let escape_sink = Arc::clone(&escape);
    system.set_key_callback(
        window,
        Some(Box::new(move |_, key, action| {
            log::debug!("Key {key:?} {action:?}");
            if key == Key::Escape && action.is_pressed() {
                if let Ok(mut escape) = escape_sink.lock() {
                    *escape = true;
                }
            }
        })),
    );
    system.set_mouse_button_callback(
        window,
        Some(Box::new(|_, button, action, _| log::debug!("Mouse {button:?} {action:?}"))),
    );
    system.set_scroll_callback(window, Some(Box::new(|_, dx, dy| log::debug!("Scroll ({dx}, {dy})"))));

    let mut frame_timer = FrameTimer::new();
    while !system.window_should_close(window) {
        let frame = frame_timer.frame_count() + 1;
        script_frame(&controller, window, frame);
        controller.advance(Duration::from_micros(16_667));

        system.poll_events();
        if escape.lock().map(|flag| *flag).unwrap_or(false) {
            system.set_should_close(window, true);
        }

        if system.current_context().is_some() {
            if let Some(gl_clear) = system.get_proc_address("glClear") {
                log::trace!("Frame {frame}: glClear at {:#x}", gl_clear.0);
            }
        }
        system.swap_buffers(window);
        frame_timer.update(system.time());
    }

    log::info!(
        "Closed after {} frames ({:.3}s, {:.1} fps average)",
        frame_timer.frame_count(),
        frame_timer.total_time(),
        frame_timer.average_fps()
    );
    if let Ok(typed) = typed.lock() {
        log::info!("Typed text: {typed:?}");
    }
    let held: Vec<Key> = Key::ALL
        .into_iter()
        .filter(|key| system.key_state(window, *key).is_pressed())
        .collect();
    log::info!("Keys still held at exit: {held:?}");
    log::info!(
        "Key names: W is '{}', Escape is '{}'",
        system.key_name(Some(Key::W), 0),
        system.key_name(Some(Key::Escape), 0)
    );

    system.destroy_window(window);
    system.shutdown();
    log::info!("Headless window demo finished");
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        log::error!("Demo failed: {err}");
        eprintln!("headless_demo: {err}");
        std::process::exit(1);
    }
}
