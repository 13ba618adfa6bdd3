//! Event pump scenarios: key and button state, characters, callbacks, keymap rebuilds

use super::headless_system;
use crate::config::HeadlessConfig;
use crate::input::{Action, Key, KeyboardLayout, MouseButton, UNKNOWN_KEY_NAME};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{Callback, CallbackKind};
    use std::sync::{Arc, Mutex};

    const SCANCODE_W: u16 = 0x0D;
    const SCANCODE_Z_US: u16 = 0x06;

    #[test]
    fn test_press_repeat_release() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(100, 100, "keys").unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        system.set_key_callback(id, Some(Box::new(move |_, key, action| sink.lock().unwrap().push((key, action)))));

        controller.key(id, SCANCODE_W, Action::Press);
        system.poll_events();
        assert_eq!(system.key_state(id, Key::W), Action::Press);

        controller.key(id, SCANCODE_W, Action::Press);
        system.poll_events();
        assert_eq!(system.key_state(id, Key::W), Action::Press);

        controller.key(id, SCANCODE_W, Action::Release);
        system.poll_events();
        assert_eq!(system.key_state(id, Key::W), Action::Release);

        assert_eq!(*seen.lock().unwrap(), vec![(Key::W, Action::Press), (Key::W, Action::Release)]);
    }

    #[test]
    fn test_key_state_is_per_window() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let first = system.create_window(10, 10, "first").unwrap();
        let second = system.create_window(10, 10, "second").unwrap();

        controller.key(first, SCANCODE_W, Action::Press);
        system.poll_events();
        assert_eq!(system.key_state(first, Key::W), Action::Press);
        assert_eq!(system.key_state(second, Key::W), Action::Release);
    }

    #[test]
    fn test_mouse_buttons_and_cursor() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(100, 100, "mouse").unwrap();

        let clicks = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&clicks);
        system.set_mouse_button_callback(
            id,
            Some(Box::new(move |_, button, action, mods| {
                assert!(mods.is_empty());
                sink.lock().unwrap().push((button, action));
            })),
        );

        controller.mouse_button(id, 0, Action::Press);
        controller.mouse_button(id, 7, Action::Press);
        controller.cursor(id, 12.0, 34.5);
        system.poll_events();

        assert_eq!(system.mouse_button_state(id, MouseButton::Left), Action::Press);
        assert_eq!(system.mouse_button_state(id, MouseButton::Middle), Action::Release);
        assert_eq!(system.mouse_position(id), (12.0, 34.5));

        controller.mouse_button(id, 0, Action::Release);
        system.poll_events();
        assert_eq!(system.mouse_button_state(id, MouseButton::Left), Action::Release);

        assert_eq!(
            *clicks.lock().unwrap(),
            vec![(MouseButton::Left, Action::Press), (MouseButton::Left, Action::Release)]
        );
    }

    #[test]
    fn test_character_callback_filters_controls() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(100, 100, "text").unwrap();

        let text = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&text);
        system.set_character_callback(id, Some(Box::new(move |_, c| sink.lock().unwrap().push(u32::from(c)))));

        controller.codepoint(id, 10, true);
        controller.codepoint(id, 150, true);
        controller.codepoint(id, 65, true);
        system.poll_events();

        assert_eq!(*text.lock().unwrap(), vec![65]);
    }

    #[test]
    fn test_composed_text_is_not_forwarded() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(100, 100, "ime").unwrap();

        let text = Arc::new(Mutex::new(String::new()));
        let sink = Arc::clone(&text);
        system.set_character_callback(id, Some(Box::new(move |_, c| sink.lock().unwrap().push(c))));

        controller.codepoint(id, u32::from('`'), false);
        controller.text(id, "hé");
        system.poll_events();

        assert_eq!(*text.lock().unwrap(), "hé");
    }

    #[test]
    fn test_replacing_callback_returns_previous() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(100, 100, "swap").unwrap();

        let hits = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&hits);
        let second = Arc::clone(&hits);

        assert!(system
            .set_scroll_callback(id, Some(Box::new(move |_, _, dy| first.lock().unwrap().push(("first", dy)))))
            .is_none());
        let mut previous = system
            .set_scroll_callback(id, Some(Box::new(move |_, _, dy| second.lock().unwrap().push(("second", dy)))))
            .unwrap();

        controller.scroll(id, 0.0, 1.0);
        system.poll_events();
        previous(id, 0.0, 2.0);

        assert_eq!(*hits.lock().unwrap(), vec![("second", 1.0), ("first", 2.0)]);
        assert!(system.window(id).unwrap().has_callback(CallbackKind::Scroll));

        let removed = system.clear_callback(id, CallbackKind::Scroll);
        assert!(matches!(removed, Some(Callback::Scroll(_))));
        assert!(!system.window(id).unwrap().has_callback(CallbackKind::Scroll));
    }

    #[test]
    fn test_events_for_destroyed_window_are_dropped() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let gone = system.create_window(10, 10, "gone").unwrap();
        let kept = system.create_window(10, 10, "kept").unwrap();

        controller.key(gone, SCANCODE_W, Action::Press);
        controller.request_close(gone);
        controller.key(kept, SCANCODE_W, Action::Press);
        system.destroy_window(gone);
        system.poll_events();

        assert_eq!(system.window_count(), 1);
        assert_eq!(system.key_state(kept, Key::W), Action::Press);
        assert!(!system.window_should_close(kept));
    }

    #[test]
    fn test_layout_change_rebuilds_keymap() {
        let (mut system, controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(10, 10, "layout").unwrap();
        assert_eq!(system.key_name(None, SCANCODE_Z_US), "z");
        assert_eq!(system.key_scancode(Key::Z), Some(SCANCODE_Z_US));

        controller.set_layout(KeyboardLayout::german());
        system.poll_events();
        assert_eq!(system.keymap().layout_name(), "german");
        assert_eq!(system.key_name(None, SCANCODE_Z_US), "y");
        assert_eq!(system.key_name(Some(Key::Semicolon), 0), "ö");

        controller.key(id, SCANCODE_Z_US, Action::Press);
        system.poll_events();
        assert_eq!(system.key_state(id, Key::Y), Action::Press);
        assert_eq!(system.key_state(id, Key::Z), Action::Release);
    }

    #[test]
    fn test_key_names_for_non_printable_keys() {
        let (system, _controller) = headless_system(HeadlessConfig::default());
        assert_eq!(system.key_name(Some(Key::Escape), 0), UNKNOWN_KEY_NAME);
        assert_eq!(system.key_name(Some(Key::A), 0xFF), "a");
        assert_eq!(system.key_name(None, 0xFF), UNKNOWN_KEY_NAME);
    }

    #[test]
    #[should_panic(expected = "invalid or destroyed window handle")]
    fn test_key_query_on_destroyed_window_panics() {
        let (mut system, _controller) = headless_system(HeadlessConfig::default());
        let id = system.create_window(10, 10, "stale").unwrap();
        system.destroy_window(id);
        system.key_state(id, Key::A);
    }
}
