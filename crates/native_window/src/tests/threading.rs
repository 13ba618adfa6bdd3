//! Current-context binding across threads

use super::headless_system;
use crate::config::{HeadlessConfig, SystemConfig};
use crate::platform::{HeadlessController, HeadlessPlatform};
use crate::WindowSystem;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{mpsc, Arc, Mutex, PoisonError};
    use std::thread;

    fn shared_system() -> (Arc<Mutex<WindowSystem<HeadlessPlatform>>>, HeadlessController) {
        let (system, controller) = headless_system(HeadlessConfig::default());
        (Arc::new(Mutex::new(system)), controller)
    }

    #[test]
    fn test_each_thread_has_its_own_current_context() {
        let (system, controller) = shared_system();
        let (first, second) = {
            let mut system = system.lock().unwrap();
            let first = system.create_window(10, 10, "main thread").unwrap();
            system.make_context_current(None);
            let second = system.create_window(10, 10, "worker thread").unwrap();
            system.make_context_current(Some(first));
            (first, second)
        };

        let worker_system = Arc::clone(&system);
        let seen_on_worker = thread::spawn(move || {
            let mut system = worker_system.lock().unwrap();
            let before = system.current_context();
            system.make_context_current(Some(second));
            (before, system.current_context())
        })
        .join()
        .unwrap();

        assert_eq!(seen_on_worker, (None, Some(second)));

        let system = system.lock().unwrap();
        assert_eq!(system.current_context(), Some(first));
        assert!(controller.is_context_current(first));
        assert!(controller.is_context_current(second));
    }

    #[test]
    fn test_proc_address_resolves_through_this_threads_context() {
        let (system, _controller) = shared_system();
        {
            let mut system = system.lock().unwrap();
            system.create_window(10, 10, "gl").unwrap();
            assert!(system.get_proc_address("glClear").is_some());
            assert!(system.get_proc_address("glNotARealEntryPoint").is_none());
        }

        let worker_system = Arc::clone(&system);
        let worker = thread::spawn(move || {
            let system = worker_system.lock().unwrap_or_else(PoisonError::into_inner);
            system.get_proc_address("glClear")
        });
        assert!(worker.join().is_err());
    }

    #[test]
    #[should_panic(expected = "no current context")]
    fn test_proc_address_after_clearing_current_panics() {
        let (platform, _controller) = HeadlessPlatform::new(&HeadlessConfig::default());
        let mut system = WindowSystem::new(platform, SystemConfig::new().with_make_current_on_create(false));
        system.initialize().unwrap();
        let id = system.create_window(10, 10, "gl").unwrap();

        system.make_context_current(None);
        system.make_context_current(Some(id));
        system.make_context_current(None);
        system.get_proc_address("glClear");
    }

    #[test]
    fn test_two_systems_on_one_thread_keep_their_own_current_context() {
        let (mut first, first_host) = headless_system(HeadlessConfig::default());
        let (mut second, second_host) = headless_system(HeadlessConfig::default());

        let a = first.create_window(10, 10, "a").unwrap();
        let b = second.create_window(10, 10, "b").unwrap();
        assert_eq!(first.current_context(), Some(a));
        assert_eq!(second.current_context(), Some(b));
        assert!(first_host.is_context_current(a));

        first.make_context_current(None);
        assert_eq!(first.current_context(), None);
        assert!(!first_host.is_context_current(a));
        assert_eq!(second.current_context(), Some(b));
        assert!(second_host.is_context_current(b));

        second.shutdown();
        first.make_context_current(Some(a));
        assert_eq!(first.current_context(), Some(a));
    }

    #[test]
    fn test_bindings_left_on_other_threads_do_not_survive_reinitialize() {
        let (system, _controller) = shared_system();
        let stale = system.lock().unwrap().create_window(10, 10, "old").unwrap();

        let (bound_tx, bound_rx) = mpsc::channel();
        let (check_tx, check_rx) = mpsc::channel::<()>();
        let worker_system = Arc::clone(&system);
        let worker = thread::spawn(move || {
            worker_system.lock().unwrap().make_context_current(Some(stale));
            bound_tx.send(()).unwrap();
            check_rx.recv().unwrap();
            let current = worker_system.lock().unwrap().current_context();
            current
        });

        bound_rx.recv().unwrap();
        let fresh = {
            let mut system = system.lock().unwrap();
            system.shutdown();
            system.initialize().unwrap();
            system.create_window(10, 10, "new").unwrap()
        };
        assert_ne!(fresh, stale);

        check_tx.send(()).unwrap();
        assert_eq!(worker.join().unwrap(), None);
        assert_eq!(system.lock().unwrap().current_context(), Some(fresh));
    }
}
