//! Host lifecycle tests driven by a scripted window system and a fake
//! graphics device. Every subsystem call is appended to a per-thread journal
//! so tests can assert on ordering.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::CStr;

use ugly_core::Error;
use ugly_host::{
    Application, ButtonAction, ButtonState, Context, Host, HostConfig, HostError, HostState, KeyCode,
};
use ugly_platform::{KeyAction, KeySink, WindowSystem};
use ugly_rhi::{DeviceConfig, GraphicsDevice, RhiError, RhiResult};

thread_local! {
    static JOURNAL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    static DEVICE_FAILS: Cell<bool> = const { Cell::new(false) };
}

fn record(entry: impl Into<String>) {
    JOURNAL.with(|j| j.borrow_mut().push(entry.into()));
}

fn journal() -> Vec<String> {
    JOURNAL.with(|j| j.borrow().clone())
}

fn count(entry: &str) -> usize {
    journal().iter().filter(|e| e.as_str() == entry).count()
}

#[derive(Default)]
struct ScriptedWindow {
    fail_create: bool,
    /// Key events delivered by successive `poll_events` calls.
    polls: VecDeque<Vec<(KeyCode, KeyAction)>>,
    /// Report a close request once this many polls have happened.
    close_after: Option<usize>,
    polled: usize,
}

impl ScriptedWindow {
    fn closing_after(polls: usize) -> Self {
        Self {
            close_after: Some(polls),
            ..Self::default()
        }
    }

    fn with_polls(mut self, polls: Vec<Vec<(KeyCode, KeyAction)>>) -> Self {
        self.polls = polls.into();
        self
    }
}

impl WindowSystem for ScriptedWindow {
    fn create_window(&mut self, width: u32, height: u32, title: &str) -> ugly_core::Result<()> {
        record(format!("window.create {}x{} {}", width, height, title));
        if self.fail_create {
            return Err(Error::Window("no display".into()));
        }
        Ok(())
    }

    fn required_instance_extensions(&self) -> ugly_core::Result<Vec<&'static CStr>> {
        Ok(vec![c"VK_KHR_surface"])
    }

    fn should_close(&self) -> bool {
        self.close_after.is_some_and(|n| self.polled >= n)
    }

    fn present(&mut self) {
        record("window.present");
    }

    fn poll_events(&mut self, sink: &mut dyn KeySink) {
        record("window.poll");
        self.polled += 1;
        for (key, action) in self.polls.pop_front().unwrap_or_default() {
            sink.on_key(key, action);
        }
    }

    fn destroy_window(&mut self) {
        record("window.destroy");
    }

    fn terminate(&mut self) {
        record("window.terminate");
    }
}

struct FakeDevice;

impl GraphicsDevice for FakeDevice {
    fn new(config: &DeviceConfig) -> Self {
        record(format!("device.new {}", config.application_name));
        FakeDevice
    }

    fn initialize(&mut self, platform_extensions: &[&'static CStr]) -> RhiResult<()> {
        record(format!("device.initialize {}", platform_extensions.len()));
        if DEVICE_FAILS.with(Cell::get) {
            return Err(RhiError::NoSuitableGpu);
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        record("device.shutdown");
    }
}

/// Binds Escape to "quit" and stops when it is released.
#[derive(Default)]
struct QuitOnEscape {
    fail_initialize: bool,
}

impl Application for QuitOnEscape {
    fn name(&self) -> &str {
        "quit-on-escape"
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        record("app.initialize");
        if self.fail_initialize {
            anyhow::bail!("missing assets");
        }
        ctx.create_button("quit");
        ctx.bind_key_to_button(KeyCode::Escape, "quit");
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) {
        let action = ctx.button_action("quit");
        record(format!("app.update {:?}", action));
        if action == ButtonAction::Released {
            ctx.quit();
        }
    }

    fn shutdown(&mut self) {
        record("app.shutdown");
    }
}

/// Records the state and action of a "jump" button every frame.
struct JumpRecorder;

impl Application for JumpRecorder {
    fn name(&self) -> &str {
        "jump-recorder"
    }

    fn initialize(&mut self, ctx: &mut Context<'_>) -> anyhow::Result<()> {
        ctx.bind_key_to_button(KeyCode::Space, "jump");
        Ok(())
    }

    fn update(&mut self, ctx: &mut Context<'_>) {
        let state = ctx.button_state("jump");
        let action = ctx.button_action("jump");
        record(format!("jump {:?} {:?}", state, action));
    }
}

type TestHost = Host<ScriptedWindow, FakeDevice>;

/// Fresh host with an empty journal and a working device.
fn host(window: ScriptedWindow) -> TestHost {
    JOURNAL.with(|j| j.borrow_mut().clear());
    DEVICE_FAILS.with(|f| f.set(false));
    TestHost::with_window_system(HostConfig::default(), window)
}

#[test]
fn test_missing_application_builds_nothing() {
    let mut host = host(ScriptedWindow::closing_after(1));

    let err = host.run(None).unwrap_err();

    assert!(matches!(err, HostError::MissingApplication));
    assert!(err.exit_code() < 0);
    assert!(journal().is_empty());
    assert_eq!(host.state(), HostState::Created);
    assert!(host.input_manager().is_none());
}

#[test]
fn test_window_failure_aborts_startup() {
    let window = ScriptedWindow {
        fail_create: true,
        ..ScriptedWindow::default()
    };
    let mut host = host(window);

    let err = host.run(Some(Box::new(QuitOnEscape::default()))).unwrap_err();

    assert!(matches!(err, HostError::Window(_)));
    assert_eq!(err.exit_code(), -2);
    assert_eq!(
        journal(),
        vec![
            "window.create 1280x720 quit-on-escape",
            "app.shutdown",
            "window.terminate",
        ]
    );
    assert_eq!(host.state(), HostState::Terminated);
}

#[test]
fn test_device_failure_rolls_back_in_reverse_order() {
    let mut host = host(ScriptedWindow::closing_after(1));
    DEVICE_FAILS.with(|f| f.set(true));

    let err = host.run(Some(Box::new(QuitOnEscape::default()))).unwrap_err();

    assert!(matches!(err, HostError::Device(RhiError::NoSuitableGpu)));
    assert_eq!(err.exit_code(), -4);
    assert_eq!(
        journal(),
        vec![
            "window.create 1280x720 quit-on-escape",
            "device.new quit-on-escape",
            "device.initialize 1",
            "app.shutdown",
            "device.shutdown",
            "window.destroy",
            "window.terminate",
        ]
    );
    assert!(host.input_manager().is_none());
}

#[test]
fn test_application_failure_tears_everything_down() {
    let mut host = host(ScriptedWindow::closing_after(1));
    let app = QuitOnEscape {
        fail_initialize: true,
    };

    let err = host.run(Some(Box::new(app))).unwrap_err();

    assert!(matches!(err, HostError::Application(_)));
    assert_eq!(err.exit_code(), -5);
    assert_eq!(count("app.initialize"), 1);
    assert_eq!(count("window.present"), 0);
    assert_eq!(count("device.shutdown"), 1);
    assert_eq!(count("window.destroy"), 1);
    assert_eq!(host.state(), HostState::Terminated);
}

#[test]
fn test_quit_lets_current_frame_finish() {
    let window = ScriptedWindow::default().with_polls(vec![
        vec![(KeyCode::Escape, KeyAction::Press)],
        vec![(KeyCode::Escape, KeyAction::Release)],
    ]);
    let mut host = host(window);

    host.run(Some(Box::new(QuitOnEscape::default()))).unwrap();

    let frames: Vec<String> = journal()
        .into_iter()
        .skip_while(|e| e != "app.initialize")
        .skip(1)
        .collect();
    assert_eq!(
        frames,
        vec![
            "app.update None",
            "window.present",
            "window.poll",
            "app.update Pressed",
            "window.present",
            "window.poll",
            "app.update Released",
            "window.present",
            "window.poll",
            "app.shutdown",
            "device.shutdown",
            "window.destroy",
            "window.terminate",
        ]
    );
    assert!(host.is_quit_requested());
    assert_eq!(host.state(), HostState::Terminated);
}

#[test]
fn test_close_request_ends_loop() {
    let mut host = host(ScriptedWindow::closing_after(3));

    host.run(Some(Box::new(QuitOnEscape::default()))).unwrap();

    assert_eq!(count("app.update None"), 3);
    assert_eq!(count("window.poll"), 3);
    assert!(!host.is_quit_requested());
}

#[test]
fn test_quit_before_run_skips_loop() {
    let mut host = host(ScriptedWindow::default());
    host.quit();

    host.run(Some(Box::new(QuitOnEscape::default()))).unwrap();

    assert_eq!(count("app.initialize"), 1);
    assert_eq!(count("window.present"), 0);
    assert_eq!(count("app.shutdown"), 1);
}

#[test]
fn test_edge_is_visible_for_one_frame() {
    let window = ScriptedWindow::closing_after(5).with_polls(vec![
        vec![(KeyCode::Space, KeyAction::Press)],
        vec![],
        vec![(KeyCode::Space, KeyAction::Repeat), (KeyCode::KeyZ, KeyAction::Press)],
        vec![(KeyCode::Space, KeyAction::Release)],
    ]);
    let mut host = host(window);

    host.run(Some(Box::new(JumpRecorder))).unwrap();

    let frames: Vec<String> = journal().into_iter().filter(|e| e.starts_with("jump")).collect();
    let pressed = format!("{:?}", ButtonState::Pressed);
    let released = format!("{:?}", ButtonState::Released);
    assert_eq!(
        frames,
        vec![
            format!("jump {} None", released),
            format!("jump {} Pressed", pressed),
            format!("jump {} None", pressed),
            format!("jump {} Repeated", pressed),
            format!("jump {} Released", released),
        ]
    );
}

#[test]
fn test_host_runs_only_once() {
    let mut host = host(ScriptedWindow::closing_after(1));
    host.run(Some(Box::new(QuitOnEscape::default()))).unwrap();

    let err = host.run(Some(Box::new(QuitOnEscape::default()))).unwrap_err();

    assert!(matches!(err, HostError::InvalidState));
    assert_eq!(count("app.initialize"), 1);
}
