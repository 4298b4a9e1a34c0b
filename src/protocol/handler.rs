//! Protocol handler - the single place that interprets protocol semantics
//!
//! Collaborators (audio endpoint, action dispatcher, line sink) are
//! injected rather than reached through globals; each call is a
//! failure boundary of its own, converted to operator-visible status
//! instead of crashing the worker or the interpreter.

use super::{state_report, DeviceCommand};
use crate::actions::ActionDispatcher;
use crate::audio::{AudioEndpoint, MuteState};
use crate::core::events::LinkEvent;
use crate::core::state::AppState;
use crate::link::{LinkError, LinkWriter};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sink for outbound protocol lines. The production implementation is
/// the link worker's write handle.
pub trait LineSink {
    fn write_line(&self, line: &str) -> Result<(), LinkError>;
}

impl LineSink for LinkWriter {
    fn write_line(&self, line: &str) -> Result<(), LinkError> {
        LinkWriter::write_line(self, line)
    }
}

/// Interprets inbound protocol lines and pushes state reports back to
/// the device.
pub struct ProtocolHandler<E, D, W> {
    endpoint: E,
    dispatcher: D,
    writer: W,
    /// Action target for `BTN:` events; `None` means not configured
    launch_path: Option<PathBuf>,
    state: Arc<RwLock<AppState>>,
}

impl<E, D, W> ProtocolHandler<E, D, W>
where
    E: AudioEndpoint,
    D: ActionDispatcher,
    W: LineSink,
{
    pub fn new(
        endpoint: E,
        dispatcher: D,
        writer: W,
        launch_path: Option<PathBuf>,
        state: Arc<RwLock<AppState>>,
    ) -> Self {
        Self {
            endpoint,
            dispatcher,
            writer,
            launch_path,
            state,
        }
    }

    /// Process one link worker event.
    pub fn handle_event(&self, event: LinkEvent) {
        match event {
            LinkEvent::Connected { port } => {
                let mut state = self.state.write();
                state.link_connected = true;
                state.set_status(format!("Connected: {}", port));
                drop(state);

                // Push the state unprompted so the device's cached
                // display is correct before any button is pressed
                self.push_state();
            }
            LinkEvent::Disconnected => {
                let mut state = self.state.write();
                state.link_connected = false;
                state.set_status("Disconnected");
            }
            LinkEvent::Line(line) => self.handle_line(&line),
        }
    }

    /// Interpret one complete inbound line.
    pub fn handle_line(&self, line: &str) {
        let Some(command) = DeviceCommand::parse(line) else {
            debug!("Ignoring unrecognized line: {}", line);
            return;
        };

        match command {
            DeviceCommand::MicStateQuery => self.push_state(),
            DeviceCommand::MicToggle => self.handle_toggle(),
            DeviceCommand::Button(token) => self.handle_button(&token),
        }
    }

    fn handle_toggle(&self) {
        match self.endpoint.toggle() {
            Ok(state) => {
                info!("Mic is now {}", state);
                self.report_state(state);
            }
            Err(e) => {
                // No response line is sent; the device resynchronizes
                // on its next MIC:STATE? poll
                warn!("Toggle failed: {}", e);
                self.state.write().set_status(format!("Toggle failed: {}", e));
            }
        }
    }

    fn handle_button(&self, token: &str) {
        let Some(path) = self.launch_path.as_deref() else {
            warn!("Button {} pressed but no launch path is configured", token);
            self.state.write().set_status("No app path configured");
            return;
        };

        match self.dispatcher.launch(path) {
            Ok(()) => {
                self.state
                    .write()
                    .set_status(format!("Launched: {}", path.display()));
            }
            Err(e) => {
                warn!("Launch failed: {}", e);
                self.state.write().set_status(format!("Launch failed: {}", e));
            }
        }
    }

    /// Query the endpoint and write an authoritative state report.
    fn push_state(&self) {
        match self.endpoint.get_mute() {
            Ok(state) => self.report_state(state),
            Err(e) => {
                warn!("Mute state query failed: {}", e);
                self.state
                    .write()
                    .set_status(format!("Mic state unavailable: {}", e));
            }
        }
    }

    fn report_state(&self, mute: MuteState) {
        match self.writer.write_line(&state_report(mute)) {
            Ok(()) => {
                self.state.write().mic_state = Some(mute);
            }
            Err(e) => warn!("State report send failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionError;
    use crate::audio::AudioError;
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory endpoint with scriptable failure
    struct FakeEndpoint {
        muted: Mutex<bool>,
        fail: bool,
    }

    impl FakeEndpoint {
        fn new(muted: bool) -> Self {
            Self {
                muted: Mutex::new(muted),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                muted: Mutex::new(false),
                fail: true,
            }
        }
    }

    impl AudioEndpoint for FakeEndpoint {
        fn get_mute(&self) -> Result<MuteState, AudioError> {
            if self.fail {
                return Err(AudioError::NoDefaultDevice);
            }
            Ok(MuteState::from_muted(*self.muted.lock()))
        }

        fn set_mute(&self, state: MuteState) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::NoDefaultDevice);
            }
            *self.muted.lock() = state.is_muted();
            Ok(())
        }
    }

    /// Captures every outbound line
    #[derive(Clone, Default)]
    struct RecordingSink {
        lines: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingSink {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().clone()
        }
    }

    impl LineSink for RecordingSink {
        fn write_line(&self, line: &str) -> Result<(), LinkError> {
            self.lines.lock().push(line.to_string());
            Ok(())
        }
    }

    /// Counts launches without spawning anything
    #[derive(Clone, Default)]
    struct CountingDispatcher {
        calls: Arc<AtomicUsize>,
    }

    impl CountingDispatcher {
        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ActionDispatcher for CountingDispatcher {
        fn launch(&self, _path: &Path) -> Result<(), ActionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn handler(
        endpoint: FakeEndpoint,
        launch_path: Option<PathBuf>,
    ) -> (
        ProtocolHandler<FakeEndpoint, CountingDispatcher, RecordingSink>,
        RecordingSink,
        CountingDispatcher,
        Arc<RwLock<AppState>>,
    ) {
        let sink = RecordingSink::default();
        let dispatcher = CountingDispatcher::default();
        let state = Arc::new(RwLock::new(AppState::new()));
        let handler = ProtocolHandler::new(
            endpoint,
            dispatcher.clone(),
            sink.clone(),
            launch_path,
            Arc::clone(&state),
        );
        (handler, sink, dispatcher, state)
    }

    #[test]
    fn test_state_query_reports_current_state() {
        let (handler, sink, _, _) = handler(FakeEndpoint::new(true), None);
        handler.handle_line("MIC:STATE?");
        assert_eq!(sink.lines(), vec!["MIC:STATE MUTED"]);
    }

    #[test]
    fn test_state_query_is_idempotent() {
        let (handler, sink, _, _) = handler(FakeEndpoint::new(false), None);
        handler.handle_line("MIC:STATE?");
        handler.handle_line("MIC:STATE?");
        handler.handle_line("MIC:STATE?");
        assert_eq!(
            sink.lines(),
            vec!["MIC:STATE UNMUTED"; 3]
        );
    }

    #[test]
    fn test_toggle_round_trip() {
        let (handler, sink, _, _) = handler(FakeEndpoint::new(false), None);
        handler.handle_line("MIC:TOGGLE");
        handler.handle_line("MIC:TOGGLE");
        assert_eq!(sink.lines(), vec!["MIC:STATE MUTED", "MIC:STATE UNMUTED"]);
    }

    #[test]
    fn test_toggle_failure_sends_no_line() {
        let (handler, sink, _, state) = handler(FakeEndpoint::failing(), None);
        handler.handle_line("MIC:TOGGLE");
        assert!(sink.lines().is_empty());
        let status = state.read().status.clone();
        assert!(status.unwrap().starts_with("Toggle failed"));
    }

    #[test]
    fn test_button_without_configured_path() {
        let (handler, sink, dispatcher, state) = handler(FakeEndpoint::new(false), None);
        handler.handle_line("BTN:GP0");
        assert_eq!(dispatcher.count(), 0);
        assert!(sink.lines().is_empty());
        assert_eq!(
            state.read().status.as_deref(),
            Some("No app path configured")
        );
    }

    #[test]
    fn test_button_with_configured_path_dispatches() {
        let (handler, _, dispatcher, _) = handler(
            FakeEndpoint::new(false),
            Some(PathBuf::from("C:\\tools\\notes.lnk")),
        );
        handler.handle_line("BTN:GP0");
        assert_eq!(dispatcher.count(), 1);
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let (handler, sink, dispatcher, _) = handler(FakeEndpoint::new(false), None);
        handler.handle_line("HELLO");
        handler.handle_line("MIC:STATE MUTED");
        assert!(sink.lines().is_empty());
        assert_eq!(dispatcher.count(), 0);
    }

    #[test]
    fn test_connect_pushes_state_unprompted() {
        let (handler, sink, _, state) = handler(FakeEndpoint::new(true), None);
        handler.handle_event(LinkEvent::Connected {
            port: "COM6".to_string(),
        });
        assert_eq!(sink.lines(), vec!["MIC:STATE MUTED"]);
        assert!(state.read().link_connected);
        assert_eq!(state.read().mic_state, Some(MuteState::Muted));
    }

    #[test]
    fn test_disconnect_updates_state() {
        let (handler, _, _, state) = handler(FakeEndpoint::new(false), None);
        handler.handle_event(LinkEvent::Connected {
            port: "COM6".to_string(),
        });
        handler.handle_event(LinkEvent::Disconnected);
        assert!(!state.read().link_connected);
        assert_eq!(state.read().status.as_deref(), Some("Disconnected"));
    }

    #[test]
    fn test_query_failure_sends_no_line() {
        let (handler, sink, _, state) = handler(FakeEndpoint::failing(), None);
        handler.handle_line("MIC:STATE?");
        assert!(sink.lines().is_empty());
        assert!(state.read().mic_state.is_none());
    }
}
