//! Audible feedback for recorded input
//!
//! Feedback is optional. A backend that fails is switched off and the
//! failure is logged; measurement carries on regardless.

use std::io::{self, Write};
use thiserror::Error;

/// Sound a tester asks for after handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Nothing to play
    None,
    /// A pointer button was pressed
    Click,
    /// A key went down (first press, not a repeat)
    Key,
}

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("audio output unavailable: {0}")]
    Unavailable(#[from] io::Error),
}

/// Something that can play cues
pub trait AudioFeedback {
    fn play(&mut self, cue: Cue) -> Result<(), FeedbackError>;
}

/// Feedback that does nothing
#[derive(Debug, Default)]
pub struct Silent;

impl AudioFeedback for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), FeedbackError> {
        Ok(())
    }
}

/// Rings the terminal bell
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AudioFeedback for TerminalBell<W> {
    fn play(&mut self, cue: Cue) -> Result<(), FeedbackError> {
        if cue == Cue::None {
            return Ok(());
        }
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Wraps a backend and disables it after its first failure
pub struct Feedback {
    backend: Box<dyn AudioFeedback>,
    available: bool,
}

impl Feedback {
    pub fn new(backend: Box<dyn AudioFeedback>) -> Self {
        Self {
            backend,
            available: true,
        }
    }

    pub fn silent() -> Self {
        Self::new(Box::new(Silent))
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Play `cue` if sound is enabled and the backend still works
    pub fn play(&mut self, cue: Cue, enabled: bool) {
        if !enabled || !self.available || cue == Cue::None {
            return;
        }
        if let Err(e) = self.backend.play(cue) {
            log::warn!("disabling audio feedback: {}", e);
            self.available = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Failing;

    impl AudioFeedback for Failing {
        fn play(&mut self, _cue: Cue) -> Result<(), FeedbackError> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "no audio").into())
        }
    }

    struct Recording(Rc<RefCell<Vec<Cue>>>);

    impl AudioFeedback for Recording {
        fn play(&mut self, cue: Cue) -> Result<(), FeedbackError> {
            self.0.borrow_mut().push(cue);
            Ok(())
        }
    }

    #[test]
    fn bell_writes_bel_byte() {
        let mut bell = TerminalBell::new(Vec::new());
        bell.play(Cue::Click).unwrap();
        bell.play(Cue::None).unwrap();
        assert_eq!(bell.out, b"\x07");
    }

    #[test]
    fn failing_backend_degrades_to_noop() {
        let mut feedback = Feedback::new(Box::new(Failing));
        feedback.play(Cue::Key, true);
        assert!(!feedback.is_available());
        // Further cues are silently ignored
        feedback.play(Cue::Key, true);
    }

    #[test]
    fn disabled_sound_skips_backend() {
        let played = Rc::new(RefCell::new(Vec::new()));
        let mut feedback = Feedback::new(Box::new(Recording(played.clone())));

        feedback.play(Cue::Click, false);
        feedback.play(Cue::None, true);
        feedback.play(Cue::Key, true);

        assert_eq!(*played.borrow(), vec![Cue::Key]);
    }
}
