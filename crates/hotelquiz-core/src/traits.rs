//! Speech collaborators.
//!
//! Text-to-speech and speech recognition are platform services. The core
//! only describes what it asks of them; quiz progression never waits on
//! either one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SpeechConfig;
use crate::error::QuizError;
use crate::pronunciation::{assess, PronunciationResult, RecognitionCandidate};

/// Voices tried first, in order of preference.
pub const PREFERRED_VOICES: [&str; 4] = [
    "Microsoft Zira",
    "Google US English",
    "Alex",
    "Samantha",
];

/// Upper bound on recognition alternatives requested from a recognizer.
pub const MAX_RECOGNITION_ALTERNATIVES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeechError {
    #[error("speech is not supported on this platform")]
    Unsupported,

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// A voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `en-US`.
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

/// Playback parameters for an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechParams {
    pub lang: String,
    /// Slightly slowed down for learners.
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 0.8,
            pitch: 1.0,
            volume: 1.0,
        }
    }
}

/// Text queued for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub params: SpeechParams,
    /// `None` leaves the choice to the platform default.
    pub voice: Option<Voice>,
}

/// Playback lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Start,
    End,
    Error(String),
}

/// Text-to-speech backend.
///
/// A new `speak` implicitly cancels whatever is still playing.
pub trait SpeechSynthesizer {
    fn voices(&self) -> Vec<Voice>;

    fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError>;

    fn cancel(&self);
}

/// Speech-to-text backend.
pub trait SpeechRecognizer {
    /// Listen for one utterance and return up to
    /// [`MAX_RECOGNITION_ALTERNATIVES`] hypotheses.
    fn listen(&self) -> Result<Vec<RecognitionCandidate>, SpeechError>;
}

/// Pick a voice: a preferred name first, then any English voice.
pub fn select_voice(voices: &[Voice], preferred: &[impl AsRef<str>]) -> Option<Voice> {
    preferred
        .iter()
        .find_map(|name| voices.iter().find(|v| v.name.contains(name.as_ref())))
        .or_else(|| voices.iter().find(|v| v.lang.starts_with("en")))
        .cloned()
}

/// Build an utterance for `text`, choosing a voice from `voices`.
pub fn prepare_utterance(
    text: &str,
    params: SpeechParams,
    voices: &[Voice],
    preferred: &[impl AsRef<str>],
) -> Utterance {
    let voice = select_voice(voices, preferred);
    if voice.is_none() {
        tracing::debug!(available = voices.len(), "no English voice, using platform default");
    }
    Utterance {
        text: text.to_string(),
        params,
        voice,
    }
}

/// Speak `target` with the `[speech]` settings, listen for the learner, and
/// grade the best hypothesis.
///
/// A synthesis failure is logged and the attempt continues. `Ok(None)` means
/// the recognizer heard nothing.
pub fn practice_pronunciation(
    target: &str,
    speech: &SpeechConfig,
    synthesizer: &dyn SpeechSynthesizer,
    recognizer: &dyn SpeechRecognizer,
) -> Result<Option<PronunciationResult>, QuizError> {
    let utterance = prepare_utterance(
        target,
        speech.params(),
        &synthesizer.voices(),
        speech.preferred_voices.as_slice(),
    );
    synthesizer.cancel();
    if let Err(e) = synthesizer.speak(&utterance) {
        tracing::warn!(error = %e, target, "could not play model pronunciation");
    }

    let candidates = match recognizer.listen() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, target, "recognition failed");
            return Ok(None);
        }
    };

    let candidates = candidates
        .into_iter()
        .take(MAX_RECOGNITION_ALTERNATIVES)
        .collect();
    assess(target, candidates)
}

/// Recognizer that replays queued results, for tests and demos.
pub struct ScriptedRecognizer {
    script: Mutex<VecDeque<Result<Vec<RecognitionCandidate>, SpeechError>>>,
    call_count: AtomicU32,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Queue the hypotheses returned by the next `listen`.
    pub fn push(&self, candidates: Vec<RecognitionCandidate>) -> &Self {
        self.lock().push_back(Ok(candidates));
        self
    }

    /// Queue a failure for the next `listen`.
    pub fn push_error(&self, error: SpeechError) -> &Self {
        self.lock().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn lock(
        &self,
    ) -> std::sync::MutexGuard<'_, VecDeque<Result<Vec<RecognitionCandidate>, SpeechError>>> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn listen(&self) -> Result<Vec<RecognitionCandidate>, SpeechError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        // An exhausted script hears silence.
        self.lock().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeSynth {
        voices: Vec<Voice>,
        fail: bool,
        spoken: RefCell<Vec<Utterance>>,
        events: RefCell<Vec<SpeechEvent>>,
    }

    impl FakeSynth {
        fn new(voices: Vec<Voice>, fail: bool) -> Self {
            Self {
                voices,
                fail,
                spoken: RefCell::new(Vec::new()),
                events: RefCell::new(Vec::new()),
            }
        }
    }

    impl SpeechSynthesizer for FakeSynth {
        fn voices(&self) -> Vec<Voice> {
            self.voices.clone()
        }

        fn speak(&self, utterance: &Utterance) -> Result<(), SpeechError> {
            if self.fail {
                self.events
                    .borrow_mut()
                    .push(SpeechEvent::Error("audio device busy".into()));
                return Err(SpeechError::Synthesis("audio device busy".into()));
            }
            self.events.borrow_mut().push(SpeechEvent::Start);
            self.spoken.borrow_mut().push(utterance.clone());
            self.events.borrow_mut().push(SpeechEvent::End);
            Ok(())
        }

        fn cancel(&self) {}
    }

    fn platform_voices() -> Vec<Voice> {
        vec![
            Voice::new("Kyoko", "ja-JP"),
            Voice::new("Daniel", "en-GB"),
            Voice::new("Samantha", "en-US"),
            Voice::new("Google US English", "en-US"),
        ]
    }

    fn speech() -> SpeechConfig {
        SpeechConfig::default()
    }

    #[test]
    fn default_params() {
        let p = SpeechParams::default();
        assert_eq!(p.lang, "en-US");
        assert_eq!(p.rate, 0.8);
        assert_eq!(p.pitch, 1.0);
        assert_eq!(p.volume, 1.0);
    }

    #[test]
    fn preferred_voice_order_wins() {
        let v = select_voice(&platform_voices(), &PREFERRED_VOICES).unwrap();
        assert_eq!(v.name, "Google US English");
    }

    #[test]
    fn falls_back_to_any_english_voice() {
        let voices = vec![Voice::new("Kyoko", "ja-JP"), Voice::new("Daniel", "en-GB")];
        let v = select_voice(&voices, &PREFERRED_VOICES).unwrap();
        assert_eq!(v.name, "Daniel");
    }

    #[test]
    fn no_english_voice_leaves_platform_default() {
        let voices = vec![Voice::new("Kyoko", "ja-JP")];
        assert_eq!(select_voice(&voices, &PREFERRED_VOICES), None);

        let u = prepare_utterance("Welcome", SpeechParams::default(), &voices, &PREFERRED_VOICES);
        assert_eq!(u.voice, None);
        assert_eq!(u.text, "Welcome");
    }

    #[test]
    fn practice_flow_speaks_then_scores() {
        let synth = FakeSynth::new(platform_voices(), false);
        let recognizer = ScriptedRecognizer::new();
        recognizer.push(vec![
            RecognitionCandidate::new("well come", 0.3),
            RecognitionCandidate::new("welcome", 0.9),
        ]);

        let result = practice_pronunciation("Welcome", &speech(), &synth, &recognizer)
            .unwrap()
            .unwrap();

        assert_eq!(result.transcript, "welcome");
        assert_eq!(result.score, 95);
        assert_eq!(recognizer.call_count(), 1);
        assert_eq!(synth.spoken.borrow().len(), 1);
        assert_eq!(
            *synth.events.borrow(),
            vec![SpeechEvent::Start, SpeechEvent::End]
        );
    }

    #[test]
    fn configured_speech_settings_reach_the_utterance() {
        let synth = FakeSynth::new(platform_voices(), false);
        let recognizer = ScriptedRecognizer::new();
        recognizer.push(vec![RecognitionCandidate::new("welcome", 0.9)]);

        let speech = SpeechConfig {
            lang: "en-GB".into(),
            rate: 0.6,
            pitch: 1.2,
            volume: 0.5,
            preferred_voices: vec!["Daniel".into()],
        };
        practice_pronunciation("Welcome", &speech, &synth, &recognizer).unwrap();

        let spoken = synth.spoken.borrow();
        let u = &spoken[0];
        assert_eq!(u.voice.as_ref().unwrap().name, "Daniel");
        assert_eq!(u.params.lang, "en-GB");
        assert_eq!(u.params.rate, 0.6);
        assert_eq!(u.params.pitch, 1.2);
        assert_eq!(u.params.volume, 0.5);
    }

    #[test]
    fn synthesis_failure_does_not_stop_attempt() {
        let synth = FakeSynth::new(vec![], true);
        let recognizer = ScriptedRecognizer::new();
        recognizer.push(vec![RecognitionCandidate::new("thank you", 0.8)]);

        let result = practice_pronunciation("Thank you", &speech(), &synth, &recognizer).unwrap();
        assert_eq!(result.unwrap().score, 90);
        assert!(synth.spoken.borrow().is_empty());
    }

    #[test]
    fn recognition_failure_or_silence_is_none() {
        let synth = FakeSynth::new(platform_voices(), false);
        let recognizer = ScriptedRecognizer::new();
        recognizer.push_error(SpeechError::Unsupported);

        assert_eq!(practice_pronunciation("Welcome", &speech(), &synth, &recognizer).unwrap(), None);
        assert_eq!(practice_pronunciation("Welcome", &speech(), &synth, &recognizer).unwrap(), None);
        assert_eq!(recognizer.call_count(), 2);
    }
}
