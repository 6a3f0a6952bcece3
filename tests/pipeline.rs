use std::{cell::RefCell, path::Path, rc::Rc};

use whisp::{
    diarize::{Diarizer, SpeakerInterval},
    engines::{Recognition, RecognitionRequest, Recognizer},
    error::{DiarizationError, RecognitionError},
    validate::FormatProbe,
    Options, Pipeline, WhispError, Word,
};

struct MockRecognizer {
    response: Option<Result<Recognition, RecognitionError>>,
    requests: Rc<RefCell<Vec<RecognitionRequest>>>,
}

impl MockRecognizer {
    fn with_words(words: Vec<Word>, duration: f64) -> (Self, Rc<RefCell<Vec<RecognitionRequest>>>) {
        Self::with_response(Ok(Recognition { words, duration }))
    }

    fn with_response(
        response: Result<Recognition, RecognitionError>,
    ) -> (Self, Rc<RefCell<Vec<RecognitionRequest>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                response: Some(response),
                requests: Rc::clone(&requests),
            },
            requests,
        )
    }
}

impl Recognizer for MockRecognizer {
    fn default_model(&self) -> String {
        "medium".to_string()
    }

    fn transcribe(
        &mut self,
        _audio: &Path,
        request: &RecognitionRequest,
    ) -> Result<Recognition, RecognitionError> {
        self.requests.borrow_mut().push(request.clone());
        self.response
            .take()
            .unwrap_or_else(|| Err(RecognitionError::Transcription("no mock response".into())))
    }
}

enum DiarizeOutcome {
    Tracks(Vec<SpeakerInterval>),
    MissingToken,
    Broken,
}

struct MockDiarizer {
    outcome: DiarizeOutcome,
    hints: Rc<RefCell<Vec<Option<u32>>>>,
}

impl MockDiarizer {
    fn new(outcome: DiarizeOutcome) -> (Self, Rc<RefCell<Vec<Option<u32>>>>) {
        let hints = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                outcome,
                hints: Rc::clone(&hints),
            },
            hints,
        )
    }
}

impl Diarizer for MockDiarizer {
    fn diarize(
        &self,
        _audio: &Path,
        speakers_hint: Option<u32>,
    ) -> Result<Vec<SpeakerInterval>, DiarizationError> {
        self.hints.borrow_mut().push(speakers_hint);
        match &self.outcome {
            DiarizeOutcome::Tracks(tracks) => Ok(tracks.clone()),
            DiarizeOutcome::MissingToken => Err(DiarizationError::MissingCredential(
                "hugging face token required for diarization".into(),
            )),
            DiarizeOutcome::Broken => Err(DiarizationError::Failed("model exploded".into())),
        }
    }
}

struct AcceptAll;

impl FormatProbe for AcceptAll {
    fn probe(&self, _path: &Path) -> Result<(), WhispError> {
        Ok(())
    }
}

struct RejectAll;

impl FormatProbe for RejectAll {
    fn probe(&self, path: &Path) -> Result<(), WhispError> {
        Err(WhispError::UnsupportedFormat(format!(
            "unsupported audio format: {}",
            path.display()
        )))
    }
}

fn hello_world() -> Vec<Word> {
    vec![Word::new("hello", 0.0, 0.5), Word::new("world", 0.6, 1.0)]
}

fn two_speakers() -> DiarizeOutcome {
    DiarizeOutcome::Tracks(vec![
        SpeakerInterval::new(0.0, 0.7, "SPEAKER_00"),
        SpeakerInterval::new(0.7, 2.0, "SPEAKER_01"),
    ])
}

fn audio_fixture() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("test.mp3");
    std::fs::write(&path, b"not really audio").expect("write fixture");
    (dir, path)
}

#[test]
fn full_pipeline_with_diarization() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, hints) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let run = pipeline.run(&audio, &Options::default()).expect("pipeline should succeed");

    assert!(run.markdown.contains("# transcript: test.mp3"));
    assert!(run.markdown.contains("source: ./test.mp3"));
    assert!(run.markdown.contains("speakers:\n  - SPEAKER_00\n  - SPEAKER_01\n"));
    assert!(run.markdown.contains("**[00:00]** SPEAKER_00: hello"));
    assert!(run.markdown.contains("**[00:00]** SPEAKER_01: world"));
    assert!(run.markdown.contains("model: medium"));
    assert!(run.suggested_filename.ends_with(" test -- source__transcript.md"));
    assert!(run.warnings.is_empty());
    assert_eq!(hints.borrow().as_slice(), [None]);
}

#[test]
fn single_speaker_mode_skips_diarization() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, hints) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let options = Options {
        speakers: Some(1),
        ..Options::default()
    };
    let run = pipeline.run(&audio, &options).unwrap();

    assert!(hints.borrow().is_empty(), "diarizer must not be called");
    assert!(run.markdown.contains("speakers: []"));
    assert!(run.markdown.contains("**[00:00]** hello world"));
    assert!(run.transcript.speakers.is_empty());
}

#[test]
fn options_reach_the_collaborators() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, requests) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, hints) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let options = Options {
        model: Some("large-v3".to_string()),
        language: Some("es".to_string()),
        speakers: Some(3),
        strict: false,
    };
    let run = pipeline.run(&audio, &options).unwrap();

    let requests = requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].model.as_deref(), Some("large-v3"));
    assert_eq!(requests[0].language.as_deref(), Some("es"));
    assert_eq!(hints.borrow().as_slice(), [Some(3)]);
    assert_eq!(run.transcript.model, "large-v3");
}

#[test]
fn missing_token_degrades_to_unknown_speakers() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(DiarizeOutcome::MissingToken);
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let run = pipeline.run(&audio, &Options::default()).unwrap();

    assert!(run.markdown.contains("**[00:00]** UNKNOWN: hello world"));
    assert!(run.markdown.contains("speakers:\n  - UNKNOWN\n"));
    assert_eq!(run.warnings.len(), 1);
    assert!(run.warnings[0].contains("hugging face token"));
}

#[test]
fn missing_token_is_fatal_in_strict_mode() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(DiarizeOutcome::MissingToken);
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let options = Options {
        strict: true,
        ..Options::default()
    };
    let err = pipeline.run(&audio, &options).unwrap_err();

    assert!(matches!(err, WhispError::MissingCredential(_)));
    assert_eq!(err.exit_code(), 31);
}

#[test]
fn diarization_failure_is_reported_and_survived() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(DiarizeOutcome::Broken);
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let run = pipeline.run(&audio, &Options::default()).unwrap();
    assert_eq!(run.warnings, vec!["diarization failed: model exploded".to_string()]);
    assert!(run.markdown.contains("UNKNOWN: hello world"));

    let (recognizer, _) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(DiarizeOutcome::Broken);
    let mut strict = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);
    let options = Options {
        strict: true,
        ..Options::default()
    };
    let err = strict.run(&audio, &options).unwrap_err();
    assert_eq!(err.exit_code(), 30);
}

#[test]
fn missing_file_is_fatal_before_recognition() {
    let (recognizer, requests) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let err = pipeline
        .run(Path::new("/nonexistent/audio.mp3"), &Options::default())
        .unwrap_err();

    assert!(matches!(err, WhispError::FileNotFound(_)));
    assert!(requests.borrow().is_empty());
}

#[test]
fn undecodable_file_is_fatal_even_when_lenient() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, requests) = MockRecognizer::with_words(hello_world(), 5.0);
    let (diarizer, _) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(RejectAll);

    let err = pipeline.run(&audio, &Options::default()).unwrap_err();

    assert_eq!(err.exit_code(), 11);
    assert!(requests.borrow().is_empty());
}

#[test]
fn recognition_errors_keep_their_kind() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_response(Err(RecognitionError::ModelLoad {
        model: "huge".to_string(),
        reason: "file not found".to_string(),
    }));
    let (diarizer, hints) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let err = pipeline.run(&audio, &Options::default()).unwrap_err();

    assert!(matches!(err, WhispError::ModelLoad(_)));
    assert_eq!(err.to_string(), "failed to load model huge: file not found");
    assert!(hints.borrow().is_empty());
}

#[test]
fn silent_recording_renders_silence_marker() {
    let (_dir, audio) = audio_fixture();
    let (recognizer, _) = MockRecognizer::with_words(Vec::new(), 12.0);
    let (diarizer, _) = MockDiarizer::new(two_speakers());
    let mut pipeline = Pipeline::new(recognizer, diarizer).with_probe(AcceptAll);

    let run = pipeline.run(&audio, &Options::default()).unwrap();

    assert!(run.markdown.ends_with("\n\n[...silence]"));
    assert!(run.markdown.contains("duration: 12s"));
    assert!(run.markdown.contains("speakers:\nmodel: medium"));
}
