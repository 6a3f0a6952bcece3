//! Whisper engine backed by `whisper-rs`. Only built with the `whisper`
//! feature (on by default).
//!
//! ```rust,no_run
//! use std::path::Path;
//! use whisp::engines::{whisper::WhisperRecognizer, RecognitionRequest, Recognizer};
//!
//! let mut engine = WhisperRecognizer::new("models");
//! let recognition = engine.transcribe(Path::new("audio.wav"), &RecognitionRequest::default())?;
//! println!("{} words in {:.1}s", recognition.words.len(), recognition.duration);
//! # Ok::<(), whisp::error::RecognitionError>(())
//! ```

use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    audio,
    engines::{default_model_for, detect_execution_target, Recognition, RecognitionRequest, Recognizer},
    error::RecognitionError,
    Word,
};

/// Decoding settings applied to every run.
#[derive(Debug, Clone)]
struct WhisperInferenceParams {
    beam_size: i32,
    suppress_blank: bool,
    suppress_non_speech_tokens: bool,
    no_speech_thold: f32,
}

impl Default for WhisperInferenceParams {
    fn default() -> Self {
        Self {
            beam_size: 5,
            suppress_blank: true,
            suppress_non_speech_tokens: true,
            no_speech_thold: 0.6,
        }
    }
}

/// Whisper recognizer producing one [`Word`] per whisper segment.
///
/// Segments are limited to a single word with token timestamps enabled, which
/// gives word-level start and end times.
pub struct WhisperRecognizer {
    model_dir: PathBuf,
    params: WhisperInferenceParams,
    loaded_model_path: Option<PathBuf>,
    context: Option<WhisperContext>,
}

impl WhisperRecognizer {
    pub fn new(model_dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: model_dir.into(),
            params: WhisperInferenceParams::default(),
            loaded_model_path: None,
            context: None,
        }
    }

    /// Path of the GGML file for `model`. A model name that is itself an
    /// existing file is used as-is.
    pub fn model_path(&self, model: &str) -> PathBuf {
        let direct = Path::new(model);
        if direct.is_file() {
            return direct.to_path_buf();
        }
        self.model_dir.join(format!("ggml-{model}.bin"))
    }

    fn load_model(&mut self, model: &str) -> Result<&WhisperContext, RecognitionError> {
        let path = self.model_path(model);
        let load_error = |reason: String| RecognitionError::ModelLoad {
            model: model.to_string(),
            reason,
        };

        if self.loaded_model_path.as_deref() != Some(path.as_path()) {
            self.unload_model();
            let path_str = path
                .to_str()
                .ok_or_else(|| load_error(format!("non-utf8 model path {}", path.display())))?;
            if !path.is_file() {
                return Err(load_error(format!("model file not found: {}", path.display())));
            }
            let context =
                WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
                    .map_err(|err| load_error(err.to_string()))?;
            self.context = Some(context);
            self.loaded_model_path = Some(path);
        }

        self.context
            .as_ref()
            .ok_or_else(|| load_error("model not loaded".to_string()))
    }

    pub fn unload_model(&mut self) {
        self.loaded_model_path = None;
        self.context = None;
    }
}

impl Recognizer for WhisperRecognizer {
    fn default_model(&self) -> String {
        default_model_for(detect_execution_target()).to_string()
    }

    fn transcribe(
        &mut self,
        audio_path: &Path,
        request: &RecognitionRequest,
    ) -> Result<Recognition, RecognitionError> {
        let model = request.model.clone().unwrap_or_else(|| self.default_model());
        log::info!("loading {model} on {}...", detect_execution_target());

        let params = self.params.clone();
        let context = self.load_model(&model)?;
        let mut state = context
            .create_state()
            .map_err(|err| RecognitionError::ModelLoad {
                model: model.clone(),
                reason: err.to_string(),
            })?;

        log::info!("transcribing...");
        let samples = audio::load_samples(audio_path)?;

        let mut full_params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: params.beam_size,
            patience: -1.0,
        });
        full_params.set_language(request.language.as_deref());
        full_params.set_print_special(false);
        full_params.set_print_progress(false);
        full_params.set_print_realtime(false);
        full_params.set_print_timestamps(false);
        full_params.set_suppress_blank(params.suppress_blank);
        full_params.set_suppress_non_speech_tokens(params.suppress_non_speech_tokens);
        full_params.set_no_speech_thold(params.no_speech_thold);
        full_params.set_token_timestamps(true);
        full_params.set_split_on_word(true);
        full_params.set_max_len(1);

        let engine_error = |err: whisper_rs::WhisperError| RecognitionError::Transcription(err.to_string());

        state.full(full_params, &samples).map_err(engine_error)?;
        let num_segments = state.full_n_segments().map_err(engine_error)?;

        let mut words = Vec::new();
        for i in 0..num_segments {
            let text = state.full_get_segment_text(i).map_err(engine_error)?;
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            // whisper reports centiseconds
            let start = state.full_get_segment_t0(i).map_err(engine_error)? as f64 / 100.0;
            let end = state.full_get_segment_t1(i).map_err(engine_error)? as f64 / 100.0;
            words.push(Word::new(text, start, end.max(start)));
        }

        let duration = audio::samples_to_seconds(samples.len());
        log::info!("done. {} words in {:.1}s", words.len(), duration);

        Ok(Recognition { words, duration })
    }
}
