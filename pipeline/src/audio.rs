//! Audio transcription stage.
//!
//! Transcription has no JSON contract - the model's text response is the
//! artifact - so this stage talks to the invoker directly instead of going
//! through the extraction protocol.

use std::path::Path;

use siniestro_extraction::{ContentBlock, Message, ModelInvoker, PromptStore};

use crate::errors::PipelineError;
use crate::media::media_block_from_file;

/// Prompt name for the audio transcription.
pub const TRANSCRIPTION_PROMPT: &str = "transcription_audio";

/// Transcribes a declaration audio file to plain text.
pub async fn transcribe_audio(
    invoker: &dyn ModelInvoker,
    prompts: &PromptStore,
    file: &Path,
) -> Result<String, PipelineError> {
    let Some(system_prompt) = prompts.get(TRANSCRIPTION_PROMPT) else {
        return Err(PipelineError::PromptMissing {
            name: TRANSCRIPTION_PROMPT.to_string(),
        });
    };

    let media = media_block_from_file(file)?;
    let messages = vec![
        Message::system(system_prompt),
        Message::user(vec![
            ContentBlock::text(
                "Procesa el siguiente audio según las instrucciones del sistema:",
            ),
            media,
        ]),
    ];

    tracing::info!(file = %file.display(), "sending audio for transcription");
    let response = invoker.invoke(&messages).await?;
    Ok(response.into_text())
}
