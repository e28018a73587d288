// OpenAI speech endpoint client

mod tts;

pub use tts::OpenAiClient;
