use crate::core::config::LlmSettings;

/// Fixed sampling knobs sent with every completion request.
#[derive(Debug, Clone)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            max_tokens: 512,
        }
    }
}

impl From<&LlmSettings> for SamplingConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
        }
    }
}
