use anyhow::{bail, Context, Result};
use std::time::Duration;

use crate::persona;
use crate::types::{HarmBlockThreshold, HarmCategory, SafetySetting};
use crate::util::{is_local_endpoint_url, non_empty_env};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 400;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub safety: SafetyThresholds,
    pub request_timeout: Duration,
    pub persona: Persona,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyThresholds {
    pub harassment: HarmBlockThreshold,
    pub hate_speech: HarmBlockThreshold,
    pub sexually_explicit: HarmBlockThreshold,
    pub dangerous_content: HarmBlockThreshold,
}

impl SafetyThresholds {
    pub fn uniform(threshold: HarmBlockThreshold) -> Self {
        Self {
            harassment: threshold,
            hate_speech: threshold,
            sexually_explicit: threshold,
            dangerous_content: threshold,
        }
    }

    pub fn settings(&self) -> Vec<SafetySetting> {
        [
            (HarmCategory::Harassment, self.harassment),
            (HarmCategory::HateSpeech, self.hate_speech),
            (HarmCategory::SexuallyExplicit, self.sexually_explicit),
            (HarmCategory::DangerousContent, self.dangerous_content),
        ]
        .into_iter()
        .map(|(category, threshold)| SafetySetting {
            category,
            threshold,
        })
        .collect()
    }
}

impl Default for SafetyThresholds {
    fn default() -> Self {
        Self::uniform(HarmBlockThreshold::BlockMediumAndAbove)
    }
}

/// Texts that shape the assistant: greeting, choices, shortcuts and instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub greeting: Option<String>,
    pub initial_choices: Vec<String>,
    pub starter_prompts: Vec<String>,
    pub tips_prompt: String,
    pub inspiration_prompt: String,
    pub system_prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: persona::ASSISTANT_NAME.to_string(),
            greeting: Some(persona::GREETING.to_string()),
            initial_choices: persona::INITIAL_CHOICES.map(String::from).to_vec(),
            starter_prompts: persona::STARTER_PROMPTS.map(String::from).to_vec(),
            tips_prompt: persona::TIPS_PROMPT.to_string(),
            inspiration_prompt: persona::INSPIRATION_PROMPT.to_string(),
            system_prompt: persona::SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            safety: SafetyThresholds::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            persona: Persona::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let defaults = Config::default();

        let api_key = non_empty_env("GIFTWRAP_API_KEY").or_else(|| non_empty_env("GEMINI_API_KEY"));
        let api_url = non_empty_env("GIFTWRAP_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        let model = non_empty_env("GIFTWRAP_MODEL").unwrap_or(defaults.model);

        let temperature = match non_empty_env("GIFTWRAP_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .with_context(|| format!("GIFTWRAP_TEMPERATURE '{raw}' is not a number"))?,
            None => defaults.temperature,
        };
        let max_output_tokens = match non_empty_env("GIFTWRAP_MAX_OUTPUT_TOKENS") {
            Some(raw) => raw.parse::<u32>().with_context(|| {
                format!("GIFTWRAP_MAX_OUTPUT_TOKENS '{raw}' is not a positive integer")
            })?,
            None => defaults.max_output_tokens,
        };
        let request_timeout = match non_empty_env("GIFTWRAP_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.parse::<u64>().with_context(|| {
                format!("GIFTWRAP_REQUEST_TIMEOUT_SECS '{raw}' is not a number of seconds")
            })?),
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key,
            api_url,
            model,
            temperature,
            max_output_tokens,
            safety: load_safety_thresholds()?,
            request_timeout,
            persona: load_persona(defaults.persona),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            bail!(
                "Invalid GIFTWRAP_API_URL '{}': expected http:// or https:// URL",
                self.api_url
            );
        }

        if !self.is_local_endpoint() && self.api_key.is_none() {
            bail!(
                "GIFTWRAP_API_KEY (or GEMINI_API_KEY) must be set for non-local endpoints (url: '{}')",
                self.api_url
            );
        }

        if self.model.trim().is_empty() || self.model.contains('/') {
            bail!("Invalid model name: '{}'", self.model);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            bail!(
                "GIFTWRAP_TEMPERATURE must be between 0.0 and 2.0 (got {})",
                self.temperature
            );
        }

        if self.max_output_tokens == 0 {
            bail!("GIFTWRAP_MAX_OUTPUT_TOKENS must be greater than zero");
        }

        if self.request_timeout.is_zero() {
            bail!("GIFTWRAP_REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(())
    }

    pub fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.api_url)
    }
}

fn load_safety_thresholds() -> Result<SafetyThresholds> {
    let base = match non_empty_env("GIFTWRAP_SAFETY_THRESHOLD") {
        Some(raw) => parse_threshold("GIFTWRAP_SAFETY_THRESHOLD", &raw)?,
        None => HarmBlockThreshold::BlockMediumAndAbove,
    };
    let category = |name: &str| -> Result<HarmBlockThreshold> {
        match non_empty_env(name) {
            Some(raw) => parse_threshold(name, &raw),
            None => Ok(base),
        }
    };

    Ok(SafetyThresholds {
        harassment: category("GIFTWRAP_SAFETY_HARASSMENT")?,
        hate_speech: category("GIFTWRAP_SAFETY_HATE_SPEECH")?,
        sexually_explicit: category("GIFTWRAP_SAFETY_SEXUALLY_EXPLICIT")?,
        dangerous_content: category("GIFTWRAP_SAFETY_DANGEROUS_CONTENT")?,
    })
}

fn parse_threshold(name: &str, raw: &str) -> Result<HarmBlockThreshold> {
    match raw.parse::<HarmBlockThreshold>() {
        Ok(threshold) => Ok(threshold),
        Err(message) => bail!("{name}: {message}"),
    }
}

fn load_persona(mut persona: Persona) -> Persona {
    if let Some(greeting) = non_empty_env("GIFTWRAP_GREETING") {
        persona.greeting = Some(greeting);
    }
    if let Some(raw) = non_empty_env("GIFTWRAP_CHOICES") {
        persona.initial_choices = split_choice_list(&raw);
    }
    if let Some(prompt) = non_empty_env("GIFTWRAP_SYSTEM_PROMPT") {
        persona.system_prompt = prompt;
    }
    persona
}

/// Splits `a | b | c` into trimmed, non-empty entries.
pub fn split_choice_list(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(str::trim)
        .filter(|choice| !choice.is_empty())
        .map(String::from)
        .collect()
}
