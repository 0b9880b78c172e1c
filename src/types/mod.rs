mod api;
mod turn;

pub use api::{
    Candidate, Content, ErrorBody, ErrorResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, HarmBlockThreshold, HarmCategory, Part,
    PromptFeedback, SafetySetting,
};
pub use turn::{Speaker, Turn};
