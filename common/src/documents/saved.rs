use crate::{
    data::{
        cards::{PromptCard, ResponseCard},
        vec_set::VecSet,
    },
    text::{render, RenderOptions, Rendered},
};
use serde::{Deserialize, Serialize};

/// A prompt together with the responses a player picked for it
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SavedPlay {
    #[serde(rename = "blackCard")]
    pub prompt: PromptCard,
    #[serde(rename = "whiteCards")]
    pub responses: VecSet<ResponseCard>,
}

impl SavedPlay {
    pub fn new(prompt: PromptCard, responses: VecSet<ResponseCard>) -> Self {
        SavedPlay { prompt, responses }
    }

    pub fn rendered(&self, options: RenderOptions) -> Rendered {
        render(&self.prompt, &self.responses, options)
    }

    /// The filled-in prompt. Derived on demand, never stored.
    pub fn rendered_text(&self) -> String {
        self.rendered(RenderOptions::default()).to_plain()
    }
}
