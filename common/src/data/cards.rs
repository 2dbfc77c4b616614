use serde::{Deserialize, Serialize};

/// Index of a pack within the catalog document
pub type PackId = usize;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct ResponseCard {
    pub text: String,
    pub pack: PackId,
}

impl ResponseCard {
    pub fn new<S: Into<String>>(text: S, pack: PackId) -> Self {
        ResponseCard {
            text: text.into(),
            pack,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Debug)]
pub struct PromptCard {
    pub text: String,
    pub pick: u32,
    pub pack: PackId,
}

impl PromptCard {
    pub fn new<S: Into<String>>(text: S, pick: u32, pack: PackId) -> Self {
        PromptCard {
            text: text.into(),
            pick,
            pack,
        }
    }

    /// Number of `_` placeholders in the prompt text
    pub fn blanks(&self) -> usize {
        self.text.matches('_').count()
    }
}

#[derive(Clone, Debug)]
pub struct Pack {
    pub id: PackId,
    pub name: String,
    pub official: bool,
    pub is_english: bool,
    pub responses: Vec<ResponseCard>,
    pub prompts: Vec<PromptCard>,
}

impl Pack {
    pub fn preview(&self) -> PackPreview {
        PackPreview {
            id: self.id,
            name: self.name.clone(),
            official: self.official,
            is_english: self.is_english,
            response_count: self.responses.len(),
            prompt_count: self.prompts.len(),
        }
    }

    /// A pack can only be played on its own if it has at least one card of each kind
    pub fn is_playable(&self) -> bool {
        !self.responses.is_empty() && !self.prompts.is_empty()
    }
}

impl PartialEq for Pack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.name == other.name
    }
}

impl Eq for Pack {}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PackPreview {
    pub id: PackId,
    pub name: String,
    pub official: bool,
    pub is_english: bool,
    pub response_count: usize,
    pub prompt_count: usize,
}

impl PackPreview {
    pub fn card_count(&self) -> usize {
        self.response_count + self.prompt_count
    }
}

/// The subset of pack metadata needed to decide which packs are active. Lets the selection logic
/// run over full [Packs](Pack) or lightweight [previews](PackPreview) alike.
pub trait PackInfo {
    fn id(&self) -> PackId;
    fn name(&self) -> &str;
    fn official(&self) -> bool;
    fn is_english(&self) -> bool;
}

impl PackInfo for Pack {
    fn id(&self) -> PackId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn official(&self) -> bool {
        self.official
    }

    fn is_english(&self) -> bool {
        self.is_english
    }
}

impl PackInfo for PackPreview {
    fn id(&self) -> PackId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn official(&self) -> bool {
        self.official
    }

    fn is_english(&self) -> bool {
        self.is_english
    }
}

/// Non-English packs ship as a single pack named after their language
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Language {
    Czech,
    Italian,
    Catalan,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Czech, Language::Italian, Language::Catalan];

    /// The pack name, which doubles as the feature flag key
    pub fn name(self) -> &'static str {
        match self {
            Language::Czech => "Czech",
            Language::Italian => "Italian",
            Language::Catalan => "Catalan",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|lang| lang.name() == name)
    }
}

pub fn is_english_pack(name: &str) -> bool {
    Language::from_name(name).is_none()
}
