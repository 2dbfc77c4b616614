pub mod data;
pub mod documents;
pub mod text;

pub use data::{
    cards::{Language, Pack, PackId, PackInfo, PackPreview, PromptCard, ResponseCard},
    selection::{PackSelectionMode, SelectionMode},
    vec_set::VecSet,
};
pub use documents::{FeatureFlags, Preferences, SavedPlay};
