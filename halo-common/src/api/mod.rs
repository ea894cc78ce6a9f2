//! API request/response types shared across Halo crates

pub mod types;

pub use types::{
    ErrorBody, PassageResponse, TranslationOption, DEFAULT_TRANSLATION, TRANSLATIONS,
};
