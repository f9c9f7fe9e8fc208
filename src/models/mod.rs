pub mod extraction;

pub use extraction::{
    ExtractedOption, ExtractionResult, NO_NUMBER_PLACEHOLDER, NO_OPTIONS_PLACEHOLDER,
    NO_STIMULUS_PLACEHOLDER,
};
