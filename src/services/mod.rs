pub mod fields;
pub mod media;
pub mod node_text;
pub mod normalizer;
pub mod root_selector;
pub mod visibility;

pub use node_text::node_to_text;
pub use normalizer::normalize;
pub use root_selector::{select_root, CandidateRoot, CandidateTier};
pub use visibility::{area, is_visible, viewport_overlap_area};
