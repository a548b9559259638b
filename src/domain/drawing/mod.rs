//! Drawing guides and the topic metadata they are built from.

mod guide;
mod status;

pub use guide::{
    default_guide_steps, image_object_key, DrawingGuide, Evaluation, GuideStep, ImageRef, TopicMetadata,
    GUIDE_STEP_COUNT,
};
pub use status::MetadataStatus;
