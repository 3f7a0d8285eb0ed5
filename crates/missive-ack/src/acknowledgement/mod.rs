//! Acknowledgement synthesis: template transform into a shell, then the
//! verification outcome written into it.

mod builder;
mod transform;

pub use builder::{
    populate, Acknowledgement, AcknowledgementStatus, BuildError, CLASS_TAG, DETAIL_TAG,
    STATUS_TAG, SUBCLASS_TAG, WARNING_CODE_TAG, WARNING_DESCRIPTION_TAG,
};
pub use transform::{TemplateDirectory, TemplateTransform, TransformError};
