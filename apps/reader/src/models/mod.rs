pub mod article;
pub mod level;

pub use article::{Article, ArtifactKind};
pub use level::{LengthBucket, Level};
