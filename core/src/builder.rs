//! Transaction builder: staged file to [`PublishUnit`].

use crate::config::GalleryConfig;
use crate::error::BuildResult;
use crate::models::{PublishUnit, Tag};
use crate::staging::FileSource;

/// Turns staged files into tagged, signable units.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    app_name: String,
}

impl TransactionBuilder {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.app_name.clone())
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Read `file` fully and tag it.
    ///
    /// Tags, in order: `App-Name`, then `Content-Type` when the type can be
    /// resolved. Unresolvable types get no `Content-Type` tag.
    pub async fn build<F: FileSource>(&self, file: &F) -> BuildResult<PublishUnit> {
        let data = file.read_bytes().await?;

        let mut tags = vec![Tag::app_name(&self.app_name)];
        match file.content_type() {
            Some(content_type) => tags.push(Tag::content_type(content_type)),
            None => log::warn!("No content type for '{}', publishing untyped", file.name()),
        }

        log::debug!("Built unit for '{}' ({} bytes)", file.name(), data.len());
        Ok(PublishUnit::new(file.name(), data, tags))
    }
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TAG_APP_NAME, TAG_CONTENT_TYPE};
    use crate::testing::MemoryFile;
    use crate::error::BuildError;

    #[tokio::test]
    async fn test_build_tags_in_order() {
        let builder = TransactionBuilder::new("demo");
        let unit = builder.build(&MemoryFile::new("pic.png", vec![7; 4])).await.unwrap();

        assert_eq!(unit.name(), "pic.png");
        assert_eq!(unit.data(), &[7, 7, 7, 7]);
        assert_eq!(
            unit.tags(),
            &[Tag::new(TAG_APP_NAME, "demo"), Tag::new(TAG_CONTENT_TYPE, "image/png")]
        );
    }

    #[tokio::test]
    async fn test_declared_type_used() {
        let builder = TransactionBuilder::default();
        let file = MemoryFile::new("pic.png", vec![1]).with_type("image/jpeg");
        let unit = builder.build(&file).await.unwrap();
        assert_eq!(unit.content_type(), Some("image/jpeg"));
        assert_eq!(unit.tag(TAG_APP_NAME), Some("Arweave Wallet Kit Demo"));
    }

    #[tokio::test]
    async fn test_untyped_file_has_no_content_type_tag() {
        let builder = TransactionBuilder::default();
        let unit = builder.build(&MemoryFile::new("blob", vec![1])).await.unwrap();
        assert_eq!(unit.tags().len(), 1);
        assert_eq!(unit.content_type(), None);
    }

    #[tokio::test]
    async fn test_read_failure() {
        let builder = TransactionBuilder::default();
        let file = MemoryFile::new("a.png", vec![1]).failing("revoked");
        let err = builder.build(&file).await.unwrap_err();
        assert_eq!(err, BuildError::read("a.png", "revoked"));
    }

    #[tokio::test]
    async fn test_empty_file_is_still_built() {
        let builder = TransactionBuilder::default();
        let unit = builder.build(&MemoryFile::new("a.png", vec![])).await.unwrap();
        assert!(unit.data().is_empty());
        assert_eq!(unit.tags()[1], Tag::content_type("image/png"));
    }
}
