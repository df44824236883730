//! Browser `File` objects as staged files, with object-URL previews.

use async_trait::async_trait;
use gallery::error::{BuildError, BuildResult};
use gallery::{FileSource, PreviewAllocator, PreviewHandle};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FileList, Url};

/// A file picked or dropped by the user.
#[derive(Clone, Debug)]
pub struct BrowserFile {
    file: File,
    name: String,
    declared_type: Option<String>,
    size: u64,
}

impl BrowserFile {
    pub fn new(file: File) -> Self {
        let declared = file.type_();
        Self {
            name: file.name(),
            declared_type: (!declared.is_empty()).then_some(declared),
            size: file.size() as u64,
            file,
        }
    }

    /// Every file in a `FileList`, in order.
    pub fn from_list(list: &FileList) -> Vec<Self> {
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(Self::new)
            .collect()
    }

    pub fn file(&self) -> &File {
        &self.file
    }
}

#[async_trait(?Send)]
impl FileSource for BrowserFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    fn size(&self) -> u64 {
        self.size
    }

    async fn read_bytes(&self) -> BuildResult<Vec<u8>> {
        let buffer = JsFuture::from(self.file.array_buffer())
            .await
            .map_err(|e| BuildError::read(&self.name, format!("{:?}", e)))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

/// `blob:` URLs from `URL.createObjectURL`, revoked on release.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectUrls;

impl PreviewAllocator<BrowserFile> for ObjectUrls {
    fn acquire(&self, file: &BrowserFile) -> PreviewHandle {
        match Url::create_object_url_with_blob(file.file()) {
            Ok(url) => PreviewHandle::new(url),
            Err(e) => {
                log::warn!("No preview for '{}': {:?}", file.name(), e);
                PreviewHandle::new(String::new())
            }
        }
    }

    fn release(&self, handle: &PreviewHandle) {
        if handle.url().is_empty() {
            return;
        }
        if let Err(e) = Url::revoke_object_url(handle.url()) {
            log::warn!("Failed to revoke {}: {:?}", handle.url(), e);
        }
    }
}
