use std::future::Future;
use std::pin::Pin;

use oralscan_core::models::result::ResultModel;

use crate::error::ClassificationError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Anything that can turn an image into a two-level result.
///
/// Implemented by [`crate::client::ClassificationClient`] for the remote
/// service; the workflow depends only on this trait so tests can substitute
/// a scripted classifier. Methods return boxed futures for dyn compatibility.
pub trait Classifier: Send + Sync {
    fn classify<'a>(
        &'a self,
        image: &'a [u8],
        mime_type: &'a str,
    ) -> BoxFuture<'a, Result<ResultModel, ClassificationError>>;
}
