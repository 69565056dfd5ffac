use std::future::Future;
use std::pin::Pin;

use crate::error::EnrichmentError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A generative-text backend: one prompt in, raw model text out.
///
/// Methods return boxed futures for dyn compatibility.
pub trait TextGenerator: Send + Sync {
    /// Backend label for logs, e.g. `"gemini:gemini-2.0-flash"`.
    fn name(&self) -> &str;

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, EnrichmentError>>;
}
