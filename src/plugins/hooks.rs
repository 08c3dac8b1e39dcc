//! Hook pipeline
//!
//! Hooks are capability objects invoked at two fixed points of a resolution:
//! after the layers are merged, and after the request is assembled. Each may
//! return a replacement value or `None` to keep the current one. Errors are
//! propagated as-is; hooks are never retried.

use tracing::debug;

use crate::config::Mapping;
use crate::errors::Result;
use crate::request::RequestDescriptor;

/// Extension points in a resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    /// Called with the merged configuration
    AfterConfig,
    /// Called with the assembled request
    AfterPrepare,
}

impl HookPoint {
    /// Get hook name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            HookPoint::AfterConfig => "after_config",
            HookPoint::AfterPrepare => "after_prepare",
        }
    }

    /// Get all available hooks
    pub fn all() -> [Self; 2] {
        [HookPoint::AfterConfig, HookPoint::AfterPrepare]
    }
}

/// Transform applied to the merged configuration
pub trait ConfigTransform {
    fn after_config(&self, merged: &Mapping) -> Result<Option<Mapping>>;
}

/// Transform applied to the assembled request
pub trait RequestTransform {
    fn after_prepare(&self, request: &RequestDescriptor) -> Result<Option<RequestDescriptor>>;
}

/// Registered transforms, applied in registration order
#[derive(Default)]
pub struct HookPipeline {
    config_transforms: Vec<Box<dyn ConfigTransform>>,
    request_transforms: Vec<Box<dyn RequestTransform>>,
}

impl std::fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookPipeline")
            .field("config_transforms", &self.config_transforms.len())
            .field("request_transforms", &self.request_transforms.len())
            .finish()
    }
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_config(&mut self, transform: impl ConfigTransform + 'static) -> &mut Self {
        self.config_transforms.push(Box::new(transform));
        self
    }

    pub fn register_request(&mut self, transform: impl RequestTransform + 'static) -> &mut Self {
        self.request_transforms.push(Box::new(transform));
        self
    }

    /// Check if any transforms handle a hook point
    pub fn has_handlers(&self, point: HookPoint) -> bool {
        match point {
            HookPoint::AfterConfig => !self.config_transforms.is_empty(),
            HookPoint::AfterPrepare => !self.request_transforms.is_empty(),
        }
    }

    pub fn is_empty(&self) -> bool {
        HookPoint::all().iter().all(|p| !self.has_handlers(*p))
    }

    /// Run every config transform over the merged mapping
    pub fn apply_config(&self, merged: Mapping) -> Result<Mapping> {
        let mut current = merged;
        for transform in &self.config_transforms {
            if let Some(replaced) = transform.after_config(&current)? {
                debug!(hook = HookPoint::AfterConfig.as_str(), "Hook replaced configuration");
                current = replaced;
            }
        }
        Ok(current)
    }

    /// Run every request transform over the descriptor
    pub fn apply_request(&self, request: RequestDescriptor) -> Result<RequestDescriptor> {
        let mut current = request;
        for transform in &self.request_transforms {
            if let Some(replaced) = transform.after_prepare(&current)? {
                debug!(hook = HookPoint::AfterPrepare.as_str(), "Hook replaced request");
                current = replaced;
            }
        }
        Ok(current)
    }
}

impl<F> ConfigTransform for F
where
    F: Fn(&Mapping) -> Result<Option<Mapping>>,
{
    fn after_config(&self, merged: &Mapping) -> Result<Option<Mapping>> {
        self(merged)
    }
}

impl<F> RequestTransform for F
where
    F: Fn(&RequestDescriptor) -> Result<Option<RequestDescriptor>>,
{
    fn after_prepare(&self, request: &RequestDescriptor) -> Result<Option<RequestDescriptor>> {
        self(request)
    }
}
