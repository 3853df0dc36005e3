//! Read-only environment handed to every rules operation.
//!
//! `Env` replaces ambient global lookups: the content registry and engine
//! configuration are constructed once by the caller and passed by reference
//! into aggregation, the damage pipeline, the effect lifecycle and fights.

use crate::config::EngineConfig;
use crate::content::{ContentRegistry, DirectiveDef};

#[derive(Clone, Copy, Debug)]
pub struct Env<'a> {
    pub content: &'a ContentRegistry,
    pub config: &'a EngineConfig,
}

impl<'a> Env<'a> {
    pub fn new(content: &'a ContentRegistry, config: &'a EngineConfig) -> Self {
        Self { content, config }
    }

    /// Enabled directives that resolve in the registry, in configured order.
    pub fn directives(&self) -> impl Iterator<Item = &'a DirectiveDef> + 'a {
        let content = self.content;
        self.config
            .enabled_directives
            .iter()
            .filter_map(move |id| content.directives.get(id))
    }
}
