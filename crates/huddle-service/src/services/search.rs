//! Search service
//!
//! Substring search across every message the caller can reach, i.e. the
//! logs of channels they belong to.

use crate::dto::{MessageView, SearchResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Search service
pub struct SearchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SearchService<'a> {
    /// Create a new SearchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Messages containing `query`, with reaction slots annotated for the
    /// caller. An empty query matches nothing.
    pub fn search(&self, token: &str, query: &str) -> ServiceResult<SearchResponse> {
        let actor = self.ctx.resolve(token)?;
        let hits = self.ctx.store().search(actor, query)?;
        Ok(SearchResponse {
            messages: hits
                .iter()
                .map(|m| MessageView::for_viewer(m, actor))
                .collect(),
        })
    }
}
