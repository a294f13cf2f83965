//! Route-data assembly for one UI request.

use crate::error::RiverError;
use crate::framework::output::{assemble, has_root_data, AssemblyInput, UIRouteOutput};
use crate::framework::river::River;
use crate::head::dedupe;
use crate::loaders::truncate;
use crate::response::{merge_mutations, MergedResponse, ResponseOutcome};
use crate::tasks::RequestCtx;

/// Route data, or the terminal decision that replaces it.
#[derive(Debug)]
pub enum UiRouteData {
    /// A segment redirected or raised an error; nothing else is rendered.
    Terminal(MergedResponse),
    /// Normal outcome; merged headers and cookies still need applying.
    Ready {
        output: Box<UIRouteOutput>,
        merged: MergedResponse,
    },
}

impl River {
    /// Match, run loaders, merge mutations and assemble the route payload.
    pub async fn ui_route_data(&self, request: &RequestCtx) -> Result<UiRouteData, RiverError> {
        let path = request.decoded_path().map_err(|e| {
            tracing::warn!(path = %request.path(), error = %e, "Undecodable request path");
            RiverError::InvalidPath
        })?;
        let Some(matches) = self.matcher.find_nested_matches(&path) else {
            tracing::warn!(path = %request.path(), "Not found");
            return Err(RiverError::NotFound);
        };

        let (defaults, results) = tokio::join!(
            self.default_head.default_head_elements(request),
            self.orchestrator.run(&matches, request),
        );

        let merged = merge_mutations(results.iter().map(|r| r.mutation.as_ref()));
        match merged.outcome() {
            ResponseOutcome::Normal => {}
            ResponseOutcome::Redirect { target, status } => {
                tracing::debug!(path = %request.path(), target = %target, status = %status, "Segment redirected");
                return Ok(UiRouteData::Terminal(merged));
            }
            ResponseOutcome::Error(status) => {
                tracing::error!(path = %request.path(), status = %status, "Segment signalled an error response");
                return Ok(UiRouteData::Terminal(merged));
            }
        }

        let defaults = defaults.map_err(|e| {
            tracing::error!(path = %request.path(), error = %e, "Could not get default head elements");
            RiverError::DefaultHead(e)
        })?;

        let has_root_data = has_root_data(&matches, &results);
        let chain = truncate(&results);
        let head = dedupe(&defaults, &chain.head_elements);
        let metadata = self
            .metadata_cache
            .resolve(&matches.matches, self.resolver.as_ref(), self.options.is_dev);
        let css_bundles = self.resolver.css_bundles_for(&metadata.deps);

        let output = assemble(AssemblyInput {
            matches: &matches,
            has_root_data,
            chain,
            head,
            metadata: &metadata,
            css_bundles,
            vite_dev_url: self.options.active_vite_dev_url(),
        });

        Ok(UiRouteData::Ready {
            output: Box::new(output),
            merged,
        })
    }
}
