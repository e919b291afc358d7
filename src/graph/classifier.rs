use crate::state::{PageMap, PageOutcome, PageRecord, PageStatus};
use serde::Serialize;
use std::collections::HashSet;

/// Source label for the edge that reports a page's own status
pub const DIRECT_ACCESS: &str = "direct access";

/// One discovered link, classified by the status of its target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEdge {
    /// URL of the linking page, or [`DIRECT_ACCESS`]
    pub source_page: String,
    pub target_url: String,
    pub status: PageStatus,
    /// 0 when the target was never rendered
    pub status_code: u16,
    pub depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Classified, deduplicated edge lists
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedLinks {
    pub healthy: Vec<LinkEdge>,
    pub broken: Vec<LinkEdge>,
    pub redirect: Vec<LinkEdge>,
}

impl ClassifiedLinks {
    fn push(&mut self, edge: LinkEdge) {
        match edge.status {
            PageStatus::Healthy => self.healthy.push(edge),
            PageStatus::Broken => self.broken.push(edge),
            PageStatus::Redirect => self.redirect.push(edge),
        }
    }
}

/// Classifies every `(page, outgoing link)` pair against the visited pages
///
/// - target not visited, or visited as Broken: Broken edge
/// - target visited as Redirect: Redirect edge
/// - otherwise: Healthy edge
///
/// Each visited page also contributes one [`DIRECT_ACCESS`] edge carrying its
/// own status. Edges are deduplicated by `(target, source)`.
pub fn classify_links(pages: &PageMap) -> ClassifiedLinks {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut links = ClassifiedLinks::default();

    for page in pages.iter() {
        for target in page.outgoing_links() {
            if !seen.insert((target.to_string(), page.url.clone())) {
                continue;
            }

            let edge = match pages.get(target) {
                Some(record) => edge_to(record, &page.url),
                None => LinkEdge {
                    source_page: page.url.clone(),
                    target_url: target.to_string(),
                    status: PageStatus::Broken,
                    status_code: 0,
                    depth: page.depth + 1,
                    redirect_target: None,
                    reason: Some("Not visited within crawl bounds".to_string()),
                },
            };
            links.push(edge);
        }
    }

    for page in pages.iter() {
        if seen.insert((page.url.clone(), DIRECT_ACCESS.to_string())) {
            links.push(edge_to(page, DIRECT_ACCESS));
        }
    }

    links
}

fn edge_to(target: &PageRecord, source: &str) -> LinkEdge {
    let reason = match &target.outcome {
        PageOutcome::Broken { reason, .. } => Some(reason.clone()),
        _ => None,
    };

    LinkEdge {
        source_page: source.to_string(),
        target_url: target.url.clone(),
        status: target.status(),
        status_code: target.status_code(),
        depth: target.depth,
        redirect_target: target.redirect_target().map(str::to_string),
        reason,
    }
}
