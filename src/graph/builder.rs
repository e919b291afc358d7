use crate::state::PageMap;

/// Computes incoming-link sets and orphan flags over a finished crawl
///
/// Every outgoing link that points at another visited page adds the source
/// URL to the target's `incoming_links`. A page is an orphan when nothing
/// links to it, except the start page which is always exempt.
///
/// This needs the complete page map; it cannot run while the crawl is still
/// discovering pages.
pub fn build_link_graph(pages: &mut PageMap, start_url: &str) {
    let edges: Vec<(String, String)> = pages
        .iter()
        .flat_map(|page| {
            page.outgoing_links()
                .filter(|target| *target != page.url.as_str())
                .map(|target| (page.url.clone(), target.to_string()))
                .collect::<Vec<_>>()
        })
        .collect();

    for (source, target) in edges {
        if let Some(record) = pages.get_mut(&target) {
            record.incoming_links.insert(source);
        }
    }

    let urls: Vec<String> = pages.urls().map(str::to_string).collect();
    for url in urls {
        if let Some(record) = pages.get_mut(&url) {
            record.is_orphan = record.incoming_links.is_empty() && url != start_url;
        }
    }
}
