use crate::catalog::CameraRecord;

pub const PAGE_SIZE: usize = 10;

/// Records whose location contains `query` (case-insensitive) or whose id,
/// as a decimal string, contains `query`. Catalog order is kept.
pub fn filter(catalog: &[CameraRecord], query: &str) -> Vec<CameraRecord> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .filter(|cam| {
            cam.location.to_lowercase().contains(&needle) || cam.id.to_string().contains(query)
        })
        .cloned()
        .collect()
}

pub fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Items of the 1-based `page`. Pages past the end are empty.
pub fn paginate(filtered: &[CameraRecord], page: usize) -> &[CameraRecord] {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(PAGE_SIZE).min(filtered.len());
    let end = page.saturating_mul(PAGE_SIZE).min(filtered.len());
    &filtered[start..end]
}
