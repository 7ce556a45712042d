use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::CameraRecord;
use crate::stream::SelectError;

use super::filter::{filter, paginate, total_pages};

const SEARCH_IN_DEVELOPMENT: &str = "search by IP / phone / face is under development";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchType {
    #[default]
    #[serde(rename = "IP")]
    Ip,
    Phone,
    Face,
    Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerLevel {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub level: BannerLevel,
    pub text: String,
}

impl Banner {
    fn error(text: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            text: text.into(),
        }
    }

    fn info(text: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Info,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    CatalogLoaded(Vec<CameraRecord>),
    CatalogFailed(String),
    SetQuery(String),
    SetSearchType(SearchType),
    SubmitSearch,
    SetPage(usize),
    ToggleTools,
    ToggleDetection,
    ToggleLaser,
    StreamSelected(String),
    SelectionFailed(SelectError),
    CloseCamera,
    DismissBanner,
}

/// Immutable snapshot of the terminal. Every change goes through [`ViewState::apply`],
/// which returns the next snapshot.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    catalog: Arc<[CameraRecord]>,
    filtered: Arc<[CameraRecord]>,
    query: String,
    search_type: SearchType,
    page: usize,
    selected_stream: Option<String>,
    banner: Option<Banner>,
    tools_visible: bool,
    detection_enabled: bool,
    laser_enabled: bool,
    version: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedView {
    pub version: u64,
    pub query: String,
    pub search_type: SearchType,
    pub page: usize,
    pub total_pages: usize,
    pub show_pager: bool,
    pub total_cameras: usize,
    pub cameras: Vec<CameraRecord>,
    pub selected_stream: Option<String>,
    pub map_url: String,
    pub banner: Option<Banner>,
    pub tools_visible: bool,
    pub detection_enabled: bool,
    pub laser_enabled: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn apply(&self, action: &Action) -> Self {
        let mut next = self.clone();
        next.version = self.version + 1;

        match action {
            Action::CatalogLoaded(records) => {
                next.catalog = records.clone().into();
                next.refilter();
            }
            Action::CatalogFailed(cause) => {
                next.catalog = Arc::from(Vec::new());
                next.refilter();
                next.banner = Some(Banner::error(format!("failed to load cameras: {cause}")));
            }
            Action::SetQuery(query) => {
                if *query != self.query {
                    next.query = query.clone();
                    next.refilter();
                }
            }
            Action::SetSearchType(search_type) => next.search_type = *search_type,
            Action::SubmitSearch => next.banner = Some(Banner::info(SEARCH_IN_DEVELOPMENT)),
            Action::SetPage(page) => {
                next.page = (*page).clamp(1, self.total_pages().max(1));
            }
            Action::ToggleTools => next.tools_visible = !self.tools_visible,
            Action::ToggleDetection => {
                if self.selected_stream.is_some() {
                    next.detection_enabled = !self.detection_enabled;
                }
            }
            Action::ToggleLaser => {
                if self.selected_stream.is_some() {
                    next.laser_enabled = !self.laser_enabled;
                }
            }
            Action::StreamSelected(url) => {
                next.selected_stream = Some(url.clone());
                next.banner = None;
            }
            Action::SelectionFailed(err) => next.banner = Some(Banner::error(err.to_string())),
            Action::CloseCamera => {
                next.selected_stream = None;
                next.detection_enabled = false;
                next.laser_enabled = false;
            }
            Action::DismissBanner => next.banner = None,
        }

        next
    }

    fn refilter(&mut self) {
        self.filtered = filter(&self.catalog, &self.query).into();
        self.page = 1;
    }

    pub fn catalog(&self) -> &[CameraRecord] {
        &self.catalog
    }

    pub fn filtered(&self) -> &[CameraRecord] {
        &self.filtered
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered.len())
    }

    pub fn show_pager(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn current_page(&self) -> &[CameraRecord] {
        paginate(&self.filtered, self.page)
    }

    pub fn selected_stream(&self) -> Option<&str> {
        self.selected_stream.as_deref()
    }

    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    pub fn tools_visible(&self) -> bool {
        self.tools_visible
    }

    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }

    /// The detection loop runs only while a camera is on screen.
    pub fn detection_active(&self) -> bool {
        self.detection_enabled && self.selected_stream.is_some()
    }

    pub fn laser_enabled(&self) -> bool {
        self.laser_enabled
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find_camera(&self, id: u64) -> Option<&CameraRecord> {
        self.catalog.iter().find(|cam| cam.id == id)
    }

    pub fn render(&self, map_url: &str) -> RenderedView {
        RenderedView {
            version: self.version(),
            query: self.query().to_string(),
            search_type: self.search_type(),
            page: self.page(),
            total_pages: self.total_pages(),
            show_pager: self.show_pager(),
            total_cameras: self.filtered().len(),
            cameras: self.current_page().to_vec(),
            selected_stream: self.selected_stream.clone(),
            map_url: map_url.to_string(),
            banner: self.banner.clone(),
            tools_visible: self.tools_visible(),
            detection_enabled: self.detection_enabled(),
            laser_enabled: self.laser_enabled(),
        }
    }
}
