mod filter;
mod state;

pub use state::{Action, RenderedView, SearchType, ViewState};
