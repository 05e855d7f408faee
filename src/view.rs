//! Pure mapping from presentation state to what the dashboard shows.
//!
//! Nothing here touches egui, so the rendering rules can be tested without a
//! window. `app` paints the resulting [`DashboardView`].

use chrono::{DateTime, Utc};

use crate::format::{format_age, format_count, format_time_of_day};
use crate::models::TrendItem;
use crate::state::{PresentationState, Status};

pub const REFRESH_LABEL: &str = "Refresh";
pub const REFRESHING_LABEL: &str = "Refreshing...";
pub const LOADING_TEXT: &str = "Loading trends...";
pub const EMPTY_TEXT: &str = "No trends found.";

/// Status banner above the card grid. At most one is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Error(String),
    Loading,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshControl {
    pub enabled: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendCard {
    pub id: String,
    pub title: String,
    pub url: String,
    pub subreddit_label: String,
    pub score: String,
    pub comments: String,
    pub age: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub banner: Option<Banner>,
    pub cards: Vec<TrendCard>,
    pub refresh: RefreshControl,
    pub last_updated: Option<String>,
}

/// Build the view for `state`. `now` only feeds the relative post ages.
pub fn render(state: &PresentationState, now: DateTime<Utc>) -> DashboardView {
    let trends = state.trends();

    // Priority: error, then first-load spinner, then empty notice, then the list.
    // An error keeps the last good list visible underneath the banner.
    let (banner, show_cards) = match state.status() {
        Status::Error => (
            Some(Banner::Error(
                state.error_message().unwrap_or_default().to_string(),
            )),
            true,
        ),
        Status::Loading if trends.is_empty() => (Some(Banner::Loading), false),
        _ if trends.is_empty() => (Some(Banner::Empty), false),
        _ => (None, true),
    };

    let cards = if show_cards {
        trends.iter().map(|item| card(item, now)).collect()
    } else {
        Vec::new()
    };

    let refresh = if state.is_loading() {
        RefreshControl {
            enabled: false,
            label: REFRESHING_LABEL,
        }
    } else {
        RefreshControl {
            enabled: true,
            label: REFRESH_LABEL,
        }
    };

    DashboardView {
        banner,
        cards,
        refresh,
        last_updated: state.last_updated().map(|at| format_time_of_day(&at)),
    }
}

fn card(item: &TrendItem, now: DateTime<Utc>) -> TrendCard {
    TrendCard {
        id: item.id.clone(),
        // Reddit titles arrive HTML-escaped ("Q&amp;A")
        title: html_escape::decode_html_entities(&item.title).into_owned(),
        url: item.url.clone(),
        subreddit_label: format!("r/{}", item.subreddit),
        score: format_count(item.score),
        comments: format_count(item.comments),
        age: item.created_at().map(|created| format_age(created, now)),
    }
}
