//! Splitting the leaderboard into the viewer's row and everyone else

use crate::filter::VerdictFilter;
use crate::markup::{self, RowContext, RowKind};
use crate::model::LeaderboardEntry;

/// The leaderboard as it is about to be drawn
#[derive(Debug)]
pub struct Board<'a> {
    /// The viewer's row, looked up in the unfiltered list
    pub viewer: Option<&'a LeaderboardEntry>,
    /// Everyone else matching the filter, capped at the limit, in rank order
    pub others: Vec<&'a LeaderboardEntry>,
    /// Rows matching the filter, the viewer included
    pub matching: usize,
}

impl<'a> Board<'a> {
    pub fn partition(
        entries: &'a [LeaderboardEntry],
        viewer: &str,
        filter: &VerdictFilter,
        limit: usize,
    ) -> Self {
        let is_viewer = |entry: &LeaderboardEntry| !viewer.is_empty() && entry.username == viewer;

        let viewer_row = entries.iter().find(|entry| is_viewer(*entry));
        let matching = entries
            .iter()
            .filter(|entry| filter.matches(&entry.verdict))
            .count();
        let others = entries
            .iter()
            .filter(|entry| !is_viewer(*entry))
            .filter(|entry| filter.matches(&entry.verdict))
            .take(limit)
            .collect();

        Self {
            viewer: viewer_row,
            others,
            matching,
        }
    }

    /// Nothing matches the filter, so the empty state is shown instead
    pub fn is_empty(&self) -> bool {
        self.matching == 0
    }

    pub fn general_title(&self) -> &'static str {
        if self.viewer.is_some() {
            "Global Leaderboard"
        } else {
            "Leaderboard"
        }
    }

    pub fn render(&self, ctx: &RowContext<'_>) -> String {
        if self.is_empty() {
            return markup::empty_state();
        }

        let mut html = String::new();
        if let Some(me) = self.viewer {
            let row = markup::player_row(me, RowKind::Viewer, ctx);
            html.push_str(&markup::section("Your Position", RowKind::Viewer, &row));
        }
        if !self.others.is_empty() {
            let rows: String = self
                .others
                .iter()
                .map(|entry| markup::player_row(entry, RowKind::Standard, ctx))
                .collect();
            html.push_str(&markup::section(
                self.general_title(),
                RowKind::Standard,
                &rows,
            ));
        }
        html
    }
}
