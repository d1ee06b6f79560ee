//! HTML fragments written into `#leaderboard-content`

use crate::format::{escape_html, global_rank, one_decimal, percent};
use crate::model::LeaderboardEntry;

/// `data-action` value of every control that forces a fresh load
pub const RELOAD_ACTION: &str = "reload";

/// Hover annotation on badges whose analysis is too old
pub const EXPIRED_ANNOTATION: &str = "Expired";

/// Inputs a row needs besides the entry itself
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub now_ms: f64,
    /// Analyses older than this get the expired annotation
    pub expiry_ms: f64,
    pub fallback_avatar: &'a str,
}

/// Which section a row is rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The viewer's own row in "Your Position"
    Viewer,
    /// Any row in the general section
    Standard,
}

pub fn loading_state() -> String {
    r#"<div class="loading">
  <div class="loading-spinner"></div>
  <p>Loading leaderboard...</p>
  <p class="loading-tip">This may take a moment for the first load</p>
</div>"#
        .to_string()
}

pub fn error_state(message: &str) -> String {
    format!(
        r#"<div class="empty-state error-state">
  <h3>⚠️ Loading Error</h3>
  <p>{message}</p>
  <button type="button" class="retry-btn" data-action="{action}">Try Again</button>
  <p class="error-tip">If this continues, please check your connection or try refreshing the page</p>
</div>"#,
        message = escape_html(message),
        action = RELOAD_ACTION,
    )
}

pub fn empty_state() -> String {
    format!(
        r#"<div class="empty-state">
  <h3>No Players Found</h3>
  <p>No players match the current filters.</p>
  <button type="button" class="retry-btn" data-action="{action}">Refresh Data</button>
</div>"#,
        action = RELOAD_ACTION,
    )
}

/// A titled table: header row followed by `rows`
pub fn section(title: &str, kind: RowKind, rows: &str) -> String {
    let (table_class, header_class) = match kind {
        RowKind::Viewer => (
            "leaderboard-table current-user-table",
            "table-header current-user-header",
        ),
        RowKind::Standard => ("leaderboard-table", "table-header"),
    };
    format!(
        r#"<div class="leaderboard-section">
  <h2 class="section-title">{title}</h2>
  <div class="{table_class}">
    <div class="{header_class}">
      <div>Rank</div>
      <div>Player</div>
      <div class="recent-skill">Recent</div>
      <div class="peak-skill">Peak</div>
      <div class="skill-match">Match</div>
      <div class="confidence">Confidence</div>
      <div>Verdict</div>
    </div>
{rows}  </div>
</div>"#,
        title = escape_html(title),
    )
}

pub fn player_row(entry: &LeaderboardEntry, kind: RowKind, ctx: &RowContext<'_>) -> String {
    let viewer = kind == RowKind::Viewer;
    let row_class = if viewer {
        "table-row current-user-row"
    } else {
        "table-row"
    };
    let rank_class = if viewer {
        "rank-cell current-user-rank".to_string()
    } else if (1..=3).contains(&entry.rank) {
        format!("rank-cell rank-{}", entry.rank)
    } else {
        "rank-cell".to_string()
    };
    let name_class = if viewer {
        "player-name current-user-name"
    } else {
        "player-name"
    };
    let avatar_class = if viewer {
        "player-avatar current-user-avatar"
    } else {
        "player-avatar"
    };
    let skill_class = if viewer {
        "skill-cell current-user-skill"
    } else {
        "skill-cell"
    };
    let you_badge = if viewer {
        r#" <span class="you-badge">You</span>"#
    } else {
        ""
    };

    let avatar = entry
        .avatar_url
        .as_deref()
        .filter(|url| !url.is_empty())
        .unwrap_or(ctx.fallback_avatar);
    let username = escape_html(&entry.username);

    format!(
        r#"    <div class="{row_class}">
      <div class="{rank_class}">#{rank}</div>
      <div class="player-cell">
        <img src="{avatar}" alt="{username}" class="{avatar_class}" data-fallback="{fallback}" />
        <div class="player-info">
          <div class="{name_class}">{username}{you_badge}</div>
          <div class="player-rank">{global}</div>
        </div>
      </div>
      <div class="{skill_class} recent-skill">{recent}</div>
      <div class="{skill_class} peak-skill">{peak}</div>
      <div class="{skill_class} skill-match">{matched}</div>
      <div class="{skill_class} confidence">{confidence}</div>
      <div class="verdict-cell">{badge}</div>
    </div>
"#,
        rank = entry.rank,
        avatar = escape_html(avatar),
        fallback = escape_html(ctx.fallback_avatar),
        global = global_rank(entry.rank_global),
        recent = one_decimal(entry.recent_skill),
        peak = one_decimal(entry.peak_skill),
        matched = percent(entry.skill_match),
        confidence = percent(entry.confidence),
        badge = verdict_badge(entry, ctx),
    )
}

fn verdict_badge(entry: &LeaderboardEntry, ctx: &RowContext<'_>) -> String {
    let badge = format!(
        r#"<span class="verdict-badge {class}">{label}</span>"#,
        class = escape_html(&entry.verdict.css_class()),
        label = escape_html(entry.verdict.label()),
    );
    if entry.is_analysis_stale(ctx.now_ms, ctx.expiry_ms) {
        format!(
            r#"<div class="tooltip">{badge}<span class="tooltiptext">{EXPIRED_ANNOTATION}</span></div>"#
        )
    } else {
        badge
    }
}
