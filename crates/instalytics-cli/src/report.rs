//! Command handlers and terminal rendering for the CLI.

use std::fmt::Write as _;
use std::time::Duration;

use instalytics_analytics::{mock_analytics, AnalyticsService, Fetched};
use instalytics_core::{
    format_number, format_percentage, load_suggestions, validate_username, AppConfig,
    InstagramAnalytics, SearchResult, SuggestionTable,
};

const PROXY_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetch analytics through the proxy and print them.
///
/// # Errors
///
/// Returns an error if the username is invalid or the HTTP client cannot be
/// built. Proxy failures are not errors; they produce sample data.
pub(crate) async fn run_analyze(proxy_url: &str, username: &str, json: bool) -> anyhow::Result<()> {
    let username = validate_username(Some(username))?;
    let service = AnalyticsService::new(proxy_url, PROXY_TIMEOUT)?;
    let fetched = service.complete_analytics(username).await;
    let note = fallback_note(&fetched);

    if json {
        println!("{}", serde_json::to_string_pretty(fetched.analytics())?);
        return Ok(());
    }

    print!("{}", render_summary(fetched.analytics(), note));
    Ok(())
}

/// The reason sample data is shown, if it is. Logged at `warn` as well.
pub(crate) fn fallback_note(fetched: &Fetched) -> Option<&str> {
    match fetched {
        Fetched::Fallback { reason, analytics } => {
            tracing::warn!(
                username = %analytics.profile.username,
                reason = %reason,
                "proxy unavailable, showing sample data"
            );
            Some(reason.as_str())
        }
        Fetched::Upstream(_) => None,
    }
}

/// Search the configured (or built-in) suggestion table.
///
/// # Errors
///
/// Returns an error if the suggestion file cannot be loaded.
pub(crate) fn run_search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let table = match &config.suggestions_path {
        Some(path) => load_suggestions(path)?,
        None => SuggestionTable::builtin()?,
    };
    let results = table.search(query);
    if results.is_empty() {
        println!("no suggestions for '{}'", query.trim());
        return Ok(());
    }
    print!("{}", render_search(&results));
    Ok(())
}

/// Print mock analytics as JSON.
///
/// # Errors
///
/// Returns an error if the username is invalid.
pub(crate) fn run_mock(username: &str) -> anyhow::Result<()> {
    let username = validate_username(Some(username))?;
    let today = chrono::Utc::now().date_naive();
    let analytics = mock_analytics(username, today, &mut rand::rng());
    println!("{}", serde_json::to_string_pretty(&analytics)?);
    Ok(())
}

pub(crate) fn render_search(results: &[SearchResult]) -> String {
    let mut out = format!("{:<20}{:<24}{:>10}\n", "USERNAME", "NAME", "FOLLOWERS");
    for r in results {
        let badge = if r.is_verified { " \u{2713}" } else { "" };
        let _ = writeln!(
            out,
            "{:<20}{:<24}{:>10}{badge}",
            r.username,
            r.full_name,
            format_number(r.followers)
        );
    }
    out
}

/// Multi-line summary of an aggregate. `fallback_note` marks sample data.
pub(crate) fn render_summary(analytics: &InstagramAnalytics, fallback_note: Option<&str>) -> String {
    let p = &analytics.profile;
    let e = &analytics.engagement;
    let r = &analytics.rankings;
    let q = &analytics.audience_quality;
    let mut out = String::new();

    if let Some(reason) = fallback_note {
        let _ = writeln!(out, "note: showing sample data ({reason})");
    }

    let badge = if p.is_verified { " \u{2713}" } else { "" };
    let _ = writeln!(out, "@{} ({}){badge}", p.username, p.full_name);
    if !p.biography.is_empty() {
        let _ = writeln!(out, "{}", p.biography);
    }
    let _ = writeln!(
        out,
        "Followers {}   Following {}   Posts {}",
        format_number(p.followers),
        format_number(p.following),
        format_number(p.posts)
    );
    let _ = writeln!(
        out,
        "Engagement {}   Avg likes {}   Avg comments {}",
        format_percentage(e.engagement_rate),
        format_number(e.avg_likes),
        format_number(e.avg_comments)
    );
    let _ = writeln!(
        out,
        "Rank: global #{}   {} #{}   {} {}",
        r.global_rank, r.country, r.country_rank, r.category, r.category_rank
    );
    let _ = writeln!(
        out,
        "Audience quality {}/100 (real {}, suspicious {})",
        q.quality_score,
        format_number(q.real_followers),
        format_number(q.suspicious_followers)
    );

    let _ = writeln!(out, "\n{:<16}{:>6}  COLOR", "CATEGORY", "SHARE");
    for c in &analytics.categories {
        let _ = writeln!(out, "{:<16}{:>5}%  {}", c.name, c.percentage, c.color);
    }

    let _ = writeln!(out, "\n{:<12}{:>10}", "MONTH", "FOLLOWERS");
    for g in &analytics.follower_growth {
        let _ = writeln!(
            out,
            "{:<12}{:>10}",
            g.date.format("%Y-%m").to_string(),
            format_number(g.followers)
        );
    }
    out
}
