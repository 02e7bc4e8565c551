//! Server-side HTML for the single dashboard page. All user-supplied and
//! upstream text is escaped before it reaches the page.

use crate::config::Config;
use crate::covid::aggregate::CovidSnapshot;
use crate::dashboard::DashboardState;
use crate::news::client::Article;
use crate::updates::PendingUpdate;

/// Articles shown on the landing page at once.
const VISIBLE_ARTICLES: usize = 4;

pub fn dashboard_page(config: &Config, dashboard: &DashboardState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Smart Covid Dashboard</title>
<link rel="icon" href="/static/favicon.ico">
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css">
</head>
<body>
<div class="container-fluid">
<div class="row text-center"><div class="col"><h1><b>Smart Covid Dashboard</b></h1></div></div>
<div class="row text-center"><div class="col"><img src="{image}" alt="dashboard" height="75"></div></div>
<div class="row mt-3">
<div class="col-4">{updates}</div>
<div class="col-4 text-center">{stats}{form}</div>
<div class="col-4">{articles}</div>
</div>
</div>
</body>
</html>
"#,
        image = escape(&config.image),
        updates = update_toasts(dashboard.updates.entries()),
        stats = stats_panel(config, &dashboard.snapshot),
        form = schedule_form(),
        articles = article_cards(&dashboard.articles),
    )
}

fn stats_panel(config: &Config, snapshot: &CovidSnapshot) -> String {
    format!(
        "<h2><b>{location}</b></h2>\
         <p>Local 7-day infections: {local}</p>\
         <h2><b>{nation}</b></h2>\
         <p>National 7-day infections: {national}</p>\
         <p>Hospital cases: {hospital}</p>\
         <p>Total deaths: {deaths}</p>",
        location = escape(&config.location),
        local = snapshot.local_seven_day_cases,
        nation = escape(&config.nation),
        national = snapshot.national_seven_day_cases,
        hospital = count_or_unknown(snapshot.hospital_cases),
        deaths = count_or_unknown(snapshot.total_deaths),
    )
}

fn count_or_unknown(value: Option<i64>) -> String {
    value.map_or_else(|| "not reported".to_string(), |v| v.to_string())
}

// Field names are the query contract of GET /index.
fn schedule_form() -> &'static str {
    r#"<form action="/index" method="get">
<div class="form-group"><input type="time" name="update" class="form-control"></div>
<div class="form-group"><input type="text" name="two" class="form-control" placeholder="Update label"></div>
<div class="form-check"><input type="checkbox" name="repeat" value="repeat" class="form-check-input"><label class="form-check-label">Repeat update</label></div>
<div class="form-check"><input type="checkbox" name="covid-data" value="covid-data" class="form-check-input"><label class="form-check-label">Update Covid data</label></div>
<div class="form-check"><input type="checkbox" name="news" value="news" class="form-check-input"><label class="form-check-label">Update news articles</label></div>
<button type="submit" class="btn btn-dark mt-2">Schedule update</button>
</form>"#
}

fn update_toasts(updates: &[PendingUpdate]) -> String {
    let mut out = String::from("<h4>Scheduled updates</h4>");
    for update in updates {
        out.push_str(&format!(
            "<div class=\"toast show\"><div class=\"toast-header\">\
             <strong class=\"mr-auto\">{title}</strong>\
             <a class=\"ml-2 close\" href=\"/index?update_item={key}\">&times;</a></div>\
             <div class=\"toast-body\">{content}</div></div>",
            title = escape(&update.label),
            key = urlencoding::encode(&update.label),
            content = escape(&update.content),
        ));
    }
    out
}

fn article_cards(articles: &[Article]) -> String {
    let mut out = String::from("<h4>News headlines</h4>");
    for article in articles.iter().take(VISIBLE_ARTICLES) {
        let description = article.description.as_deref().unwrap_or_default();
        out.push_str(&format!(
            "<div class=\"toast show\"><div class=\"toast-header\">\
             <strong class=\"mr-auto\">{title}</strong>\
             <a class=\"ml-2 close\" href=\"/index?notif={key}\">&times;</a></div>\
             <div class=\"toast-body\">{description} <a href=\"{url}\">Read More...</a></div></div>",
            title = escape(&article.title),
            key = urlencoding::encode(&article.title),
            description = escape(description),
            url = escape(&article.url),
        ));
    }
    out
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covid::history::HistoricalSummary;

    fn test_config() -> Config {
        Config {
            location: "Exeter".to_string(),
            location_type: "ltla".to_string(),
            nation: "England".to_string(),
            news_api_key: "test-key".to_string(),
            news_terms: "Covid".to_string(),
            history_csv: "data/nation_2021-10-28.csv".to_string(),
            image: "/static/covid.png".to_string(),
            static_dir: "static".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    fn seeded_dashboard() -> DashboardState {
        DashboardState::seeded_from(&HistoricalSummary {
            seven_day_cases: 240_299,
            hospital_cases: 7_019,
            total_deaths: 141_544,
        })
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("a & b"), "a &amp; b");
    }

    #[test]
    fn page_shows_seeded_aggregates() {
        let page = dashboard_page(&test_config(), &seeded_dashboard());
        assert!(page.contains("Hospital cases: 7019"));
        assert!(page.contains("Total deaths: 141544"));
        assert!(page.contains("National 7-day infections: 240299"));
    }

    #[test]
    fn article_markup_is_escaped_and_key_encoded() {
        let mut dashboard = seeded_dashboard();
        dashboard.articles.push(Article {
            title: "<b>Cases & more</b>".to_string(),
            url: "https://example.com/a".to_string(),
            description: Some("details".to_string()),
        });

        let page = dashboard_page(&test_config(), &dashboard);
        assert!(!page.contains("<b>Cases"));
        assert!(page.contains("&lt;b&gt;Cases &amp; more&lt;/b&gt;"));
        assert!(page.contains("/index?notif=%3Cb%3ECases%20%26%20more%3C%2Fb%3E"));
    }

    #[test]
    fn only_top_articles_are_rendered() {
        let mut dashboard = seeded_dashboard();
        for i in 0..6 {
            dashboard.articles.push(Article {
                title: format!("headline-{i}"),
                url: format!("https://example.com/{i}"),
                description: None,
            });
        }

        let page = dashboard_page(&test_config(), &dashboard);
        assert!(page.contains("headline-3"));
        assert!(!page.contains("headline-4"));
    }

    #[test]
    fn missing_metrics_render_as_not_reported() {
        let mut dashboard = seeded_dashboard();
        dashboard.snapshot.hospital_cases = None;

        let page = dashboard_page(&test_config(), &dashboard);
        assert!(page.contains("Hospital cases: not reported"));
    }
}
