// HTML fragments for the editor's counts and alerts panels
use crate::domain::counts::EditorSnapshot;

pub const NO_ALERTS: &str = r#"<span class="text-muted">No alerts</span>"#;

/// Escape text for inclusion in element content.
pub fn escape(text: &str) -> String {
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

/// Total line followed by one line per zone.
pub fn zone_counts(snapshot: &EditorSnapshot) -> String {
    let mut html = format!("<div>Total: {}</div>", snapshot.total);
    for (zone, count) in &snapshot.zones {
        html.push_str(&format!("<div>{}: <strong>{}</strong></div>", escape(zone), count));
    }
    html
}

pub fn alerts_panel(alerts: &[String]) -> String {
    if alerts.is_empty() {
        return NO_ALERTS.to_string();
    }
    alerts
        .iter()
        .map(|a| format!(r#"<div class="alert alert-danger py-1">{}</div>"#, escape(a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn snapshot(alerts: Vec<String>) -> EditorSnapshot {
        let mut zones = IndexMap::new();
        zones.insert("A".to_string(), 4);
        zones.insert("B".to_string(), 6);
        EditorSnapshot {
            total: 10,
            zones,
            alerts,
        }
    }

    #[test]
    fn test_zone_counts_lines() {
        let html = zone_counts(&snapshot(vec![]));
        assert_eq!(
            html,
            "<div>Total: 10</div><div>A: <strong>4</strong></div><div>B: <strong>6</strong></div>"
        );
    }

    #[test]
    fn test_alerts_panel() {
        assert_eq!(alerts_panel(&[]), NO_ALERTS);
        assert_eq!(
            alerts_panel(&["B exceeded".to_string()]),
            r#"<div class="alert alert-danger py-1">B exceeded</div>"#
        );
    }

    #[test]
    fn test_labels_are_escaped() {
        assert_eq!(escape("<b>&\"x'"), "&lt;b&gt;&amp;&quot;x&#39;");
    }
}
