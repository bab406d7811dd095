//! robots.txt rendering.

use crate::config::RobotsRule;

/// Render rule groups followed by the sitemap location.
pub fn render_robots(rules: &[RobotsRule], base_url: &str) -> String {
    let mut out = String::new();

    for rule in rules {
        out.push_str("User-agent: ");
        out.push_str(&rule.user_agent);
        out.push('\n');
        for path in &rule.allow {
            out.push_str("Allow: ");
            out.push_str(path);
            out.push('\n');
        }
        for path in &rule.disallow {
            out.push_str("Disallow: ");
            out.push_str(path);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str("Sitemap: ");
    out.push_str(base_url.trim_end_matches('/'));
    out.push_str("/sitemap.xml\n");
    out
}
