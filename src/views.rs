// src/views.rs
use serde::Serialize;

const NAV_LINKS: [(&str, &str); 4] = [
    ("Projects", "/projects"),
    ("Tutorials", "/tutorials"),
    ("Community", "/community"),
    ("About", "/about"),
];

/// The two named routes of the site. Neither takes parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum View {
    Gate,
    Home,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Gate => "/",
            View::Home => "/Home",
        }
    }

    pub fn render(&self) -> String {
        match self {
            View::Gate => render_gate(),
            View::Home => render_home(),
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn render_gate() -> String {
    page(
        "User Validation",
        r#"<h2>USER VALIDATION</h2>
<form id="gate" data-endpoint="/login">
  <input type="text" name="name" placeholder="Name">
  <input type="text" name="registration_number" placeholder="Registration Number">
  <button type="submit">LOGIN</button>
</form>"#,
    )
}

fn render_home() -> String {
    let nav = NAV_LINKS
        .iter()
        .map(|(label, href)| format!("<a href=\"{href}\">{label}</a>"))
        .collect::<Vec<_>>()
        .join("\n  ");

    page(
        "DIY Master",
        &format!(
            r#"<nav>
  <span>DIY MASTER</span>
  {nav}
</nav>
<section>
  <h1>Create. Build. Learn.</h1>
  <p>Discover thousands of DIY projects and join our community of makers.</p>
  <input type="text" placeholder="Search for projects..." aria-label="Search projects">
</section>
<div id="diy-chatbot" data-chatbot-button="true"></div>"#
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_paths() {
        assert_eq!(View::Gate.path(), "/");
        assert_eq!(View::Home.path(), "/Home");
    }

    #[test]
    fn home_has_hero_and_nav() {
        let html = View::Home.render();
        assert!(html.contains("Create. Build. Learn."));
        assert!(html.contains("href=\"/tutorials\""));
    }
}
