//! Helper functions for template tests

use super::*;

pub fn site_partials() -> PartialSet {
    PartialSet::new()
        .with("nav.html", "<nav>{{SITE_NAME}}</nav>")
        .with("footer.html", "<footer>(c) {{YEAR}}</footer>")
}

pub fn guide_substitutions() -> Substitutions {
    Substitutions::new()
        .text("TEXT_TITLE", "Macbeth")
        .text("AUTHOR", "William Shakespeare")
        .text("SITE_NAME", "LuminAIT")
        .text("YEAR", "2026")
}
