//! Statement template rendering.

use crate::models::Parameters;
use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"))
}

/// Replace every `{name}` with the value of parameter `name`.
///
/// Placeholders without a matching parameter are left as written, so LaTeX
/// groups such as `\frac{1}{x}` survive rendering.
pub fn render_template(template: &str, params: &Parameters) -> String {
    placeholder_re()
        .replace_all(template, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_parameters() {
        let params = Parameters::new().with("n", 20).with("k", 3);
        assert_eq!(
            render_template("Pairs up to {n} with step {k}.", &params),
            "Pairs up to 20 with step 3."
        );
    }

    #[test]
    fn test_render_leaves_latex_groups() {
        let params = Parameters::new().with("p", 2);
        assert_eq!(
            render_template("$\\sum_{k=1}^{n} k^{p}$ and \\frac{1}{x}", &params),
            "$\\sum_{k=1}^{n} k^{2}$ and \\frac{1}{x}"
        );
    }
}
