//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable `(strategy, value)` pair. Locators carry no
//! behavior of their own: resolution, waiting and interaction live in
//! [`crate::interaction`]. Parameterized locators (a product row picked by its
//! label) are built fresh per call through [`xpath_literal`] and
//! [`css_string`], so caller-supplied text cannot break out of the selector.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// How a locator's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Element `id` attribute
    Id,
    /// XPath 1.0 expression
    XPath,
    /// CSS selector
    Css,
    /// Element `name` attribute
    Name,
    /// Exact visible text of a link
    LinkText,
    /// Tag name
    TagName,
    /// A single class name
    ClassName,
}

impl Strategy {
    /// Short name used in `Display` output and logs
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::XPath => "xpath",
            Self::Css => "css",
            Self::Name => "name",
            Self::LinkText => "link_text",
            Self::TagName => "tag_name",
            Self::ClassName => "class_name",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of how to find one UI element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    strategy: Strategy,
    value: Cow<'static, str>,
}

impl Locator {
    /// Create a locator from a strategy and value
    #[must_use]
    pub fn new(strategy: Strategy, value: impl Into<Cow<'static, str>>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    /// Create a locator usable in `const` position
    #[must_use]
    pub const fn from_static(strategy: Strategy, value: &'static str) -> Self {
        Self {
            strategy,
            value: Cow::Borrowed(value),
        }
    }

    /// Locate by `id` attribute
    #[must_use]
    pub fn id(id: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Strategy::Id, id)
    }

    /// Locate by XPath expression
    #[must_use]
    pub fn xpath(expr: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Strategy::XPath, expr)
    }

    /// Locate by CSS selector
    #[must_use]
    pub fn css(selector: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Strategy::Css, selector)
    }

    /// Locate by `name` attribute
    #[must_use]
    pub fn name(name: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Strategy::Name, name)
    }

    /// Locate a link by its exact text
    #[must_use]
    pub fn link_text(text: impl Into<Cow<'static, str>>) -> Self {
        Self::new(Strategy::LinkText, text)
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw value
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Same strategy, different value. The original is left untouched.
    #[must_use]
    pub fn with_value(&self, value: impl Into<Cow<'static, str>>) -> Self {
        Self::new(self.strategy, value)
    }

    /// Translate into a query a DOM-level driver can run directly.
    ///
    /// Attribute-based strategies become quoted CSS attribute selectors
    /// rather than `#id` / `.class` shorthands, so values that are not valid
    /// CSS identifiers still match.
    #[must_use]
    pub fn to_query(&self) -> Query {
        match self.strategy {
            Strategy::Id => Query::Css(format!("[id={}]", css_string(&self.value))),
            Strategy::Name => Query::Css(format!("[name={}]", css_string(&self.value))),
            Strategy::ClassName => Query::Css(format!("[class~={}]", css_string(&self.value))),
            Strategy::TagName | Strategy::Css => Query::Css(self.value.to_string()),
            Strategy::XPath => Query::XPath(self.value.to_string()),
            Strategy::LinkText => Query::XPath(format!(
                "//a[normalize-space(.)={}]",
                xpath_literal(&self.value)
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.value)
    }
}

/// A locator lowered to one of the two query languages browsers understand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// CSS selector
    Css(String),
    /// XPath expression
    XPath(String),
}

/// Quote `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text containing both quote kinds is
/// spelled as `concat(...)` with each `'` emitted as a `"'"` piece.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }
    let pieces: Vec<String> = text.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", pieces.join(", \"'\", "))
}

/// Quote `text` as a CSS string token (double-quoted).
#[must_use]
pub fn css_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert_eq, proptest};

    /// Evaluate the subset of XPath produced by `xpath_literal` back into a string
    fn eval_literal(lit: &str) -> Option<String> {
        fn quoted(piece: &str) -> Option<&str> {
            let piece = piece.trim();
            let quote = piece.chars().next()?;
            if (quote != '\'' && quote != '"') || piece.len() < 2 || !piece.ends_with(quote) {
                return None;
            }
            let inner = &piece[1..piece.len() - 1];
            (!inner.contains(quote)).then_some(inner)
        }

        if let Some(args) = lit.strip_prefix("concat(").and_then(|r| r.strip_suffix(')')) {
            let mut out = String::new();
            for piece in args.split(", \"'\", ") {
                out.push_str(quoted(piece)?);
                out.push('\'');
            }
            out.pop();
            Some(out)
        } else {
            quoted(lit).map(str::to_string)
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_value_equality() {
            assert_eq!(Locator::id("checkout"), Locator::id("checkout"));
            assert_ne!(Locator::id("checkout"), Locator::css("checkout"));
            assert_ne!(Locator::id("checkout"), Locator::id("continue"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Locator::id("finish").to_string(), "id=finish");
            assert_eq!(Locator::xpath("//h2").to_string(), "xpath=//h2");
        }

        #[test]
        fn test_with_value_leaves_original_untouched() {
            let base = Locator::id("first-name");
            let other = base.with_value("last-name");
            assert_eq!(base.value(), "first-name");
            assert_eq!(other.value(), "last-name");
            assert_eq!(other.strategy(), Strategy::Id);
        }

        #[test]
        fn test_static_and_owned_values_compare_equal() {
            const FINISH: Locator = Locator::from_static(Strategy::Id, "finish");
            assert_eq!(FINISH, Locator::id(String::from("finish")));
        }

        #[test]
        fn test_serde_shape() {
            let json = serde_json::to_string(&Locator::id("finish")).unwrap();
            assert_eq!(json, r#"{"strategy":"id","value":"finish"}"#);
            let back: Locator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, Locator::id("finish"));
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_id_becomes_attribute_selector() {
            assert_eq!(
                Locator::id("postal-code").to_query(),
                Query::Css(r#"[id="postal-code"]"#.to_string())
            );
        }

        #[test]
        fn test_xpath_passes_through() {
            let loc = Locator::xpath("//div[@class='inventory_item']");
            assert_eq!(
                loc.to_query(),
                Query::XPath("//div[@class='inventory_item']".to_string())
            );
        }

        #[test]
        fn test_link_text_quotes_value() {
            assert_eq!(
                Locator::link_text("Bob's shop").to_query(),
                Query::XPath(r#"//a[normalize-space(.)="Bob's shop"]"#.to_string())
            );
        }

        #[test]
        fn test_name_becomes_attribute_selector() {
            assert_eq!(
                Locator::name("user-name").to_query(),
                Query::Css(r#"[name="user-name"]"#.to_string())
            );
        }

        #[test]
        fn test_class_name_uses_word_match() {
            assert_eq!(
                Locator::new(Strategy::ClassName, "btn_inventory").to_query(),
                Query::Css(r#"[class~="btn_inventory"]"#.to_string())
            );
        }
    }

    mod quoting_tests {
        use super::*;

        #[test]
        fn test_plain_text_single_quoted() {
            assert_eq!(xpath_literal("Sauce Labs Backpack"), "'Sauce Labs Backpack'");
        }

        #[test]
        fn test_apostrophe_switches_to_double_quotes() {
            assert_eq!(xpath_literal("Kid's Onesie"), "\"Kid's Onesie\"");
        }

        #[test]
        fn test_both_quotes_use_concat() {
            assert_eq!(
                xpath_literal(r#"The "Kid's" Onesie"#),
                r#"concat('The "Kid', "'", 's" Onesie')"#
            );
        }

        #[test]
        fn test_css_string_escapes() {
            assert_eq!(css_string(r#"a"b\c"#), r#""a\"b\\c""#);
        }

        proptest! {
            #[test]
            fn prop_xpath_literal_denotes_input(text in "[a-zA-Z0-9 '\"()-]{0,24}") {
                let lit = xpath_literal(&text);
                prop_assert_eq!(eval_literal(&lit), Some(text));
            }
        }
    }
}
