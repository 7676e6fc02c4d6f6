//! The handful of element queries the page behaviors need.
//!
//! Kept as a closed enum so the simulated host can match without a CSS engine;
//! the browser host renders them with [`Selector::to_css`].

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Id(String),
    Tag(String),
    Class(String),
    /// `input[type=...]`
    InputType(String),
    /// `[name]` or `[name="value"]`
    Attr { name: String, value: Option<String> },
}

impl Selector {
    pub fn id(id: impl Into<String>) -> Self {
        Selector::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Selector::Tag(tag.into())
    }

    pub fn class(class: impl Into<String>) -> Self {
        Selector::Class(class.into())
    }

    pub fn input_type(ty: impl Into<String>) -> Self {
        Selector::InputType(ty.into())
    }

    pub fn has_attr(name: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: None,
        }
    }

    pub fn attr_eq(name: impl Into<String>, value: impl Into<String>) -> Self {
        Selector::Attr {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Selector::Id(id) => format!("#{}", css_escape_ident(id)),
            Selector::Tag(tag) => tag.clone(),
            Selector::Class(class) => format!(".{}", css_escape_ident(class)),
            Selector::InputType(ty) => format!("input[type=\"{}\"]", css_escape_string(ty)),
            Selector::Attr { name, value: None } => format!("[{name}]"),
            Selector::Attr {
                name,
                value: Some(v),
            } => format!("[{name}=\"{}\"]", css_escape_string(v)),
        }
    }

    /// Match against a plain element description.
    ///
    /// `attr` must answer for `id`, `class` and `type` like it does for any
    /// other attribute.
    pub fn matches<'a, F>(&self, tag: &str, attr: F) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        match self {
            Selector::Id(id) => attr("id") == Some(id.as_str()),
            Selector::Tag(t) => tag.eq_ignore_ascii_case(t),
            Selector::Class(class) => attr("class")
                .map(|list| list.split_ascii_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Selector::InputType(ty) => {
                tag.eq_ignore_ascii_case("input")
                    && attr("type")
                        .map(|t| t.eq_ignore_ascii_case(ty))
                        .unwrap_or(false)
            }
            Selector::Attr { name, value: None } => attr(name.as_str()).is_some(),
            Selector::Attr {
                name,
                value: Some(v),
            } => attr(name.as_str()) == Some(v.as_str()),
        }
    }
}

fn css_escape_ident(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, ch) in s.chars().enumerate() {
        let plain = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii();
        if i == 0 && ch.is_ascii_digit() {
            out.push_str(&format!("\\{:x} ", ch as u32));
        } else if plain {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

fn css_escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<&'a str> + 'a {
        move |name| pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    #[test]
    fn css_rendering() {
        assert_eq!(Selector::id("mobileMenuBtn").to_css(), "#mobileMenuBtn");
        assert_eq!(Selector::class("copy-btn").to_css(), ".copy-btn");
        assert_eq!(Selector::input_type("file").to_css(), "input[type=\"file\"]");
        assert_eq!(Selector::has_attr("title").to_css(), "[title]");
        assert_eq!(
            Selector::attr_eq("role", "alert").to_css(),
            "[role=\"alert\"]"
        );
        assert_eq!(Selector::id("1st").to_css(), "#\\31 st");
    }

    #[test]
    fn class_matching_uses_whole_tokens() {
        let attrs = [("class", "btn copy-btn-wide")];
        assert!(!Selector::class("copy-btn").matches("button", lookup(&attrs)));
        let attrs = [("class", "btn  copy-btn")];
        assert!(Selector::class("copy-btn").matches("button", lookup(&attrs)));
    }

    #[test]
    fn input_type_requires_input_tag() {
        let attrs = [("type", "file")];
        assert!(Selector::input_type("file").matches("INPUT", lookup(&attrs)));
        assert!(!Selector::input_type("file").matches("button", lookup(&attrs)));
    }

    #[test]
    fn attribute_presence_and_value() {
        let attrs = [("role", "alert"), ("title", "")];
        assert!(Selector::has_attr("title").matches("span", lookup(&attrs)));
        assert!(Selector::attr_eq("role", "alert").matches("div", lookup(&attrs)));
        assert!(!Selector::attr_eq("role", "status").matches("div", lookup(&attrs)));
    }
}
