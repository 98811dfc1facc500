use quarry_nbt::{Compound, Tag};
use serde_json::{json, Map, Value};

/// Click handler attached to a text span.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickEvent {
    /// Sends a custom click action packet back with `id` and `payload`.
    Custom { id: String, payload: Option<String> },
    OpenUrl(String),
    RunCommand(String),
}

/// Chat text tree. Encoded as NBT for play and configuration packets and as
/// JSON for login disconnects and the status description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextComponent {
    pub text: String,
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underlined: Option<bool>,
    pub click_event: Option<ClickEvent>,
    pub extra: Vec<TextComponent>,
}

impl TextComponent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn underlined(mut self) -> Self {
        self.underlined = Some(true);
        self
    }

    pub fn on_click(mut self, event: ClickEvent) -> Self {
        self.click_event = Some(event);
        self
    }

    pub fn append(mut self, child: TextComponent) -> Self {
        self.extra.push(child);
        self
    }

    /// Concatenated text of this span and its children.
    pub fn plain(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.plain());
        }
        out
    }

    fn is_plain_string(&self) -> bool {
        self.color.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underlined.is_none()
            && self.click_event.is_none()
            && self.extra.is_empty()
    }

    pub fn to_nbt(&self) -> Tag {
        if self.is_plain_string() {
            return Tag::from(self.text.as_str());
        }
        let mut compound = Compound::new();
        compound.insert("text", self.text.as_str());
        if let Some(color) = &self.color {
            compound.insert("color", color.as_str());
        }
        for (name, flag) in [
            ("bold", self.bold),
            ("italic", self.italic),
            ("underlined", self.underlined),
        ] {
            if let Some(flag) = flag {
                compound.insert(name, flag);
            }
        }
        if let Some(event) = &self.click_event {
            let mut click = Compound::new();
            match event {
                ClickEvent::Custom { id, payload } => {
                    click.insert("action", "custom").insert("id", id.as_str());
                    if let Some(payload) = payload {
                        click.insert("payload", payload.as_str());
                    }
                }
                ClickEvent::OpenUrl(url) => {
                    click.insert("action", "open_url").insert("url", url.as_str());
                }
                ClickEvent::RunCommand(command) => {
                    click
                        .insert("action", "run_command")
                        .insert("command", command.as_str());
                }
            }
            compound.insert("click_event", click);
        }
        if !self.extra.is_empty() {
            // Lists must be homogeneous, so children are always compounds here.
            let children = self
                .extra
                .iter()
                .map(|child| match child.to_nbt() {
                    Tag::String(text) => Tag::Compound(Compound::new().with("text", text)),
                    other => other,
                })
                .collect::<Vec<_>>();
            compound.insert("extra", children);
        }
        Tag::Compound(compound)
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("text".into(), json!(self.text));
        if let Some(color) = &self.color {
            map.insert("color".into(), json!(color));
        }
        for (name, flag) in [
            ("bold", self.bold),
            ("italic", self.italic),
            ("underlined", self.underlined),
        ] {
            if let Some(flag) = flag {
                map.insert(name.into(), json!(flag));
            }
        }
        if let Some(event) = &self.click_event {
            let value = match event {
                ClickEvent::Custom { id, payload } => {
                    json!({ "action": "custom", "id": id, "payload": payload })
                }
                ClickEvent::OpenUrl(url) => json!({ "action": "open_url", "url": url }),
                ClickEvent::RunCommand(command) => {
                    json!({ "action": "run_command", "command": command })
                }
            };
            map.insert("click_event".into(), value);
        }
        if !self.extra.is_empty() {
            map.insert(
                "extra".into(),
                Value::Array(self.extra.iter().map(TextComponent::to_json).collect()),
            );
        }
        Value::Object(map)
    }
}

impl From<&str> for TextComponent {
    fn from(text: &str) -> Self {
        TextComponent::text(text)
    }
}

impl From<String> for TextComponent {
    fn from(text: String) -> Self {
        TextComponent::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_a_string_tag() {
        assert_eq!(TextComponent::text("hi").to_nbt(), Tag::String("hi".into()));
    }

    #[test]
    fn test_styled_tree() {
        let message = TextComponent::text("Welcome ")
            .append(TextComponent::text("home").color("red").italic())
            .append(TextComponent::text("!"));
        let tag = message.to_nbt();
        let root = tag.as_compound().unwrap();
        assert_eq!(root.get_str("text"), Some("Welcome "));

        let extra = root.get("extra").and_then(Tag::as_list).unwrap();
        assert_eq!(extra.len(), 2);
        let styled = extra[0].as_compound().unwrap();
        assert_eq!(styled.get_str("color"), Some("red"));
        assert_eq!(styled.get("italic").and_then(Tag::as_bool), Some(true));
        assert_eq!(extra[1].as_compound().unwrap().get_str("text"), Some("!"));
        assert_eq!(message.plain(), "Welcome home!");
    }

    #[test]
    fn test_custom_click_event() {
        let span = TextComponent::text("Transfer").on_click(ClickEvent::Custom {
            id: "quarry:transfer".into(),
            payload: None,
        });
        let tag = span.to_nbt();
        let click = tag
            .as_compound()
            .and_then(|c| c.get("click_event"))
            .and_then(Tag::as_compound)
            .unwrap();
        assert_eq!(click.get_str("action"), Some("custom"));
        assert_eq!(click.get_str("id"), Some("quarry:transfer"));
        assert!(click.get("payload").is_none());

        assert_eq!(span.to_json()["click_event"]["id"], "quarry:transfer");
    }

    #[test]
    fn test_json_shape() {
        let json = TextComponent::text("Bye").color("red").to_json();
        assert_eq!(json, serde_json::json!({ "text": "Bye", "color": "red" }));
    }
}
