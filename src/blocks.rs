//! The slice of Block Kit both lambdas render.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonStyle {
    Primary,
}

/// Link buttons only; nothing here handles interaction callbacks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ButtonElement {
    pub action_id: String,
    pub text: TextObject,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ButtonStyle>,
}

impl ButtonElement {
    pub fn link(
        action_id: impl Into<String>,
        label: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            text: TextObject::plain(label),
            url: url.into(),
            style: None,
        }
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Context {
        elements: Vec<TextObject>,
    },
    Actions {
        elements: Vec<ButtonElement>,
    },
    Divider,
}

impl Block {
    pub fn section(text: impl Into<String>) -> Self {
        Self::Section {
            text: TextObject::mrkdwn(text),
            accessory: None,
        }
    }

    pub fn section_with_image(
        text: impl Into<String>,
        image_url: impl Into<String>,
        alt_text: impl Into<String>,
    ) -> Self {
        Self::Section {
            text: TextObject::mrkdwn(text),
            accessory: Some(Accessory::Image {
                image_url: image_url.into(),
                alt_text: alt_text.into(),
            }),
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Self::Context {
            elements: vec![TextObject::mrkdwn(text)],
        }
    }

    pub fn actions(elements: Vec<ButtonElement>) -> Self {
        Self::Actions { elements }
    }
}

/// Escapes the three characters Slack treats as control sequences in
/// `mrkdwn`, so user-supplied text cannot turn into mentions or links.
pub fn escape_mrkdwn(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
