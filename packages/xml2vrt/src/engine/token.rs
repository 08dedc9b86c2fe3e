//! Assembly of token elements into tab-separated lines.

use crate::config::ConvertOptions;
use crate::error::{Result, VrtError};
use crate::types::Attributes;
use crate::xml::self_closed_tag;

/// Attribute holding the token text.
pub const WORD_ATTRIBUTE: &str = "word";

/// The token element currently being accumulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub attributes: Attributes,
}

impl Token {
    /// Start a token seeded with the element's own attributes.
    ///
    /// The word always starts empty; a source attribute named `word` is
    /// replaced by the token's text.
    pub fn new(mut attributes: Attributes) -> Self {
        attributes.set(WORD_ATTRIBUTE, "");
        Self { attributes }
    }

    pub fn word(&self) -> &str {
        self.attributes.get(WORD_ATTRIBUTE).unwrap_or_default()
    }

    pub fn push_word(&mut self, text: &str) {
        match self.attributes.get_mut(WORD_ATTRIBUTE) {
            Some(word) => word.push_str(text),
            None => self.attributes.set(WORD_ATTRIBUTE, text),
        }
    }
}

/// Lines produced when a token closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOutput {
    /// Glue marker to write before the token line, if any.
    pub glue: Option<String>,
    pub line: String,
}

/// Idle/accumulating state machine for token elements.
///
/// Also tracks the whitespace seen between tokens, which decides whether a
/// glue marker precedes the next token line.
#[derive(Debug, Clone, Default)]
pub struct TokenAssembler {
    token: Option<Token>,
    whitespace: String,
    previous_was_token: bool,
}

impl TokenAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.token.is_some()
    }

    /// Enter a token element.
    ///
    /// # Errors
    /// Returns `NestedToken` if a token is already live.
    pub fn start(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        if self.token.is_some() {
            return Err(VrtError::NestedToken(name.to_string()));
        }
        self.token = Some(Token::new(attributes));
        Ok(())
    }

    /// Append text or retained markup to the live token's word.
    pub fn push_text(&mut self, text: &str) {
        if let Some(token) = self.token.as_mut() {
            token.push_word(text);
        }
    }

    /// Record whitespace found outside tokens.
    pub fn push_whitespace(&mut self, text: &str) {
        self.whitespace.push_str(text);
    }

    /// Record that the next token does not directly follow the previous one,
    /// as after free text or at the end of an include window.
    pub fn break_glue(&mut self) {
        self.previous_was_token = false;
    }

    pub fn has_pending_whitespace(&self) -> bool {
        !self.whitespace.is_empty()
    }

    /// Clear traversal-scoped whitespace state.
    pub fn reset_whitespace(&mut self) {
        self.whitespace.clear();
    }

    /// Close the live token and render its output.
    ///
    /// Returns `None` when no token is live.
    pub fn finish(&mut self, options: &ConvertOptions) -> Option<TokenOutput> {
        let token = self.token.take()?;

        let glue = options
            .glue
            .as_deref()
            .filter(|_| self.whitespace.is_empty() && self.previous_was_token)
            .map(|name| self_closed_tag(name, ""));

        self.whitespace.clear();
        self.previous_was_token = true;

        Some(TokenOutput {
            glue,
            line: render_token_line(&token, options),
        })
    }
}

/// Make a value safe for a tab-separated column.
pub fn clean_field(value: &str) -> String {
    value.replace(['\t', '\n', '\r'], " ").trim().to_string()
}

/// Render a token as `word<TAB>attr1<TAB>attr2...`.
///
/// Configured attributes come first, in order, with an empty field when
/// missing. Auto-numbered attributes (`attr3`, `attr4`, ... after two
/// configured names) follow until the numbering breaks.
pub fn render_token_line(token: &Token, options: &ConvertOptions) -> String {
    let mut fields = vec![clean_field(token.word())];

    for name in &options.attributes {
        fields.push(clean_field(token.attributes.get(name).unwrap_or_default()));
    }

    let mut number = options.attributes.len() + 1;
    while let Some(value) = token
        .attributes
        .get(&format!("{}{number}", options.auto_attribute_prefix))
    {
        fields.push(clean_field(value));
        number += 1;
    }

    fields.join("\t")
}
