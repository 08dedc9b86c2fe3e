//! Configuration constants and conversion options.
//!
//! All options are resolved once into a [`ConvertOptions`] value before the
//! traversal starts. Per-element and per-attribute merge policies are
//! structured maps keyed by [`PolicyKey`] instead of string-built lookups.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, VrtError};

/// Default element name marking tokens.
pub const DEFAULT_TOKEN_ELEMENT: &str = "w";

/// Default element name of the glue marker.
pub const DEFAULT_GLUE_ELEMENT: &str = "g";

/// Default separator used when concatenating merged attribute values.
pub const DEFAULT_FLAT_SEPARATOR: &str = " ";

/// Default name of the injected nested-occurrence counter.
pub const DEFAULT_FLAT_LEVEL_ATTRIBUTE: &str = "flat_level";

/// Default prefix of auto-numbered positional attributes (`attr1`, `attr2`, ...).
pub const DEFAULT_AUTO_ATTRIBUTE_PREFIX: &str = "attr";

/// File extension for converted output.
pub const OUTPUT_EXTENSION: &str = "vrt";

/// Separator between element and attribute in a policy key (`s@id`).
pub const POLICY_KEY_SEPARATOR: char = '@';

/// Element or attribute name as accepted in policy keys.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^[^\s@=<>&"'/]+$"#).expect("valid regex"));

/// Key of a merge rule: an element, optionally narrowed to one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct PolicyKey {
    pub element: String,
    pub attribute: Option<String>,
}

impl PolicyKey {
    /// Rule key applying to every attribute of `element`.
    pub fn element(element: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            attribute: None,
        }
    }

    /// Rule key applying to one attribute of `element`.
    pub fn attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            attribute: Some(attribute.into()),
        }
    }
}

impl TryFrom<String> for PolicyKey {
    type Error = VrtError;

    fn try_from(value: String) -> Result<Self> {
        parse_policy_key(&value)
    }
}

/// Merge behaviour for one element or element attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeRule {
    /// Overwrite instead of concatenating.
    #[serde(rename = "override")]
    pub overwrite: Option<bool>,
    /// Separator used when concatenating.
    pub separator: Option<String>,
}

/// Options controlling how repeated nested elements are collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlatteningOptions {
    /// When false, every element keeps its own nesting level.
    pub enabled: bool,
    /// Name of the attribute carrying the nested-occurrence counter.
    pub level_attribute: String,
    /// Global concatenation separator.
    pub separator: String,
    /// Global overwrite policy.
    #[serde(rename = "override")]
    pub overwrite: bool,
    /// Rules per element (`s`) or per element attribute (`s@id`).
    pub rules: HashMap<PolicyKey, MergeRule>,
}

impl Default for FlatteningOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            level_attribute: DEFAULT_FLAT_LEVEL_ATTRIBUTE.to_string(),
            separator: DEFAULT_FLAT_SEPARATOR.to_string(),
            overwrite: false,
            rules: HashMap::new(),
        }
    }
}

impl FlatteningOptions {
    /// Rules that apply to `attribute` of `element`, most specific first.
    fn rules_for<'a>(
        &'a self,
        element: &str,
        attribute: &str,
    ) -> impl Iterator<Item = &'a MergeRule> + 'a {
        let specific = self.rules.get(&PolicyKey::attribute(element, attribute));
        let general = self.rules.get(&PolicyKey::element(element));
        specific.into_iter().chain(general)
    }

    /// Whether a merged value for this attribute overwrites the earlier one.
    pub fn overwrites(&self, element: &str, attribute: &str) -> bool {
        self.rules_for(element, attribute)
            .find_map(|rule| rule.overwrite)
            .unwrap_or(self.overwrite)
    }

    /// Separator used when concatenating values of this attribute.
    pub fn separator_for(&self, element: &str, attribute: &str) -> &str {
        self.rules_for(element, attribute)
            .find_map(|rule| rule.separator.as_deref())
            .unwrap_or(self.separator.as_str())
    }

    /// Mark an element or element attribute as overwriting.
    pub fn set_override(&mut self, key: PolicyKey) {
        self.rules.entry(key).or_default().overwrite = Some(true);
    }

    /// Set the concatenation separator for an element or element attribute.
    pub fn set_separator(&mut self, key: PolicyKey, separator: impl Into<String>) {
        self.rules.entry(key).or_default().separator = Some(separator.into());
    }
}

/// Options for one conversion, resolved before the traversal starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertOptions {
    /// Element name marking tokens.
    pub token_element: String,
    /// Ordered positional attribute names, after the word column.
    pub attributes: Vec<String>,
    /// Prefix of auto-numbered attributes appended after the configured ones.
    pub auto_attribute_prefix: String,
    /// Glue element name, `None` disables glue tracking.
    pub glue: Option<String>,
    /// Keep markup found inside token text.
    pub keep_token_tags: bool,
    /// Disable empty-element suppression.
    pub keep_empty: bool,
    /// Restrict suppression to these element names.
    pub discard_empty: HashSet<String>,
    /// Drop free text found outside tokens.
    pub discard_freetext: bool,
    /// Extract only from the first occurrence of these elements onward.
    pub include_elements: HashSet<String>,
    /// Skip these elements and everything inside them.
    pub exclude_elements: HashSet<String>,
    /// Flattening of repeated nested elements.
    pub flattening: FlatteningOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            token_element: DEFAULT_TOKEN_ELEMENT.to_string(),
            attributes: Vec::new(),
            auto_attribute_prefix: DEFAULT_AUTO_ATTRIBUTE_PREFIX.to_string(),
            glue: Some(DEFAULT_GLUE_ELEMENT.to_string()),
            keep_token_tags: false,
            keep_empty: false,
            discard_empty: HashSet::new(),
            discard_freetext: false,
            include_elements: HashSet::new(),
            exclude_elements: HashSet::new(),
            flattening: FlatteningOptions::default(),
        }
    }
}

impl ConvertOptions {
    /// Create options with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the positional attribute names.
    #[must_use]
    pub fn with_attributes(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.attributes = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the token element name.
    #[must_use]
    pub fn with_token_element(mut self, name: impl Into<String>) -> Self {
        self.token_element = name.into();
        self
    }

    /// Set the glue element name, or disable glue with `None`.
    #[must_use]
    pub fn with_glue(mut self, glue: Option<&str>) -> Self {
        self.glue = glue.map(String::from);
        self
    }

    /// Keep markup inside token text.
    #[must_use]
    pub fn with_keep_token_tags(mut self, keep: bool) -> Self {
        self.keep_token_tags = keep;
        self
    }

    /// Disable empty-element suppression.
    #[must_use]
    pub fn with_keep_empty(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Restrict empty-element suppression to the given names.
    #[must_use]
    pub fn with_discard_empty(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.discard_empty = names.into_iter().map(Into::into).collect();
        self
    }

    /// Drop free text outside tokens.
    #[must_use]
    pub fn with_discard_freetext(mut self, discard: bool) -> Self {
        self.discard_freetext = discard;
        self
    }

    /// Set the include-list.
    #[must_use]
    pub fn with_include(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.include_elements = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the exclude-list.
    #[must_use]
    pub fn with_exclude(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude_elements = names.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable flattening.
    #[must_use]
    pub fn with_flattening(mut self, enabled: bool) -> Self {
        self.flattening.enabled = enabled;
        self
    }

    /// Mark an element or element attribute as overwriting on merge.
    #[must_use]
    pub fn with_flat_override(mut self, key: PolicyKey) -> Self {
        self.flattening.set_override(key);
        self
    }

    /// Set the merge separator for an element or element attribute.
    #[must_use]
    pub fn with_flat_separator(mut self, key: PolicyKey, separator: impl Into<String>) -> Self {
        self.flattening.set_separator(key, separator);
        self
    }

    /// Whether an empty element with this name is dropped from the output.
    pub fn is_discardable(&self, name: &str) -> bool {
        !self.keep_empty && (self.discard_empty.is_empty() || self.discard_empty.contains(name))
    }

    /// Whether inter-token whitespace has to be tracked.
    pub fn tracks_glue(&self) -> bool {
        self.glue.is_some()
    }
}

/// Load conversion options from a YAML file.
///
/// Missing keys fall back to their defaults.
///
/// # Errors
/// Returns `Io` if the file cannot be read and `Config` if it is not valid.
pub fn load_options(path: &Path) -> Result<ConvertOptions> {
    let content = fs::read_to_string(path)?;
    parse_options(&content)
}

/// Parse conversion options from YAML text.
///
/// # Examples
/// ```
/// use xml2vrt::config::parse_options;
///
/// let options = parse_options("attributes: [pos, lemma]\nglue: ~\n").unwrap();
/// assert_eq!(options.attributes, vec!["pos", "lemma"]);
/// assert!(options.glue.is_none());
/// ```
pub fn parse_options(yaml: &str) -> Result<ConvertOptions> {
    if yaml.trim().is_empty() {
        return Ok(ConvertOptions::default());
    }
    Ok(serde_yaml_ng::from_str(yaml)?)
}

fn validate_name(name: &str, value: &str) -> Result<()> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(VrtError::InvalidOption {
            value: value.to_string(),
            reason: format!("'{name}' is not a valid element or attribute name"),
        })
    }
}

/// Parse an `element` or `element@attribute` policy key.
///
/// # Examples
/// ```
/// use xml2vrt::config::{parse_policy_key, PolicyKey};
///
/// assert_eq!(parse_policy_key("s").unwrap(), PolicyKey::element("s"));
/// assert_eq!(parse_policy_key("s@id").unwrap(), PolicyKey::attribute("s", "id"));
/// assert!(parse_policy_key("@id").is_err());
/// ```
pub fn parse_policy_key(value: &str) -> Result<PolicyKey> {
    match value.split_once(POLICY_KEY_SEPARATOR) {
        Some((element, attribute)) => {
            validate_name(element, value)?;
            validate_name(attribute, value)?;
            Ok(PolicyKey::attribute(element, attribute))
        }
        None => {
            validate_name(value, value)?;
            Ok(PolicyKey::element(value))
        }
    }
}

/// Parse an `element[@attribute]=separator` specification.
///
/// The separator may be empty, which concatenates values directly.
pub fn parse_separator_spec(value: &str) -> Result<(PolicyKey, String)> {
    let (key, separator) = value
        .split_once('=')
        .ok_or_else(|| VrtError::InvalidOption {
            value: value.to_string(),
            reason: "expected element[@attribute]=separator".to_string(),
        })?;
    Ok((parse_policy_key(key)?, separator.to_string()))
}
