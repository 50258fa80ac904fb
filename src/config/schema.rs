use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Badge groups and rows
// ---------------------------------------------------------------------------

/// A category of badges built from one slice of session data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeGroup {
    Identity,
    Context,
    Usage,
    Git,
    Config,
    Pr,
    Learning,
    RemoteControl,
    Transcript,
    Tools,
    Agents,
    Todos,
}

impl BadgeGroup {
    pub const ALL: [BadgeGroup; 12] = [
        BadgeGroup::Identity,
        BadgeGroup::Context,
        BadgeGroup::Usage,
        BadgeGroup::Git,
        BadgeGroup::Config,
        BadgeGroup::Pr,
        BadgeGroup::Learning,
        BadgeGroup::RemoteControl,
        BadgeGroup::Transcript,
        BadgeGroup::Tools,
        BadgeGroup::Agents,
        BadgeGroup::Todos,
    ];

    /// Identifier used in the configuration file.
    pub fn key(self) -> &'static str {
        match self {
            BadgeGroup::Identity => "identity",
            BadgeGroup::Context => "context",
            BadgeGroup::Usage => "usage",
            BadgeGroup::Git => "git",
            BadgeGroup::Config => "config",
            BadgeGroup::Pr => "pr",
            BadgeGroup::Learning => "learning",
            BadgeGroup::RemoteControl => "remoteControl",
            BadgeGroup::Transcript => "transcript",
            BadgeGroup::Tools => "tools",
            BadgeGroup::Agents => "agents",
            BadgeGroup::Todos => "todos",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.key() == key)
    }
}

/// Config-file spelling of the horizontal rule row.
pub const SEPARATOR: &str = "---";

/// One row of the layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSpec {
    /// Badges of these groups, in order, on one (possibly wrapped) line.
    Groups(Vec<BadgeGroup>),
    /// A horizontal rule.
    Separator,
}

impl Serialize for RowSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowSpec::Separator => serializer.serialize_str(SEPARATOR),
            RowSpec::Groups(groups) => {
                let mut seq = serializer.serialize_seq(Some(groups.len()))?;
                for group in groups {
                    seq.serialize_element(group)?;
                }
                seq.end()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

/// Built-in row templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    /// Compact multi-row grouping by priority.
    #[default]
    Dense,
    /// One category per row.
    Semantic,
    /// Everything in one row, relying on wrapping.
    Adaptive,
}

impl LayoutPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dense" => Some(LayoutPreset::Dense),
            "semantic" => Some(LayoutPreset::Semantic),
            "adaptive" => Some(LayoutPreset::Adaptive),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutPreset::Dense => "dense",
            LayoutPreset::Semantic => "semantic",
            LayoutPreset::Adaptive => "adaptive",
        }
    }

    pub fn rows(self) -> Vec<RowSpec> {
        use BadgeGroup::*;
        let layout: &[&[BadgeGroup]] = match self {
            LayoutPreset::Dense => &[
                &[Identity, Usage, RemoteControl],
                &[Context, Config, Learning],
                &[Git, Pr],
                &[Tools, Agents, Todos, Transcript],
            ],
            LayoutPreset::Semantic => &[
                &[Identity],
                &[Context],
                &[Usage],
                &[Git],
                &[Pr],
                &[Config],
                &[Learning],
                &[RemoteControl],
                &[Tools],
                &[Agents],
                &[Todos],
                &[Transcript],
            ],
            LayoutPreset::Adaptive => &[&BadgeGroup::ALL],
        };
        layout
            .iter()
            .map(|groups| RowSpec::Groups(groups.to_vec()))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// How the row width budget adapts to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FlexMode {
    /// Full terminal width.
    Full,
    /// Always leave 40 columns free for host notifications.
    #[serde(rename = "full-minus-40")]
    #[value(name = "full-minus-40")]
    FullMinus40,
    /// Full width until context usage reaches the compact threshold.
    FullUntilCompact,
}

impl FlexMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(FlexMode::Full),
            "full-minus-40" => Some(FlexMode::FullMinus40),
            "full-until-compact" => Some(FlexMode::FullUntilCompact),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Features {
    pub usage: bool,
    pub learning: bool,
    pub remote_control: bool,
}

pub const DEFAULT_COMPACT_THRESHOLD: i64 = 85;
pub const DEFAULT_FLEX_PADDING: i64 = 50;

/// Rows never grow wider than this, however wide the terminal.
pub const MAX_ROW_WIDTH: usize = 140;
/// Width assumed when the terminal size cannot be detected.
pub const FALLBACK_TERMINAL_WIDTH: usize = 75;

/// Fully resolved statusline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatuslineConfig {
    pub layout: LayoutPreset,
    /// Never empty.
    pub rows: Vec<RowSpec>,
    pub features: Features,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_mode: Option<FlexMode>,
    pub compact_threshold: i64,
    pub flex_padding: i64,
}

impl Default for StatuslineConfig {
    fn default() -> Self {
        Self::from_preset(LayoutPreset::default())
    }
}

/// The persisted file, every field kept loose so a bad value only costs
/// that one field.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawConfig {
    layout: Value,
    rows: Value,
    features: Value,
    flex_mode: Value,
    compact_threshold: Value,
    flex_padding: Value,
}

impl StatuslineConfig {
    pub fn from_preset(layout: LayoutPreset) -> Self {
        Self {
            layout,
            rows: layout.rows(),
            features: Features::default(),
            flex_mode: None,
            compact_threshold: DEFAULT_COMPACT_THRESHOLD,
            flex_padding: DEFAULT_FLEX_PADDING,
        }
    }

    /// Resolve persisted JSON, validating each field on its own. Anything
    /// that is not a JSON object yields the default configuration.
    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str::<RawConfig>(contents) {
            Ok(raw) => Self::from_raw(raw),
            Err(_) => Self::default(),
        }
    }

    fn from_raw(raw: RawConfig) -> Self {
        let layout = raw
            .layout
            .as_str()
            .and_then(LayoutPreset::from_name)
            .unwrap_or_default();
        let rows = parse_rows(&raw.rows).unwrap_or_else(|| layout.rows());
        let flag = |name: &str| raw.features.get(name).and_then(Value::as_bool) == Some(true);
        let features = Features {
            usage: flag("usage"),
            learning: flag("learning"),
            remote_control: flag("remoteControl"),
        };

        Self {
            layout,
            rows,
            features,
            flex_mode: raw.flex_mode.as_str().and_then(FlexMode::from_name),
            compact_threshold: as_integer(&raw.compact_threshold)
                .unwrap_or(DEFAULT_COMPACT_THRESHOLD),
            flex_padding: as_integer(&raw.flex_padding).unwrap_or(DEFAULT_FLEX_PADDING),
        }
    }

    /// Column budget for a row on a `term_width`-column terminal while
    /// `context_percent` of the context window is in use. Zero disables
    /// wrapping.
    pub fn max_width(&self, term_width: usize, context_percent: u32) -> usize {
        if term_width == 0 {
            return 0;
        }
        let reserve = match self.flex_mode {
            None | Some(FlexMode::Full) => 4,
            Some(FlexMode::FullMinus40) => 40,
            Some(FlexMode::FullUntilCompact) => {
                if i64::from(context_percent) >= self.compact_threshold {
                    self.flex_padding.max(0) as usize
                } else {
                    4
                }
            }
        };
        term_width.saturating_sub(reserve).min(MAX_ROW_WIDTH)
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|n| n as i64))
}

/// Rows from persisted JSON. Unknown group names are dropped, rows left
/// empty by that are dropped, and an empty result means "use the preset".
fn parse_rows(value: &Value) -> Option<Vec<RowSpec>> {
    let items = value.as_array()?;
    let rows: Vec<RowSpec> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if s == SEPARATOR => Some(RowSpec::Separator),
            Value::Array(names) => {
                let groups: Vec<BadgeGroup> = names
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(BadgeGroup::from_key)
                    .collect();
                (!groups.is_empty()).then_some(RowSpec::Groups(groups))
            }
            _ => None,
        })
        .collect();
    (!rows.is_empty()).then_some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatuslineConfig::default();
        assert_eq!(config.layout, LayoutPreset::Dense);
        assert_eq!(config.rows, LayoutPreset::Dense.rows());
        assert_eq!(config.features, Features::default());
        assert_eq!(config.flex_mode, None);
        assert_eq!(config.compact_threshold, 85);
        assert_eq!(config.flex_padding, 50);
    }

    #[test]
    fn test_unknown_group_filtered_and_empty_row_dropped() {
        let config = StatuslineConfig::from_json(r#"{"rows":[["identity"],["bogus-group"],"---"]}"#);
        assert_eq!(
            config.rows,
            vec![RowSpec::Groups(vec![BadgeGroup::Identity]), RowSpec::Separator]
        );
    }

    #[test]
    fn test_mixed_row_keeps_known_groups_in_order() {
        let config = StatuslineConfig::from_json(r#"{"rows":[["git","nope","pr",7,"todos"]]}"#);
        assert_eq!(
            config.rows,
            vec![RowSpec::Groups(vec![BadgeGroup::Git, BadgeGroup::Pr, BadgeGroup::Todos])]
        );
    }

    #[test]
    fn test_empty_rows_fall_back_to_layout_preset() {
        let config = StatuslineConfig::from_json(r#"{"layout":"semantic","rows":[]}"#);
        assert_eq!(config.layout, LayoutPreset::Semantic);
        assert_eq!(config.rows, LayoutPreset::Semantic.rows());

        let config = StatuslineConfig::from_json(r#"{"layout":"adaptive","rows":[["bogus"]]}"#);
        assert_eq!(config.rows, LayoutPreset::Adaptive.rows());
    }

    #[test]
    fn test_non_array_rows_fall_back() {
        let config = StatuslineConfig::from_json(r#"{"rows":"identity"}"#);
        assert_eq!(config.rows, LayoutPreset::Dense.rows());
    }

    #[test]
    fn test_unknown_layout_defaults_to_dense() {
        let config = StatuslineConfig::from_json(r#"{"layout":"fancy"}"#);
        assert_eq!(config.layout, LayoutPreset::Dense);
    }

    #[test]
    fn test_features_require_true_booleans() {
        let config = StatuslineConfig::from_json(
            r#"{"features":{"usage":true,"learning":"yes","remoteControl":true}}"#,
        );
        assert!(config.features.usage);
        assert!(!config.features.learning);
        assert!(config.features.remote_control);
    }

    #[test]
    fn test_flex_settings() {
        let config = StatuslineConfig::from_json(
            r#"{"flexMode":"full-minus-40","compactThreshold":150,"flexPadding":"wide"}"#,
        );
        assert_eq!(config.flex_mode, Some(FlexMode::FullMinus40));
        // Passed through without range checks.
        assert_eq!(config.compact_threshold, 150);
        assert_eq!(config.flex_padding, DEFAULT_FLEX_PADDING);

        let config = StatuslineConfig::from_json(r#"{"flexMode":"sideways"}"#);
        assert_eq!(config.flex_mode, None);
    }

    #[test]
    fn test_malformed_json_yields_default() {
        assert_eq!(StatuslineConfig::from_json("{not json"), StatuslineConfig::default());
        assert_eq!(StatuslineConfig::from_json("[1,2]"), StatuslineConfig::default());
        assert_eq!(StatuslineConfig::from_json(""), StatuslineConfig::default());
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config = StatuslineConfig::from_json(r#"{"theme":"dark","rows":[["pr"]]}"#);
        assert_eq!(config.rows, vec![RowSpec::Groups(vec![BadgeGroup::Pr])]);
    }

    #[test]
    fn test_serialized_config_round_trips() {
        let mut config = StatuslineConfig::from_preset(LayoutPreset::Semantic);
        config.rows.insert(1, RowSpec::Separator);
        config.features.remote_control = true;
        config.flex_mode = Some(FlexMode::FullUntilCompact);

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""---""#));
        assert!(json.contains(r#""remoteControl":true"#));
        assert!(json.contains(r#""flexMode":"full-until-compact""#));
        assert_eq!(StatuslineConfig::from_json(&json), config);
    }

    #[test]
    fn test_presets_cover_every_group() {
        for preset in [LayoutPreset::Dense, LayoutPreset::Semantic, LayoutPreset::Adaptive] {
            for group in BadgeGroup::ALL {
                assert!(
                    preset
                        .rows()
                        .iter()
                        .any(|r| matches!(r, RowSpec::Groups(g) if g.contains(&group))),
                    "{:?} missing from {:?}",
                    group,
                    preset
                );
            }
        }
        assert_eq!(LayoutPreset::Adaptive.rows().len(), 1);
    }

    #[test]
    fn test_group_keys_round_trip() {
        for group in BadgeGroup::ALL {
            assert_eq!(BadgeGroup::from_key(group.key()), Some(group));
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.key()));
        }
        assert_eq!(BadgeGroup::from_key("remote_control"), None);
    }

    #[test]
    fn test_max_width() {
        let mut config = StatuslineConfig::default();
        assert_eq!(config.max_width(0, 0), 0);
        assert_eq!(config.max_width(100, 0), 96);
        assert_eq!(config.max_width(300, 0), MAX_ROW_WIDTH);
        assert_eq!(config.max_width(3, 0), 0);

        config.flex_mode = Some(FlexMode::FullMinus40);
        assert_eq!(config.max_width(100, 0), 60);

        config.flex_mode = Some(FlexMode::FullUntilCompact);
        config.compact_threshold = 80;
        config.flex_padding = 30;
        assert_eq!(config.max_width(100, 79), 96);
        assert_eq!(config.max_width(100, 80), 70);
    }
}
