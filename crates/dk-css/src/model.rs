use crate::channel::Channel;
use crate::naming::kebab_property;
use crate::value::StyleValue;
use indexmap::IndexMap;

/// Ordered property → value mapping of one channel.
pub type Declarations = IndexMap<String, StyleValue>;

/// Per-component style declarations, partitioned by channel.
///
/// Property names and values are not validated; whatever is stored is
/// serialized verbatim apart from kebab-casing and pixel coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleModel {
    channels: IndexMap<Channel, Declarations>,
}

impl StyleModel {
    pub fn new() -> Self {
        let mut channels = IndexMap::new();
        channels.insert(Channel::Default, Declarations::new());
        channels.insert(Channel::Hover, Declarations::new());
        Self { channels }
    }

    /// Merges `properties` into `channel`. Last write wins per property and
    /// an overwritten property keeps its original position.
    ///
    /// Pseudo channels naming `hover` or `default` land in the named channel.
    pub fn set<I, K, V>(&mut self, channel: Channel, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<StyleValue>,
    {
        let declarations = self.channels.entry(channel.normalized()).or_default();
        for (property, value) in properties {
            declarations.insert(property.into(), value.into());
        }
    }

    pub fn get(&self, channel: &Channel, property: &str) -> Option<&StyleValue> {
        self.channels.get(&channel.normalized())?.get(property)
    }

    pub fn declarations(&self, channel: &Channel) -> Option<&Declarations> {
        self.channels.get(&channel.normalized())
    }

    pub fn is_empty(&self, channel: &Channel) -> bool {
        self.channels
            .get(&channel.normalized())
            .is_none_or(|declarations| declarations.is_empty())
    }

    /// Channels in emission order: Default, Hover, then the rest by creation.
    pub fn channels(&self) -> impl Iterator<Item = (&Channel, &Declarations)> {
        self.channels.iter()
    }

    /// Non-default channels that carry at least one declaration.
    pub fn variant_channels(&self) -> impl Iterator<Item = &Channel> {
        self.channels
            .iter()
            .filter(|(channel, declarations)| !channel.is_default() && !declarations.is_empty())
            .map(|(channel, _)| channel)
    }

    /// Renders `channel` as `\tproperty: value;` lines joined by newlines.
    pub fn serialize(&self, channel: &Channel) -> String {
        let Some(declarations) = self.channels.get(&channel.normalized()) else {
            return String::new();
        };

        declarations
            .iter()
            .map(|(property, value)| format!("\t{}: {value};", kebab_property(property)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for StyleModel {
    fn default() -> Self {
        Self::new()
    }
}
